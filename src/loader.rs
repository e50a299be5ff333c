//! Reading Identify captures back from disk.
//!
//! A capture is either the raw binary data buffer or the text produced by a
//! previous dump, in which case only the leading raw section is used.

use anyhow::{Context, Result, bail};
use regex::Regex;
use std::fs;
use std::path::Path;

pub struct CaptureLoader {
    row_pattern: Regex,
}

impl CaptureLoader {
    pub fn new() -> Result<Self> {
        Ok(Self {
            row_pattern: Regex::new(r"^0x([0-9A-Fa-f]{8}):((?: [0-9A-Fa-f]{2}){1,16})\s*$")?,
        })
    }

    pub fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(path)
            .with_context(|| format!("Failed to read capture: {}", path.display()))?;

        match std::str::from_utf8(&data) {
            Ok(text) if self.looks_like_dump(text) => self
                .parse_dump(text)
                .with_context(|| format!("Failed to parse dump: {}", path.display())),
            _ => Ok(data),
        }
    }

    fn looks_like_dump(&self, text: &str) -> bool {
        text.lines().any(|line| self.row_pattern.is_match(line))
    }

    /// Collect the bytes of the raw section of a dump.
    ///
    /// Header lines before the first row are skipped. The section ends at
    /// the first line that is not a row continuing at the next offset.
    pub fn parse_dump(&self, text: &str) -> Result<Vec<u8>> {
        let mut data = Vec::new();

        for line in text.lines() {
            let Some(caps) = self.row_pattern.captures(line) else {
                if data.is_empty() {
                    continue;
                }
                break;
            };

            let addr = usize::from_str_radix(&caps[1], 16)?;
            if addr != data.len() {
                if data.is_empty() {
                    bail!("Raw section starts at 0x{addr:08X} instead of 0x00000000");
                }
                break;
            }

            for byte in caps[2].split_whitespace() {
                data.push(u8::from_str_radix(byte, 16)?);
            }
        }

        if data.is_empty() {
            bail!("No raw rows found");
        }
        Ok(data)
    }
}
