//! Raw buffer helpers: bounds-checked reads and hex dumps.

use crate::error::{IdentifyError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Bytes printed per hex dump row.
pub const BYTES_PER_ROW: usize = 16;

// Helper for reading data at specific offsets
pub struct DataReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DataReader<'a> {
    pub fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end <= self.data.len() {
            let bytes = &self.data[self.pos..end];
            self.pos = end;
            Some(bytes)
        } else {
            None
        }
    }
}

/// Write `bytes` as hex rows of [`BYTES_PER_ROW`] bytes.
///
/// Each row starts with the absolute offset of its first byte, computed from
/// `base`, so a field dump lines up with the raw dump of the whole buffer.
pub fn write_hex_rows(w: &mut dyn Write, base: usize, bytes: &[u8]) -> std::io::Result<()> {
    for (row, chunk) in bytes.chunks(BYTES_PER_ROW).enumerate() {
        let addr = base + row * BYTES_PER_ROW;
        write!(w, "0x{:08X}:", addr as u32)?;
        for byte in chunk {
            write!(w, " {byte:02X}")?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Dump `len` bytes of `buf` starting at `offset` into a new or truncated file.
///
/// `len` is clamped to the end of the buffer, so `usize::MAX` dumps everything
/// from `offset` on. A non-empty `header` is written on its own line first.
pub fn dump(path: &Path, buf: &[u8], offset: usize, len: usize, header: &str) -> Result<()> {
    let file = File::create(path).map_err(|source| {
        log::debug!("Failed to create file: {}", path.display());
        IdentifyError::FileOpen {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let mut w = BufWriter::new(file);

    if !header.is_empty() {
        writeln!(w, "{header}")?;
    }

    let start = offset.min(buf.len());
    let end = start.saturating_add(len).min(buf.len());
    write_hex_rows(&mut w, start, &buf[start..end])?;
    w.flush()?;

    log::trace!("Dumped {} raw bytes to {}", end - start, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_data_reader_bounds() {
        let data = [1u8, 2, 3, 4];
        let mut reader = DataReader::new(&data, 2);
        assert_eq!(reader.read_bytes(2), Some(&data[2..4]));
        assert_eq!(reader.read_bytes(1), None);

        let mut reader = DataReader::new(&data, 3);
        assert_eq!(reader.read_bytes(2), None);
        assert_eq!(DataReader::new(&data, 1).read_bytes(usize::MAX), None);
    }

    #[test]
    fn test_hex_rows_partial_last_row() {
        let bytes: Vec<u8> = (0..20).collect();
        let mut out = Vec::new();
        write_hex_rows(&mut out, 0x100, &bytes).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "0x00000100: 00 01 02 03 04 05 06 07 08 09 0A 0B 0C 0D 0E 0F"
        );
        assert_eq!(lines[1], "0x00000110: 10 11 12 13");
    }

    #[test]
    fn test_dump_covers_whole_buffer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");
        let buf = vec![0xAAu8; 40];

        dump(&path, &buf, 0, usize::MAX, "Raw data").unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Raw data"));
        let byte_count: usize = lines.map(|l| l.split_whitespace().count() - 1).sum();
        assert_eq!(byte_count, 40);
    }

    #[test]
    fn test_dump_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("raw.txt");
        fs::write(&path, "stale contents\n".repeat(10)).unwrap();

        dump(&path, &[0x01, 0x02], 0, usize::MAX, "").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "0x00000000: 01 02\n");
    }

    #[test]
    fn test_dump_into_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("raw.txt");

        let err = dump(&path, &[0u8; 4], 0, usize::MAX, "").unwrap_err();
        assert!(matches!(err, IdentifyError::FileOpen { .. }));
    }
}
