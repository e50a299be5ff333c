use super::OutputFormatter;
use std::io::Write;
use crate::error::IdentifyError;
use crate::identify::{Cns, FieldDescriptor};

pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        PlainFormatter
    }
}

impl OutputFormatter for PlainFormatter {
    fn begin_document(&mut self, w: &mut dyn Write, cns: Cns, buffer_size: usize) -> std::io::Result<()> {
        writeln!(w, "Identify data: {buffer_size} bytes, interpreted as {cns}")
    }

    fn end_document(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn begin_fields(&mut self, w: &mut dyn Write, title: &str) -> std::io::Result<()> {
        let title = format!("Identify {title} fields");
        writeln!(w, "\n{title}:")?;
        writeln!(w, "{}", "-".repeat(title.len() + 1))
    }

    fn field(&mut self, w: &mut dyn Write, desc: &FieldDescriptor, value: &Result<u64, IdentifyError>) -> std::io::Result<()> {
        match value {
            Ok(value) => writeln!(
                w,
                "  {:<8} 0x{:04X} {:>4}  0x{:08X}  {}",
                desc.id, desc.offset, desc.length, value, desc.name
            ),
            Err(err) => {
                writeln!(
                    w,
                    "  {:<8} 0x{:04X} {:>4}  {:<10}  {}",
                    desc.id, desc.offset, desc.length, "-", desc.name
                )?;
                writeln!(w, "      {err}")
            }
        }
    }

    fn end_fields(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn total_fields(&mut self, w: &mut dyn Write, decoded: usize, count: usize) -> std::io::Result<()> {
        writeln!(w, "\nFields decoded: {decoded} of {count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identify::CtrlrCapField;

    #[test]
    fn test_plain_field_lines() {
        let mut formatter = PlainFormatter::new();
        let mut out = Vec::new();

        formatter.begin_fields(&mut out, "controller").unwrap();
        formatter.field(&mut out, CtrlrCapField::Vid.descriptor(), &Ok(0x1234)).unwrap();
        let err = IdentifyError::InvalidFieldDefinition {
            field: "Firmware Revision (FR)".to_string(),
            reason: "too wide".to_string(),
        };
        formatter.field(&mut out, CtrlrCapField::Fr.descriptor(), &Err(err)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Identify controller fields:"));
        assert!(text.contains("  VID      0x0000    2  0x00001234  PCI Vendor ID (VID)"));
        assert!(text.contains("  FR       0x0040    8  -           Firmware Revision (FR)"));
        assert!(text.contains("invalid field definition for Firmware Revision (FR): too wide"));
    }
}
