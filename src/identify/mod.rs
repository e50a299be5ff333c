//! Decoding and dumping of Identify data buffers.

use crate::buffers::{self, DataReader};
use crate::error::{IdentifyError, Result};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

pub mod cns;
pub mod tables;

pub use cns::Cns;
pub use tables::{
    CTRLR_CAP_TABLE, CtrlrCapField, FieldDescriptor, FieldTable, IDEAL_DATA_SIZE, NAMESPACE_TABLE,
    NamespaceField,
};

const OBJ_NAME: &str = "Admin Cmd: Identify";

/// How the bytes of a multi-byte field are combined into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteAssembly {
    /// Byte `i` is shifted left by `8 * i` bits.
    #[default]
    LittleEndian,
    /// Byte `i` is shifted left by `i` bits.
    ///
    /// Reproduces the values historically reported for multi-byte fields.
    /// Single byte fields decode identically under both modes.
    LegacyBitShift,
}

impl ByteAssembly {
    fn assemble(self, bytes: &[u8]) -> u64 {
        let step = match self {
            ByteAssembly::LittleEndian => 8,
            ByteAssembly::LegacyBitShift => 1,
        };
        bytes
            .iter()
            .enumerate()
            .fold(0u64, |value, (i, &byte)| value | (u64::from(byte) << (i * step)))
    }
}

/// Decoding context for one Identify data buffer.
///
/// The buffer is borrowed from whoever populated it and is never written.
#[derive(Debug, Clone, Copy)]
pub struct Identify<'a> {
    buf: &'a [u8],
    cns: Cns,
    assembly: ByteAssembly,
}

impl<'a> Identify<'a> {
    /// Wrap `buf`, interpreting it as controller data until told otherwise.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            cns: Cns::Controller,
            assembly: ByteAssembly::default(),
        }
    }

    pub fn with_cns(mut self, cns: Cns) -> Self {
        self.cns = cns;
        self
    }

    pub fn with_assembly(mut self, assembly: ByteAssembly) -> Self {
        self.assembly = assembly;
        self
    }

    pub fn set_cns(&mut self, cns: Cns) {
        self.cns = cns;
    }

    pub fn cns(&self) -> Cns {
        self.cns
    }

    pub fn set_controller(&mut self, ctrlr: bool) {
        self.cns = Cns::from_controller(ctrlr);
    }

    pub fn is_controller(&self) -> bool {
        self.cns.is_controller()
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    /// The table matching the current CNS.
    pub fn active_table(&self) -> &'static FieldTable {
        match self.cns {
            Cns::Controller => &CTRLR_CAP_TABLE,
            Cns::Namespace => &NAMESPACE_TABLE,
        }
    }

    pub fn controller_value(&self, field: CtrlrCapField) -> Result<u64> {
        self.value_at(field.index(), &CTRLR_CAP_TABLE)
    }

    pub fn namespace_value(&self, field: NamespaceField) -> Result<u64> {
        self.value_at(field.index(), &NAMESPACE_TABLE)
    }

    /// Decode field `index` of `table` from the buffer.
    ///
    /// Fields of 8 bytes or more are rejected, as is any field reaching past
    /// the end of the buffer.
    pub fn value_at(&self, index: usize, table: &FieldTable) -> Result<u64> {
        let desc = self.checked_descriptor(index, table)?;

        if desc.length >= size_of::<u64>() {
            log::debug!("sizeof({}) > {} bytes", desc.name, size_of::<u64>());
            return Err(IdentifyError::InvalidFieldDefinition {
                field: desc.name.to_string(),
                reason: format!(
                    "{} bytes does not fit below {} bytes",
                    desc.length,
                    size_of::<u64>()
                ),
            });
        }

        let bytes = self.field_bytes(index, desc)?;
        let value = self.assembly.assemble(bytes);
        log::info!("{} = 0x{:08X}", desc.name, value);
        Ok(value)
    }

    /// Write the raw dump of the whole buffer to `path`, then append an
    /// annotated dump of every field of the active table.
    pub fn dump(&self, path: &Path, header: &str) -> Result<()> {
        let header = if header.is_empty() {
            OBJ_NAME.to_string()
        } else {
            format!("{header}\n{OBJ_NAME}")
        };
        buffers::dump(path, self.buf, 0, usize::MAX, &header)?;

        let file = OpenOptions::new().append(true).open(path).map_err(|source| {
            log::debug!("Failed to open file: {}", path.display());
            IdentifyError::FileOpen {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mut w = BufWriter::new(file);

        let table = self.active_table();
        log::trace!("Annotating {} as {} data", path.display(), self.cns);
        for index in 0..table.len() {
            self.dump_field(&mut w, index, table)?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write the name of field `index` followed by its bytes as hex rows.
    pub fn dump_field(&self, w: &mut dyn Write, index: usize, table: &FieldTable) -> Result<()> {
        let desc = self.checked_descriptor(index, table)?;
        let bytes = self.field_bytes(index, desc)?;

        writeln!(w, "{}", desc.name)?;
        writeln!(w)?;
        buffers::write_hex_rows(w, desc.offset, bytes)?;
        Ok(())
    }

    fn checked_descriptor(&self, index: usize, table: &FieldTable) -> Result<&'static FieldDescriptor> {
        table.get(index).ok_or_else(|| {
            log::debug!("Unknown {} field: {}", table.title, index);
            IdentifyError::InvalidFieldDefinition {
                field: format!("{} field #{index}", table.title),
                reason: format!("table has {} entries", table.len()),
            }
        })
    }

    fn field_bytes(&self, index: usize, desc: &FieldDescriptor) -> Result<&'a [u8]> {
        DataReader::new(self.buf, desc.offset)
            .read_bytes(desc.length)
            .ok_or_else(|| {
                log::debug!("Detected illegal definition in Identify table");
                log::debug!(
                    "Reference calc ({}): {} + {} > {}",
                    index,
                    desc.length,
                    desc.offset,
                    self.buf.len()
                );
                IdentifyError::InvalidFieldDefinition {
                    field: desc.name.to_string(),
                    reason: format!(
                        "{} + {} exceeds buffer size {}",
                        desc.offset,
                        desc.length,
                        self.buf.len()
                    ),
                }
            })
    }
}
