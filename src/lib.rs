//! nvmeid - NVMe Identify data decoder
//!
//! Decodes the 4096 byte buffer returned by an Identify admin command into
//! named fields, and writes raw plus field-annotated hex dumps of it. The
//! layout used depends on the CNS selector of the command: controller
//! capabilities or namespace data.

pub mod buffers;
pub mod error;
pub mod formatter;
pub mod identify;
pub mod loader;

pub use error::{IdentifyError, Result};
pub use identify::{ByteAssembly, Cns, CtrlrCapField, FieldDescriptor, FieldTable, Identify, NamespaceField};
