use std::io::Write;
use crate::error::IdentifyError;
use crate::identify::{Cns, FieldDescriptor};

mod plain;
mod json;

pub use plain::PlainFormatter;
pub use json::JsonFormatter;


#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

pub trait OutputFormatter {
    fn begin_document(&mut self, w: &mut dyn Write, cns: Cns, buffer_size: usize) -> std::io::Result<()>;
    fn end_document(&mut self, w: &mut dyn Write) -> std::io::Result<()>;

    fn begin_fields(&mut self, w: &mut dyn Write, title: &str) -> std::io::Result<()>;
    fn field(&mut self, w: &mut dyn Write, desc: &FieldDescriptor, value: &Result<u64, IdentifyError>) -> std::io::Result<()>;
    fn end_fields(&mut self, w: &mut dyn Write) -> std::io::Result<()>;

    fn total_fields(&mut self, w: &mut dyn Write, decoded: usize, count: usize) -> std::io::Result<()>;
}

pub fn create_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Plain => Box::new(PlainFormatter::new()),
        OutputFormat::Json => Box::new(JsonFormatter::new()),
    }
}
