use super::OutputFormatter;
use std::io::Write;
use serde::Serialize;
use crate::error::IdentifyError;
use crate::identify::{Cns, FieldDescriptor};

pub struct JsonFormatter {
    data: JsonData,
}

#[derive(Serialize)]
struct JsonData {
    #[serde(skip_serializing_if = "Option::is_none")]
    cns: Option<Cns>,
    buffer_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    fields: Vec<JsonField>,
}

#[derive(Serialize)]
struct JsonField {
    id: &'static str,
    name: &'static str,
    offset: usize,
    length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}


impl JsonFormatter {
    pub fn new() -> Self {
        JsonFormatter {
            data: JsonData {
                cns: None,
                buffer_size: 0,
                table: None,
                fields: Vec::new(),
            }
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn begin_document(&mut self, _w: &mut dyn Write, cns: Cns, buffer_size: usize) -> std::io::Result<()> {
        self.data.cns = Some(cns);
        self.data.buffer_size = buffer_size;
        Ok(())
    }

    fn end_document(&mut self, w: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.data)?;
        writeln!(w, "{json}")?;
        Ok(())
    }

    fn begin_fields(&mut self, _w: &mut dyn Write, title: &str) -> std::io::Result<()> {
        self.data.table = Some(title.to_string());
        Ok(())
    }

    fn field(&mut self, _w: &mut dyn Write, desc: &FieldDescriptor, value: &Result<u64, IdentifyError>) -> std::io::Result<()> {
        let (value, error) = match value {
            Ok(v) => (Some(*v), None),
            Err(e) => (None, Some(e.to_string())),
        };
        self.data.fields.push(JsonField {
            id: desc.id,
            name: desc.name,
            offset: desc.offset,
            length: desc.length,
            value,
            error,
        });
        Ok(())
    }

    fn end_fields(&mut self, _w: &mut dyn Write) -> std::io::Result<()> {
        Ok(())
    }

    fn total_fields(&mut self, _w: &mut dyn Write, _decoded: usize, _count: usize) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identify::NamespaceField;

    #[test]
    fn test_json_document() {
        let mut formatter = JsonFormatter::new();
        let mut out = Vec::new();

        formatter.begin_document(&mut out, Cns::Namespace, 4096).unwrap();
        formatter.begin_fields(&mut out, "namespace").unwrap();
        formatter.field(&mut out, NamespaceField::Flbas.descriptor(), &Ok(2)).unwrap();
        formatter.end_fields(&mut out).unwrap();
        assert!(out.is_empty());
        formatter.end_document(&mut out).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["cns"], "namespace");
        assert_eq!(doc["buffer_size"], 4096);
        assert_eq!(doc["fields"][0]["id"], "FLBAS");
        assert_eq!(doc["fields"][0]["offset"], 26);
        assert_eq!(doc["fields"][0]["value"], 2);
        assert!(doc["fields"][0].get("error").is_none());
    }
}
