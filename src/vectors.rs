//! Test vector files.
//!
//! A vector file is a JSON object of the form `{"vectors": [...]}`. Individual
//! records are kept as opaque [`serde_json::Value`]s; only `protocol_name` and
//! `name` are ever inspected, so unknown fields survive a merge untouched.

use std::io::Write;
use std::path::Path;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use crate::errors::{ParseError, WriteError};

pub(crate) const VECTORS_KEY: &str = "vectors";
pub(crate) const PROTOCOL_NAME_KEY: &str = "protocol_name";
pub(crate) const NAME_KEY: &str = "name";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Serialize)]
struct VectorFile<'a> {
    vectors: &'a [Value],
}

/// Load all records stored under the `vectors` key of the given file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<Value>, ParseError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|e| ParseError::Read{path: display.clone(), reason: e.to_string()})?;
    let reader = std::io::BufReader::new(file);
    let document: Value = serde_json::from_reader(reader)
        .map_err(|e| ParseError::InvalidJson{path: display.clone(), reason: e.to_string()})?;
    extract_vectors(document, &display)
}

fn extract_vectors(document: Value, path: &str) -> Result<Vec<Value>, ParseError> {
    match document {
        Value::Object(mut root) => match root.remove(VECTORS_KEY) {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(ParseError::MissingVectors{path: path.to_string()})
        },
        _ => Err(ParseError::MissingVectors{path: path.to_string()})
    }
}

/// Pretty printer emitting ASCII only: anything outside the printable range
/// is written as a lowercase `\uXXXX` escape, using surrogate pairs above the BMP.
struct AsciiPrettyFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> std::io::Result<()> {
        let mut start = 0;
        for (offset, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..offset])?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = offset + ch.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serialize `{"vectors": records}` with sorted keys and a 4 space indent.
///
/// Key order comes from `serde_json::Map`, which is ordered as long as the
/// `preserve_order` feature stays disabled. Numbers are written back exactly
/// as they were read (`arbitrary_precision`).
pub fn to_canonical_json(records: &[Value]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = AsciiPrettyFormatter(PrettyFormatter::with_indent(INDENT));
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    VectorFile{vectors: records}.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Write the records to `path`, replacing any existing file.
///
/// The document is rendered in memory first; the file is only touched once
/// serialization has succeeded.
pub fn write(path: impl AsRef<Path>, records: &[Value]) -> Result<(), WriteError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = to_canonical_json(records)
        .map_err(|e| WriteError::Serialize{path: display.clone(), reason: e.to_string()})?;
    std::fs::write(path, content)
        .map_err(|e| WriteError::Io{path: display, reason: e.to_string()})
}
