//! Census report writer.
//!
//! Emits one JSON object: the optional highlight annotation first, then
//! every histogram row as `"<mnemonic>": {"count": <n>}` in table order.
//! The layout is a bit-exact contract with downstream viewers (two-space
//! outer indent, inline inner objects, trailing newline), so serialization
//! goes through a custom formatter instead of the stock pretty printer.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::Result;
use crate::histogram::Histogram;

/// Report key for the highlight annotation, always first when present.
const HIGHLIGHT_KEY: &str = "_highlight_groups";

/// Final census state, consumed once by the report writer.
#[derive(Clone, Debug, Default)]
pub struct Census {
    pub histogram: Histogram,
    /// Free-form highlight-group annotation, passed through verbatim.
    pub highlight: Option<String>,
}

#[derive(Serialize)]
struct CountCell {
    count: u64,
}

impl Serialize for Census {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        if let Some(groups) = &self.highlight {
            map.serialize_entry(HIGHLIGHT_KEY, groups)?;
        }
        for entry in self.histogram.entries() {
            map.serialize_entry(entry.mnemonic, &CountCell { count: entry.count })?;
        }
        map.end()
    }
}

/// JSON formatter for the report layout.
///
/// Top-level keys each sit on their own two-space-indented line; nested
/// objects stay inline. Tracks object depth to tell the two apart.
#[derive(Default)]
struct TableFormatter {
    depth: usize,
}

impl serde_json::ser::Formatter for TableFormatter {
    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth -= 1;
        if self.depth == 0 {
            writer.write_all(b"\n}")
        } else {
            writer.write_all(b"}")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.depth == 1 {
            if first {
                writer.write_all(b"\n  ")
            } else {
                writer.write_all(b",\n  ")
            }
        } else if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Render the report to its exact byte layout.
pub fn render(census: &Census) -> Result<String> {
    let mut buf = Vec::new();
    {
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, TableFormatter::default());
        census.serialize(&mut ser)?;
    }
    buf.push(b'\n');

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write the rendered report to `path`, creating parent directories.
pub fn write_report(path: &Path, census: &Census) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, render(census)?)?;
    Ok(())
}
