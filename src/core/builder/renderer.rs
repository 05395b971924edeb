//! Record rendering
//!
//! [`WordMlRenderer`] writes a single-file WordprocessingML (Word 2003 XML)
//! document. Word opens it as a regular `.doc`; no archive container is
//! needed. Output depends only on the record, so identical records render to
//! identical bytes.

use crate::domain::errors::RenderError;
use crate::domain::record::LogRecord;
use chrono::SecondsFormat;
use std::io::Write;

const WORDML_NS: &str = "http://schemas.microsoft.com/office/word/2003/wordml";

/// Turns a record into document bytes
pub trait DocumentRenderer: Send + Sync {
    /// Write the document for `record` to `out`
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Unrenderable`] for records that cannot be
    /// represented and [`RenderError::Io`] when `out` fails.
    fn render(&self, record: &LogRecord, out: &mut dyn Write) -> Result<(), RenderError>;
}

/// Default renderer producing WordprocessingML
#[derive(Debug, Clone, Copy, Default)]
pub struct WordMlRenderer;

impl DocumentRenderer for WordMlRenderer {
    fn render(&self, record: &LogRecord, out: &mut dyn Write) -> Result<(), RenderError> {
        if let Some(name) = record.fields.keys().find(|k| k.trim().is_empty()) {
            return Err(RenderError::Unrenderable(format!(
                "record {} has a field with a blank name {name:?}",
                record.id
            )));
        }

        out.write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n")?;
        out.write_all(b"<?mso-application progid=\"Word.Document\"?>\n")?;
        writeln!(out, "<w:wordDocument xmlns:w=\"{WORDML_NS}\">")?;
        out.write_all(b"<w:body>\n")?;

        heading(out, &format!("Log record {}", record.id))?;
        paragraph(
            out,
            "Timestamp",
            &record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;
        paragraph(out, "Level", &record.level)?;
        if !record.source.is_empty() {
            paragraph(out, "Source", &record.source)?;
        }
        paragraph(out, "Message", &record.message)?;

        if !record.fields.is_empty() {
            heading(out, "Fields")?;
            for (name, value) in &record.fields {
                paragraph(out, name, value)?;
            }
        }

        out.write_all(b"</w:body>\n</w:wordDocument>\n")?;
        Ok(())
    }
}

fn heading(out: &mut dyn Write, text: &str) -> std::io::Result<()> {
    writeln!(
        out,
        "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>{}</w:t></w:r></w:p>",
        escape(text)
    )
}

/// `label: value`, with each line of `value` separated by a break
fn paragraph(out: &mut dyn Write, label: &str, value: &str) -> std::io::Result<()> {
    write!(
        out,
        "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t xml:space=\"preserve\">{}: </w:t></w:r><w:r>",
        escape(label)
    )?;
    for (i, line) in value.lines().enumerate() {
        if i > 0 {
            out.write_all(b"<w:br/>")?;
        }
        write!(out, "<w:t xml:space=\"preserve\">{}</w:t>", escape(line))?;
    }
    out.write_all(b"</w:r></w:p>\n")
}

/// Escape XML markup and drop characters XML 1.0 does not allow
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\t' => escaped.push(c),
            c if c.is_control() => {}
            '\u{FFFE}' | '\u{FFFF}' => {}
            c => escaped.push(c),
        }
    }
    escaped
}
