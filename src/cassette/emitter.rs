//! Incremental block-style YAML emitter driven by low-level document events.
//!
//! The emitter never holds more than the stack of currently open
//! containers. Each event is written to the underlying stream as soon as
//! its position in the document is known; an empty container is the only
//! thing deferred until its end event, so it can be written as `{}` / `[]`.

use std::io::Write;

use crate::error::{CassetteError, Result};

/// Longest key YAML readers accept in `key: value` form.
const MAX_IMPLICIT_KEY_LEN: usize = 1024;

/// A single scalar value as seen by the emitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    /// `null`.
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Text.
    Str(&'a str),
}

/// One low-level document event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// Begin a document.
    DocumentStart,
    /// End the current document.
    DocumentEnd,
    /// Open a mapping; entries follow as alternating key and value nodes.
    MappingStart,
    /// Close the innermost mapping.
    MappingEnd,
    /// Open a sequence.
    SequenceStart,
    /// Close the innermost sequence.
    SequenceEnd,
    /// A scalar node.
    Scalar(Scalar<'a>),
}

/// Narrow capability interface over an incremental structured-document encoder.
pub trait EventSink {
    /// Emit one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event is illegal at the current position or
    /// the underlying stream fails.
    fn emit(&mut self, event: Event<'_>) -> Result<()>;

    /// Push buffered output down to the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails.
    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug)]
enum Frame {
    Mapping { indent: usize, inline: bool, entries: usize, awaiting_value: bool, explicit: bool },
    Sequence { indent: usize, inline: bool, items: usize },
}

/// Writes block-style YAML for a stream of [`Event`]s.
#[derive(Debug)]
pub struct YamlEmitter<W: Write> {
    writer: W,
    stack: Vec<Frame>,
    in_document: bool,
    root_written: bool,
    documents: usize,
    line_open: bool,
}

impl<W: Write> YamlEmitter<W> {
    /// Create an emitter writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            stack: Vec::new(),
            in_document: false,
            root_written: false,
            documents: 0,
            line_open: false,
        }
    }

    /// Number of containers currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Consume the emitter and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .map_err(|e| CassetteError::io("Failed to write cassette", e))
    }

    fn newline(&mut self) -> Result<()> {
        self.line_open = false;
        self.write("\n")
    }

    /// Position the cursor for a new mapping key or sequence item.
    fn begin_entry(&mut self, indent: usize, inline_first: bool) -> Result<()> {
        if self.line_open && inline_first {
            self.write(" ")?;
        } else {
            if self.line_open {
                self.write("\n")?;
            }
            let padding = " ".repeat(indent);
            self.write(&padding)?;
        }
        self.line_open = true;
        Ok(())
    }

    /// Write whatever precedes a node and report where a nested container
    /// would start: `Some((indent, inline))`, or `None` for a mapping key.
    fn place_node(&mut self, is_sequence: bool) -> Result<Option<(usize, bool)>> {
        match self.stack.last_mut() {
            None => {
                if !self.in_document {
                    return Err(CassetteError::Emitter("node outside of a document".into()));
                }
                if self.root_written {
                    return Err(CassetteError::Emitter("document already has a root node".into()));
                }
                Ok(Some((0, false)))
            }
            Some(Frame::Mapping { indent, awaiting_value, entries, explicit, .. })
                if *awaiting_value =>
            {
                *awaiting_value = false;
                *entries += 1;
                // Sequences under an implicit key are written indentless.
                let indentless = is_sequence && !*explicit;
                *explicit = false;
                let child_indent = if indentless { *indent } else { *indent + 2 };
                Ok(Some((child_indent, false)))
            }
            Some(Frame::Mapping { .. }) => Ok(None),
            Some(Frame::Sequence { indent, inline, items }) => {
                let (indent, inline_first) = (*indent, *inline && *items == 0);
                *items += 1;
                self.begin_entry(indent, inline_first)?;
                self.write("-")?;
                Ok(Some((indent + 2, true)))
            }
        }
    }

    fn write_scalar(&mut self, scalar: &Scalar<'_>) -> Result<()> {
        let text = render_scalar(scalar)?;
        if let Some(Frame::Mapping { indent, inline, entries, awaiting_value: false, .. }) =
            self.stack.last()
        {
            let (indent, inline_first) = (*indent, *inline && *entries == 0);
            let long_key = text.len() > MAX_IMPLICIT_KEY_LEN;
            self.begin_entry(indent, inline_first)?;
            if long_key {
                self.write("? ")?;
                self.write(&text)?;
                self.write("\n")?;
                self.write(&" ".repeat(indent))?;
            } else {
                self.write(&text)?;
            }
            self.write(":")?;
            if let Some(Frame::Mapping { awaiting_value, explicit, .. }) = self.stack.last_mut() {
                *awaiting_value = true;
                *explicit = long_key;
            }
            return Ok(());
        }

        let at_root = self.stack.is_empty();
        self.place_node(false)?;
        if self.line_open {
            self.write(" ")?;
        }
        self.write(&text)?;
        if at_root {
            self.root_written = true;
        }
        self.newline()
    }

    fn start_container(&mut self, is_sequence: bool) -> Result<()> {
        let Some((indent, inline)) = self.place_node(is_sequence)? else {
            return Err(CassetteError::Emitter("mapping keys must be scalars".into()));
        };
        self.stack.push(if is_sequence {
            Frame::Sequence { indent, inline, items: 0 }
        } else {
            Frame::Mapping { indent, inline, entries: 0, awaiting_value: false, explicit: false }
        });
        Ok(())
    }

    fn end_container(&mut self, is_sequence: bool) -> Result<()> {
        let count = match self.stack.pop() {
            Some(Frame::Sequence { items, .. }) if is_sequence => items,
            Some(Frame::Mapping { awaiting_value: true, .. }) if !is_sequence => {
                return Err(CassetteError::Emitter(
                    "mapping closed while a key awaits its value".into(),
                ));
            }
            Some(Frame::Mapping { entries, .. }) if !is_sequence => entries,
            Some(frame) => {
                let message = format!("container end does not match open {frame:?}");
                self.stack.push(frame);
                return Err(CassetteError::Emitter(message));
            }
            None => return Err(CassetteError::Emitter("no container is open".into())),
        };
        if count == 0 {
            if self.line_open {
                self.write(" ")?;
            }
            self.write(if is_sequence { "[]" } else { "{}" })?;
            self.newline()?;
        }
        if self.stack.is_empty() {
            self.root_written = true;
        }
        Ok(())
    }
}

impl<W: Write> EventSink for YamlEmitter<W> {
    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::DocumentStart => {
                if self.in_document {
                    return Err(CassetteError::Emitter("document already started".into()));
                }
                if self.documents > 0 {
                    self.write("---\n")?;
                }
                self.in_document = true;
                self.root_written = false;
                Ok(())
            }
            Event::DocumentEnd => {
                if !self.in_document || !self.stack.is_empty() || !self.root_written {
                    return Err(CassetteError::Emitter(
                        "document ended before its root node".into(),
                    ));
                }
                self.in_document = false;
                self.documents += 1;
                Ok(())
            }
            Event::MappingStart => self.start_container(false),
            Event::SequenceStart => self.start_container(true),
            Event::MappingEnd => self.end_container(false),
            Event::SequenceEnd => self.end_container(true),
            Event::Scalar(scalar) => self.write_scalar(&scalar),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| CassetteError::io("Failed to flush cassette", e))
    }
}

/// Characters YAML treats as line breaks.
fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Render a scalar as single-line YAML text.
///
/// `serde_yaml` decides quoting. Strings that contain a line break, or that
/// it would fold across lines, are written double-quoted instead, since JSON
/// string syntax is a subset of YAML's double-quoted style. JSON leaves the
/// Unicode line breaks raw, so they are escaped here.
fn render_scalar(scalar: &Scalar<'_>) -> Result<String> {
    let rendered = match *scalar {
        Scalar::Null => serde_yaml::to_string(&())?,
        Scalar::Bool(v) => serde_yaml::to_string(&v)?,
        Scalar::Int(v) => serde_yaml::to_string(&v)?,
        Scalar::UInt(v) => serde_yaml::to_string(&v)?,
        Scalar::Float(v) => serde_yaml::to_string(&v)?,
        Scalar::Str(v) => {
            let rendered = serde_yaml::to_string(v)?;
            if v.contains(is_line_break) || rendered.trim_end_matches('\n').contains('\n') {
                return double_quoted(v);
            }
            rendered
        }
    };
    Ok(rendered.trim_end_matches('\n').to_string())
}

fn double_quoted(text: &str) -> Result<String> {
    let quoted = serde_json::to_string(text)
        .map_err(|source| CassetteError::Unsupported { field: "string".into(), source })?;
    Ok(quoted
        .replace('\u{85}', "\\u0085")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029"))
}
