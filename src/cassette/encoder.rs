//! Encodes named values into emitter events.

use serde::Serialize;
use serde_json::Value;

use super::emitter::{Event, EventSink, Scalar};
use crate::error::{CassetteError, Result};

/// Emit a bare scalar string.
///
/// # Errors
///
/// Returns an error if the sink rejects the event.
pub fn write_str<S: EventSink + ?Sized>(sink: &mut S, value: &str) -> Result<()> {
    sink.emit(Event::Scalar(Scalar::Str(value)))
}

/// Emit `name: value` where `value` is a plain string.
///
/// # Errors
///
/// Returns an error if the sink rejects either event.
pub fn write_pair<S: EventSink + ?Sized>(sink: &mut S, name: &str, value: &str) -> Result<()> {
    write_str(sink, name)?;
    write_str(sink, value)
}

/// Emit `name` followed by the full event tree of `value`.
///
/// The key is written before `value` is converted, so a value that cannot
/// be represented leaves the enclosing mapping with a dangling key.
///
/// # Errors
///
/// Returns [`CassetteError::Unsupported`] if `value` cannot be represented,
/// or any error raised by the sink.
pub fn write_mapping<S, T>(sink: &mut S, name: &str, value: &T) -> Result<()>
where
    S: EventSink + ?Sized,
    T: Serialize + ?Sized,
{
    write_str(sink, name)?;
    let node = serde_json::to_value(value)
        .map_err(|source| CassetteError::Unsupported { field: name.to_string(), source })?;
    write_value(sink, &node)
}

/// Emit the event tree for an already-converted value.
///
/// # Errors
///
/// Returns any error raised by the sink.
pub fn write_value<S: EventSink + ?Sized>(sink: &mut S, value: &Value) -> Result<()> {
    match value {
        Value::Null => sink.emit(Event::Scalar(Scalar::Null)),
        Value::Bool(b) => sink.emit(Event::Scalar(Scalar::Bool(*b))),
        Value::Number(n) => {
            let scalar = if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else if let Some(u) = n.as_u64() {
                Scalar::UInt(u)
            } else {
                Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
            };
            sink.emit(Event::Scalar(scalar))
        }
        Value::String(s) => sink.emit(Event::Scalar(Scalar::Str(s))),
        Value::Array(items) => {
            sink.emit(Event::SequenceStart)?;
            for item in items {
                write_value(sink, item)?;
            }
            sink.emit(Event::SequenceEnd)
        }
        Value::Object(fields) => {
            sink.emit(Event::MappingStart)?;
            for (key, field) in fields {
                write_str(sink, key)?;
                write_value(sink, field)?;
            }
            sink.emit(Event::MappingEnd)
        }
    }
}
