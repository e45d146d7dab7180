//! Completion Response Parser
//!
//! Treats model output as an untrusted wire payload: strip conversational
//! code fences, decode JSON, then validate every field before any typed
//! value is handed on. Nothing is clamped, truncated, or defaulted.

use super::errors::ParseError;
use super::types::{
    Interest, ParsedPersonaFields, ResponseSchema, FIELD_BIO, FIELD_CITY, FIELD_DISPLAY_NAME,
    FIELD_GENDER, FIELD_HANDLE, FIELD_INTERESTS, FIELD_INTEREST_LEVEL, FIELD_INTEREST_TOPIC,
    MAX_AFFINITY, MIN_AFFINITY,
};
use serde_json::{Map, Value};

/// Smallest interest list accepted unless configured otherwise.
pub const DEFAULT_MIN_INTERESTS: usize = 1;

const FENCE: &str = "```";
const LINE_FENCE: &str = "\n```";

type Result<T> = std::result::Result<T, ParseError>;

// ============================================================================
// Fence Stripping
// ============================================================================

/// Remove a markdown code fence (```` ``` ```` or ```` ```json ````) wrapping the
/// payload.
///
/// Only a fence that opens the trimmed text or closes it counts; backticks
/// anywhere else belong to the payload. Text without such a wrapper is
/// returned unchanged.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(after_open) = trimmed.strip_prefix(FENCE) {
        return strip_closing_fence(skip_info_string(after_open));
    }
    if let Some(body) = trimmed.strip_suffix(FENCE) {
        return body.trim();
    }
    raw
}

/// Drop the info string (`json`, `JSON`, ...) after an opening fence.
fn skip_info_string(after_open: &str) -> &str {
    match after_open.find('\n') {
        Some(newline) => &after_open[newline + 1..],
        None => after_open.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    }
}

/// Cut at the closing fence: a trailing one, else the last fence starting a
/// line. JSON strings cannot hold a raw newline, so no line of the payload
/// itself starts with a fence.
fn strip_closing_fence(body: &str) -> &str {
    let body = body.trim_end();
    if let Some(inner) = body.strip_suffix(FENCE) {
        return inner.trim();
    }
    match body.rfind(LINE_FENCE) {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// A fenced block preceded by prose, e.g. "Here you go:\n```json\n{..}\n```".
fn embedded_fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find(LINE_FENCE)? + 1;
    Some(strip_code_fence(&raw[open..]))
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseParser {
    schema: ResponseSchema,
    min_interests: usize,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(ResponseSchema::default())
    }
}

impl ResponseParser {
    pub fn new(schema: ResponseSchema) -> Self {
        Self {
            schema,
            min_interests: DEFAULT_MIN_INTERESTS,
        }
    }

    /// Require at least `min` interests. Zero is raised to one: an empty
    /// interest list is never valid.
    pub fn with_min_interests(mut self, min: usize) -> Self {
        self.min_interests = min.max(DEFAULT_MIN_INTERESTS);
        self
    }

    pub fn schema(&self) -> ResponseSchema {
        self.schema
    }

    pub fn min_interests(&self) -> usize {
        self.min_interests
    }

    pub fn parse(&self, raw: &str) -> Result<ParsedPersonaFields> {
        let value = decode(raw)?;

        let obj = value.as_object().ok_or_else(|| {
            ParseError::malformed(format!("expected a JSON object, found {}", json_type(&value)))
        })?;

        let handle = required_string(obj, FIELD_HANDLE, FIELD_HANDLE)?;
        let display_name = required_string(obj, FIELD_DISPLAY_NAME, FIELD_DISPLAY_NAME)?;
        let bio = required_string(obj, FIELD_BIO, FIELD_BIO)?;

        let city = if self.schema.city {
            Some(required_string(obj, FIELD_CITY, FIELD_CITY)?)
        } else {
            None
        };
        let gender = if self.schema.gender {
            Some(required_string(obj, FIELD_GENDER, FIELD_GENDER)?)
        } else {
            None
        };

        let interests = self.parse_interests(obj)?;

        Ok(ParsedPersonaFields {
            handle,
            display_name,
            bio,
            interests,
            city,
            gender,
        })
    }

    fn parse_interests(&self, obj: &Map<String, Value>) -> Result<Vec<Interest>> {
        let items = match obj.get(FIELD_INTERESTS) {
            None | Some(Value::Null) => {
                return Err(ParseError::schema_violation(
                    FIELD_INTERESTS,
                    "required field is missing",
                ))
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ParseError::schema_violation(
                    FIELD_INTERESTS,
                    format!("expected array, found {}", json_type(other)),
                ))
            }
        };

        if items.is_empty() {
            return Err(ParseError::schema_violation(
                FIELD_INTERESTS,
                "must contain at least one entry",
            ));
        }
        if items.len() < self.min_interests {
            return Err(ParseError::schema_violation(
                FIELD_INTERESTS,
                format!(
                    "expected at least {} entries, found {}",
                    self.min_interests,
                    items.len()
                ),
            ));
        }

        items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_interest(index, item))
            .collect()
    }
}

/// Decode the unwrapped text; only when that fails look for a fenced block
/// after leading prose.
fn decode(raw: &str) -> Result<Value> {
    let malformed = |e: serde_json::Error| ParseError::malformed(format!("invalid JSON: {e}"));
    match serde_json::from_str(strip_code_fence(raw)) {
        Ok(value) => Ok(value),
        Err(e) => match embedded_fenced_block(raw) {
            Some(block) => serde_json::from_str(block).map_err(malformed),
            None => Err(malformed(e)),
        },
    }
}

fn parse_interest(index: usize, item: &Value) -> Result<Interest> {
    let path = format!("{FIELD_INTERESTS}[{index}]");
    let entry = item.as_object().ok_or_else(|| {
        ParseError::schema_violation(
            path.as_str(),
            format!("expected object, found {}", json_type(item)),
        )
    })?;

    let topic = required_string(
        entry,
        FIELD_INTEREST_TOPIC,
        &format!("{path}.{FIELD_INTEREST_TOPIC}"),
    )?;

    let level_path = format!("{path}.{FIELD_INTEREST_LEVEL}");
    let affinity = match entry.get(FIELD_INTEREST_LEVEL) {
        None | Some(Value::Null) => {
            return Err(ParseError::schema_violation(
                level_path,
                "required field is missing",
            ))
        }
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            ParseError::schema_violation(level_path.as_str(), "number is not representable")
        })?,
        Some(other) => {
            return Err(ParseError::schema_violation(
                level_path,
                format!("expected number, found {}", json_type(other)),
            ))
        }
    };

    if !Interest::is_valid_affinity(affinity) {
        return Err(ParseError::schema_violation(
            level_path,
            format!("must be within [{MIN_AFFINITY:.1}, {MAX_AFFINITY:.1}], found {affinity}"),
        ));
    }

    Ok(Interest::new(topic, affinity))
}

fn required_string(obj: &Map<String, Value>, key: &str, path: &str) -> Result<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(ParseError::schema_violation(
            path,
            "required field is missing",
        )),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ParseError::schema_violation(
            path,
            "must be a non-empty string",
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ParseError::schema_violation(
            path,
            format!("expected string, found {}", json_type(other)),
        )),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests
// ============================================================================
