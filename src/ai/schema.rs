//! Structured records returned by the JSON-producing operations.
//!
//! Each record type knows its own field list, which drives both the
//! response schema sent to the provider and the CSV export header.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AIError;

/// A flat record with a fixed set of string fields.
pub trait Record: DeserializeOwned + Serialize + Send {
    /// Wire names of the fields, in column order.
    const FIELDS: &'static [&'static str];

    /// Field values, aligned with [`Record::FIELDS`].
    fn values(&self) -> Vec<&str>;
}

/// One row of the voice-of-customer analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocItem {
    /// What the customer complained about
    pub problem: String,
    /// Root cause behind the complaint
    pub cause: String,
    /// How to answer the customer
    pub response: String,
    /// What to change so it does not happen again
    pub system_action: String,
}

impl Record for VocItem {
    const FIELDS: &'static [&'static str] = &["problem", "cause", "response", "systemAction"];

    fn values(&self) -> Vec<&str> {
        vec![
            self.problem.as_str(),
            self.cause.as_str(),
            self.response.as_str(),
            self.system_action.as_str(),
        ]
    }
}

/// One FAQ entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
    /// Action that makes the question unnecessary next time
    pub proactive_action: String,
}

impl Record for FaqItem {
    const FIELDS: &'static [&'static str] = &["question", "answer", "proactiveAction"];

    fn values(&self) -> Vec<&str> {
        vec![self.question.as_str(), self.answer.as_str(), self.proactive_action.as_str()]
    }
}

/// Dialect of the response schema a provider understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFlavor {
    /// OpenAPI subset with upper-case type names (Gemini).
    OpenApi,
    /// Plain JSON Schema (Ollama structured outputs).
    JsonSchema,
}

/// Response schema for a list of `R` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    fields: &'static [&'static str],
}

impl RecordSchema {
    /// Schema for an array of `R`.
    pub fn of<R: Record>() -> Self {
        Self { fields: R::FIELDS }
    }

    /// Field names every item must carry.
    pub fn fields(&self) -> &'static [&'static str] {
        self.fields
    }

    /// Render the schema in the given dialect.
    pub fn to_json(&self, flavor: SchemaFlavor) -> Value {
        let (array, object, string) = match flavor {
            SchemaFlavor::OpenApi => ("ARRAY", "OBJECT", "STRING"),
            SchemaFlavor::JsonSchema => ("array", "object", "string"),
        };

        let properties: serde_json::Map<String, Value> = self
            .fields
            .iter()
            .map(|name| ((*name).to_string(), json!({ "type": string })))
            .collect();

        json!({
            "type": array,
            "items": {
                "type": object,
                "properties": properties,
                "required": self.fields,
            }
        })
    }
}

/// Parse a model reply into a list of records.
///
/// Markdown code fences around the payload are tolerated. Missing fields
/// or a non-array payload are reported as [`AIError::InvalidJson`].
pub fn parse_records<R: Record>(raw: &str) -> Result<Vec<R>, AIError> {
    let payload = strip_code_fence(raw);
    if payload.is_empty() {
        return Err(AIError::NoResponse);
    }
    serde_json::from_str(payload).map_err(|e| AIError::InvalidJson(e.to_string()))
}

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").unwrap());

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match CODE_FENCE.captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => trimmed,
    }
}
