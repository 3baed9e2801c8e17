//! Response envelope decoding.
//!
//! `ResponseData` normally holds a JSON *string* that itself encodes the
//! record array; some deployments send the array directly. Both are accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::MessageType;
use crate::core::GridError;
use crate::models::DropdownOption;

/// Response envelope returned by every lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupEnvelope {
    #[serde(rename = "ResponseData", default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
    #[serde(rename = "ResponsePayload", default, skip_serializing_if = "Option::is_none")]
    pub response_payload: Option<Value>,
}

/// Raw master-data record; either half may be missing or non-textual.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
}

/// Detail record of an on-select lookup.
///
/// Every column is optional: a missing column means "leave the row alone",
/// an empty string means "clear it".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectDetail {
    #[serde(default, rename = "UNCode", alias = "unCode")]
    pub un_code: Option<String>,
    #[serde(default, rename = "UNCodeDescription", alias = "unCodeDescription")]
    pub un_code_description: Option<String>,
    #[serde(default, rename = "DGClass", alias = "dgClass")]
    pub dg_class: Option<String>,
    #[serde(default, rename = "DGClassDescription", alias = "dgClassDescription")]
    pub dg_class_description: Option<String>,
    #[serde(default, alias = "containsHazardousGoods")]
    pub contains_hazardous_goods: Option<String>,
}

fn text_of(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// One decoded page of options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionPage {
    pub options: Vec<DropdownOption>,
    /// Records the backend sent, counting those without an `id` or `name`
    pub records: usize,
}

/// Map a record to a dropdown option, or `None` when `id` or `name` is missing.
#[must_use]
pub fn option_from_record(record: &MasterRecord) -> Option<DropdownOption> {
    let id = text_of(record.id.as_ref())?;
    let name = text_of(record.name.as_ref())?;
    Some(DropdownOption::from_parts(&id, &name))
}

/// Unwrap a value that may be JSON-encoded inside a string.
fn decode_nested(value: &Value) -> Result<Value, serde_json::Error> {
    match value {
        Value::String(encoded) if encoded.trim().is_empty() => Ok(Value::Null),
        Value::String(encoded) => serde_json::from_str(encoded),
        other => Ok(other.clone()),
    }
}

impl LookupEnvelope {
    /// Envelope wrapping a list of records, encoded the way the backend does.
    #[must_use]
    pub fn from_records(records: &[MasterRecord]) -> Self {
        Self {
            response_data: Some(Value::String(
                serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string()),
            )),
            response_payload: None,
        }
    }

    /// Envelope wrapping one on-select detail record.
    #[must_use]
    pub fn from_detail(detail: &SelectDetail) -> Self {
        Self {
            response_data: None,
            response_payload: serde_json::to_value(detail).ok(),
        }
    }

    /// Decode `ResponseData` into records.
    ///
    /// A missing or empty `ResponseData` is an empty list, not an error.
    pub fn records(&self, message_type: MessageType) -> Result<Vec<MasterRecord>, GridError> {
        let decode_error = |e: serde_json::Error| GridError::LookupDecode {
            message_type: message_type.to_string(),
            reason: e.to_string(),
        };

        let Some(raw) = self.response_data.as_ref() else {
            return Ok(Vec::new());
        };
        match decode_nested(raw).map_err(decode_error)? {
            Value::Null => Ok(Vec::new()),
            value => serde_json::from_value(value).map_err(decode_error),
        }
    }

    /// Dropdown options from `ResponseData`, with the raw record count.
    pub fn option_page(&self, message_type: MessageType) -> Result<OptionPage, GridError> {
        let records = self.records(message_type)?;
        Ok(OptionPage {
            options: records.iter().filter_map(option_from_record).collect(),
            records: records.len(),
        })
    }

    /// On-select detail record from `ResponsePayload`, if present and readable.
    #[must_use]
    pub fn detail(&self, message_type: MessageType) -> Option<SelectDetail> {
        let raw = self.response_payload.as_ref()?;
        let decoded = decode_nested(raw)
            .and_then(|value| match value {
                // Some handlers wrap the single record in a one-element array
                Value::Array(mut items) if !items.is_empty() => {
                    serde_json::from_value(items.swap_remove(0))
                }
                value => serde_json::from_value::<Option<SelectDetail>>(value)
                    .map(Option::unwrap_or_default),
            });
        match decoded {
            Ok(detail) => Some(detail),
            Err(e) => {
                warn!("Discarding '{message_type}' payload: {e}");
                None
            }
        }
    }
}
