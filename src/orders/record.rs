//! Raw order record as returned by the order backend

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Fields never shown to the model in a pass-through reply
pub const PII_FIELDS: &[&str] = &[
    "product_name",
    "customer_name",
    "location_details",
    "personal_id",
    "phone_number",
    "branch",
    "comment_1",
    "source_sheet",
    "item_carrier",
    "issue_date",
];

const DATE_SUFFIX: &str = " 00:00:00 GMT";

/// Order record. Read-only once fetched.
///
/// Missing and explicitly empty fields are distinct: several rules match
/// `""` but not an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub item_collection_note: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub delivery_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub delivery_status_2: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub order_ready_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub delivery_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub status_update: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub order_status_1: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub standard_deadline: Option<String>,
    /// Everything else the backend sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecord {
    /// Strip the midnight suffix from the date fields. Absent dates become
    /// empty strings.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.order_date = Some(strip_date_suffix(self.order_date.as_deref()));
        self.standard_deadline = Some(strip_date_suffix(self.standard_deadline.as_deref()));
        self
    }

    /// Readiness/carrier field, trimmed and lowercased
    pub fn ready_status(&self) -> String {
        self.order_ready_status
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    pub fn deadline(&self) -> &str {
        self.standard_deadline.as_deref().unwrap_or_default()
    }

    /// JSON view of the record with personally-identifying fields removed
    pub fn sanitized_view(&self) -> String {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            for field in PII_FIELDS {
                map.remove(*field);
            }
        }
        value.to_string()
    }
}

fn strip_date_suffix(value: Option<&str>) -> String {
    value.unwrap_or_default().replace(DATE_SUFFIX, "")
}

/// Accept strings, numbers and booleans; `null` reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
