use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The uniform result of every boundary operation. Callers check `success`
/// before reading anything else; `error` is a display string only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// `Some(Value::Null)` serializes as `"user": null` for lookups that
    /// found nobody.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope {
    fn ok() -> Self {
        Envelope {
            success: true,
            data: None,
            id: None,
            user: None,
            error: None,
        }
    }

    pub fn ack() -> Self {
        Envelope::ok()
    }

    pub fn data(data: Value) -> Self {
        Envelope {
            data: Some(data),
            ..Envelope::ok()
        }
    }

    pub fn id(id: i64) -> Self {
        Envelope {
            id: Some(id),
            ..Envelope::ok()
        }
    }

    pub fn user(user: Value) -> Self {
        Envelope {
            user: Some(user),
            ..Envelope::ok()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Envelope {
            success: false,
            error: Some(error.into()),
            ..Envelope::ok()
        }
    }

    /// Decode `data` into a typed value. `None` for failures and for
    /// envelopes without a payload.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn user_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.user
            .as_ref()
            .filter(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
