// Wire types for the two control channels.
//
// The JSON channel takes a JSON-RPC flavoured envelope and answers with
// either `{ "result": [...] }` or `{ "error": [...] }`. The IRCC channel takes
// a fixed SOAP envelope carrying one control code.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// JSON services exposed under `/sony/{service}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Service {
    System,
    AvContent,
    Audio,
    AppControl,
    VideoScreen,
    AccessControl,
}

// ── Request envelope ─────────────────────────────────────────────────

/// A single call on the JSON channel.
///
/// ```json
/// { "method": "setPowerStatus", "params": [{ "status": true }], "id": 1, "version": "1.0" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest {
    pub method: String,
    pub params: Vec<Value>,
    pub id: u32,
    pub version: &'static str,
}

impl RpcRequest {
    /// A call without parameters (`"params": []`).
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Vec::new(),
            id: 1,
            version: "1.0",
        }
    }

    /// A call with a single parameter object.
    pub fn with_params(method: impl Into<String>, params: Value) -> Self {
        Self::new(method).param(params)
    }

    /// Append one more positional parameter.
    pub fn param(mut self, value: Value) -> Self {
        self.params.push(value);
        self
    }
}

// ── Response envelope ────────────────────────────────────────────────

/// Parsed response from the JSON channel.
///
/// An empty `Reply` (both fields `None`) is the soft-failure value: the
/// request never produced a usable answer and callers treat it as "no data".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Reply {
    /// `true` when neither a result nor an error came back.
    pub fn is_empty(&self) -> bool {
        self.result.is_none() && self.error.is_none()
    }

    /// `true` when the device answered with a result and no error object.
    pub fn is_success(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// The result element at `index`, if present.
    pub fn item(&self, index: usize) -> Option<&Value> {
        self.result.as_ref().and_then(|r| r.get(index))
    }

    /// The result element at `index` as a list; empty when missing or not a list.
    pub fn list(&self, index: usize) -> &[Value] {
        self.item(index)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Decode the result element at `index`, falling back to `T::default()`
    /// when it is missing or does not match the expected shape.
    pub fn decode<T: DeserializeOwned + Default>(&self, index: usize) -> T {
        self.item(index)
            .and_then(|v| T::deserialize(v).ok())
            .unwrap_or_default()
    }
}

/// Field deserializer for sparse device records: a value of the wrong
/// type reads as `None` instead of failing the whole record.
///
/// Use together with `#[serde(default)]`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

// ── IRCC envelope ────────────────────────────────────────────────────

/// `SOAPACTION` header value for the IRCC service.
pub const IRCC_SOAP_ACTION: &str = "\"urn:schemas-sony-com:service:IRCC:1#X_SendIRCC\"";

/// Wrap a control code into the IRCC SOAP envelope.
pub fn ircc_envelope(code: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\
         <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
         s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\">\
         <s:Body>\
         <u:X_SendIRCC xmlns:u=\"urn:schemas-sony-com:service:IRCC:1\">\
         <IRCCCode>{code}</IRCCCode>\
         </u:X_SendIRCC>\
         </s:Body>\
         </s:Envelope>"
    )
}
