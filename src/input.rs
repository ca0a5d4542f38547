use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;

/// HTTP verbs accepted in request/response log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error attached to a log call.
///
/// Either an arbitrary value already coerced to text, or a structured error
/// with a message and an optional stack (rendered as `"<message>\n <stack>"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValue {
    Text(String),
    Structured {
        message: String,
        stack: Option<String>,
    },
}

impl ErrorValue {
    /// Coerce any displayable value to its text form.
    pub fn text(value: impl fmt::Display) -> Self {
        ErrorValue::Text(value.to_string())
    }

    pub fn structured(message: impl Into<String>, stack: Option<String>) -> Self {
        ErrorValue::Structured {
            message: message.into(),
            stack,
        }
    }

    /// Capture a Rust error: its `Display` text becomes the message and the
    /// `source()` chain, one cause per line, becomes the stack.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        let stack = if causes.is_empty() {
            None
        } else {
            Some(causes.join("\n"))
        };
        ErrorValue::structured(err.to_string(), stack)
    }

    /// Text placed in the record's `error` field.
    pub fn render(&self) -> String {
        match self {
            ErrorValue::Text(text) => text.clone(),
            ErrorValue::Structured { message, stack } => match stack.as_deref() {
                Some(stack) if !stack.is_empty() => format!("{}\n {}", message, stack),
                _ => message.clone(),
            },
        }
    }
}

impl From<&str> for ErrorValue {
    fn from(value: &str) -> Self {
        ErrorValue::Text(value.to_string())
    }
}

impl From<String> for ErrorValue {
    fn from(value: String) -> Self {
        ErrorValue::Text(value)
    }
}

impl From<Value> for ErrorValue {
    /// Strings are taken verbatim and objects carrying a textual `message`
    /// are treated as structured errors (with `stack` when textual). Anything
    /// else becomes its compact JSON text.
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => ErrorValue::Text(text),
            Value::Object(ref obj) => match obj.get("message").and_then(Value::as_str) {
                Some(message) => ErrorValue::structured(
                    message,
                    obj.get("stack").and_then(Value::as_str).map(str::to_string),
                ),
                None => ErrorValue::Text(value.to_string()),
            },
            other => ErrorValue::Text(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for ErrorValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(ErrorValue::from)
    }
}

/// Deserialize `error` so that an explicit `null` keeps its text form.
/// Only a missing key means "no error".
fn error_field<'de, D>(deserializer: D) -> Result<Option<ErrorValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| Some(ErrorValue::from(value)))
}

/// Deserialize `extra`, treating anything but an object as absent.
fn extra_field<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| match value {
        Value::Object(map) => Some(map),
        _ => None,
    })
}

/// Plain log line: a message with an optional error and extra fields.
///
/// `message` is normally text but is kept as a raw JSON value so that
/// loosely-typed input passes through untouched; a missing one is left out
/// of the record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, deserialize_with = "error_field")]
    pub error: Option<ErrorValue>,
    #[serde(default, deserialize_with = "extra_field")]
    pub extra: Option<Map<String, Value>>,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: Some(Value::String(message.into())),
            error: None,
            extra: None,
        }
    }

    pub fn error(mut self, error: impl Into<ErrorValue>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Replace the whole extra map.
    pub fn extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Add one extra field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Access-log style line describing one HTTP request/response pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawRequest")]
pub struct RequestResponse {
    pub message: Option<Value>,
    pub error: Option<ErrorValue>,
    pub extra: Option<Map<String, Value>>,
    pub method: Method,
    pub status: u16,
    pub client_ip: String,
    pub path: String,
    pub response_size: Option<u64>,
    /// Request duration, in milliseconds.
    pub elapsed: Option<f64>,
}

impl RequestResponse {
    pub fn new(
        message: impl Into<String>,
        method: Method,
        status: u16,
        client_ip: impl Into<String>,
        path: impl Into<String>,
        response_size: u64,
    ) -> Self {
        RequestResponse {
            message: Some(Value::String(message.into())),
            error: None,
            extra: None,
            method,
            status,
            client_ip: client_ip.into(),
            path: path.into(),
            response_size: Some(response_size),
            elapsed: None,
        }
    }

    /// Override the response size; `None` leaves `http_response_size` out.
    pub fn response_size(mut self, response_size: Option<u64>) -> Self {
        self.response_size = response_size;
        self
    }

    pub fn elapsed(mut self, elapsed_ms: f64) -> Self {
        self.elapsed = Some(elapsed_ms);
        self
    }

    pub fn error(mut self, error: impl Into<ErrorValue>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn extra(mut self, extra: Map<String, Value>) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Whether the HTTP group carries enough to be emitted: a client ip, a
    /// non-zero status and a path.
    pub(crate) fn is_complete(&self) -> bool {
        !self.client_ip.is_empty() && self.status != 0 && !self.path.is_empty()
    }
}

#[derive(Deserialize)]
enum RequestTag {
    #[serde(rename = "request")]
    Request,
}

/// Wire shape of a request line; only accepted when `type` is `"request"`.
#[derive(Deserialize)]
struct RawRequest {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default, deserialize_with = "error_field")]
    error: Option<ErrorValue>,
    #[serde(default, deserialize_with = "extra_field")]
    extra: Option<Map<String, Value>>,
    method: Method,
    status: u16,
    client_ip: String,
    path: String,
    #[serde(default)]
    response_size: Option<u64>,
    #[serde(default)]
    elapsed: Option<f64>,
    #[serde(rename = "type")]
    #[allow(dead_code)]
    kind: RequestTag,
}

impl From<RawRequest> for RequestResponse {
    fn from(raw: RawRequest) -> Self {
        RequestResponse {
            message: raw.message,
            error: raw.error,
            extra: raw.extra,
            method: raw.method,
            status: raw.status,
            client_ip: raw.client_ip,
            path: raw.path,
            response_size: raw.response_size,
            elapsed: raw.elapsed,
        }
    }
}

/// Input of a single logging call.
///
/// Deserializing from a loosely-typed JSON object picks the request shape
/// only when `type` is exactly `"request"` and the HTTP fields are well
/// typed; everything else falls back to a plain [`Message`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LogInput {
    Request(RequestResponse),
    Plain(Message),
}

impl LogInput {
    pub fn message(&self) -> Option<&Value> {
        match self {
            LogInput::Plain(m) => m.message.as_ref(),
            LogInput::Request(r) => r.message.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&ErrorValue> {
        match self {
            LogInput::Plain(m) => m.error.as_ref(),
            LogInput::Request(r) => r.error.as_ref(),
        }
    }

    pub fn extra(&self) -> Option<&Map<String, Value>> {
        match self {
            LogInput::Plain(m) => m.extra.as_ref(),
            LogInput::Request(r) => r.extra.as_ref(),
        }
    }

    /// Parse a loosely-typed JSON object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl From<Message> for LogInput {
    fn from(message: Message) -> Self {
        LogInput::Plain(message)
    }
}

impl From<RequestResponse> for LogInput {
    fn from(request: RequestResponse) -> Self {
        LogInput::Request(request)
    }
}

impl From<&str> for LogInput {
    fn from(message: &str) -> Self {
        LogInput::Plain(Message::new(message))
    }
}

impl From<String> for LogInput {
    fn from(message: String) -> Self {
        LogInput::Plain(Message::new(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl Error for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("query failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn structured_error_renders_message_and_stack() {
        assert_eq!(ErrorValue::structured("boom", None).render(), "boom");
        assert_eq!(
            ErrorValue::structured("boom", Some("at main".into())).render(),
            "boom\n at main"
        );
        assert_eq!(ErrorValue::structured("boom", Some(String::new())).render(), "boom");
    }

    #[test]
    fn from_error_uses_source_chain_as_stack() {
        assert_eq!(ErrorValue::from_error(&Inner).render(), "connection refused");
        assert_eq!(
            ErrorValue::from_error(&Outer(Inner)).render(),
            "query failed\n connection refused"
        );
    }

    #[test]
    fn json_error_values_are_coerced_to_text() {
        assert_eq!(ErrorValue::from(json!("plain")).render(), "plain");
        assert_eq!(ErrorValue::from(json!(42)).render(), "42");
        assert_eq!(ErrorValue::from(json!({"code": 7})).render(), r#"{"code":7}"#);
        assert_eq!(
            ErrorValue::from(json!({"message": "bad", "stack": "trace"})).render(),
            "bad\n trace"
        );
    }

    #[test]
    fn deserializes_request_shape_only_with_request_tag() {
        let value = json!({
            "message": "served",
            "type": "request",
            "method": "GET",
            "status": 200,
            "client_ip": "1.2.3.4",
            "path": "/x",
            "response_size": 10
        });
        let input = LogInput::from_value(value.clone()).unwrap();
        match input {
            LogInput::Request(r) => {
                assert_eq!(r.method, Method::Get);
                assert_eq!(r.status, 200);
                assert_eq!(r.elapsed, None);
            }
            other => panic!("expected request shape, got {:?}", other),
        }

        let mut untagged = value;
        untagged["type"] = json!("response");
        assert!(matches!(LogInput::from_value(untagged).unwrap(), LogInput::Plain(_)));
    }

    #[test]
    fn deserializes_plain_shape_and_ignores_unknown_keys() {
        let input = LogInput::from_value(json!({
            "message": "hi",
            "error": 5,
            "extra": {"a": 1},
            "unrelated": true
        }))
        .unwrap();

        assert_eq!(input.message(), Some(&json!("hi")));
        assert_eq!(input.error(), Some(&ErrorValue::Text("5".into())));
        assert_eq!(input.extra().unwrap().get("a"), Some(&json!(1)));
    }

    #[test]
    fn loose_input_is_never_rejected() {
        let numeric = LogInput::from_value(json!({"message": 42})).unwrap();
        assert_eq!(numeric.message(), Some(&json!(42)));

        let bad_extra = LogInput::from_value(json!({"message": "m", "extra": "oops"})).unwrap();
        assert_eq!(bad_extra.message(), Some(&json!("m")));
        assert_eq!(bad_extra.extra(), None);

        let empty = LogInput::from_value(json!({})).unwrap();
        assert_eq!(empty.message(), None);
    }

    #[test]
    fn null_error_keeps_its_text_form() {
        let input = LogInput::from_value(json!({"message": "m", "error": null})).unwrap();
        assert_eq!(input.error(), Some(&ErrorValue::Text("null".into())));

        let input = LogInput::from_value(json!({"message": "m"})).unwrap();
        assert_eq!(input.error(), None);
    }

    #[test]
    fn request_shape_does_not_need_response_size() {
        let input = LogInput::from_value(json!({
            "message": "m",
            "type": "request",
            "method": "GET",
            "status": 200,
            "client_ip": "1.2.3.4",
            "path": "/x"
        }))
        .unwrap();

        match input {
            LogInput::Request(r) => assert_eq!(r.response_size, None),
            other => panic!("expected request shape, got {:?}", other),
        }
    }

    #[test]
    fn builder_collects_extra_fields() {
        let message = Message::new("hi").field("a", 1).field("b", "x");
        let extra = message.extra.unwrap();
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["b"], json!("x"));
    }
}
