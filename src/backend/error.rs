use std::fmt;

use serde_json::Value;

/// Shown when the backend gives no usable `detail`.
pub const GENERIC_FETCH_ERROR: &str = "Something went wrong while contacting the server. Please try again.";

/// Failure of a backend call, already reduced to what the page needs.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    NotFound,
    /// Non-2xx other than 404; `message` is the backend detail or the fallback.
    Status { status: u16, message: String },
    /// Connection, timeout, or TLS failure.
    Transport(String),
    /// 2xx with a body that did not match the expected shape.
    Decode(String),
}

impl FetchError {
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        if status == 404 {
            return FetchError::NotFound;
        }
        let message = detail_message(body).unwrap_or_else(|| GENERIC_FETCH_ERROR.to_string());
        FetchError::Status { status, message }
    }

    /// Text safe to show the user.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::NotFound => "The requested record was not found.".to_string(),
            FetchError::Status { message, .. } => message.clone(),
            FetchError::Transport(_) | FetchError::Decode(_) => GENERIC_FETCH_ERROR.to_string(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::NotFound => write!(f, "Backend returned 404"),
            FetchError::Status { status, message } => write!(f, "Backend returned {status}: {message}"),
            FetchError::Transport(e) => write!(f, "Backend unreachable: {e}"),
            FetchError::Decode(e) => write!(f, "Backend response malformed: {e}"),
        }
    }
}

/// Pull the human-readable `detail` out of an error body. A list of
/// validation errors (`[{"msg": ...}]`) is joined with `; `.
pub fn detail_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        _ => None,
    }
}
