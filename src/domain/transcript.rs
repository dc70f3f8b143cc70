use serde_json::Value;

/// Engine output: the human-readable text and the structured result.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub json: Value,
}

impl Transcript {
    pub fn new(text: impl Into<String>, json: Value) -> Self {
        Self {
            text: text.into(),
            json,
        }
    }
}
