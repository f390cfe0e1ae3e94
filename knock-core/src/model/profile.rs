use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Display metadata a client attaches to its join (name, email, picture...).
/// The relay forwards it untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Profile(pub Value);

impl Profile {
    pub fn named(name: impl Into<String>) -> Self {
        Self(json!({ "name": name.into() }))
    }

    /// Best-effort label for log lines.
    pub fn display_name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

impl From<Value> for Profile {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
