use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::script_store::ScriptStoreError;

pub const UNNAMED_SCRIPT: &str = "Unnamed Script";
pub const EMPTY_SCRIPT: &str = "No script content available.";

/// A saved script as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptRecord {
    pub id: String,
    pub name: String,
    pub script: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScriptRecord {
    /// Missing names and bodies are rendered as placeholders.
    pub fn new(id: String, name: String, script: String) -> Self {
        Self {
            id,
            name: or_placeholder(name, UNNAMED_SCRIPT),
            script: or_placeholder(script, EMPTY_SCRIPT),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScript {
    pub name: String,
    pub script: String,
}

impl NewScript {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ScriptStoreError> {
        if self.name.trim().is_empty() || self.script.trim().is_empty() {
            return Err(ScriptStoreError::Validation(
                "Please enter a valid name and script before saving.".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_fields_are_invalid() {
        assert!(NewScript::new(" ", "body").validate().is_err());
        assert!(NewScript::new("name", "\n\t").validate().is_err());
        assert!(NewScript::new("name", "body").validate().is_ok());
    }

    #[test]
    fn empty_fields_render_placeholders() {
        let record = ScriptRecord::new("0".to_string(), String::new(), " ".to_string());
        assert_eq!(record.name, UNNAMED_SCRIPT);
        assert_eq!(record.script, EMPTY_SCRIPT);

        let record = ScriptRecord::new("1".to_string(), "Intro".to_string(), "Hi".to_string());
        assert_eq!(record.name, "Intro");
        assert_eq!(record.script, "Hi");
    }
}
