use async_trait::async_trait;

use super::script_record::{NewScript, ScriptRecord};

#[derive(Debug, thiserror::Error)]
pub enum ScriptStoreError {
    #[error("{0}")]
    Validation(String),
    #[error("script {0} not found")]
    NotFound(String),
    #[error("saved scripts file is corrupt at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Named script records, scoped to one owner.
#[async_trait]
pub trait ScriptStore: Send + Sync {
    async fn list(&self) -> Result<Vec<ScriptRecord>, ScriptStoreError>;

    async fn get(&self, id: &str) -> Result<ScriptRecord, ScriptStoreError>;

    async fn save(&self, script: NewScript) -> Result<ScriptRecord, ScriptStoreError>;

    async fn update(&self, id: &str, script: NewScript) -> Result<ScriptRecord, ScriptStoreError>;

    async fn delete(&self, id: &str) -> Result<(), ScriptStoreError>;
}
