use async_trait::async_trait;
use futures::io::{AsyncReadExt, AsyncWriteExt};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, DateTime},
    gridfs::GridFsBucket,
    options::GridFsBucketOptions,
    Collection, Database,
};
use serde::{Deserialize, Serialize};

use super::{
    script_record::{NewScript, ScriptRecord},
    script_store::{ScriptStore, ScriptStoreError},
};

pub const SCRIPTS_COLLECTION: &str = "scripts";
pub const SCRIPT_BODIES_BUCKET: &str = "script_bodies";

/// Script metadata; the body lives in GridFS under `blob_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub name: String,
    pub blob_id: Bson,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl ScriptDocument {
    fn into_record(self, script: String) -> ScriptRecord {
        ScriptRecord::new(self.id.to_hex(), self.name, script).with_timestamps(
            chrono::DateTime::from_timestamp_millis(self.created_at.timestamp_millis()),
            chrono::DateTime::from_timestamp_millis(self.updated_at.timestamp_millis()),
        )
    }
}

pub fn blob_file_name(user_id: &str, script_id: &ObjectId) -> String {
    format!("{}/{}.txt", user_id, script_id.to_hex())
}

/// One user's scripts: metadata documents in MongoDB, bodies in a GridFS bucket.
pub struct CloudScriptStore {
    user_id: String,
    scripts: Collection<ScriptDocument>,
    bodies: GridFsBucket,
}

impl CloudScriptStore {
    pub fn new(database: &Database, user_id: &str) -> Self {
        let options = GridFsBucketOptions::builder()
            .bucket_name(SCRIPT_BODIES_BUCKET.to_string())
            .build();

        Self {
            user_id: user_id.to_string(),
            scripts: database.collection(SCRIPTS_COLLECTION),
            bodies: database.gridfs_bucket(options),
        }
    }

    fn parse_id(id: &str) -> Result<ObjectId, ScriptStoreError> {
        ObjectId::parse_str(id).map_err(|_| ScriptStoreError::NotFound(id.to_string()))
    }

    async fn find(&self, id: &str) -> Result<ScriptDocument, ScriptStoreError> {
        let object_id = Self::parse_id(id)?;
        self.scripts
            .find_one(doc! { "_id": object_id, "user_id": self.user_id.as_str() })
            .await?
            .ok_or_else(|| ScriptStoreError::NotFound(id.to_string()))
    }

    async fn upload_body(&self, script_id: &ObjectId, body: &str) -> Result<Bson, ScriptStoreError> {
        let mut upload = self
            .bodies
            .open_upload_stream(blob_file_name(&self.user_id, script_id))
            .await?;
        upload.write_all(body.as_bytes()).await?;
        upload.close().await?;
        Ok(upload.id().clone())
    }

    async fn download_body(&self, blob_id: &Bson) -> Result<String, ScriptStoreError> {
        let mut download = self.bodies.open_download_stream(blob_id.clone()).await?;
        let mut bytes = Vec::new();
        download.read_to_end(&mut bytes).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// An unreadable body renders as the empty-script placeholder.
    async fn body_or_placeholder(&self, document: &ScriptDocument) -> String {
        match self.download_body(&document.blob_id).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    user_id = %self.user_id,
                    script_id = %document.id,
                    "Script body unavailable: {}",
                    e
                );
                String::new()
            }
        }
    }

    async fn remove_body(&self, blob_id: Bson) {
        if let Err(e) = self.bodies.delete(blob_id).await {
            tracing::warn!(user_id = %self.user_id, "Failed to remove script body: {}", e);
        }
    }
}

#[async_trait]
impl ScriptStore for CloudScriptStore {
    async fn list(&self) -> Result<Vec<ScriptRecord>, ScriptStoreError> {
        let documents: Vec<ScriptDocument> = self
            .scripts
            .find(doc! { "user_id": self.user_id.as_str() })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?;

        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            let body = self.body_or_placeholder(&document).await;
            records.push(document.into_record(body));
        }
        Ok(records)
    }

    async fn get(&self, id: &str) -> Result<ScriptRecord, ScriptStoreError> {
        let document = self.find(id).await?;
        let body = self.body_or_placeholder(&document).await;
        Ok(document.into_record(body))
    }

    async fn save(&self, script: NewScript) -> Result<ScriptRecord, ScriptStoreError> {
        script.validate()?;

        let id = ObjectId::new();
        let blob_id = self.upload_body(&id, &script.script).await?;
        let now = DateTime::now();
        let document = ScriptDocument {
            id,
            user_id: self.user_id.clone(),
            name: script.name,
            blob_id: blob_id.clone(),
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.scripts.insert_one(&document).await {
            self.remove_body(blob_id).await;
            return Err(e.into());
        }

        tracing::info!(user_id = %self.user_id, script_id = %id, "Saved script to cloud");
        Ok(document.into_record(script.script))
    }

    async fn update(&self, id: &str, script: NewScript) -> Result<ScriptRecord, ScriptStoreError> {
        script.validate()?;

        let mut document = self.find(id).await?;
        let previous_blob = document.blob_id.clone();
        let blob_id = self.upload_body(&document.id, &script.script).await?;
        let now = DateTime::now();

        let updated = self
            .scripts
            .update_one(
                doc! { "_id": document.id, "user_id": self.user_id.as_str() },
                doc! { "$set": {
                    "name": script.name.as_str(),
                    "blob_id": blob_id.clone(),
                    "updated_at": now,
                } },
            )
            .await;
        if let Err(e) = updated {
            self.remove_body(blob_id).await;
            return Err(e.into());
        }
        self.remove_body(previous_blob).await;

        document.name = script.name;
        document.blob_id = blob_id;
        document.updated_at = now;
        Ok(document.into_record(script.script))
    }

    async fn delete(&self, id: &str) -> Result<(), ScriptStoreError> {
        let document = self.find(id).await?;

        // Document first: a body without a document is never read again.
        self.scripts
            .delete_one(doc! { "_id": document.id, "user_id": self.user_id.as_str() })
            .await?;
        self.remove_body(document.blob_id.clone()).await;

        tracing::info!(user_id = %self.user_id, script_id = %document.id, "Deleted cloud script");
        Ok(())
    }
}
