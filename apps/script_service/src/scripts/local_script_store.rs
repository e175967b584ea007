use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use super::{
    script_record::{NewScript, ScriptRecord},
    script_store::{ScriptStore, ScriptStoreError},
};

/// One line of the saved scripts file.
#[derive(Debug, Serialize, Deserialize)]
struct StoredLine {
    #[serde(default)]
    name: String,
    #[serde(default)]
    script: String,
}

/// Scripts kept in a newline-delimited JSON file.
///
/// Saving appends a line; update and delete rewrite the file. A record's id
/// is its zero-based position among the non-blank lines, so ids shift after
/// a delete.
pub struct LocalScriptStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalScriptStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_contents(&self) -> Result<String, ScriptStoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn load(&self) -> Result<Vec<StoredLine>, ScriptStoreError> {
        Self::parse(&self.read_contents().await?)
    }

    fn parse(contents: &str) -> Result<Vec<StoredLine>, ScriptStoreError> {
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|source| ScriptStoreError::Corrupt {
                    line: index + 1,
                    source,
                })
            })
            .collect()
    }

    async fn rewrite(&self, lines: &[StoredLine]) -> Result<(), ScriptStoreError> {
        let mut buffer = String::new();
        for line in lines {
            buffer.push_str(&serde_json::to_string(line)?);
            buffer.push('\n');
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, buffer).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn parse_id(id: &str, len: usize) -> Result<usize, ScriptStoreError> {
        id.parse::<usize>()
            .ok()
            .filter(|index| *index < len)
            .ok_or_else(|| ScriptStoreError::NotFound(id.to_string()))
    }

    fn to_record(index: usize, line: StoredLine) -> ScriptRecord {
        ScriptRecord::new(index.to_string(), line.name, line.script)
    }
}

#[async_trait]
impl ScriptStore for LocalScriptStore {
    async fn list(&self) -> Result<Vec<ScriptRecord>, ScriptStoreError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .enumerate()
            .map(|(index, line)| Self::to_record(index, line))
            .collect())
    }

    async fn get(&self, id: &str) -> Result<ScriptRecord, ScriptStoreError> {
        let _guard = self.lock.lock().await;
        let mut lines = self.load().await?;
        let index = Self::parse_id(id, lines.len())?;
        Ok(Self::to_record(index, lines.swap_remove(index)))
    }

    async fn save(&self, script: NewScript) -> Result<ScriptRecord, ScriptStoreError> {
        script.validate()?;
        let _guard = self.lock.lock().await;

        let contents = self.read_contents().await?;
        let index = Self::parse(&contents)?.len();
        let line = StoredLine {
            name: script.name,
            script: script.script,
        };

        // A last line without its terminator would swallow the appended record.
        let mut encoded = String::new();
        if !contents.is_empty() && !contents.ends_with('\n') {
            encoded.push('\n');
        }
        encoded.push_str(&serde_json::to_string(&line)?);
        encoded.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(encoded.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(path = %self.path.display(), index, "Saved script locally");
        Ok(Self::to_record(index, line))
    }

    async fn update(&self, id: &str, script: NewScript) -> Result<ScriptRecord, ScriptStoreError> {
        script.validate()?;
        let _guard = self.lock.lock().await;

        let mut lines = self.load().await?;
        let index = Self::parse_id(id, lines.len())?;
        lines[index] = StoredLine {
            name: script.name.clone(),
            script: script.script.clone(),
        };
        self.rewrite(&lines).await?;

        Ok(Self::to_record(
            index,
            StoredLine {
                name: script.name,
                script: script.script,
            },
        ))
    }

    async fn delete(&self, id: &str) -> Result<(), ScriptStoreError> {
        let _guard = self.lock.lock().await;

        let mut lines = self.load().await?;
        let index = Self::parse_id(id, lines.len())?;
        lines.remove(index);
        self.rewrite(&lines).await?;

        tracing::info!(path = %self.path.display(), index, "Deleted local script");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripts::script_record::{EMPTY_SCRIPT, UNNAMED_SCRIPT};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalScriptStore {
        LocalScriptStore::new(dir.path().join("saved_scripts.json"))
    }

    #[tokio::test]
    async fn missing_file_lists_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_list_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let saved = store
            .save(NewScript::new("Intro to Rust", "Hello and welcome!"))
            .await
            .unwrap();
        assert_eq!(saved.id, "0");

        let listed = store.list().await.unwrap();
        assert_eq!(listed, vec![saved]);
        assert_eq!(listed[0].name, "Intro to Rust");
        assert_eq!(listed[0].script, "Hello and welcome!");
    }

    #[tokio::test]
    async fn file_is_newline_delimited_json() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(NewScript::new("a", "first")).await.unwrap();
        store.save(NewScript::new("b", "second")).await.unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "{\"name\":\"a\",\"script\":\"first\"}\n{\"name\":\"b\",\"script\":\"second\"}\n"
        );
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        for (name, body) in [("one", "1"), ("two", "2"), ("three", "3")] {
            store.save(NewScript::new(name, body)).await.unwrap();
        }

        store.delete("1").await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[tokio::test]
    async fn delete_out_of_range_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(NewScript::new("one", "1")).await.unwrap();

        for id in ["1", "-1", "abc"] {
            assert!(matches!(
                store.delete(id).await,
                Err(ScriptStoreError::NotFound(_))
            ));
        }
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_name_or_body_is_rejected_before_writing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        assert!(matches!(
            store.save(NewScript::new("", "body")).await,
            Err(ScriptStoreError::Validation(_))
        ));
        assert!(matches!(
            store.save(NewScript::new("name", "   ")).await,
            Err(ScriptStoreError::Validation(_))
        ));
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn update_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(NewScript::new("one", "1")).await.unwrap();
        store.save(NewScript::new("two", "2")).await.unwrap();

        store
            .update("0", NewScript::new("one (edited)", "1b"))
            .await
            .unwrap();

        let first = store.get("0").await.unwrap();
        assert_eq!(first.name, "one (edited)");
        assert_eq!(first.script, "1b");
        assert_eq!(store.get("1").await.unwrap().name, "two");
    }

    #[tokio::test]
    async fn reads_lines_written_by_other_tools() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(
            store.path(),
            "{\"name\": \"legacy\", \"script\": \"old body\"}\n\n{\"script\": \"no name\"}\n",
        )
        .unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "legacy");
        assert_eq!(listed[1].name, UNNAMED_SCRIPT);
        assert_eq!(listed[1].script, "no name");
    }

    #[tokio::test]
    async fn missing_body_renders_placeholder() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "{\"name\": \"draft\"}\n").unwrap();

        let record = store.get("0").await.unwrap();
        assert_eq!(record.name, "draft");
        assert_eq!(record.script, EMPTY_SCRIPT);
    }

    #[tokio::test]
    async fn save_after_unterminated_last_line_keeps_both_records() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "{\"name\":\"legacy\",\"script\":\"body\"}").unwrap();

        let saved = store.save(NewScript::new("new", "text")).await.unwrap();
        assert_eq!(saved.id, "1");

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "legacy");
        assert_eq!(listed[1].name, "new");
        assert_eq!(listed[1].script, "text");
    }

    #[tokio::test]
    async fn malformed_line_reports_its_position() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        std::fs::write(store.path(), "{\"name\":\"ok\",\"script\":\"x\"}\nnot json\n").unwrap();

        match store.list().await {
            Err(ScriptStoreError::Corrupt { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt error, got {other:?}"),
        }
    }
}
