//! JSONL file writer for chat transcript events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying its `type`, a
//! `timestamp` and a per-run `seq` number. Runs append to the same file.

use serde_json::{Map, Value};
use sofia_application::{ConversationEvent, ConversationLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct TranscriptWriter {
    out: BufWriter<File>,
    seq: u64,
}

/// Transcript logger that appends one JSON object per line.
pub struct JsonlConversationLogger {
    writer: Mutex<TranscriptWriter>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(TranscriptWriter {
                out: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: ConversationEvent, seq: u64) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let mut map = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        map.insert("type".to_string(), Value::String(event.event_type.to_string()));
        map.insert("timestamp".to_string(), Value::String(timestamp));
        map.insert("seq".to_string(), Value::from(seq));
        Value::Object(map)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        writer.seq += 1;
        let record = Self::record(event, writer.seq);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };
        // Flushed per line so a crash keeps every finished turn
        if let Err(e) = writeln!(writer.out, "{}", line).and_then(|()| writer.out.flush()) {
            warn!(path = %self.path.display(), error = %e, "failed to write transcript");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sofia_domain::{DocumentSource, ModelSelection, Provider, SourceKind};

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_chat_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcripts").join("chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        let selection = ModelSelection::default_for(Provider::Groq);
        let source = DocumentSource::new(SourceKind::Txt, "notes.txt");
        logger.log(ConversationEvent::chat_started(&selection, &source, 5));
        logger.log(ConversationEvent::user_message("What is it about?"));
        logger.log(ConversationEvent::ai_message(&selection.model, "Cats."));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "chat_started");
        assert_eq!(lines[0]["source_kind"], "txt");
        assert_eq!(lines[1]["text"], "What is it about?");
        assert_eq!(lines[2]["type"], "ai_message");
        assert_eq!(lines[2]["bytes"], 5);
        for (i, line) in lines.iter().enumerate() {
            assert_eq!(line["seq"], (i + 1) as u64);
            assert!(line["timestamp"].is_string());
        }
    }

    #[test]
    fn test_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");

        for _ in 0..2 {
            let logger = JsonlConversationLogger::open(&path).unwrap();
            logger.log(ConversationEvent::history_cleared(4));
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["seq"], 1);
        assert_eq!(lines[1]["dropped_messages"], 4);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();
        logger.log(ConversationEvent::new("note", serde_json::json!("just a string")));

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlConversationLogger::open(blocker.join("chat.jsonl")).is_err());
    }
}
