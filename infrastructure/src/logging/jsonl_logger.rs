//! JSONL transcript writer.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `seq`, `type`
//! and `timestamp` next to the event payload.

use arena_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex`. Every line is flushed as it is written.
pub struct JsonlConversationLogger {
    writer: Mutex<Transcript>,
    path: PathBuf,
}

struct Transcript {
    out: BufWriter<File>,
    seq: u64,
}

impl JsonlConversationLogger {
    /// Create (or truncate) a transcript at `path`, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Append to an existing transcript, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Self {
            writer: Mutex::new(Transcript {
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

        let mut record = Map::new();
        record.insert("seq".to_string(), Value::from(seq));
        record.insert("type".to_string(), Value::from(event.event_type));
        record.insert("timestamp".to_string(), Value::String(timestamp));
        match event.payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("data".to_string(), other);
            }
        }
        Value::Object(record)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut transcript) = self.writer.lock() else {
            return;
        };

        transcript.seq += 1;
        let record = Self::record(event, transcript.seq);
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Err(e) = writeln!(transcript.out, "{}", line).and_then(|_| transcript.out.flush()) {
            warn!("Could not write transcript {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut transcript) = self.writer.lock() {
            let _ = transcript.out.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new(
            "phase_started",
            json!({ "phase": "proposal", "delegates": ["D1", "D2"] }),
        ));
        logger.log(ConversationEvent::new(
            "delegate_response",
            json!({ "delegate": "D1", "text": "Ban cars downtown", "attempts": 1 }),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "phase_started");
        assert_eq!(records[0]["seq"], 1);
        assert_eq!(records[0]["delegates"][1], "D2");
        assert_eq!(records[1]["seq"], 2);
        assert_eq!(records[1]["text"], "Ban cars downtown");
        assert!(records.iter().all(|r| r["timestamp"].is_string()));
    }

    #[test]
    fn test_payload_cannot_override_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debate.jsonl");
        let logger = JsonlConversationLogger::create(&path).unwrap();

        logger.log(ConversationEvent::new("vote", json!({ "type": "spoofed" })));
        logger.log(ConversationEvent::new("note", json!("plain string")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "vote");
        assert_eq!(records[1]["data"], "plain string");
    }

    #[test]
    fn test_append_keeps_previous_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("debate.jsonl");

        let first = JsonlConversationLogger::create(&path).unwrap();
        first.log(ConversationEvent::new("debate_finished", json!({ "winner": "D2" })));
        drop(first);

        let second = JsonlConversationLogger::append(&path).unwrap();
        second.log(ConversationEvent::new("phase_started", json!({ "phase": "proposal" })));
        drop(second);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["winner"], "D2");
    }

    #[test]
    fn test_create_fails_on_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlConversationLogger::create(dir.path()).is_err());
    }
}
