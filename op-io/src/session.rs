//! The recorded session: an ordered, timestamped list of keystroke events,
//! and its on-disk save/load path.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use op_core::DurationMs;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

/// The only session-file format this crate has ever written. Carried in
/// every saved file so a future format can detect and migrate it.
pub const SESSION_FORMAT_VERSION: &str = "1";

/// One recorded chunk of input, timestamped relative to the session's
/// wall-clock start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Delay since session start, in milliseconds.
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: DurationMs,
    /// The keystroke bytes received, as UTF-8.
    pub data: String,
}

impl InputEvent {
    /// Construct an event at the given offset from session start.
    pub fn new(timestamp_ms: DurationMs, data: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            data: data.into(),
        }
    }
}

/// An ordered sequence of [`InputEvent`]s recorded from one interactive
/// session, plus the format version and the wall-clock time recording
/// began.
///
/// Invariant: `events` is sorted by `timestamp_ms`, non-decreasing —
/// the order chunks actually arrived in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Format version this session was written with.
    pub version: String,
    /// Wall-clock time recording started, ISO-8601.
    pub timestamp: DateTime<Utc>,
    /// The recorded events, in arrival order.
    pub events: Vec<InputEvent>,
}

impl Session {
    /// Start a new, empty session with the current format version.
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            version: SESSION_FORMAT_VERSION.to_string(),
            timestamp: started_at,
            events: Vec::new(),
        }
    }

    /// Append an event. Panics if this would violate monotonicity —
    /// recorders must only ever call this with non-decreasing timestamps,
    /// since that invariant is what makes replay scheduling meaningful.
    pub fn push(&mut self, event: InputEvent) {
        if let Some(last) = self.events.last() {
            debug_assert!(
                last.timestamp_ms <= event.timestamp_ms,
                "session event timestamps must be non-decreasing"
            );
        }
        self.events.push(event);
    }

    /// Serialize this session as pretty-printed JSON to `path`, atomically:
    /// written to a sibling temp file and renamed into place, so a crash
    /// mid-write never leaves a partial session file where `path` expects
    /// a complete one.
    ///
    /// This is a deliberate departure from how this crate's sibling state
    /// stores write their files — session data is the one artifact whose
    /// loss on crash is unacceptable, since it is the only record of a
    /// live terminal session.
    pub async fn save_atomic(&self, path: &Path) -> io::Result<()> {
        let body = serde_json::to_vec_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let temp_name = format!(
            ".{}.{}.tmp",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("session"),
            uuid::Uuid::new_v4()
        );
        let temp_path = dir.join(temp_name);

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(&body).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }

    /// Load a session previously written by [`Session::save_atomic`].
    pub async fn load(path: &Path) -> io::Result<Self> {
        let body = tokio::fs::read(path).await?;
        serde_json::from_slice(&body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip_save_then_load_is_byte_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::new(Utc::now());
        session.push(InputEvent::new(DurationMs::ZERO, "abc"));
        session.push(InputEvent::new(DurationMs::from_millis(120), "\n"));

        session.save_atomic(&path).await.unwrap();
        let loaded = Session::load(&path).await.unwrap();

        assert_eq!(loaded.version, session.version);
        assert_eq!(loaded.timestamp.timestamp_millis(), session.timestamp.timestamp_millis());
        assert_eq!(loaded.events, session.events);
    }

    #[test]
    fn events_must_be_monotonic() {
        let mut session = Session::new(Utc::now());
        session.push(InputEvent::new(DurationMs::from_millis(10), "a"));
        session.push(InputEvent::new(DurationMs::from_millis(20), "b"));
        assert_eq!(session.events.len(), 2);
    }

    #[tokio::test]
    async fn save_never_leaves_a_partial_file_name_at_the_target_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::new(Utc::now());
        session.save_atomic(&path).await.unwrap();

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["session.json"]);
    }
}
