//! Recordable input: a transparent proxy over live stdin that appends a
//! timestamped [`InputEvent`] for every chunk it forwards.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use op_core::{InputSource, SessionRecorder};
use tokio::sync::Mutex;

use crate::session::{InputEvent, Session};
use op_core::DurationMs;

/// Wraps a live [`InputSource`], recording every chunk it forwards into an
/// in-memory [`Session`] before handing the chunk on unchanged.
///
/// The wrapped source and the recorded session are split so the scheduler
/// can hold a [`SessionRecorder`] handle (for the save-on-empty-stack
/// lifecycle hook, §4.2) independently of the [`InputSource`] handle Ops
/// read through.
pub struct RecordableInput {
    inner: Box<dyn InputSource>,
    started_at: Instant,
    session: Arc<Mutex<Session>>,
}

impl RecordableInput {
    /// Wrap `inner`, starting a fresh session clocked from now.
    pub fn new(inner: Box<dyn InputSource>) -> (Self, RecordableSessionHandle) {
        let session = Arc::new(Mutex::new(Session::new(chrono::Utc::now())));
        let handle = RecordableSessionHandle {
            session: session.clone(),
            save_path: None,
        };
        (
            Self {
                inner,
                started_at: Instant::now(),
                session,
            },
            handle,
        )
    }
}

#[async_trait]
impl InputSource for RecordableInput {
    async fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        let chunk = self.inner.read_chunk().await?;
        if let Some(ref bytes) = chunk {
            let elapsed = DurationMs::from(self.started_at.elapsed());
            let data = String::from_utf8_lossy(bytes).into_owned();
            self.session.lock().await.push(InputEvent::new(elapsed, data));
        }
        Ok(chunk)
    }

    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()> {
        self.inner.set_raw_mode(enabled)
    }
}

/// The half of a [`RecordableInput`] the scheduler holds, so it can save
/// the session to its configured path once the run's stack empties,
/// without needing mutable access to the [`InputSource`] Ops are reading.
pub struct RecordableSessionHandle {
    session: Arc<Mutex<Session>>,
    save_path: Option<PathBuf>,
}

impl RecordableSessionHandle {
    /// Attach the path this session will be saved to.
    pub fn with_save_path(mut self, path: PathBuf) -> Self {
        self.save_path = Some(path);
        self
    }
}

#[async_trait]
impl SessionRecorder for RecordableSessionHandle {
    async fn save(&self) -> io::Result<()> {
        let Some(path) = self.save_path.as_ref() else {
            return Ok(());
        };
        let session = self.session.lock().await;
        session.save_atomic(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct FixedInput(VecDeque<Vec<u8>>);

    #[async_trait]
    impl InputSource for FixedInput {
        async fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
            Ok(self.0.pop_front())
        }

        fn set_raw_mode(&mut self, _enabled: bool) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn forwards_chunks_unchanged_while_recording_them() {
        let inner = FixedInput(VecDeque::from([b"abc".to_vec(), b"\n".to_vec()]));
        let (mut recordable, handle) = RecordableInput::new(Box::new(inner));

        assert_eq!(recordable.read_chunk().await.unwrap(), Some(b"abc".to_vec()));
        assert_eq!(recordable.read_chunk().await.unwrap(), Some(b"\n".to_vec()));
        assert_eq!(recordable.read_chunk().await.unwrap(), None);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let handle = handle.with_save_path(path.clone());
        handle.save().await.unwrap();

        let loaded = Session::load(&path).await.unwrap();
        assert_eq!(loaded.events.len(), 2);
        assert_eq!(loaded.events[0].data, "abc");
        assert_eq!(loaded.events[1].data, "\n");
    }

    #[tokio::test]
    async fn timestamps_are_non_decreasing() {
        let inner = FixedInput(VecDeque::from([b"a".to_vec(), b"b".to_vec()]));
        let (mut recordable, handle) = RecordableInput::new(Box::new(inner));
        recordable.read_chunk().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        recordable.read_chunk().await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let handle = handle.with_save_path(path.clone());
        handle.save().await.unwrap();
        let loaded = Session::load(&path).await.unwrap();
        assert!(loaded.events[0].timestamp_ms <= loaded.events[1].timestamp_ms);
    }
}
