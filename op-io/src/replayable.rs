//! Replayable input: emits a recorded session's events on a wall-clock
//! schedule, then switches irrevocably to forwarding live input.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use op_core::{InputSource, ReplayControl};
use tokio::sync::{mpsc, Mutex};
use tokio::time::{sleep, Duration};

use crate::session::Session;

enum Delivered {
    Recorded(Vec<u8>),
    LiveSwitch,
}

/// An [`InputSource`] that plays back a previously recorded [`Session`]
/// before falling through to a live source.
///
/// Construct with [`ReplayableInput::new`], obtaining a
/// [`ReplayStartHandle`] the scheduler calls once via
/// [`ReplayControl::start_replay`] at run startup. Reading before replay
/// has started blocks until the first scheduled event (or the live
/// switch, if the session was empty).
pub struct ReplayableInput {
    live: Box<dyn InputSource>,
    events: mpsc::UnboundedReceiver<Delivered>,
    switched_to_live: bool,
}

impl ReplayableInput {
    /// Build a replayable source from a loaded session and the live
    /// source to fall through to once replay is exhausted.
    pub fn new(session: Session, live: Box<dyn InputSource>) -> (Self, ReplayStartHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = ReplayStartHandle {
            session: Arc::new(session),
            sender: tx,
            started: Arc::new(Mutex::new(false)),
        };
        (
            Self {
                live,
                events: rx,
                switched_to_live: false,
            },
            handle,
        )
    }
}

#[async_trait]
impl InputSource for ReplayableInput {
    async fn read_chunk(&mut self) -> io::Result<Option<Vec<u8>>> {
        if self.switched_to_live {
            return self.live.read_chunk().await;
        }
        match self.events.recv().await {
            Some(Delivered::Recorded(bytes)) => Ok(Some(bytes)),
            Some(Delivered::LiveSwitch) | None => {
                self.switched_to_live = true;
                self.live.read_chunk().await
            }
        }
    }

    fn set_raw_mode(&mut self, enabled: bool) -> io::Result<()> {
        if self.switched_to_live {
            self.live.set_raw_mode(enabled)
        } else {
            // The scheduler owns timing during replay; raw-mode toggles
            // from Ops are ignored until the live switch.
            Ok(())
        }
    }
}

/// The scheduler's handle for kicking off replay. Separate from
/// [`ReplayableInput`] itself so the scheduler doesn't need mutable
/// access to the `InputSource` half Ops are reading.
#[derive(Clone)]
pub struct ReplayStartHandle {
    session: Arc<Session>,
    sender: mpsc::UnboundedSender<Delivered>,
    started: Arc<Mutex<bool>>,
}

#[async_trait]
impl ReplayControl for ReplayStartHandle {
    async fn start_replay(&self, startup_delay_ms: u64) {
        {
            let mut started = self.started.lock().await;
            if *started {
                return;
            }
            *started = true;
        }

        let session = self.session.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(startup_delay_ms)).await;
            let mut previous_ms = 0u64;
            for event in &session.events {
                let target_ms = event.timestamp_ms.as_millis();
                let gap = target_ms.saturating_sub(previous_ms);
                if gap > 0 {
                    sleep(Duration::from_millis(gap)).await;
                }
                previous_ms = target_ms;
                if sender
                    .send(Delivered::Recorded(event.data.clone().into_bytes()))
                    .is_err()
                {
                    return;
                }
            }
            let _ = sender.send(Delivered::LiveSwitch);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use op_core::DurationMs;
    use std::collections::VecDeque as Deque;

    struct FixedInput(Deque<Vec<u8>>);

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
    async fn emits_recorded_events_then_switches_to_live() {
        let mut session = Session::new(chrono::Utc::now());
        session.push(crate::session::InputEvent::new(DurationMs::ZERO, "abc"));
        session.push(crate::session::InputEvent::new(DurationMs::from_millis(20), "\n"));

        let live = FixedInput(Deque::from([b"live-byte".to_vec()]));
        let (mut replayable, handle) = ReplayableInput::new(session, Box::new(live));

        handle.start_replay(0).await;

        assert_eq!(replayable.read_chunk().await.unwrap(), Some(b"abc".to_vec()));
        assert_eq!(replayable.read_chunk().await.unwrap(), Some(b"\n".to_vec()));
        assert_eq!(
            replayable.read_chunk().await.unwrap(),
            Some(b"live-byte".to_vec())
        );
        assert!(replayable.switched_to_live);
    }

    #[tokio::test]
    async fn raw_mode_toggles_are_ignored_until_live_switch() {
        let session = Session::new(chrono::Utc::now());
        let live = FixedInput(Deque::new());
        let (mut replayable, handle) = ReplayableInput::new(session, Box::new(live));
        handle.start_replay(0).await;

        // Empty session: the first read should switch to live immediately.
        assert_eq!(replayable.read_chunk().await.unwrap(), None);
        assert!(replayable.set_raw_mode(true).is_ok());
    }
}
