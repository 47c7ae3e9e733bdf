//! Debounced autosave driver for the note editor.
//!
//! Contract: commit the latest pending edit after a quiet period, reset
//! the timer on every keystroke, and flush whatever is pending when the
//! editor goes away. Successive edits to the same note coalesce into one
//! commit; switching to a different note commits the previous edit
//! immediately so at most one note's edit is ever pending.
//!
//! The commit sink is an injected closure (typically calling the note
//! store's `update`), which keeps the store itself synchronous and
//! timer-agnostic.

use std::time::Duration;

use jotter_core::note::UpdateNote;
use jotter_core::types::NoteId;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

enum Msg {
    Edit(NoteId, UpdateNote),
    Flush(oneshot::Sender<()>),
}

/// Handle to a spawned autosave worker.
///
/// Dropping the handle closes the channel; the worker commits any
/// pending edit before exiting, so nothing typed is lost on unmount.
pub struct Autosave {
    tx: mpsc::UnboundedSender<Msg>,
    worker: JoinHandle<()>,
}

impl Autosave {
    /// Spawn the worker. `commit` is called once per settled edit.
    pub fn spawn<F>(delay: Duration, mut commit: F) -> Self
    where
        F: FnMut(NoteId, UpdateNote) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let worker = tokio::spawn(async move {
            let mut pending: Option<(NoteId, UpdateNote)> = None;
            let mut deadline = Instant::now();

            loop {
                let msg = if pending.is_some() {
                    tokio::select! {
                        msg = rx.recv() => msg,
                        () = sleep_until(deadline) => {
                            if let Some((id, patch)) = pending.take() {
                                commit(id, patch);
                            }
                            continue;
                        }
                    }
                } else {
                    rx.recv().await
                };

                match msg {
                    // Channel closed: the handle was dropped.
                    None => break,
                    Some(Msg::Edit(id, patch)) => {
                        match &mut pending {
                            Some((pending_id, pending_patch)) if *pending_id == id => {
                                pending_patch.merge(patch);
                            }
                            Some(_) => {
                                // Switched notes: commit the previous
                                // note's edit right away.
                                let (prev_id, prev_patch) =
                                    pending.take().unwrap_or_default();
                                commit(prev_id, prev_patch);
                                pending = Some((id, patch));
                            }
                            None => pending = Some((id, patch)),
                        }
                        // Every keystroke restarts the quiet period.
                        deadline = Instant::now() + delay;
                    }
                    Some(Msg::Flush(ack)) => {
                        if let Some((id, patch)) = pending.take() {
                            commit(id, patch);
                        }
                        let _ = ack.send(());
                    }
                }
            }

            // Final flush on unmount.
            if let Some((id, patch)) = pending.take() {
                commit(id, patch);
            }
        });

        Self { tx, worker }
    }

    /// Record a keystroke-level edit. Never blocks.
    pub fn edit(&self, id: NoteId, patch: UpdateNote) {
        let _ = self.tx.send(Msg::Edit(id, patch));
    }

    /// Commit any pending edit now and wait until it has been handed to
    /// the sink.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Msg::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Close the channel and wait for the worker's final flush.
    pub async fn close(self) {
        drop(self.tx);
        let _ = self.worker.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(500);

    /// Spawn an autosave worker whose commits land in a shared log.
    fn recording_autosave() -> (Autosave, Arc<Mutex<Vec<(NoteId, UpdateNote)>>>) {
        let log: Arc<Mutex<Vec<(NoteId, UpdateNote)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let autosave = Autosave::spawn(DELAY, move |id, patch| {
            sink.lock().unwrap().push((id, patch));
        });
        (autosave, log)
    }

    fn content(text: &str) -> UpdateNote {
        UpdateNote {
            title: None,
            content: Some(text.into()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn commits_after_quiet_period() {
        let (autosave, log) = recording_autosave();

        autosave.edit("n1".into(), content("hello"));
        sleep(DELAY * 2).await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, "n1");
        assert_eq!(log[0].1.content.as_deref(), Some("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_reset_the_timer_and_coalesce() {
        let (autosave, log) = recording_autosave();

        autosave.edit("n1".into(), content("h"));
        sleep(DELAY / 2).await;
        autosave.edit("n1".into(), content("he"));
        sleep(DELAY / 2).await;
        autosave.edit("n1".into(), content("hello"));

        // The quiet period restarted on each keystroke, so nothing has
        // committed yet even though more than DELAY has elapsed overall.
        sleep(DELAY / 2).await;
        assert!(log.lock().unwrap().is_empty());

        sleep(DELAY).await;
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1, "coalesced into a single commit");
        assert_eq!(log[0].1.content.as_deref(), Some("hello"));
    }

    #[tokio::test(start_paused = true)]
    async fn later_fields_win_when_coalescing() {
        let (autosave, log) = recording_autosave();

        autosave.edit(
            "n1".into(),
            UpdateNote {
                title: Some("Draft".into()),
                content: None,
            },
        );
        autosave.edit("n1".into(), content("body"));
        sleep(DELAY * 2).await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1.title.as_deref(), Some("Draft"));
        assert_eq!(log[0].1.content.as_deref(), Some("body"));
    }

    #[tokio::test(start_paused = true)]
    async fn switching_notes_commits_previous_immediately() {
        let (autosave, log) = recording_autosave();

        autosave.edit("n1".into(), content("first"));
        autosave.edit("n2".into(), content("second"));
        // Give the worker a chance to process both messages; well under
        // the debounce delay.
        sleep(Duration::from_millis(1)).await;

        {
            let log = log.lock().unwrap();
            assert_eq!(log.len(), 1, "previous note committed on switch");
            assert_eq!(log[0].0, "n1");
        }

        sleep(DELAY * 2).await;
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].0, "n2");
    }

    #[tokio::test(start_paused = true)]
    async fn flush_commits_without_waiting() {
        let (autosave, log) = recording_autosave();

        autosave.edit("n1".into(), content("urgent"));
        autosave.flush().await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1.content.as_deref(), Some("urgent"));
    }

    #[tokio::test(start_paused = true)]
    async fn flush_with_nothing_pending_is_a_noop() {
        let (autosave, log) = recording_autosave();
        autosave.flush().await;
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn close_flushes_pending_edit() {
        let (autosave, log) = recording_autosave();

        autosave.edit("n1".into(), content("unsaved"));
        autosave.close().await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].1.content.as_deref(), Some("unsaved"));
    }
}
