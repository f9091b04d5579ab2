//! Utterance playback through a child process.
//!
//! One `tokio::process::Child` per utterance. A supervisor task writes the
//! text to the child's stdin, awaits its exit and then fires the completion
//! callback. [`Playback::stop`] cancels the supervisor, which kills and
//! reaps the child; its callback reports [`UtteranceEnd::Interrupted`].

use std::process::{ExitStatus, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use studyaid_core::{UtteranceCallback, UtteranceEnd};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::VoiceError;

struct Active {
    id: u64,
    cancel: CancellationToken,
}

type Slot = Arc<Mutex<Option<Active>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle over the single active utterance process.
pub struct Playback {
    runtime: Handle,
    current: Slot,
    next_id: AtomicU64,
}

impl Playback {
    /// Supervise utterances on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            current: Slot::default(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Whether an utterance process is running.
    pub fn is_playing(&self) -> bool {
        lock(&self.current).is_some()
    }

    /// Spawn `command`, feed it `text` on stdin and call `on_done` on exit.
    ///
    /// Any active utterance is stopped first. If spawning fails, `on_done`
    /// is dropped without being called.
    pub fn play(
        &self,
        mut command: Command,
        program: &str,
        text: String,
        on_done: UtteranceCallback,
    ) -> Result<(), VoiceError> {
        self.stop();

        // The child's reaper registers with the runtime that spawns it.
        let _runtime = self.runtime.enter();
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VoiceError::Spawn {
                program: program.to_string(),
                source,
            })?;
        let stdin = child.stdin.take();

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let cancel = CancellationToken::new();
        *lock(&self.current) = Some(Active {
            id,
            cancel: cancel.clone(),
        });

        tracing::debug!(utterance = id, program, "Utterance process started");

        let current = Arc::clone(&self.current);
        self.runtime.spawn(async move {
            let end = supervise(id, child, stdin, text, &cancel).await;

            {
                let mut slot = lock(&current);
                if slot.as_ref().is_some_and(|active| active.id == id) {
                    *slot = None;
                }
            }

            tracing::debug!(utterance = id, ?end, "Utterance process ended");
            on_done(end);
        });

        Ok(())
    }

    /// Kill the active utterance process, if any.
    pub fn stop(&self) {
        if let Some(active) = lock(&self.current).take() {
            active.cancel.cancel();
        }
    }
}

/// Feed the child and wait for it, unless `cancel` fires first.
async fn supervise(
    id: u64,
    mut child: Child,
    stdin: Option<ChildStdin>,
    text: String,
    cancel: &CancellationToken,
) -> UtteranceEnd {
    let exited = tokio::select! {
        () = cancel.cancelled() => None,
        status = feed_and_wait(id, &mut child, stdin, text) => Some(status),
    };

    match exited {
        None => {
            if let Err(e) = child.kill().await {
                // Already exited between the last wake-up and now.
                tracing::debug!(utterance = id, error = %e, "Kill failed");
            }
            UtteranceEnd::Interrupted
        }
        Some(Ok(status)) => exit_to_end(status),
        Some(Err(e)) => UtteranceEnd::Failed(e.to_string()),
    }
}

async fn feed_and_wait(
    id: u64,
    child: &mut Child,
    stdin: Option<ChildStdin>,
    text: String,
) -> std::io::Result<ExitStatus> {
    if let Some(mut stdin) = stdin {
        // A child that exits early closes the pipe; its exit status says why.
        if let Err(e) = stdin.write_all(text.as_bytes()).await {
            tracing::debug!(utterance = id, error = %e, "Could not write utterance text");
        }
        // Dropping stdin sends EOF.
    }
    child.wait().await
}

fn exit_to_end(status: ExitStatus) -> UtteranceEnd {
    if status.success() {
        UtteranceEnd::Finished
    } else {
        UtteranceEnd::Failed(format!("engine exited with {status}"))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
    use tokio::time::timeout;

    fn shell(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }

    fn recorder() -> (UtteranceCallback, UnboundedReceiver<UtteranceEnd>) {
        let (tx, rx) = unbounded_channel();
        let callback: UtteranceCallback = Box::new(move |end| {
            let _ = tx.send(end);
        });
        (callback, rx)
    }

    async fn next_end(rx: &mut UnboundedReceiver<UtteranceEnd>) -> UtteranceEnd {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("utterance did not end")
            .expect("callback dropped")
    }

    #[tokio::test]
    async fn test_finished_process_reports_finished() {
        let playback = Playback::new(Handle::current());
        let (on_done, mut rx) = recorder();

        playback
            .play(shell("cat > /dev/null"), "sh", "hello".to_string(), on_done)
            .unwrap();

        assert_eq!(next_end(&mut rx).await, UtteranceEnd::Finished);
        assert!(!playback.is_playing());
    }

    #[tokio::test]
    async fn test_failing_process_reports_failed() {
        let playback = Playback::new(Handle::current());
        let (on_done, mut rx) = recorder();

        playback
            .play(shell("exit 3"), "sh", String::new(), on_done)
            .unwrap();

        assert!(matches!(next_end(&mut rx).await, UtteranceEnd::Failed(_)));
    }

    #[tokio::test]
    async fn test_stop_interrupts_without_polling_delay() {
        let playback = Playback::new(Handle::current());
        let (on_done, mut rx) = recorder();

        playback
            .play(shell("sleep 30"), "sh", String::new(), on_done)
            .unwrap();
        assert!(playback.is_playing());

        playback.stop();
        let end = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(end, Some(UtteranceEnd::Interrupted));
        assert!(!playback.is_playing());

        // Idempotent
        playback.stop();
    }

    #[tokio::test]
    async fn test_new_play_interrupts_previous() {
        let playback = Playback::new(Handle::current());
        let (first, mut first_rx) = recorder();
        let (second, mut second_rx) = recorder();

        playback
            .play(shell("sleep 30"), "sh", String::new(), first)
            .unwrap();
        playback
            .play(shell("cat > /dev/null"), "sh", "x".to_string(), second)
            .unwrap();

        assert_eq!(next_end(&mut first_rx).await, UtteranceEnd::Interrupted);
        assert_eq!(next_end(&mut second_rx).await, UtteranceEnd::Finished);
    }

    #[test]
    fn test_play_from_a_plain_thread() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let playback = Playback::new(runtime.handle().clone());
        let (on_done, mut rx) = recorder();

        // No runtime context on this thread; the held handle supplies it.
        playback
            .play(shell("exit 0"), "sh", String::new(), on_done)
            .unwrap();

        let end = runtime.block_on(next_end(&mut rx));
        assert_eq!(end, UtteranceEnd::Finished);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let playback = Playback::new(Handle::current());
        let (on_done, _rx) = recorder();

        let err = playback
            .play(
                Command::new("/nonexistent/studyaid-speech"),
                "studyaid-speech",
                String::new(),
                on_done,
            )
            .unwrap_err();
        assert!(matches!(err, VoiceError::Spawn { .. }));
        assert!(!playback.is_playing());
    }
}
