//! Interaction plumbing
//!
//! Host event handlers push [`ForumCommand`]s into a bounded channel; the page
//! task drains it into the forum session. Search keystrokes go through a
//! [`Debouncer`] first so the list re-renders once per pause in typing.

use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use zen_forum::{ForumCommand, ForumConfig, ForumSession, ForumSurface};
use zen_ui::Debouncer;

/// Default command queue depth
pub const COMMAND_QUEUE_DEPTH: usize = 64;

/// Bounded command channel
#[must_use]
pub fn command_channel(
    capacity: usize,
) -> (mpsc::Sender<ForumCommand>, mpsc::Receiver<ForumCommand>) {
    mpsc::channel(capacity.max(1))
}

/// Debounced search box
#[derive(Debug, Clone)]
pub struct SearchInput {
    debouncer: Debouncer<String>,
}

impl SearchInput {
    /// Forward settled search text to `commands` after `delay` of quiet
    #[must_use]
    pub fn new(delay: Duration, commands: mpsc::Sender<ForumCommand>) -> Self {
        let debouncer = Debouncer::new(delay, move |raw: String| {
            forward(&commands, ForumCommand::Search(raw));
        });
        Self { debouncer }
    }

    /// Search box using the forum's configured quiet period
    #[must_use]
    pub fn from_config(config: &ForumConfig, commands: mpsc::Sender<ForumCommand>) -> Self {
        Self::new(config.search_debounce(), commands)
    }

    /// Quiet period
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.debouncer.delay()
    }

    /// Input event with the box's current text
    pub fn input(&self, raw: &str) {
        self.debouncer.call(raw.to_owned());
    }

    /// Send pending text now (form submit). Returns whether anything was pending.
    pub fn flush(&self) -> bool {
        self.debouncer.flush()
    }

    /// Drop pending text
    pub fn cancel(&self) {
        self.debouncer.cancel();
    }

    /// Whether text is waiting for the quiet period
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

/// Queue `command`; when the queue is full, wait for room on the runtime
/// instead of losing it.
fn forward(commands: &mpsc::Sender<ForumCommand>, command: ForumCommand) {
    match commands.try_send(command) {
        Ok(()) => {}
        Err(TrySendError::Full(command)) => match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let commands = commands.clone();
                runtime.spawn(async move {
                    if commands.send(command).await.is_err() {
                        tracing::debug!("Command queue closed before search update was queued");
                    }
                });
            }
            Err(_) => tracing::warn!("Dropping search update: queue full and no runtime"),
        },
        Err(TrySendError::Closed(_)) => {
            tracing::debug!("Command queue closed; search update dropped");
        }
    }
}

/// Apply commands until every sender is dropped. Returns how many ran.
pub async fn run_commands<S: ForumSurface>(
    session: &mut ForumSession<S>,
    commands: &mut mpsc::Receiver<ForumCommand>,
) -> usize {
    let mut applied = 0;
    while let Some(command) = commands.recv().await {
        tracing::trace!(?command, "Forum command");
        session.dispatch(command);
        applied += 1;
    }
    applied
}

/// Apply whatever is queued without waiting. Returns how many ran.
pub fn drain_commands<S: ForumSurface>(
    session: &mut ForumSession<S>,
    commands: &mut mpsc::Receiver<ForumCommand>,
) -> usize {
    let mut applied = 0;
    while let Ok(command) = commands.try_recv() {
        session.dispatch(command);
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use zen_forum::SortMode;

    #[test]
    fn delay_comes_from_forum_config() {
        let (tx, _rx) = command_channel(1);
        let config = ForumConfig::default().with_search_debounce_ms(150);
        assert_eq!(
            SearchInput::from_config(&config, tx).delay(),
            Duration::from_millis(150)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn settled_search_waits_for_room_in_a_full_queue() {
        let (tx, mut rx) = command_channel(1);
        tx.send(ForumCommand::SelectSort(SortMode::Newest)).await.unwrap();

        let search = SearchInput::new(Duration::from_millis(300), tx);
        search.input("rust");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(!search.is_pending());

        assert!(matches!(rx.recv().await, Some(ForumCommand::SelectSort(SortMode::Newest))));
        assert!(matches!(rx.recv().await, Some(ForumCommand::Search(raw)) if raw == "rust"));
    }
}
