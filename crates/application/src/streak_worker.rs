use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use kanso_domain::{HabitId, compute_streaks};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::ports::{EntryRepository, HabitRepository, StreakQueue};

/// Default bounded-queue capacity (§4.6, §10.3 `STREAK_QUEUE_CAPACITY`).
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Producer-side `StreakQueue` backed by a bounded `mpsc` channel. Enqueue
/// is always `try_send`: a full queue drops the job rather than blocking
/// the request task that triggered it.
pub struct ChannelStreakQueue {
    sender: mpsc::Sender<HabitId>,
}

impl StreakQueue for ChannelStreakQueue {
    fn try_enqueue(&self, habit_id: HabitId) -> bool {
        self.sender.try_send(habit_id).is_ok()
    }
}

/// Handle to stop the worker's consumer task. Closing the channel's only
/// sender would also stop it, but an explicit shutdown signal lets callers
/// keep producer handles alive past the worker's own lifetime.
pub struct StreakWorkerHandle {
    shutdown: watch::Sender<bool>,
}

impl StreakWorkerHandle {
    /// Signals the worker to stop draining and exit. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}

/// Spawns the single-consumer streak worker (§4.6), returning a queue handle
/// producers enqueue through, a handle to cancel the worker, and its task.
pub fn spawn_streak_worker(
    habit_repository: Arc<dyn HabitRepository>,
    entry_repository: Arc<dyn EntryRepository>,
    capacity: usize,
) -> (Arc<ChannelStreakQueue>, StreakWorkerHandle, JoinHandle<()>) {
    let (sender, receiver) = mpsc::channel(capacity);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(run(habit_repository, entry_repository, receiver, shutdown_rx));

    (
        Arc::new(ChannelStreakQueue { sender }),
        StreakWorkerHandle { shutdown: shutdown_tx },
        task,
    )
}

async fn run(
    habit_repository: Arc<dyn HabitRepository>,
    entry_repository: Arc<dyn EntryRepository>,
    mut queue: mpsc::Receiver<HabitId>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            job = queue.recv() => {
                match job {
                    Some(habit_id) => process_one(&habit_repository, &entry_repository, habit_id).await,
                    None => break,
                }
            }
        }
    }
}

/// Recomputes and, if changed, writes back the streak fields for one habit.
/// Exposed directly so it can be exercised without spawning the full
/// consumer loop.
pub async fn process_one(
    habit_repository: &Arc<dyn HabitRepository>,
    entry_repository: &Arc<dyn EntryRepository>,
    habit_id: HabitId,
) {
    let habit = match habit_repository.find_by_id_any_owner(habit_id).await {
        Ok(Some(habit)) => habit,
        Ok(None) => return,
        Err(error) => {
            tracing::warn!(error = %error, %habit_id, "streak worker could not load habit");
            return;
        }
    };

    let entries = match entry_repository.list_live_by_habit(habit_id).await {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(error = %error, %habit_id, "streak worker could not load entries");
            return;
        }
    };

    let days: BTreeSet<_> = entries
        .iter()
        .map(|entry| entry.completion_date.date_naive())
        .collect();
    let today = Utc::now().date_naive();
    let (current_streak, longest_streak) = compute_streaks(today, &days);

    if current_streak != habit.current_streak || longest_streak != habit.longest_streak {
        if let Err(error) = habit_repository
            .update_streaks(habit_id, current_streak, longest_streak)
            .await
        {
            tracing::warn!(error = %error, %habit_id, "streak worker could not write back streaks");
        }
    }
}
