use kanso_domain::HabitId;

/// Producer-side handle to the bounded streak-recomputation queue (§4.6).
///
/// Enqueue is always non-blocking: a full queue drops the job rather than
/// stalling the request task that triggered it.
pub trait StreakQueue: Send + Sync {
    /// Attempts to enqueue a habit for streak recomputation. Returns `false`
    /// when the queue is full or closed; callers log and continue — a
    /// dropped job is recovered by the next mutation's enqueue.
    fn try_enqueue(&self, habit_id: HabitId) -> bool;
}
