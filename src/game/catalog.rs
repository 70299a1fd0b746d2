//! Candidate task queries against the catalog.

use crate::constants::{CEILING_RELAX_STEP, MAX_CEILING_ATTEMPTS, MIN_CANDIDATE_TASKS};
use crate::database::models::{Task, TaskType};
use crate::database::store::TaskCatalogStore;
use tracing::{debug, error, instrument, warn};

/// The ceilings tried in order: the initial one, then five relaxations.
pub fn ceiling_steps(initial: f64) -> impl Iterator<Item = f64> {
    (0..MAX_CEILING_ATTEMPTS).map(move |step| initial + CEILING_RELAX_STEP * step as f64)
}

/// Tasks rated at or below `ceiling`, hardest first.
///
/// Sparse rating buckets are compensated by raising the ceiling in steps of 5.
/// An empty result means no attempt produced enough candidates and the
/// caller cannot assign quests.
#[instrument(level = "debug", skip(store))]
pub async fn tasks_by_rating_ceiling<S>(store: &S, ceiling: f64, task_type: TaskType) -> Vec<Task>
where
    S: TaskCatalogStore + ?Sized,
{
    for attempt in ceiling_steps(ceiling) {
        match store.tasks_up_to_rating(attempt, task_type).await {
            Ok(tasks) if tasks.len() >= MIN_CANDIDATE_TASKS => {
                debug!(target = "game.catalog", ceiling = attempt, found = tasks.len());
                return tasks;
            }
            Ok(tasks) => {
                debug!(target = "game.catalog", ceiling = attempt, found = tasks.len(), "relaxing ceiling");
            }
            Err(e) => {
                error!(target = "game.catalog", ceiling = attempt, error = %e, "task query failed");
                return Vec::new();
            }
        }
    }
    warn!(target = "game.catalog", initial = ceiling, "not enough tasks after relaxing the ceiling");
    Vec::new()
}

/// Random tasks with `rating_min <= rating < rating_max`; empty on store errors.
pub async fn random_tasks<S>(store: &S, limit: i64, rating_min: i32, rating_max: i32) -> Vec<Task>
where
    S: TaskCatalogStore + ?Sized,
{
    match store.random_tasks(limit, rating_min, rating_max).await {
        Ok(tasks) => tasks,
        Err(e) => {
            error!(target = "game.catalog", rating_min, rating_max, error = %e, "random task query failed");
            Vec::new()
        }
    }
}
