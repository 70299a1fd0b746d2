//! Balanced quest selection across difficulty bands.
//!
//! Candidates are split into five bands of width 20 (rating 100 joins the
//! top band). Bands are visited hardest first with a quota that starts at one:
//! an empty band adds one to the quota, a drawing band spends it. Scarce hard
//! bands are therefore made up for by extra draws from easier ones.

use crate::constants::{BAND_WIDTH, DIFFICULTY_BANDS};
use crate::database::models::Task;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Band index of a rating, `0..DIFFICULTY_BANDS`.
pub fn band_index(rating: i32) -> usize {
    let band = (rating.max(0) / BAND_WIDTH) as usize;
    band.min(DIFFICULTY_BANDS - 1)
}

/// Draws up to one task per band (more when harder bands are empty).
///
/// Tasks already in `exclude_ids` are skipped; every drawn task flagged
/// `once` is added to it so later draws sharing the set cannot repeat it.
pub fn select_balanced<R>(tasks: &[Task], exclude_ids: &mut HashSet<i32>, rng: &mut R) -> Vec<Task>
where
    R: Rng + ?Sized,
{
    let mut bands: [Vec<&Task>; DIFFICULTY_BANDS] = Default::default();
    for task in tasks {
        bands[band_index(task.rating)].push(task);
    }

    let mut selected = Vec::with_capacity(DIFFICULTY_BANDS);
    let mut quota = 1usize;
    for band in bands.iter().rev() {
        if band.is_empty() {
            quota += 1;
            continue;
        }
        let available: Vec<&Task> = band
            .iter()
            .copied()
            .filter(|t| !exclude_ids.contains(&t.task_id))
            .collect();
        let take = quota.min(available.len());
        for task in available.choose_multiple(rng, take) {
            if task.once {
                exclude_ids.insert(task.task_id);
            }
            selected.push((*task).clone());
        }
        quota -= take;
        if quota == 0 {
            quota = 1;
        }
    }
    selected
}

/// Single-use task ids claimed during one game initialization.
///
/// The lock is held across the whole filter-draw-register step so two
/// concurrent selections can never both claim the same `once` task.
#[derive(Debug, Default)]
pub struct ExclusionSet {
    ids: Mutex<HashSet<i32>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn select<R>(&self, tasks: &[Task], rng: &mut R) -> Vec<Task>
    where
        R: Rng + ?Sized,
    {
        let mut ids = self.ids.lock().await;
        select_balanced(tasks, &mut ids, rng)
    }

    pub async fn contains(&self, task_id: i32) -> bool {
        self.ids.lock().await.contains(&task_id)
    }
}
