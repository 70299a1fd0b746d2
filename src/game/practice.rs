//! Practice mode: a single random task from a chosen difficulty level.

use super::catalog::random_tasks;
use crate::database::models::Task;
use crate::database::store::TaskCatalogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PracticeLevel {
    Beginner,
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl PracticeLevel {
    pub const ALL: [PracticeLevel; 5] = [
        PracticeLevel::Beginner,
        PracticeLevel::Easy,
        PracticeLevel::Medium,
        PracticeLevel::Hard,
        PracticeLevel::Extreme,
    ];

    /// Half-open rating range `[min, max)`. The top level reaches 100.
    pub fn rating_range(self) -> (i32, i32) {
        match self {
            Self::Beginner => (0, 20),
            Self::Easy => (20, 40),
            Self::Medium => (40, 60),
            Self::Hard => (60, 80),
            Self::Extreme => (80, 101),
        }
    }

    pub fn choice(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Extreme => "extreme",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Extreme => "Extreme",
        }
    }

    pub fn from_choice(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.choice() == value)
    }
}

pub async fn practice_task<S>(store: &S, level: PracticeLevel) -> Option<Task>
where
    S: TaskCatalogStore + ?Sized,
{
    let (min, max) = level.rating_range();
    random_tasks(store, 1, min, max).await.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_cover_the_whole_scale() {
        let mut next = 0;
        for level in PracticeLevel::ALL {
            let (min, max) = level.rating_range();
            assert_eq!(min, next);
            next = max;
        }
        assert_eq!(next, 101);
    }

    #[test]
    fn choices_parse_back() {
        assert_eq!(PracticeLevel::from_choice("hard"), Some(PracticeLevel::Hard));
        assert_eq!(PracticeLevel::from_choice("Hard"), None);
    }
}
