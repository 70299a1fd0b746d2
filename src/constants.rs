// Central constants for ranking, quest assignment and scoring.

/// Name of the only game mode the bot runs.
pub const TASK_HUNT_NAME: &str = "Fast and hungry, task hunt";

pub const DIFFICULTY_BANDS: usize = 5;
pub const BAND_WIDTH: i32 = 20;

/// A ceiling query must yield at least this many candidates before selection.
pub const MIN_CANDIDATE_TASKS: usize = 5;
pub const CEILING_RELAX_STEP: f64 = 5.0;
/// Initial query plus five relaxations.
pub const MAX_CEILING_ATTEMPTS: usize = 6;

/// Points for first place; every further placement step is worth one less.
pub const POINTS_FOR_FIRST: i32 = 6;

pub const MAX_PLAYERS_PER_GAME: usize = 6;

/// Markers shown in front of each quest, in position order.
pub const QUEST_MARKERS: [&str; DIFFICULTY_BANDS] = ["1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣"];

pub const GAME_FAILURE_MESSAGE: &str =
    "An error occurred while creating the game, check logs.";
