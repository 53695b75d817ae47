/// Points per lock, indexed by the number of rows it cleared.
const SCORE_TABLE: [usize; 5] = [0, 1, 3, 6, 10];

/// Multiplier applied to [`score_delta`] when adding to the score.
pub const SCORE_BASE: usize = 10;

/// Score units for clearing `lines` rows with a single lock.
///
/// Four-cell pieces cannot clear more than four rows; larger counts are
/// scored as four.
///
/// ```
/// use tilefall_engine::score_delta;
///
/// assert_eq!(score_delta(0), 0);
/// assert_eq!(score_delta(2), 3);
/// assert_eq!(score_delta(4), 10);
/// ```
#[must_use]
pub const fn score_delta(lines: usize) -> usize {
    if lines < SCORE_TABLE.len() {
        SCORE_TABLE[lines]
    } else {
        SCORE_TABLE[SCORE_TABLE.len() - 1]
    }
}

/// Per-session counters updated on every lock.
///
/// - **Score**: [`score_delta`] times [`SCORE_BASE`], summed over locks
/// - **Level**: one per 10 cleared lines, read by the external speed policy
/// - **Completed pieces**: number of locks
/// - **Line clear histogram**: locks by cleared-row count
///
/// There are no combo or back-to-back bonuses.
///
/// # Example
///
/// ```
/// use tilefall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.record_lock(4), 100);
///
/// assert_eq!(stats.score(), 100);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Level derived from cleared lines (integer division by 10).
    #[must_use]
    pub const fn level(&self) -> usize {
        self.total_cleared_lines / 10
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Locks by cleared-row count: `[0]` locks that cleared nothing up to
    /// `[4]` four-row clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one lock that cleared `cleared_lines` rows and returns the
    /// points it added.
    pub const fn record_lock(&mut self, cleared_lines: usize) -> usize {
        let amount = score_delta(cleared_lines) * SCORE_BASE;
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        } else {
            self.line_cleared_counter[4] += 1;
        }
        self.score += amount;
        amount
    }
}
