use std::time::Duration;

use crate::{ConfigError, core::Board};

/// Setup parameters of a session, fixed once the session is configured.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tilefall_engine::GameConfig;
///
/// let config = GameConfig::DEFAULT;
/// assert_eq!((config.width, config.height), (12, 22));
/// assert_eq!(config.delete_interval(), Duration::from_millis(500));
///
/// let slow = GameConfig {
///     drop_interval: Duration::from_millis(900),
///     ..GameConfig::DEFAULT
/// };
/// assert_eq!(slow.delete_interval(), Duration::from_millis(600));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Grid width including the two wall columns.
    pub width: usize,
    /// Grid height including the floor and ceiling walls.
    pub height: usize,
    /// Time between gravity ticks.
    pub drop_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl GameConfig {
    pub const DEFAULT_WIDTH: usize = 12;
    pub const DEFAULT_HEIGHT: usize = 22;
    pub const DEFAULT_DROP_INTERVAL: Duration = Duration::from_millis(400);

    /// Shortest pause between clearing rows and compacting them.
    pub const MIN_DELETE_INTERVAL: Duration = Duration::from_millis(500);

    pub const DEFAULT: Self = Self {
        width: Self::DEFAULT_WIDTH,
        height: Self::DEFAULT_HEIGHT,
        drop_interval: Self::DEFAULT_DROP_INTERVAL,
    };

    /// Length of each of the two pauses of a clear: `drop_interval / 1.5`,
    /// but never under [`Self::MIN_DELETE_INTERVAL`].
    #[must_use]
    pub fn delete_interval(&self) -> Duration {
        (self.drop_interval / 3)
            .saturating_mul(2)
            .max(Self::MIN_DELETE_INTERVAL)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Board::check_dimensions(self.width, self.height).map_err(ConfigError::Board)?;
        if self.drop_interval.is_zero() {
            return Err(ConfigError::InvalidDropInterval);
        }
        Ok(())
    }
}

/// Drop interval the speed policy picks for a session started at `level`.
///
/// Starts at 0.4 s and loses 0.1 s per level, down to 0.2 s. The engine never
/// calls this itself; a driver applies it when configuring the next session.
///
/// ```
/// use std::time::Duration;
///
/// use tilefall_engine::drop_interval_for_level;
///
/// assert_eq!(drop_interval_for_level(0), Duration::from_millis(400));
/// assert_eq!(drop_interval_for_level(1), Duration::from_millis(300));
/// assert_eq!(drop_interval_for_level(5), Duration::from_millis(200));
/// ```
#[must_use]
pub fn drop_interval_for_level(level: usize) -> Duration {
    const FASTEST: Duration = Duration::from_millis(200);
    const STEP: Duration = Duration::from_millis(100);

    let steps = u32::try_from(level).unwrap_or(u32::MAX);
    GameConfig::DEFAULT_DROP_INTERVAL
        .saturating_sub(STEP.saturating_mul(steps))
        .max(FASTEST)
}
