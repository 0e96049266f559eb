//! # Falling Entity
//!
//! One spawned emoji in flight. The entity owns its fall time and horizontal
//! position; the session owns its membership in the play area, and exactly
//! one of two terminal events removes it: a catch or an expiry.

use crate::config;
use rand::Rng;
use std::time::Duration;

/// Unique identifier for a falling entity.
///
/// Allocated from a per-session counter, so catches and expiries address one
/// specific entity even when several copies of the same emoji are in flight.
pub type EntityId = u64;

/// One emoji in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingEntity {
    /// Unique id within the session
    pub id: EntityId,
    /// The emoji being dropped
    pub token: &'static str,
    /// Seconds from spawn until the entity exits the play area
    pub fall_seconds: f64,
    /// Horizontal spawn position, percent of play-area width
    pub x_percent: f64,
    /// Vertical spawn position, percent of play-area height (top edge)
    pub y_percent: f64,
}

impl FallingEntity {
    /// Creates an entity with freshly rolled fall time and position.
    ///
    /// Fall time shrinks with level and is floored at
    /// [`config::MIN_FALL_SECONDS`]; the horizontal position is uniform over
    /// the playable band.
    pub fn spawn<R: Rng + ?Sized>(
        id: EntityId,
        token: &'static str,
        level: u32,
        rng: &mut R,
    ) -> Self {
        let jitter = rng.gen_range(0.0..config::FALL_JITTER_SECONDS);
        let fall_seconds = (config::BASE_FALL_SECONDS
            - config::FALL_SECONDS_PER_LEVEL * f64::from(level)
            + jitter)
            .max(config::MIN_FALL_SECONDS);
        let x_percent = rng.gen_range(config::SPAWN_X_MIN_PERCENT..=config::SPAWN_X_MAX_PERCENT);

        Self {
            id,
            token,
            fall_seconds,
            x_percent,
            y_percent: 0.0,
        }
    }

    /// Fall time as a [`Duration`], for scheduling the expiry.
    pub fn fall_duration(&self) -> Duration {
        Duration::from_secs_f64(self.fall_seconds)
    }
}
