//! # MoodMunch
//!
//! Core game logic for the MoodMunch falling-emoji mini-game.
//!
//! ## Architecture Overview
//!
//! The crate is the authoritative model of a play session; rendering and
//! input live in whatever frontend embeds it. The key pieces:
//!
//! - **Game Session**: Centralized state machine owning score, lives, mood,
//!   and the set of emojis currently in flight
//! - **Emoji Catalog**: Static table mapping each fallable emoji to the mood
//!   it puts Munchi in
//! - **Session Driver**: Deterministic timer model that fires spawns and
//!   expiries from explicit clock readings, so timelines are replayable
//! - **Persistence**: A single high-score value saved as JSON in the
//!   platform data directory, with in-memory fallback
//!
//! ## Embedding
//!
//! Every mutating operation returns the [`GameEvent`]s it produced. A
//! frontend forwards those to its notification surface (toasts, a status
//! line, a log) and re-reads the session fields it renders. Timer-driven
//! calls carry the [`SessionId`] they were scheduled under; a stale id makes
//! the call a no-op, so a restarted session can never be corrupted by a
//! leftover timer.

pub mod game;
pub mod persist;

// Core module re-exports
pub use game::*;
pub use persist::*;

// Explicit re-exports for commonly used types
pub use game::{
    EmojiEffect,
    EntityId,
    FallingEntity,
    GameEvent,
    GameSession,
    Mood,
    SessionDriver,
    SessionId,
    SessionPhase,
};

pub use persist::HighScoreStore;

/// Core error type for the MoodMunch crate.
#[derive(thiserror::Error, Debug)]
pub enum MunchError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Session is in the wrong phase for the requested operation
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type used throughout the MoodMunch codebase.
pub type MunchResult<T> = Result<T, MunchError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game tuning constants.
pub mod config {
    use std::time::Duration;

    /// Points awarded per successful catch
    pub const POINTS_PER_CATCH: u32 = 10;

    /// Lives at the start of a session
    pub const STARTING_LIVES: u32 = 3;

    /// Score needed per level (level = score / step + 1)
    pub const LEVEL_SCORE_STEP: u32 = 50;

    /// Spawn cadence at level 0, before the per-level speedup
    pub const BASE_SPAWN_INTERVAL_MS: u64 = 2000;

    /// Cadence speedup per level
    pub const SPAWN_INTERVAL_STEP_MS: u64 = 150;

    /// Fastest allowed spawn cadence
    pub const MIN_SPAWN_INTERVAL_MS: u64 = 500;

    /// Fall time at level 0, before the per-level speedup and jitter
    pub const BASE_FALL_SECONDS: f64 = 5.0;

    /// Fall time reduction per level
    pub const FALL_SECONDS_PER_LEVEL: f64 = 0.4;

    /// Upper bound of the uniform jitter added to each fall time
    pub const FALL_JITTER_SECONDS: f64 = 2.0;

    /// Shortest allowed fall time regardless of level
    pub const MIN_FALL_SECONDS: f64 = 1.0;

    /// Leftmost spawn position as a percentage of the play area width
    pub const SPAWN_X_MIN_PERCENT: f64 = 5.0;

    /// Rightmost spawn position as a percentage of the play area width
    pub const SPAWN_X_MAX_PERCENT: f64 = 95.0;

    /// How long the level-up and new-high-score pulses stay visible
    pub const PULSE_DURATION: Duration = Duration::from_secs(3);
}
