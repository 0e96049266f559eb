//! # Game Events
//!
//! Observable outputs of the session state machine. Every mutating
//! operation returns the events it produced; the embedder forwards them to
//! its notification surface. The core never renders anything itself.

use crate::game::Mood;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A discrete notification emitted by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new session began
    SessionStarted,
    /// An emoji was dragged onto Munchi in time
    EmojiCaught {
        /// The caught emoji
        token: String,
        /// Munchi's resulting mood
        mood: Mood,
        /// Score after the catch
        score: u32,
    },
    /// An emoji fell out of the play area
    EmojiMissed {
        /// Lives remaining after the miss
        lives_left: u32,
    },
    /// The score crossed a level boundary
    LevelUp {
        /// The level just reached
        level: u32,
    },
    /// The session ended above the stored high score
    NewHighScore {
        /// The new best score
        score: u32,
    },
    /// The session ended at or below the stored high score
    GameOver {
        /// Final score of the session
        score: u32,
    },
}

impl GameEvent {
    /// How long a transient notification for this event should stay up.
    ///
    /// `None` means the surface's default. The values match what the game
    /// has always shown: quick feedback for catches and misses, a longer
    /// celebration for a new high score.
    pub fn display_duration(&self) -> Option<Duration> {
        match self {
            GameEvent::SessionStarted => None,
            GameEvent::EmojiCaught { .. } => Some(Duration::from_millis(1500)),
            GameEvent::EmojiMissed { .. } => Some(Duration::from_millis(1000)),
            GameEvent::LevelUp { .. } => Some(Duration::from_millis(2000)),
            GameEvent::NewHighScore { .. } => Some(Duration::from_millis(5000)),
            GameEvent::GameOver { .. } => None,
        }
    }

    /// User-facing message for this event.
    pub fn message(&self) -> String {
        match self {
            GameEvent::SessionStarted => "Game started! Feed Munchi!".to_string(),
            GameEvent::EmojiCaught { mood, .. } => format!("Munchi reacts: {}!", mood),
            GameEvent::EmojiMissed { .. } => "Missed an emoji!".to_string(),
            GameEvent::LevelUp { level } => format!("Level up! {}", level),
            GameEvent::NewHighScore { score } => format!("New High Score: {}!", score),
            GameEvent::GameOver { score } => format!("Game over! Final score: {}", score),
        }
    }
}
