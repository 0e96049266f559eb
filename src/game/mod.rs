//! # Game Module
//!
//! Core game types and the session state machine.
//!
//! This module contains the building blocks of the MoodMunch mini-game:
//! - Mood model and the static emoji catalog
//! - Falling entity lifecycle
//! - Session state management and game events
//! - A deterministic driver for the spawn and expiry timers

pub mod catalog;
pub mod driver;
pub mod entity;
pub mod events;
pub mod state;

pub use catalog::*;
pub use driver::*;
pub use entity::*;
pub use events::*;
pub use state::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Munchi's mood, driven by the most recently caught emoji.
///
/// The set is closed; `Neutral` is the initial state and is never the
/// result of a catch.
///
/// # Examples
///
/// ```
/// use moodmunch::Mood;
///
/// assert_eq!(Mood::default(), Mood::Neutral);
/// assert_eq!(Mood::Happy.label(), "happy");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Initial state, before the first catch
    #[default]
    Neutral,
    /// Fed something sweet
    Happy,
    /// Fed something gloomy
    Sad,
    /// Fed something spicy
    Angry,
    /// Fed something soporific
    Sleepy,
    /// Fed something romantic
    Love,
}

impl Mood {
    /// All moods a catch can produce (excludes `Neutral`).
    pub fn catchable() -> &'static [Mood] {
        &[Mood::Happy, Mood::Sad, Mood::Angry, Mood::Sleepy, Mood::Love]
    }

    /// Lowercase display label, as shown in notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Neutral => "neutral",
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Sleepy => "sleepy",
            Mood::Love => "love",
        }
    }

    /// The face Munchi pulls in this mood.
    pub fn face(&self) -> &'static str {
        match self {
            Mood::Neutral => "😐",
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Angry => "😠",
            Mood::Sleepy => "😴",
            Mood::Love => "😍",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifies one play-through of the game.
///
/// Regenerated on every `start()` and `end()`. Timer callbacks carry the id
/// they were scheduled under, so anything outliving its session is fenced
/// off instead of mutating a newer session's state.
pub type SessionId = Uuid;

/// Creates a fresh session id.
pub fn new_session_id() -> SessionId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mood_is_neutral() {
        assert_eq!(Mood::default(), Mood::Neutral);
    }

    #[test]
    fn test_catchable_excludes_neutral() {
        let moods = Mood::catchable();
        assert_eq!(moods.len(), 5);
        assert!(!moods.contains(&Mood::Neutral));
    }

    #[test]
    fn test_mood_labels_are_lowercase() {
        for mood in Mood::catchable() {
            assert_eq!(mood.label(), mood.label().to_lowercase());
        }
    }

    #[test]
    fn test_mood_serializes_as_lowercase() {
        let json = serde_json::to_string(&Mood::Sleepy).unwrap();
        assert_eq!(json, "\"sleepy\"");
    }

    #[test]
    fn test_session_id_uniqueness() {
        let id1 = new_session_id();
        let id2 = new_session_id();
        assert_ne!(id1, id2);
    }
}
