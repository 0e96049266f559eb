//! # Emoji Catalog
//!
//! The static table of fallable emojis and the mood each one feeds into
//! Munchi. Pure data; the only operations are lookup and a uniform random
//! draw for the spawner.

use crate::game::Mood;
use rand::Rng;

/// One catalog entry: an emoji token and the mood catching it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiEffect {
    /// The emoji as rendered in the play area
    pub token: &'static str,
    /// Munchi's mood after eating it
    pub result_mood: Mood,
}

/// The full fallable set: three tokens per catchable mood.
pub const CATALOG: &[EmojiEffect] = &[
    EmojiEffect { token: "🍩", result_mood: Mood::Happy },
    EmojiEffect { token: "🍦", result_mood: Mood::Happy },
    EmojiEffect { token: "🍪", result_mood: Mood::Happy },
    EmojiEffect { token: "🌶️", result_mood: Mood::Angry },
    EmojiEffect { token: "💢", result_mood: Mood::Angry },
    EmojiEffect { token: "⚡", result_mood: Mood::Angry },
    EmojiEffect { token: "💤", result_mood: Mood::Sleepy },
    EmojiEffect { token: "🛏️", result_mood: Mood::Sleepy },
    EmojiEffect { token: "📚", result_mood: Mood::Sleepy },
    EmojiEffect { token: "💌", result_mood: Mood::Love },
    EmojiEffect { token: "❤️", result_mood: Mood::Love },
    EmojiEffect { token: "🌹", result_mood: Mood::Love },
    EmojiEffect { token: "🧅", result_mood: Mood::Sad },
    EmojiEffect { token: "☔", result_mood: Mood::Sad },
    EmojiEffect { token: "😢", result_mood: Mood::Sad },
];

/// Looks up the effect for a token.
///
/// Returns `None` for tokens outside the catalog; callers treat that as a
/// no-op, not an error.
///
/// # Examples
///
/// ```
/// use moodmunch::{catalog, Mood};
///
/// assert_eq!(catalog::lookup("🍩").map(|e| e.result_mood), Some(Mood::Happy));
/// assert!(catalog::lookup("🚀").is_none());
/// ```
pub fn lookup(token: &str) -> Option<&'static EmojiEffect> {
    CATALOG.iter().find(|effect| effect.token == token)
}

/// Draws a token uniformly at random from the catalog.
pub fn random_token<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    CATALOG[rng.gen_range(0..CATALOG.len())].token
}
