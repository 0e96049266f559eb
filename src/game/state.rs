//! # Session State Module
//!
//! The game-session state machine: score, lives, mood, the emojis in
//! flight, and the high-score bookkeeping that happens when a session ends.
//!
//! A session is an explicitly constructed value owned by its embedder; there
//! is no global instance. It moves between two phases, `Idle` and `Active`,
//! and every mutating operation returns the [`GameEvent`]s it produced.
//! Spawn and expiry timers live outside the session (see
//! [`SessionDriver`](crate::SessionDriver)); their callbacks carry the
//! [`SessionId`] they were scheduled under and are silently discarded once
//! the session has moved on.

use crate::config;
use crate::game::{catalog, new_session_id, EntityId, FallingEntity, GameEvent, Mood, SessionId};
use crate::persist::HighScoreStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The two phases of a session.
///
/// `Idle` is both the initial state and the terminal state of a
/// play-through; `start()` always begins a completely fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No game running; timers are torn down
    Idle,
    /// Spawning and scoring are live
    Active,
}

/// A transient flag that auto-expires.
///
/// Stored as a deadline instead of a raw boolean so that re-triggering
/// replaces the deadline cleanly rather than racing a clear timer.
#[derive(Debug, Clone, Copy, Default)]
struct Pulse {
    until: Option<Instant>,
}

impl Pulse {
    fn fire(&mut self, now: Instant) {
        self.until = Some(now + config::PULSE_DURATION);
    }

    fn clear(&mut self) {
        self.until = None;
    }

    fn is_active_at(&self, now: Instant) -> bool {
        self.until.is_some_and(|deadline| now < deadline)
    }
}

/// Central state for one player's game, across play-throughs.
///
/// Holds the live session fields plus the persistent high score. The level
/// is never stored; it is recomputed from the score on every read so rapid
/// catches can never drive the two apart.
///
/// # Examples
///
/// ```
/// use moodmunch::{GameSession, HighScoreStore, SessionPhase};
///
/// let mut session = GameSession::with_seed(HighScoreStore::in_memory(), 1);
/// assert_eq!(session.phase(), SessionPhase::Idle);
///
/// session.start();
/// assert_eq!(session.phase(), SessionPhase::Active);
/// assert_eq!(session.lives(), 3);
/// assert_eq!(session.level(), 1);
/// ```
#[derive(Debug)]
pub struct GameSession {
    phase: SessionPhase,
    score: u32,
    lives: u32,
    mood: Mood,
    mood_history: Vec<Mood>,
    falling: HashMap<EntityId, FallingEntity>,
    high_score: u32,
    store: HighScoreStore,
    session_id: SessionId,
    next_entity_id: EntityId,
    rng: StdRng,
    level_up: Pulse,
    new_high_score: Pulse,
}

impl GameSession {
    /// Creates a session with an OS-seeded RNG.
    ///
    /// The high score is read from the store once, here; absence or
    /// corruption reads as 0.
    pub fn new(store: HighScoreStore) -> Self {
        Self::from_rng(store, StdRng::from_entropy())
    }

    /// Creates a session with a reproducible RNG seed.
    pub fn with_seed(store: HighScoreStore, seed: u64) -> Self {
        Self::from_rng(store, StdRng::seed_from_u64(seed))
    }

    fn from_rng(store: HighScoreStore, rng: StdRng) -> Self {
        let high_score = store.best();
        Self {
            phase: SessionPhase::Idle,
            score: 0,
            lives: config::STARTING_LIVES,
            mood: Mood::Neutral,
            mood_history: Vec::new(),
            falling: HashMap::new(),
            high_score,
            store,
            session_id: new_session_id(),
            next_entity_id: 0,
            rng,
            level_up: Pulse::default(),
            new_high_score: Pulse::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether spawning and scoring are live.
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Score of the current play-through.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Lives remaining.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Current level, recomputed from the score.
    pub fn level(&self) -> u32 {
        self.score / config::LEVEL_SCORE_STEP + 1
    }

    /// Munchi's current mood.
    pub fn mood(&self) -> Mood {
        self.mood
    }

    /// Every mood produced this play-through, in catch order.
    pub fn mood_history(&self) -> &[Mood] {
        &self.mood_history
    }

    /// The emojis currently in flight.
    pub fn falling_entities(&self) -> impl Iterator<Item = &FallingEntity> {
        self.falling.values()
    }

    /// Number of emojis currently in flight.
    pub fn falling_count(&self) -> usize {
        self.falling.len()
    }

    /// Best final score across all sessions.
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Id of the current play-through.
    ///
    /// Timer callbacks must pass this back; see [`GameSession::expire`].
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Whether the level-up pulse is still showing.
    pub fn is_level_up(&self) -> bool {
        self.level_up.is_active_at(Instant::now())
    }

    /// Whether the new-high-score pulse is still showing.
    pub fn is_new_high_score(&self) -> bool {
        self.new_high_score.is_active_at(Instant::now())
    }

    /// Time between spawns at the current level.
    ///
    /// Speeds up by [`config::SPAWN_INTERVAL_STEP_MS`] per level and is
    /// floored at [`config::MIN_SPAWN_INTERVAL_MS`].
    pub fn spawn_interval(&self) -> Duration {
        let ms = config::BASE_SPAWN_INTERVAL_MS
            .saturating_sub(config::SPAWN_INTERVAL_STEP_MS * u64::from(self.level()))
            .max(config::MIN_SPAWN_INTERVAL_MS);
        Duration::from_millis(ms)
    }

    /// Starts a fresh play-through.
    ///
    /// Resets every session field, allocates a new [`SessionId`] (fencing
    /// off all timers from the previous run), and moves to `Active`. Calling
    /// this mid-session restarts from scratch; nothing is merged.
    pub fn start(&mut self) -> Vec<GameEvent> {
        self.phase = SessionPhase::Active;
        self.session_id = new_session_id();
        self.score = 0;
        self.lives = config::STARTING_LIVES;
        self.mood = Mood::Neutral;
        self.mood_history.clear();
        self.falling.clear();
        self.level_up.clear();
        self.new_high_score.clear();
        log::debug!("session {} started", self.session_id);
        vec![GameEvent::SessionStarted]
    }

    /// Spawns one random emoji, returning a copy for expiry scheduling.
    ///
    /// Returns `None` while `Idle` or when `session` is not the current
    /// play-through (a stale cadence timer firing after a restart).
    pub fn spawn(&mut self, session: SessionId) -> Option<FallingEntity> {
        if !self.is_active() || session != self.session_id {
            return None;
        }

        let token = catalog::random_token(&mut self.rng);
        let id = self.next_entity_id;
        self.next_entity_id += 1;

        let entity = FallingEntity::spawn(id, token, self.level(), &mut self.rng);
        log::debug!(
            "spawned {} (id {}) falling {:.2}s at x {:.1}%",
            entity.token,
            entity.id,
            entity.fall_seconds,
            entity.x_percent
        );
        self.falling.insert(id, entity);
        Some(entity)
    }

    /// Handles an emoji being dropped onto Munchi.
    ///
    /// No-ops (returning no events) when the session id is stale, the
    /// entity is already gone (a catch and an expiry racing resolve to
    /// whichever lands first), or the entity's token is somehow not in the
    /// catalog; in that last case the entity is left in flight.
    pub fn catch(&mut self, session: SessionId, id: EntityId) -> Vec<GameEvent> {
        if !self.is_active() || session != self.session_id {
            return Vec::new();
        }
        let Some(entity) = self.falling.get(&id) else {
            return Vec::new();
        };
        let token = entity.token;
        let Some(effect) = catalog::lookup(token) else {
            return Vec::new();
        };
        self.falling.remove(&id);

        let now = Instant::now();
        let level_before = self.level();

        self.mood = effect.result_mood;
        self.score += config::POINTS_PER_CATCH;
        self.mood_history.push(effect.result_mood);

        let mut events = vec![GameEvent::EmojiCaught {
            token: token.to_string(),
            mood: effect.result_mood,
            score: self.score,
        }];

        let level_after = self.level();
        if level_after > level_before {
            self.level_up.fire(now);
            events.push(GameEvent::LevelUp { level: level_after });
            log::debug!("level up to {}", level_after);
        }

        if self.score > self.high_score && !self.new_high_score.is_active_at(now) {
            self.new_high_score.fire(now);
        }

        events
    }

    /// Handles an emoji's fall time elapsing without a catch.
    ///
    /// Removing the entity and decrementing a life happen together; a
    /// re-delivered expiry, or one racing a catch, finds the id gone and
    /// changes nothing. The miss that takes lives to 0 ends the session.
    pub fn expire(&mut self, session: SessionId, id: EntityId) -> Vec<GameEvent> {
        if !self.is_active() || session != self.session_id {
            return Vec::new();
        }
        if self.falling.remove(&id).is_none() {
            return Vec::new();
        }

        self.lives = self.lives.saturating_sub(1);
        log::debug!("missed entity {}, {} lives left", id, self.lives);

        let mut events = vec![GameEvent::EmojiMissed {
            lives_left: self.lives,
        }];
        if self.lives == 0 {
            events.extend(self.end());
        }
        events
    }

    /// Ends the play-through.
    ///
    /// Moves to `Idle`, regenerates the session id so every outstanding
    /// timer is fenced off, and settles the high score exactly once: a final
    /// score above the stored best is persisted and announced, anything else
    /// is a plain game over. Calling this while already `Idle` is a no-op.
    pub fn end(&mut self) -> Vec<GameEvent> {
        if !self.is_active() {
            return Vec::new();
        }
        self.phase = SessionPhase::Idle;
        self.session_id = new_session_id();
        self.falling.clear();

        log::debug!("session ended with score {}", self.score);

        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.record(self.score);
            self.new_high_score.fire(Instant::now());
            vec![GameEvent::NewHighScore { score: self.score }]
        } else {
            vec![GameEvent::GameOver { score: self.score }]
        }
    }

    /// Inserts an entity with a chosen token, bypassing the random draw.
    #[cfg(test)]
    fn inject(&mut self, token: &'static str) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        let entity = FallingEntity {
            id,
            token,
            fall_seconds: 5.0,
            x_percent: 50.0,
            y_percent: 0.0,
        };
        self.falling.insert(id, entity);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_session() -> GameSession {
        let mut session = GameSession::with_seed(HighScoreStore::in_memory(), 12345);
        session.start();
        session
    }

    fn session_with_high_score(best: u32) -> GameSession {
        let mut store = HighScoreStore::in_memory();
        store.record(best);
        let mut session = GameSession::with_seed(store, 12345);
        session.start();
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::with_seed(HighScoreStore::in_memory(), 1);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), config::STARTING_LIVES);
        assert_eq!(session.mood(), Mood::Neutral);
    }

    #[test]
    fn test_single_catch_scores_and_sets_mood() {
        // Scenario: one donut makes Munchi happy and is worth 10 points
        let mut session = active_session();
        let sid = session.session_id();
        let id = session.inject("🍩");

        let events = session.catch(sid, id);

        assert_eq!(session.score(), 10);
        assert_eq!(session.mood(), Mood::Happy);
        assert_eq!(session.mood_history(), &[Mood::Happy]);
        assert_eq!(session.level(), 1);
        assert_eq!(session.falling_count(), 0);
        assert_eq!(
            events,
            vec![GameEvent::EmojiCaught {
                token: "🍩".to_string(),
                mood: Mood::Happy,
                score: 10,
            }]
        );
    }

    #[test]
    fn test_five_catches_reach_level_two() {
        let mut session = active_session();
        let mut level_up_events = 0;

        for _ in 0..5 {
            let sid = session.session_id();
            let id = session.inject("🍩");
            let events = session.catch(sid, id);
            level_up_events += events
                .iter()
                .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
                .count();
        }

        assert_eq!(session.score(), 50);
        assert_eq!(session.level(), 2);
        assert_eq!(level_up_events, 1);
        assert!(session.is_level_up());
    }

    #[test]
    fn test_level_tracks_score_exactly() {
        let mut session = active_session();
        for n in 1..=20u32 {
            let sid = session.session_id();
            let id = session.inject("⚡");
            session.catch(sid, id);
            assert_eq!(session.score(), 10 * n);
            assert_eq!(session.level(), session.score() / 50 + 1);
        }
    }

    #[test]
    fn test_three_misses_end_the_session() {
        let mut session = active_session();
        let sid = session.session_id();

        for expected_lives in [2u32, 1] {
            let id = session.inject("☔");
            let events = session.expire(sid, id);
            assert_eq!(session.lives(), expected_lives);
            assert_eq!(
                events,
                vec![GameEvent::EmojiMissed {
                    lives_left: expected_lives
                }]
            );
        }

        let id = session.inject("☔");
        let events = session.expire(sid, id);
        assert_eq!(session.lives(), 0);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(
            events,
            vec![
                GameEvent::EmojiMissed { lives_left: 0 },
                GameEvent::GameOver { score: 0 },
            ]
        );
    }

    #[test]
    fn test_final_score_below_high_score_keeps_it() {
        // Scenario: best of 100 survives a 90-point run
        let mut session = session_with_high_score(100);
        for _ in 0..9 {
            let sid = session.session_id();
            let id = session.inject("🍪");
            session.catch(sid, id);
        }

        let events = session.end();

        assert_eq!(session.high_score(), 100);
        assert!(!session.is_new_high_score());
        assert_eq!(events, vec![GameEvent::GameOver { score: 90 }]);
    }

    #[test]
    fn test_final_score_above_high_score_replaces_it() {
        // Scenario: a 60-point run beats a best of 50 and persists
        let mut session = session_with_high_score(50);
        for _ in 0..6 {
            let sid = session.session_id();
            let id = session.inject("💌");
            session.catch(sid, id);
        }

        let events = session.end();

        assert_eq!(session.high_score(), 60);
        assert!(session.is_new_high_score());
        assert_eq!(events, vec![GameEvent::NewHighScore { score: 60 }]);
        assert_eq!(session.store.best(), 60);
    }

    #[test]
    fn test_catch_is_idempotent_per_entity() {
        let mut session = active_session();
        let sid = session.session_id();
        let id = session.inject("🍦");

        assert_eq!(session.catch(sid, id).len(), 1);
        assert!(session.catch(sid, id).is_empty());
        assert_eq!(session.score(), 10);
        assert_eq!(session.mood_history().len(), 1);
    }

    #[test]
    fn test_expire_is_idempotent_per_entity() {
        let mut session = active_session();
        let sid = session.session_id();
        let id = session.inject("🧅");

        assert_eq!(session.expire(sid, id).len(), 1);
        assert!(session.expire(sid, id).is_empty());
        assert_eq!(session.lives(), 2);
    }

    #[test]
    fn test_caught_entity_cannot_also_expire() {
        let mut session = active_session();
        let sid = session.session_id();
        let id = session.inject("🌹");

        session.catch(sid, id);
        assert!(session.expire(sid, id).is_empty());
        assert_eq!(session.lives(), config::STARTING_LIVES);
    }

    #[test]
    fn test_unknown_token_is_a_soft_no_op() {
        let mut session = active_session();
        let sid = session.session_id();
        let id = session.inject("🚀");

        let events = session.catch(sid, id);

        assert!(events.is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.mood(), Mood::Neutral);
        // the entity stays in flight
        assert_eq!(session.falling_count(), 1);
    }

    #[test]
    fn test_stale_session_id_is_fenced() {
        let mut session = active_session();
        let stale = session.session_id();
        let id = session.inject("🍩");

        session.start();

        assert!(session.spawn(stale).is_none());
        assert!(session.catch(stale, id).is_empty());
        assert!(session.expire(stale, id).is_empty());
        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), config::STARTING_LIVES);
    }

    #[test]
    fn test_restart_fully_resets() {
        let mut session = active_session();
        let sid = session.session_id();
        let id = session.inject("🍩");
        session.catch(sid, id);
        session.inject("🍪");
        let id = session.inject("☔");
        session.expire(sid, id);

        session.start();

        assert_eq!(session.score(), 0);
        assert_eq!(session.lives(), config::STARTING_LIVES);
        assert_eq!(session.level(), 1);
        assert_eq!(session.mood(), Mood::Neutral);
        assert!(session.mood_history().is_empty());
        assert_eq!(session.falling_count(), 0);
        assert!(!session.is_level_up());
        assert!(!session.is_new_high_score());
        assert_ne!(session.session_id(), sid);
    }

    #[test]
    fn test_end_settles_exactly_once() {
        let mut session = session_with_high_score(10);
        let sid = session.session_id();
        let id = session.inject("🍩");
        session.catch(sid, id);
        let id = session.inject("🍩");
        session.catch(sid, id);

        assert_eq!(session.end(), vec![GameEvent::NewHighScore { score: 20 }]);
        assert!(session.end().is_empty());
        assert_eq!(session.high_score(), 20);
    }

    #[test]
    fn test_spawn_only_while_active() {
        let mut session = GameSession::with_seed(HighScoreStore::in_memory(), 9);
        let sid = session.session_id();
        assert!(session.spawn(sid).is_none());

        session.start();
        let sid = session.session_id();
        let entity = session.spawn(sid).expect("active session should spawn");
        assert_eq!(session.falling_count(), 1);
        assert!(catalog::lookup(entity.token).is_some());
    }

    #[test]
    fn test_spawned_ids_are_unique() {
        let mut session = active_session();
        let sid = session.session_id();
        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let entity = session.spawn(sid).unwrap();
            assert!(ids.insert(entity.id));
        }
    }

    #[test]
    fn test_catching_spawned_entity_matches_catalog_mood() {
        let mut session = active_session();
        let sid = session.session_id();
        let entity = session.spawn(sid).unwrap();
        let expected = catalog::lookup(entity.token).unwrap().result_mood;

        session.catch(sid, entity.id);

        assert_eq!(session.mood(), expected);
    }

    #[test]
    fn test_spawn_interval_speeds_up_and_floors() {
        let mut session = active_session();
        assert_eq!(session.spawn_interval(), Duration::from_millis(1850));

        // push to level 4: 2000 - 600 = 1400ms
        for _ in 0..15 {
            let sid = session.session_id();
            let id = session.inject("🍩");
            session.catch(sid, id);
        }
        assert_eq!(session.level(), 4);
        assert_eq!(session.spawn_interval(), Duration::from_millis(1400));

        // far past the floor: level 12 would be 200ms unfloored
        for _ in 0..40 {
            let sid = session.session_id();
            let id = session.inject("🍩");
            session.catch(sid, id);
        }
        assert_eq!(session.level(), 12);
        assert_eq!(session.spawn_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_high_score_pulse_fires_mid_play() {
        let mut session = session_with_high_score(10);
        let sid = session.session_id();

        let id = session.inject("🍩");
        session.catch(sid, id);
        assert!(!session.is_new_high_score(), "10 does not beat 10");

        let id = session.inject("🍩");
        session.catch(sid, id);
        assert!(session.is_new_high_score(), "20 beats 10");
    }

    #[test]
    fn test_pulse_expires_and_refires() {
        let base = Instant::now();
        let mut pulse = Pulse::default();
        assert!(!pulse.is_active_at(base));

        pulse.fire(base);
        assert!(pulse.is_active_at(base));
        assert!(pulse.is_active_at(base + Duration::from_millis(2999)));
        assert!(!pulse.is_active_at(base + config::PULSE_DURATION));

        // re-triggering replaces the deadline
        pulse.fire(base + Duration::from_secs(2));
        assert!(pulse.is_active_at(base + Duration::from_secs(4)));
        assert!(!pulse.is_active_at(base + Duration::from_secs(5)));
    }
}
