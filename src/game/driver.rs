//! # Session Driver
//!
//! Deterministic model of the two timer sources that drive a session: the
//! recurring spawn cadence and one expiry deadline per emoji in flight.
//!
//! Nothing here sleeps or spawns threads. The embedder reads a clock and
//! calls [`SessionDriver::tick`]; everything due at that reading fires in
//! deadline order. Because deadlines are plain data, a frontend frame loop,
//! a test, and the headless demo player all drive the game identically.
//!
//! Every scheduled deadline is tagged with the [`SessionId`] it was created
//! under. The schedule is rebuilt on start and cleared on end, and the
//! session itself re-checks the tag, so a deadline that outlives its session
//! can never touch a newer one.

use crate::game::{EntityId, GameEvent, GameSession, SessionId};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

/// A pending expiry, ordered by due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Expiry {
    due: Instant,
    id: EntityId,
    session: SessionId,
}

/// Owns a [`GameSession`] and its timer schedule.
///
/// # Examples
///
/// ```
/// use moodmunch::{GameSession, HighScoreStore, SessionDriver};
/// use std::time::{Duration, Instant};
///
/// let session = GameSession::with_seed(HighScoreStore::in_memory(), 1);
/// let mut driver = SessionDriver::new(session);
///
/// let now = Instant::now();
/// driver.start_session(now);
///
/// // Nothing is due before the first spawn deadline.
/// assert!(driver.tick(now + Duration::from_millis(100)).is_empty());
/// assert_eq!(driver.session().falling_count(), 0);
///
/// // The first spawn lands 1850ms in at level 1.
/// driver.tick(now + Duration::from_millis(1850));
/// assert_eq!(driver.session().falling_count(), 1);
/// ```
#[derive(Debug)]
pub struct SessionDriver {
    session: GameSession,
    /// Next spawn deadline, tagged with the session it belongs to
    next_spawn: Option<(SessionId, Instant)>,
    expiries: BinaryHeap<Reverse<Expiry>>,
}

impl SessionDriver {
    /// Wraps a session with an empty schedule.
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            next_spawn: None,
            expiries: BinaryHeap::new(),
        }
    }

    /// Read access to the owned session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Consumes the driver, returning the session.
    pub fn into_session(self) -> GameSession {
        self.session
    }

    /// Starts a play-through at `now` and arms the first spawn deadline.
    ///
    /// Any schedule from a previous run is dropped; there is never more
    /// than one live cadence deadline per session.
    pub fn start_session(&mut self, now: Instant) -> Vec<GameEvent> {
        let events = self.session.start();
        self.clear_schedule();
        self.next_spawn = Some((
            self.session.session_id(),
            now + self.session.spawn_interval(),
        ));
        events
    }

    /// Ends the play-through and tears the schedule down.
    pub fn end_session(&mut self) -> Vec<GameEvent> {
        let events = self.session.end();
        self.clear_schedule();
        events
    }

    /// Reports a catch at `now`.
    ///
    /// A level change retimes the cadence, so the next spawn deadline is
    /// re-armed from `now` at the new interval. The old deadline is
    /// replaced, never duplicated.
    pub fn catch(&mut self, now: Instant, id: EntityId) -> Vec<GameEvent> {
        let session = self.session.session_id();
        let events = self.session.catch(session, id);
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelUp { .. }))
        {
            self.next_spawn = Some((session, now + self.session.spawn_interval()));
        }
        events
    }

    /// Fires everything due at `now`, in deadline order.
    ///
    /// Expiries win ties against the spawn deadline so an emoji never
    /// outlives its fall time by a scheduling accident. Stops early when a
    /// miss ends the session.
    pub fn tick(&mut self, now: Instant) -> Vec<GameEvent> {
        let mut events = Vec::new();

        loop {
            let expiry_due = self
                .expiries
                .peek()
                .map(|Reverse(e)| e.due)
                .filter(|&due| due <= now);
            let spawn_due = self
                .next_spawn
                .map(|(_, due)| due)
                .filter(|&due| due <= now);

            let fire_expiry = match (expiry_due, spawn_due) {
                (Some(e), Some(s)) => e <= s,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            if fire_expiry {
                if let Some(Reverse(expiry)) = self.expiries.pop() {
                    events.extend(self.session.expire(expiry.session, expiry.id));
                }
            } else if let Some((session, due)) = self.next_spawn.take() {
                if let Some(entity) = self.session.spawn(session) {
                    self.expiries.push(Reverse(Expiry {
                        due: due + entity.fall_duration(),
                        id: entity.id,
                        session,
                    }));
                }
                // re-arm from the scheduled due time, not the observed now
                self.next_spawn = Some((session, due + self.session.spawn_interval()));
            }

            if !self.session.is_active() {
                self.clear_schedule();
                break;
            }
        }

        events
    }

    fn clear_schedule(&mut self) {
        self.next_spawn = None;
        self.expiries.clear();
    }
}
