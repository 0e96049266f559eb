//! # MoodMunch Demo Player
//!
//! Plays the game headlessly: a session driver advanced on a virtual clock,
//! with an autoplay policy standing in for the player's drag-and-drop. Every
//! notification the core emits is logged the way a frontend would toast it.

use clap::Parser;
use log::info;
use moodmunch::{GameEvent, GameSession, HighScoreStore, MunchResult, SessionDriver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};

/// Virtual clock granularity for the autoplay loop.
const STEP: Duration = Duration::from_millis(100);

/// Safety cap per session, in steps. At 100ms per step this is a little
/// under 17 minutes of game time.
const MAX_STEPS: u32 = 10_000;

/// Command line arguments for the MoodMunch demo player.
#[derive(Parser, Debug)]
#[command(name = "moodmunch")]
#[command(about = "Falling-emoji mood mini-game, played headlessly")]
#[command(version)]
struct Args {
    /// Random seed for reproducible sessions
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of sessions to play back to back
    #[arg(long, default_value_t = 1)]
    sessions: u32,

    /// Probability that an in-flight emoji is caught on any one step
    #[arg(long, default_value_t = 0.05)]
    catch_chance: f64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> MunchResult<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    info!("Starting MoodMunch v{}", moodmunch::VERSION);

    let seed = args.seed.unwrap_or_else(rand::random);
    let catch_chance = args.catch_chance.clamp(0.0, 1.0);
    info!("Playing {} session(s) with seed {}", args.sessions, seed);

    let store = HighScoreStore::open_default();
    let session = GameSession::with_seed(store, seed);
    let mut driver = SessionDriver::new(session);
    let mut policy = StdRng::seed_from_u64(seed.wrapping_add(1));

    for n in 1..=args.sessions {
        play_session(&mut driver, &mut policy, catch_chance);
        info!(
            "session {}/{} done: final score {}, high score {}",
            n,
            args.sessions,
            driver.session().score(),
            driver.session().high_score()
        );
    }

    Ok(())
}

/// Plays one session to game over.
///
/// Each step advances the driver by [`STEP`] and then rolls a catch for
/// every emoji still in flight; emojis that never win a roll fall through
/// and cost a life, so every session terminates.
fn play_session(driver: &mut SessionDriver, policy: &mut StdRng, catch_chance: f64) {
    let mut now = Instant::now();
    for event in driver.start_session(now) {
        report(&event);
    }

    let mut steps = 0;
    while driver.session().is_active() {
        steps += 1;
        if steps > MAX_STEPS {
            info!("session cap reached, ending it");
            for event in driver.end_session() {
                report(&event);
            }
            break;
        }

        now += STEP;
        for event in driver.tick(now) {
            report(&event);
        }
        if !driver.session().is_active() {
            break;
        }

        let in_flight: Vec<_> = driver.session().falling_entities().map(|e| e.id).collect();
        for id in in_flight {
            if policy.gen_bool(catch_chance) {
                for event in driver.catch(now, id) {
                    report(&event);
                }
            }
        }
    }
}

/// Logs an event the way a frontend would toast it.
fn report(event: &GameEvent) {
    match event.display_duration() {
        Some(duration) => info!("{} (shown {}ms)", event.message(), duration.as_millis()),
        None => info!("{}", event.message()),
    }
}
