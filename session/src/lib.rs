#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven session that wires the world and the pure systems together.
//!
//! A [`Session`] is driven by its host: [`Session::frame`] once per rendered
//! frame and [`Session::key_down`] for every keystroke. Both run on the
//! caller's thread, so each keystroke observes the words exactly as the last
//! frame left them.

mod config;
mod listener;

use std::time::Duration;

use rune_strike_core::{
    CombatSnapshot, Command, Event, KeyInput, PlayField, ProjectileView, Scoreboard,
    SessionStatus, WordView,
};
use rune_strike_system_metrics::{Metrics, Publisher};
use rune_strike_system_spawning::{Config as SpawningConfig, Spawning, Vocabulary};
use rune_strike_system_typing::{Keystroke, Typing};
use rune_strike_world::{self as world, query, World, WorldConfig};

pub use config::{SessionConfig, SessionError, DEFAULT_SEED};
pub use listener::SessionListener;

/// Lifecycle of a session as seen by its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Created but not started; frames and keys are ignored.
    Ready,
    /// Frames advance the simulation and keys are matched.
    Running,
    /// Terminal state reached after game over or teardown.
    Finished,
}

/// Single game of Rune Strike bound to a host listener.
#[derive(Debug)]
pub struct Session<L> {
    world: World,
    spawning: Spawning,
    typing: Typing,
    metrics: Metrics,
    publisher: Publisher,
    challenge_vocabulary: Option<Vocabulary>,
    lifecycle: Lifecycle,
    listener: L,
}

impl<L> Session<L>
where
    L: SessionListener,
{
    /// Creates a session after validating its configuration.
    pub fn new(config: SessionConfig, listener: L) -> Result<Self, SessionError> {
        config.validate()?;

        let world = World::with_config(WorldConfig {
            difficulty: config.difficulty,
            require_level_up_confirmation: config.require_level_up_confirmation,
            field: config.field,
        });
        let spawning = Spawning::new(
            SpawningConfig::new(config.spawn_interval, config.seed),
            config.vocabulary,
        );
        let challenge_vocabulary = config
            .require_level_up_confirmation
            .then_some(config.challenge_vocabulary);

        Ok(Self {
            world,
            spawning,
            typing: Typing::new(),
            metrics: Metrics::new(),
            publisher: Publisher::new(config.cadence),
            challenge_vocabulary,
            lifecycle: Lifecycle::Ready,
            listener,
        })
    }

    /// Starts the frame loop. Has no effect unless the session is ready.
    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::Ready {
            return;
        }

        self.lifecycle = Lifecycle::Running;
        log::info!(
            "{} Difficulty: {}.",
            query::welcome_banner(&self.world),
            query::difficulty(&self.world)
        );
    }

    /// Advances the simulation by one host frame of `dt`.
    pub fn frame(&mut self, dt: Duration) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }

        self.execute(vec![Command::Tick { dt }]);
        self.publisher.advance(dt);
        self.publish();
        self.finish_if_game_over();
    }

    /// Matches a keystroke against the active words.
    pub fn key_down(&mut self, key: KeyInput) -> Keystroke {
        if self.lifecycle != Lifecycle::Running {
            return Keystroke::Ignored;
        }

        let words = query::word_view(&self.world);
        let mut commands = Vec::new();
        let keystroke =
            self.typing
                .handle(key, query::status(&self.world), &words, &mut commands);
        self.execute(commands);
        self.publish();
        self.finish_if_game_over();
        keystroke
    }

    /// Pauses or resumes the simulation; the clock keeps running while paused.
    pub fn set_paused(&mut self, paused: bool) {
        if self.lifecycle == Lifecycle::Running {
            self.execute(vec![Command::SetPaused { paused }]);
        }
    }

    /// Resizes the play field. Unplayable sizes are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.lifecycle == Lifecycle::Finished {
            return;
        }

        self.execute(vec![Command::ConfigureField {
            field: PlayField::new(width, height),
        }]);
    }

    /// Accepts a pending level-up and switches to the challenge vocabulary.
    pub fn confirm_level_up(&mut self) {
        if self.lifecycle != Lifecycle::Running
            || query::status(&self.world) != SessionStatus::AwaitingLevelUp
        {
            return;
        }

        self.execute(vec![Command::ConfirmLevelUp]);
        if let Some(vocabulary) = self.challenge_vocabulary.take() {
            self.spawning.set_vocabulary(vocabulary);
        }
        self.publish();
    }

    /// Ends the game on the player's request.
    pub fn concede(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            return;
        }

        log::info!("player conceded");
        self.execute(vec![Command::Concede]);
        self.finish_if_game_over();
    }

    /// Tears the session down without reporting a game over.
    pub fn stop(&mut self) {
        if self.lifecycle == Lifecycle::Finished {
            return;
        }

        self.lifecycle = Lifecycle::Finished;
        log::info!("session stopped");
    }

    /// Current lifecycle of the session.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Status of the underlying simulation.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        query::status(&self.world)
    }

    /// Banner shown when the experience boots.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Current play field dimensions.
    #[must_use]
    pub fn field(&self) -> PlayField {
        query::field(&self.world)
    }

    /// Snapshot of health pools, level, combo and score.
    #[must_use]
    pub fn combat(&self) -> CombatSnapshot {
        query::combat(&self.world)
    }

    /// Snapshot of the words in flight.
    #[must_use]
    pub fn words(&self) -> WordView {
        query::word_view(&self.world)
    }

    /// Snapshot of the projectiles in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Current scoreboard, regardless of what was published.
    #[must_use]
    pub fn scoreboard(&self) -> Scoreboard {
        self.metrics.scoreboard()
    }

    /// Scoreboard values last delivered to the listener.
    #[must_use]
    pub fn published(&self) -> Scoreboard {
        self.publisher.published()
    }

    /// Counters accumulated from world events.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Keystroke counters of the input matcher.
    #[must_use]
    pub fn typing(&self) -> &Typing {
        &self.typing
    }

    /// Listener receiving the session notifications.
    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Mutable access to the listener.
    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Consumes the session, returning its listener.
    #[must_use]
    pub fn into_listener(self) -> L {
        self.listener
    }

    fn execute(&mut self, mut pending: Vec<Command>) {
        while !pending.is_empty() {
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            pending = self.dispatch(&events);
        }
    }

    fn dispatch(&mut self, events: &[Event]) -> Vec<Command> {
        self.metrics.handle(events);

        for event in events {
            match event {
                Event::LevelUpReady { level } => {
                    log::info!("enemy of level {level} defeated; awaiting confirmation");
                    self.listener.on_level_up_ready(*level);
                }
                Event::LevelAdvanced { level, enemy_hp } => {
                    log::info!("level {level} started against an enemy with {enemy_hp} hp");
                }
                Event::GameOver { score, level } => {
                    log::info!("game over at level {level} with score {score}");
                }
                _ => {}
            }
        }

        let mut commands = Vec::new();
        self.spawning
            .handle(events, query::status(&self.world), &mut commands);
        commands
    }

    fn publish(&mut self) {
        let mut publications = Vec::new();
        self.publisher
            .publish(self.metrics.scoreboard(), &mut publications);
        listener::deliver(&mut self.listener, &publications);
    }

    fn finish_if_game_over(&mut self) {
        if self.lifecycle != Lifecycle::Running || !query::status(&self.world).is_game_over() {
            return;
        }

        self.lifecycle = Lifecycle::Finished;
        let mut publications = Vec::new();
        self.publisher
            .flush(self.metrics.scoreboard(), &mut publications);
        listener::deliver(&mut self.listener, &publications);
        self.listener.on_game_over();
    }
}
