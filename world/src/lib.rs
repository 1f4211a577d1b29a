#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative combat state management for Rune Strike.
//!
//! The world owns every word, projectile and health pool. It mutates state
//! only inside [`apply`], which resolves word expiry, completions, projectile
//! strikes and level transitions, and reports each outcome as an [`Event`].

mod projectiles;
mod words;

use std::time::Duration;

use rune_strike_core::{
    enemy_hp_for_level, Command, Difficulty, Event, PlayField, SessionStatus, WordId,
    MAX_PLAYER_HP, MAX_SPEED_JITTER, REFERENCE_FRAMES_PER_SECOND, WELCOME_BANNER,
};

use self::{
    projectiles::{ProjectileRegistry, HIT_LINGER_TICKS, PROJECTILE_SPEED},
    words::{Word, WordRegistry},
};

const INITIAL_WORD_SPEED: f32 = 2.0;
const LEVEL_SPEED_STEP: f32 = 0.5;
const HEAL_AMOUNT: i32 = 20;
const BASE_STRIKE_DAMAGE: u32 = 10;

/// Settings fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldConfig {
    /// Speed preset that scales the word speed growth between levels.
    pub difficulty: Difficulty,
    /// Holds the first level-up until the host confirms it.
    pub require_level_up_confirmation: bool,
    /// Initial play field dimensions.
    pub field: PlayField,
}

#[derive(Clone, Copy, Debug)]
struct CombatState {
    player_hp: i32,
    enemy_hp: i32,
    level: u32,
    combo: u32,
    score: u32,
    words_typed: u32,
    characters_typed: u32,
    word_speed_base: f32,
}

impl CombatState {
    fn new() -> Self {
        Self {
            player_hp: MAX_PLAYER_HP,
            enemy_hp: enemy_hp_for_level(1),
            level: 1,
            combo: 0,
            score: 0,
            words_typed: 0,
            characters_typed: 0,
            word_speed_base: INITIAL_WORD_SPEED,
        }
    }

    fn strike_damage(&self) -> u32 {
        BASE_STRIKE_DAMAGE + self.level
    }
}

/// Represents the authoritative Rune Strike world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: WorldConfig,
    field: PlayField,
    words: WordRegistry,
    projectiles: ProjectileRegistry,
    lock: Option<WordId>,
    combat: CombatState,
    status: SessionStatus,
    challenge_accepted: bool,
    elapsed: Duration,
}

impl World {
    /// Creates a new world using the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a new world using the supplied configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            config,
            field: config.field,
            words: WordRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            lock: None,
            combat: CombatState::new(),
            status: SessionStatus::Running,
            challenge_accepted: false,
            elapsed: Duration::ZERO,
        }
    }

    fn set_status(&mut self, status: SessionStatus, out_events: &mut Vec<Event>) {
        if self.status != status {
            self.status = status;
            out_events.push(Event::StatusChanged { status });
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        if !self.status.is_running() {
            return;
        }

        let frames = dt.as_secs_f32() * REFERENCE_FRAMES_PER_SECOND;
        self.advance_words(frames, out_events);
        if self.status.is_game_over() {
            return;
        }
        self.advance_projectiles(frames, out_events);
        self.projectiles.prune(self.field.width());
    }

    fn advance_words(&mut self, frames: f32, out_events: &mut Vec<Event>) {
        let expired = self.words.advance(frames, self.field.player_boundary());
        for word in expired {
            if self.lock == Some(word.id) {
                self.lock = None;
            }

            let damage = self.combat.strike_damage();
            self.combat.player_hp = self
                .combat
                .player_hp
                .saturating_sub(i32::try_from(damage).unwrap_or(i32::MAX));
            self.combat.combo = 0;
            log::debug!("word {} expired for {damage} damage", word.id.get());
            out_events.push(Event::WordExpired {
                word: word.id,
                damage,
            });
            out_events.push(Event::PlayerDamaged {
                amount: damage,
                player_hp: self.combat.player_hp,
            });
            out_events.push(Event::ComboChanged { combo: 0 });

            if self.combat.player_hp <= 0 {
                self.enter_game_over(out_events);
                return;
            }
        }
    }

    fn advance_projectiles(&mut self, frames: f32, out_events: &mut Vec<Event>) {
        let enemy_boundary = self.field.enemy_boundary();
        let Self {
            projectiles,
            combat,
            status,
            config,
            challenge_accepted,
            ..
        } = self;

        for projectile in projectiles.iter_mut() {
            if projectile.hit {
                projectile.linger_ticks = projectile.linger_ticks.saturating_sub(1);
                continue;
            }

            if !status.is_running() {
                continue;
            }

            projectile.position += PROJECTILE_SPEED * frames;
            if projectile.position < enemy_boundary {
                continue;
            }

            projectile.hit = true;
            projectile.linger_ticks = HIT_LINGER_TICKS;
            combat.enemy_hp = combat
                .enemy_hp
                .saturating_sub(i32::try_from(projectile.damage).unwrap_or(i32::MAX));
            out_events.push(Event::ProjectileHit {
                projectile: projectile.id,
                damage: projectile.damage,
                enemy_hp: combat.enemy_hp,
            });

            if combat.enemy_hp > 0 {
                continue;
            }

            if config.require_level_up_confirmation && !*challenge_accepted {
                *status = SessionStatus::AwaitingLevelUp;
                out_events.push(Event::StatusChanged {
                    status: SessionStatus::AwaitingLevelUp,
                });
                out_events.push(Event::LevelUpReady {
                    level: combat.level,
                });
            } else {
                level_up(combat, config.difficulty, out_events);
            }
        }
    }

    fn lock_word(&mut self, word: WordId, out_events: &mut Vec<Event>) {
        if !self.status.is_running() || self.lock.is_some() {
            return;
        }

        let Some(entry) = self.words.get_mut(word) else {
            return;
        };
        entry.match_progress = 1;
        self.lock = Some(word);
        self.combat.characters_typed = self.combat.characters_typed.saturating_add(1);
        out_events.push(Event::WordLocked { word });
        out_events.push(Event::CharacterAccepted { word, progress: 1 });

        if entry.is_complete() {
            self.complete_locked(word, out_events);
        }
    }

    fn advance_match(&mut self, word: WordId, out_events: &mut Vec<Event>) {
        if !self.status.is_running() || self.lock != Some(word) {
            return;
        }

        let Some(entry) = self.words.get_mut(word) else {
            self.lock = None;
            return;
        };
        entry.match_progress = entry.match_progress.saturating_add(1);
        let progress = entry.match_progress;
        let complete = entry.is_complete();
        self.combat.characters_typed = self.combat.characters_typed.saturating_add(1);
        out_events.push(Event::CharacterAccepted { word, progress });

        if complete {
            self.complete_locked(word, out_events);
        }
    }

    fn break_lock(&mut self, word: WordId, out_events: &mut Vec<Event>) {
        if !self.status.is_running() || self.lock != Some(word) {
            return;
        }

        if let Some(entry) = self.words.get_mut(word) {
            entry.match_progress = 0;
        }
        self.lock = None;
        self.combat.combo = 0;
        log::debug!("lock on word {} broken by a miss", word.get());
        out_events.push(Event::LockBroken { word });
        out_events.push(Event::ComboChanged { combo: 0 });
    }

    fn complete_locked(&mut self, word: WordId, out_events: &mut Vec<Event>) {
        self.lock = None;
        let Some(Word { id, healing, .. }) = self.words.remove(word) else {
            return;
        };

        let combat = &mut self.combat;
        combat.combo = combat.combo.saturating_add(1);
        combat.words_typed = combat.words_typed.saturating_add(1);
        combat.score = combat.score.saturating_add(combat.combo);
        out_events.push(Event::WordCompleted { word: id, healing });
        out_events.push(Event::ComboChanged {
            combo: combat.combo,
        });
        out_events.push(Event::ScoreChanged {
            score: combat.score,
        });

        if healing {
            let before = combat.player_hp;
            combat.player_hp = combat.player_hp.saturating_add(HEAL_AMOUNT).min(MAX_PLAYER_HP);
            let amount = u32::try_from(combat.player_hp - before).unwrap_or(0);
            out_events.push(Event::PlayerHealed {
                amount,
                player_hp: combat.player_hp,
            });
        } else {
            let damage = combat.strike_damage();
            let projectile = self
                .projectiles
                .launch(self.field.player_boundary(), damage);
            out_events.push(Event::ProjectileLaunched { projectile, damage });
        }
    }

    fn spawn_word(&mut self, text: String, jitter: f32, healing: bool, out: &mut Vec<Event>) {
        if !self.status.is_running() || text.trim().is_empty() {
            return;
        }

        let jitter = if jitter.is_finite() {
            jitter.clamp(0.0, MAX_SPEED_JITTER)
        } else {
            0.0
        };
        let speed = self.combat.word_speed_base * (1.0 + jitter);
        let word = self
            .words
            .spawn(text.clone(), self.field.spawn_position(), speed, healing);
        out.push(Event::WordSpawned {
            word,
            text,
            healing,
            speed,
        });
    }

    fn confirm_level_up(&mut self, out_events: &mut Vec<Event>) {
        if self.status != SessionStatus::AwaitingLevelUp {
            return;
        }

        self.challenge_accepted = true;
        level_up(&mut self.combat, self.config.difficulty, out_events);
        self.set_status(SessionStatus::Running, out_events);
    }

    fn enter_game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.status.is_game_over() {
            return;
        }

        self.lock = None;
        self.set_status(SessionStatus::GameOver, out_events);
        out_events.push(Event::GameOver {
            score: self.combat.score,
            level: self.combat.level,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn level_up(combat: &mut CombatState, difficulty: Difficulty, out_events: &mut Vec<Event>) {
    combat.level = combat.level.saturating_add(1);
    combat.word_speed_base += LEVEL_SPEED_STEP * difficulty.speed_multiplier();
    combat.enemy_hp = enemy_hp_for_level(combat.level);
    out_events.push(Event::LevelAdvanced {
        level: combat.level,
        enemy_hp: combat.enemy_hp,
    });
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Once the world reached [`SessionStatus::GameOver`] every command is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.status.is_game_over() {
        return;
    }

    match command {
        Command::ConfigureField { field } => {
            if field.is_playable() {
                world.field = field;
                out_events.push(Event::FieldConfigured { field });
            } else {
                log::warn!(
                    "ignoring unplayable field {}x{}",
                    field.width(),
                    field.height()
                );
            }
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnWord {
            text,
            jitter,
            healing,
        } => world.spawn_word(text, jitter, healing, out_events),
        Command::LockWord { word } => world.lock_word(word, out_events),
        Command::AdvanceMatch { word } => world.advance_match(word, out_events),
        Command::BreakLock { word } => world.break_lock(word, out_events),
        Command::SetPaused { paused } => match (paused, world.status) {
            (true, SessionStatus::Running) => world.set_status(SessionStatus::Paused, out_events),
            (false, SessionStatus::Paused) => world.set_status(SessionStatus::Running, out_events),
            _ => {}
        },
        Command::ConfirmLevelUp => world.confirm_level_up(out_events),
        Command::Concede => world.enter_game_over(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use rune_strike_core::{
        CombatSnapshot, Difficulty, PlayField, ProjectileView, SessionStatus, WordView,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides the current play field dimensions.
    #[must_use]
    pub fn field(world: &World) -> PlayField {
        world.field
    }

    /// Reports the lifecycle status of the simulation.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// Reports the difficulty preset the world was created with.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.config.difficulty
    }

    /// Simulated time accumulated by ticks.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Captures a read-only copy of the combat state.
    #[must_use]
    pub fn combat(world: &World) -> CombatSnapshot {
        let combat = &world.combat;
        CombatSnapshot {
            player_hp: combat.player_hp,
            enemy_hp: combat.enemy_hp,
            level: combat.level,
            combo: combat.combo,
            score: combat.score,
            words_typed: combat.words_typed,
            characters_typed: combat.characters_typed,
            word_speed_base: combat.word_speed_base,
            status: world.status,
            locked: world.lock,
        }
    }

    /// Captures a read-only view of the words in flight.
    #[must_use]
    pub fn word_view(world: &World) -> WordView {
        WordView::from_snapshots(world.words.iter().map(|word| word.snapshot()).collect())
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }
}
