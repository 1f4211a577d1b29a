#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rune Strike adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use rune_strike_core::{
    enemy_hp_for_level, CombatSnapshot, KeyInput, PlayField, ProjectileId, ProjectileView,
    Scoreboard, SessionStatus, WordId, WordView, MAX_PLAYER_HP,
};
use std::{error::Error, fmt, time::Duration};

/// Number of horizontal lanes words are distributed across.
pub const WORD_LANES: u32 = 6;

const LANE_BAND_TOP: f32 = 0.15;
const LANE_BAND_HEIGHT: f32 = 0.7;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Keys typed since the previous frame, in order.
    pub typed: Vec<KeyInput>,
    /// Whether the player accepted a pending level-up on this frame.
    pub confirm_level_up: bool,
    /// Whether the player asked to give up on this frame.
    pub concede: bool,
    /// Whether the player toggled the pause on this frame.
    pub toggle_pause: bool,
    /// Size of the drawable area, when the adapter can measure it.
    pub viewport: Option<Vec2>,
}

/// Vertical position of the lane assigned to `word`.
///
/// Lanes are spread over the middle of the field so labels never touch the
/// HUD or the bottom edge. Assignment only depends on the identifier.
#[must_use]
pub fn lane_y(word: WordId, field_height: f32) -> f32 {
    let lane = (word.get() % WORD_LANES) as f32;
    let spacing = field_height * LANE_BAND_HEIGHT / WORD_LANES as f32;
    field_height * LANE_BAND_TOP + spacing * (lane + 0.5)
}

/// Word label placed on the field.
#[derive(Clone, Debug, PartialEq)]
pub struct WordPresentation {
    /// Identifier of the word.
    pub id: WordId,
    /// Characters the player already typed.
    pub typed: String,
    /// Characters still to be typed.
    pub remaining: String,
    /// Anchor of the label in field coordinates.
    pub position: Vec2,
    /// Whether the word heals on completion.
    pub healing: bool,
    /// Whether the word is the current typing target.
    pub locked: bool,
}

/// Projectile sprite placed on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectilePresentation {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Centre of the projectile in field coordinates.
    pub position: Vec2,
    /// Whether the projectile already struck and is fading out.
    pub hit: bool,
}

/// Health pool rendered as a bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealthBar {
    /// Hit points reported by the simulation; may be negative.
    pub current: i32,
    /// Hit points of a full bar.
    pub maximum: i32,
}

impl HealthBar {
    /// Hit points shown to the player, never below zero.
    #[must_use]
    pub fn displayed(&self) -> i32 {
        self.current.clamp(0, self.maximum.max(0))
    }

    /// Fill ratio of the bar in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        self.displayed() as f32 / self.maximum as f32
    }
}

/// Scene description combining combatants, words and the scoreboard.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Width and height of the play field.
    pub field: Vec2,
    /// Position of the player on the left edge.
    pub player_position: Vec2,
    /// Position of the enemy on the right edge.
    pub enemy_position: Vec2,
    /// Words in flight.
    pub words: Vec<WordPresentation>,
    /// Projectiles in flight or fading out.
    pub projectiles: Vec<ProjectilePresentation>,
    /// Player health bar.
    pub player_health: HealthBar,
    /// Enemy health bar.
    pub enemy_health: HealthBar,
    /// Values shown in the heads-up display.
    pub scoreboard: Scoreboard,
    /// Status of the simulation.
    pub status: SessionStatus,
}

impl Scene {
    /// Builds a scene from simulation snapshots.
    #[must_use]
    pub fn from_snapshots(
        field: PlayField,
        combat: &CombatSnapshot,
        words: &WordView,
        projectiles: &ProjectileView,
        scoreboard: Scoreboard,
    ) -> Self {
        let centre_y = field.height() / 2.0;
        let words = words
            .iter()
            .map(|word| {
                let typed = word.typed_prefix();
                WordPresentation {
                    id: word.id,
                    typed: typed.to_owned(),
                    remaining: word.text[typed.len()..].to_owned(),
                    position: Vec2::new(word.position, lane_y(word.id, field.height())),
                    healing: word.healing,
                    locked: word.is_locked(),
                }
            })
            .collect();
        let projectiles = projectiles
            .iter()
            .map(|projectile| ProjectilePresentation {
                id: projectile.id,
                position: Vec2::new(projectile.position, centre_y),
                hit: projectile.hit,
            })
            .collect();

        Self {
            field: Vec2::new(field.width(), field.height()),
            player_position: Vec2::new(field.player_boundary(), centre_y),
            enemy_position: Vec2::new(field.enemy_boundary(), centre_y),
            words,
            projectiles,
            player_health: HealthBar {
                current: combat.player_hp,
                maximum: MAX_PLAYER_HP,
            },
            enemy_health: HealthBar {
                current: combat.enemy_hp,
                maximum: enemy_hp_for_level(combat.level),
            },
            scoreboard,
            status: combat.status,
        }
    }

    /// Message drawn over the field for non-running states.
    #[must_use]
    pub fn overlay_message(&self) -> Option<&'static str> {
        match self.status {
            SessionStatus::Running => None,
            SessionStatus::Paused => Some("Paused. Press Tab to resume."),
            SessionStatus::AwaitingLevelUp => {
                Some("Enemy defeated! Press Enter to accept the challenge.")
            }
            SessionStatus::GameOver => Some("Game over. Press Escape to quit."),
        }
    }
}

/// Window dimensions requested from the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    width: u32,
    height: u32,
}

impl WindowSize {
    /// Validates the provided dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderingError> {
        if width == 0 || height == 0 {
            return Err(RenderingError::InvalidWindowSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Window width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Window height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window dimensions.
    pub window_size: WindowSize,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        window_size: WindowSize,
        clear_color: Color,
        scene: Scene,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Rune Strike scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and replaces the scene with
    /// fresh simulation snapshots before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Windows need a non-zero area.
    InvalidWindowSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindowSize { width, height } => {
                write!(f, "window size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
