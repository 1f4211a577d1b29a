#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Rune Strike.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Keyboard handling: printable characters are forwarded to the session
//! (auto-repeats of a held key are marked as such),
//! `Enter` accepts a pending challenge, `Tab` toggles the pause and `Escape`
//! concedes a running game or quits once the game is over.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{get_char_pressed, get_last_key_pressed, is_key_pressed, KeyCode};
use rune_strike_core::{KeyInput, SessionStatus};
use rune_strike_rendering::{
    Color, FrameInput, HealthBar, Presentation, ProjectilePresentation, RenderingBackend, Scene,
    WordPresentation,
};
use std::time::Duration;

const COMBATANT_RADIUS: f32 = 28.0;
const PROJECTILE_RADIUS: f32 = 8.0;
const WORD_FONT_SIZE: u16 = 28;
const HUD_FONT_SIZE: u16 = 24;
const OVERLAY_FONT_SIZE: u16 = 36;
const HEALTH_BAR_WIDTH: f32 = 120.0;
const HEALTH_BAR_HEIGHT: f32 = 12.0;

const PLAYER_COLOR: Color = Color::from_rgb_u8(0x4f, 0x8c, 0xff);
const ENEMY_COLOR: Color = Color::from_rgb_u8(0xd6, 0x3a, 0x4a);
const ATTACK_WORD_COLOR: Color = Color::from_rgb_u8(0xee, 0xee, 0xf2);
const HEALING_WORD_COLOR: Color = Color::from_rgb_u8(0x5c, 0xd6, 0x7a);
const TYPED_COLOR: Color = Color::from_rgb_u8(0xff, 0xc1, 0x07);
const PROJECTILE_COLOR: Color = Color::from_rgb_u8(0xff, 0x8f, 0x3a);
const BAR_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.8);

/// Latches keyboard observations until the next scene update consumes them.
#[doc(hidden)]
#[derive(Clone, Debug, Default)]
pub struct KeyboardLatch {
    typed: Vec<KeyInput>,
    confirm_latched: bool,
    escape_latched: bool,
    pause_latched: bool,
}

/// Frame input resolved from latched keys.
#[doc(hidden)]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct LatchedFrame {
    /// Input forwarded to the scene update.
    pub input: FrameInput,
    /// Whether the render loop should stop after this frame.
    pub quit: bool,
}

impl KeyboardLatch {
    /// Records a character produced by the keyboard layer.
    pub fn register_char(&mut self, character: char) {
        self.typed.push(KeyInput::from_char(character));
    }

    /// Records a character produced by the auto-repeat of a held key.
    pub fn register_repeat(&mut self, character: char) {
        self.typed.push(KeyInput::from_char(character).repeated());
    }

    /// Records an `Enter` press.
    pub fn register_confirm(&mut self) {
        self.confirm_latched = true;
    }

    /// Records an `Escape` press.
    pub fn register_escape(&mut self) {
        self.escape_latched = true;
    }

    /// Records a `Tab` press.
    pub fn register_pause_toggle(&mut self) {
        self.pause_latched = true;
    }

    /// Drains the latched keys into a frame input.
    ///
    /// `Escape` concedes while the game is still undecided and quits once it is over.
    pub fn take(&mut self, status: SessionStatus, viewport: Option<Vec2>) -> LatchedFrame {
        let escape = std::mem::take(&mut self.escape_latched);
        let quit = escape && status.is_game_over();
        LatchedFrame {
            input: FrameInput {
                typed: std::mem::take(&mut self.typed),
                confirm_level_up: std::mem::take(&mut self.confirm_latched),
                concede: escape && !quit,
                toggle_pause: std::mem::take(&mut self.pause_latched),
                viewport,
            },
            quit,
        }
    }

    /// Macroquad only reports fresh key presses, so characters arriving on a
    /// frame without one come from a held key.
    fn poll(&mut self) {
        let fresh_press = get_last_key_pressed().is_some();
        while let Some(character) = get_char_pressed() {
            if fresh_press {
                self.register_char(character);
            } else {
                self.register_repeat(character);
            }
        }
        if is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter) {
            self.register_confirm();
        }
        if is_key_pressed(KeyCode::Escape) {
            self.register_escape();
        }
        if is_key_pressed(KeyCode::Tab) {
            self.register_pause_toggle();
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_size,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_size.width()).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_size.height()).unwrap_or(i32::MAX),
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut latch = KeyboardLatch::default();
            let mut fps_counter = FpsCounter::default();
            let background = to_macroquad_color(clear_color);

            loop {
                latch.poll();
                let viewport = Vec2::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                let LatchedFrame { input, quit } = latch.take(scene.status, Some(viewport));
                if quit {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, input, &mut scene);

                macroquad::window::clear_background(background);
                draw_scene(&scene);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        log::info!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene) {
    draw_combatant(scene.player_position, PLAYER_COLOR, scene.player_health);
    draw_combatant(scene.enemy_position, ENEMY_COLOR, scene.enemy_health);
    draw_projectiles(&scene.projectiles);
    draw_words(&scene.words);
    draw_hud(scene);

    if let Some(message) = scene.overlay_message() {
        draw_overlay(scene.field, message);
    }
}

fn draw_combatant(position: Vec2, color: Color, health: HealthBar) {
    macroquad::shapes::draw_circle(
        position.x,
        position.y,
        COMBATANT_RADIUS,
        to_macroquad_color(color),
    );

    let left = position.x - HEALTH_BAR_WIDTH * 0.5;
    let top = position.y - COMBATANT_RADIUS - HEALTH_BAR_HEIGHT * 2.0;
    macroquad::shapes::draw_rectangle(
        left,
        top,
        HEALTH_BAR_WIDTH,
        HEALTH_BAR_HEIGHT,
        to_macroquad_color(BAR_BACKGROUND),
    );
    let fill_width = HEALTH_BAR_WIDTH * health.fraction();
    if fill_width > f32::EPSILON {
        macroquad::shapes::draw_rectangle(
            left,
            top,
            fill_width,
            HEALTH_BAR_HEIGHT,
            to_macroquad_color(color.lighten(0.2)),
        );
    }

    let label = format!("{}/{}", health.displayed(), health.maximum);
    let _ = macroquad::text::draw_text(
        &label,
        left,
        top - 4.0,
        f32::from(HUD_FONT_SIZE) * 0.75,
        to_macroquad_color(ATTACK_WORD_COLOR),
    );
}

fn draw_projectiles(projectiles: &[ProjectilePresentation]) {
    for projectile in projectiles {
        let (radius, color) = if projectile.hit {
            (PROJECTILE_RADIUS * 2.0, PROJECTILE_COLOR.lighten(0.5))
        } else {
            (PROJECTILE_RADIUS, PROJECTILE_COLOR)
        };
        macroquad::shapes::draw_circle(
            projectile.position.x,
            projectile.position.y,
            radius,
            to_macroquad_color(color),
        );
    }
}

fn draw_words(words: &[WordPresentation]) {
    let font_size = f32::from(WORD_FONT_SIZE);
    for word in words {
        let base = if word.healing {
            HEALING_WORD_COLOR
        } else {
            ATTACK_WORD_COLOR
        };
        let remaining_color = if word.locked { base.lighten(0.4) } else { base };

        let typed_width = if word.typed.is_empty() {
            0.0
        } else {
            let _ = macroquad::text::draw_text(
                &word.typed,
                word.position.x,
                word.position.y,
                font_size,
                to_macroquad_color(TYPED_COLOR),
            );
            macroquad::text::measure_text(&word.typed, None, WORD_FONT_SIZE, 1.0).width
        };

        let _ = macroquad::text::draw_text(
            &word.remaining,
            word.position.x + typed_width,
            word.position.y,
            font_size,
            to_macroquad_color(remaining_color),
        );
    }
}

fn draw_hud(scene: &Scene) {
    let board = scene.scoreboard;
    let text = format!(
        "Score {}   Level {}   WPM {}   Combo x{}",
        board.score, board.level, board.wpm, board.combo
    );
    let _ = macroquad::text::draw_text(
        &text,
        16.0,
        32.0,
        f32::from(HUD_FONT_SIZE),
        to_macroquad_color(ATTACK_WORD_COLOR),
    );
}

fn draw_overlay(field: Vec2, message: &str) {
    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        field.x,
        field.y,
        macroquad::color::Color::new(0.0, 0.0, 0.0, 0.55),
    );
    let dimensions = macroquad::text::measure_text(message, None, OVERLAY_FONT_SIZE, 1.0);
    let _ = macroquad::text::draw_text(
        message,
        (field.x - dimensions.width) * 0.5,
        field.y * 0.5,
        f32::from(OVERLAY_FONT_SIZE),
        to_macroquad_color(ATTACK_WORD_COLOR),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
