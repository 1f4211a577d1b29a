//! Interactive sessions rendered by the macroquad backend.

use anyhow::Result;
use rune_strike_core::SessionStatus;
use rune_strike_rendering::{Color, FrameInput, Presentation, RenderingBackend, Scene, WindowSize};
use rune_strike_rendering_macroquad::MacroquadBackend;
use rune_strike_session::{Session, SessionConfig, SessionListener};

use crate::listener::ConsoleListener;

const WINDOW_TITLE: &str = "Rune Strike";
const BACKGROUND: Color = Color::from_rgb_u8(18, 20, 32);

/// Options forwarded to the window backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct WindowOptions {
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

/// Opens a window and plays until the player quits.
pub(crate) fn run(config: SessionConfig, options: WindowOptions) -> Result<()> {
    let field = config.field;
    let window_size = WindowSize::new(field.width() as u32, field.height() as u32)?;

    let mut session = Session::new(config, ConsoleListener::default())?;
    session.start();
    let presentation = Presentation::new(WINDOW_TITLE, window_size, BACKGROUND, snapshot(&session));

    MacroquadBackend::new()
        .with_vsync(options.vsync)
        .with_show_fps(options.show_fps)
        .run(presentation, move |dt, input, scene| {
            apply_input(&mut session, input);
            session.frame(dt);
            *scene = snapshot(&session);
        })
}

fn snapshot<L>(session: &Session<L>) -> Scene
where
    L: SessionListener,
{
    Scene::from_snapshots(
        session.field(),
        &session.combat(),
        &session.words(),
        &session.projectiles(),
        session.published(),
    )
}

/// Forwards one frame of player input to the session.
fn apply_input<L>(session: &mut Session<L>, input: FrameInput)
where
    L: SessionListener,
{
    let FrameInput {
        typed,
        confirm_level_up,
        concede,
        toggle_pause,
        viewport,
    } = input;

    if let Some(viewport) = viewport {
        let field = session.field();
        if viewport.x != field.width() || viewport.y != field.height() {
            session.resize(viewport.x, viewport.y);
        }
    }
    if toggle_pause {
        session.set_paused(session.status() != SessionStatus::Paused);
    }
    if confirm_level_up {
        session.confirm_level_up();
    }
    if concede {
        session.concede();
    }
    for key in typed {
        let _ = session.key_down(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rune_strike_core::{KeyInput, PlayField, REFERENCE_FRAME};
    use rune_strike_session::Lifecycle;

    fn started() -> Session<ConsoleListener> {
        let mut session =
            Session::new(SessionConfig::default(), ConsoleListener::default()).expect("valid");
        session.start();
        for _ in 0..120 {
            session.frame(REFERENCE_FRAME);
        }
        session
    }

    #[test]
    fn typed_characters_reach_the_session() {
        let mut session = started();
        let text = session
            .words()
            .iter()
            .next()
            .map(|word| word.text.clone())
            .expect("a word spawned");

        apply_input(
            &mut session,
            FrameInput {
                typed: text.chars().map(KeyInput::from_char).collect(),
                ..FrameInput::default()
            },
        );

        assert_eq!(session.combat().words_typed, 1);
        assert_eq!(session.typing().misses(), 0);
    }

    #[test]
    fn pause_toggles_both_ways() {
        let mut session = started();
        let toggle = || FrameInput {
            toggle_pause: true,
            ..FrameInput::default()
        };

        apply_input(&mut session, toggle());
        assert_eq!(session.status(), SessionStatus::Paused);
        apply_input(&mut session, toggle());
        assert_eq!(session.status(), SessionStatus::Running);
    }

    #[test]
    fn viewport_changes_resize_the_field() {
        let mut session = started();
        apply_input(
            &mut session,
            FrameInput {
                viewport: Some(Vec2::new(900.0, 500.0)),
                ..FrameInput::default()
            },
        );
        assert_eq!(session.field(), PlayField::new(900.0, 500.0));
    }

    #[test]
    fn concede_finishes_the_session() {
        let mut session = started();
        apply_input(
            &mut session,
            FrameInput {
                concede: true,
                ..FrameInput::default()
            },
        );

        assert_eq!(session.lifecycle(), Lifecycle::Finished);
        assert!(session.listener().game_over_reported());
        assert_eq!(snapshot(&session).status, SessionStatus::GameOver);
    }
}
