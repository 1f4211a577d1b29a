use rune_strike_core::{KeyInput, SessionStatus};
use rune_strike_rendering_macroquad::{KeyboardLatch, LatchedFrame};

#[derive(Clone, Copy)]
enum Press {
    Char(char),
    Held(char),
    Enter,
    Escape,
    Tab,
}

fn run_sequence(frames: &[(Vec<Press>, SessionStatus)]) -> Vec<LatchedFrame> {
    let mut latch = KeyboardLatch::default();
    let mut outcomes = Vec::new();
    for (presses, status) in frames {
        for press in presses.iter() {
            match *press {
                Press::Char(character) => latch.register_char(character),
                Press::Held(character) => latch.register_repeat(character),
                Press::Enter => latch.register_confirm(),
                Press::Escape => latch.register_escape(),
                Press::Tab => latch.register_pause_toggle(),
            }
        }
        outcomes.push(latch.take(*status, None));
    }
    outcomes
}

#[test]
fn typed_characters_are_delivered_once_in_order() {
    let outcomes = run_sequence(&[
        (vec![Press::Char('f'), Press::Char('i')], SessionStatus::Running),
        (vec![], SessionStatus::Running),
        (vec![Press::Char('r'), Press::Enter], SessionStatus::AwaitingLevelUp),
    ]);

    assert_eq!(
        outcomes[0].input.typed,
        vec![KeyInput::Character('f'), KeyInput::Character('i')]
    );
    assert!(outcomes[1].input.typed.is_empty());
    assert_eq!(outcomes[2].input.typed, vec![KeyInput::Character('r')]);
    assert!(!outcomes[0].input.confirm_level_up);
    assert!(outcomes[2].input.confirm_level_up);
    assert!(outcomes.iter().all(|outcome| !outcome.quit));
}

#[test]
fn held_keys_are_forwarded_as_repeats() {
    let outcomes = run_sequence(&[(
        vec![Press::Char('f'), Press::Held('f'), Press::Held('f')],
        SessionStatus::Running,
    )]);

    assert_eq!(
        outcomes[0].input.typed,
        vec![
            KeyInput::Character('f'),
            KeyInput::Repeat('f'),
            KeyInput::Repeat('f')
        ]
    );
}

#[test]
fn escape_concedes_then_quits() {
    let outcomes = run_sequence(&[
        (vec![Press::Escape], SessionStatus::Running),
        (vec![], SessionStatus::GameOver),
        (vec![Press::Escape], SessionStatus::GameOver),
    ]);

    assert!(outcomes[0].input.concede);
    assert!(!outcomes[0].quit);
    assert!(!outcomes[1].input.concede && !outcomes[1].quit);
    assert!(!outcomes[2].input.concede);
    assert!(outcomes[2].quit);
}

#[test]
fn pause_toggle_sequence_is_deterministic() {
    let sequence = [
        (vec![Press::Tab], SessionStatus::Running),
        (vec![], SessionStatus::Paused),
        (vec![Press::Tab], SessionStatus::Paused),
        (vec![Press::Tab, Press::Tab], SessionStatus::Running),
    ];

    let first: Vec<bool> = run_sequence(&sequence)
        .iter()
        .map(|outcome| outcome.input.toggle_pause)
        .collect();
    let second: Vec<bool> = run_sequence(&sequence)
        .iter()
        .map(|outcome| outcome.input.toggle_pause)
        .collect();

    assert_eq!(first, vec![true, false, true, true]);
    assert_eq!(first, second);
}
