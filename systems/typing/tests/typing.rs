use rune_strike_core::{Command, Event, KeyInput, SessionStatus, WordId};
use rune_strike_system_typing::{Keystroke, Typing};
use rune_strike_world::{self as world, query, World};

struct Harness {
    world: World,
    typing: Typing,
    events: Vec<Event>,
}

impl Harness {
    fn new() -> Self {
        Self {
            world: World::new(),
            typing: Typing::new(),
            events: Vec::new(),
        }
    }

    fn spawn(&mut self, text: &str) -> WordId {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SpawnWord {
                text: text.to_owned(),
                jitter: 0.0,
                healing: false,
            },
            &mut events,
        );
        events
            .iter()
            .find_map(|event| match event {
                Event::WordSpawned { word, .. } => Some(*word),
                _ => None,
            })
            .expect("word spawned")
    }

    fn press(&mut self, character: char) -> Keystroke {
        self.press_key(KeyInput::from_char(character))
    }

    fn press_key(&mut self, key: KeyInput) -> Keystroke {
        let words = query::word_view(&self.world);
        let mut commands = Vec::new();
        let keystroke = self.typing.handle(
            key,
            query::status(&self.world),
            &words,
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut self.events);
        }
        keystroke
    }

    fn type_text(&mut self, text: &str) -> Vec<Keystroke> {
        text.chars().map(|character| self.press(character)).collect()
    }
}

#[test]
fn typing_a_word_completes_it() {
    let mut harness = Harness::new();
    let fire = harness.spawn("fire");

    let keystrokes = harness.type_text("FiRe");

    assert_eq!(
        keystrokes,
        vec![
            Keystroke::Locked(fire),
            Keystroke::Advanced(fire),
            Keystroke::Advanced(fire),
            Keystroke::Completed(fire),
        ]
    );
    assert!(harness.events.contains(&Event::WordCompleted {
        word: fire,
        healing: false
    }));
    let combat = query::combat(&harness.world);
    assert_eq!(combat.combo, 1);
    assert_eq!(combat.score, 1);
    assert_eq!(combat.characters_typed, 4);
    assert!(query::word_view(&harness.world).is_empty());
}

#[test]
fn unmatched_key_has_no_side_effect() {
    let mut harness = Harness::new();
    let _ = harness.spawn("storm");

    assert_eq!(harness.press('q'), Keystroke::Unmatched);
    assert!(harness.events.is_empty());
    assert_eq!(query::combat(&harness.world).locked, None);
}

#[test]
fn miss_releases_word_and_resets_combo() {
    let mut harness = Harness::new();
    let ice = harness.spawn("ice");
    let _ = harness.type_text("ice");
    let rune = harness.spawn("rune");

    assert_eq!(harness.press('r'), Keystroke::Locked(rune));
    assert_eq!(harness.press('x'), Keystroke::Missed(rune));

    let combat = query::combat(&harness.world);
    assert_eq!(combat.combo, 0);
    assert_eq!(combat.locked, None);
    let view = query::word_view(&harness.world);
    assert_eq!(view.get(rune).map(|word| word.match_progress), Some(0));
    assert!(view.get(ice).is_none());
    assert!(harness.events.contains(&Event::ComboChanged { combo: 0 }));

    assert_eq!(harness.press('r'), Keystroke::Locked(rune));
}

#[test]
fn held_key_repeat_leaves_the_lock_untouched() {
    let mut harness = Harness::new();
    let _ = harness.spawn("ice");
    let _ = harness.type_text("ice");
    let fire = harness.spawn("fire");

    assert_eq!(harness.press('f'), Keystroke::Locked(fire));
    let events_before = harness.events.len();
    assert_eq!(harness.press_key(KeyInput::Repeat('f')), Keystroke::Ignored);
    assert_eq!(harness.press_key(KeyInput::Repeat('x')), Keystroke::Ignored);

    assert_eq!(harness.events.len(), events_before);
    let combat = query::combat(&harness.world);
    assert_eq!(combat.combo, 1);
    assert_eq!(combat.locked, Some(fire));
    assert_eq!(harness.typing.misses(), 0);

    assert_eq!(harness.type_text("ire").last(), Some(&Keystroke::Completed(fire)));
    assert_eq!(query::combat(&harness.world).combo, 2);
}

#[test]
fn locked_word_keeps_focus_over_other_candidates() {
    let mut harness = Harness::new();
    let spell = harness.spawn("spell");
    let storm = harness.spawn("storm");

    assert_eq!(harness.press('s'), Keystroke::Locked(spell));
    assert_eq!(harness.press('t'), Keystroke::Missed(spell));
    assert_eq!(harness.press('s'), Keystroke::Locked(spell));

    let view = query::word_view(&harness.world);
    assert_eq!(view.get(storm).map(|word| word.match_progress), Some(0));
}

#[test]
fn match_progress_stays_within_bounds_with_a_single_lock() {
    let mut harness = Harness::new();
    for text in ["chaos", "portal", "nova", "time", "magic", "dark"] {
        let _ = harness.spawn(text);
    }

    for character in "cphaoxsportamntimeqdarkmagicnova".chars() {
        let _ = harness.press(character);
        let view = query::word_view(&harness.world);
        assert!(view.iter().filter(|word| word.is_locked()).count() <= 1);
        for word in view.iter() {
            assert!(word.match_progress < word.char_count());
        }
    }
}

#[test]
fn keys_are_ignored_after_concede() {
    let mut harness = Harness::new();
    let _ = harness.spawn("zap");
    let mut events = Vec::new();
    world::apply(&mut harness.world, Command::Concede, &mut events);

    assert_eq!(harness.press('z'), Keystroke::Ignored);
    assert_eq!(query::status(&harness.world), SessionStatus::GameOver);
}
