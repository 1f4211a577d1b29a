use std::time::Duration;

use rune_strike_core::{Command, Event, Scoreboard, WordId, REFERENCE_FRAME};
use rune_strike_system_metrics::{Metrics, Publication, PublishCadence, Publisher};
use rune_strike_world::{self as world, query, World};

fn spawn(world: &mut World, text: &str, events: &mut Vec<Event>) -> WordId {
    let before = events.len();
    world::apply(
        world,
        Command::SpawnWord {
            text: text.to_owned(),
            jitter: 0.0,
            healing: false,
        },
        events,
    );
    events[before..]
        .iter()
        .find_map(|event| match event {
            Event::WordSpawned { word, .. } => Some(*word),
            _ => None,
        })
        .expect("word spawned")
}

fn type_word(world: &mut World, word: WordId, length: usize, events: &mut Vec<Event>) {
    world::apply(world, Command::LockWord { word }, events);
    for _ in 1..length {
        world::apply(world, Command::AdvanceMatch { word }, events);
    }
}

#[test]
fn scoreboard_mirrors_world_combat_state() {
    let mut world = World::new();
    let mut metrics = Metrics::new();
    let mut events = Vec::new();

    for text in ["portal", "spell", "chaos"] {
        let word = spawn(&mut world, text, &mut events);
        type_word(&mut world, word, text.len(), &mut events);
    }
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_secs(30),
        },
        &mut events,
    );
    metrics.handle(&events);

    let combat = query::combat(&world);
    let scoreboard = metrics.scoreboard();
    assert_eq!(scoreboard.score, combat.score);
    assert_eq!(scoreboard.combo, combat.combo);
    assert_eq!(scoreboard.level, combat.level);
    assert_eq!(metrics.characters_typed(), combat.characters_typed);
    assert_eq!(metrics.words_typed(), 3);
    assert_eq!(scoreboard.score, 6);
    assert_eq!(scoreboard.wpm, 6);
}

#[test]
fn fifty_characters_over_one_minute_reports_ten_wpm() {
    let mut world = World::new();
    let mut metrics = Metrics::new();

    for _ in 0..10 {
        let mut events = Vec::new();
        let word = spawn(&mut world, "magic", &mut events);
        type_word(&mut world, word, 5, &mut events);
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(6),
            },
            &mut events,
        );
        metrics.handle(&events);
    }

    assert_eq!(metrics.characters_typed(), 50);
    assert_eq!(metrics.elapsed(), Duration::from_secs(60));
    assert_eq!(metrics.wpm(), 10);
}

#[test]
fn flushed_publications_match_final_state() {
    let mut world = World::new();
    let mut metrics = Metrics::new();
    let mut publisher = Publisher::new(PublishCadence::default());
    let mut delivered = Scoreboard::initial();

    for text in ["fire", "ice", "storm", "rune"] {
        let mut events = Vec::new();
        let word = spawn(&mut world, text, &mut events);
        type_word(&mut world, word, text.len(), &mut events);
        world::apply(&mut world, Command::Tick { dt: REFERENCE_FRAME }, &mut events);
        metrics.handle(&events);

        let mut publications = Vec::new();
        publisher.advance(REFERENCE_FRAME);
        publisher.publish(metrics.scoreboard(), &mut publications);
        apply_publications(&mut delivered, &publications);
    }
    assert_ne!(delivered, metrics.scoreboard(), "throttle holds back changes");

    let mut publications = Vec::new();
    publisher.flush(metrics.scoreboard(), &mut publications);
    apply_publications(&mut delivered, &publications);

    assert_eq!(delivered, metrics.scoreboard());
    assert_eq!(publisher.published(), metrics.scoreboard());
}

fn apply_publications(board: &mut Scoreboard, publications: &[Publication]) {
    for publication in publications {
        match *publication {
            Publication::Score(score) => board.score = score,
            Publication::Level(level) => board.level = level,
            Publication::Combo(combo) => board.combo = combo,
            Publication::Wpm(wpm) => board.wpm = wpm,
        }
    }
}
