#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rune Strike engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable views such
//! as [`WordView`] and [`CombatSnapshot`] and respond with [`Command`] values.
//! The world executes those commands via its `apply` entry point and then
//! broadcasts [`Event`] values that the remaining systems and the session
//! driver consume deterministically.

use std::{error::Error, fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rune Strike.";

/// Duration of a single reference animation frame.
///
/// Word and projectile speeds are expressed in world units per reference
/// frame, so a tick of exactly this length moves an entity by its speed.
pub const REFERENCE_FRAME: Duration = Duration::from_nanos(16_666_667);

/// Number of reference frames contained in one simulated second.
pub const REFERENCE_FRAMES_PER_SECOND: f32 = 60.0;

/// Upper bound of the random speed jitter applied to spawned words.
pub const MAX_SPEED_JITTER: f32 = 0.5;

/// Maximum hit points of the player.
pub const MAX_PLAYER_HP: i32 = 100;

/// Hit points of the enemy faced on the first level.
pub const INITIAL_ENEMY_HP: i32 = 100;

/// Distance between the play field edges and the combatants.
pub const EDGE_INSET: f32 = 80.0;

/// Hit points of the enemy that appears once the provided level is reached.
///
/// The first enemy starts at [`INITIAL_ENEMY_HP`]; every later enemy gains
/// five hit points per level.
#[must_use]
pub const fn enemy_hp_for_level(level: u32) -> i32 {
    if level <= 1 {
        INITIAL_ENEMY_HP
    } else {
        INITIAL_ENEMY_HP + level as i32 * 5
    }
}

/// Lowercases a single character for case-insensitive comparisons.
#[must_use]
pub fn fold_case(character: char) -> char {
    character.to_lowercase().next().unwrap_or(character)
}

/// Reports whether two characters match when compared case-insensitively.
#[must_use]
pub fn chars_match(left: char, right: char) -> bool {
    fold_case(left) == fold_case(right)
}

/// Speed preset chosen before a session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Word speed grows slowly between levels.
    Easy,
    /// Balanced default preset.
    #[default]
    Mid,
    /// Word speed grows rapidly between levels.
    Crazy,
}

impl Difficulty {
    /// Multiplier applied to the word speed increase on every level-up.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Easy => 2.0,
            Self::Mid => 3.0,
            Self::Crazy => 4.0,
        }
    }

    /// Canonical lowercase name of the preset.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Mid => "mid",
            Self::Crazy => "crazy",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "mid" => Ok(Self::Mid),
            "crazy" => Ok(Self::Crazy),
            _ => Err(ParseDifficultyError {
                value: value.to_owned(),
            }),
        }
    }
}

/// Error returned when a difficulty name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDifficultyError {
    value: String,
}

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown difficulty '{}' (expected easy, mid or crazy)",
            self.value
        )
    }
}

impl Error for ParseDifficultyError {}

/// Describes the lifecycle state of the combat simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Words advance, spawn and accept input.
    Running,
    /// The host paused the simulation; only the clock advances.
    Paused,
    /// The enemy fell and the simulation waits for the host to confirm the level-up.
    AwaitingLevelUp,
    /// Terminal state reached when the player falls or concedes.
    GameOver,
}

impl SessionStatus {
    /// Reports whether the simulation currently advances entities and accepts input.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Reports whether the status is terminal.
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// Raw keyboard input forwarded by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyInput {
    /// A printable character key.
    Character(char),
    /// Auto-repeat of a printable character key that is being held down.
    Repeat(char),
    /// Any non-character key such as a function or navigation key.
    Control,
}

impl KeyInput {
    /// Classifies a character produced by the host's keyboard layer.
    #[must_use]
    pub fn from_char(character: char) -> Self {
        if character.is_control() {
            Self::Control
        } else {
            Self::Character(character)
        }
    }

    /// Marks a character input as the auto-repeat of a held key.
    #[must_use]
    pub const fn repeated(self) -> Self {
        match self {
            Self::Character(character) | Self::Repeat(character) => Self::Repeat(character),
            Self::Control => Self::Control,
        }
    }

    /// Reports whether the input was produced by a held key.
    #[must_use]
    pub const fn is_repeat(self) -> bool {
        matches!(self, Self::Repeat(_))
    }

    /// Returns the printable character carried by the input, if any.
    #[must_use]
    pub const fn character(self) -> Option<char> {
        match self {
            Self::Character(character) | Self::Repeat(character) => Some(character),
            Self::Control => None,
        }
    }
}

/// Horizontal battle lane on which words and projectiles travel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    width: f32,
    height: f32,
}

impl PlayField {
    /// Creates a new play field with the provided dimensions in world units.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the field.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the field.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Horizontal coordinate at which words reach the player.
    #[must_use]
    pub const fn player_boundary(&self) -> f32 {
        EDGE_INSET
    }

    /// Horizontal coordinate at which projectiles reach the enemy.
    #[must_use]
    pub fn enemy_boundary(&self) -> f32 {
        self.width - EDGE_INSET
    }

    /// Horizontal coordinate at which new words appear.
    #[must_use]
    pub fn spawn_position(&self) -> f32 {
        self.width - EDGE_INSET
    }

    /// Reports whether the field leaves room between the two boundaries.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.height > 0.0
            && self.enemy_boundary() > self.player_boundary()
    }
}

impl Default for PlayField {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resizes the play field; entities keep their positions.
    ConfigureField {
        /// Dimensions of the resized field.
        field: PlayField,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a new word enters the field at the spawn edge.
    SpawnWord {
        /// Text the player must type.
        text: String,
        /// Random speed jitter in `0.0..=MAX_SPEED_JITTER`.
        jitter: f32,
        /// Whether completing the word heals the player instead of attacking.
        healing: bool,
    },
    /// Locks the provided word as the typing target after its first character matched.
    LockWord {
        /// Identifier of the word to lock.
        word: WordId,
    },
    /// Accepts the next character of the locked word.
    AdvanceMatch {
        /// Identifier of the locked word.
        word: WordId,
    },
    /// Releases the lock after a mismatched keystroke.
    BreakLock {
        /// Identifier of the locked word.
        word: WordId,
    },
    /// Pauses or resumes the simulation.
    SetPaused {
        /// Whether the simulation should be paused.
        paused: bool,
    },
    /// Confirms a pending level-up so the next enemy appears.
    ConfirmLevelUp,
    /// Ends the session on the player's request.
    Concede,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the play field was resized.
    FieldConfigured {
        /// Dimensions of the resized field.
        field: PlayField,
    },
    /// Confirms that a word entered the field.
    WordSpawned {
        /// Identifier assigned to the word.
        word: WordId,
        /// Text of the word.
        text: String,
        /// Whether the word heals on completion.
        healing: bool,
        /// Speed of the word in world units per reference frame.
        speed: f32,
    },
    /// Reports that a word became the typing target.
    WordLocked {
        /// Identifier of the locked word.
        word: WordId,
    },
    /// Reports that a typed character matched the locked word.
    CharacterAccepted {
        /// Identifier of the locked word.
        word: WordId,
        /// Number of characters matched so far.
        progress: u32,
    },
    /// Reports that the player finished typing a word.
    WordCompleted {
        /// Identifier of the completed word.
        word: WordId,
        /// Whether the word healed the player.
        healing: bool,
    },
    /// Reports that a mismatched keystroke released the lock.
    LockBroken {
        /// Identifier of the previously locked word.
        word: WordId,
    },
    /// Reports that a word reached the player unmatched.
    WordExpired {
        /// Identifier of the expired word.
        word: WordId,
        /// Damage dealt to the player.
        damage: u32,
    },
    /// Announces the new combo streak.
    ComboChanged {
        /// Current combo streak.
        combo: u32,
    },
    /// Announces the new score.
    ScoreChanged {
        /// Current score.
        score: u32,
    },
    /// Reports that a healing word restored player hit points.
    PlayerHealed {
        /// Hit points restored after clamping.
        amount: u32,
        /// Player hit points after healing.
        player_hp: i32,
    },
    /// Reports that the player lost hit points.
    PlayerDamaged {
        /// Hit points lost.
        amount: u32,
        /// Player hit points after the damage.
        player_hp: i32,
    },
    /// Confirms that a projectile left the player.
    ProjectileLaunched {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Damage the projectile will deal.
        damage: u32,
    },
    /// Reports that a projectile struck the enemy.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Damage dealt to the enemy.
        damage: u32,
        /// Enemy hit points after the strike.
        enemy_hp: i32,
    },
    /// Reports that the enemy fell and the level-up awaits confirmation.
    LevelUpReady {
        /// Level that was just cleared.
        level: u32,
    },
    /// Announces that a new level started.
    LevelAdvanced {
        /// Level that became active.
        level: u32,
        /// Hit points of the new enemy.
        enemy_hp: i32,
    },
    /// Announces that the session status changed.
    StatusChanged {
        /// Status that became active.
        status: SessionStatus,
    },
    /// Announces the terminal game-over transition. Emitted exactly once.
    GameOver {
        /// Final score.
        score: u32,
        /// Level reached.
        level: u32,
    },
}

/// Unique identifier assigned to a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(u32);

impl WordId {
    /// Creates a new word identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single word used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct WordSnapshot {
    /// Unique identifier assigned to the word.
    pub id: WordId,
    /// Text the player must type.
    pub text: String,
    /// Horizontal position of the word.
    pub position: f32,
    /// Speed in world units per reference frame.
    pub speed: f32,
    /// Whether completing the word heals the player.
    pub healing: bool,
    /// Characters matched while the word is locked; zero otherwise.
    pub match_progress: u32,
}

impl WordSnapshot {
    /// Reports whether the word is the current typing target.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.match_progress > 0
    }

    /// Number of characters in the word.
    #[must_use]
    pub fn char_count(&self) -> u32 {
        u32::try_from(self.text.chars().count()).unwrap_or(u32::MAX)
    }

    /// First character of the word.
    #[must_use]
    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }

    /// Character the player must type next to keep the lock.
    #[must_use]
    pub fn expected_char(&self) -> Option<char> {
        self.text.chars().nth(self.match_progress as usize)
    }

    /// Portion of the text that was already typed.
    #[must_use]
    pub fn typed_prefix(&self) -> &str {
        match self.text.char_indices().nth(self.match_progress as usize) {
            Some((index, _)) => &self.text[..index],
            None => &self.text,
        }
    }
}

/// Read-only snapshot describing all words in flight.
#[derive(Clone, Debug, Default)]
pub struct WordView {
    snapshots: Vec<WordSnapshot>,
}

impl WordView {
    /// Creates a new word view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<WordSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured words in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &WordSnapshot> {
        self.snapshots.iter()
    }

    /// Returns the locked word, if any.
    #[must_use]
    pub fn locked(&self) -> Option<&WordSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.is_locked())
    }

    /// Looks up a word by identifier.
    #[must_use]
    pub fn get(&self, word: WordId) -> Option<&WordSnapshot> {
        self.snapshots
            .binary_search_by_key(&word, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of words captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<WordSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Horizontal position of the projectile.
    pub position: f32,
    /// Damage carried by the projectile.
    pub damage: u32,
    /// Whether the projectile already struck the enemy.
    pub hit: bool,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectiles in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view contains no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Immutable copy of the combat state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatSnapshot {
    /// Player hit points; may be negative once the player fell.
    pub player_hp: i32,
    /// Enemy hit points; may be negative until the level-up resolves.
    pub enemy_hp: i32,
    /// Current level, starting at one.
    pub level: u32,
    /// Consecutive completions since the last miss or expiry.
    pub combo: u32,
    /// Accumulated score.
    pub score: u32,
    /// Number of completed words.
    pub words_typed: u32,
    /// Number of accepted characters.
    pub characters_typed: u32,
    /// Base speed used for newly spawned words.
    pub word_speed_base: f32,
    /// Lifecycle status of the simulation.
    pub status: SessionStatus,
    /// Word currently locked as the typing target.
    pub locked: Option<WordId>,
}

/// Values reported to the host presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Accumulated score.
    pub score: u32,
    /// Current level.
    pub level: u32,
    /// Words per minute.
    pub wpm: u32,
    /// Current combo streak.
    pub combo: u32,
}

impl Scoreboard {
    /// Scoreboard of a session that has not scored yet.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            score: 0,
            level: 1,
            wpm: 0,
            combo: 0,
        }
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        chars_match, enemy_hp_for_level, Difficulty, KeyInput, PlayField, Scoreboard, WordId,
        WordSnapshot, WordView,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    fn word(id: u32, text: &str, match_progress: u32) -> WordSnapshot {
        WordSnapshot {
            id: WordId::new(id),
            text: text.to_owned(),
            position: 100.0,
            speed: 2.0,
            healing: false,
            match_progress,
        }
    }

    #[test]
    fn difficulty_multipliers_match_presets() {
        assert_eq!(Difficulty::Easy.speed_multiplier(), 2.0);
        assert_eq!(Difficulty::Mid.speed_multiplier(), 3.0);
        assert_eq!(Difficulty::Crazy.speed_multiplier(), 4.0);
        assert_eq!(Difficulty::default(), Difficulty::Mid);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Crazy".parse::<Difficulty>(), Ok(Difficulty::Crazy));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        let error = "hard".parse::<Difficulty>().expect_err("unknown preset");
        assert!(error.to_string().contains("hard"));
    }

    #[test]
    fn difficulty_round_trips_through_bincode() {
        assert_round_trip(&Difficulty::Crazy);
    }

    #[test]
    fn scoreboard_round_trips_through_bincode() {
        assert_round_trip(&Scoreboard {
            score: 42,
            level: 3,
            wpm: 57,
            combo: 6,
        });
    }

    #[test]
    fn enemy_hp_grows_after_first_level() {
        assert_eq!(enemy_hp_for_level(1), 100);
        assert_eq!(enemy_hp_for_level(2), 110);
        assert_eq!(enemy_hp_for_level(5), 125);
    }

    #[test]
    fn control_characters_are_not_character_keys() {
        assert_eq!(KeyInput::from_char('a'), KeyInput::Character('a'));
        assert_eq!(KeyInput::from_char('\u{1b}'), KeyInput::Control);
        assert_eq!(KeyInput::from_char('\n'), KeyInput::Control);
        assert_eq!(KeyInput::Control.character(), None);
        assert_eq!(KeyInput::from_char('a').repeated(), KeyInput::Repeat('a'));
        assert_eq!(KeyInput::Repeat('a').character(), Some('a'));
        assert!(KeyInput::Repeat('a').is_repeat());
        assert_eq!(KeyInput::Control.repeated(), KeyInput::Control);
    }

    #[test]
    fn character_comparison_ignores_case() {
        assert!(chars_match('F', 'f'));
        assert!(!chars_match('f', 'g'));
    }

    #[test]
    fn play_field_boundaries_follow_edge_inset() {
        let field = PlayField::new(1000.0, 600.0);
        assert_eq!(field.player_boundary(), 80.0);
        assert_eq!(field.enemy_boundary(), 920.0);
        assert_eq!(field.spawn_position(), 920.0);
        assert!(field.is_playable());
        assert!(!PlayField::new(150.0, 600.0).is_playable());
    }

    #[test]
    fn word_snapshot_tracks_typed_prefix() {
        let snapshot = word(0, "storm", 2);
        assert!(snapshot.is_locked());
        assert_eq!(snapshot.expected_char(), Some('o'));
        assert_eq!(snapshot.typed_prefix(), "st");
        assert_eq!(snapshot.char_count(), 5);

        let idle = word(1, "storm", 0);
        assert!(!idle.is_locked());
        assert_eq!(idle.typed_prefix(), "");
    }

    #[test]
    fn word_view_orders_by_spawn_and_finds_lock() {
        let view = WordView::from_snapshots(vec![word(4, "zap", 0), word(2, "ice", 1)]);
        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(view.locked().map(|snapshot| snapshot.id), Some(WordId::new(2)));
        assert_eq!(view.get(WordId::new(4)).map(|s| s.text.as_str()), Some("zap"));
        assert!(view.get(WordId::new(3)).is_none());
    }
}
