//! Typed per-module payloads.
//!
//! `ModuleState` is what the player observed (the solver input) and
//! `ModuleSolution` is what the solver answered. Both are tagged by
//! [`ModuleType`]; on the wire only the inner object is sent, and the module
//! type selects the shape on the way back in.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::{ModuleType, StageKind};

/// Access to one variant of a payload union by its concrete type.
pub trait TypedPayload<Union>: Clone + Into<Union> {
    const MODULE_TYPE: ModuleType;

    fn peek(payload: &Union) -> Option<&Self>;
}

macro_rules! module_payload {
    ($(#[$meta:meta])* $name:ident { $($variant:ident($inner:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum $name {
            $($variant($inner)),+
        }

        impl $name {
            pub fn module_type(&self) -> ModuleType {
                match self {
                    $(Self::$variant(_) => ModuleType::$variant),+
                }
            }

            /// Inner payload as sent on the wire (no type tag).
            pub fn to_json(&self) -> Result<JsonValue, serde_json::Error> {
                match self {
                    $(Self::$variant(inner) => serde_json::to_value(inner)),+
                }
            }

            pub fn from_json(
                module_type: ModuleType,
                value: JsonValue,
            ) -> Result<Self, serde_json::Error> {
                match module_type {
                    $(ModuleType::$variant => serde_json::from_value(value).map(Self::$variant)),+
                }
            }
        }

        $(
            impl From<$inner> for $name {
                fn from(value: $inner) -> Self {
                    Self::$variant(value)
                }
            }

            impl TypedPayload<$name> for $inner {
                const MODULE_TYPE: ModuleType = ModuleType::$variant;

                fn peek(payload: &$name) -> Option<&Self> {
                    match payload {
                        $name::$variant(inner) => Some(inner),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

module_payload! {
    /// Player observations for a module, one variant per module type.
    ModuleState {
        Wires(WiresState),
        Button(ButtonState),
        Keypads(KeypadsState),
        SimonSays(SimonSaysState),
        WhosOnFirst(WhosOnFirstState),
        Memory(MemoryState),
        MorseCode(MorseCodeState),
        ComplicatedWires(ComplicatedWiresState),
        WireSequences(WireSequencesState),
        Mazes(MazesState),
        Passwords(PasswordsState),
        Knobs(KnobsState),
    }
}

module_payload! {
    /// Solver answers for a module, one variant per module type.
    ModuleSolution {
        Wires(WiresSolution),
        Button(ButtonSolution),
        Keypads(KeypadsSolution),
        SimonSays(SimonSaysSolution),
        WhosOnFirst(WhosOnFirstSolution),
        Memory(MemorySolution),
        MorseCode(MorseCodeSolution),
        ComplicatedWires(ComplicatedWiresSolution),
        WireSequences(WireSequencesSolution),
        Mazes(MazesSolution),
        Passwords(PasswordsSolution),
        Knobs(KnobsSolution),
    }
}

impl ModuleSolution {
    /// Whether this answer finishes the module.
    ///
    /// Single-stage types finish on any accepted answer unless the server
    /// explicitly says otherwise; multi-stage types need `solved: true`;
    /// needy types never finish.
    pub fn completes(&self, server_solved: Option<bool>) -> bool {
        match self.module_type().stage_kind() {
            StageKind::Single => server_solved.unwrap_or(true),
            StageKind::Multi => server_solved == Some(true),
            StageKind::Needy => false,
        }
    }
}

// Wires

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireColor {
    Red,
    Blue,
    Yellow,
    White,
    Black,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiresState {
    /// Top to bottom.
    pub wires: Vec<WireColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiresSolution {
    /// 1-based position of the wire to cut.
    pub cut_position: u8,
}

// The Button

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonColor {
    Red,
    Blue,
    Yellow,
    White,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonLabel {
    Abort,
    Detonate,
    Hold,
    Press,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonState {
    pub color: Option<ButtonColor>,
    pub label: Option<ButtonLabel>,
    /// Only known once the button is held.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_color: Option<ButtonColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonSolution {
    Tap,
    #[serde(rename_all = "camelCase")]
    Hold {
        #[serde(default)]
        release_on_digit: Option<u8>,
    },
}

// Keypads

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeypadsState {
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeypadsSolution {
    pub order: Vec<String>,
}

// Simon Says

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimonColor {
    Red,
    Blue,
    Green,
    Yellow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimonSaysState {
    pub flashes: Vec<SimonColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimonSaysSolution {
    pub presses: Vec<SimonColor>,
}

// Who's on First

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhosOnFirstState {
    /// 1-based.
    pub stage: u8,
    pub display: String,
    /// Reading order, top-left to bottom-right.
    pub buttons: Vec<String>,
}

impl Default for WhosOnFirstState {
    fn default() -> Self {
        Self {
            stage: 1,
            display: String::new(),
            buttons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhosOnFirstSolution {
    pub stage: u8,
    pub press: String,
}

// Memory

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPress {
    /// 1-based button position.
    pub position: u8,
    pub label: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryState {
    /// 1-based.
    pub stage: u8,
    pub display: Option<u8>,
    pub buttons: Vec<u8>,
    /// Presses from earlier stages, oldest first.
    #[serde(default)]
    pub history: Vec<MemoryPress>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            stage: 1,
            display: None,
            buttons: Vec::new(),
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySolution {
    pub stage: u8,
    pub press: MemoryPress,
}

// Morse Code

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorseCodeState {
    /// Letters decoded so far, in flash order.
    pub letters: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorseCodeSolution {
    pub word: String,
    /// Frequency to transmit, e.g. "3.505 MHz".
    pub frequency: String,
}

// Complicated Wires

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplicatedWire {
    pub red: bool,
    pub blue: bool,
    pub star: bool,
    pub led: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplicatedWiresState {
    pub wires: Vec<ComplicatedWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplicatedWiresSolution {
    /// One entry per wire, `true` to cut.
    pub cut: Vec<bool>,
}

// Wire Sequences

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SequenceColor {
    Red,
    Blue,
    Black,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceWire {
    pub color: SequenceColor,
    /// Terminal letter the wire connects to: 'A', 'B' or 'C'.
    pub letter: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSequencesState {
    /// 1-based panel number.
    pub stage: u8,
    pub wires: Vec<SequenceWire>,
}

impl Default for WireSequencesState {
    fn default() -> Self {
        Self {
            stage: 1,
            wires: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSequencesSolution {
    pub stage: u8,
    pub cut: Vec<bool>,
}

// Mazes

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazesState {
    /// Circular markers identifying the maze.
    pub markers: Vec<Cell>,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazesSolution {
    pub moves: Vec<Direction>,
}

// Passwords

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordsState {
    /// Letters available in each of the five columns.
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordsSolution {
    /// Remaining candidate words; one left means the password is known.
    pub candidates: Vec<String>,
}

// Knobs

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KnobPosition {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnobsState {
    /// The twelve LEDs, left to right, top row first.
    pub leds: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnobsSolution {
    pub position: KnobPosition,
}
