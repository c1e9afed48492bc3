//! Server and game configuration constants

/// WebSocket server port
pub const SERVER_PORT: u16 = 8080;

/// Length of generated room codes
pub const ROOM_CODE_LENGTH: usize = 4;

/// Maximum players in a tic-tac-toe room
pub const BOARD_ROOM_CAPACITY: usize = 2;

/// Maximum players in a sketch room
pub const SKETCH_ROOM_CAPACITY: usize = 10;

/// Minimum players required to start either variant
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Built-in vocabulary for the sketch variant
pub const WORDS: &[&str] = &[
    "airplane", "anchor", "banana", "bicycle", "bridge", "butterfly",
    "cactus", "camera", "castle", "cloud", "diamond", "dragon",
    "elephant", "fireworks", "flashlight", "giraffe", "guitar", "hammer",
    "helicopter", "igloo", "island", "kangaroo", "ladder", "lighthouse",
    "mermaid", "mountain", "mushroom", "octopus", "parachute", "penguin",
    "pirate", "pyramid", "rainbow", "robot", "rocket", "sandwich",
    "scissors", "snowman", "spider", "submarine", "telescope", "tornado",
    "treasure", "umbrella", "unicorn", "volcano", "waterfall", "windmill",
];
