use serde::{Deserialize, Serialize};

/// A player request delivered by the shell.
///
/// Conventional bindings: arrows move, up rotates clockwise, a secondary key
/// rotates counter-clockwise, another key holds, and space hard-drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    #[display("move-left")]
    MoveLeft,
    #[display("move-right")]
    MoveRight,
    #[display("move-down")]
    MoveDown,
    #[display("rotate-cw")]
    RotateCw,
    #[display("rotate-ccw")]
    RotateCcw,
    #[display("hold")]
    Hold,
    #[display("hard-drop")]
    HardDrop,
}

impl Intent {
    pub const ALL: [Self; 7] = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::MoveDown,
        Intent::RotateCw,
        Intent::RotateCcw,
        Intent::Hold,
        Intent::HardDrop,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown intent: {name}")]
pub struct ParseIntentError {
    name: String,
}

impl std::str::FromStr for Intent {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.to_string() == s)
            .ok_or_else(|| ParseIntentError { name: s.to_owned() })
    }
}
