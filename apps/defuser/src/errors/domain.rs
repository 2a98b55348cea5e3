//! Entity kinds referenced by lookup and initialization errors.

use std::fmt::{Display, Formatter, Result as FmtResult};

/// The kinds of entity a session action can require or look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Round,
    Bomb,
    Module,
}

impl Entity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Entity::Round => "round",
            Entity::Bomb => "bomb",
            Entity::Module => "module",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
