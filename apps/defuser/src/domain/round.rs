use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

use super::{Bomb, BombId, Module, ModuleId, RoundId};

/// Round progression as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundStatus {
    /// Created, bombs and modules still being configured.
    Setup,
    /// Started; modules are being worked.
    Active,
    Completed,
    Failed,
}

/// One play session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub id: RoundId,
    pub status: RoundStatus,
    /// Creation order.
    pub bombs: Vec<Arc<Bomb>>,
    pub start_time: Option<OffsetDateTime>,
    /// Opaque extension bag, carried through untouched.
    pub round_state: JsonValue,
}

impl Round {
    pub fn new(id: RoundId) -> Self {
        Self {
            id,
            status: RoundStatus::Setup,
            bombs: Vec::new(),
            start_time: None,
            round_state: JsonValue::Null,
        }
    }

    pub fn bomb(&self, bomb_id: BombId) -> Option<&Arc<Bomb>> {
        self.bombs.iter().find(|b| b.id == bomb_id)
    }

    /// Resolve a module through its owning bomb.
    pub fn resolve_module(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Option<(&Arc<Bomb>, &Arc<Module>)> {
        let bomb = self.bomb(bomb_id)?;
        let module = bomb.module(module_id)?;
        Some((bomb, module))
    }

    pub fn with_bomb_appended(&self, bomb: Bomb) -> Round {
        let mut bombs = self.bombs.clone();
        bombs.push(Arc::new(bomb));
        Round {
            bombs,
            ..self.clone()
        }
    }

    /// Replace the bomb with the same id. `None` when the round has no such bomb.
    pub fn with_bomb_replaced(&self, bomb: Bomb) -> Option<Round> {
        let index = self.bombs.iter().position(|b| b.id == bomb.id)?;
        let mut bombs = self.bombs.clone();
        bombs[index] = Arc::new(bomb);
        Some(Round {
            bombs,
            ..self.clone()
        })
    }

    /// Adopt a server copy of this round while keeping local module progress.
    ///
    /// Bombs present on both sides are merged with [`Bomb::merged_with_server`];
    /// bombs the server no longer lists are dropped.
    pub fn merged_with_server(&self, incoming: Round) -> Round {
        let bombs = incoming
            .bombs
            .into_iter()
            .map(|server_bomb| match self.bomb(server_bomb.id) {
                Some(local) => {
                    let merged = local.merged_with_server(Arc::unwrap_or_clone(server_bomb));
                    if merged == **local {
                        local.clone()
                    } else {
                        Arc::new(merged)
                    }
                }
                None => server_bomb,
            })
            .collect();
        Round { bombs, ..incoming }
    }
}
