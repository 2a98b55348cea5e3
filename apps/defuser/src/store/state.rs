//! Mutable session internals, only touched under the store's lock.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::snapshot::{SessionSnapshot, Selection};
use crate::domain::{Bomb, BombId, Module, ModuleId, ModuleUpdate, Round, RoundId};
use crate::error::AppError;
use crate::errors::Entity;

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) view: SessionSnapshot,
    /// Backed actions currently awaiting the service.
    pub(crate) pending: usize,
    /// Current solve ticket per module; a response whose ticket is gone is stale.
    pub(crate) in_flight: HashMap<ModuleId, Uuid>,
}

impl SessionState {
    pub(crate) fn round(&self) -> Result<&Arc<Round>, AppError> {
        self.view
            .round
            .as_ref()
            .ok_or(AppError::not_initialized(Entity::Round))
    }

    pub(crate) fn round_id(&self) -> Result<RoundId, AppError> {
        self.round().map(|r| r.id)
    }

    /// The held round, but only if it is still the one a request was made for.
    pub(crate) fn held_round(&self, expected: RoundId) -> Option<&Arc<Round>> {
        self.view.round.as_ref().filter(|r| r.id == expected)
    }

    pub(crate) fn bomb(&self, bomb_id: BombId) -> Result<&Arc<Bomb>, AppError> {
        self.round()?
            .bomb(bomb_id)
            .ok_or_else(|| AppError::not_found(Entity::Bomb, format!("bomb {bomb_id}")))
    }

    pub(crate) fn module(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Result<&Arc<Module>, AppError> {
        self.bomb(bomb_id)?.module(module_id).ok_or_else(|| {
            AppError::not_found(
                Entity::Module,
                format!("module {module_id} on bomb {bomb_id}"),
            )
        })
    }

    /// Swap in a different round; nothing from the previous one stays reachable.
    pub(crate) fn load_round(&mut self, round: Round) -> Arc<Round> {
        let round = Arc::new(round);
        self.view.round = Some(round.clone());
        self.view.selected_bomb = None;
        self.view.selection = None;
        self.view.manual_url = None;
        self.in_flight.clear();
        round
    }

    pub(crate) fn replace_round(&mut self, round: Round) -> Arc<Round> {
        let round = Arc::new(round);
        self.view.round = Some(round.clone());
        self.drop_unresolvable_selection();
        round
    }

    /// Replace one bomb of the held round. The caller has checked the round id.
    pub(crate) fn replace_bomb(&mut self, bomb: Bomb) -> Result<Arc<Bomb>, AppError> {
        let bomb_id = bomb.id;
        let next = self
            .round()?
            .with_bomb_replaced(bomb)
            .ok_or_else(|| AppError::not_found(Entity::Bomb, format!("bomb {bomb_id}")))?;
        self.replace_round(next);
        self.bomb(bomb_id).cloned()
    }

    /// Single write path for module state, solution and solved flag.
    pub(crate) fn write_module(
        &mut self,
        bomb_id: BombId,
        module_id: ModuleId,
        update: &ModuleUpdate,
    ) -> Result<Arc<Module>, AppError> {
        let module = self.module(bomb_id, module_id)?;
        let Some(next) = module.apply(update)? else {
            return Ok(module.clone());
        };
        let bomb = self.bomb(bomb_id)?.with_module_replaced(next).ok_or_else(|| {
            AppError::not_found(Entity::Module, format!("module {module_id}"))
        })?;
        self.replace_bomb(bomb)?;
        self.module(bomb_id, module_id).cloned()
    }

    pub(crate) fn select(&mut self, selection: Selection, manual_url: String) {
        if let Some(previous) = self.view.selection {
            if previous.module_id != selection.module_id {
                self.forget_in_flight(previous.module_id);
            }
        }
        self.view.selected_bomb = Some(selection.bomb_id);
        self.view.selection = Some(selection);
        self.view.manual_url = Some(manual_url);
    }

    pub(crate) fn clear_selection(&mut self) {
        if let Some(previous) = self.view.selection.take() {
            self.forget_in_flight(previous.module_id);
        }
        self.view.manual_url = None;
    }

    fn forget_in_flight(&mut self, module_id: ModuleId) {
        if self.in_flight.remove(&module_id).is_some() {
            debug!(module_id, "Abandoning in-flight solve after navigation");
        }
    }

    fn drop_unresolvable_selection(&mut self) {
        let Some(round) = self.view.round.clone() else {
            return;
        };
        if let Some(bomb_id) = self.view.selected_bomb {
            if round.bomb(bomb_id).is_none() {
                self.view.selected_bomb = None;
            }
        }
        if let Some(selection) = self.view.selection {
            if round
                .resolve_module(selection.bomb_id, selection.module_id)
                .is_none()
            {
                self.clear_selection();
            }
        }
    }
}
