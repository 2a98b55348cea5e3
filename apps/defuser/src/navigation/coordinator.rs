//! Entering and leaving a module screen.

use std::sync::Arc;

use tracing::debug;

use super::route::{breadcrumbs, Crumb, Route};
use crate::domain::{Bomb, BombId, Module, ModuleId, RoundId};
use crate::error::AppError;
use crate::errors::Entity;
use crate::store::SessionStore;

/// Everything a module screen needs on entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleContext {
    pub round_id: RoundId,
    pub bomb: Arc<Bomb>,
    pub module: Arc<Module>,
    pub manual_url: String,
    pub breadcrumbs: Vec<Crumb>,
}

/// Focus a module and return its screen context.
///
/// Fails with `NotInitialized` when no round is held and `NotFound` when the
/// bomb or module does not resolve; the selection is left as it was.
pub fn enter_module(
    store: &SessionStore,
    bomb_id: BombId,
    module_id: ModuleId,
) -> Result<ModuleContext, AppError> {
    store.select_module_by_id(bomb_id, module_id)?;
    let snapshot = store.snapshot();

    let round_id = snapshot
        .round_id()
        .ok_or(AppError::not_initialized(Entity::Round))?;
    let (bomb, module) = snapshot.resolve_module(bomb_id, module_id).ok_or_else(|| {
        AppError::not_found(Entity::Module, format!("module {module_id} on bomb {bomb_id}"))
    })?;
    let manual_url = snapshot
        .manual_url
        .clone()
        .unwrap_or_else(|| store.manual_links().url_for(module.module_type));
    let route = Route::Module {
        round_id,
        bomb_id,
        module_id,
    };

    Ok(ModuleContext {
        round_id,
        bomb: bomb.clone(),
        module: module.clone(),
        manual_url,
        breadcrumbs: breadcrumbs(&snapshot, route),
    })
}

/// Leave the module screen; in-flight solves for it will be discarded.
pub fn leave_module(store: &SessionStore) {
    if let Some(selection) = store.snapshot().selection {
        debug!(bomb_id = selection.bomb_id, module_id = selection.module_id, "Leaving module");
    }
    store.clear_module();
}
