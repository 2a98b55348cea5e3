//! The session store: one observable holder of the round tree.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::snapshot::{Selection, SessionSnapshot};
use super::state::SessionState;
use crate::api::{HttpRoundApi, RoundApi};
use crate::config::ApiConfig;
use crate::domain::{
    Bomb, BombConfig, BombId, BombPatch, Module, ModuleId, ModuleType, ModuleUpdate, Round,
    RoundId,
};
use crate::error::AppError;
use crate::errors::{Entity, ErrorCode};
use crate::navigation::manual::ManualLinks;

pub const MIN_MODULE_NUMBER: u8 = 1;
pub const MAX_MODULE_NUMBER: u8 = 99;

/// Upper bound for one `add_modules` request.
pub const MAX_MODULES_PER_REQUEST: u8 = 99;

/// Holds the current round, the round history and UI-scoped flags.
///
/// Network-backed actions set `loading` while awaiting the service, record a
/// message in `error` on failure, and merge results by structural replacement.
/// Local actions never touch `loading` or `error`.
///
/// The lock is never held across an `.await`; snapshots are published while
/// it is held so subscribers see mutations in the order they were applied.
pub struct SessionStore {
    pub(super) api: Arc<dyn RoundApi>,
    manual: ManualLinks,
    pub(super) state: Mutex<SessionState>,
    updates: watch::Sender<Arc<SessionSnapshot>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn RoundApi>, manual: ManualLinks) -> Self {
        let (updates, _) = watch::channel(Arc::new(SessionSnapshot::default()));
        Self {
            api,
            manual,
            state: Mutex::new(SessionState::default()),
            updates,
        }
    }

    /// Store backed by the HTTP service described by `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        let api = HttpRoundApi::new(config)?;
        Ok(Self::new(
            Arc::new(api),
            ManualLinks::new(config.manual_base_url.clone()),
        ))
    }

    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.updates.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.updates.subscribe()
    }

    pub fn manual_links(&self) -> &ManualLinks {
        &self.manual
    }

    /// Run `f` under the lock and publish the resulting view if it changed.
    pub(super) fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.state.lock();
        let out = f(&mut *state);
        state.view.loading = state.pending > 0;
        let view = &state.view;
        self.updates.send_if_modified(|current| {
            if **current == *view {
                return false;
            }
            *current = Arc::new(view.clone());
            true
        });
        out
    }

    /// Await a service call with loading/error bookkeeping, then merge.
    async fn remote<T, R>(
        &self,
        action: &'static str,
        call: impl Future<Output = Result<T, AppError>>,
        apply: impl FnOnce(&mut SessionState, T) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        self.update(|state| {
            state.pending += 1;
            state.view.error = None;
        });

        let result = call.await;

        self.update(|state| {
            state.pending = state.pending.saturating_sub(1);
            let outcome = result.and_then(|value| apply(state, value));
            if let Err(err) = &outcome {
                warn!(action, code = %err.code(), error = %err, "Session action failed");
                state.view.error = Some(err.to_string());
            }
            outcome
        })
    }

    fn held_round_id(&self) -> Result<RoundId, AppError> {
        self.state.lock().round_id()
    }

    pub async fn create_round(&self) -> Result<Arc<Round>, AppError> {
        let round = self
            .remote("create_round", self.api.create_round(), |state, round| {
                Ok(state.load_round(round))
            })
            .await?;
        info!(round_id = round.id, "Round created");
        Ok(round)
    }

    pub async fn fetch_round(&self, round_id: RoundId) -> Result<Arc<Round>, AppError> {
        let round = self
            .remote("fetch_round", self.api.fetch_round(round_id), |state, round| {
                Ok(state.load_round(round))
            })
            .await?;
        info!(round_id, bombs = round.bombs.len(), "Round loaded");
        Ok(round)
    }

    /// Refresh the history list; the held round is not affected.
    pub async fn fetch_all_rounds(&self) -> Result<Vec<Arc<Round>>, AppError> {
        self.remote("fetch_all_rounds", self.api.list_rounds(), |state, rounds| {
            state.view.rounds = rounds.into_iter().map(Arc::new).collect();
            Ok(state.view.rounds.clone())
        })
        .await
    }

    /// Delete a round remotely and drop it from the history list.
    ///
    /// A held round with the same id stays loaded so it can still be viewed.
    pub async fn delete_round(&self, round_id: RoundId) -> Result<(), AppError> {
        self.remote("delete_round", self.api.delete_round(round_id), |state, ()| {
            state.view.rounds.retain(|r| r.id != round_id);
            if state.held_round(round_id).is_some() {
                warn!(round_id, "Deleted round is still the held round");
            }
            Ok(())
        })
        .await?;
        info!(round_id, "Round deleted");
        Ok(())
    }

    pub async fn start_round(&self) -> Result<Arc<Round>, AppError> {
        let round_id = self.held_round_id()?;
        let round = self
            .remote("start_round", self.api.start_round(round_id), |state, server| {
                match state.held_round(round_id) {
                    Some(held) => {
                        let merged = held.merged_with_server(server);
                        Ok(state.replace_round(merged))
                    }
                    None => {
                        debug!(round_id, "Discarding start response for a round no longer held");
                        Ok(Arc::new(server))
                    }
                }
            })
            .await?;
        info!(round_id, status = ?round.status, "Round started");
        Ok(round)
    }

    /// Create a bomb on the held round and select it.
    pub async fn add_bomb(&self, config: BombConfig) -> Result<Arc<Bomb>, AppError> {
        let round_id = self.held_round_id()?;
        let bomb = self
            .remote(
                "add_bomb",
                self.api.create_bomb(round_id, &config),
                |state, bomb| {
                    let Some(held) = state.held_round(round_id) else {
                        debug!(round_id, bomb_id = bomb.id, "Discarding bomb for a round no longer held");
                        return Ok(Arc::new(bomb));
                    };
                    let bomb_id = bomb.id;
                    let next = held.with_bomb_appended(bomb);
                    state.replace_round(next);
                    // A module focus on another bomb would disagree with the new bomb focus.
                    state.clear_selection();
                    state.view.selected_bomb = Some(bomb_id);
                    state.bomb(bomb_id).cloned()
                },
            )
            .await?;
        info!(round_id, bomb_id = bomb.id, serial = %bomb.serial_number, "Bomb added");
        Ok(bomb)
    }

    pub async fn configure_bomb(
        &self,
        bomb_id: BombId,
        patch: BombPatch,
    ) -> Result<Arc<Bomb>, AppError> {
        let round_id = {
            let state = self.state.lock();
            state.bomb(bomb_id)?;
            state.round_id()?
        };
        self.remote(
            "configure_bomb",
            self.api.configure_bomb(round_id, bomb_id, &patch),
            |state, server| merge_bomb(state, round_id, server),
        )
        .await
    }

    pub async fn add_modules(
        &self,
        bomb_id: BombId,
        module_type: ModuleType,
        count: u8,
    ) -> Result<Vec<Arc<Module>>, AppError> {
        if count == 0 || count > MAX_MODULES_PER_REQUEST {
            return Err(AppError::invalid(
                ErrorCode::InvalidModuleCount,
                format!("module count must be 1..={MAX_MODULES_PER_REQUEST}, got {count}"),
            ));
        }
        let round_id = {
            let state = self.state.lock();
            state.bomb(bomb_id)?;
            state.round_id()?
        };
        let modules: Vec<Arc<Module>> = self
            .remote(
                "add_modules",
                self.api.add_modules(round_id, bomb_id, module_type, count),
                |state, modules| {
                    let created: Vec<ModuleId> = modules.iter().map(|m| m.id).collect();
                    if state.held_round(round_id).is_none() {
                        debug!(round_id, bomb_id, "Discarding modules for a round no longer held");
                        return Ok(modules.into_iter().map(Arc::new).collect());
                    }
                    let bomb = state.bomb(bomb_id)?.with_modules_appended(modules);
                    let bomb = state.replace_bomb(bomb)?;
                    Ok(bomb
                        .modules
                        .iter()
                        .filter(|m| created.contains(&m.id))
                        .cloned()
                        .collect())
                },
            )
            .await?;
        info!(round_id, bomb_id, module_type = ?module_type, count = modules.len(), "Modules added");
        Ok(modules)
    }

    /// Record a strike. A bomb that is no longer active is returned unchanged
    /// without contacting the service.
    pub async fn add_strike(&self, bomb_id: BombId) -> Result<Arc<Bomb>, AppError> {
        let (round_id, current) = {
            let state = self.state.lock();
            (state.round_id()?, state.bomb(bomb_id)?.clone())
        };
        if !current.is_active() {
            debug!(bomb_id, status = ?current.status, "Ignoring strike on inactive bomb");
            return Ok(current);
        }

        let bomb = self
            .remote("add_strike", self.api.add_strike(round_id, bomb_id), |state, server| {
                if state.held_round(round_id).is_some() {
                    let held = state.bomb(bomb_id)?;
                    if server.strikes < held.strikes {
                        debug!(
                            bomb_id,
                            held = held.strikes,
                            received = server.strikes,
                            "Discarding out-of-order strike response"
                        );
                        return Ok(held.clone());
                    }
                }
                merge_bomb(state, round_id, server)
            })
            .await?;
        info!(bomb_id, strikes = bomb.strikes, status = ?bomb.status, "Strike recorded");
        Ok(bomb)
    }

    pub fn select_bomb(&self, bomb_id: BombId) -> Result<BombId, AppError> {
        self.update(|state| {
            state.bomb(bomb_id)?;
            if state
                .view
                .selection
                .is_some_and(|selection| selection.bomb_id != bomb_id)
            {
                state.clear_selection();
            }
            state.view.selected_bomb = Some(bomb_id);
            debug!(bomb_id, "Bomb selected");
            Ok(bomb_id)
        })
    }

    /// Focus the first module of `module_type` on the bomb.
    pub fn select_module(
        &self,
        bomb_id: BombId,
        module_type: ModuleType,
    ) -> Result<Selection, AppError> {
        self.update(|state| {
            let module_id = state
                .bomb(bomb_id)?
                .modules
                .iter()
                .find(|m| m.module_type == module_type)
                .map(|m| m.id)
                .ok_or_else(|| {
                    AppError::not_found(
                        Entity::Module,
                        format!("no {module_type} module on bomb {bomb_id}"),
                    )
                })?;
            self.select_in(state, bomb_id, module_id)
        })
    }

    pub fn select_module_by_id(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Result<Selection, AppError> {
        self.update(|state| self.select_in(state, bomb_id, module_id))
    }

    fn select_in(
        &self,
        state: &mut SessionState,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Result<Selection, AppError> {
        let module_type = state.module(bomb_id, module_id)?.module_type;
        let selection = Selection {
            bomb_id,
            module_id,
            module_type,
        };
        state.select(selection, self.manual.url_for(module_type));
        debug!(bomb_id, module_id, module_type = ?module_type, "Module selected");
        Ok(selection)
    }

    /// Drop the module focus and its manual link.
    pub fn clear_module(&self) {
        self.update(|state| state.clear_selection());
    }

    /// Flip `solved` after an authoritative solve response. Local only.
    pub fn mark_module_solved(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Result<Arc<Module>, AppError> {
        self.update_module_state(bomb_id, module_id, ModuleUpdate::solved())
    }

    /// The one write path for a module's `state`, `solution` and `solved`.
    pub fn update_module_state(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
        update: ModuleUpdate,
    ) -> Result<Arc<Module>, AppError> {
        self.update(|state| state.write_module(bomb_id, module_id, &update))
    }

    /// Store the display counter, clamped to 1..=99.
    pub fn set_module_number(&self, n: i64) -> u8 {
        let clamped = n.clamp(i64::from(MIN_MODULE_NUMBER), i64::from(MAX_MODULE_NUMBER)) as u8;
        self.update(|state| state.view.module_number = clamped);
        clamped
    }
}

fn merge_bomb(
    state: &mut SessionState,
    round_id: RoundId,
    server: Bomb,
) -> Result<Arc<Bomb>, AppError> {
    if state.held_round(round_id).is_none() {
        debug!(round_id, bomb_id = server.id, "Discarding bomb for a round no longer held");
        return Ok(Arc::new(server));
    }
    let merged = state.bomb(server.id)?.merged_with_server(server);
    state.replace_bomb(merged)
}
