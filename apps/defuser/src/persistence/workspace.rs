use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    BombId, Module, ModuleId, ModuleSolution, ModuleState, ModuleType, ModuleUpdate,
    TypedPayload,
};
use crate::error::AppError;
use crate::errors::{Entity, ErrorCode};
use crate::store::{SessionStore, SolveOutcome};

/// Where a module stands from the player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Nothing entered yet.
    Fresh,
    /// Input saved, no solver output.
    InProgress,
    /// Solver answered but the module is not complete.
    Intermediate,
    Solved,
}

/// What a module screen restores on entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredModule {
    pub module_type: ModuleType,
    pub state: Option<ModuleState>,
    pub solution: Option<ModuleSolution>,
    pub progress: Progress,
    /// False once the module is solved.
    pub inputs_enabled: bool,
}

impl RestoredModule {
    fn from_module(module: &Module) -> Self {
        let progress = if module.solved {
            Progress::Solved
        } else if module.solution.is_some() {
            Progress::Intermediate
        } else if module.state.is_some() {
            Progress::InProgress
        } else {
            Progress::Fresh
        };
        Self {
            module_type: module.module_type,
            state: module.state.clone(),
            solution: module.solution.clone(),
            progress,
            inputs_enabled: !module.solved,
        }
    }
}

/// One module's view onto the session store.
///
/// Reads always go through the store's latest snapshot; the workspace keeps
/// only ids, never a copy of the module.
#[derive(Clone)]
pub struct ModuleWorkspace {
    store: Arc<SessionStore>,
    bomb_id: BombId,
    module_id: ModuleId,
}

impl ModuleWorkspace {
    pub fn open(
        store: Arc<SessionStore>,
        bomb_id: BombId,
        module_id: ModuleId,
    ) -> Result<Self, AppError> {
        let workspace = Self {
            store,
            bomb_id,
            module_id,
        };
        workspace.module()?;
        Ok(workspace)
    }

    /// Bind to the module currently selected in the store.
    pub fn current(store: Arc<SessionStore>) -> Result<Self, AppError> {
        let selection = store
            .snapshot()
            .selection
            .ok_or(AppError::not_initialized(Entity::Module))?;
        Self::open(store, selection.bomb_id, selection.module_id)
    }

    pub fn bomb_id(&self) -> BombId {
        self.bomb_id
    }

    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    pub fn module(&self) -> Result<Arc<Module>, AppError> {
        let snapshot = self.store.snapshot();
        if snapshot.round.is_none() {
            return Err(AppError::not_initialized(Entity::Round));
        }
        snapshot
            .resolve_module(self.bomb_id, self.module_id)
            .map(|(_, module)| module.clone())
            .ok_or_else(|| {
                AppError::not_found(
                    Entity::Module,
                    format!("module {} on bomb {}", self.module_id, self.bomb_id),
                )
            })
    }

    /// Read back saved input and output. Served from the store only.
    pub fn restore(&self) -> Result<RestoredModule, AppError> {
        let module = self.module()?;
        let restored = RestoredModule::from_module(&module);
        debug!(
            module_id = self.module_id,
            progress = ?restored.progress,
            "Module restored"
        );
        Ok(restored)
    }

    pub fn save(&self, state: impl Into<ModuleState>) -> Result<Arc<Module>, AppError> {
        self.store
            .update_module_state(self.bomb_id, self.module_id, ModuleUpdate::state(state))
    }

    /// Save a typed form. The form type must belong to this module's type.
    pub fn save_form<F>(&self, form: &F) -> Result<Arc<Module>, AppError>
    where
        F: TypedPayload<ModuleState>,
    {
        self.expect_type(F::MODULE_TYPE)?;
        self.save(form.clone())
    }

    /// Saved form contents, or an empty form when nothing was saved yet.
    pub fn restore_form<F>(&self) -> Result<F, AppError>
    where
        F: TypedPayload<ModuleState> + Default,
    {
        let module = self.expect_type(F::MODULE_TYPE)?;
        Ok(module
            .state
            .as_ref()
            .and_then(F::peek)
            .cloned()
            .unwrap_or_default())
    }

    /// Last solver output as its concrete type.
    pub fn solution_as<S>(&self) -> Result<Option<S>, AppError>
    where
        S: TypedPayload<ModuleSolution>,
    {
        let module = self.expect_type(S::MODULE_TYPE)?;
        Ok(module.solution.as_ref().and_then(S::peek).cloned())
    }

    /// Save `input` and hand it to the solver.
    pub async fn submit(&self, input: impl Into<ModuleState>) -> Result<SolveOutcome, AppError> {
        self.store
            .solve(self.bomb_id, self.module_id, input.into())
            .await
    }

    pub fn mark_solved(&self) -> Result<Arc<Module>, AppError> {
        self.store.mark_module_solved(self.bomb_id, self.module_id)
    }

    fn expect_type(&self, module_type: ModuleType) -> Result<Arc<Module>, AppError> {
        let module = self.module()?;
        if module.module_type != module_type {
            return Err(AppError::invalid(
                ErrorCode::ModuleTypeMismatch,
                format!(
                    "{module_type} form used on {} module {}",
                    module.module_type, module.id
                ),
            ));
        }
        Ok(module)
    }
}
