use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::session::SessionStore;
use crate::domain::{BombId, Module, ModuleId, ModuleSolution, ModuleState, ModuleUpdate};
use crate::error::AppError;

/// Result of a solver round-trip.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// Output was stored on the module.
    Applied {
        module: Arc<Module>,
        solution: ModuleSolution,
        /// Whether this response completed the module.
        completed: bool,
    },
    /// The response arrived for a superseded submission, an abandoned module
    /// or a round that is no longer held. Nothing was written.
    Discarded,
}

impl SolveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SolveOutcome::Applied { .. })
    }
}

impl SessionStore {
    /// Persist `input` on the module, ask the solver, and store its output.
    ///
    /// Each call registers a fresh ticket for the module. Only the response
    /// holding the module's current ticket, for the round that is still held,
    /// is applied; anything else comes back as [`SolveOutcome::Discarded`].
    pub async fn solve(
        &self,
        bomb_id: BombId,
        module_id: ModuleId,
        input: ModuleState,
    ) -> Result<SolveOutcome, AppError> {
        let (round_id, ticket) = self.update(|state| {
            let round_id = state.round_id()?;
            state.write_module(bomb_id, module_id, &ModuleUpdate::state(input.clone()))?;
            let ticket = Uuid::new_v4();
            if state.in_flight.insert(module_id, ticket).is_some() {
                debug!(module_id, "Superseding earlier solve submission");
            }
            state.pending += 1;
            state.view.error = None;
            Ok::<_, AppError>((round_id, ticket))
        })?;

        let result = self.api.solve(round_id, bomb_id, module_id, &input).await;

        self.update(|state| {
            state.pending = state.pending.saturating_sub(1);

            let current = state.in_flight.get(&module_id) == Some(&ticket)
                && state.held_round(round_id).is_some();
            if !current {
                debug!(round_id, bomb_id, module_id, %ticket, "Discarding stale solve response");
                return Ok(SolveOutcome::Discarded);
            }
            state.in_flight.remove(&module_id);

            let answer = match result {
                Ok(answer) => answer,
                Err(err) => {
                    warn!(action = "solve", module_id, code = %err.code(), error = %err, "Session action failed");
                    state.view.error = Some(err.to_string());
                    return Err(err);
                }
            };

            if state.module(bomb_id, module_id)?.solved {
                debug!(module_id, "Module solved while awaiting the solver; keeping it read-only");
                return Ok(SolveOutcome::Discarded);
            }

            let completed = answer.output.completes(answer.solved);
            let update = ModuleUpdate::default()
                .with_solution(answer.output.clone())
                .with_solved(completed);
            let module = match state.write_module(bomb_id, module_id, &update) {
                Ok(module) => module,
                Err(err) => {
                    warn!(action = "solve", module_id, code = %err.code(), error = %err, "Solver output rejected");
                    state.view.error = Some(err.to_string());
                    return Err(err);
                }
            };

            info!(
                bomb_id,
                module_id,
                module_type = ?module.module_type,
                completed,
                "Solver output applied"
            );
            Ok(SolveOutcome::Applied {
                module,
                solution: answer.output,
                completed,
            })
        })
    }
}
