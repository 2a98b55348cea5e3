// In-memory solving service for store tests.
//
// Holds a server-side copy of every round, applies the same rules the real
// service does (strike limit, module creation order) and lets tests inject
// failures, script solver answers and hold individual calls open.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use defuser::api::{RoundApi, SolveAnswer};
use defuser::domain::{
    Bomb, BombConfig, BombId, BombPatch, BombStatus, Module, ModuleId, ModuleState, ModuleType,
    Round, RoundId, RoundStatus,
};
use defuser::AppError;
use parking_lot::Mutex;
use time::OffsetDateTime;
use tokio::sync::oneshot;

/// Strikes at which the fake service explodes a bomb.
pub const STRIKE_LIMIT: u32 = 3;

#[derive(Default)]
struct Server {
    next_id: i64,
    rounds: BTreeMap<RoundId, Round>,
}

impl Server {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn round(&self, round_id: RoundId) -> Result<&Round, AppError> {
        self.rounds.get(&round_id).ok_or_else(|| not_found("round", round_id))
    }

    fn bomb(&self, round_id: RoundId, bomb_id: BombId) -> Result<Bomb, AppError> {
        self.round(round_id)?
            .bomb(bomb_id)
            .map(|b| Bomb::clone(b))
            .ok_or_else(|| not_found("bomb", bomb_id))
    }

    fn put_bomb(&mut self, round_id: RoundId, bomb: Bomb) -> Result<(), AppError> {
        let bomb_id = bomb.id;
        let next = self
            .round(round_id)?
            .with_bomb_replaced(bomb)
            .ok_or_else(|| not_found("bomb", bomb_id))?;
        self.rounds.insert(round_id, next);
        Ok(())
    }
}

fn not_found(what: &str, id: i64) -> AppError {
    AppError::Server {
        status: 404,
        code: Some(format!("{}_NOT_FOUND", what.to_uppercase())),
        detail: format!("{what} {id} not found"),
    }
}

pub fn server_error(detail: &str) -> AppError {
    AppError::Server {
        status: 500,
        code: None,
        detail: detail.to_string(),
    }
}

#[derive(Default)]
pub struct FakeRoundApi {
    server: Mutex<Server>,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, VecDeque<AppError>>>,
    gates: Mutex<HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>>,
    answers: Mutex<VecDeque<Result<SolveAnswer, AppError>>>,
    solve_inputs: Mutex<Vec<(ModuleId, ModuleState)>>,
}

impl FakeRoundApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Names of every call received, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == name).count()
    }

    /// Fail the next call to `name` with `err`.
    pub fn fail_next(&self, name: &'static str, err: AppError) {
        self.failures.lock().entry(name).or_default().push_back(err);
    }

    /// Hold the next call to `name` after it has computed its response, until
    /// the returned sender fires (or is dropped).
    pub fn gate_next(&self, name: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().entry(name).or_default().push_back(rx);
        tx
    }

    /// Queue the answer for the next solve call.
    pub fn answer_next(&self, answer: SolveAnswer) {
        self.answers.lock().push_back(Ok(answer));
    }

    pub fn solve_inputs(&self) -> Vec<(ModuleId, ModuleState)> {
        self.solve_inputs.lock().clone()
    }

    pub fn server_round(&self, round_id: RoundId) -> Option<Round> {
        self.server.lock().rounds.get(&round_id).cloned()
    }

    /// Seed a round directly on the server side.
    pub fn seed_round(&self, round: Round) {
        let mut server = self.server.lock();
        server.next_id = server.next_id.max(round.id);
        server.rounds.insert(round.id, round);
    }

    fn enter(&self, name: &'static str) -> Result<(), AppError> {
        self.calls.lock().push(name);
        match self.failures.lock().get_mut(name).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn leave<T>(&self, name: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
        let gate = self.gates.lock().get_mut(name).and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

#[async_trait]
impl RoundApi for FakeRoundApi {
    async fn create_round(&self) -> Result<Round, AppError> {
        self.enter("create_round")?;
        let round = {
            let mut server = self.server.lock();
            let round = Round::new(server.next_id());
            server.rounds.insert(round.id, round.clone());
            round
        };
        self.leave("create_round", Ok(round)).await
    }

    async fn fetch_round(&self, round_id: RoundId) -> Result<Round, AppError> {
        self.enter("fetch_round")?;
        let result = self.server.lock().round(round_id).cloned();
        self.leave("fetch_round", result).await
    }

    async fn list_rounds(&self) -> Result<Vec<Round>, AppError> {
        self.enter("list_rounds")?;
        let rounds = self.server.lock().rounds.values().cloned().collect();
        self.leave("list_rounds", Ok(rounds)).await
    }

    async fn delete_round(&self, round_id: RoundId) -> Result<(), AppError> {
        self.enter("delete_round")?;
        let result = match self.server.lock().rounds.remove(&round_id) {
            Some(_) => Ok(()),
            None => Err(not_found("round", round_id)),
        };
        self.leave("delete_round", result).await
    }

    async fn start_round(&self, round_id: RoundId) -> Result<Round, AppError> {
        self.enter("start_round")?;
        let result = {
            let mut server = self.server.lock();
            server.round(round_id).cloned().map(|round| {
                let started = Round {
                    status: RoundStatus::Active,
                    start_time: Some(OffsetDateTime::UNIX_EPOCH),
                    ..round
                };
                server.rounds.insert(round_id, started.clone());
                started
            })
        };
        self.leave("start_round", result).await
    }

    async fn create_bomb(&self, round_id: RoundId, config: &BombConfig) -> Result<Bomb, AppError> {
        self.enter("create_bomb")?;
        let result = {
            let mut server = self.server.lock();
            let id = server.next_id();
            let bomb = Bomb {
                batteries: config.batteries,
                indicators: config.indicators.clone(),
                port_plates: config.port_plates.clone(),
                ..Bomb::new(id, config.serial_number.clone())
            };
            server.round(round_id).cloned().map(|round| {
                server
                    .rounds
                    .insert(round_id, round.with_bomb_appended(bomb.clone()));
                bomb
            })
        };
        self.leave("create_bomb", result).await
    }

    async fn configure_bomb(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        patch: &BombPatch,
    ) -> Result<Bomb, AppError> {
        self.enter("configure_bomb")?;
        let result = {
            let mut server = self.server.lock();
            server.bomb(round_id, bomb_id).and_then(|bomb| {
                let patch = patch.clone();
                let bomb = Bomb {
                    serial_number: patch.serial_number.unwrap_or(bomb.serial_number.clone()),
                    batteries: patch.batteries.unwrap_or(bomb.batteries),
                    indicators: patch.indicators.unwrap_or(bomb.indicators.clone()),
                    port_plates: patch.port_plates.unwrap_or(bomb.port_plates.clone()),
                    ..bomb
                };
                server.put_bomb(round_id, bomb.clone())?;
                Ok(bomb)
            })
        };
        self.leave("configure_bomb", result).await
    }

    async fn add_modules(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        module_type: ModuleType,
        count: u8,
    ) -> Result<Vec<Module>, AppError> {
        self.enter("add_modules")?;
        let result = {
            let mut server = self.server.lock();
            server.bomb(round_id, bomb_id).and_then(|bomb| {
                let created: Vec<Module> = (0..count)
                    .map(|_| Module::new(server.next_id(), module_type))
                    .collect();
                server.put_bomb(round_id, bomb.with_modules_appended(created.clone()))?;
                Ok(created)
            })
        };
        self.leave("add_modules", result).await
    }

    async fn add_strike(&self, round_id: RoundId, bomb_id: BombId) -> Result<Bomb, AppError> {
        self.enter("add_strike")?;
        let result = {
            let mut server = self.server.lock();
            server.bomb(round_id, bomb_id).and_then(|bomb| {
                let strikes = bomb.strikes + 1;
                let status = if strikes >= STRIKE_LIMIT {
                    BombStatus::Exploded
                } else {
                    bomb.status
                };
                let bomb = Bomb {
                    strikes,
                    status,
                    ..bomb
                };
                server.put_bomb(round_id, bomb.clone())?;
                Ok(bomb)
            })
        };
        self.leave("add_strike", result).await
    }

    async fn solve(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        module_id: ModuleId,
        input: &ModuleState,
    ) -> Result<SolveAnswer, AppError> {
        self.enter("solve")?;
        self.solve_inputs.lock().push((module_id, input.clone()));
        let answer = self
            .answers
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(server_error("no scripted solver answer")));

        if let Ok(answer) = &answer {
            if answer.output.completes(answer.solved) {
                let mut server = self.server.lock();
                if let Ok(bomb) = server.bomb(round_id, bomb_id) {
                    if let Some(module) = bomb.module(module_id) {
                        let solved = Module {
                            solved: true,
                            ..Module::clone(module)
                        };
                        if let Some(next) = bomb.with_module_replaced(solved) {
                            let _ = server.put_bomb(round_id, next);
                        }
                    }
                }
            }
        }
        self.leave("solve", answer).await
    }
}
