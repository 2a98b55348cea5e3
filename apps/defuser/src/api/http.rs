//! `RoundApi` over HTTP/JSON.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::trait_def::{RoundApi, SolveAnswer};
use crate::config::ApiConfig;
use crate::domain::{
    Bomb, BombConfig, BombId, BombPatch, Module, ModuleId, ModuleState, ModuleType, Round,
    RoundId,
};
use crate::error::AppError;
use crate::protocol::{AddModulesRequest, BombDto, ModuleDto, RoundDto, SolveReply, SolveRequest};

#[derive(Debug, Clone)]
pub struct HttpRoundApi {
    client: Client,
    base_url: String,
}

impl HttpRoundApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::config(format!("Unable to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use a preconfigured client (shared pools, custom TLS).
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "Solver service responded");
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                debug!(status = status.as_u16(), error = %e, "Unable to read error body");
                String::new()
            }
        };
        Err(AppError::from_response_body(status.as_u16(), &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AppError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RoundApi for HttpRoundApi {
    async fn create_round(&self) -> Result<Round, AppError> {
        let dto: RoundDto = self.send_json(self.request(Method::POST, "/rounds")).await?;
        Ok(dto.into())
    }

    async fn fetch_round(&self, round_id: RoundId) -> Result<Round, AppError> {
        let dto: RoundDto = self
            .send_json(self.request(Method::GET, &format!("/rounds/{round_id}")))
            .await?;
        Ok(dto.into())
    }

    async fn list_rounds(&self) -> Result<Vec<Round>, AppError> {
        let dtos: Vec<RoundDto> = self.send_json(self.request(Method::GET, "/rounds")).await?;
        Ok(dtos.into_iter().map(Round::from).collect())
    }

    async fn delete_round(&self, round_id: RoundId) -> Result<(), AppError> {
        self.send(self.request(Method::DELETE, &format!("/rounds/{round_id}")))
            .await?;
        Ok(())
    }

    async fn start_round(&self, round_id: RoundId) -> Result<Round, AppError> {
        let dto: RoundDto = self
            .send_json(self.request(Method::POST, &format!("/rounds/{round_id}/start")))
            .await?;
        Ok(dto.into())
    }

    async fn create_bomb(&self, round_id: RoundId, config: &BombConfig) -> Result<Bomb, AppError> {
        let dto: BombDto = self
            .send_json(
                self.request(Method::POST, &format!("/rounds/{round_id}/bombs"))
                    .json(config),
            )
            .await?;
        Ok(dto.into())
    }

    async fn configure_bomb(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        patch: &BombPatch,
    ) -> Result<Bomb, AppError> {
        let dto: BombDto = self
            .send_json(
                self.request(
                    Method::PATCH,
                    &format!("/rounds/{round_id}/bombs/{bomb_id}"),
                )
                .json(patch),
            )
            .await?;
        Ok(dto.into())
    }

    async fn add_modules(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        module_type: ModuleType,
        count: u8,
    ) -> Result<Vec<Module>, AppError> {
        let body = AddModulesRequest { module_type, count };
        let dtos: Vec<ModuleDto> = self
            .send_json(
                self.request(
                    Method::POST,
                    &format!("/rounds/{round_id}/bombs/{bomb_id}/modules"),
                )
                .json(&body),
            )
            .await?;
        Ok(dtos.into_iter().map(Module::from).collect())
    }

    async fn add_strike(&self, round_id: RoundId, bomb_id: BombId) -> Result<Bomb, AppError> {
        let dto: BombDto = self
            .send_json(self.request(
                Method::POST,
                &format!("/rounds/{round_id}/bombs/{bomb_id}/strikes"),
            ))
            .await?;
        Ok(dto.into())
    }

    async fn solve(
        &self,
        round_id: RoundId,
        bomb_id: BombId,
        module_id: ModuleId,
        input: &ModuleState,
    ) -> Result<SolveAnswer, AppError> {
        let body = SolveRequest::new(input)?;
        let reply: SolveReply = self
            .send_json(
                self.request(
                    Method::POST,
                    &format!("/rounds/{round_id}/bombs/{bomb_id}/modules/{module_id}/solve"),
                )
                .json(&body),
            )
            .await?;
        let (output, solved) = reply.decode(input.module_type())?;
        Ok(SolveAnswer { output, solved })
    }
}
