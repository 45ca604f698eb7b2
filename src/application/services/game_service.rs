use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::{
    application::models::{
        auth::LoginData,
        task::{CompleteTaskRequest, Task},
        user::{MeData, UserInfo},
        ApiResponse,
    },
    config::Config,
    constants::{LOGIN_ENDPOINT, ME_ENDPOINT, TASKS_ENDPOINT},
    error::AppError,
    transport::{http_client::HttpSession, proxy::ProxyDescriptor},
};

/// Operations of the game service used by the runner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Exchanges messenger init data for a bearer token and keeps the token
    /// for the following calls.
    async fn login(&mut self, init_data: &str) -> Result<LoginData, AppError>;

    async fn me(&self) -> Result<UserInfo, AppError>;

    async fn tasks(&self) -> Result<Vec<Task>, AppError>;

    /// Claims a task. Any successful response counts as completed.
    async fn complete_task(&self, uuid: &str) -> Result<serde_json::Value, AppError>;

    /// Public IP the service sees, used to check the proxy.
    async fn egress_ip(&self) -> Result<String, AppError>;
}

#[derive(Debug, Deserialize)]
struct IpResponse {
    origin: String,
}

/// `GameApi` over a single HTTP session.
pub struct GameService {
    config: Arc<Config>,
    http: HttpSession,
}

impl GameService {
    pub fn new(
        config: Arc<Config>,
        proxy: Option<&ProxyDescriptor>,
        user_agent: Option<String>,
    ) -> Result<Self, AppError> {
        let http = HttpSession::new(&config.api.base_url, proxy, user_agent)?;
        Ok(Self { config, http })
    }

    pub fn http(&self) -> &HttpSession {
        &self.http
    }
}

#[async_trait]
impl GameApi for GameService {
    #[instrument(skip_all)]
    async fn login(&mut self, init_data: &str) -> Result<LoginData, AppError> {
        self.http.set_tg_auth(init_data);

        let result: ApiResponse<LoginData> = self.http.get(LOGIN_ENDPOINT).await?;
        self.http.set_bearer(&result.response.access_token);

        debug!("Login response: {}", result.response);
        Ok(result.response)
    }

    async fn me(&self) -> Result<UserInfo, AppError> {
        let result: ApiResponse<MeData> = self.http.get(ME_ENDPOINT).await?;
        Ok(result.response.user)
    }

    async fn tasks(&self) -> Result<Vec<Task>, AppError> {
        let result: ApiResponse<Vec<Task>> = self.http.get(TASKS_ENDPOINT).await?;
        debug!("Tasks fetched: {} tasks", result.response.len());
        Ok(result.response)
    }

    async fn complete_task(&self, uuid: &str) -> Result<serde_json::Value, AppError> {
        info!("Claiming task {}", uuid);
        self.http
            .post(TASKS_ENDPOINT, &CompleteTaskRequest { uuid })
            .await
    }

    async fn egress_ip(&self) -> Result<String, AppError> {
        let timeout = Duration::from_secs(self.config.api.proxy_check_timeout);
        let result: IpResponse = self
            .http
            .get_absolute(&self.config.api.proxy_check_url, timeout)
            .await?;
        Ok(result.origin)
    }
}
