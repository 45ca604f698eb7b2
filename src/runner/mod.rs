/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 14/5/25
******************************************************************************/

pub mod launcher;

pub mod state;

use crate::application::services::game_service::{GameApi, GameService};
use crate::application::tasks::{execute_task, TaskOutcome};
use crate::config::Config;
use crate::constants::{ERROR_COOLDOWN_SECONDS, LOGIN_COOLDOWN_SECONDS, TASK_DELAY_SECONDS};
use crate::error::{AppError, RunnerError};
use crate::runner::state::{CycleOutcome, RunnerState};
use crate::session::auth::fetch_auth_payload;
use crate::session::interface::{disconnect_quietly, Messenger};
use crate::transport::headers::random_android_chrome_user_agent;
use crate::transport::proxy::ProxyDescriptor;
use crate::utils::timing::{format_time_left, seconds_until_now, Sleeper, TokioSleeper};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

/// Drives one messenger account through login, task polling and cooldown,
/// forever or until its session becomes invalid.
pub struct AccountRunner<M: Messenger> {
    session_name: String,
    messenger: M,
    proxy: Option<ProxyDescriptor>,
    config: Arc<Config>,
    sleeper: Arc<dyn Sleeper>,
    rng: StdRng,
    span: Span,
    game: Option<GameService>,
    state: RunnerState,
    user_id: Option<i64>,
}

impl<M: Messenger> AccountRunner<M> {
    pub fn new(
        session_name: impl Into<String>,
        messenger: M,
        proxy: Option<ProxyDescriptor>,
        config: Arc<Config>,
    ) -> Self {
        let session_name = session_name.into();
        let span = info_span!("account", session = %session_name);
        Self {
            session_name,
            messenger,
            proxy,
            config,
            sleeper: Arc::new(TokioSleeper),
            rng: StdRng::from_entropy(),
            span,
            game: None,
            state: RunnerState::Init,
            user_id: None,
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Span every log line of this runner is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Messenger id learned during the last successful handshake.
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub fn has_http_session(&self) -> bool {
        self.game.is_some()
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Runs until the messenger session turns out to be invalid.
    pub async fn run(&mut self) -> Result<(), RunnerError> {
        let span = self.span.clone();
        self.run_forever().instrument(span).await
    }

    async fn run_forever(&mut self) -> Result<(), RunnerError> {
        self.start().await;
        loop {
            self.step_inner().await?;
        }
    }

    /// Startup: optional random delay, HTTP session, proxy check.
    pub async fn start(&mut self) {
        self.state = RunnerState::Init;

        if self.config.bot.use_random_delay_in_run {
            let delay = self.config.bot.random_delay_in_run.sample(&mut self.rng);
            info!("Bot will start in {}s", delay);
            self.sleeper.sleep(Duration::from_secs(delay)).await;
        }

        if let Err(e) = self.open_http_session() {
            error!("Failed to open HTTP session: {}", e);
            return;
        }

        if self.proxy.is_some() {
            if let Some(game) = self.game.as_ref() {
                match game.egress_ip().await {
                    Ok(ip) => info!("Proxy IP: {}", ip),
                    Err(e) => warn!("Proxy check failed: {}", e),
                }
            }
        }
    }

    /// One full cycle plus the pause that follows it.
    ///
    /// The HTTP session and the messenger connection are released before
    /// pausing, whatever the cycle's result.
    pub async fn step(&mut self) -> Result<CycleOutcome, RunnerError> {
        let span = self.span.clone();
        self.step_inner().instrument(span).await
    }

    async fn step_inner(&mut self) -> Result<CycleOutcome, RunnerError> {
        let result = self.run_cycle().await;

        self.close_http_session();
        disconnect_quietly(&mut self.messenger).await;

        match result {
            Ok(CycleOutcome::Completed) => {
                self.state = RunnerState::Cooldown;
                let sleep_time = self.config.bot.sleep_time.sample(&mut self.rng);
                info!("Sleep {}s", sleep_time);
                self.sleeper.sleep(Duration::from_secs(sleep_time)).await;
                Ok(CycleOutcome::Completed)
            }
            Ok(outcome @ (CycleOutcome::AuthUnavailable | CycleOutcome::LoginRejected)) => {
                info!("💎 Login failed");
                self.state = RunnerState::Cooldown;
                self.sleeper
                    .sleep(Duration::from_secs(LOGIN_COOLDOWN_SECONDS))
                    .await;
                info!("Sleep {}s", LOGIN_COOLDOWN_SECONDS);
                Ok(outcome)
            }
            Ok(CycleOutcome::Errored) => Ok(CycleOutcome::Errored),
            Err(e) if e.is_fatal() => {
                error!("{} | Invalid Session", self.session_name);
                self.state = RunnerState::Fatal;
                Err(e)
            }
            Err(e) => {
                error!("Unknown error: {}", e);
                self.state = RunnerState::Cooldown;
                self.sleeper
                    .sleep(Duration::from_secs(ERROR_COOLDOWN_SECONDS))
                    .await;
                Ok(CycleOutcome::Errored)
            }
        }
    }

    async fn run_cycle(&mut self) -> Result<CycleOutcome, RunnerError> {
        self.state = RunnerState::Authenticating;
        let game = match self.game.take() {
            Some(game) => game,
            None => self.build_game_service()?,
        };
        let game = self.game.insert(game);

        let payload = match fetch_auth_payload(
            &mut self.messenger,
            self.proxy.as_ref(),
            &self.config.bot,
            self.sleeper.as_ref(),
            &mut self.rng,
        )
        .await
        {
            Ok(Some(payload)) => payload,
            Ok(None) => return Ok(CycleOutcome::AuthUnavailable),
            Err(e) if e.is_fatal() => {
                return Err(RunnerError::InvalidSession(self.session_name.clone()))
            }
            Err(e) => {
                warn!("Handshake failed: {}", e);
                return Ok(CycleOutcome::AuthUnavailable);
            }
        };
        self.user_id = Some(payload.user_id);

        let login = match game.login(&payload.init_data()).await {
            Ok(login) => login,
            Err(e) => {
                warn!("Login request failed: {}", e);
                return Ok(CycleOutcome::LoginRejected);
            }
        };
        self.state = RunnerState::LoggedIn;
        if login.is_new_user {
            info!("💎 User registered!");
        }
        info!("💎 Login successful");

        self.state = RunnerState::PollingTasks;
        let user = game.me().await?;
        let time_left = format_time_left(seconds_until_now(user.death_date));
        info!("Left: {} | Alive: {}", time_left, user.is_alive);

        let tasks = game.tasks().await?;
        debug!("{} tasks listed", tasks.len());

        for task in tasks.iter().filter(|task| task.is_pending()) {
            info!("Performing task {}...", task.task_name);
            let outcome = execute_task(task, &mut self.messenger, &*game, self.sleeper.as_ref())
                .await
                .map_err(|e| {
                    if e.is_fatal() {
                        RunnerError::InvalidSession(self.session_name.clone())
                    } else {
                        RunnerError::Messenger(e)
                    }
                })?;

            if outcome == TaskOutcome::Completed {
                info!(
                    "Task {} completed! | Reward: +{}",
                    task.task_name, task.seconds_amount
                );
            }
            self.sleeper
                .sleep(Duration::from_secs(TASK_DELAY_SECONDS))
                .await;
        }

        Ok(CycleOutcome::Completed)
    }

    fn build_game_service(&mut self) -> Result<GameService, AppError> {
        let user_agent = if self.config.bot.fake_user_agent {
            Some(random_android_chrome_user_agent(&mut self.rng))
        } else {
            None
        };
        GameService::new(self.config.clone(), self.proxy.as_ref(), user_agent)
    }

    fn open_http_session(&mut self) -> Result<(), AppError> {
        if self.game.is_none() {
            self.game = Some(self.build_game_service()?);
        }
        Ok(())
    }

    fn close_http_session(&mut self) {
        if self.game.take().is_some() {
            debug!("HTTP session closed");
        }
    }
}
