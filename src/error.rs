/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 12/5/25
 ******************************************************************************/
use std::fmt;
use std::fmt::{Display, Formatter};
use reqwest::StatusCode;

/// Failures of the HTTP side: the game service and the proxy check.
#[derive(Debug)]
pub enum AppError {
    Network(reqwest::Error),
    Json(serde_json::Error),
    Unexpected(StatusCode),
    InvalidHeader(String),
    Proxy(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Network(e)   => write!(f, "network error: {e}"),
            AppError::Json(e)      => write!(f, "json error: {e}"),
            AppError::Unexpected(s)=> write!(f, "unexpected http status: {s}"),
            AppError::InvalidHeader(h) => write!(f, "invalid header value: {h}"),
            AppError::Proxy(msg)   => write!(f, "proxy error: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self { AppError::Network(e) }
}
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self { AppError::Json(e) }
}

/// Errors reported by the messenger client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerError {
    Unauthorized,
    UserDeactivated,
    AuthKeyUnregistered,
    /// Server asked us to wait this many seconds before retrying.
    FloodWait(u64),
    UserNotParticipant,
    Connection(String),
    Rpc(String),
}

impl MessengerError {
    /// The account credential is gone; retrying cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MessengerError::Unauthorized
                | MessengerError::UserDeactivated
                | MessengerError::AuthKeyUnregistered
        )
    }
}

impl Display for MessengerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MessengerError::Unauthorized => write!(f, "unauthorized"),
            MessengerError::UserDeactivated => write!(f, "user deactivated"),
            MessengerError::AuthKeyUnregistered => write!(f, "auth key unregistered"),
            MessengerError::FloodWait(s) => write!(f, "flood wait of {s}s required"),
            MessengerError::UserNotParticipant => write!(f, "user is not a participant"),
            MessengerError::Connection(msg) => write!(f, "connection error: {msg}"),
            MessengerError::Rpc(msg) => write!(f, "rpc error: {msg}"),
        }
    }
}

impl std::error::Error for MessengerError {}

#[derive(Debug)]
pub enum AuthError {
    Messenger(MessengerError),
    MalformedWebAppData(String),
}

impl AuthError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AuthError::Messenger(e) if e.is_fatal())
    }
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Messenger(e) => write!(f, "messenger error: {e}"),
            AuthError::MalformedWebAppData(msg) => write!(f, "malformed web app data: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<MessengerError> for AuthError {
    fn from(e: MessengerError) -> Self { AuthError::Messenger(e) }
}

/// Everything that can end or interrupt a runner cycle.
#[derive(Debug)]
pub enum RunnerError {
    /// Terminal: the messenger session can no longer be used.
    InvalidSession(String),
    Api(AppError),
    Messenger(MessengerError),
}

impl RunnerError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RunnerError::InvalidSession(_))
    }
}

impl Display for RunnerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::InvalidSession(name) => write!(f, "invalid session: {name}"),
            RunnerError::Api(e) => write!(f, "api error: {e}"),
            RunnerError::Messenger(e) => write!(f, "messenger error: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<AppError> for RunnerError {
    fn from(e: AppError) -> Self { RunnerError::Api(e) }
}
impl From<MessengerError> for RunnerError {
    fn from(e: MessengerError) -> Self { RunnerError::Messenger(e) }
}
