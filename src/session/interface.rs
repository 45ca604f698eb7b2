use crate::error::MessengerError;
use crate::transport::proxy::ProxyDescriptor;
use tracing::{debug, warn};

/// Resolved messenger peer, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRef {
    pub id: i64,
    pub access_hash: i64,
}

/// Arguments of the "request app web view" call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebViewRequest {
    pub peer: PeerRef,
    pub platform: String,
    pub app_short_name: String,
    pub write_allowed: bool,
    pub start_param: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub first_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: i64,
    pub username: Option<String>,
}

/// The messenger account a runner acts as.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    fn set_proxy(&mut self, proxy: Option<ProxyDescriptor>);

    fn is_connected(&self) -> bool;

    async fn connect(&mut self) -> Result<(), MessengerError>;

    async fn disconnect(&mut self) -> Result<(), MessengerError>;

    async fn resolve_peer(&mut self, alias: &str) -> Result<PeerRef, MessengerError>;

    /// Returns the redirect URL carrying `tgWebAppData`.
    async fn request_app_web_view(
        &mut self,
        request: WebViewRequest,
    ) -> Result<String, MessengerError>;

    async fn get_me(&mut self) -> Result<Profile, MessengerError>;

    async fn update_profile(&mut self, first_name: &str) -> Result<(), MessengerError>;

    async fn get_chat(&mut self, chat: &str) -> Result<ChatInfo, MessengerError>;

    /// `Err(MessengerError::UserNotParticipant)` when `user` is not in `chat`.
    async fn get_chat_member(&mut self, chat: &str, user: &str) -> Result<(), MessengerError>;

    async fn join_chat(&mut self, chat: &str) -> Result<ChatInfo, MessengerError>;

    async fn mute_chat(&mut self, chat_id: i64, mute_until: i32) -> Result<(), MessengerError>;
}

pub async fn ensure_connected<M: Messenger + ?Sized>(
    messenger: &mut M,
) -> Result<(), MessengerError> {
    if !messenger.is_connected() {
        debug!("Connecting messenger");
        messenger.connect().await?;
    }
    Ok(())
}

/// Disconnects if connected; failures are only logged.
pub async fn disconnect_quietly<M: Messenger + ?Sized>(messenger: &mut M) {
    if messenger.is_connected() {
        if let Err(e) = messenger.disconnect().await {
            warn!("Messenger disconnect failed: {}", e);
        }
    }
}
