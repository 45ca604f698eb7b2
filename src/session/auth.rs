use crate::config::BotConfig;
use crate::constants::{
    APP_SHORT_NAME, BOT_ALIAS, ERROR_COOLDOWN_SECONDS, FLOOD_WAIT_BUFFER_SECONDS,
    WEB_VIEW_PLATFORM,
};
use crate::error::{AuthError, MessengerError};
use crate::session::interface::{
    disconnect_quietly, ensure_connected, Messenger, PeerRef, WebViewRequest,
};
use crate::session::web_app_data::WebAppData;
use crate::transport::proxy::ProxyDescriptor;
use crate::utils::timing::Sleeper;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Fresh login material produced by one handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPayload {
    pub web_app_data: WebAppData,
    /// Messenger id of the account that produced it.
    pub user_id: i64,
}

impl AuthPayload {
    pub fn init_data(&self) -> String {
        self.web_app_data.to_init_data()
    }
}

/// Picks the referral passed as start parameter: the configured one with
/// probability `ref_id_weight / 100`, the fallback otherwise.
pub fn choose_start_param<R: Rng + ?Sized>(rng: &mut R, bot: &BotConfig) -> String {
    if rng.gen_ratio(bot.ref_id_weight.min(100), 100) {
        bot.ref_id.clone()
    } else {
        bot.fallback_ref_id.clone()
    }
}

/// Resolves `alias`, honoring every flood wait plus a fixed buffer.
#[instrument(skip(messenger, sleeper))]
pub async fn resolve_peer_with_flood_wait<M: Messenger + ?Sized>(
    messenger: &mut M,
    alias: &str,
    sleeper: &dyn Sleeper,
) -> Result<PeerRef, MessengerError> {
    loop {
        match messenger.resolve_peer(alias).await {
            Ok(peer) => return Ok(peer),
            Err(MessengerError::FloodWait(seconds)) => {
                warn!("FloodWait {}s while resolving {}", seconds, alias);
                let wait = seconds.saturating_add(FLOOD_WAIT_BUFFER_SECONDS);
                info!("Sleep {}s", wait);
                sleeper.sleep(Duration::from_secs(wait)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Runs the web view handshake.
///
/// `Ok(None)` means no payload could be produced this time; the error was
/// logged and the caller should cool down and retry. `Err` is returned only
/// for errors that make the session permanently unusable.
///
/// The messenger is disconnected before returning, on every path.
#[instrument(skip_all)]
pub async fn fetch_auth_payload<M, R>(
    messenger: &mut M,
    proxy: Option<&ProxyDescriptor>,
    bot: &BotConfig,
    sleeper: &dyn Sleeper,
    rng: &mut R,
) -> Result<Option<AuthPayload>, AuthError>
where
    M: Messenger + ?Sized,
    R: Rng + Send + ?Sized,
{
    let start_param = choose_start_param(rng, bot);
    messenger.set_proxy(proxy.cloned());

    let result = request_payload(messenger, start_param, sleeper).await;
    disconnect_quietly(messenger).await;

    match result {
        Ok(payload) => Ok(Some(payload)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            error!("Unknown error: {}", e);
            sleeper
                .sleep(Duration::from_secs(ERROR_COOLDOWN_SECONDS))
                .await;
            Ok(None)
        }
    }
}

async fn request_payload<M: Messenger + ?Sized>(
    messenger: &mut M,
    start_param: String,
    sleeper: &dyn Sleeper,
) -> Result<AuthPayload, AuthError> {
    ensure_connected(messenger).await?;

    let peer = resolve_peer_with_flood_wait(messenger, BOT_ALIAS, sleeper).await?;
    debug!("Resolved {} to {:?}", BOT_ALIAS, peer);

    let url = messenger
        .request_app_web_view(WebViewRequest {
            peer,
            platform: WEB_VIEW_PLATFORM.to_string(),
            app_short_name: APP_SHORT_NAME.to_string(),
            write_allowed: true,
            start_param,
        })
        .await?;

    let web_app_data = WebAppData::from_redirect_url(&url)?;
    let me = messenger.get_me().await?;

    Ok(AuthPayload {
        web_app_data,
        user_id: me.id,
    })
}
