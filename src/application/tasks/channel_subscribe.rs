use crate::constants::{JOIN_DELAY_SECONDS, MUTE_FOREVER, TG_LINK_PREFIX, TG_PRIVATE_INVITE_PREFIX};
use crate::error::MessengerError;
use crate::session::interface::{disconnect_quietly, ensure_connected, Messenger};
use crate::utils::timing::Sleeper;
use std::time::Duration;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    AlreadyMember,
    Joined,
    JoinFailed,
    /// Chat or membership lookup failed; nothing was attempted.
    Unavailable,
}

/// Public links are reduced to the bare username; private `+` invites are
/// kept whole since the invite hash alone does not resolve.
pub fn normalize_link(link: &str) -> String {
    if link.contains(TG_PRIVATE_INVITE_PREFIX) {
        link.to_string()
    } else {
        link.replace(TG_LINK_PREFIX, "")
    }
}

/// Joins the channel behind `link` unless already a member, then mutes it.
///
/// Non-fatal failures are logged and reported through the returned
/// `Subscription`; only errors that invalidate the session are returned.
#[instrument(skip(messenger, sleeper))]
pub async fn join_and_mute<M: Messenger + ?Sized>(
    messenger: &mut M,
    link: &str,
    sleeper: &dyn Sleeper,
) -> Result<Subscription, MessengerError> {
    let link = normalize_link(link);

    if let Err(e) = ensure_connected(messenger).await {
        if e.is_fatal() {
            return Err(e);
        }
        error!("(Task) Connect failed: {}", e);
    }

    let result = subscribe(messenger, &link, sleeper).await;
    disconnect_quietly(messenger).await;

    match result {
        Ok(subscription) => Ok(subscription),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            error!("(Task) Error while join tg channel: {}", e);
            Ok(Subscription::Unavailable)
        }
    }
}

async fn subscribe<M: Messenger + ?Sized>(
    messenger: &mut M,
    link: &str,
    sleeper: &dyn Sleeper,
) -> Result<Subscription, MessengerError> {
    let chat = messenger.get_chat(link).await?;
    let chat_username = chat.username.clone().unwrap_or_else(|| link.to_string());

    match messenger.get_chat_member(&chat_username, "me").await {
        Ok(()) => Ok(Subscription::AlreadyMember),
        Err(MessengerError::UserNotParticipant) => {
            sleeper.sleep(Duration::from_secs(JOIN_DELAY_SECONDS)).await;

            let joined = match messenger.join_chat(link).await {
                Ok(joined) => {
                    info!(
                        "Joined to channel: {}",
                        joined.username.as_deref().unwrap_or(&chat_username)
                    );
                    true
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("(Task) Failed to join {}: {}", chat_username, e);
                    false
                }
            };

            match messenger.mute_chat(chat.id, MUTE_FOREVER).await {
                Ok(()) => info!("Successfully muted chat {}", chat_username),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => info!("(Task) Failed to mute chat {}: {}", chat_username, e),
            }

            Ok(if joined {
                Subscription::Joined
            } else {
                Subscription::JoinFailed
            })
        }
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            error!("(Task) Error while checking TG group {}: {}", chat_username, e);
            Ok(Subscription::Unavailable)
        }
    }
}
