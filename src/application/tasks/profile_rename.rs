use crate::application::services::game_service::GameApi;
use crate::constants::{GEM_MARKER, RENAME_SETTLE_SECONDS};
use crate::error::MessengerError;
use crate::session::interface::{disconnect_quietly, ensure_connected, Messenger};
use crate::utils::timing::Sleeper;
use std::time::Duration;
use tracing::{error, info, instrument};

pub fn with_gem_marker(first_name: &str) -> String {
    format!("{first_name} {GEM_MARKER}")
}

/// Puts the gem marker in the profile first name long enough for the service
/// to see it, claims the task, then puts the original name back.
///
/// Once the rename went through, the original name is restored whether or
/// not the claim succeeded. Returns whether the task was claimed; only
/// session-invalidating errors are returned as `Err`.
#[instrument(skip_all, fields(task = %task_id))]
pub async fn rename_and_complete<M, G>(
    messenger: &mut M,
    game: &G,
    task_id: &str,
    sleeper: &dyn Sleeper,
) -> Result<bool, MessengerError>
where
    M: Messenger + ?Sized,
    G: GameApi + ?Sized,
{
    if let Err(e) = ensure_connected(messenger).await {
        if e.is_fatal() {
            return Err(e);
        }
        error!("(Gem) Connect failed: {}", e);
    }

    let result = rename_scoped(messenger, game, task_id, sleeper).await;
    disconnect_quietly(messenger).await;

    match result {
        Ok(completed) => Ok(completed),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            error!("(Gem) Profile rename failed: {}", e);
            Ok(false)
        }
    }
}

async fn rename_scoped<M, G>(
    messenger: &mut M,
    game: &G,
    task_id: &str,
    sleeper: &dyn Sleeper,
) -> Result<bool, MessengerError>
where
    M: Messenger + ?Sized,
    G: GameApi + ?Sized,
{
    let me = messenger.get_me().await?;
    let original = me.first_name;

    messenger.update_profile(&with_gem_marker(&original)).await?;
    sleeper.sleep(Duration::from_secs(RENAME_SETTLE_SECONDS)).await;

    let completed = match game.complete_task(task_id).await {
        Ok(_) => true,
        Err(e) => {
            error!("(Gem) Failed to claim task: {}", e);
            false
        }
    };
    sleeper.sleep(Duration::from_secs(RENAME_SETTLE_SECONDS)).await;

    match messenger.update_profile(&original).await {
        Ok(()) => info!("(Gem) Restored first name"),
        Err(e) if e.is_fatal() => return Err(e),
        Err(e) => error!("(Gem) Failed to restore first name {}: {}", original, e),
    }

    Ok(completed)
}
