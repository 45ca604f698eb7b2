pub mod channel_subscribe;

pub mod profile_rename;

use crate::application::models::task::{Task, TaskKind};
use crate::application::services::game_service::GameApi;
use crate::error::MessengerError;
use crate::session::interface::Messenger;
use crate::utils::timing::Sleeper;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Completed,
    NotCompleted,
    /// Left for the user; never claimed automatically.
    Skipped,
}

/// Runs the side effect a task needs, then claims it.
///
/// Only session-invalidating messenger errors are returned as `Err`.
pub async fn execute_task<M, G>(
    task: &Task,
    messenger: &mut M,
    game: &G,
    sleeper: &dyn Sleeper,
) -> Result<TaskOutcome, MessengerError>
where
    M: Messenger + ?Sized,
    G: GameApi + ?Sized,
{
    match task.kind {
        TaskKind::Generic => Ok(claim(game, task).await),
        TaskKind::ProfileRename => {
            let completed =
                profile_rename::rename_and_complete(messenger, game, &task.uuid, sleeper).await?;
            Ok(if completed {
                TaskOutcome::Completed
            } else {
                TaskOutcome::NotCompleted
            })
        }
        TaskKind::ChannelSubscribe => {
            match task.link.as_deref() {
                Some(link) => {
                    info!("Performing TG subscription to {}", link);
                    channel_subscribe::join_and_mute(messenger, link, sleeper).await?;
                }
                None => warn!("Subscription task {} has no link", task.uuid),
            }
            Ok(claim(game, task).await)
        }
        TaskKind::InviteFriends | TaskKind::Boost => Ok(TaskOutcome::Skipped),
    }
}

async fn claim<G: GameApi + ?Sized>(game: &G, task: &Task) -> TaskOutcome {
    match game.complete_task(&task.uuid).await {
        Ok(_) => TaskOutcome::Completed,
        Err(e) => {
            error!("Failed to claim task {}: {}", task.task_name, e);
            TaskOutcome::NotCompleted
        }
    }
}
