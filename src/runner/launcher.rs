use crate::error::RunnerError;
use crate::runner::AccountRunner;
use crate::session::interface::Messenger;
use crate::utils::logger::setup_logger;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{error, info};

/// How one account's runner ended.
#[derive(Debug)]
pub struct RunnerExit {
    pub session_name: String,
    pub result: Result<(), RunnerError>,
}

/// Runs every account concurrently, each on its own task, until all of them
/// have stopped or Ctrl+C is received.
///
/// Accounts do not share anything; one account's invalid session ends only
/// that account.
pub async fn run_accounts<M>(runners: Vec<AccountRunner<M>>) -> Vec<RunnerExit>
where
    M: Messenger + 'static,
{
    setup_logger();

    let mut set = JoinSet::new();
    for mut runner in runners {
        set.spawn(async move {
            let result = runner.run().await;
            RunnerExit {
                session_name: runner.session_name().to_string(),
                result,
            }
        });
    }
    info!("Started {} account runners", set.len());

    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut exits = Vec::new();
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Received shutdown signal, terminating gracefully");
                set.shutdown().await;
                break;
            }
            joined = set.join_next() => match joined {
                Some(Ok(exit)) => exits.push(exit),
                Some(Err(e)) => error!("Account runner panicked or was cancelled: {}", e),
                None => break,
            },
        }
    }

    info!("All account runners stopped");
    exits
}
