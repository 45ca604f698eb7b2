use crate::support::{test_config, FakeMessenger, RecordingSleeper};
use billion_client::error::RunnerError;
use billion_client::runner::launcher::run_accounts;
use billion_client::runner::AccountRunner;
use mockito::Server;
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn test_each_invalid_session_ends_only_its_runner() {
    let server = Server::new_async().await;
    let config = test_config(&server.url());

    let runners = ["first", "second"]
        .into_iter()
        .map(|name| {
            AccountRunner::new(name, FakeMessenger::deactivated(), None, config.clone())
                .with_sleeper(Arc::new(RecordingSleeper::new()))
        })
        .collect();

    let mut exits = run_accounts(runners).await;
    exits.sort_by(|a, b| a.session_name.cmp(&b.session_name));

    let names: Vec<&str> = exits.iter().map(|e| e.session_name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    for exit in &exits {
        assert!(
            matches!(&exit.result, Err(RunnerError::InvalidSession(name)) if *name == exit.session_name)
        );
    }
}
