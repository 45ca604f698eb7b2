use crate::support::{expected_init_data, test_config, FakeMessenger, RecordingSleeper};
use billion_client::config::DelayRange;
use billion_client::constants::LOGIN_COOLDOWN_SECONDS;
use billion_client::error::RunnerError;
use billion_client::runner::state::{CycleOutcome, RunnerState};
use billion_client::runner::AccountRunner;
use billion_client::transport::proxy::ProxyDescriptor;
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn runner(
    messenger: FakeMessenger,
    server: &Server,
    sleeper: &RecordingSleeper,
) -> AccountRunner<FakeMessenger> {
    AccountRunner::new("acc", messenger, None, test_config(&server.url()))
        .with_sleeper(Arc::new(sleeper.clone()))
        .with_seed(7)
}

fn me_body() -> String {
    json!({"response": {"user": {"deathDate": 1.0e12, "isAlive": true}}}).to_string()
}

#[tokio::test]
async fn test_rejected_login_cools_down_and_retries() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("GET", "/auth/login")
        .match_header("tg-auth", expected_init_data().as_str())
        .with_status(500)
        .expect(2)
        .create_async()
        .await;
    let me = server.mock("GET", "/users/me").expect(0).create_async().await;

    let sleeper = RecordingSleeper::new();
    let mut runner = runner(FakeMessenger::new(), &server, &sleeper);
    runner.start().await;

    assert_eq!(runner.step().await.unwrap(), CycleOutcome::LoginRejected);
    assert_eq!(runner.step().await.unwrap(), CycleOutcome::LoginRejected);

    assert_eq!(
        sleeper.recorded_secs(),
        vec![LOGIN_COOLDOWN_SECONDS, LOGIN_COOLDOWN_SECONDS]
    );
    assert_eq!(runner.state(), RunnerState::Cooldown);
    assert_eq!(runner.user_id(), Some(777));
    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn test_deactivated_account_stops_runner() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("GET", "/auth/login")
        .expect(0)
        .create_async()
        .await;

    let messenger = FakeMessenger::deactivated();
    let sleeper = RecordingSleeper::new();
    let mut runner = runner(messenger.clone(), &server, &sleeper);

    let result = runner.run().await;

    assert!(matches!(result, Err(RunnerError::InvalidSession(name)) if name == "acc"));
    assert_eq!(runner.state(), RunnerState::Fatal);
    assert!(sleeper.recorded_secs().is_empty());
    assert!(!runner.has_http_session());
    assert!(!messenger
        .calls()
        .iter()
        .any(|call| call.starts_with("resolve_peer")));
    login.assert_async().await;
}

#[tokio::test]
async fn test_full_cycle_runs_only_automatable_tasks() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("GET", "/auth/login")
        .match_header("tg-auth", expected_init_data().as_str())
        .with_status(200)
        .with_body(json!({"response": {"accessToken": "tok", "isNewUser": false}}).to_string())
        .expect(1)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/users/me")
        .match_header("authorization", "Bearer tok")
        .with_status(200)
        .with_body(me_body())
        .expect(1)
        .create_async()
        .await;
    let tasks = server
        .mock("GET", "/tasks")
        .with_status(200)
        .with_body(
            json!({"response": [
                {"uuid": "g1", "taskName": "Visit", "type": "VISIT_SITE", "isCompleted": false, "secondsAmount": 60},
                {"uuid": "i1", "taskName": "Invite", "type": "INVITE_FRIENDS", "isCompleted": false, "secondsAmount": 60},
                {"uuid": "b1", "taskName": "Boost", "type": "BOOST_TG", "isCompleted": false, "secondsAmount": 60},
                {"uuid": "r1", "taskName": "Gem", "type": "REGEX_STRING", "isCompleted": false, "secondsAmount": 60},
                {"uuid": "s1", "taskName": "Channel", "type": "SUBSCRIPTION_TG", "isCompleted": false, "secondsAmount": 60, "link": "https://t.me/billion_news"},
                {"uuid": "d1", "taskName": "Done", "type": "VISIT_SITE", "isCompleted": true, "secondsAmount": 60}
            ]})
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let mut claims = Vec::new();
    for uuid in ["g1", "r1", "s1"] {
        claims.push(
            server
                .mock("POST", "/tasks")
                .match_body(Matcher::Json(json!({"uuid": uuid})))
                .with_status(200)
                .with_body(json!({"response": {"isCompleted": true}}).to_string())
                .expect(1)
                .create_async()
                .await,
        );
    }
    let mut skipped = Vec::new();
    for uuid in ["i1", "b1", "d1"] {
        skipped.push(
            server
                .mock("POST", "/tasks")
                .match_body(Matcher::Json(json!({"uuid": uuid})))
                .expect(0)
                .create_async()
                .await,
        );
    }

    let mut messenger = FakeMessenger::new();
    messenger.flood_waits.push_back(7);
    let observer = messenger.clone();
    let sleeper = RecordingSleeper::new();
    let mut runner = runner(messenger, &server, &sleeper);
    runner.start().await;

    let outcome = runner.step().await.unwrap();

    assert_eq!(outcome, CycleOutcome::Completed);
    assert_eq!(runner.state(), RunnerState::Cooldown);
    // flood wait, generic, rename (settle, settle, task), subscribe (join, task), cooldown
    assert_eq!(sleeper.recorded_secs(), vec![10, 5, 5, 5, 5, 3, 5, 10]);
    assert_eq!(observer.name(), "Ann");

    let calls = observer.calls();
    let position = |call: &str| calls.iter().position(|c| c == call);
    let renamed = position("update_profile:Ann 💎").unwrap();
    let restored = position("update_profile:Ann").unwrap();
    assert!(renamed < restored);
    let joined = position("join_chat:billion_news").unwrap();
    let muted = position(&format!("mute_chat:-100:{}", i32::MAX)).unwrap();
    assert!(joined < muted);
    assert!(!runner.has_http_session());
    assert!(!runner.messenger().connected);

    login.assert_async().await;
    me.assert_async().await;
    tasks.assert_async().await;
    for mock in claims.iter().chain(skipped.iter()) {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_midcycle_error_retries_quickly() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/auth/login")
        .with_status(200)
        .with_body(json!({"response": {"accessToken": "tok"}}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/users/me")
        .with_status(500)
        .create_async()
        .await;
    let tasks = server.mock("GET", "/tasks").expect(0).create_async().await;

    let messenger = FakeMessenger::new();
    let sleeper = RecordingSleeper::new();
    let mut runner = runner(messenger, &server, &sleeper);
    runner.start().await;

    assert_eq!(runner.step().await.unwrap(), CycleOutcome::Errored);
    assert_eq!(sleeper.recorded_secs(), vec![3]);
    assert_eq!(runner.state(), RunnerState::Cooldown);
    assert!(!runner.has_http_session());
    assert!(!runner.messenger().connected);
    tasks.assert_async().await;
}

#[tokio::test]
async fn test_start_applies_random_delay() {
    let mut server = Server::new_async().await;
    let mut config = (*test_config(&server.url())).clone();
    config.bot.use_random_delay_in_run = true;
    config.bot.random_delay_in_run = DelayRange::new(7, 7);

    let ip_check = server.mock("GET", "/ip").expect(0).create_async().await;

    let sleeper = RecordingSleeper::new();
    let mut runner = AccountRunner::new("acc", FakeMessenger::new(), None, Arc::new(config))
        .with_sleeper(Arc::new(sleeper.clone()));
    runner.start().await;

    assert_eq!(sleeper.recorded_secs(), vec![7]);
    assert!(runner.has_http_session());
    assert_eq!(runner.state(), RunnerState::Init);
    ip_check.assert_async().await;
}

#[tokio::test]
async fn test_missing_web_app_data_skips_login() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("GET", "/auth/login")
        .expect(0)
        .create_async()
        .await;

    let mut messenger = FakeMessenger::new();
    messenger.redirect_url = "https://b-game.billion.tg/#tgWebAppVersion=7.10".to_string();
    let observer = messenger.clone();
    let sleeper = RecordingSleeper::new();
    let mut runner = runner(messenger, &server, &sleeper);
    runner.start().await;

    assert_eq!(runner.step().await.unwrap(), CycleOutcome::AuthUnavailable);
    assert_eq!(sleeper.recorded_secs(), vec![3, LOGIN_COOLDOWN_SECONDS]);
    assert_eq!(runner.state(), RunnerState::Cooldown);
    assert_eq!(runner.user_id(), None);
    assert!(!runner.has_http_session());
    assert!(!runner.messenger().connected);
    assert!(!observer.calls().iter().any(|call| call == "get_me"));
    login.assert_async().await;
}

#[tokio::test]
async fn test_failed_proxy_check_is_not_fatal() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/ip")
        .with_status(500)
        .create_async()
        .await;
    let proxy: ProxyDescriptor = format!("http://{}", server.host_with_port())
        .parse()
        .unwrap();

    let sleeper = RecordingSleeper::new();
    let mut runner = AccountRunner::new(
        "acc",
        FakeMessenger::new(),
        Some(proxy),
        test_config(&server.url()),
    )
    .with_sleeper(Arc::new(sleeper.clone()));
    runner.start().await;

    assert!(runner.has_http_session());
    assert_eq!(runner.state(), RunnerState::Init);
    assert!(sleeper.recorded_secs().is_empty());
}
