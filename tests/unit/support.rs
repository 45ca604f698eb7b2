use async_trait::async_trait;
use billion_client::config::{ApiConfig, BotConfig, Config, DelayRange};
use billion_client::constants::FALLBACK_REF_ID;
use billion_client::error::MessengerError;
use billion_client::session::interface::{ChatInfo, Messenger, PeerRef, Profile, WebViewRequest};
use billion_client::transport::proxy::ProxyDescriptor;
use billion_client::utils::timing::Sleeper;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USER_JSON: &str = r#"{"id":777,"first_name":"Ann","username":"ann"}"#;

/// Init data the service should receive for `USER_JSON`.
pub fn expected_init_data() -> String {
    format!(
        "user={}&chat_instance=-42&chat_type=sender&start_param=ref-test&auth_date=1700000000&hash=cafe",
        urlencoding::encode(USER_JSON)
    )
}

pub fn web_view_url() -> String {
    let inner = format!(
        "user={}&chat_instance=-42&chat_type=sender&start_param=ref-test&auth_date=1700000000&hash=cafe",
        urlencoding::encode(USER_JSON)
    );
    format!(
        "https://b-game.billion.tg/#tgWebAppData={}&tgWebAppVersion=7.10&tgWebAppPlatform=android",
        urlencoding::encode(&inner)
    )
}

pub fn test_config(server_url: &str) -> Arc<Config> {
    Arc::new(Config {
        api: ApiConfig {
            base_url: server_url.to_string(),
            proxy_check_url: format!("{server_url}/ip"),
            proxy_check_timeout: 5,
        },
        bot: BotConfig {
            ref_id: "ref-test".to_string(),
            fallback_ref_id: FALLBACK_REF_ID.to_string(),
            ref_id_weight: 100,
            use_random_delay_in_run: false,
            random_delay_in_run: DelayRange::new(0, 0),
            fake_user_agent: false,
            sleep_time: DelayRange::new(10, 10),
        },
    })
}

/// Returns immediately and remembers what it was asked to wait.
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded_secs(&self) -> Vec<u64> {
        self.calls.lock().unwrap().iter().map(Duration::as_secs).collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

/// Scripted messenger that records every call it receives.
#[derive(Clone)]
pub struct FakeMessenger {
    pub connect_error: Option<MessengerError>,
    pub flood_waits: VecDeque<u64>,
    pub member: bool,
    pub connected: bool,
    /// What `request_app_web_view` hands back.
    pub redirect_url: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub first_name: Arc<Mutex<String>>,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self {
            connect_error: None,
            flood_waits: VecDeque::new(),
            member: false,
            connected: false,
            redirect_url: web_view_url(),
            calls: Arc::new(Mutex::new(Vec::new())),
            first_name: Arc::new(Mutex::new("Ann".to_string())),
        }
    }

    pub fn deactivated() -> Self {
        Self {
            connect_error: Some(MessengerError::UserDeactivated),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn name(&self) -> String {
        self.first_name.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    fn set_proxy(&mut self, _proxy: Option<ProxyDescriptor>) {
        self.record("set_proxy");
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), MessengerError> {
        self.record("connect");
        if let Some(e) = &self.connect_error {
            return Err(e.clone());
        }
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), MessengerError> {
        self.record("disconnect");
        self.connected = false;
        Ok(())
    }

    async fn resolve_peer(&mut self, alias: &str) -> Result<PeerRef, MessengerError> {
        self.record(format!("resolve_peer:{alias}"));
        match self.flood_waits.pop_front() {
            Some(wait) => Err(MessengerError::FloodWait(wait)),
            None => Ok(PeerRef { id: 1, access_hash: 2 }),
        }
    }

    async fn request_app_web_view(
        &mut self,
        request: WebViewRequest,
    ) -> Result<String, MessengerError> {
        self.record(format!("request_app_web_view:{}", request.start_param));
        Ok(self.redirect_url.clone())
    }

    async fn get_me(&mut self) -> Result<Profile, MessengerError> {
        self.record("get_me");
        Ok(Profile {
            id: 777,
            first_name: self.name(),
        })
    }

    async fn update_profile(&mut self, first_name: &str) -> Result<(), MessengerError> {
        self.record(format!("update_profile:{first_name}"));
        *self.first_name.lock().unwrap() = first_name.to_string();
        Ok(())
    }

    async fn get_chat(&mut self, chat: &str) -> Result<ChatInfo, MessengerError> {
        self.record(format!("get_chat:{chat}"));
        Ok(ChatInfo {
            id: -100,
            username: Some(chat.to_string()),
        })
    }

    async fn get_chat_member(&mut self, chat: &str, user: &str) -> Result<(), MessengerError> {
        self.record(format!("get_chat_member:{chat}:{user}"));
        if self.member {
            Ok(())
        } else {
            Err(MessengerError::UserNotParticipant)
        }
    }

    async fn join_chat(&mut self, chat: &str) -> Result<ChatInfo, MessengerError> {
        self.record(format!("join_chat:{chat}"));
        Ok(ChatInfo {
            id: -100,
            username: Some(chat.to_string()),
        })
    }

    async fn mute_chat(&mut self, chat_id: i64, mute_until: i32) -> Result<(), MessengerError> {
        self.record(format!("mute_chat:{chat_id}:{mute_until}"));
        Ok(())
    }
}
