/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 7/9/24
******************************************************************************/

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.billion.tg/api/v1";
pub(crate) const DEFAULT_PROXY_CHECK_URL: &str = "https://httpbin.org/ip";
pub(crate) const DEFAULT_PROXY_CHECK_TIMEOUT: u64 = 5;

pub(crate) const TG_AUTH_HEADER_KEY: &str = "Tg-Auth";

pub(crate) const LOGIN_ENDPOINT: &str = "/auth/login";
pub(crate) const ME_ENDPOINT: &str = "/users/me";
pub(crate) const TASKS_ENDPOINT: &str = "/tasks";

/// Bot whose web app issues the init data.
pub const BOT_ALIAS: &str = "b_usersbot";
pub const APP_SHORT_NAME: &str = "join";
pub const WEB_VIEW_PLATFORM: &str = "android";

pub const FALLBACK_REF_ID: &str = "ref-boKr22ZTh5QatNJHMzqHhx";
pub(crate) const DEFAULT_REF_ID_WEIGHT: u32 = 75;

/// Added on top of every flood wait the messenger asks for.
pub const FLOOD_WAIT_BUFFER_SECONDS: u64 = 3;
pub const LOGIN_COOLDOWN_SECONDS: u64 = 300;
pub const ERROR_COOLDOWN_SECONDS: u64 = 3;
pub const TASK_DELAY_SECONDS: u64 = 5;
pub const RENAME_SETTLE_SECONDS: u64 = 5;
pub const JOIN_DELAY_SECONDS: u64 = 3;

pub const GEM_MARKER: &str = "💎";
pub const TG_LINK_PREFIX: &str = "https://t.me/";
pub const TG_PRIVATE_INVITE_PREFIX: &str = "https://t.me/+";
pub const MUTE_FOREVER: i32 = i32::MAX;
