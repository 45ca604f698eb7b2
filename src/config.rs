use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_PROXY_CHECK_TIMEOUT, DEFAULT_PROXY_CHECK_URL,
    DEFAULT_REF_ID_WEIGHT, FALLBACK_REF_ID,
};
use anyhow::Context;
use rand::Rng;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

/// Inclusive range of seconds, written as `min,max` (brackets allowed).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Uniform pick in the range; bounds given in either order are accepted.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min.min(self.max)..=self.min.max(self.max))
    }
}

impl FromStr for DelayRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        let (min, max) = trimmed
            .split_once(',')
            .with_context(|| format!("expected `min,max`, got `{s}`"))?;
        let min = min.trim().parse::<u64>().context("invalid range minimum")?;
        let max = max.trim().parse::<u64>().context("invalid range maximum")?;
        Ok(DelayRange::new(min, max))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub proxy_check_url: String,
    pub proxy_check_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub ref_id: String,
    pub fallback_ref_id: String,
    /// Weight of `ref_id` out of 100; the fallback gets the rest.
    pub ref_id_weight: u32,
    pub use_random_delay_in_run: bool,
    pub random_delay_in_run: DelayRange,
    pub fake_user_agent: bool,
    pub sleep_time: DelayRange,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub bot: BotConfig,
}

impl fmt::Display for DelayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.min, self.max)
    }
}

impl fmt::Display for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"proxy_check_url\":\"{}\",\"proxy_check_timeout\":{}}}",
            self.base_url, self.proxy_check_url, self.proxy_check_timeout
        )
    }
}

impl fmt::Display for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"ref_id\":\"[REDACTED]\",\"ref_id_weight\":{},\"use_random_delay_in_run\":{},\"random_delay_in_run\":{},\"fake_user_agent\":{},\"sleep_time\":{}}}",
            self.ref_id_weight,
            self.use_random_delay_in_run,
            self.random_delay_in_run,
            self.fake_user_agent,
            self.sleep_time
        )
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"api\":{},\"bot\":{}}}", self.api, self.bot)
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            api: ApiConfig {
                base_url: get_env_or_default("BILLION_API_URL", String::from(DEFAULT_BASE_URL)),
                proxy_check_url: get_env_or_default(
                    "PROXY_CHECK_URL",
                    String::from(DEFAULT_PROXY_CHECK_URL),
                ),
                proxy_check_timeout: get_env_or_default(
                    "PROXY_CHECK_TIMEOUT",
                    DEFAULT_PROXY_CHECK_TIMEOUT,
                ),
            },
            bot: BotConfig {
                ref_id: get_env_or_default("REF_ID", String::from(FALLBACK_REF_ID)),
                fallback_ref_id: get_env_or_default(
                    "FALLBACK_REF_ID",
                    String::from(FALLBACK_REF_ID),
                ),
                ref_id_weight: get_env_or_default("REF_ID_WEIGHT", DEFAULT_REF_ID_WEIGHT).min(100),
                use_random_delay_in_run: get_env_or_default("USE_RANDOM_DELAY_IN_RUN", true),
                random_delay_in_run: get_env_or_default(
                    "RANDOM_DELAY_IN_RUN",
                    DelayRange::new(5, 30),
                ),
                fake_user_agent: get_env_or_default("FAKE_USERAGENT", true),
                sleep_time: get_env_or_default("SLEEP_TIME", DelayRange::new(3600, 7200)),
            },
        }
    }
}
