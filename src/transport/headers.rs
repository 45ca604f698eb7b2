/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 8/9/24
 ******************************************************************************/

use crate::constants::TG_AUTH_HEADER_KEY;
use crate::error::AppError;
use rand::seq::SliceRandom;
use rand::Rng;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::fmt::Display;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 13; SM-S901B Build/TP1A.220624.014; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/125.0.6422.165 Mobile Safari/537.36";

const ANDROID_DEVICES: &[(&str, &str)] = &[
    ("10", "SM-G973F"),
    ("11", "Pixel 4a"),
    ("11", "SM-A515F"),
    ("12", "Pixel 6"),
    ("12", "M2101K6G"),
    ("13", "SM-S901B"),
    ("13", "Pixel 7 Pro"),
    ("14", "SM-S918B"),
    ("14", "Pixel 8"),
];

/// Generates an Android WebView Chrome user agent with a random device and
/// Chrome build.
pub fn random_android_chrome_user_agent<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (android, device) = ANDROID_DEVICES
        .choose(rng)
        .copied()
        .unwrap_or(("13", "SM-S901B"));
    let major = rng.gen_range(110..=130);
    let build = rng.gen_range(5000..=6999);
    let patch = rng.gen_range(40..=220);
    format!(
        "Mozilla/5.0 (Linux; Android {android}; {device}; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/{major}.0.{build}.{patch} Mobile Safari/537.36"
    )
}

/// Per-session headers on top of the fixed browser-like defaults.
#[derive(Debug, Default, Clone)]
pub(crate) struct SessionHeaders {
    pub(crate) user_agent: Option<String>,
    pub(crate) tg_auth: Option<String>,
    pub(crate) authorization: Option<String>,
}

impl SessionHeaders {
    pub(crate) fn new(user_agent: Option<String>) -> Self {
        Self {
            user_agent,
            tg_auth: None,
            authorization: None,
        }
    }

    pub(crate) fn set_bearer(&mut self, token: &str) {
        self.authorization = Some(format!("Bearer {token}"));
    }

    /// Builds the header map sent with every request.
    ///
    /// Always present: `Accept`, `Accept-Language`, `Content-Type`,
    /// `User-Agent`. `Tg-Auth` and `Authorization` are added once known.
    ///
    /// # Errors
    ///
    /// `AppError::InvalidHeader` when a value contains characters that are not
    /// allowed in an HTTP header.
    pub(crate) fn to_header_map(&self) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header_value(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))?,
        );
        if let Some(tg_auth) = &self.tg_auth {
            headers.insert(HeaderName::from_static("tg-auth"), header_value(tg_auth)?);
        }
        if let Some(authorization) = &self.authorization {
            headers.insert(header::AUTHORIZATION, header_value(authorization)?);
        }
        debug!("Session headers: {}", self);
        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value).map_err(|_| AppError::InvalidHeader(value.to_string()))
}

impl Display for SessionHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"user_agent\":\"{}\",\"{}\":{},\"authorization\":{}}}",
            self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT),
            TG_AUTH_HEADER_KEY,
            self.tg_auth.as_ref().map_or("null", |_| "\"[REDACTED]\""),
            self.authorization.as_ref().map_or("null", |_| "\"[REDACTED]\""),
        )
    }
}
