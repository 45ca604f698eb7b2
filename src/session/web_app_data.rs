use crate::error::AuthError;
use std::fmt;

const DATA_MARKER: &str = "tgWebAppData=";
const VERSION_MARKER: &str = "&tgWebAppVersion";
const FIELD_ORDER: [&str; 6] = [
    "user",
    "chat_instance",
    "chat_type",
    "start_param",
    "auth_date",
    "hash",
];

/// Signed web app launch data, valid for a single login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAppData {
    /// Decoded user JSON.
    pub user: String,
    pub chat_instance: String,
    pub chat_type: String,
    pub start_param: String,
    pub auth_date: String,
    pub hash: String,
}

impl WebAppData {
    /// Extracts the launch data out of the web view redirect URL.
    ///
    /// The `tgWebAppData` value is percent-encoded twice and its fields must
    /// come in the order `user`, `chat_instance`, `chat_type`, `start_param`,
    /// `auth_date`, `hash`. Fields after those six are ignored.
    pub fn from_redirect_url(url: &str) -> Result<Self, AuthError> {
        let raw = url
            .split(DATA_MARKER)
            .nth(1)
            .ok_or_else(|| malformed("redirect url has no tgWebAppData"))?;
        let raw = raw.split(VERSION_MARKER).next().unwrap_or(raw);

        let once = urlencoding::decode(raw).map_err(|e| malformed(&e.to_string()))?;
        let twice = urlencoding::decode(&once).map_err(|e| malformed(&e.to_string()))?;

        let mut parts = twice.split('&');
        let mut values: Vec<String> = Vec::with_capacity(FIELD_ORDER.len());
        for expected in FIELD_ORDER {
            let part = parts
                .next()
                .ok_or_else(|| malformed(&format!("missing field `{expected}`")))?;
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| malformed(&format!("field `{part}` has no value")))?;
            if key != expected {
                return Err(malformed(&format!("expected `{expected}`, found `{key}`")));
            }
            values.push(value.to_string());
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(WebAppData {
            user: next(),
            chat_instance: next(),
            chat_type: next(),
            start_param: next(),
            auth_date: next(),
            hash: next(),
        })
    }

    /// The string sent in the `Tg-Auth` header. Only `user` is re-encoded.
    pub fn to_init_data(&self) -> String {
        format!(
            "user={}&chat_instance={}&chat_type={}&start_param={}&auth_date={}&hash={}",
            quote(&self.user),
            self.chat_instance,
            self.chat_type,
            self.start_param,
            self.auth_date,
            self.hash
        )
    }
}

impl fmt::Display for WebAppData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_init_data())
    }
}

/// Percent-encodes everything but unreserved characters and `/`.
fn quote(value: &str) -> String {
    urlencoding::encode(value).replace("%2F", "/")
}

fn malformed(msg: &str) -> AuthError {
    AuthError::MalformedWebAppData(msg.to_string())
}
