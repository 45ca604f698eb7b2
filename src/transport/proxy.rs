use crate::error::AppError;
use anyhow::{bail, Context};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScheme {
    Http,
    Https,
    Socks4,
    Socks5,
}

impl ProxyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyScheme::Http => "http",
            ProxyScheme::Https => "https",
            ProxyScheme::Socks4 => "socks4",
            ProxyScheme::Socks5 => "socks5",
        }
    }
}

impl FromStr for ProxyScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(ProxyScheme::Http),
            "https" => Ok(ProxyScheme::Https),
            "socks4" => Ok(ProxyScheme::Socks4),
            "socks5" | "socks5h" => Ok(ProxyScheme::Socks5),
            other => bail!("unsupported proxy scheme `{other}`"),
        }
    }
}

/// A proxy written as `scheme://[login:password@]host:port`.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyDescriptor {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
    pub login: Option<String>,
    pub password: Option<String>,
}

impl ProxyDescriptor {
    /// Full URL including credentials, for the HTTP client.
    pub fn to_url(&self) -> String {
        match (&self.login, &self.password) {
            (Some(login), Some(password)) => format!(
                "{}://{}:{}@{}:{}",
                self.scheme.as_str(),
                urlencoding::encode(login),
                urlencoding::encode(password),
                self.host,
                self.port
            ),
            (Some(login), None) => format!(
                "{}://{}@{}:{}",
                self.scheme.as_str(),
                urlencoding::encode(login),
                self.host,
                self.port
            ),
            _ => format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port),
        }
    }

    pub fn to_reqwest(&self) -> Result<reqwest::Proxy, AppError> {
        reqwest::Proxy::all(self.to_url()).map_err(|e| AppError::Proxy(e.to_string()))
    }
}

impl FromStr for ProxyDescriptor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (scheme, rest) = s
            .split_once("://")
            .with_context(|| format!("proxy `{s}` is missing a scheme"))?;
        let scheme = scheme.parse::<ProxyScheme>()?;

        let (credentials, address) = match rest.rsplit_once('@') {
            Some((credentials, address)) => (Some(credentials), address),
            None => (None, rest),
        };
        let address = address.trim_end_matches('/');
        let (host, port) = address
            .rsplit_once(':')
            .with_context(|| format!("proxy `{address}` is missing a port"))?;
        if host.is_empty() {
            bail!("proxy host is empty");
        }
        let port = port.parse::<u16>().context("invalid proxy port")?;

        let (login, password) = match credentials {
            Some(credentials) => match credentials.split_once(':') {
                Some((login, password)) => (Some(login.to_string()), Some(password.to_string())),
                None => (Some(credentials.to_string()), None),
            },
            None => (None, None),
        };

        Ok(ProxyDescriptor {
            scheme,
            host: host.to_string(),
            port,
            login,
            password,
        })
    }
}

impl fmt::Display for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.login {
            Some(login) => write!(
                f,
                "{}://{}:[REDACTED]@{}:{}",
                self.scheme.as_str(),
                login,
                self.host,
                self.port
            ),
            None => write!(f, "{}://{}:{}", self.scheme.as_str(), self.host, self.port),
        }
    }
}

impl fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProxyDescriptor({self})")
    }
}
