use crate::error::AppError;
use crate::transport::headers::SessionHeaders;
use crate::transport::proxy::ProxyDescriptor;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// One HTTP session against the game service. Dropping it closes its
/// connection pool and proxy tunnel.
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    base_url: String,
    headers: SessionHeaders,
    proxied: bool,
}

impl HttpSession {
    /// Creates a new session.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL every endpoint is appended to.
    /// * `proxy` - Optional proxy all traffic is tunnelled through.
    /// * `user_agent` - Overrides the default Android WebView user agent.
    pub fn new(
        base_url: &str,
        proxy: Option<&ProxyDescriptor>,
        user_agent: Option<String>,
    ) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(proxy) = proxy {
            builder = builder.proxy(proxy.to_reqwest()?);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: SessionHeaders::new(user_agent),
            proxied: proxy.is_some(),
        })
    }

    pub fn set_tg_auth(&mut self, init_data: &str) {
        self.headers.tg_auth = Some(init_data.to_string());
    }

    pub fn set_bearer(&mut self, token: &str) {
        self.headers.set_bearer(token);
    }

    pub fn has_bearer(&self) -> bool {
        self.headers.authorization.is_some()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.headers.user_agent.as_deref()
    }

    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned + Debug>(&self, endpoint: &str) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Sending GET request to {}", url);

        let request = self.client.get(&url);
        self.send(request).await
    }

    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned + Debug, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Sending POST request to {}", url);

        let request = self.client.post(&url).json(body);
        self.send(request).await
    }

    /// GET against an absolute URL outside the service, with its own timeout.
    #[instrument(skip(self))]
    pub async fn get_absolute<T: DeserializeOwned + Debug>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<T, AppError> {
        debug!("Sending GET request to {}", url);

        let request = self.client.get(url).timeout(timeout);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned + Debug>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, AppError> {
        let response = match request.headers(self.headers.to_header_map()?).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to send request: {:?}", e);
                return Err(AppError::Network(e));
            }
        };

        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned + Debug>(
        response: Response,
    ) -> Result<T, AppError> {
        let status = response.status();
        let body_text = response.text().await?;

        debug!("Response Status: {}", status);
        debug!("Response Body: {}", body_text);

        if status.is_success() {
            let body: T = serde_json::from_str(&body_text)?;
            Ok(body)
        } else {
            error!("API request failed. Status: {}, Body: {}", status, body_text);
            Err(AppError::Unexpected(status))
        }
    }
}

impl fmt::Display for HttpSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"proxied\":{},\"headers\":{}}}",
            self.base_url, self.proxied, self.headers
        )
    }
}
