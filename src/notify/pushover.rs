use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::NotifyError;
use crate::notify::Notifier;

pub const DEFAULT_API_URL: &str = "https://api.pushover.net/1/messages.json";

#[derive(Debug, Serialize)]
struct Message<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    title: &'a str,
}

#[derive(Debug, Clone)]
pub struct PushoverNotifier {
    http: reqwest::Client,
    api_url: Url,
    api_token: String,
    user_key: String,
}

impl PushoverNotifier {
    pub fn new(api_url: Url, api_token: String, user_key: String) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(http, api_url, api_token, user_key))
    }

    fn with_http(http: reqwest::Client, api_url: Url, api_token: String, user_key: String) -> Self {
        PushoverNotifier {
            http,
            api_url,
            api_token,
            user_key,
        }
    }

    fn message<'a>(&'a self, message: &'a str, title: &'a str) -> Message<'a> {
        Message {
            token: &self.api_token,
            user: &self.user_key,
            message,
            title,
        }
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn send(&self, message: &str, title: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(self.api_url.clone())
            .form(&self.message(message, title))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "pushover accepted message");
        Ok(())
    }
}
