//! SMS delivery through an Africa's Talking style messaging gateway.

use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::USER_AGENT;

use crate::config::Config;
use crate::notifier::Notifier;
use crate::notifier::error::NotifierError;

pub struct SmsNotifier {
    client: Client,
    base_url: String,
    username: String,
    api_key: String,
}

impl SmsNotifier {
    pub fn new(config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("safiri-guard/0.1"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to create client");

        Self {
            client,
            base_url: config.at_base_url.trim_end_matches('/').to_string(),
            username: config.at_username.clone(),
            api_key: config.at_api_key.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for SmsNotifier {
    async fn send(&self, phone_number: &str, message: &str) -> Result<(), NotifierError> {
        let resp = self
            .client
            .post(format!("{}/version1/messaging", self.base_url))
            .header("apiKey", &self.api_key)
            .form(&[
                ("username", self.username.as_str()),
                ("to", phone_number),
                ("message", message),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(NotifierError::GatewayError {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        debug!("SMS dispatched to {phone_number}");
        Ok(())
    }
}
