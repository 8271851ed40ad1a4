use crate::i18n::Locale;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Default endpoint of the MyMemory translation API
pub const MYMEMORY_API_URL: &str = "https://api.mymemory.translated.net/get";

/// Ways a single translation call can fail. None of them is retried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to send translation request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Translation API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Translation rejected by provider (status {status}): {details}")]
    Rejected { status: String, details: String },

    #[error("Failed to parse translation response: {0}")]
    Decode(String),
}

/// Something that can translate a text into a target locale.
///
/// The label pipeline only depends on this trait; production code uses
/// `MyMemoryTranslator`, tests use deterministic substitutes.
#[allow(async_fn_in_trait)]
pub trait Translator {
    async fn translate(&self, text: &str, target: Locale) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: Option<ResponseData>,
    #[serde(default)]
    response_status: Value,
    #[serde(default)]
    response_details: Value,
    #[serde(default)]
    quota_finished: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// `responseStatus` arrives either as a number or as a numeric string
fn status_code(status: &Value) -> Option<u64> {
    match status {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn details_text(details: &Value) -> String {
    match details {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Translator backed by the MyMemory HTTP API.
#[derive(Debug, Clone)]
pub struct MyMemoryTranslator {
    client: reqwest::Client,
    api_url: String,
    source: Locale,
    email: Option<String>,
}

impl MyMemoryTranslator {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, source: Locale) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            source,
            email: None,
        }
    }

    /// Contact address sent as `de`, which raises MyMemory's daily quota.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}

impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, target: Locale) -> Result<String, ProviderError> {
        // MyMemory rejects an empty `q` with responseStatus 403
        if text.is_empty() {
            return Ok(String::new());
        }

        let langpair = format!("{}|{}", self.source.code(), target.code());
        let mut request = self
            .client
            .get(&self.api_url)
            .query(&[("q", text), ("langpair", langpair.as_str())]);
        if let Some(email) = &self.email {
            request = request.query(&[("de", email.as_str())]);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::Status { status, body });
        }

        let body = response.text().await?;
        let parsed: MyMemoryResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        let status = status_code(&parsed.response_status).unwrap_or(200);
        if status != 200 {
            return Err(ProviderError::Rejected {
                status: status.to_string(),
                details: details_text(&parsed.response_details),
            });
        }
        if parsed.quota_finished == Some(true) {
            return Err(ProviderError::Rejected {
                status: status.to_string(),
                details: "daily quota exhausted".to_string(),
            });
        }

        let translated = parsed
            .response_data
            .and_then(|data| data.translated_text)
            .ok_or_else(|| {
                ProviderError::Decode("response contained no translatedText".to_string())
            })?;

        debug!("{} -> {}: {:?} => {:?}", self.source, target, text, translated);
        Ok(translated)
    }
}
