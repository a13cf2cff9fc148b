//! Gmail API v1 transport: message search and full-payload fetch.

use crate::error::ApiError;
use crate::retrieve::{Mailbox, SearchPage};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMessagesResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

/// A fetched message: identifier, internal timestamp (milliseconds since
/// epoch, as the service reports it), and the MIME part tree carrying the
/// transport-encoded content.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    pub id: String,
    #[serde(default)]
    pub internal_date: Option<String>,
    #[serde(default)]
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartBody {
    #[serde(default)]
    pub data: Option<String>,
}

/// Blocking HTTP client for one mailbox account, authenticated with an
/// OAuth bearer token supplied by the caller.
pub struct GmailClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl GmailClient {
    pub fn new(access_token: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(GmailClient {
            client,
            access_token,
            base_url: API_BASE.to_string(),
        })
    }

    fn get<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<T, ApiError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(params)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json()?)
    }
}

impl Mailbox for GmailClient {
    fn search(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ApiError> {
        let url = format!("{}/users/me/messages", self.base_url);
        let page_size = page_size.to_string();
        let mut params = vec![
            ("q", query),
            ("maxResults", page_size.as_str()),
            ("includeSpamTrash", "false"),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let list: ListMessagesResponse = self.get(&url, &params)?;
        Ok(SearchPage {
            ids: list.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: list.next_page_token,
        })
    }

    fn fetch(&self, message_id: &str) -> Result<RawMessage, ApiError> {
        let url = format!("{}/users/me/messages/{}", self.base_url, message_id);
        self.get(&url, &[("format", "full")])
    }
}
