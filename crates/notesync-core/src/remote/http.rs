//! REST client for a hosted notes collection.
//!
//! Change notifications are derived by polling the collection and diffing
//! consecutive snapshots by note id; no push transport is involved.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::{ChangeEvent, NoteCollection, RemoteError, RemoteResult, Subscription};
use crate::config::ClientConfig;
use crate::models::{Note, NoteDraft, NoteId};
use crate::util::{error_snippet, has_http_scheme, non_blank};

const HTTP_TIMEOUT_SECS: u64 = 10;
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct HttpNoteCollection {
    client: Client,
    collection_url: String,
    app_id: String,
    access_token: Option<String>,
    poll_interval: Duration,
}

impl std::fmt::Debug for HttpNoteCollection {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HttpNoteCollection")
            .field("collection_url", &self.collection_url)
            .field("app_id", &self.app_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl HttpNoteCollection {
    pub fn new(
        api_url: &str,
        collection: &str,
        app_id: impl Into<String>,
    ) -> RemoteResult<Self> {
        let collection_url = collection_url(api_url, collection)?;
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()?,
            collection_url,
            app_id: app_id.into(),
            access_token: None,
            poll_interval: Duration::from_secs(2),
        })
    }

    pub fn from_config(config: &ClientConfig) -> RemoteResult<Self> {
        Ok(Self::new(&config.api_url, &config.collection, config.app_id.clone())?
            .with_access_token(config.access_token.clone())
            .with_poll_interval(config.poll_interval()))
    }

    #[must_use]
    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.access_token = non_blank(token);
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/json")
            .header("X-App-Id", &self.app_id);
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = self.authorize(request).send().await?;
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn snapshot(&self) -> RemoteResult<Vec<Note>> {
        let response = self.send(self.client.get(&self.collection_url)).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|error| {
            RemoteError::InvalidPayload(format!("note list could not be parsed: {error}"))
        })
    }
}

impl NoteCollection for HttpNoteCollection {
    async fn fetch_all(&self) -> RemoteResult<Vec<Note>> {
        self.snapshot().await
    }

    async fn insert(&self, draft: &NoteDraft) -> RemoteResult<NoteId> {
        let response = self
            .send(self.client.post(&self.collection_url).json(draft))
            .await?;
        let body = response.text().await?;
        parse_insert_response(&body)
    }

    async fn delete(&self, id: &NoteId) -> RemoteResult<()> {
        let url = format!(
            "{}/{}",
            self.collection_url,
            urlencoding::encode(id.as_str())
        );
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn subscribe(&self) -> RemoteResult<Subscription> {
        let mut previous = self.snapshot().await?;
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poller.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }

                match poller.snapshot().await {
                    Ok(current) => {
                        for event in diff_snapshots(&previous, &current) {
                            if tx.send(event).is_err() {
                                return;
                            }
                        }
                        previous = current;
                    }
                    Err(error) => {
                        tracing::warn!("Polling {} failed: {}", poller.collection_url, error);
                    }
                }
            }
        });

        tracing::debug!(
            "Polling {} every {:?}",
            self.collection_url,
            self.poll_interval
        );
        Ok(Subscription::with_task(rx, task))
    }
}

/// Derive change events between two snapshots of the collection.
///
/// Deletions come first, then insertions in the order of `current`.
pub fn diff_snapshots(previous: &[Note], current: &[Note]) -> Vec<ChangeEvent> {
    let previous_ids = previous
        .iter()
        .map(|note| &note.id)
        .collect::<HashSet<_>>();
    let current_ids = current.iter().map(|note| &note.id).collect::<HashSet<_>>();

    let deleted = previous
        .iter()
        .filter(|note| !current_ids.contains(&note.id))
        .cloned()
        .map(ChangeEvent::deleted);
    let inserted = current
        .iter()
        .filter(|note| !previous_ids.contains(&note.id))
        .cloned()
        .map(ChangeEvent::inserted);

    deleted.chain(inserted).collect()
}

fn collection_url(api_url: &str, collection: &str) -> RemoteResult<String> {
    let api_url = api_url.trim().trim_end_matches('/');
    if api_url.is_empty() {
        return Err(RemoteError::InvalidConfiguration(
            "API URL must not be empty".to_string(),
        ));
    }
    if !has_http_scheme(api_url) {
        return Err(RemoteError::InvalidConfiguration(
            "API URL must include http:// or https://".to_string(),
        ));
    }

    let collection = collection.trim().trim_matches('/');
    if collection.is_empty() {
        return Err(RemoteError::InvalidConfiguration(
            "collection name must not be empty".to_string(),
        ));
    }

    Ok(format!(
        "{api_url}/collections/{}",
        urlencoding::encode(collection)
    ))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InsertResponse {
    Object { id: String },
    Bare(String),
}

fn parse_insert_response(body: &str) -> RemoteResult<NoteId> {
    let response = serde_json::from_str::<InsertResponse>(body).map_err(|_| {
        RemoteError::InvalidPayload(format!(
            "insert response did not include an id: {}",
            error_snippet(body)
        ))
    })?;

    let id = match response {
        InsertResponse::Object { id } | InsertResponse::Bare(id) => id,
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(RemoteError::InvalidPayload(
            "insert response contained an empty id".to_string(),
        ));
    }
    Ok(NoteId::new(id))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(body: &str) -> Option<String> {
    let payload = serde_json::from_str::<ApiErrorBody>(body).ok()?;
    payload
        .message
        .or(payload.error)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
}

fn error_for_status(status: StatusCode, body: &str) -> RemoteError {
    let message = parse_api_error(body).unwrap_or_else(|| {
        let trimmed = error_snippet(body);
        if trimmed.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            trimmed
        }
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized(message),
        _ => RemoteError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
