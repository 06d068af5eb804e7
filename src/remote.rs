// Remote collection over the Realtime-Database style REST dialect
//
//   POST {endpoint}/{collection}.json               -> {"name": "<id>"}
//   GET  {endpoint}/{collection}.json               -> null | {"<id>": record, ...}
//   GET  {endpoint}/{collection}.json?shallow=true  -> null | {"<id>": true, ...}
//
// Every request carries `Authorization: Bearer <key fingerprint>`.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::entities::{Expense, RecordId};
use crate::error::StoreError;
use crate::store::ExpenseCollection;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Body of a successful POST
#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

pub struct HttpCollection {
    client: Client,
    url: Url,
    bearer: String,
}

impl HttpCollection {
    /// Build a client for `{endpoint}/{collection}.json`
    pub fn new(endpoint: &Url, collection: &str, bearer: String) -> Result<Self, StoreError> {
        let url = collection_url(endpoint, collection)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self { client, url, bearer })
    }

    fn auth_headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", self.bearer))
            .map_err(|e| StoreError::Transport(format!("invalid auth header: {e}")))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    fn get(&self, shallow: bool) -> Result<Response, StoreError> {
        let mut request = self.client.get(self.url.clone()).headers(self.auth_headers()?);
        if shallow {
            request = request.query(&[("shallow", "true")]);
        }
        let response = request
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        check_status(response)
    }
}

/// `{endpoint}/{collection}.json`, tolerating a trailing slash on the endpoint
pub fn collection_url(endpoint: &Url, collection: &str) -> Result<Url, StoreError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{base}/{collection}.json"))
        .map_err(|e| StoreError::Transport(format!("invalid collection url: {e}")))
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(StoreError::Unauthorized(status.as_u16()));
    }
    let body = response.text().unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Decode a collection body: `null` means empty
pub fn decode_collection(body: &str) -> Result<Vec<(RecordId, Expense)>, StoreError> {
    let documents: Option<BTreeMap<String, serde_json::Value>> = serde_json::from_str(body)
        .map_err(|e| StoreError::Malformed(format!("collection is not a JSON object: {e}")))?;

    documents
        .unwrap_or_default()
        .into_iter()
        .map(|(id, doc)| -> Result<_, StoreError> {
            let expense = serde_json::from_value::<Expense>(doc)
                .map_err(|e| StoreError::Malformed(format!("record {id}: {e}")))?;
            Ok((id, expense))
        })
        .collect()
}

impl ExpenseCollection for HttpCollection {
    #[instrument(name = "remote_append", skip_all, fields(url = %self.url))]
    fn append(&self, expense: &Expense) -> Result<RecordId, StoreError> {
        let response = self
            .client
            .post(self.url.clone())
            .headers(self.auth_headers()?)
            .json(expense)
            .send()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let pushed: PushResponse = check_status(response)?
            .json()
            .map_err(|e| StoreError::Malformed(format!("push response: {e}")))?;

        debug!(id = %pushed.name, "record appended");
        Ok(pushed.name)
    }

    #[instrument(name = "remote_fetch_all", skip_all, fields(url = %self.url))]
    fn fetch_all(&self) -> Result<Vec<(RecordId, Expense)>, StoreError> {
        let body = self
            .get(false)?
            .text()
            .map_err(|e| StoreError::Transport(format!("read body failed: {e}")))?;

        let records = decode_collection(&body)?;
        debug!(count = records.len(), "collection fetched");
        Ok(records)
    }

    #[instrument(name = "remote_probe", skip_all, fields(url = %self.url))]
    fn probe(&self) -> Result<(), StoreError> {
        let body = self
            .get(true)?
            .text()
            .map_err(|e| StoreError::Transport(format!("read body failed: {e}")))?;

        // Shallow listing must still be null or an object
        serde_json::from_str::<Option<serde_json::Map<String, serde_json::Value>>>(&body)
            .map_err(|e| StoreError::Malformed(format!("probe response: {e}")))?;
        Ok(())
    }
}
