// 🔌 Connection Bootstrap
//
// secrets -> validated credentials -> endpoint url -> collection client -> probe
//
// Fails closed: the first error ends the bootstrap, and the outcome (good or
// bad) is cached so a second initialize is a no-op.

use reqwest::Url;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Secrets;
use crate::error::BootstrapError;
use crate::remote::HttpCollection;
use crate::store::{ExpenseCollection, EXPENSES_COLLECTION};

/// Everything a view needs: the shared handle to the expenses collection
#[derive(Clone)]
pub struct StoreContext {
    collection: Arc<dyn ExpenseCollection>,
    endpoint: String,
}

impl StoreContext {
    pub fn new(collection: Arc<dyn ExpenseCollection>, endpoint: impl Into<String>) -> Self {
        Self {
            collection,
            endpoint: endpoint.into(),
        }
    }

    pub fn collection(&self) -> &dyn ExpenseCollection {
        self.collection.as_ref()
    }

    /// Where the collection lives, for display
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Validate the endpoint: http(s) with a host
pub fn parse_endpoint(raw: &str) -> Result<Url, BootstrapError> {
    let invalid = |reason: String| BootstrapError::InvalidEndpoint {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

/// Open and verify the remote `expenses` collection
pub fn connect(secrets: &Secrets) -> Result<StoreContext, BootstrapError> {
    secrets.credentials.validate()?;
    let endpoint = parse_endpoint(&secrets.endpoint_url)?;

    let collection = HttpCollection::new(
        &endpoint,
        EXPENSES_COLLECTION,
        secrets.credentials.fingerprint(),
    )?;
    collection.probe()?;

    info!(
        endpoint = %endpoint,
        project = %secrets.credentials.project_id,
        "connected to expense store"
    );
    Ok(StoreContext::new(Arc::new(collection), endpoint.as_str()))
}

fn attempt<F>(connect: F) -> Result<StoreContext, BootstrapError>
where
    F: FnOnce() -> Result<StoreContext, BootstrapError>,
{
    let result = connect();
    if let Err(e) = &result {
        error!(error = %e, "bootstrap failed, session disabled");
    }
    result
}

/// Holds the single bootstrap outcome for the process
#[derive(Default)]
pub struct Bootstrap {
    outcome: Option<Result<StoreContext, BootstrapError>>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `connect` the first time only; later calls return the cached outcome
    pub fn initialize<F>(&mut self, connect: F) -> Result<&StoreContext, &BootstrapError>
    where
        F: FnOnce() -> Result<StoreContext, BootstrapError>,
    {
        self.outcome.get_or_insert_with(|| attempt(connect)).as_ref()
    }
}
