use crate::errors::{Error, Result};
use crate::metrics::{CONNECT_ATTEMPTS_TOTAL, STORE_FAILURES_TOTAL};
use crate::store::{Connector, ReadingStore};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Lazily established, process-wide store connection.
///
/// The first caller performs the connect; concurrent callers wait for that
/// attempt instead of starting their own. A failed attempt leaves the manager
/// unconnected so the next request tries again.
pub struct ConnectionManager {
    uri: Option<String>,
    connector: Arc<dyn Connector>,
    store: OnceCell<Arc<dyn ReadingStore>>,
}

impl ConnectionManager {
    pub fn new(uri: Option<String>, connector: Arc<dyn Connector>) -> Self {
        Self {
            uri: uri.filter(|uri| !uri.trim().is_empty()),
            connector,
            store: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.initialized()
    }

    pub async fn ensure_connected(&self) -> Result<Arc<dyn ReadingStore>> {
        if let Some(store) = self.store.get() {
            return Ok(store.clone());
        }

        let uri = self.uri.as_deref().ok_or(Error::Configuration)?;

        let store = self
            .store
            .get_or_try_init(|| async {
                info!("Connecting to document store...");
                CONNECT_ATTEMPTS_TOTAL.inc();
                match self.connector.connect(uri).await {
                    Ok(store) => {
                        info!("Document store connection established");
                        Ok(store)
                    }
                    Err(e) => {
                        STORE_FAILURES_TOTAL.inc();
                        error!("Failed to connect to document store: {}", e);
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(store.clone())
    }
}
