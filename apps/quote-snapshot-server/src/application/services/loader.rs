//! Startup snapshot loading.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::ports::{FetchRequest, ProviderError, QuoteProviderPort};
use crate::domain::quote::QuoteSnapshot;

/// Fetches the quote snapshot from a provider exactly once per call to
/// [`SnapshotLoader::load`]. The server calls it once, before binding.
pub struct SnapshotLoader<P: QuoteProviderPort> {
    provider: Arc<P>,
    request: FetchRequest,
}

impl<P: QuoteProviderPort> SnapshotLoader<P> {
    /// Create a loader for `request`.
    #[must_use]
    pub const fn new(provider: Arc<P>, request: FetchRequest) -> Self {
        Self { provider, request }
    }

    /// The request this loader issues.
    #[must_use]
    pub const fn request(&self) -> &FetchRequest {
        &self.request
    }

    /// Fetch and freeze the snapshot.
    ///
    /// Returns the snapshot together with how long the provider call took.
    pub async fn load(&self) -> Result<(Arc<QuoteSnapshot>, Duration), ProviderError> {
        let started = Instant::now();

        tracing::info!(
            symbols = %self.request.symbol_param(),
            interval = %self.request.interval,
            outputsize = self.request.outputsize,
            timezone = %self.request.timezone,
            "Fetching quote snapshot"
        );

        let records = self.provider.fetch_snapshot(&self.request).await?;
        let elapsed = started.elapsed();
        let snapshot = QuoteSnapshot::new(records);

        if snapshot.is_empty() {
            tracing::warn!("Provider returned an empty snapshot");
        }

        tracing::info!(
            records = snapshot.len(),
            symbols = snapshot.symbols().len(),
            elapsed_ms = elapsed.as_millis(),
            "Quote snapshot loaded"
        );

        Ok((Arc::new(snapshot), elapsed))
    }
}
