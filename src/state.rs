use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::jikan::JikanClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CatalogService, DisabledMetadataProvider, DocumentCatalogService, ImageService,
    JikanMetadataProvider, MetadataProvider,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused by the metadata client and the poster cache so they share one
/// connection pool.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("Tsundoku/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub catalog_service: Arc<dyn CatalogService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.metadata.request_timeout_seconds)?;

        let metadata: Arc<dyn MetadataProvider> = if config.metadata.enabled {
            let jikan = Arc::new(JikanClient::with_shared_client(
                http_client.clone(),
                &config.metadata.base_url,
            ));
            Arc::new(JikanMetadataProvider::new(jikan))
        } else {
            tracing::info!("Metadata lookups disabled");
            Arc::new(DisabledMetadataProvider)
        };

        Self::init(config, http_client, metadata).await
    }

    /// Builds the state around a caller-supplied metadata provider.
    pub async fn with_metadata_provider(
        config: Config,
        metadata: Arc<dyn MetadataProvider>,
    ) -> anyhow::Result<Self> {
        let http_client = build_shared_http_client(config.metadata.request_timeout_seconds)?;
        Self::init(config, http_client, metadata).await
    }

    async fn init(
        config: Config,
        http_client: reqwest::Client,
        metadata: Arc<dyn MetadataProvider>,
    ) -> anyhow::Result<Self> {
        let store = Store::open(&config.general.data_path).await?;
        let image_service = Arc::new(ImageService::new(
            &config.general.posters_path,
            http_client,
        ));

        let config = Arc::new(RwLock::new(config));

        let catalog_service: Arc<dyn CatalogService> = Arc::new(DocumentCatalogService::new(
            store,
            metadata,
            image_service,
            config.clone(),
        ));

        Ok(Self {
            config,
            catalog_service,
        })
    }
}
