use std::sync::Arc;

use crate::clients::catalog_client::CatalogClient;
use crate::clients::proxy_client::ProxyClient;
use crate::config::app_config::AppConfig;
use crate::view_registry::ViewRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<CatalogClient>,
    pub proxy_client: Arc<ProxyClient>,
    pub views: Arc<ViewRegistry>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        let views = ViewRegistry::new(
            std::time::Duration::from_secs(config.view_idle_secs),
            config.max_views,
            config.request_timeout(),
        );

        Ok(Self {
            catalog: Arc::new(CatalogClient::new(client.clone(), config.api_url.clone())),
            proxy_client: Arc::new(ProxyClient::new(client, config.api_url.clone())),
            views: Arc::new(views),
            config,
        })
    }
}
