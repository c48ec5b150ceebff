pub mod catalog_client;
pub mod proxy_client;
