use std::process;
use std::sync::Arc;

use log::{debug, error, LevelFilter};

use crate::app_state::AppState;
use crate::config::app_config::AppConfig;

mod app_state;
mod clients;
mod config;
mod handlers;
mod models;
mod pagination;
mod render;
mod routes;
mod server;
mod view_registry;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = match AppConfig::new() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            error!("could not load configuration: {}", err);
            process::exit(1);
        }
    };
    debug!("configuration:\n{}", config.to_yaml());

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            error!("could not build http client: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = server::start(state).await {
        error!("server error: {}", err);
        process::exit(1);
    }
}
