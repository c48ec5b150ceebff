use std::net::SocketAddr;

use log::{info, warn};

use crate::app_state::AppState;
use crate::routes::router;

pub async fn start(state: AppState) -> Result<(), hyper::Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let server = axum::Server::try_bind(&addr)?
        .serve(router(state).into_make_service());

    info!("listening on http://{}", server.local_addr());

    server
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("could not listen for shutdown signal: {}", err);
                futures::future::pending::<()>().await;
            }
            info!("shutting down");
        })
        .await
}
