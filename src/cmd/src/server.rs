use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::config::Config;
use common::DATA_PATH_METADATA;
use metadata::MetadataProvider;
use platform::http::attach_routes;
use platform::PlatformProvider;
use tokio::select;
use tokio::signal::unix::SignalKind;
use tracing::debug;
use tracing::info;

use crate::error::Result;

pub async fn start(cfg: Config) -> Result<()> {
    debug!("db path: {:?}", cfg.data.path);

    fs::create_dir_all(&cfg.data.path)?;
    let rocks = Arc::new(metadata::rocksdb::new(cfg.data.path.join(DATA_PATH_METADATA))?);
    let md = Arc::new(MetadataProvider::try_new(rocks)?);
    let platform_provider = Arc::new(PlatformProvider::new(&md));

    info!("attaching platform routes...");
    let router = attach_routes(Router::new(), &platform_provider);

    let signal = async {
        let mut sig_int =
            tokio::signal::unix::signal(SignalKind::interrupt()).expect("failed to install signal");
        let mut sig_term =
            tokio::signal::unix::signal(SignalKind::terminate()).expect("failed to install signal");
        select! {
            _=sig_int.recv()=>info!("SIGINT received"),
            _=sig_term.recv()=>info!("SIGTERM received"),
        }
    };

    info!("listening on http://{}", cfg.server.host);
    let listener = tokio::net::TcpListener::bind(cfg.server.host).await?;
    Ok(axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(signal)
    .await?)
}
