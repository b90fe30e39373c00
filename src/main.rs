//! Marketplace proxy server.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
// self
use marketplace_proxy::{
	config::ProxyConfig,
	http::{HttpTransport, ReqwestHttpClient},
	marketplace::MarketplaceClient,
	server::{self, AppState},
	token::TokenProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	dotenv::dotenv().ok();
	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer())
		.init();

	let config = ProxyConfig::from_env()?;
	let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestHttpClient::new()?);
	let tokens =
		TokenProvider::new(config.credentials.clone(), config.token_endpoint()?, transport.clone());
	let marketplace = MarketplaceClient::new(
		tokens,
		transport,
		config.api_base.clone(),
		config.marketplace_id.clone(),
	);
	let app = server::router(AppState::new(marketplace));
	let listener = TcpListener::bind(config.listen_addr).await?;

	tracing::info!(addr = %config.listen_addr, marketplace = %config.marketplace_id, "marketplace proxy listening");

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for the shutdown signal");
	}
}
