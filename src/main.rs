//! ipgeo - public IP and geolocation lookup
//!
//! This is the composition root that wires together all the components.

use ipgeo::adapters::outbound::{MaxMindGeoResolver, ReqwestIpProvider};
use ipgeo::application::ResolutionService;
use ipgeo::config::load_config;
use ipgeo::domain::ports::{GeoResolver, IpProvider};
use ipgeo::domain::services::ServiceRegistry;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging (stderr, so stdout only carries the result)
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    // ===== COMPOSITION ROOT =====

    let registry = Arc::new(ServiceRegistry::builtin());
    tracing::debug!("{} IP providers registered", registry.len());

    let ip_provider: Arc<dyn IpProvider> = Arc::new(ReqwestIpProvider::new(&cfg.attempt_options())?);
    if cfg.proxy_url.is_some() {
        tracing::info!("routing provider attempts through the configured proxy");
    }

    let geo_resolver: Arc<dyn GeoResolver> = match MaxMindGeoResolver::from_file(&cfg.geoip_path) {
        Ok(g) => {
            tracing::info!("GeoIP DB {} loaded from {}", g.database_type(), cfg.geoip_path);
            Arc::new(g)
        }
        Err(e) => {
            tracing::error!("failed to load GeoIP DB from {}: {:?}", cfg.geoip_path, e);
            return Err(e);
        }
    };

    let service = ResolutionService::new(registry, ip_provider, geo_resolver)
        .with_attempt_timeout(cfg.attempt_timeout())
        .with_retry(cfg.retry_policy());

    match service.resolve().await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("IP lookup failed: {}", e);
            Err(e.into())
        }
    }
}
