//! # Gateway Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the in-memory key cache and its expiry sweeper
//! - Create the processor and gateway service
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_hex::{GatewayService, TraceRegistry, TransactionProcessor, inbound::HttpServer};
use gateway_store::{ExpirySweeper, KeyStore, MemoryCache};

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("payment-gateway"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gateway_app=debug,gateway_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting payment gateway on port {}", config.port);
    tracing::info!(
        ttl_secs = config.key_ttl.as_secs(),
        compression = config.key_compression,
        "Key store: {}{}<id>",
        config.key_instance_name,
        config.key_prefix
    );

    // Key cache plus background eviction of abandoned keys
    let cache = Arc::new(MemoryCache::new());
    tokio::spawn(ExpirySweeper::new(cache.clone(), config.sweep_interval).run());

    let keys = KeyStore::new(cache, config.key_store_options());
    let traces = Arc::new(TraceRegistry::new(config.trace_capacity));
    let processor = TransactionProcessor::new(config.processing_policy(), traces);

    // Create and run the HTTP server
    let server = HttpServer::new(GatewayService::new(keys, processor));
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    let _ = otel_provider.shutdown();
    Ok(())
}
