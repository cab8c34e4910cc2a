use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusBuilder;
use processing::{
    clock::{SystemClock, TimestampIdGenerator},
    executable_utils::{initialize_executable, open_store, run_backend},
    processor::FraudShield,
    scorers::RiskClassifier,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("Starting backend...");
    let config = initialize_executable()?;

    if let Some(address) = &config.backend.metrics_address {
        let address: SocketAddr = address.parse()?;
        PrometheusBuilder::new().with_http_listener(address).install()?;
        tracing::info!(%address, "Prometheus exporter listening");
    }

    let store = open_store(&config.common)?;
    let shield = FraudShield::new(
        RiskClassifier::new(),
        store,
        Arc::new(SystemClock),
        Arc::new(TimestampIdGenerator::new()),
    );

    run_backend(config.backend, shield).await
}
