#[tokio::main]
async fn main() {
    scanledger_api::telemetry::init();

    let services = match scanledger_api::app::services::build_services() {
        Ok(services) => services,
        Err(e) => {
            tracing::error!(error = %e, "failed to build services");
            std::process::exit(1);
        }
    };

    let addr = std::env::var("SCANLEDGER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let app = scanledger_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
