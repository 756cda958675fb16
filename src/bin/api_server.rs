// src/bin/api_server.rs

use authority_relay::domain::{AuthorityService, ReceiptPolicy};
use authority_relay::ethereum::NodeRpc;
use authority_relay::infra::config;
use authority_relay::transport;
use authority_relay::{ContractHandle, EthClient};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // --- Contract Handle Initialization ---
    let artifact_path = config::contract_artifact_path();
    println!("> Loading contract artifact from {}...", artifact_path);
    let contract = Arc::new(ContractHandle::load(&artifact_path, &config::contract_address())?);
    println!(
        "> Contract '{}' bound at {}",
        contract.name(),
        contract.address_hex()
    );

    // --- Node Client Initialization ---
    let rpc_url = config::rpc_url();
    let node = Arc::new(EthClient::new(rpc_url.clone(), config::rpc_timeout()?)?);

    // Connectivity check is informational only; the server starts either way.
    let checker = node.clone();
    tokio::spawn(async move {
        match checker.is_listening().await {
            Ok(true) => println!("> Connected to node at {}", rpc_url),
            Ok(false) => eprintln!("> Node at {} reports it is not listening", rpc_url),
            Err(e) => eprintln!("> Could not reach node at {}: {}", rpc_url, e),
        }
    });

    // --- Service Initialization ---
    let mode = config::relay_mode()?;
    let receipts = ReceiptPolicy {
        attempts: config::receipt_poll_attempts()?,
        interval: config::receipt_poll_interval()?,
    };
    let authority = AuthorityService::new(node.clone(), contract, mode)
        .with_receipt_policy(receipts)
        .with_gas(config::tx_gas()?);
    println!("> AuthorityService initialized in {} mode.", mode);

    let app_state = transport::http::AppState {
        authority: Arc::new(authority),
        node,
    };

    // --- API Server Initialization ---
    println!("> Starting API server...");
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listen_addr = config::listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    println!("> API server listening on http://{}", listen_addr);
    println!("> Swagger UI available at http://{}/swagger-ui", listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            println!("\n> Shutdown signal received (Ctrl+C)...");
        })
        .await?;
    println!("> Graceful shutdown complete.");

    Ok(())
}
