use mock_seller_api::MockConfig;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_seller_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let mut config = MockConfig::default();
    if let Ok(client_id) = std::env::var("MOCK_CLIENT_ID") {
        config.client_id = client_id;
    }
    if let Ok(api_key) = std::env::var("MOCK_API_KEY") {
        config.api_key = api_key;
    }

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, client_id = %config.client_id, "mock seller api listening");
    mock_seller_api::run(listener, config).await
}
