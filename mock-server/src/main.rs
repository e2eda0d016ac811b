use mock_server::{Credentials, Store};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let defaults = Credentials::default();
    let credentials = Credentials {
        key: std::env::var("MOCK_API_KEY").unwrap_or(defaults.key),
        token: std::env::var("MOCK_API_TOKEN").unwrap_or(defaults.token),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run_with(listener, Store::seeded(), credentials).await
}
