//! Basic request against the shop backend
//!
//! Run with:
//! ```bash
//! RUST_LOG=miniapp_http=debug cargo run --example basic_request
//! ```
//! Set `MINIAPP_HTTP_BASE_URL` to point at another backend.

use miniapp_http::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("miniapp_http=debug")),
        )
        .init();

    let session = Arc::new(MemorySession::new());
    let client = RequestClient::builder()
        .config(ClientConfig::from_env()?)
        .session(session.clone())
        .build()?;

    match client.get::<serde_json::Value>("/home/banner").await {
        Ok(env) => println!("banner: {}", serde_json::to_string_pretty(&env.result)?),
        Err(e) => eprintln!("request failed: {e}"),
    }

    // Pretend a login happened; the next call carries the token.
    session.set_profile(MemberProfile::with_token("demo-token"));
    if let Err(e) = client.get::<serde_json::Value>("/member/profile").await {
        eprintln!("profile failed: {e}");
    }

    Ok(())
}
