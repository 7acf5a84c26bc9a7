//! Example consumer: serves the `test` table at /api/test.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Configure with `DATABASE_URL` (default `sqlite::memory:`) and `BIND_ADDR` (default `0.0.0.0:8080`).

use rowrest::{init_tracing, row_model, AppConfig, RestApp};
use tokio::net::TcpListener;

row_model! {
    /// Rows of the `test` table.
    pub struct NTest {
        table = "test",
        primary_key = key,
        key: i64,
        value: i64,
        string_attr: String,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing("rowrest=info,example_consumer=info,tower_http=info");

    let mut app = RestApp::connect(&config.database)
        .await?
        .with_body_limit(config.body_limit);
    app.bind::<NTest>("/api/test")?;
    app.create_all().await?;

    let status = app.status_routes();
    let router = status.merge(app.into_router());

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
