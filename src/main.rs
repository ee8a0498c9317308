mod handlers;
mod models;
mod services;

use std::env;
use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;

use handlers::{create_router, AppState};
use services::{ClipClassifier, GeminiService};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv().ok();

    log::info!("🚀 Starting AI Waste Segregation Assistant...");

    // Missing credential is fatal: the service must not run half-configured.
    let gemini_api_key =
        env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set in .env file");
    let guidance = Arc::new(GeminiService::new(gemini_api_key));
    log::info!("✅ Gemini service initialized");

    // The service still starts when the model fails to load so /health can
    // report the failure; /classify then answers with a model-not-loaded
    // error instead of crashing the process.
    let classifier = match tokio::task::spawn_blocking(ClipClassifier::load).await? {
        Ok(classifier) => Some(Arc::new(classifier)),
        Err(e) => {
            log::error!("❌ CLIP model failed to load: {e:#}");
            None
        }
    };

    let state = Arc::new(AppState {
        classifier,
        guidance,
        gemini_configured: true,
    });

    let addr = "0.0.0.0:8000";
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 Listening on http://{}", addr);

    println!("\n🗑️ AI Waste Segregation Assistant");
    println!("🌐 http://localhost:8000  (GET /health, POST /classify)\n");

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
