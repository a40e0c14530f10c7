// src/main.rs
use actix_files::Files;
use actix_web::{App, HttpResponse, HttpServer, middleware, web};
use log::info;
use std::sync::Arc;

mod config;
mod errors;
mod handlers;
mod models;
mod services;

use crate::config::AppConfig;
use crate::services::{ColorAnalyzer, ImageProcessor, ScoringEngine};

#[derive(Clone)]
pub struct AppState {
    image_processor: Arc<ImageProcessor>,
    color_analyzer: Arc<ColorAnalyzer>,
    scoring_engine: Arc<ScoringEngine>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            image_processor: Arc::new(ImageProcessor::new(config.max_upload_bytes)),
            color_analyzer: Arc::new(ColorAnalyzer::new()),
            scoring_engine: Arc::new(ScoringEngine::new()),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting Watermelon Picker service...");

    let config = AppConfig::from_env().map_err(|e| std::io::Error::other(e.to_string()))?;
    let app_state = AppState::new(&config);
    let public_dir = config.public_dir.clone();
    let (host, port) = config.bind_address();

    info!("Serving static files from {}", public_dir);
    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
            .route("/health", web::get().to(health_check))
            .service(Files::new("/", &public_dir).index_file("index.html"))
            .default_service(web::route().to(handlers::not_found))
    })
    .bind((host, port))?
    .run()
    .await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "watermelon-picker",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now()
    }))
}
