// src/services/mod.rs
pub mod color_analyzer;
pub mod image_processor;
pub mod knowledge_base;
pub mod scoring_engine;

pub use color_analyzer::ColorAnalyzer;
pub use image_processor::ImageProcessor;
pub use scoring_engine::ScoringEngine;
