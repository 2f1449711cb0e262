//! Rent Predictor - HTTP rent prediction service for student housing listings
//!
//! This library encodes structured property attributes into the feature
//! layout a trained regression model expects, scales them with the fitted
//! scaler and runs the model to estimate rent.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{encode, FeatureSchema, FeatureVector, PredictionError, Predictor, RentPredictor, StandardScaler};
pub use crate::models::{RentInput, PredictionResponse};
