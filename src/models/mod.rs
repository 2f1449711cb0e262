// Model exports
pub mod requests;
pub mod responses;

pub use requests::RentInput;
pub use responses::{HealthResponse, PredictionResponse, WelcomeResponse};
