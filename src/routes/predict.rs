use actix_web::{error, http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::RentPredictor;
use crate::models::{HealthResponse, PredictionResponse, RentInput, WelcomeResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: RentPredictor,
}

/// Request body rejected before it reaches the prediction pipeline
#[derive(Debug, serde::Serialize)]
pub struct BoundaryError {
    pub error: String,
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for BoundaryError {}

impl error::ResponseError for BoundaryError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    BoundaryError {
        error: format!("Invalid JSON: {}", err),
    }
    .into()
}

/// JSON extractor config used by the prediction routes
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(handle_json_payload_error)
}

/// Configure all prediction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(root))
        .route("/health", web::get().to(health_check))
        .route("/predict", web::post().to(predict_rent));
}

async fn root() -> impl Responder {
    HttpResponse::Ok().json(WelcomeResponse {
        message: "Welcome to the Student Housing Rent Prediction API. Use /predict with POST request."
            .to_string(),
    })
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        features: state.predictor.schema().len(),
    })
}

/// Predict rent endpoint
///
/// POST /predict
///
/// Request body:
/// ```json
/// {
///   "bedrooms": 2, "bathrooms": 1, "floor_area": 800, "lat": 6.5, "lng": 3.3,
///   "category": "home", "condition": "used", "is_furnished": "No",
///   "parking_space": "Yes", "amenities": "pool", "region": "Lagos",
///   "locality": "Ikeja"
/// }
/// ```
///
/// Responds 200 with `{"predicted_rent": f64}` or `{"error": string}`.
async fn predict_rent(
    state: web::Data<AppState>,
    req: web::Json<RentInput>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for predict request: field_errors={:?}", errors);
        return HttpResponse::UnprocessableEntity().json(BoundaryError {
            error: errors.to_string(),
        });
    }

    let response = match state.predictor.predict(&req) {
        Ok(predicted_rent) => PredictionResponse::Success { predicted_rent },
        Err(e) => {
            tracing::warn!("Prediction failed: {}", e);
            PredictionResponse::error(e.to_string())
        }
    };

    HttpResponse::Ok().json(response)
}
