use crate::core::{
    encoder::encode,
    predictor::{Predictor, PredictorError},
    scaler::{ScalerError, StandardScaler},
    schema::FeatureSchema,
    validation::validate_input,
};
use crate::models::RentInput;
use std::sync::Arc;
use thiserror::Error;

/// Per-request failures, all reported to the client in the response body
#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Unknown category: {field}={value}")]
    UnknownCategory { field: &'static str, value: String },

    #[error("{0}")]
    Scaling(#[from] ScalerError),

    #[error("{0}")]
    Inference(#[from] PredictorError),
}

/// Loaded artifacts plus the validate → encode → scale → infer pipeline
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone)]
pub struct RentPredictor {
    schema: Arc<FeatureSchema>,
    scaler: Arc<StandardScaler>,
    model: Arc<dyn Predictor>,
    reject_unknown_categories: bool,
}

impl RentPredictor {
    pub fn new(schema: FeatureSchema, scaler: StandardScaler, model: Arc<dyn Predictor>) -> Self {
        if schema.len() != scaler.n_features() || scaler.n_features() != model.n_features() {
            tracing::warn!(
                "Artifact widths disagree (schema: {}, scaler: {}, model: {}); predictions will fail",
                schema.len(),
                scaler.n_features(),
                model.n_features()
            );
        }

        Self {
            schema: Arc::new(schema),
            scaler: Arc::new(scaler),
            model,
            reject_unknown_categories: false,
        }
    }

    /// Fail requests whose categorical values have no indicator column
    pub fn with_reject_unknown_categories(mut self, reject: bool) -> Self {
        self.reject_unknown_categories = reject;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Predict the rent for one property
    pub fn predict(&self, input: &RentInput) -> Result<f64, PredictionError> {
        validate_input(input).map_err(PredictionError::InvalidInput)?;

        let features = encode(&self.schema, input);

        if !features.unmatched().is_empty() {
            tracing::debug!(
                "No indicator column for {:?}; encoding as baseline",
                features.unmatched()
            );
            if self.reject_unknown_categories {
                let miss = &features.unmatched()[0];
                return Err(PredictionError::UnknownCategory {
                    field: miss.field,
                    value: miss.value.clone(),
                });
            }
        }

        self.scaler.check_feature_names(self.schema.columns())?;
        let scaled = self.scaler.transform(features.as_slice())?;

        let rent = self.model.predict(&scaled)?;

        tracing::debug!("Predicted rent {:.2} from {} features", rent, scaled.len());

        Ok(rent)
    }
}
