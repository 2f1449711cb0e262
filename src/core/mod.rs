// Core prediction pipeline exports
pub mod encoder;
pub mod pipeline;
pub mod predictor;
pub mod scaler;
pub mod schema;
pub mod validation;

pub use encoder::{encode, indicator_column, FeatureVector, UnmatchedCategory};
pub use pipeline::{PredictionError, RentPredictor};
pub use predictor::{LinearRegressor, ModelArtifact, Predictor, PredictorError, TreeEnsemble};
pub use scaler::{ScalerError, ScalerParams, StandardScaler};
pub use schema::{FeatureSchema, SchemaError};
pub use validation::validate_input;
