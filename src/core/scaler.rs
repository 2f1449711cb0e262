use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the fitted scaler
#[derive(Debug, Error, PartialEq)]
pub enum ScalerError {
    #[error("X has {actual} features, but StandardScaler is expecting {expected} features as input")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("The feature names should match those that were passed during fit")]
    FeatureNameMismatch,

    #[error("Scaler artifact has {means} means but {scales} scales")]
    InconsistentParameters { means: usize, scales: usize },
}

/// Serialized form of a fitted standard scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
}

/// Fitted standard scaler: `(x - mean) / scale` per column
#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn from_params(params: ScalerParams) -> Result<Self, ScalerError> {
        if params.mean.len() != params.scale.len() {
            return Err(ScalerError::InconsistentParameters {
                means: params.mean.len(),
                scales: params.scale.len(),
            });
        }

        // Constant columns were fitted with zero variance; leave them unscaled
        let scale = params
            .scale
            .into_iter()
            .map(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s })
            .collect();

        Ok(Self {
            mean: params.mean,
            scale,
            feature_names: params.feature_names,
        })
    }

    /// Number of columns the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Check the column names seen at fit time against `columns`
    pub fn check_feature_names(&self, columns: &[String]) -> Result<(), ScalerError> {
        match &self.feature_names {
            Some(names) if names.as_slice() != columns => Err(ScalerError::FeatureNameMismatch),
            _ => Ok(()),
        }
    }

    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ScalerError> {
        if features.len() != self.mean.len() {
            return Err(ScalerError::ShapeMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect())
    }
}
