use crate::config::ArtifactSettings;
use crate::core::{
    FeatureSchema, ModelArtifact, Predictor, PredictorError, ScalerError, ScalerParams,
    SchemaError, StandardScaler,
};
use futures_util::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Errors that can occur while fetching or loading model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found at {0} and no download URL configured")]
    Missing(PathBuf),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Download of {url} returned status {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid feature schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid scaler: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Model artifact rejected: {0}")]
    Model(#[from] PredictorError),
}

/// Trained artifacts, loaded and checked
pub struct Artifacts {
    pub schema: FeatureSchema,
    pub scaler: StandardScaler,
    pub model: Arc<dyn Predictor>,
}

/// Fetches artifacts that are not present locally
///
/// A file that already exists is never downloaded again.
pub struct ArtifactFetcher {
    client: Client,
}

impl ArtifactFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ArtifactError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Make sure `path` exists, downloading it from `url` when missing
    pub async fn ensure(&self, path: &Path, url: Option<&str>) -> Result<(), ArtifactError> {
        if path.exists() {
            tracing::info!("{} already exists locally", path.display());
            return Ok(());
        }

        let url = url.ok_or_else(|| ArtifactError::Missing(path.to_path_buf()))?;

        tracing::info!("Downloading {} from {}", path.display(), url);

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ArtifactError::DownloadStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ArtifactError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        // Stage next to the target; only a complete body is renamed into place
        let partial = path.with_extension("part");
        let written = match stream_to_file(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, path)
            .await
            .map_err(|source| ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("{} downloaded successfully ({} bytes)", path.display(), written);
        Ok(())
    }

    /// Download whatever the settings point at and is not yet on disk
    pub async fn ensure_all(&self, settings: &ArtifactSettings) -> Result<(), ArtifactError> {
        self.ensure(&settings.model_path, settings.model_url.as_deref()).await?;
        self.ensure(&settings.scaler_path, settings.scaler_url.as_deref()).await?;
        self.ensure(&settings.feature_names_path, settings.feature_names_url.as_deref())
            .await?;
        Ok(())
    }
}

/// Write the response body chunk by chunk, returning the byte count
async fn stream_to_file(response: Response, path: &Path) -> Result<u64, ArtifactError> {
    let io_error = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(path).await.map_err(io_error)?;
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_error)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_error)?;

    Ok(written)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_schema(path: &Path, target_column: Option<&str>) -> Result<FeatureSchema, ArtifactError> {
    let names: Vec<String> = read_json(path)?;
    Ok(FeatureSchema::new(names, target_column)?)
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    let params: ScalerParams = read_json(path)?;
    Ok(StandardScaler::from_params(params)?)
}

pub fn load_model(path: &Path) -> Result<Arc<dyn Predictor>, ArtifactError> {
    let artifact: ModelArtifact = read_json(path)?;
    Ok(Arc::from(artifact.into_predictor()?))
}

/// Load all three artifacts from the configured paths
pub fn load_artifacts(settings: &ArtifactSettings) -> Result<Artifacts, ArtifactError> {
    let target = Some(settings.target_column.as_str()).filter(|t| !t.is_empty());

    Ok(Artifacts {
        model: load_model(&settings.model_path)?,
        scaler: load_scaler(&settings.scaler_path)?,
        schema: load_schema(&settings.feature_names_path, target)?,
    })
}
