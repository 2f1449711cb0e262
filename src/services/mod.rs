// Service exports
pub mod artifacts;

pub use artifacts::{load_artifacts, ArtifactError, ArtifactFetcher, Artifacts};
