//! Error types for the render pipeline.

use std::path::PathBuf;

use lumen_core::{ConfigError, EnvironmentError};
use thiserror::Error;

/// Errors raised while setting up or reconfiguring the renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment map error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Skybox cannot change while rendering (was {current:?}, requested {requested:?})")]
    SkyboxChanged {
        current: Option<PathBuf>,
        requested: Option<PathBuf>,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;
