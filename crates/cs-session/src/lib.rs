//! cs-session: session file format, validation and model construction.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::{build_config, build_engine, build_run_options, build_simulator};
pub use schema::*;
pub use validate::{ValidationError, validate_session};

use std::path::Path;
use tracing::debug;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Build error: {what}")]
    Build { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> SessionResult<Session> {
    let content = std::fs::read_to_string(path)?;
    let session: Session = serde_yaml::from_str(&content)?;
    validate_session(&session)?;
    debug!(path = %path.display(), session = %session.name, "loaded session");
    Ok(session)
}

pub fn save_yaml(path: &Path, session: &Session) -> SessionResult<()> {
    validate_session(session)?;
    let content = serde_yaml::to_string(session)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> SessionResult<Session> {
    let content = std::fs::read_to_string(path)?;
    let session: Session = serde_json::from_str(&content)?;
    validate_session(&session)?;
    debug!(path = %path.display(), session = %session.name, "loaded session");
    Ok(session)
}

pub fn save_json(path: &Path, session: &Session) -> SessionResult<()> {
    validate_session(session)?;
    let content = serde_json::to_string_pretty(session)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a session by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &Path) -> SessionResult<Session> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
