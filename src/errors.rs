//! Error Types
//!
//! This module defines the error type shared by the viewer core.
//!
//! # Overview
//!
//! [`ViewerError`] covers every failure mode that can surface to the host:
//! - Asset fetching (file system and HTTP)
//! - glTF decoding and buffer resolution
//! - Mesh decoder configuration
//! - Collaborator backends (chat / voice)
//!
//! None of these are fatal to the frame loop. A failed load leaves the viewer
//! ticking without a model, and the host shows its fallback state using the
//! human-readable [`Display`](std::fmt::Display) text.
//!
//! ```rust,ignore
//! use avatar_viewer::errors::{ViewerError, Result};
//!
//! fn fetch() -> Result<Vec<u8>> {
//!     Err(ViewerError::AssetNotFound("models/character.glb".into()))
//! }
//! ```

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The asset needs a mesh decoder that was not configured.
    #[error("Asset requires the {0} mesh decoder, but no decoder path is configured")]
    DecoderUnavailable(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ========================================================================
    // HTTP & Network Errors
    // ========================================================================
    /// Transport level HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// HTTP response error with status code.
    #[error("HTTP response error: status {status}")]
    HttpResponseError {
        /// HTTP status code
        status: u16,
    },

    /// URL parsing error.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    /// A collaborator backend answered with an application-level error.
    #[error("{0}")]
    Backend(String),

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Data URI parsing error.
    #[error("Data URI error: {0}")]
    DataUriError(String),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    // ========================================================================
    // Async Errors
    // ========================================================================
    /// The background load task went away before reporting a result.
    #[error("Asset load task ended without a result")]
    LoadAborted,
}

impl From<gltf::Error> for ViewerError {
    fn from(err: gltf::Error) -> Self {
        ViewerError::GltfError(err.to_string())
    }
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
