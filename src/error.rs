use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the session controller.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Detect was requested while no image is loaded. The shell keeps the
    /// Detect control disabled in that state, so reaching this is a bug.
    #[error("no image loaded")]
    NoImageLoaded,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{path} decodes to an empty image")]
    Empty { path: PathBuf },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RasterError {
    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u8),

    #[error("buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error("failed to read cascade {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed cascade xml: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("missing element <{0}>")]
    MissingElement(&'static str),

    #[error("invalid value in <{element}>: {value:?}")]
    InvalidValue { element: &'static str, value: String },

    #[error("unsupported {kind}: {value}")]
    Unsupported { kind: &'static str, value: String },

    #[error("weak classifier references feature {index}, cascade has {count}")]
    FeatureIndex { index: usize, count: usize },
}
