use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Command queue errors with source location tracking.
#[derive(Error, Debug)]
pub enum QueueError {
    /// The directory holding the queue file could not be created.
    #[error("Failed to create queue directory {path:?}: {source} {location}")]
    CreateDirFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The queue file could not be opened, written or flushed.
    #[error("Failed to append to queue file {path:?}: {source} {location}")]
    WriteFailed {
        /// Queue file being appended to.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The record or its parameters could not be represented as JSON.
    #[error("Failed to serialize command record: {source} {location}")]
    SerializationFailed {
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Parameters serialized to something other than a JSON object.
    #[error("Parameters for action {action:?} must serialize to a JSON object {location}")]
    ParamsNotAnObject {
        /// Action the parameters were supplied for.
        action: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No platform configuration directory could be determined.
    #[error("Could not determine the user configuration directory {location}")]
    NoConfigDir {
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`QueueError`].
pub type Result<T> = std::result::Result<T, QueueError>;
