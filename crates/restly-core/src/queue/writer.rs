use crate::{
    Clock, CoreResult, QueueError, SystemClock,
    clock::whole_seconds,
    queue::{Command, CommandRecord, default_queue_path, finite::ensure_finite},
};

use std::{
    fs::{self, OpenOptions},
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use error_location::ErrorLocation;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Typed `None` for [`CommandQueue::enqueue`] calls without parameters.
pub const NO_PARAMS: Option<&'static Value> = None;

/// Appends command records to a newline-delimited JSON queue file.
///
/// # Durability
///
/// Every call opens the file in append mode, writes one complete line with a
/// single `write_all`, flushes and (unless disabled) `sync_data`s before the
/// file is closed. Nothing is buffered between calls.
///
/// # Concurrency
///
/// The queue holds no lock. Within one process callers serialize their
/// calls; across processes only the OS guarantee for `O_APPEND` writes
/// applies.
pub struct CommandQueue {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    sync_on_write: bool,
}

impl CommandQueue {
    /// Queue writing to `path`, stamped by the system clock.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            clock: Arc::new(SystemClock),
            sync_on_write: true,
        }
    }

    /// Queue at the well-known per-user location.
    ///
    /// # Errors
    ///
    /// Returns error if the platform has no configuration directory.
    #[track_caller]
    pub fn at_default_path() -> CoreResult<Self> {
        Ok(Self::new(default_queue_path()?))
    }

    /// Replace the clock used for `ts`.
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Whether each append is followed by `sync_data`.
    pub fn with_sync_on_write(mut self, sync_on_write: bool) -> Self {
        self.sync_on_write = sync_on_write;
        self
    }

    /// Path of the queue file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record for `action` with optional `params`.
    ///
    /// `params` must serialize to a JSON object. An empty object is treated
    /// like `None` and the `params` key is left out of the record. Unknown
    /// action strings are accepted as-is.
    ///
    /// The record is fully serialized before the file is touched, so a
    /// serialization failure never leaves a partial line behind. NaN and
    /// infinite numbers are serialization failures rather than `null`.
    ///
    /// # Errors
    ///
    /// Returns error if the parameters cannot be serialized, the queue
    /// directory cannot be created, or the file cannot be opened or written.
    #[track_caller]
    #[instrument(skip_all, fields(action = action.as_ref()))]
    pub fn enqueue<P>(&self, action: impl AsRef<str>, params: Option<&P>) -> CoreResult<()>
    where
        P: Serialize + ?Sized,
    {
        let action = action.as_ref();

        let record = CommandRecord {
            ts: whole_seconds(self.clock.now()),
            action: action.to_owned(),
            params: params_object(action, params)?,
        };

        let line = record
            .to_line()
            .map_err(|e| QueueError::SerializationFailed {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.ensure_dir()?;
        self.append_line(&line)?;

        debug!(
            path = ?self.path,
            bytes = line.len(),
            has_params = record.params.is_some(),
            "Command enqueued"
        );

        Ok(())
    }

    /// Append the record for a typed [`Command`].
    ///
    /// # Errors
    ///
    /// Same as [`enqueue`](Self::enqueue).
    #[track_caller]
    pub fn submit(&self, command: &Command) -> CoreResult<()> {
        let action = command.action();
        match command {
            Command::SetSession(params) => self.enqueue(action, Some(params)),
            Command::NlCommand(params) => self.enqueue(action, Some(params)),
            Command::TogglePause | Command::SummarizeDay => self.enqueue(action, NO_PARAMS),
        }
    }

    #[track_caller]
    fn ensure_dir(&self) -> CoreResult<()> {
        let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };

        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|e| QueueError::CreateDirFailed {
                path: dir.to_path_buf(),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
            debug!(queue_dir = ?dir, "Created queue directory");
        }

        Ok(())
    }

    #[track_caller]
    fn append_line(&self, line: &[u8]) -> CoreResult<()> {
        let write_failed = |e: std::io::Error| QueueError::WriteFailed {
            path: self.path.clone(),
            source: e,
            location: ErrorLocation::from(Location::caller()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_failed)?;

        // One write per record keeps the line intact under O_APPEND.
        file.write_all(line).map_err(write_failed)?;
        file.flush().map_err(write_failed)?;

        if self.sync_on_write {
            file.sync_data().map_err(write_failed)?;
        }

        Ok(())
    }
}

#[track_caller]
fn params_object<P>(action: &str, params: Option<&P>) -> CoreResult<Option<Map<String, Value>>>
where
    P: Serialize + ?Sized,
{
    let Some(params) = params else {
        return Ok(None);
    };

    let value = ensure_finite(params)
        .and_then(|()| serde_json::to_value(params))
        .map_err(|e| QueueError::SerializationFailed {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    match value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        _ => Err(QueueError::ParamsNotAnObject {
            action: action.to_owned(),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
