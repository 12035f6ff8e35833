//! Content sources and their non-blocking preparation
//!
//! Preparing a source (reading, decoding) happens off the frame loop. The
//! presenter holds a [`PrepareHandle`] and polls it once per refresh; "not
//! ready yet" is an ordinary steady state, possibly forever.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, warn};

use super::Bucket;

/// A prepared presentation source for one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    pub bucket: Bucket,
    /// Human-readable origin (file name, generator id, ...)
    pub label: String,
    /// Decoded body; text art for the terminal presenter
    pub body: String,
}

impl ContentSource {
    pub fn new(bucket: Bucket, label: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            bucket,
            label: label.into(),
            body: body.into(),
        }
    }
}

/// Why a source could not be prepared
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read content from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Content for bucket {0} is empty")]
    Empty(Bucket),

    #[error("No tokio runtime available to prepare content")]
    NoRuntime,
}

/// Polled state of a preparation
#[derive(Debug, Clone, PartialEq)]
pub enum Readiness {
    Pending,
    Ready(Arc<ContentSource>),
    Failed,
}

#[derive(Debug)]
enum HandleState {
    Waiting(oneshot::Receiver<Result<ContentSource, ContentError>>),
    Never,
    Ready(Arc<ContentSource>),
    Failed,
}

/// Future-like handle for a source being prepared
#[derive(Debug)]
pub struct PrepareHandle {
    bucket: Bucket,
    state: HandleState,
}

/// Producer side of a [`PrepareHandle`]
#[derive(Debug)]
pub struct Preparation {
    tx: oneshot::Sender<Result<ContentSource, ContentError>>,
}

impl Preparation {
    /// Deliver the outcome; a dropped handle simply discards it
    pub fn complete(self, result: Result<ContentSource, ContentError>) {
        let _ = self.tx.send(result);
    }
}

impl PrepareHandle {
    /// Handle/producer pair for loaders that finish work elsewhere
    pub fn channel(bucket: Bucket) -> (Preparation, Self) {
        let (tx, rx) = oneshot::channel();
        (
            Preparation { tx },
            Self {
                bucket,
                state: HandleState::Waiting(rx),
            },
        )
    }

    /// A handle that never becomes ready
    pub fn never(bucket: Bucket) -> Self {
        Self {
            bucket,
            state: HandleState::Never,
        }
    }

    /// An already resolved handle
    pub fn ready(source: ContentSource) -> Self {
        Self {
            bucket: source.bucket,
            state: HandleState::Ready(Arc::new(source)),
        }
    }

    pub fn bucket(&self) -> Bucket {
        self.bucket
    }

    /// Check for completion without blocking. Stable once resolved.
    pub fn poll(&mut self) -> Readiness {
        if let HandleState::Waiting(rx) = &mut self.state {
            match rx.try_recv() {
                Ok(Ok(source)) => {
                    debug!(bucket = self.bucket.index(), label = %source.label, "content ready");
                    self.state = HandleState::Ready(Arc::new(source));
                }
                Ok(Err(err)) => {
                    warn!(bucket = self.bucket.index(), error = %err, "content preparation failed");
                    self.state = HandleState::Failed;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    warn!(bucket = self.bucket.index(), "content preparation abandoned");
                    self.state = HandleState::Failed;
                }
            }
        }

        match &self.state {
            HandleState::Waiting(_) | HandleState::Never => Readiness::Pending,
            HandleState::Ready(source) => Readiness::Ready(Arc::clone(source)),
            HandleState::Failed => Readiness::Failed,
        }
    }
}

/// Starts preparing the source for a bucket without blocking
pub trait ContentLoader: Send {
    fn prepare(&mut self, bucket: Bucket) -> PrepareHandle;
}

/// Loader with no content at all; the presenter always falls back
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLoader;

impl ContentLoader for NullLoader {
    fn prepare(&mut self, bucket: Bucket) -> PrepareHandle {
        PrepareHandle::never(bucket)
    }
}

/// Reads `<root>/bucket-<n>.txt` on a tokio runtime
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
    runtime: Handle,
}

impl DirectoryLoader {
    /// Use the runtime of the calling context
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ContentError> {
        let runtime = Handle::try_current().map_err(|_| ContentError::NoRuntime)?;
        Ok(Self::with_runtime(root, runtime))
    }

    pub fn with_runtime(root: impl Into<PathBuf>, runtime: Handle) -> Self {
        Self {
            root: root.into(),
            runtime,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File expected for a bucket
    pub fn path_for(&self, bucket: Bucket) -> PathBuf {
        self.root.join(format!("bucket-{}.txt", bucket.index()))
    }
}

impl ContentLoader for DirectoryLoader {
    fn prepare(&mut self, bucket: Bucket) -> PrepareHandle {
        let (preparation, handle) = PrepareHandle::channel(bucket);
        let path = self.path_for(bucket);
        debug!(bucket = bucket.index(), path = %path.display(), "preparing content");

        self.runtime.spawn(async move {
            let result = match tokio::fs::read_to_string(&path).await {
                Ok(body) if body.trim().is_empty() => Err(ContentError::Empty(bucket)),
                Ok(body) => {
                    let label = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Ok(ContentSource::new(bucket, label, body))
                }
                Err(source) => Err(ContentError::Read { path, source }),
            };
            preparation.complete(result);
        });

        handle
    }
}
