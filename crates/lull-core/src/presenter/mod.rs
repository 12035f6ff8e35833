//! Content presentation
//!
//! Maps the neutralizer's bucket to presented content, crossfading between
//! sources with a smoothstep curve and falling back to a procedural visual
//! whenever nothing is ready, so the screen is never blank.

mod bucket;
mod easing;
mod scene;
mod source;

pub use bucket::Bucket;
pub use easing::smoothstep;
pub use scene::{Composition, GradientDrift, Grain, Layer, ProceduralScene, Texture, Tint, Wash};
pub use source::{
    ContentError, ContentLoader, ContentSource, DirectoryLoader, NullLoader, PrepareHandle,
    Preparation, Readiness,
};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

/// Observable presenter state.
///
/// `pending_bucket` is `None` while steady; while transitioning it holds the
/// incoming bucket and `transition_progress` climbs from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresentationState {
    pub active_bucket: Bucket,
    pub pending_bucket: Option<Bucket>,
    pub transition_progress: f32,
}

/// A bucket together with its (possibly unready) source
#[derive(Debug)]
struct Slot {
    bucket: Bucket,
    handle: PrepareHandle,
    source: Option<Arc<ContentSource>>,
}

impl Slot {
    fn new(bucket: Bucket, handle: PrepareHandle) -> Self {
        Self {
            bucket,
            handle,
            source: None,
        }
    }

    fn poll(&mut self) {
        if self.source.is_none() {
            if let Readiness::Ready(source) = self.handle.poll() {
                self.source = Some(source);
            }
        }
    }
}

#[derive(Debug)]
struct Transition {
    incoming: Slot,
    progress: f32,
}

/// Selects and crossfades presentation sources per bucket
pub struct ContentPresenter<L: ContentLoader> {
    loader: L,
    active: Slot,
    transition: Option<Transition>,
}

impl<L: ContentLoader> ContentPresenter<L> {
    /// Create a presenter showing bucket 0, whose content starts preparing now
    pub fn new(mut loader: L) -> Self {
        let handle = loader.prepare(Bucket::MIN);
        Self {
            loader,
            active: Slot::new(Bucket::MIN, handle),
            transition: None,
        }
    }

    /// Advance one refresh toward `desired`.
    ///
    /// A new transition only starts from the steady state; a bucket change
    /// requested mid-fade waits for the current fade to finish.
    pub fn step(&mut self, desired: Bucket, fade_step: f32) {
        self.active.poll();

        let Some(transition) = self.transition.as_mut() else {
            if desired != self.active.bucket {
                debug!(
                    from = self.active.bucket.index(),
                    to = desired.index(),
                    "bucket transition started"
                );
                let handle = self.loader.prepare(desired);
                self.transition = Some(Transition {
                    incoming: Slot::new(desired, handle),
                    progress: 0.0,
                });
            }
            return;
        };

        transition.incoming.poll();
        transition.progress = (transition.progress + fade_step.max(0.0)).min(1.0);

        if transition.progress >= 1.0 {
            if let Some(done) = self.transition.take() {
                debug!(
                    bucket = done.incoming.bucket.index(),
                    ready = done.incoming.source.is_some(),
                    "bucket transition complete"
                );
                self.active = done.incoming;
            }
        }
    }

    /// Layers to paint for this refresh
    pub fn compose(&self, now: Duration) -> Composition {
        let mut layers = Vec::with_capacity(2);

        match &self.transition {
            None => {
                if let Some(source) = &self.active.source {
                    layers.push(Layer::Content {
                        source: Arc::clone(source),
                        opacity: 1.0,
                    });
                }
            }
            Some(transition) => {
                let eased = smoothstep(transition.progress);
                if let Some(old) = &self.active.source {
                    layers.push(Layer::Content {
                        source: Arc::clone(old),
                        opacity: 1.0 - eased,
                    });
                }
                if let Some(new) = &transition.incoming.source {
                    layers.push(Layer::Content {
                        source: Arc::clone(new),
                        opacity: eased,
                    });
                }
            }
        }

        if layers.is_empty() {
            layers.push(Layer::Procedural(ProceduralScene::fallback(now)));
        }

        Composition {
            base: Tint::BASE,
            layers,
        }
    }

    pub fn state(&self) -> PresentationState {
        PresentationState {
            active_bucket: self.active.bucket,
            pending_bucket: self.transition.as_ref().map(|t| t.incoming.bucket),
            transition_progress: self.transition.as_ref().map_or(0.0, |t| t.progress),
        }
    }

    /// Drop any transition and return to bucket 0
    pub fn reset(&mut self) {
        self.transition = None;
        if self.active.bucket != Bucket::MIN {
            let handle = self.loader.prepare(Bucket::MIN);
            self.active = Slot::new(Bucket::MIN, handle);
        }
    }
}
