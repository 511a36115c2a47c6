//! Progress reporting and cooperative cancellation for long loops.

use crate::error::{NmiError, NmiResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stages of one evaluation that report progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    JointDistribution,
    JointEntropy,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::JointDistribution => "joint distribution",
            Stage::JointEntropy => "joint entropy",
        }
    }
}

/// Receives progress from the estimators.
///
/// `advance` is called once per finished row of a `(K, L)` matrix and
/// may be called from several rayon workers at once.
pub trait ProgressObserver: Sync {
    fn start(&self, _stage: Stage, _total: u64) {}
    fn advance(&self, _stage: Stage, _delta: u64) {}
    fn finish(&self, _stage: Stage) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Shared flag checked between rows of the quadratic loops
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// `Err(Cancelled)` once `cancel` has been called
    pub fn check(&self) -> NmiResult<()> {
        if self.is_cancelled() {
            Err(NmiError::Cancelled)
        } else {
            Ok(())
        }
    }
}
