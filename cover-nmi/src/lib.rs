pub mod aggregate; // best-match conditional entropy and the final score
pub mod config; // evaluation arguments
pub mod cover; // validated (node, community, probability) tables
pub mod cover_io; // reading/writing cover files
pub mod entropy; // joint and marginal entropies
pub mod error;
pub mod joint; // pairwise joint membership masses
pub mod marginal;
pub mod membership; // shared node index and per-cover membership tables
pub mod nmi; // the whole pipeline
pub mod progress; // progress observer and cancellation
pub mod simulate; // planted covers for benchmarking

pub use config::{NmiConfig, Normalization};
pub use cover::{Cover, CoverRow, CoverSummary};
pub use error::{CoverSide, NmiError, NmiResult};
pub use nmi::{overlapping_nmi, unweighted_overlapping, weighted_overlapping, NmiEvaluator, NmiReport};
pub use progress::{CancelToken, NoProgress, ProgressObserver, Stage};
