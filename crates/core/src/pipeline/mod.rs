//! Batch intake pipeline.
//!
//! One run takes a snapshot of the source folder, groups archives by client
//! and drives each client through:
//! extracting -> resolving -> submitting -> annotating -> archiving -> done
//!
//! A client without a main contact or whose ticket could not be created is
//! skipped and its archives stay in the source folder for a later run. The
//! scratch folder is wiped after every client, whatever the outcome.

mod runner;
mod types;

pub use runner::IntakePipeline;
pub use types::{ClientOutcome, ClientReport, ClientState, PipelineError, RunSummary};
