//! `telescribe-sync` — the incremental sync + classification pipeline.
//!
//! # Overview
//!
//! One run of [`driver::run_sync`]:
//!
//! 1. reads the high-water mark (max stored message id) from the store,
//! 2. scans group history newest-first until it reaches that mark,
//! 3. classifies each new message as a join event or a content message,
//! 4. builds the namelist (stored members plus this run's joiners),
//! 5. fetches and resolves reactions for the new content messages,
//! 6. commits messages, members and reactions as one transaction.
//!
//! Everything is sequential; the per-message reaction fetch dominates
//! run time for large batches.

pub mod classify;
pub mod driver;
pub mod error;
pub mod namelist;
pub mod process;
pub mod reactions;

pub use classify::{classify, Classified};
pub use driver::{run_sync, SyncReport};
pub use error::{Result, SyncError};
pub use namelist::{Namelist, NamelistEntry};
pub use process::process_batch;
pub use reactions::resolve_reactions;
