//! Module thresholds: values, persistence, and write locking.
//!
//! - [`value`] - Parsing `.covgate` content into a [`Threshold`]
//! - [`store`] - The [`ThresholdStore`] contract and its implementations
//! - [`lock`] - Advisory lock held by the ratchet

pub mod lock;
pub mod store;
pub mod value;

pub use lock::{ThresholdLock, LOCK_FILE};
pub use store::{FsThresholdStore, MemoryThresholdStore, ThresholdStore, MARKER_FILE};
pub use value::{Threshold, OPT_OUT};
