//! Riff Player Core
//!
//! Platform-agnostic core types and the queue store seam for Riff Player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackId`, `TrackMetadata`, `QueueSnapshot`
//! - **Queue Store**: the `QueueStore` trait the playback controller reads
//!   from, plus `PlayerQueue`/`SharedQueue` in-memory implementations
//! - **Error Handling**: `CoreError` and `Result`
//!
//! # Example
//!
//! ```rust
//! use riff_core::{QueueStore, SharedQueue, TrackId};
//!
//! let queue = SharedQueue::from_ids(["a", "b", "c"]);
//! let mut store = queue.clone();
//! store.set_active_id(TrackId::new("b"));
//!
//! let snapshot = queue.snapshot();
//! assert_eq!(snapshot.active_id, Some(TrackId::new("b")));
//! assert_eq!(snapshot.upcoming_count(), 2);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod queue;
pub mod types;

pub use error::{CoreError, Result};
pub use queue::{PlayerQueue, QueueStore, SharedQueue};
pub use types::{QueueSnapshot, TrackId, TrackMetadata};
