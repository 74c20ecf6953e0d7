//! Shared crawl state
//!
//! # Components
//!
//! - `VisitedRegistry`: addresses already fetched, plus in-flight reservations
//! - `DepthBound`: the runtime-adjustable depth ceiling
//! - `DedupPolicy`: how tasks are kept from fetching the same address twice

mod depth;
mod visited;

pub use depth::DepthBound;
pub use visited::{DedupPolicy, Reservation, VisitedRegistry};
