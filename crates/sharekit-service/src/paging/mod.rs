//! Bounded-window iteration over paged directory listings.

mod paginator;

pub use paginator::{Collected, PageWalk, Paged, WalkState, collect, collect_from};
