//! Share recipient search.

pub mod ranker;
pub mod resolver;

pub use ranker::{MatchTier, RelevanceRanker};
pub use resolver::{ResolveRequest, SharePolicy, ShareTargetResolver, SharedRecipients};
