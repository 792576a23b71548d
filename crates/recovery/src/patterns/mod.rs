//! Error pattern tracking
//!
//! Every observed error is reduced to an [`ErrorSignature`]. The tracker keeps
//! one [`ErrorPattern`] per signature with its frequency, recency and rolling
//! recovery statistics.

mod pattern;
mod signature;
mod tracker;

pub use pattern::ErrorPattern;
pub use signature::ErrorSignature;
pub use tracker::PatternTracker;
