//! Test helpers shared across chatproof crates.

pub mod authority;
pub mod features;
pub mod fixtures;
pub mod scoring;

pub use authority::{AuthorityCall, StubAuthority};
pub use features::{FixedKeywords, FixedSentiment};
pub use fixtures::{ChatBuilder, ExportBuilder, submitted_at, test_config};
pub use scoring::CountingScorer;
