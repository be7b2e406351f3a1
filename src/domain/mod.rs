pub mod classification;
pub mod record;

pub use classification::{Classification, Confidence, Decision, Source, Verdict};
pub use record::{EmailRecord, NewEmailRecord, SpamKeyword};
