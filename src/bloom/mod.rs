//! Space-efficient probabilistic data structure for approximate membership queries in a set.

mod classifier;
mod membership_filter;

pub use self::classifier::classify;
pub use self::classifier::Classification;
pub use self::classifier::Status;
pub use self::membership_filter::Candidate;
pub use self::membership_filter::MembershipFilter;
