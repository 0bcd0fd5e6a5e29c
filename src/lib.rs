//! # sketchbook
//!
//! `sketchbook` contains two space-efficient probabilistic summaries of a stream of string items.
//! Both trade a small, controllable amount of error for memory that does not grow with the number
//! of items seen.
//!
//!  - [`MembershipFilter`](bloom::MembershipFilter) is a Bloom filter. It answers whether an item
//!    was possibly added before (for example, whether a password has already been used) without
//!    storing the items. It never reports an added item as absent.
//!  - [`CardinalityEstimator`](hyperloglog::CardinalityEstimator) is a HyperLogLog. It estimates
//!    the number of distinct items in a stream (for example, distinct client addresses in an
//!    access log).
//!
//! Both are driven by the seeded 32-bit hash in [`hash`].
//!
//! ## Usage
//!
//! ```rust
//! use sketchbook::bloom::MembershipFilter;
//! use sketchbook::hyperloglog::CardinalityEstimator;
//!
//! let mut filter = MembershipFilter::new(1000, 3)?;
//! filter.add("password123");
//! assert!(filter.contains("password123"));
//!
//! let mut estimator = CardinalityEstimator::new(14)?;
//! for address in &["10.0.0.1", "10.0.0.2", "10.0.0.1"] {
//!     estimator.add(address);
//! }
//! assert_eq!(estimator.count().round(), 2.0);
//! # Ok::<(), sketchbook::Error>(())
//! ```
//!
//! ## Features
//!
//!  - `ingest` (default): JSON Lines ingestion in [`ingest`].
//!
//! ## References
//!
//!  - [Space/time trade-offs in hash coding with allowable errors](https://dl.acm.org/citation.cfm?id=362692)
//!  > Bloom, Burton H. 1970. “Space/Time Trade-Offs in Hash Coding with Allowable Errors.” *Commun. ACM* 13 (7). New York, NY, USA: ACM: 422–26. doi:[10.1145/362686.362692](https://doi.org/10.1145/362686.362692).
//!  - [HyperLogLog: the analysis of a near-optimal cardinality estimation algorithm](http://algo.inria.fr/flajolet/Publications/FlFuGaMe07.pdf)
//!  > Flajolet, Philippe, Éric Fusy, Olivier Gandouet, and Frédéric Meunier. 2007. “Hyperloglog: The Analysis of a Near-Optimal Cardinality Estimation Algorithm.” In *IN Aofa ’07: PROCEEDINGS of the 2007 International Conference on Analysis of Algorithms*.

#![warn(missing_docs)]

pub mod bit_vec;
pub mod bloom;
mod error;
pub mod hash;
pub mod hyperloglog;
#[cfg(feature = "ingest")]
pub mod ingest;
pub mod report;

pub use crate::error::{Error, Result};
