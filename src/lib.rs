//! biglist - an indexable sequence with arbitrary-precision index and length.
//!
//! A [`BigList`] is a rope/B-tree hybrid: leaves hold flat runs of elements,
//! internal nodes hold branches plus a prefix-sum index over their lengths.
//! Whole-list and whole-subtree reversal is O(1), and a single copy engine
//! moves ranges between any two positions of one list or of two lists.
//!
//! # Quick Start
//!
//! ```
//! use biglist::{BigList, BigListConfig};
//!
//! // Fan-out 4, leaf size 4: deep trees from few elements.
//! let config = BigListConfig::new(2, 2)?;
//! let mut list = BigList::with_config(config);
//! for i in 0..20u32 {
//!     list.add(i)?;
//! }
//! assert!(list.depth() > 1);
//!
//! list.reverse();
//! assert_eq!(*list.get(0usize)?, 19);
//!
//! list.copy_within(0usize, 10usize, 5usize)?;
//! assert_eq!(*list.get(10usize)?, 19);
//! # Ok::<(), biglist::Error>(())
//! ```

#[macro_use]
mod trace;

pub mod config;
pub mod error;
pub mod profiling;

mod leaf;
mod list;
mod num;

pub use config::BigListConfig;
pub use error::{Error, Result};
pub use ibig::UBig;
pub use list::{BigList, Iter};
