//! An ordered-set container with O(log n) order statistics and range surgery.
//!
//! This crate provides [`TreapSet`], an ordered set built on a randomized
//! self-balancing binary search tree (a treap) whose nodes are augmented with
//! subtree sizes. On top of the classical dictionary operations it offers:
//!
//! - [`choose`](TreapSet::choose) / [`rank`](TreapSet::rank) - O(log n)
//!   access by sorted position and position by key
//! - [`split_by_key`](TreapSet::split_by_key) /
//!   [`split_by_position`](TreapSet::split_by_position) /
//!   [`join_exclusive`](TreapSet::join_exclusive) - O(log n) structural
//!   splits and concatenation
//! - [`extract_range`](TreapSet::extract_range) - O(log n) removal of a whole
//!   run of consecutive positions
//! - [`union`](TreapSet::union) / [`intersection`](TreapSet::intersection) -
//!   set algebra that moves nodes instead of rebuilding them
//!
//! Keys are ordered by a user-supplied strict-less comparator, so structured
//! records can be ranked by any projection of their fields.
//!
//! # Example
//!
//! ```
//! use treapset::TreapSet;
//!
//! let mut heights = TreapSet::new_ord(42);
//! for h in [1710, 1655, 1780, 1602, 1744] {
//!     heights.insert(h);
//! }
//!
//! // Order statistics (O(log n))
//! assert_eq!(heights.choose(0), &1602); // shortest
//! assert_eq!(heights.rank(&1744), Some(3));
//!
//! // Split off the top 40% without touching the other nodes
//! let tall = heights.extract_range(3, 4);
//! assert_eq!(tall.iter().copied().collect::<Vec<_>>(), [1744, 1780]);
//! assert_eq!(heights.len(), 3);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`; the default `std`
//!   feature adds clock-seeded construction ([`TreapSet::new_auto`])
//! - **Deterministic balance for a fixed seed** - Every tree owns a seeded
//!   RNG; replaying the same operations with the same seed rebuilds the same
//!   shape
//! - **O(log n) rank operations** - Subtree-size augmentation is maintained
//!   through every rotation, split, and join
//!
//! # Implementation
//!
//! The treap keeps keys in binary-search-tree order while enforcing a
//! min-heap on random 64-bit priorities, which bounds the expected depth at
//! O(log n) without any rebalancing state. Empty subtrees are a tagged link
//! that reports maximum priority and zero size, so the heap and size
//! arithmetic needs no edge cases at the frontier. Split and join transfer
//! whole subtrees between sets by moving nodes, never by copying them.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod order_statistic;
mod raw;

pub mod treap_set;

pub use order_statistic::Rank;
pub use treap_set::{Cursor, IntoIter, Iter, TreapSet};
