//! An ordered set backed by an order-M B-tree.
//!
//! [`OrderedSet`] stores unique values in a balanced multi-way search tree whose order `M`
//! (the maximum number of children per node) is a const generic parameter. Insertions that
//! overflow a node split it and promote the median; removals that underflow a node borrow from a
//! sibling or merge with it. All leaves stay at the same depth, so every operation visits
//! `O(log_M n)` nodes.
//!
//! # Example
//!
//! ```
//! use mway_set::OrderedSet;
//!
//! let mut set: OrderedSet<i32> = [5, 3, 8].into_iter().collect();
//! assert!(!set.insert(3));
//! assert_eq!(set.erase(&3), 1);
//!
//! assert_eq!(set.lower_bound(&6).peek(), Some(&8));
//! assert_eq!(set.upper_bound(&8).peek(), None);
//! assert_eq!(set.to_string(), "{5,8}");
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Set semantics of `BTreeSet`** - plus `count`, `erase`, `find` and `lower_bound`/`upper_bound`
//!   iterators
//! - **Arena nodes** - nodes are addressed by stable handles; parent links are plain indices
//!
//! # Implementation
//!
//! Keys are stored in both internal nodes and leaves (a classic B-tree, not a B+tree). Each node
//! keeps a non-owning handle to its parent, which the ascending iterator follows instead of
//! maintaining a stack. A key removed from an internal node is replaced by its in-order
//! predecessor.

#![no_std]
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

mod raw;

pub mod ordered_set;

pub use ordered_set::OrderedSet;
