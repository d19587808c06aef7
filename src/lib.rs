//! Red-Black tree ordered maps for Rust.
//!
//! This crate provides [`RBTreeMap`], a sorted map whose order comes from a
//! [`Comparator`] supplied at construction rather than from `Ord` on the key,
//! and [`OrderedMap`], the same map behind a single reader/writer lock for
//! shared use across threads. Both offer O(log n) lookup, insertion and removal
//! plus sorted-map navigation:
//!
//! - [`first_key`](RBTreeMap::first_key) / [`last_key`](RBTreeMap::last_key) - the extremes
//! - [`lower_key`](RBTreeMap::lower_key) / [`higher_key`](RBTreeMap::higher_key) - strict predecessor and successor
//! - [`floor_key`](RBTreeMap::floor_key) / [`ceiling_key`](RBTreeMap::ceiling_key) - inclusive variants
//!
//! # Example
//!
//! ```
//! use rbmap::{NaturalOrder, RBTreeMap};
//!
//! let mut map = RBTreeMap::new(NaturalOrder);
//! for key in [5, 1, 9, 3, 7] {
//!     map.insert(key, key * 10);
//! }
//!
//! assert_eq!(map.first_key(), Some(&1));
//! assert_eq!(map.last_key(), Some(&9));
//! assert_eq!(map.lower_key(&5), Some(&3));
//! assert_eq!(map.higher_key(&5), Some(&7));
//! assert_eq!(map.lower_key(&1), None);
//!
//! assert_eq!(map.remove(&5), Some(50));
//! assert!(map.verify().is_ok());
//! ```
//!
//! # Features
//!
//! - **Pluggable ordering** - any `Fn(&K, &K) -> Ordering`, [`NaturalOrder`] or [`ReverseOrder`]
//! - **No unsafe code** - nodes live in an arena and link through indices
//! - **Checked invariants** - [`RBTreeMap::verify`] reports the first broken Red-Black rule
//! - **Coarse-grained sharing** - [`OrderedMap`] readers never observe a half-rebalanced tree
//!
//! # Implementation
//!
//! Every node sits in one arena and stores its `parent`, `left` and `right`
//! links as arena handles. The parent link is what lets insertion and removal
//! repair the tree bottom-up after a change, and since it is only an index it
//! has no bearing on ownership. Removing a node with two children first trades
//! its entry with the in-order successor, so the node physically unlinked always
//! has at most one child.

#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod builder;
mod comparator;
mod error;
mod ordered_map;
mod raw;

pub mod rb_tree_map;

pub use builder::Builder;
pub use comparator::{Comparator, NaturalOrder, ReverseOrder};
pub use error::{Error, InvariantViolation, Result};
pub use ordered_map::OrderedMap;
pub use rb_tree_map::RBTreeMap;
