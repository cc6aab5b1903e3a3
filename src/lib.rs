//! This crate exposes an unbalanced Binary Search Tree along with the small
//! amount of plumbing needed to drive it from the command line.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and remove stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores the value that
//! was inserted and may have a left and a right child `Node`. The invariants
//! kept by the tree in [`ordered`] are:
//!
//! 1. For every `Node` in the tree, all the `Node`s in its left subtree have a
//!    value less than its own value.
//! 2. For every `Node` in the tree, all the `Node`s in its right subtree have a
//!    value greater than or equal to its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a value takes `O(height)` (where `height` is the longest path
//! from the root `Node` to a leaf `Node`). This tree never rebalances, so the
//! height depends on insertion order: random input gives `O(lg N)` while sorted
//! input degenerates into a list of `N` nodes. Sorted iteration falls out of
//! visiting the left subtree, then the subtree root, then the right subtree.
//!
//! ## Around the tree
//!
//! - [`export`] writes the sorted values one per line and reads such a file back.
//! - [`session`] interprets `insert`/`search`/`delete`/`list`/`export` commands
//!   against a tree and reports the outcome of each one.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod export;
pub mod ordered;
pub mod session;


pub use ordered::Tree;
