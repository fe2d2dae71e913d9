#![deny(missing_docs)]

//! Ordered map backed by a red-black tree, [`collections::RbMap`], with an API similar to [`std::collections::BTreeMap`].

//! # Example
//!
//! ```
//! use rbtree_map::collections::RbMap;
//! let mut m = RbMap::from([(2, "Apple"), (5, "Orange"), (1, "Grape"), (4, "Banana")]);
//! assert!(m.keys().copied().collect::<Vec<_>>() == [1, 2, 4, 5]);
//! m.insert(3, "Three");
//! assert_eq!(m.at(&3), Ok(&"Three"));
//! assert!(m.at(&7).is_err());
//! for (k, v) in m.iter().rev() {
//!     println!("{{{k}, {v}}}");
//! }
//! ```

//!# Features
//!
//! This crate supports the following cargo features:
//! - `serde` : enables serialisation of [`collections::RbMap`] via serde crate.
//! - `unsafe-optim` : Enable unsafe optimisations in release mode.
//! - `cap` : tests report allocated memory using the `cap` allocator.

/// Containers.
pub mod collections;
