pub mod compare;

pub mod rb_map;

pub use rb_map::RbMap;

pub use compare::{Compare, Natural, Reversed};
