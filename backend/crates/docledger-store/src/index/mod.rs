//! Secondary index support.

pub mod secondary_index;

pub use secondary_index::SecondaryIndex;
