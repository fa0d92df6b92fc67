//! Storage internals of the pool provider.

pub(crate) mod reserve;
pub(crate) mod slot;
