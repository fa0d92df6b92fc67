//! Public API for framepool.
//!
//! This module contains all user-facing types and functions.
//! Most users only need [`PoolProvider`](provider::PoolProvider),
//! [`PoolConfig`](config::PoolConfig) and the [`Poolable`](poolable::Poolable)
//! trait.

pub mod ambient;
pub mod config;
pub mod context;
pub mod error;
pub mod handle;
pub mod lifecycle;
pub mod notify;
pub mod poolable;
pub mod preset;
pub mod provider;
pub mod stats;
