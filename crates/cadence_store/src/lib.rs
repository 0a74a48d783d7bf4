//! # cadence_store
//!
//! The storage half of the cadence engine — entities, components, and the
//! per-type pools that hold component values.
//!
//! This crate provides:
//!
//! - [`Component`] trait — the contract all stored data must satisfy.
//! - [`Entity`] — lightweight `u64` entity identifiers.
//! - [`EntityAllocator`] — monotonically increasing ID allocator.
//! - [`Pool`] — sparse-set storage, one pool per component type.
//! - [`Store`] — the pool registry and entity allocation facade.
//! - [`Filter`] — include/exclude queries yielding matching entity IDs.
//!
//! Storage is single-threaded: pools hand out `RefCell` guards, and pool
//! handles are shared via `Rc`. Scheduling of who touches which pool when is
//! the concern of the `cadence_pipeline` crate, not this one.

pub mod component;
pub mod entity;
pub mod filter;
pub mod pool;
pub mod store;

pub use component::{Component, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use filter::{Filter, FilterIter};
pub use pool::{AnyPool, Pool};
pub use store::Store;
