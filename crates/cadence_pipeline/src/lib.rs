//! # cadence_pipeline
//!
//! Automatic system ordering for per-tick logic over shared component
//! storage.
//!
//! Systems are registered as two-stage functions: a setup stage that runs
//! once and requests capability-scoped accessors from a [`SetupWorld`], and
//! a tick closure that runs every tick using only what setup captured. Each
//! accessor request records the system's access intents; finalizing a
//! pipeline turns those intents into "must run before" edges and sorts them
//! into one deterministic, cycle-checked execution order. Nobody ever
//! declares an ordering by hand.
//!
//! This crate provides:
//!
//! - [`Engine`] — shared storage plus the pipeline factory.
//! - [`SetupWorld`] — the accessor factory handed to system setup stages.
//! - accessors ([`Reader`], [`Writer`], [`Inserter`], …) — typed,
//!   capability-scoped handles to one component lane each.
//! - [`intent`], [`graph`], [`topo`] — declaration recording, edge
//!   construction, and the deterministic topological sort underneath
//!   [`PipelineBuilder::finish`].
//!
//! ## Usage
//!
//! ```rust
//! use cadence_pipeline::{Engine, SetupWorld, TickFn};
//! use cadence_store::Component;
//!
//! #[derive(Debug, Clone, Copy)]
//! struct Position(f32);
//! impl Component for Position {
//!     fn type_name() -> &'static str { "Position" }
//! }
//!
//! fn spawn(world: &mut SetupWorld<'_>) -> TickFn {
//!     let spawner = world.spawner();
//!     let positions = world.inserter::<Position>();
//!     Box::new(move || {
//!         positions.insert(spawner.spawn(), Position(0.0));
//!         Ok(())
//!     })
//! }
//!
//! fn drift(world: &mut SetupWorld<'_>) -> TickFn {
//!     let filter = world.filter::<Position>().build();
//!     let positions = world.writer::<Position>();
//!     Box::new(move || {
//!         for entity in &filter {
//!             positions.get_mut(entity)?.0 += 1.0;
//!         }
//!         Ok(())
//!     })
//! }
//!
//! let engine = Engine::new();
//! let mut update = engine
//!     .new_pipeline("update")
//!     .add_system("drift", drift)
//!     .add_system("spawn", spawn)
//!     .finish()
//!     .expect("no contradictory declarations");
//!
//! // `spawn` initiates Position, so it runs first regardless of
//! // registration order.
//! assert_eq!(update.order(), vec!["spawn", "drift"]);
//! update.run_tick().unwrap();
//! ```

pub mod accessor;
pub mod error;
pub mod graph;
pub mod intent;
pub mod pipeline;
pub mod topo;
pub mod world;

pub use accessor::{Inserter, OptReader, Probe, Reader, Remover, Spawner, Updater, Writer};
pub use error::{AccessError, CycleError, TickError};
pub use graph::Edge;
pub use intent::{Intent, IntentTables, SystemId};
pub use pipeline::{Engine, Pipeline, PipelineBuilder, TickFn};
pub use world::{FilterBuilder, SetupWorld};
