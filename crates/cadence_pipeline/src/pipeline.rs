//! Pipeline lifecycle: registration, finalization, and the tick loop entry
//! point.
//!
//! A pipeline goes through exactly two states. While building, it accepts
//! system registrations; each registration runs the system's factory once
//! against a [`SetupWorld`], recording declarations and capturing the
//! returned tick closure. Finalization builds the dependency graph, sorts
//! it, and freezes the pipeline; from then on it only replays the compiled
//! closure sequence, once per [`Pipeline::run_tick`] call.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, error, info};

use cadence_store::Store;

use crate::error::{AccessError, CycleError, TickError};
use crate::graph;
use crate::intent::{IntentTables, SystemId};
use crate::topo;
use crate::world::SetupWorld;

/// The closure a system factory returns: one tick's worth of work, executed
/// with the accessors captured during setup.
pub type TickFn = Box<dyn FnMut() -> Result<(), AccessError>>;

/// Owns the shared [`Store`] and mints pipelines over it.
///
/// Several pipelines may be built from one engine; they see the same
/// entities and pools but compile and run independently.
#[derive(Debug, Default)]
pub struct Engine {
    store: Rc<Store>,
}

impl Engine {
    /// Create an engine with an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Rc::new(Store::new()),
        }
    }

    /// The shared storage underneath every pipeline of this engine.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Start building a named pipeline.
    #[must_use]
    pub fn new_pipeline(&self, name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder {
            name: name.into(),
            store: Rc::clone(&self.store),
            index: IndexMap::new(),
            slots: Vec::new(),
            tables: IntentTables::new(),
        }
    }
}

struct Slot {
    name: String,
    tick: TickFn,
}

/// A pipeline in its building state: accepts registrations, nothing else.
///
/// Consumed by [`PipelineBuilder::finish`]; there is no way to register into
/// a finalized pipeline or to tick an unfinished one.
pub struct PipelineBuilder {
    name: String,
    store: Rc<Store>,
    /// System name -> arena index, in registration order.
    index: IndexMap<String, SystemId>,
    /// Arena of registered systems; `slots[id.index()]` belongs to `id`.
    slots: Vec<Slot>,
    tables: IntentTables,
}

impl PipelineBuilder {
    /// Register a system.
    ///
    /// The factory runs immediately, exactly once, against a setup handle
    /// that records the system's declarations; the tick closure it returns
    /// is captured for the run phase. Registering a name that already exists
    /// overwrites that system: its previous declarations are discarded, the
    /// new factory runs, and the system keeps its original registration
    /// position.
    #[must_use]
    pub fn add_system<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: FnOnce(&mut SetupWorld<'_>) -> TickFn,
    {
        let name = name.into();
        let id = match self.index.get(&name) {
            Some(&id) => {
                debug!(
                    pipeline = %self.name,
                    system = %name,
                    "system re-registered; prior declarations discarded"
                );
                self.tables.purge(id);
                id
            }
            None => {
                let id = SystemId(self.slots.len());
                self.index.insert(name.clone(), id);
                self.slots.push(Slot {
                    name,
                    tick: Box::new(|| Ok(())),
                });
                id
            }
        };

        let mut world = SetupWorld::new(Rc::clone(&self.store), &mut self.tables, id);
        self.slots[id.index()].tick = factory(&mut world);
        self
    }

    /// Finalize: build the dependency graph, compute the execution order,
    /// and freeze the pipeline.
    ///
    /// The builder is consumed either way. On failure nothing of it
    /// survives; the pipeline must be rebuilt from scratch with fixed
    /// declarations.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] when the declared intents contradict each
    /// other, carrying the unresolved constraints by system name.
    pub fn finish(self) -> Result<Pipeline, CycleError> {
        let edges = graph::build_edges(&self.tables);
        let ids: Vec<SystemId> = (0..self.slots.len()).map(SystemId).collect();

        let order = match topo::sort(&ids, &edges) {
            Ok(order) => order,
            Err(unsortable) => {
                let name_of = |id: &SystemId| self.slots[id.index()].name.clone();
                let err = CycleError {
                    pipeline: self.name.clone(),
                    unresolved: unsortable
                        .unresolved
                        .iter()
                        .map(|e| (name_of(&e.before), name_of(&e.after)))
                        .collect(),
                    roots: unsortable.roots.iter().map(name_of).collect(),
                };
                error!(pipeline = %self.name, %err, "pipeline failed to finalize");
                return Err(err);
            }
        };

        let mut slots: Vec<Option<Slot>> = self.slots.into_iter().map(Some).collect();
        let systems: Vec<Slot> = order
            .iter()
            .map(|id| {
                slots[id.index()]
                    .take()
                    .expect("a successful sort yields each system exactly once")
            })
            .collect();

        info!(
            pipeline = %self.name,
            system_count = systems.len(),
            edge_count = edges.len(),
            type_count = self.tables.type_count(),
            "compiled execution order"
        );
        debug!(
            pipeline = %self.name,
            order = ?systems.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            "execution order"
        );

        Ok(Pipeline {
            name: self.name,
            systems,
        })
    }
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("name", &self.name)
            .field("systems", &self.index.len())
            .finish_non_exhaustive()
    }
}

/// A finalized pipeline: an ordered sequence of tick closures.
pub struct Pipeline {
    name: String,
    systems: Vec<Slot>,
}

impl Pipeline {
    /// The pipeline's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled execution order, as system names.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    /// The number of systems in the pipeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no systems are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Run one tick: every system's closure, strictly in compiled order.
    ///
    /// # Errors
    ///
    /// The first closure failure aborts the remainder of the tick and is
    /// returned wrapped with the failing system's name. There is no
    /// isolation between systems within a tick.
    pub fn run_tick(&mut self) -> Result<(), TickError> {
        debug!(pipeline = %self.name, "tick start");
        for system in &mut self.systems {
            (system.tick)().map_err(|source| TickError {
                system: system.name.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("order", &self.order())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use cadence_store::{Component, Entity};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct CompA(u32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct CompB(u32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct CompC(u32);

    impl Component for CompA {
        fn type_name() -> &'static str {
            "CompA"
        }
    }
    impl Component for CompB {
        fn type_name() -> &'static str {
            "CompB"
        }
    }
    impl Component for CompC {
        fn type_name() -> &'static str {
            "CompC"
        }
    }

    fn noop() -> TickFn {
        Box::new(|| Ok(()))
    }

    #[test]
    fn test_scenario_adder_before_checker_either_registration_order() {
        // AddA initiates CompA; CheckA checks it via a filter. The compiled
        // order must put AddA first no matter who registered first.
        let adder = |world: &mut SetupWorld<'_>| -> TickFn {
            let _inserter = world.inserter::<CompA>();
            noop()
        };
        let checker = |world: &mut SetupWorld<'_>| -> TickFn {
            let _filter = world.filter::<CompA>().build();
            noop()
        };

        let engine = Engine::new();
        let forward = engine
            .new_pipeline("forward")
            .add_system("add_a", adder)
            .add_system("check_a", checker)
            .finish()
            .unwrap();
        assert_eq!(forward.order(), vec!["add_a", "check_a"]);

        let reversed = engine
            .new_pipeline("reversed")
            .add_system("check_a", checker)
            .add_system("add_a", adder)
            .finish()
            .unwrap();
        assert_eq!(reversed.order(), vec!["add_a", "check_a"]);
    }

    #[test]
    fn test_scenario_writer_before_reader() {
        let engine = Engine::new();
        let pipeline = engine
            .new_pipeline("update")
            .add_system("reader", |world| {
                let _reader = world.reader::<CompB>();
                noop()
            })
            .add_system("writer", |world| {
                let _updater = world.updater::<CompB>();
                noop()
            })
            .finish()
            .unwrap();
        assert_eq!(pipeline.order(), vec!["writer", "reader"]);
    }

    #[test]
    fn test_scenario_remover_runs_last() {
        let engine = Engine::new();
        let pipeline = engine
            .new_pipeline("update")
            .add_system("deleter", |world| {
                let _remover = world.remover::<CompC>();
                noop()
            })
            .add_system("user", |world| {
                let _reader = world.reader::<CompC>();
                noop()
            })
            .finish()
            .unwrap();
        assert_eq!(pipeline.order(), vec!["user", "deleter"]);
    }

    #[test]
    fn test_contradictory_declarations_fail_with_cycle_error() {
        // Each system deletes what the other reads, so each must run first.
        let engine = Engine::new();
        let err = engine
            .new_pipeline("update")
            .add_system("s1", |world| {
                let _remover = world.remover::<CompA>();
                let _reader = world.reader::<CompB>();
                noop()
            })
            .add_system("s2", |world| {
                let _remover = world.remover::<CompB>();
                let _reader = world.reader::<CompA>();
                noop()
            })
            .finish()
            .unwrap_err();

        assert_eq!(err.pipeline, "update");
        assert!(err.roots.is_empty());
        let mut unresolved = err.unresolved.clone();
        unresolved.sort();
        assert_eq!(
            unresolved,
            vec![
                ("s1".to_string(), "s2".to_string()),
                ("s2".to_string(), "s1".to_string()),
            ]
        );
    }

    #[test]
    fn test_finalize_is_deterministic() {
        let build = || {
            let engine = Engine::new();
            engine
                .new_pipeline("update")
                .add_system("a", |world| {
                    let _w = world.updater::<CompA>();
                    noop()
                })
                .add_system("b", |world| {
                    let _r = world.reader::<CompA>();
                    let _w = world.updater::<CompB>();
                    noop()
                })
                .add_system("c", |world| {
                    let _r = world.reader::<CompB>();
                    noop()
                })
                .add_system("d", |world| {
                    let _p = world.probe::<CompA>();
                    noop()
                })
                .finish()
                .unwrap()
        };

        let first: Vec<String> = build().order().iter().map(|s| s.to_string()).collect();
        let second: Vec<String> = build().order().iter().map(|s| s.to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reregistration_overwrites_declarations_and_closure() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let engine = Engine::new();
        let log_a = Rc::clone(&log);
        let log_b = Rc::clone(&log);
        let mut pipeline = engine
            .new_pipeline("update")
            // First registration would force `dup` after the reader.
            .add_system("dup", |world| {
                let _r = world.remover::<CompA>();
                noop()
            })
            .add_system("reader", move |world| {
                let _r = world.reader::<CompA>();
                let log = Rc::clone(&log_a);
                Box::new(move || {
                    log.borrow_mut().push("reader");
                    Ok(())
                })
            })
            // Overwrite: `dup` now initiates CompA, so it must run first.
            .add_system("dup", move |world| {
                let _i = world.inserter::<CompA>();
                let log = Rc::clone(&log_b);
                Box::new(move || {
                    log.borrow_mut().push("dup");
                    Ok(())
                })
            })
            .finish()
            .unwrap();

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.order(), vec!["dup", "reader"]);

        pipeline.run_tick().unwrap();
        assert_eq!(*log.borrow(), vec!["dup", "reader"]);
    }

    #[test]
    fn test_run_tick_replays_compiled_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let engine = Engine::new();

        let log_r = Rc::clone(&log);
        let log_w = Rc::clone(&log);
        let mut pipeline = engine
            .new_pipeline("update")
            .add_system("reader", move |world| {
                let _r = world.reader::<CompA>();
                let log = Rc::clone(&log_r);
                Box::new(move || {
                    log.borrow_mut().push("reader");
                    Ok(())
                })
            })
            .add_system("writer", move |world| {
                let _w = world.updater::<CompA>();
                let log = Rc::clone(&log_w);
                Box::new(move || {
                    log.borrow_mut().push("writer");
                    Ok(())
                })
            })
            .finish()
            .unwrap();

        pipeline.run_tick().unwrap();
        pipeline.run_tick().unwrap();
        assert_eq!(
            *log.borrow(),
            vec!["writer", "reader", "writer", "reader"]
        );
    }

    #[test]
    fn test_tick_failure_aborts_remaining_systems() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let engine = Engine::new();

        let log_w = Rc::clone(&log);
        let log_l = Rc::clone(&log);
        let mut pipeline = engine
            .new_pipeline("update")
            .add_system("writer", move |world| {
                let _w = world.inserter::<CompA>();
                let log = Rc::clone(&log_w);
                Box::new(move || {
                    log.borrow_mut().push("writer");
                    Ok(())
                })
            })
            .add_system("broken", |world| {
                let reader = world.reader::<CompA>();
                Box::new(move || {
                    // Entity 999 was never given a CompA.
                    let _ = reader.get(Entity::from_raw(999))?;
                    Ok(())
                })
            })
            .add_system("last", move |world| {
                let _r = world.remover::<CompA>();
                let log = Rc::clone(&log_l);
                Box::new(move || {
                    log.borrow_mut().push("last");
                    Ok(())
                })
            })
            .finish()
            .unwrap();

        let err = pipeline.run_tick().unwrap_err();
        assert_eq!(err.system, "broken");
        // `writer` ran, `last` never did.
        assert_eq!(*log.borrow(), vec!["writer"]);
    }

    #[test]
    fn test_write_then_read_within_one_tick() {
        let engine = Engine::new();
        let store = engine.store();
        let entity = store.create_entity();
        store.pool::<CompA>().insert(entity, CompA(1));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_r = Rc::clone(&seen);

        // Registered reader-first; the compiled order must still let the
        // reader observe the writer's mutation from the same tick.
        let mut pipeline = engine
            .new_pipeline("update")
            .add_system("reader", move |world| {
                let reader = world.reader::<CompA>();
                let seen = Rc::clone(&seen_r);
                Box::new(move || {
                    seen.borrow_mut().push(reader.get(Entity::from_raw(1))?.0);
                    Ok(())
                })
            })
            .add_system("writer", |world| {
                let writer = world.writer::<CompA>();
                Box::new(move || {
                    writer.get_mut(Entity::from_raw(1))?.0 += 10;
                    Ok(())
                })
            })
            .finish()
            .unwrap();

        pipeline.run_tick().unwrap();
        pipeline.run_tick().unwrap();
        assert_eq!(*seen.borrow(), vec![11, 21]);
    }

    #[test]
    fn test_pipelines_share_the_engine_store() {
        let engine = Engine::new();

        let mut update = engine
            .new_pipeline("update")
            .add_system("spawn", |world| {
                let spawner = world.spawner();
                let inserter = world.inserter::<CompA>();
                Box::new(move || {
                    inserter.insert(spawner.spawn(), CompA(0));
                    Ok(())
                })
            })
            .finish()
            .unwrap();

        let counted = Rc::new(RefCell::new(0usize));
        let counted_r = Rc::clone(&counted);
        let mut late = engine
            .new_pipeline("late_update")
            .add_system("count", move |world| {
                let filter = world.filter::<CompA>().build();
                let counted = Rc::clone(&counted_r);
                Box::new(move || {
                    *counted.borrow_mut() = filter.iter().count();
                    Ok(())
                })
            })
            .finish()
            .unwrap();

        update.run_tick().unwrap();
        update.run_tick().unwrap();
        late.run_tick().unwrap();
        assert_eq!(*counted.borrow(), 2);
    }

    #[test]
    fn test_empty_pipeline_finalizes_and_ticks() {
        let engine = Engine::new();
        let mut pipeline = engine.new_pipeline("empty").finish().unwrap();
        assert!(pipeline.is_empty());
        pipeline.run_tick().unwrap();
    }
}
