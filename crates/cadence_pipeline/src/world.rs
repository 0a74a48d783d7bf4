//! The setup-phase world handle.
//!
//! A [`SetupWorld`] is handed to each system factory exactly once, while the
//! pipeline is still building. Every accessor request it serves records the
//! matching intents against the requesting system as a side effect, which is
//! how the pipeline learns what each system touches without anyone declaring
//! anything by hand.
//!
//! The handle is a mutable borrow that ends with the factory call, so there
//! is no way to request accessors from inside a tick closure: the closure
//! can only capture what its factory asked for up front.

use std::rc::Rc;

use cadence_store::{AnyPool, Component, Filter, Store};

use crate::accessor::{Inserter, OptReader, Probe, Reader, Remover, Spawner, Updater, Writer};
use crate::intent::{Intent, IntentTables, SystemId};

/// The accessor factory passed to a system's setup stage.
pub struct SetupWorld<'a> {
    store: Rc<Store>,
    tables: &'a mut IntentTables,
    system: SystemId,
}

impl<'a> SetupWorld<'a> {
    pub(crate) fn new(store: Rc<Store>, tables: &'a mut IntentTables, system: SystemId) -> Self {
        Self {
            store,
            tables,
            system,
        }
    }

    fn record<T: Component>(&mut self, intent: Intent) {
        self.tables
            .record(self.system, T::component_type_id(), T::type_name(), intent);
    }

    /// Request read access to `T`. Records Reads.
    pub fn reader<T: Component>(&mut self) -> Reader<T> {
        self.record::<T>(Intent::Reads);
        Reader::new(self.store.pool())
    }

    /// Request read-write access to `T`. Records Reads and Mutates.
    pub fn writer<T: Component>(&mut self) -> Writer<T> {
        self.record::<T>(Intent::Reads);
        self.record::<T>(Intent::Mutates);
        Writer::new(self.store.pool())
    }

    /// Request update-in-place access to `T`. Records Mutates.
    pub fn updater<T: Component>(&mut self) -> Updater<T> {
        self.record::<T>(Intent::Mutates);
        Updater::new(self.store.pool())
    }

    /// Request insertion access to `T`. Records Initiates.
    pub fn inserter<T: Component>(&mut self) -> Inserter<T> {
        self.record::<T>(Intent::Initiates);
        Inserter::new(self.store.pool())
    }

    /// Request removal access to `T`. Records Terminates.
    pub fn remover<T: Component>(&mut self) -> Remover<T> {
        self.record::<T>(Intent::Terminates);
        Remover::new(self.store.pool())
    }

    /// Request presence-check access to `T`. Records Checks.
    pub fn probe<T: Component>(&mut self) -> Probe<T> {
        self.record::<T>(Intent::Checks);
        Probe::new(self.store.pool())
    }

    /// Request optional read access to `T`. Records Reads and Checks.
    pub fn opt_reader<T: Component>(&mut self) -> OptReader<T> {
        self.record::<T>(Intent::Reads);
        self.record::<T>(Intent::Checks);
        OptReader::new(self.store.pool())
    }

    /// Request the entity creation capability. Records nothing.
    pub fn spawner(&self) -> Spawner {
        Spawner::new(Rc::clone(&self.store))
    }

    /// Start a filter with `T` as its primary included type. Records Checks
    /// for `T` and for every type the builder adds.
    pub fn filter<T: Component>(&mut self) -> FilterBuilder<'_, 'a> {
        self.record::<T>(Intent::Checks);
        let primary: Rc<dyn AnyPool> = self.store.pool::<T>();
        FilterBuilder {
            world: self,
            primary,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl std::fmt::Debug for SetupWorld<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupWorld")
            .field("system", &self.system)
            .finish_non_exhaustive()
    }
}

/// Accumulates include/exclude terms for a [`Filter`], recording a Checks
/// intent for each referenced component type.
pub struct FilterBuilder<'w, 'a> {
    world: &'w mut SetupWorld<'a>,
    primary: Rc<dyn AnyPool>,
    include: Vec<Rc<dyn AnyPool>>,
    exclude: Vec<Rc<dyn AnyPool>>,
}

impl FilterBuilder<'_, '_> {
    /// Also require entities to have `U`.
    #[must_use]
    pub fn with<U: Component>(mut self) -> Self {
        self.world.record::<U>(Intent::Checks);
        self.include.push(self.world.store.pool::<U>());
        self
    }

    /// Require entities to *not* have `U`.
    #[must_use]
    pub fn without<U: Component>(mut self) -> Self {
        self.world.record::<U>(Intent::Checks);
        self.exclude.push(self.world.store.pool::<U>());
        self
    }

    /// Finish the filter.
    #[must_use]
    pub fn build(self) -> Filter {
        Filter::new(self.primary, self.include, self.exclude)
    }
}
