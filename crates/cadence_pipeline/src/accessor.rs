//! Capability-scoped component accessors.
//!
//! Accessors are what a system's setup stage asks for and what its tick
//! closure captures. Each one is bound to a single component type's pool
//! lane and exposes exactly the operations its access kind permits: a
//! [`Reader`] cannot write, an [`Inserter`] cannot read. Requesting an
//! accessor is what records the system's intents; see
//! [`SetupWorld`](crate::world::SetupWorld).
//!
//! Handles are bound once, during setup, and reused unchanged on every
//! subsequent tick.

use std::cell::{Ref, RefMut};
use std::rc::Rc;

use cadence_store::{Component, Entity, Pool, Store};

use crate::error::AccessError;

fn missing<T: Component>(entity: Entity) -> AccessError {
    AccessError::MissingComponent {
        entity,
        component: T::type_name(),
    }
}

/// Read-only access to one component type.
#[derive(Debug)]
pub struct Reader<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> Reader<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Borrow the component value for `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the entity has no value of this type.
    pub fn get(&self, entity: Entity) -> Result<Ref<'_, T>, AccessError> {
        self.pool.get(entity).ok_or_else(|| missing::<T>(entity))
    }
}

/// Read-write access to one component type.
#[derive(Debug)]
pub struct Writer<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> Writer<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Borrow the component value for `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the entity has no value of this type.
    pub fn get(&self, entity: Entity) -> Result<Ref<'_, T>, AccessError> {
        self.pool.get(entity).ok_or_else(|| missing::<T>(entity))
    }

    /// Mutably borrow the component value for `entity`.
    ///
    /// # Errors
    ///
    /// Fails if the entity has no value of this type.
    pub fn get_mut(&self, entity: Entity) -> Result<RefMut<'_, T>, AccessError> {
        self.pool
            .get_mut(entity)
            .ok_or_else(|| missing::<T>(entity))
    }

    /// Overwrite the value for `entity` in place.
    ///
    /// # Errors
    ///
    /// Fails if the entity has no value of this type.
    pub fn set(&self, entity: Entity, value: T) -> Result<(), AccessError> {
        if self.pool.set(entity, value) {
            Ok(())
        } else {
            Err(missing::<T>(entity))
        }
    }
}

/// Write-only, update-in-place access to one component type.
#[derive(Debug)]
pub struct Updater<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> Updater<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Overwrite the value for `entity` in place.
    ///
    /// # Errors
    ///
    /// Fails if the entity has no value of this type.
    pub fn set(&self, entity: Entity, value: T) -> Result<(), AccessError> {
        if self.pool.set(entity, value) {
            Ok(())
        } else {
            Err(missing::<T>(entity))
        }
    }
}

/// Insertion access to one component type.
#[derive(Debug)]
pub struct Inserter<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> Inserter<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Insert a value for `entity`, overwriting any existing one.
    pub fn insert(&self, entity: Entity, value: T) {
        self.pool.insert(entity, value);
    }
}

/// Removal access to one component type.
///
/// This is the only way any component ever goes away; there is no
/// whole-entity deletion anywhere in the API. An entity disappears by
/// losing its last component.
#[derive(Debug)]
pub struct Remover<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> Remover<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Remove the value for `entity`. Returns `true` if one was present.
    pub fn remove(&self, entity: Entity) -> bool {
        self.pool.remove(entity)
    }
}

/// Presence-check access to one component type.
#[derive(Debug)]
pub struct Probe<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> Probe<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Returns `true` if `entity` has a value of this type.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.pool.contains(entity)
    }
}

/// Optional read access: like [`Reader`] but absence is a value, not an
/// error.
#[derive(Debug)]
pub struct OptReader<T: Component> {
    pool: Rc<Pool<T>>,
}

impl<T: Component> OptReader<T> {
    pub(crate) fn new(pool: Rc<Pool<T>>) -> Self {
        Self { pool }
    }

    /// Borrow the component value for `entity`, or `None` if absent.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<Ref<'_, T>> {
        self.pool.get(entity)
    }

    /// Returns `true` if `entity` has a value of this type.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.pool.contains(entity)
    }
}

/// Entity creation capability.
///
/// Creating an entity touches no component type, so it records no intent;
/// the components a system attaches to the fresh entity are what order it
/// relative to everyone else.
#[derive(Debug)]
pub struct Spawner {
    store: Rc<Store>,
}

impl Spawner {
    pub(crate) fn new(store: Rc<Store>) -> Self {
        Self { store }
    }

    /// Allocate a fresh entity.
    pub fn spawn(&self) -> Entity {
        self.store.create_entity()
    }
}
