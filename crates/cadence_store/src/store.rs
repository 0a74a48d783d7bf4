//! The pool registry and entity allocation facade.
//!
//! The [`Store`] is the single source of truth for entity IDs and component
//! data. Pools are created lazily, the first time a component type is
//! touched, and live for the lifetime of the store.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::pool::{AnyPool, Pool};

/// Owns the entity allocator and one [`Pool`] per component type touched so
/// far.
///
/// Pool handles are `Rc`-shared: callers keep the handle they are given and
/// reuse it, rather than looking the pool up again on every access.
#[derive(Default)]
pub struct Store {
    allocator: RefCell<EntityAllocator>,
    pools: RefCell<IndexMap<ComponentTypeId, Rc<dyn AnyPool>>>,
}

impl Store {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: RefCell::new(EntityAllocator::new()),
            pools: RefCell::new(IndexMap::new()),
        }
    }

    /// Allocate a fresh entity.
    ///
    /// The entity starts with no components; it becomes meaningful once the
    /// first component is inserted for it.
    pub fn create_entity(&self) -> Entity {
        self.allocator.borrow_mut().allocate()
    }

    /// Returns the number of entities allocated so far.
    #[must_use]
    pub fn entity_count(&self) -> u64 {
        self.allocator.borrow().count()
    }

    /// Returns the pool for component type `T`, creating it if this is the
    /// first time the type is touched.
    ///
    /// # Panics
    ///
    /// Panics if two distinct component types hash to the same
    /// [`ComponentTypeId`] (an FNV-1a name collision).
    #[must_use]
    pub fn pool<T: Component>(&self) -> Rc<Pool<T>> {
        let type_id = T::component_type_id();
        let erased = {
            let mut pools = self.pools.borrow_mut();
            Rc::clone(
                pools
                    .entry(type_id)
                    .or_insert_with(|| Rc::new(Pool::<T>::new())),
            )
        };
        let found = erased.component_name();
        match erased.as_any().downcast::<Pool<T>>() {
            Ok(pool) => pool,
            Err(_) => panic!(
                "component type id collision: `{found}` and `{}` both map to {type_id:?}",
                T::type_name()
            ),
        }
    }

    /// Returns the number of distinct component types touched so far.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.borrow().len()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entities", &self.entity_count())
            .field("pools", &self.pool_count())
            .finish()
    }
}
