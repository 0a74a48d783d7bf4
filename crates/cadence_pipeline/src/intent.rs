//! Access intents and the declaration recorder.
//!
//! Every accessor a system requests during its setup phase records one or
//! more intents: facts of the form "system S performs operation kind K on
//! component type C". The recorder keeps, per component type, one ordered
//! list of systems for each of the five kinds. The graph builder turns those
//! lists into ordering constraints.

use indexmap::IndexMap;

use cadence_store::ComponentTypeId;

/// The kinds of access a system can declare against a component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Creates values of the type (insert).
    Initiates,
    /// Tests for presence of the type (contains, filter terms).
    Checks,
    /// Reads values of the type.
    Reads,
    /// Writes values of the type.
    Mutates,
    /// Removes values of the type.
    Terminates,
}

impl Intent {
    fn index(self) -> usize {
        match self {
            Intent::Initiates => 0,
            Intent::Checks => 1,
            Intent::Reads => 2,
            Intent::Mutates => 3,
            Intent::Terminates => 4,
        }
    }
}

/// Identity of a registered system: an index into the pipeline builder's
/// registration list. Systems are graph nodes; using flat indices keeps the
/// graph free of reference cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub(crate) usize);

impl SystemId {
    /// The position of this system in registration order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The five ordered declaration lists for one component type.
#[derive(Debug)]
pub(crate) struct TypeIntents {
    name: &'static str,
    lists: [Vec<SystemId>; 5],
}

impl TypeIntents {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            lists: Default::default(),
        }
    }

    /// The component type's name, for diagnostics.
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    /// The ordered list of systems that declared `intent` on this type.
    pub(crate) fn list(&self, intent: Intent) -> &[SystemId] {
        &self.lists[intent.index()]
    }
}

/// Accumulates declarations during a pipeline's setup phase.
///
/// Lists preserve call order and are not deduplicated; a system that
/// requests mutable access records both Reads and Mutates, and requesting
/// two accessors of the same kind records the kind twice. Deduplication
/// happens later, on the derived edges.
///
/// The tables are owned by the pipeline builder: they can only be written
/// while the pipeline is still building, and finalization consumes them.
#[derive(Debug, Default)]
pub struct IntentTables {
    by_type: IndexMap<ComponentTypeId, TypeIntents>,
}

impl IntentTables {
    /// Create empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_type: IndexMap::new(),
        }
    }

    /// Record that `system` declared `intent` on the component type.
    pub fn record(
        &mut self,
        system: SystemId,
        type_id: ComponentTypeId,
        type_name: &'static str,
        intent: Intent,
    ) {
        self.by_type
            .entry(type_id)
            .or_insert_with(|| TypeIntents::new(type_name))
            .lists[intent.index()]
            .push(system);
    }

    /// Drop every declaration made by `system`, preserving the relative
    /// order of all other entries. Used when a system is re-registered.
    pub fn purge(&mut self, system: SystemId) {
        for intents in self.by_type.values_mut() {
            for list in &mut intents.lists {
                list.retain(|&s| s != system);
            }
        }
    }

    /// Returns the number of component types with at least one declaration.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.by_type.len()
    }

    /// Iterate over the per-type tables, in first-declaration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TypeIntents> {
        self.by_type.values()
    }
}
