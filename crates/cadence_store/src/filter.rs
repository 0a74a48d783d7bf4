//! Entity filters over included and excluded component types.
//!
//! A [`Filter`] matches every entity that has all of the included component
//! types and none of the excluded ones. Iteration is lazy and restartable:
//! each [`Filter::iter`] call walks the primary pool's dense entity list
//! position by position, probing the remaining pools against live storage.
//! Matches therefore reflect the state of the store at the moment each
//! entity is visited, not a snapshot taken when the filter was built.

use std::rc::Rc;

use crate::entity::Entity;
use crate::pool::AnyPool;

/// A declarative query over component presence and absence.
///
/// The first included type is the *primary* term: its pool's dense list is
/// the candidate sequence, and the other terms narrow it down.
#[derive(Clone)]
pub struct Filter {
    primary: Rc<dyn AnyPool>,
    include: Vec<Rc<dyn AnyPool>>,
    exclude: Vec<Rc<dyn AnyPool>>,
}

impl Filter {
    /// Build a filter from pool handles.
    ///
    /// `include` lists the terms beyond the primary; entities must be present
    /// in every one of them and absent from every pool in `exclude`.
    #[must_use]
    pub fn new(
        primary: Rc<dyn AnyPool>,
        include: Vec<Rc<dyn AnyPool>>,
        exclude: Vec<Rc<dyn AnyPool>>,
    ) -> Self {
        Self {
            primary,
            include,
            exclude,
        }
    }

    /// Start a fresh pass over the matching entities.
    #[must_use]
    pub fn iter(&self) -> FilterIter {
        FilterIter {
            primary: Rc::clone(&self.primary),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            row: 0,
        }
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("primary", &self.primary.component_name())
            .field("include", &self.include.len())
            .field("exclude", &self.exclude.len())
            .finish()
    }
}

impl IntoIterator for &Filter {
    type Item = Entity;
    type IntoIter = FilterIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`Filter`]'s matches.
///
/// The iterator borrows pools only for the duration of each `next()` call,
/// so the body of a `for` loop is free to touch the same pools. Removing
/// from the primary pool mid-pass swap-reorders its dense rows, with the
/// usual sparse-set consequence that the pass may skip the swapped entity.
pub struct FilterIter {
    primary: Rc<dyn AnyPool>,
    include: Vec<Rc<dyn AnyPool>>,
    exclude: Vec<Rc<dyn AnyPool>>,
    row: usize,
}

impl Iterator for FilterIter {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        loop {
            let entity = self.primary.entity_at(self.row)?;
            self.row += 1;
            let included = self.include.iter().all(|p| p.contains(entity));
            let excluded = self.exclude.iter().any(|p| p.contains(entity));
            if included && !excluded {
                return Some(entity);
            }
        }
    }
}
