//! Relation filter registry
//!
//! Filters rewrite or prune a [`RelationDescriptor`] after it has been built.
//! They run in registration order; a filter returning `None` ends the chain
//! and the caller gets `None` back.
//!
//! [`RelationFilterRegistry`] is a plain value that callers own and share.
//! A process-wide instance backs the free functions at the bottom of this
//! module.

use super::tree::RelationDescriptor;
use crate::introspect::TypeInfo;
use lazy_static::lazy_static;
use std::sync::{Arc, RwLock};

/// Transform applied to a built relation descriptor
pub type RelationFilter =
    Arc<dyn Fn(&TypeInfo, RelationDescriptor) -> Option<RelationDescriptor> + Send + Sync>;

/// Ordered, lock-guarded list of relation filters
#[derive(Clone, Default)]
pub struct RelationFilterRegistry {
    filters: Arc<RwLock<Vec<RelationFilter>>>,
}

impl std::fmt::Debug for RelationFilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationFilterRegistry").field("filters", &self.len()).finish()
    }
}

impl RelationFilterRegistry {
    pub fn new() -> Self {
        Self { filters: Arc::new(RwLock::new(Vec::new())) }
    }

    /// Append a filter to the chain
    pub fn register<F>(&self, filter: F)
    where
        F: Fn(&TypeInfo, RelationDescriptor) -> Option<RelationDescriptor> + Send + Sync + 'static,
    {
        let mut filters = self.filters.write().unwrap_or_else(|e| e.into_inner());
        filters.push(Arc::new(filter));
        log::debug!("Registered relation filter #{}", filters.len());
    }

    /// Fold every filter over `descriptor`, in registration order
    pub fn apply(
        &self,
        ty: &TypeInfo,
        descriptor: RelationDescriptor,
    ) -> Option<RelationDescriptor> {
        // Snapshot so a filter may itself touch the registry
        let filters: Vec<RelationFilter> =
            self.filters.read().unwrap_or_else(|e| e.into_inner()).clone();

        let mut current = descriptor;
        for (index, filter) in filters.iter().enumerate() {
            match filter(ty, current) {
                Some(next) => current = next,
                None => {
                    log::trace!("Relation filter #{} dropped descriptor for {}", index + 1, ty);
                    return None;
                }
            }
        }
        Some(current)
    }

    /// Remove every filter
    pub fn reset(&self) {
        self.filters.write().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn len(&self) -> usize {
        self.filters.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

lazy_static! {
    static ref GLOBAL_RELATION_FILTERS: RelationFilterRegistry = RelationFilterRegistry::new();
}

/// Process-wide registry used by the free functions
pub fn global_relation_filters() -> &'static RelationFilterRegistry {
    &GLOBAL_RELATION_FILTERS
}

pub fn register_relation_filter<F>(filter: F)
where
    F: Fn(&TypeInfo, RelationDescriptor) -> Option<RelationDescriptor> + Send + Sync + 'static,
{
    GLOBAL_RELATION_FILTERS.register(filter);
}

pub fn apply_relation_filters(
    ty: &TypeInfo,
    descriptor: RelationDescriptor,
) -> Option<RelationDescriptor> {
    GLOBAL_RELATION_FILTERS.apply(ty, descriptor)
}

pub fn reset_relation_filters() {
    GLOBAL_RELATION_FILTERS.reset();
}
