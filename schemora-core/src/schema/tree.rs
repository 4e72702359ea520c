//! Relation tree building
//!
//! Walks relation fields across a type graph and produces a nested
//! [`RelationNode`] tree plus the flattened, dot-joined include paths
//! (`books`, `books.publisher`, ...).
//!
//! Descent stops at any type already on the current path; the repeated type
//! shows up as a leaf (its plain fields, no children) so that self-referential
//! and mutually-referential graphs terminate.

use super::error::SchemaError;
use super::options::ExtractOptions;
use super::policy;
use super::relations;
use crate::introspect::{Introspect, TypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between relation names in an include path
pub const INCLUDE_SEPARATOR: &str = ".";

/// One node of the relation tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationNode {
    /// Record type name
    pub name: String,
    /// Plain property names, in field order
    pub fields: Vec<String>,
    /// Relation name → related node
    pub children: BTreeMap<String, RelationNode>,
}

impl RelationNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new(), children: BTreeMap::new() }
    }

    /// Follow a dot-joined relation path
    pub fn find(&self, path: &str) -> Option<&RelationNode> {
        path.split(INCLUDE_SEPARATOR)
            .try_fold(self, |node, relation| node.children.get(relation))
    }

    pub fn find_mut(&mut self, path: &str) -> Option<&mut RelationNode> {
        path.split(INCLUDE_SEPARATOR)
            .try_fold(self, |node, relation| node.children.get_mut(relation))
    }
}

/// Relation tree and include paths of a root type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub tree: RelationNode,
    /// Ordered, duplicate-free
    pub includes: Vec<String>,
}

impl RelationDescriptor {
    /// Remove a relation (and everything under it) from the tree and include list
    pub fn prune(&mut self, path: &str) -> bool {
        let (parent, relation) = match path.rsplit_once(INCLUDE_SEPARATOR) {
            Some((parent, relation)) => (self.tree.find_mut(parent), relation),
            None => (Some(&mut self.tree), path),
        };
        let removed = parent.and_then(|node| node.children.remove(relation)).is_some();

        let nested = format!("{}{}", path, INCLUDE_SEPARATOR);
        self.includes.retain(|include| include != path && !include.starts_with(&nested));
        removed
    }

    pub fn has_include(&self, path: &str) -> bool {
        self.includes.iter().any(|include| include == path)
    }
}

fn push_unique(includes: &mut Vec<String>, path: String) {
    if !includes.contains(&path) {
        includes.push(path);
    }
}

/// Builds [`RelationDescriptor`]s using the same tag and field rules as the
/// schema extractor
#[derive(Debug, Clone, Default)]
pub struct RelationTreeBuilder {
    options: ExtractOptions,
}

impl RelationTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Build the descriptor for `ty`; `None` is a nil type
    pub fn build(&self, ty: Option<&TypeInfo>) -> crate::Result<RelationDescriptor> {
        let ty = ty.ok_or(SchemaError::NilType)?;
        let root = ty
            .underlying_record()
            .ok_or_else(|| SchemaError::NotARecord { type_name: ty.name().to_string() })?;

        log::debug!("Building relation tree for {}", root.qualified_name());
        let mut path = Vec::new();
        let (tree, includes) = self.build_node(root, &mut path);
        Ok(RelationDescriptor { tree, includes })
    }

    pub fn build_for<T: Introspect>(&self) -> crate::Result<RelationDescriptor> {
        self.build(Some(&T::type_info()))
    }

    fn build_node(&self, ty: &TypeInfo, path: &mut Vec<String>) -> (RelationNode, Vec<String>) {
        let mut node = RelationNode::new(ty.name());
        let mut includes = Vec::new();
        path.push(ty.qualified_name());

        for field in ty.fields() {
            let verdict = policy::evaluate(&field, &self.options);
            if !verdict.participates() {
                continue;
            }

            let Some(relationship) = relations::detect_relationship(&field, &self.options.orm_namespace)
            else {
                node.fields.push(verdict.key);
                continue;
            };

            let target = relations::related_type(&field.ty);
            let relation = verdict.key;
            let (child, child_includes) = if !target.is_record() {
                (RelationNode::new(relationship.related_type_name), Vec::new())
            } else if path.contains(&target.qualified_name()) {
                log::warn!(
                    "Relation cycle {} -> {} truncated at {}",
                    ty.name(),
                    relation,
                    target.qualified_name()
                );
                (self.leaf_node(target), Vec::new())
            } else {
                self.build_node(target, path)
            };

            push_unique(&mut includes, relation.clone());
            for nested in child_includes {
                push_unique(&mut includes, format!("{}{}{}", relation, INCLUDE_SEPARATOR, nested));
            }
            node.children.insert(relation, child);
        }

        path.pop();
        (node, includes)
    }

    /// Node listing a type's plain fields without following its relations
    fn leaf_node(&self, ty: &TypeInfo) -> RelationNode {
        let mut node = RelationNode::new(ty.name());
        for field in ty.fields() {
            let verdict = policy::evaluate(&field, &self.options);
            if verdict.participates()
                && relations::detect_relationship(&field, &self.options.orm_namespace).is_none()
            {
                node.fields.push(verdict.key);
            }
        }
        node
    }
}

/// Build a relation descriptor with default options
pub fn build_relation_descriptor(ty: Option<&TypeInfo>) -> crate::Result<RelationDescriptor> {
    RelationTreeBuilder::new().build(ty)
}
