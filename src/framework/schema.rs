//! # Resource Schema
//!
//! A [`ResourceSchema`] is the immutable description of one resource kind:
//! its local type name, the key transformer, the attributes that get accessors
//! and the relationships it declares. It is built once, registered in a
//! [`Namespace`](crate::lifecycle::Namespace) and shared behind an `Arc` by
//! every entity of that kind.

use crate::framework::inflect::{self, KeyCase};
use serde_json::{Map, Value};

/// How a relationship is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    /// Collection fetched from the target class by foreign-key filter.
    HasMany,
    /// Single record fetched from `{owner path}/{relationship}`.
    BelongsTo,
}

/// One schema edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipDef {
    name: String,
    kind: RelationshipKind,
    target: Option<String>,
    foreign_key: Option<String>,
}

impl RelationshipDef {
    pub fn has_many(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RelationshipKind::HasMany,
            target: None,
            foreign_key: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: RelationshipKind::BelongsTo,
            target: None,
            foreign_key: None,
        }
    }

    /// Resolve to this type name instead of the one derived from the relationship name.
    pub fn target(mut self, type_name: impl Into<String>) -> Self {
        self.target = Some(type_name.into());
        self
    }

    /// Filter key used by has-many resolution. Ignored for belongs-to.
    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    /// Type name of the related class: the explicit target, or
    /// `camelize(singularize(name))` (`line_items` → `LineItem`).
    pub fn target_type_name(&self) -> String {
        match &self.target {
            Some(target) => target.clone(),
            None => inflect::camelize(&inflect::singularize(&self.name)),
        }
    }

    /// Foreign key for has-many filters; defaults to `{owner}_id`.
    pub fn foreign_key_for(&self, owner_type_name: &str) -> String {
        match &self.foreign_key {
            Some(key) => key.clone(),
            None => format!("{}_id", inflect::underscore(owner_type_name)),
        }
    }
}

/// Immutable descriptor of one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    type_name: String,
    resource_type: String,
    key_case: KeyCase,
    attributes: Vec<String>,
    relationships: Vec<RelationshipDef>,
}

impl ResourceSchema {
    /// Start describing the resource kind named `type_name` (e.g. `"Widget"`).
    pub fn builder(type_name: impl Into<String>) -> ResourceSchemaBuilder {
        ResourceSchemaBuilder {
            type_name: type_name.into(),
            key_case: KeyCase::default(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Local type name, the registry key.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Wire-format plural identifier, e.g. `widgets`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Collection path, `/{resource_type}`.
    pub fn resource_path(&self) -> String {
        format!("/{}", self.resource_type)
    }

    pub fn key_case(&self) -> KeyCase {
        self.key_case
    }

    /// Declared attribute names, in declaration order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn relationships(&self) -> &[RelationshipDef] {
        &self.relationships
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDef> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Wire key for one logical attribute name.
    pub fn transform_key(&self, key: &str) -> String {
        self.key_case.apply(key)
    }

    /// Wire-format copy of `params`, every key transformed.
    pub fn transform_keys<K, V, I>(&self, params: I) -> Map<String, Value>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        params
            .into_iter()
            .map(|(k, v)| (self.transform_key(k.as_ref()), v.into()))
            .collect()
    }
}

/// Builder for [`ResourceSchema`].
#[derive(Debug, Clone)]
pub struct ResourceSchemaBuilder {
    type_name: String,
    key_case: KeyCase,
    attributes: Vec<String>,
    relationships: Vec<RelationshipDef>,
}

impl ResourceSchemaBuilder {
    pub fn key_case(mut self, key_case: KeyCase) -> Self {
        self.key_case = key_case;
        self
    }

    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn has_many(self, name: impl Into<String>) -> Self {
        self.relationship(RelationshipDef::has_many(name))
    }

    pub fn belongs_to(self, name: impl Into<String>) -> Self {
        self.relationship(RelationshipDef::belongs_to(name))
    }

    /// Declare a relationship. A later declaration with the same name replaces the earlier one.
    pub fn relationship(mut self, def: RelationshipDef) -> Self {
        self.relationships.retain(|r| r.name != def.name);
        self.relationships.push(def);
        self
    }

    pub fn build(self) -> ResourceSchema {
        let resource_type = self.key_case.apply(&inflect::pluralize(&self.type_name));
        ResourceSchema {
            type_name: self.type_name,
            resource_type,
            key_case: self.key_case,
            attributes: self.attributes,
            relationships: self.relationships,
        }
    }
}
