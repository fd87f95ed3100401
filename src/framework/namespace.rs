//! # Namespace
//!
//! The registry that binds resource schemas to one transport. Relationship
//! targets are looked up here by type name, so a namespace is validated once
//! at build time: a relationship pointing at an unregistered type fails with
//! [`ResourceError::UnresolvedType`] before any request is made.

use crate::framework::error::ResourceError;
use crate::framework::resource::ResourceClass;
use crate::framework::schema::ResourceSchema;
use crate::framework::transport::Transport;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

struct NamespaceInner {
    transport: Arc<dyn Transport>,
    schemas: HashMap<String, Arc<ResourceSchema>>,
}

/// Immutable set of resource classes sharing one transport binding.
///
/// Cheap to clone; every [`ResourceClass`] holds one.
#[derive(Clone)]
pub struct Namespace {
    inner: Arc<NamespaceInner>,
}

impl Namespace {
    pub fn builder(transport: Arc<dyn Transport>) -> NamespaceBuilder {
        NamespaceBuilder {
            transport,
            schemas: Vec::new(),
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.inner.transport.as_ref()
    }

    /// The class registered under `type_name` (e.g. `"Widget"`).
    pub fn class(&self, type_name: &str) -> Result<ResourceClass, ResourceError> {
        self.inner
            .schemas
            .get(type_name)
            .map(|schema| ResourceClass::new(schema.clone(), self.clone()))
            .ok_or_else(|| ResourceError::UnresolvedType(type_name.to_string()))
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.inner.schemas.contains_key(type_name)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &ResourceSchema> {
        self.inner.schemas.values().map(Arc::as_ref)
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.inner.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Namespace").field("types", &names).finish()
    }
}

/// Collects schemas before freezing them into a [`Namespace`].
pub struct NamespaceBuilder {
    transport: Arc<dyn Transport>,
    schemas: Vec<ResourceSchema>,
}

impl NamespaceBuilder {
    pub fn register(mut self, schema: ResourceSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Freeze the registry, checking every relationship target is registered.
    pub fn build(self) -> Result<Namespace, ResourceError> {
        let mut schemas = HashMap::with_capacity(self.schemas.len());
        for schema in self.schemas {
            let type_name = schema.type_name().to_string();
            debug!(%type_name, resource_type = schema.resource_type(), "Registering");
            if schemas.insert(type_name.clone(), Arc::new(schema)).is_some() {
                warn!(%type_name, "Schema registered twice, keeping the last one");
            }
        }

        for schema in schemas.values() {
            for relationship in schema.relationships() {
                let target = relationship.target_type_name();
                if !schemas.contains_key(&target) {
                    return Err(ResourceError::UnresolvedType(format!(
                        "{target} (relationship `{}` on {})",
                        relationship.name(),
                        schema.type_name()
                    )));
                }
            }
        }

        Ok(Namespace {
            inner: Arc::new(NamespaceInner {
                transport: self.transport,
                schemas,
            }),
        })
    }
}
