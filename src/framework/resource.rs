//! # Resources
//!
//! [`ResourceClass`] is the class-level query surface (`create`, `find`,
//! `filter`, `all`) of one resource kind. [`Resource`] is one live record:
//! identity, attributes with dirty tracking, passthrough `meta`/`links`/`relationships`,
//! and lazily resolved, per-instance memoized relationships.
//!
//! ## Save protocol
//!
//! [`Resource::save`] first saves every has-many association already resolved
//! on this instance, in the order they were first accessed. If the entity (or
//! any of those associations) is still modified afterwards, it sends one
//! `PATCH {path}` with only its own modified attributes and replaces its whole
//! local state with the server's response. Nothing local changes before that
//! request succeeds; a failing child stops the walk and leaves the parent unsaved.
//!
//! Resolved associations are not re-fetched after a save: the memo keeps
//! whatever it held when it was first accessed.
//!
//! A `Resource` is not meant to be shared between tasks while it is being
//! mutated; every mutating operation takes `&mut self`.

use crate::framework::association::{HasMany, Persist};
use crate::framework::attributes::AttributeStore;
use crate::framework::error::ResourceError;
use crate::framework::namespace::Namespace;
use crate::framework::schema::{RelationshipDef, RelationshipKind, ResourceSchema};
use crate::framework::serializer::{self, ResourceData, ResourceHash};
use crate::framework::transport::{Method, RequestOptions, Transport};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One resource kind bound to its namespace (and through it, its transport).
#[derive(Clone)]
pub struct ResourceClass {
    schema: Arc<ResourceSchema>,
    namespace: Namespace,
}

impl ResourceClass {
    pub(crate) fn new(schema: Arc<ResourceSchema>, namespace: Namespace) -> Self {
        Self { schema, namespace }
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    pub fn resource_type(&self) -> &str {
        self.schema.resource_type()
    }

    pub fn resource_path(&self) -> String {
        self.schema.resource_path()
    }

    fn transport(&self) -> &dyn Transport {
        self.namespace.transport()
    }

    /// Build a live entity from one response record.
    pub fn instantiate(&self, record: &Value) -> Result<Resource, ResourceError> {
        let data = ResourceData::parse(record)?;
        Ok(Resource::from_data(self.clone(), data))
    }

    /// POST a creation envelope built from `params` (logical names, transformed
    /// to wire keys) and return the entity the server echoes back.
    #[instrument(skip_all, fields(resource_type = %self.resource_type()))]
    pub async fn create<K, V, I>(&self, params: I) -> Result<Resource, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let attributes = self.schema.transform_keys(params);
        let body = serializer::creation_envelope(self.resource_type(), attributes);
        debug!(?body, "Create");

        let response = self
            .transport()
            .request(Method::Post, &self.resource_path(), RequestOptions::with_body(body))
            .await
            .inspect_err(|e| warn!(error = %e, "Create failed"))?;

        let resource = self.instantiate(&response.data)?;
        info!(id = resource.id(), "Created");
        Ok(resource)
    }

    /// GET `{resource_path}/{id}`. A missing record surfaces as the transport's own error.
    #[instrument(skip(self), fields(resource_type = %self.resource_type()))]
    pub async fn find(&self, id: i64) -> Result<Resource, ResourceError> {
        let path = format!("{}/{}", self.resource_path(), id);
        let response = self
            .transport()
            .request(Method::Get, &path, RequestOptions::default())
            .await
            .inspect_err(|e| warn!(error = %e, "Find failed"))?;
        debug!("Found");
        self.instantiate(&response.data)
    }

    /// GET the collection with `filter[key]=value` parameters, in server order.
    ///
    /// Filter keys are query-parameter names and are sent as given, without
    /// the key transformer.
    #[instrument(skip_all, fields(resource_type = %self.resource_type()))]
    pub async fn filter<K, V, I>(&self, filters: I) -> Result<Vec<Resource>, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let filters: Map<String, Value> = filters
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        debug!(?filters, "Filter");

        let mut params = Map::new();
        if !filters.is_empty() {
            params.insert("filter".to_string(), Value::Object(filters));
        }

        let response = self
            .transport()
            .request(Method::Get, &self.resource_path(), RequestOptions::with_params(params))
            .await
            .inspect_err(|e| warn!(error = %e, "Filter failed"))?;

        let resources: Vec<Resource> = ResourceData::parse_many(&response.data)?
            .into_iter()
            .map(|data| Resource::from_data(self.clone(), data))
            .collect();
        debug!(count = resources.len(), "Fetched");
        Ok(resources)
    }

    /// Every record of this kind; `filter` with no filters.
    pub async fn all(&self) -> Result<Vec<Resource>, ResourceError> {
        self.filter(std::iter::empty::<(String, Value)>()).await
    }
}

impl fmt::Debug for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClass")
            .field("type_name", &self.type_name())
            .field("resource_type", &self.resource_type())
            .finish()
    }
}

/// One live record.
#[derive(Debug)]
pub struct Resource {
    class: ResourceClass,
    id: i64,
    store: AttributeStore,
    meta: Map<String, Value>,
    links: Map<String, Value>,
    relationships: Map<String, Value>,
    // Resolved has-many handles, in first-access order. Saved with the owner.
    associations: Vec<HasMany>,
    // Resolved belongs-to targets. Not owned: never saved with the owner.
    parents: Vec<(String, Resource)>,
}

impl Resource {
    pub(crate) fn from_data(class: ResourceClass, data: ResourceData) -> Self {
        let mut resource = Self {
            class,
            id: 0,
            store: AttributeStore::default(),
            meta: Map::new(),
            links: Map::new(),
            relationships: Map::new(),
            associations: Vec::new(),
            parents: Vec::new(),
        };
        resource.load(data);
        resource
    }

    /// Replace identity and state with server data and clear the modified keys.
    /// Resolved relationships are kept as they are.
    fn load(&mut self, data: ResourceData) {
        self.id = data.id;
        self.store.load(data.attributes);
        self.meta = data.meta;
        self.links = data.links;
        self.relationships = data.relationships;
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn class(&self) -> &ResourceClass {
        &self.class
    }

    pub fn resource_type(&self) -> &str {
        self.class.resource_type()
    }

    /// Instance path, `/{resource_type}/{id}`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.class.resource_path(), self.id)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        self.store.attributes()
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn links(&self) -> &Map<String, Value> {
        &self.links
    }

    pub fn relationships(&self) -> &Map<String, Value> {
        &self.relationships
    }

    /// Wire keys set locally since the last load.
    pub fn modified_keys(&self) -> &BTreeSet<String> {
        self.store.modified_keys()
    }

    /// Value of the logical attribute `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.store.get(&self.class.schema().transform_key(name))
    }

    /// Set the logical attribute `name`. Always marks the wire key dirty.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let key = self.class.schema().transform_key(name);
        self.store.set(key, value.into());
    }

    /// True if an attribute was set or a resolved has-many holds a modified record.
    /// Relationships never accessed on this instance are not consulted.
    pub fn is_modified(&self) -> bool {
        self.store.is_modified() || self.associations.iter().any(|a| a.is_modified())
    }

    /// Has-many handles resolved on this instance, in first-access order.
    pub fn associations(&self) -> &[HasMany] {
        &self.associations
    }

    /// Inspection view: `{id, type, attributes, meta?, links?, relationships?}`.
    pub fn to_hash(&self) -> ResourceHash {
        ResourceHash {
            id: self.id,
            resource_type: self.resource_type().to_string(),
            attributes: self.store.attributes().clone(),
            meta: self.meta.clone(),
            links: self.links.clone(),
            relationships: self.relationships.clone(),
        }
    }

    /// Partial-update envelope carrying only the modified attributes.
    pub fn update_envelope(&self) -> Value {
        serializer::update_envelope(self.id, self.resource_type(), self.store.changes())
    }

    fn relationship_def(
        &self,
        name: &str,
        kind: RelationshipKind,
    ) -> Result<RelationshipDef, ResourceError> {
        self.class
            .schema()
            .relationship(name)
            .filter(|def| def.kind() == kind)
            .cloned()
            .ok_or_else(|| ResourceError::UnknownRelationship {
                resource_type: self.resource_type().to_string(),
                name: name.to_string(),
            })
    }

    /// Resolve the has-many relationship `name`, querying the target class on
    /// first access only. Later calls return the same handle.
    #[instrument(skip(self), fields(resource_type = %self.resource_type(), id = self.id))]
    pub async fn has_many(&mut self, name: &str) -> Result<&mut HasMany, ResourceError> {
        if let Some(index) = self.associations.iter().position(|a| a.name() == name) {
            return Ok(&mut self.associations[index]);
        }

        let def = self.relationship_def(name, RelationshipKind::HasMany)?;
        let target = self.class.namespace().class(&def.target_type_name())?;
        let foreign_key = def.foreign_key_for(self.class.type_name());
        debug!(target = target.type_name(), %foreign_key, "Resolving has-many");

        let records = target.filter([(foreign_key.clone(), Value::from(self.id))]).await?;
        let index = self.associations.len();
        self.associations
            .push(HasMany::new(name, target, foreign_key, records));
        Ok(&mut self.associations[index])
    }

    /// Resolve the belongs-to relationship `name` by fetching
    /// `{path}/{name}` on first access only. Later calls return the same record.
    #[instrument(skip(self), fields(resource_type = %self.resource_type(), id = self.id))]
    pub async fn belongs_to(&mut self, name: &str) -> Result<&mut Resource, ResourceError> {
        if let Some(index) = self.parents.iter().position(|(n, _)| n == name) {
            return Ok(&mut self.parents[index].1);
        }

        let def = self.relationship_def(name, RelationshipKind::BelongsTo)?;
        let target = self.class.namespace().class(&def.target_type_name())?;
        let path = format!("{}/{}", self.path(), name);
        debug!(target = target.type_name(), %path, "Resolving belongs-to");

        let response = self
            .class
            .transport()
            .request(Method::Get, &path, RequestOptions::default())
            .await
            .inspect_err(|e| warn!(error = %e, "Belongs-to fetch failed"))?;
        let parent = target.instantiate(&response.data)?;

        let index = self.parents.len();
        self.parents.push((name.to_string(), parent));
        Ok(&mut self.parents[index].1)
    }

    /// Persist local changes; see the module docs for the protocol.
    pub async fn save(&mut self) -> Result<&mut Self, ResourceError> {
        Persist::save(&mut *self).await?;
        Ok(self)
    }
}

#[async_trait]
impl Persist for Resource {
    fn is_modified(&self) -> bool {
        Resource::is_modified(self)
    }

    #[instrument(skip(self), fields(resource_type = %self.resource_type(), id = self.id))]
    async fn save(&mut self) -> Result<(), ResourceError> {
        for association in &mut self.associations {
            association.save().await?;
        }

        if !Resource::is_modified(self) {
            debug!("Clean, nothing to save");
            return Ok(());
        }

        let body = self.update_envelope();
        debug!(?body, "Update");
        let response = self
            .class
            .transport()
            .request(Method::Patch, &self.path(), RequestOptions::with_body(body))
            .await
            .inspect_err(|e| warn!(error = %e, "Update failed"))?;

        let data = ResourceData::parse(&response.data)?;
        self.load(data);
        info!(id = self.id, "Updated");
        Ok(())
    }
}
