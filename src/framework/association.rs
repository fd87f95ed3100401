//! # Associations
//!
//! A [`HasMany`] is the memoized result of resolving a has-many relationship
//! on one owner instance. It is owned by that instance alone and participates
//! in its save walk through the [`Persist`] trait.

use crate::framework::error::ResourceError;
use crate::framework::resource::{Resource, ResourceClass};
use async_trait::async_trait;
use std::slice;

/// Anything that can report pending changes and write them back.
///
/// Implemented by [`Resource`] and [`HasMany`]; the owner's save walk
/// recurses through this trait.
#[async_trait]
pub trait Persist: Send {
    /// True if a save would issue at least one request.
    fn is_modified(&self) -> bool;

    /// Write pending changes back, stopping at the first failure.
    async fn save(&mut self) -> Result<(), ResourceError>;
}

/// Records of the target class filtered by the owner's foreign key.
#[derive(Debug)]
pub struct HasMany {
    name: String,
    target: ResourceClass,
    foreign_key: String,
    records: Vec<Resource>,
}

impl HasMany {
    pub(crate) fn new(
        name: &str,
        target: ResourceClass,
        foreign_key: String,
        records: Vec<Resource>,
    ) -> Self {
        Self {
            name: name.to_string(),
            target,
            foreign_key,
            records,
        }
    }

    /// Relationship name on the owner.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &ResourceClass {
        &self.target
    }

    /// Filter key the records were fetched by.
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    pub fn records(&self) -> &[Resource] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Resource] {
        &mut self.records
    }

    pub fn get(&self, index: usize) -> Option<&Resource> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Resource> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Resource> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Resource> {
        self.records.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a HasMany {
    type Item = &'a Resource;
    type IntoIter = slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a mut HasMany {
    type Item = &'a mut Resource;
    type IntoIter = slice::IterMut<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter_mut()
    }
}

#[async_trait]
impl Persist for HasMany {
    fn is_modified(&self) -> bool {
        self.records.iter().any(Resource::is_modified)
    }

    #[tracing::instrument(skip(self), fields(relationship = %self.name))]
    async fn save(&mut self) -> Result<(), ResourceError> {
        for record in &mut self.records {
            Persist::save(record).await?;
        }
        Ok(())
    }
}
