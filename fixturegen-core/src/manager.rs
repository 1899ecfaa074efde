//! Generic fixture manager: dummy creation, tracking and cleanup.

use crate::error::{FixtureError, Result};
use crate::fixture::{compare, Comparison, FieldTable};
use crate::gen::ValueGenerator;
use crate::identity::{IdentityScope, Repository};
use crate::introspect::{is_synthetic_identifier, DynamicRecord};
use crate::value::{FieldMap, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Creates fixture objects of one type through a repository and removes
/// every object it created when cleaned up or dropped.
///
/// Scenarios refer to objects either by a real identifier or by a
/// single-letter alias (`"A"`); aliases resolve to the identifiers the
/// repository handed out.
pub struct ObjectManager<R: Repository> {
    scope: IdentityScope<R>,
    table: FieldTable,
    generator: ValueGenerator,
    identifier_field: String,
    created: Vec<String>,
    aliases: HashMap<String, String>,
}

impl<R: Repository> ObjectManager<R> {
    pub fn new(repository: R, table: FieldTable, generator: ValueGenerator) -> Self {
        ObjectManager {
            scope: IdentityScope::new(repository),
            table,
            generator,
            identifier_field: "identifier".to_string(),
            created: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Field a real identifier passed to [`ObjectManager::create_dummy`] is
    /// stored in.
    pub fn with_identifier_field(mut self, field: impl Into<String>) -> Self {
        self.identifier_field = field.into();
        self
    }

    pub fn with_admin_login(mut self, login: impl Into<String>) -> Self {
        self.scope.set_admin_login(login);
        self
    }

    pub fn table(&self) -> &FieldTable {
        &self.table
    }

    pub fn generator_mut(&mut self) -> &mut ValueGenerator {
        &mut self.generator
    }

    pub fn repository(&self) -> &R {
        self.scope.repository()
    }

    /// Identifiers of the objects created so far, oldest first.
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Map an alias to its identifier; real identifiers pass through.
    pub fn resolve(&self, identifier: &str) -> Result<String> {
        if !is_synthetic_identifier(identifier) {
            return Ok(identifier.to_string());
        }
        self.aliases
            .get(identifier)
            .cloned()
            .ok_or_else(|| FixtureError::repository(format!("unknown alias '{}'", identifier)))
    }

    pub fn exists(&self, identifier: &str) -> bool {
        match self.resolve(identifier) {
            Ok(id) => self.scope.repository().exists(&id),
            Err(_) => false,
        }
    }

    /// Create an object with dummy data for every field.
    ///
    /// An alias is remembered for later lookups; a real identifier is stored
    /// in the identifier field.
    pub fn create_dummy(&mut self, identifier: Option<&str>) -> Result<String> {
        let mut fields = self.table.generate_all(&mut self.generator)?;
        if let Some(real) = identifier.filter(|id| !is_synthetic_identifier(id)) {
            fields.insert(self.identifier_field.clone(), Value::from(real));
        }

        let id = self.persist(&fields)?;
        if let Some(alias) = identifier.filter(|id| is_synthetic_identifier(id)) {
            self.aliases.insert(alias.to_string(), id.clone());
        }
        Ok(id)
    }

    /// Create an object from `fields`, generating missing required fields.
    pub fn create(&mut self, fields: FieldMap) -> Result<String> {
        let fields = self.table.complete(&mut self.generator, fields)?;
        self.persist(&fields)
    }

    fn persist(&mut self, fields: &FieldMap) -> Result<String> {
        let id = {
            let mut guard = self.scope.elevate()?;
            guard.repository_mut().create(&self.table.type_name, fields)?
        };
        debug!(type_name = %self.table.type_name, %id, "Created fixture object");
        self.created.push(id.clone());
        Ok(id)
    }

    pub fn get(&self, identifier: &str) -> Result<DynamicRecord> {
        self.scope.repository().load(&self.resolve(identifier)?)
    }

    pub fn update(&mut self, identifier: &str, fields: &FieldMap) -> Result<()> {
        let id = self.resolve(identifier)?;
        let mut guard = self.scope.elevate()?;
        guard.repository_mut().update(&id, fields)?;
        Ok(())
    }

    /// Remove one object, and stop tracking it.
    pub fn remove(&mut self, identifier: &str) -> Result<()> {
        let id = self.resolve(identifier)?;
        {
            let mut guard = self.scope.elevate()?;
            guard.repository_mut().remove(&id)?;
        }
        self.created.retain(|created| *created != id);
        self.aliases.retain(|_, target| *target != id);
        Ok(())
    }

    /// Compare expected field values with the stored object.
    pub fn compare(&self, identifier: &str, expected: &FieldMap) -> Result<Comparison> {
        let actual = self.get(identifier)?;
        compare(expected, &actual)
    }

    /// Remove every created object, newest first, as the admin.
    ///
    /// Keeps going past failures and reports the first one.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.created.is_empty() {
            return Ok(());
        }

        let mut guard = self.scope.elevate()?;
        let mut first_error = None;
        for id in self.created.drain(..).rev() {
            if let Err(err) = guard.repository_mut().remove(&id) {
                warn!(%id, error = %err, "Failed to remove fixture object");
                first_error.get_or_insert(err);
            }
        }
        drop(guard);
        self.aliases.clear();

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<R: Repository> Drop for ObjectManager<R> {
    fn drop(&mut self) {
        if let Err(err) = self.cleanup() {
            warn!(error = %err, "Fixture cleanup failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::ConstraintSet;
    use crate::data::Seed;
    use crate::fixture::FieldRule;
    use crate::identity::testing::MemoryRepository;

    fn table() -> FieldTable {
        FieldTable::new("Folder")
            .with_field(
                "name",
                FieldRule::new("alpha", ConstraintSet::new().with_min(4).with_max(10)),
            )
            .with_field(
                "priority",
                FieldRule::new("integer", ConstraintSet::new().with_min(0).with_max(5)),
            )
            .require("name")
    }

    fn manager(repository: &mut MemoryRepository) -> ObjectManager<&mut MemoryRepository> {
        ObjectManager::new(repository, table(), ValueGenerator::with_seed(Seed::from_u64(3)))
    }

    #[test]
    fn test_create_dummy_runs_as_admin() {
        let mut repository = MemoryRepository::new("anonymous");
        {
            let mut manager = manager(&mut repository);
            let id = manager.create_dummy(None).unwrap();
            let record = manager.get(&id).unwrap();
            assert!(record.get("name").is_some());
            assert!(record.get("priority").is_some());
            assert_eq!(manager.repository().current_user(), "anonymous");
            assert!(manager.repository().writes_by.iter().all(|u| u == "admin"));
        }
        assert!(repository.objects.is_empty());
        assert_eq!(repository.current, "anonymous");
    }

    #[test]
    fn test_aliases_and_real_identifiers() {
        let mut repository = MemoryRepository::new("anonymous");
        let mut manager = manager(&mut repository);

        let id = manager.create_dummy(Some("A")).unwrap();
        assert_eq!(manager.resolve("A").unwrap(), id);
        assert!(manager.exists("A"));
        assert!(!manager.exists("B"));

        let real = manager.create_dummy(Some("news")).unwrap();
        assert_eq!(
            manager.get(&real).unwrap().get("identifier"),
            Some(&Value::from("news"))
        );
    }

    #[test]
    fn test_create_fills_required_fields() {
        let mut repository = MemoryRepository::new("anonymous");
        let mut manager = manager(&mut repository);

        let mut fields = FieldMap::new();
        fields.insert("priority".to_string(), Value::Int(9));
        let id = manager.create(fields).unwrap();

        let mut expected = FieldMap::new();
        expected.insert("priority".to_string(), Value::from("9"));
        assert!(manager.compare(&id, &expected).unwrap().is_match());
        assert!(manager.get(&id).unwrap().get("name").is_some());
    }

    #[test]
    fn test_update_and_remove() {
        let mut repository = MemoryRepository::new("anonymous");
        let mut manager = manager(&mut repository);
        manager.create_dummy(Some("A")).unwrap();

        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), Value::from("Archive"));
        manager.update("A", &fields).unwrap();
        assert_eq!(manager.get("A").unwrap().get("name"), Some(&Value::from("Archive")));

        manager.remove("A").unwrap();
        assert!(manager.created().is_empty());
        assert!(manager.resolve("A").is_err());
    }

    #[test]
    fn test_cleanup_continues_past_failures() {
        let mut repository = MemoryRepository::new("anonymous");
        {
            let mut manager = manager(&mut repository);
            let first = manager.create_dummy(None).unwrap();
            manager.create_dummy(None).unwrap();
            manager.scope.repository_mut().fail_removal_of = Some(first);

            assert!(manager.cleanup().is_err());
            assert!(manager.created().is_empty());
        }
        assert_eq!(repository.objects.len(), 1);
        assert_eq!(repository.current, "anonymous");
    }
}
