use std::sync::Arc;

use anyhow::Result;

use ventureflow_core::events::{ChangeEvent, EventBus};
use ventureflow_core::ids::CategoryId;
use ventureflow_core::store::{keys, KvStore};
use ventureflow_core::types::Category;

#[derive(Debug, Clone)]
pub struct CategoryService {
    store: Arc<KvStore>,
    events: Arc<EventBus>,
}

impl CategoryService {
    pub fn new(store: Arc<KvStore>, events: Arc<EventBus>) -> Self {
        Self { store, events }
    }

    /// The stored categories, seeding the built-in set on first access.
    pub fn all(&self) -> Result<Vec<Category>> {
        if !self.store.contains(keys::CATEGORIES) {
            let defaults = Category::default_categories();
            self.store.set(keys::CATEGORIES, &defaults)?;
            return Ok(defaults);
        }
        Ok(self.store.get_vec(keys::CATEGORIES))
    }

    pub fn add(&self, category: Category) -> Result<()> {
        let mut categories = self.all()?;
        // Names are unique; re-adding an existing one is a no-op.
        if categories.iter().any(|stored| stored.name == category.name) {
            return Ok(());
        }
        categories.push(category);
        self.store.set(keys::CATEGORIES, &categories)?;
        self.events.post(ChangeEvent::CategoriesChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<()> {
        let mut categories = self.all()?;
        categories.retain(|category| category.id != id);
        self.store.set(keys::CATEGORIES, &categories)?;
        self.events.post(ChangeEvent::CategoriesChanged);
        self.events.post(ChangeEvent::DataChanged);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (tempfile::TempDir, CategoryService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KvStore::open(&dir.path().join("defaults.json")).unwrap());
        (dir, CategoryService::new(store, Arc::new(EventBus::new())))
    }

    #[test]
    fn test_defaults_seeded_on_first_access() {
        let (_dir, service) = service();
        let categories = service.all().unwrap();
        assert_eq!(categories.len(), 4);
        assert!(categories.iter().any(|category| category.name == "Personal"));

        // Seeding happens once; a wiped list stays wiped.
        let survivor = categories[0].clone();
        for category in &categories[1..] {
            service.delete(category.id).unwrap();
        }
        assert_eq!(service.all().unwrap(), vec![survivor]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let (_dir, service) = service();
        service.all().unwrap();
        service.add(Category::new("Work", "000000", "circle")).unwrap();
        assert_eq!(service.all().unwrap().len(), 4);
    }
}
