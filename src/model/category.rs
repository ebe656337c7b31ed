//! Category data model for annotation classes.

use serde::{Deserialize, Serialize};

/// An object class an annotation can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identifier used by the detection format
    pub id: u32,
    /// Display name of the class
    pub name: String,
}

impl Category {
    /// Create a new category with the given ID and name.
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// The set of classes available for the current project.
///
/// Supplied by the project service; the editor only looks names and ids up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Class id for a class name.
    pub fn id_of(&self, name: &str) -> Option<u32> {
        self.categories.iter().find(|c| c.name == name).map(|c| c.id)
    }

    /// Class name for a class id.
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.id_of(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_id() {
        let catalog = CategoryCatalog::new(vec![Category::new(0, "person"), Category::new(3, "car")]);
        assert_eq!(catalog.id_of("car"), Some(3));
        assert_eq!(catalog.name_of(0), Some("person"));
        assert_eq!(catalog.id_of("bicycle"), None);
        assert_eq!(catalog.name_of(7), None);
        assert_eq!(catalog.len(), 2);
    }
}
