//! Execution roster: suite identifier → class.

use std::collections::HashMap;

use super::ClassObject;

/// Ordered registry of runnable suites.
///
/// Suites are identified by their class name. Re-registering a name replaces the class but keeps its position.
#[derive(Debug, Default)]
pub struct Roster {
    order: Vec<String>,
    classes: HashMap<String, ClassObject>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, class: ClassObject) -> &mut Self {
        let id = class.name().to_string();
        if self.classes.insert(id.clone(), class).is_none() {
            self.order.push(id);
        }
        self
    }

    pub fn with_class(mut self, class: ClassObject) -> Self {
        self.register(class);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ClassObject> {
        self.classes.get(id)
    }

    /// Registered identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_keep_registration_order() {
        let roster = Roster::new()
            .with_class(ClassObject::new("Zeta"))
            .with_class(ClassObject::new("Alpha"))
            .with_class(ClassObject::new("Zeta").with_retry(3));

        assert_eq!(roster.ids().collect::<Vec<_>>(), ["Zeta", "Alpha"]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("Zeta").map(ClassObject::retry), Some(3));
        assert!(roster.get("Missing").is_none());
    }
}
