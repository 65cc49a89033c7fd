//=========================================================================
// System Set
//=========================================================================
//
// Insertion-ordered, name-keyed collection of boxed systems.
//
// A single Vec carries both the iteration order and the names, so lookup
// and ordered traversal can never drift apart. States hold a handful of
// systems, which keeps the linear name scan cheap.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::System;

//=== SystemSet ===========================================================

/// Ordered collection of named systems owned by a single state.
#[derive(Default)]
pub struct SystemSet {
    entries: Vec<(String, Box<dyn System>)>,
}

impl SystemSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `system` under `name`.
    ///
    /// Returns `false` and leaves the set untouched if `name` is taken.
    pub fn insert(&mut self, name: impl Into<String>, system: Box<dyn System>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }

        self.entries.push((name, system));
        true
    }

    /// Looks up a system by name.
    pub fn get(&self, name: &str) -> Option<&dyn System> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, system)| &**system)
    }

    /// Looks up a system mutably by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut dyn System> {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, system)) => Some(&mut **system),
            None => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns system names in registration order.
    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(name, system)` pairs in registration order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &dyn System)> + '_ {
        self.entries
            .iter()
            .map(|(name, system)| (name.as_str(), &**system))
    }

    /// Iterates systems mutably in registration order.
    ///
    /// Call `.rev()` for the teardown order.
    pub(crate) fn systems_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = &mut Box<dyn System>> + '_ {
        self.entries.iter_mut().map(|(_, system)| system)
    }
}

impl fmt::Debug for SystemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{journal, Recorder};

    #[test]
    fn insert_preserves_registration_order() {
        let log = journal();
        let mut set = SystemSet::new();

        assert!(set.insert("render", Box::new(Recorder::new("render", &log))));
        assert!(set.insert("audio", Box::new(Recorder::new("audio", &log))));
        assert!(set.insert("input", Box::new(Recorder::new("input", &log))));

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["render", "audio", "input"]);
    }

    #[test]
    fn duplicate_name_is_rejected_and_keeps_original() {
        let log = journal();
        let mut set = SystemSet::new();

        assert!(set.insert("hud", Box::new(Recorder::new("first", &log))));
        assert!(!set.insert("hud", Box::new(Recorder::new("second", &log))));

        assert_eq!(set.len(), 1);
        let hud = set.get("hud").and_then(|s| s.downcast_ref::<Recorder>());
        assert_eq!(hud.map(Recorder::label), Some("first"));
    }

    #[test]
    fn lookup_misses_return_none() {
        let mut set = SystemSet::new();
        assert!(set.is_empty());
        assert!(set.get("missing").is_none());
        assert!(set.get_mut("missing").is_none());
        assert!(!set.contains("missing"));
    }

    #[test]
    fn get_mut_allows_downcast_mutation() {
        let log = journal();
        let mut set = SystemSet::new();
        set.insert("hud", Box::new(Recorder::new("hud", &log)));

        if let Some(recorder) = set.get_mut("hud").and_then(|s| s.downcast_mut::<Recorder>()) {
            recorder.relabel("renamed");
        }

        let hud = set.get("hud").and_then(|s| s.downcast_ref::<Recorder>());
        assert_eq!(hud.map(Recorder::label), Some("renamed"));
    }
}
