//=========================================================================
// System Factory
//=========================================================================
//
// Registry that turns declared system type names into live systems.
//
// Architecture:
//   register("hud", ctor) → HashMap<String, SystemConstructor>
//                                   ↓
//   create_with_params("hud", params) → Box<dyn System>
//
// The factory has no relationship to any tree. It is consulted while a
// tree is being assembled from a descriptor and can be dropped afterwards.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};
use serde_json::{Map, Value};

//=== Internal Dependencies ===============================================

use super::System;

//=== Types ===============================================================

/// Free-form parameters attached to a system declaration.
pub type SystemParams = Map<String, Value>;

/// Builds a system instance from its declared parameters.
pub type SystemConstructor = Box<dyn Fn(&SystemParams) -> Box<dyn System>>;

//=== SystemFactory =======================================================

/// Maps system type names to constructors.
///
/// # Example
///
/// ```rust
/// use state_tree::prelude::*;
///
/// #[derive(Default)]
/// struct Clock {
///     elapsed: f32,
/// }
///
/// impl System for Clock {
///     fn on_update(&mut self, frame: &mut FrameContext<'_>) {
///         self.elapsed += frame.delta_time();
///     }
/// }
///
/// let mut factory = SystemFactory::new();
/// assert!(factory.register_default::<Clock>("clock"));
/// assert!(factory.create("clock").is_some());
/// assert!(factory.create("missing").is_none());
/// ```
#[derive(Default)]
pub struct SystemFactory {
    constructors: HashMap<String, SystemConstructor>,
}

impl SystemFactory {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Binds `type_name` to `constructor`.
    ///
    /// Returns `false` and keeps the existing binding if `type_name` is
    /// already registered.
    pub fn register<F>(&mut self, type_name: impl Into<String>, constructor: F) -> bool
    where
        F: Fn(&SystemParams) -> Box<dyn System> + 'static,
    {
        let type_name = type_name.into();
        if self.constructors.contains_key(&type_name) {
            warn!("System type {:?} is already registered, keeping existing constructor", type_name);
            return false;
        }

        debug!("Registered system type {:?}", type_name);
        self.constructors.insert(type_name, Box::new(constructor));
        true
    }

    /// Binds `type_name` to `T::default()`, ignoring parameters.
    pub fn register_default<T>(&mut self, type_name: impl Into<String>) -> bool
    where
        T: System + Default,
    {
        self.register(type_name, |_: &SystemParams| -> Box<dyn System> {
            Box::new(T::default())
        })
    }

    /// Removes the binding for `type_name`.
    ///
    /// Returns `false` if nothing was registered under that name.
    pub fn unregister(&mut self, type_name: &str) -> bool {
        let removed = self.constructors.remove(type_name).is_some();
        if removed {
            debug!("Unregistered system type {:?}", type_name);
        }
        removed
    }

    //--- Creation ---------------------------------------------------------

    /// Creates a system of `type_name` with empty parameters.
    pub fn create(&self, type_name: &str) -> Option<Box<dyn System>> {
        self.create_with_params(type_name, &SystemParams::new())
    }

    /// Creates a system of `type_name`, handing `params` to its constructor.
    pub fn create_with_params(
        &self,
        type_name: &str,
        params: &SystemParams,
    ) -> Option<Box<dyn System>> {
        self.constructors
            .get(type_name)
            .map(|constructor| constructor(params))
    }

    //--- Queries ----------------------------------------------------------

    pub fn exists(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Registered type names, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.constructors.keys().map(String::as_str)
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::FrameContext;
    use serde_json::json;

    const TEST_TYPE: &str = "TestFactory";

    #[derive(Default)]
    struct Tally {
        step: i64,
    }

    impl System for Tally {
        fn on_update(&mut self, _frame: &mut FrameContext<'_>) {}
    }

    fn tally_from_params(params: &SystemParams) -> Box<dyn System> {
        let step = params.get("step").and_then(Value::as_i64).unwrap_or(1);
        Box::new(Tally { step })
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn register_rejects_second_binding() {
        let mut factory = SystemFactory::new();

        assert!(factory.register(TEST_TYPE, tally_from_params));
        assert!(!factory.register_default::<Tally>(TEST_TYPE));
        assert_eq!(factory.len(), 1);

        // Original constructor still bound
        let params = json!({ "step": 7 }).as_object().cloned().unwrap_or_default();
        let system = factory.create_with_params(TEST_TYPE, &params).unwrap();
        assert_eq!(system.downcast_ref::<Tally>().unwrap().step, 7);
    }

    #[test]
    fn unregister_only_succeeds_once() {
        let mut factory = SystemFactory::new();

        assert!(!factory.unregister(TEST_TYPE));

        factory.register_default::<Tally>(TEST_TYPE);
        assert!(factory.unregister(TEST_TYPE));
        assert!(!factory.unregister(TEST_TYPE));
        assert!(!factory.exists(TEST_TYPE));
    }

    #[test]
    fn unregister_frees_name_for_new_binding() {
        let mut factory = SystemFactory::new();
        factory.register_default::<Tally>(TEST_TYPE);
        factory.unregister(TEST_TYPE);

        assert!(factory.register(TEST_TYPE, tally_from_params));
    }

    //--- Creation ---------------------------------------------------------

    #[test]
    fn create_unknown_type_returns_none() {
        let factory = SystemFactory::new();
        assert!(factory.create(TEST_TYPE).is_none());
        assert!(factory.is_empty());
    }

    #[test]
    fn create_builds_fresh_instances() {
        let mut factory = SystemFactory::new();
        factory.register(TEST_TYPE, tally_from_params);

        let mut first = factory.create(TEST_TYPE).unwrap();
        let second = factory.create(TEST_TYPE).unwrap();

        first.downcast_mut::<Tally>().unwrap().step = 40;
        assert_eq!(first.downcast_ref::<Tally>().unwrap().step, 40);
        assert_eq!(second.downcast_ref::<Tally>().unwrap().step, 1);
    }

    #[test]
    fn exists_tracks_membership() {
        let mut factory = SystemFactory::new();
        assert!(!factory.exists(TEST_TYPE));

        factory.register_default::<Tally>(TEST_TYPE);
        assert!(factory.exists(TEST_TYPE));

        let names: Vec<&str> = factory.type_names().collect();
        assert_eq!(names, vec![TEST_TYPE]);
    }
}
