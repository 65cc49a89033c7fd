//=========================================================================
// Game State
//=========================================================================
//
// A single node of the state tree and the systems attached to it.
//
// A GameState only knows its own systems plus the id links the owning
// forest resolves (parent, children). Passes that walk the hierarchy
// (enter, exit, update, ...) live on the forest; this type runs the
// per-node part of each pass over its own systems.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::StateId;
use crate::core::context::{FrameContext, InitContext, Transitions};
use crate::core::system::{System, SystemSet};

//=== GameState ===========================================================

/// A named node in the state tree owning an ordered set of systems.
///
/// The parent is declared by name before the state is handed to
/// [`StateTree::add_state`]; the tree resolves it into an id link.
///
/// # Example
///
/// ```rust
/// use state_tree::prelude::*;
///
/// struct Hud;
/// impl System for Hud {
///     fn on_update(&mut self, _frame: &mut FrameContext<'_>) {}
/// }
///
/// let mut tree = StateTree::new("game");
/// tree.add_state(GameState::new("root"));
/// tree.add_state(GameState::new("Menu").with_parent("root").with_system("hud", Hud));
///
/// assert_eq!(tree.parent_of("Menu"), Some("root"));
/// ```
///
/// [`StateTree::add_state`]: super::StateTree::add_state
#[derive(Debug)]
pub struct GameState {
    name: String,
    parent_name: Option<String>,
    pub(super) parent: Option<StateId>,
    pub(super) children: Vec<StateId>,
    systems: SystemSet,
}

impl GameState {
    //--- Construction -----------------------------------------------------

    /// Creates a parentless state with no systems.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_name: None,
            parent: None,
            children: Vec::new(),
            systems: SystemSet::new(),
        }
    }

    /// Declares the parent state by name.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    /// Attaches `system` under `name`, logging and dropping duplicates.
    pub fn with_system<T: System>(mut self, name: impl Into<String>, system: T) -> Self {
        let name = name.into();
        if !self.add_system(name.clone(), Box::new(system)) {
            warn!("State {:?} already has a system named {:?}", self.name, name);
        }
        self
    }

    //--- Systems ----------------------------------------------------------

    /// Appends `system` under `name`.
    ///
    /// Returns `false` and leaves the state untouched if this state already
    /// holds a system with that name. Ancestors are not consulted.
    pub fn add_system(&mut self, name: impl Into<String>, system: Box<dyn System>) -> bool {
        self.systems.insert(name, system)
    }

    /// Looks up a system on this state only.
    ///
    /// Use [`StateTree::find_system`] to fall back to ancestors.
    ///
    /// [`StateTree::find_system`]: super::StateTree::find_system
    pub fn local_system(&self, name: &str) -> Option<&dyn System> {
        self.systems.get(name)
    }

    pub fn local_system_mut(&mut self, name: &str) -> Option<&mut dyn System> {
        self.systems.get_mut(name)
    }

    pub fn systems(&self) -> &SystemSet {
        &self.systems
    }

    //--- Accessors --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent name as declared, resolved or not.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Resolved parent link; `None` for roots and for unregistered parents.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Resolved children in registration order.
    pub fn children(&self) -> &[StateId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    //--- Per-Node Passes --------------------------------------------------

    pub(super) fn initialize_systems(&mut self, tree: &str, id: StateId) {
        let context = InitContext::new(tree, &self.name, id);
        for system in self.systems.systems_mut() {
            system.on_initialize(&context);
        }
    }

    pub(super) fn destroy_systems(&mut self) {
        for system in self.systems.systems_mut().rev() {
            system.on_destroy();
        }
    }

    pub(super) fn activate_systems(&mut self, transitions: &mut Transitions<'_>) {
        for system in self.systems.systems_mut() {
            system.on_activate(transitions);
        }
    }

    pub(super) fn post_activate_systems(&mut self, transitions: &mut Transitions<'_>) {
        for system in self.systems.systems_mut() {
            system.on_post_activate(transitions);
        }
    }

    pub(super) fn deactivate_systems(&mut self, transitions: &mut Transitions<'_>) {
        for system in self.systems.systems_mut().rev() {
            system.on_deactivate(transitions);
        }
    }

    pub(super) fn update_systems(&mut self, frame: &mut FrameContext<'_>) {
        for system in self.systems.systems_mut() {
            system.on_update(frame);
        }
    }

    pub(super) fn post_update_systems(&mut self, frame: &mut FrameContext<'_>) {
        for system in self.systems.systems_mut() {
            system.on_post_update(frame);
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::context::Frame;
    use crate::core::testing::{count, journal, Recorder};

    const TEST_NAME: &str = "Test";
    const TEST_SYSTEM_NAME: &str = "TestSystem";

    #[test]
    fn new_state_is_parentless() {
        let state = GameState::new(TEST_NAME);

        assert_eq!(state.name(), TEST_NAME);
        assert!(state.parent_name().is_none());
        assert!(state.is_root());
        assert!(state.children().is_empty());
        assert!(state.systems().is_empty());
    }

    #[test]
    fn with_parent_records_declared_name() {
        let state = GameState::new(TEST_NAME).with_parent("root");

        assert_eq!(state.parent_name(), Some("root"));
        // Not linked until registered with a tree
        assert!(state.parent().is_none());
    }

    #[test]
    fn add_system_is_findable_locally() {
        let log = journal();
        let mut state = GameState::new(TEST_NAME);

        assert!(state.add_system(TEST_SYSTEM_NAME, Box::new(Recorder::new("a", &log))));

        let found = state
            .local_system(TEST_SYSTEM_NAME)
            .and_then(|s| s.downcast_ref::<Recorder>());
        assert_eq!(found.map(Recorder::label), Some("a"));
    }

    #[test]
    fn add_system_rejects_duplicate_name() {
        let log = journal();
        let mut state = GameState::new(TEST_NAME);

        assert!(state.add_system(TEST_SYSTEM_NAME, Box::new(Recorder::new("a", &log))));
        assert!(!state.add_system(TEST_SYSTEM_NAME, Box::new(Recorder::new("b", &log))));

        let found = state
            .local_system(TEST_SYSTEM_NAME)
            .and_then(|s| s.downcast_ref::<Recorder>());
        assert_eq!(found.map(Recorder::label), Some("a"));
        assert_eq!(state.systems().len(), 1);
    }

    #[test]
    fn with_system_drops_duplicate() {
        let log = journal();
        let state = GameState::new(TEST_NAME)
            .with_system("x", Recorder::new("a", &log))
            .with_system("x", Recorder::new("b", &log));

        assert_eq!(state.systems().len(), 1);
    }

    #[test]
    fn initialize_touches_only_init() {
        let log = journal();
        let mut state = GameState::new(TEST_NAME).with_system(TEST_SYSTEM_NAME, Recorder::new("s", &log));

        state.initialize_systems("tree", StateId::new(0));

        assert_eq!(count(&log, "s:init"), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn destroy_runs_in_reverse_registration_order() {
        let log = journal();
        let mut state = GameState::new(TEST_NAME)
            .with_system("first", Recorder::new("first", &log))
            .with_system("second", Recorder::new("second", &log));

        state.destroy_systems();

        assert_eq!(*log.borrow(), vec!["second:destroy", "first:destroy"]);
    }

    #[test]
    fn branch_passes_follow_registration_order() {
        let log = journal();
        let mut state = GameState::new(TEST_NAME)
            .with_system("a", Recorder::new("a", &log))
            .with_system("b", Recorder::new("b", &log));

        let index = HashMap::new();
        let mut pending = None;

        state.activate_systems(&mut Transitions::new(&index, &mut pending));
        state.post_activate_systems(&mut Transitions::new(&index, &mut pending));
        let frame = Frame::new(0.5, 3);
        state.update_systems(&mut FrameContext::new(frame, Transitions::new(&index, &mut pending)));
        state.post_update_systems(&mut FrameContext::new(frame, Transitions::new(&index, &mut pending)));
        state.deactivate_systems(&mut Transitions::new(&index, &mut pending));

        assert_eq!(
            *log.borrow(),
            vec![
                "a:activate",
                "b:activate",
                "a:post_activate",
                "b:post_activate",
                "a:update",
                "b:update",
                "a:post_update",
                "b:post_update",
                "b:deactivate",
                "a:deactivate",
            ]
        );
    }
}
