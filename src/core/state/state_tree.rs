//=========================================================================
// State Tree
//=========================================================================
//
// Owns every GameState, tracks the active and pending states, and commits
// transitions at tick boundaries.
//
// Transition commit (per update / post_update call):
//   pending.take() → common ancestor(active, pending)
//     → active.exit(ancestor) → active = pending
//     → enter(ancestor) → post_enter(ancestor)
//   repeated while callbacks keep requesting, at most
//   MAXIMUM_STATE_CHANGES times; leftovers wait for the next call.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::forest::StateForest;
use super::{GameState, StateId};
use crate::core::context::{Frame, Transitions};
use crate::core::system::System;

//=== Constants ===========================================================

/// Upper bound on transitions committed by one `commit_state_change` call.
pub const MAXIMUM_STATE_CHANGES: usize = 16;

//=== Lifecycle ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Building,
    Running,
    Destroyed,
}

//=== State Tree ==========================================================

/// Hierarchical state machine over a forest of [`GameState`]s.
///
/// Exactly one state is active at a time. Its whole ancestor chain is
/// updated every tick, root first. Transitions are buffered in a single
/// pending slot and committed at the end of each update pass.
///
/// # Example
///
/// ```rust
/// use state_tree::prelude::*;
///
/// let mut tree = StateTree::new("game");
/// tree.add_state(GameState::new("root"));
/// tree.add_state(GameState::new("Menu").with_parent("root"));
/// tree.add_state(GameState::new("Game").with_parent("root"));
///
/// tree.initialize();
/// tree.request_state_change("Menu");
/// tree.update(Frame::new(1.0 / 60.0, 0));
/// assert_eq!(tree.active_state_name(), Some("Menu"));
///
/// tree.request_state_change("Game");
/// tree.update(Frame::new(1.0 / 60.0, 1));
/// assert_eq!(tree.active_state_name(), Some("Game"));
///
/// tree.destroy();
/// ```
pub struct StateTree {
    name: String,
    forest: StateForest,
    active: Option<StateId>,
    pending: Option<StateId>,
    lifecycle: Lifecycle,
}

impl StateTree {
    //--- Construction -----------------------------------------------------

    /// Creates an empty tree with no active state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            forest: StateForest::new(),
            active: None,
            pending: None,
            lifecycle: Lifecycle::Building,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `state` under its own name.
    ///
    /// Returns `false` if the name is taken or if the declared parent chain
    /// would loop back to `state`. Parent links are resolved here, whichever
    /// of parent and child is registered first.
    pub fn add_state(&mut self, state: GameState) -> bool {
        if self.lifecycle != Lifecycle::Building {
            warn!("State {:?} added after initialization", state.name());
        }
        self.forest.insert(state).is_some()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Initializes every root state, which recurses into its subtree.
    ///
    /// Runs once; later calls are ignored.
    pub fn initialize(&mut self) {
        if self.lifecycle != Lifecycle::Building {
            warn!("State tree {:?} is already initialized", self.name);
            return;
        }

        debug!("Initializing state tree {:?} ({} states)", self.name, self.forest.len());
        for root in self.forest.roots() {
            self.forest.initialize(root, &self.name);
        }
        self.lifecycle = Lifecycle::Running;
    }

    /// Destroys every root state, children before parents.
    ///
    /// Runs once, and only after [`initialize`]; a tree that was never
    /// initialized has no systems to tear down and is left untouched.
    ///
    /// [`initialize`]: StateTree::initialize
    pub fn destroy(&mut self) {
        match self.lifecycle {
            Lifecycle::Building => {
                warn!("State tree {:?} was never initialized, skipping destroy", self.name);
                return;
            }
            Lifecycle::Destroyed => {
                warn!("State tree {:?} is already destroyed", self.name);
                return;
            }
            Lifecycle::Running => {}
        }

        debug!("Destroying state tree {:?}", self.name);
        for root in self.forest.roots() {
            self.forest.destroy(root);
        }
        self.lifecycle = Lifecycle::Destroyed;
    }

    //--- Update Loop ------------------------------------------------------

    /// Updates the active branch, then commits any pending transition.
    pub fn update(&mut self, frame: Frame) {
        if let Some(active) = self.active {
            self.forest.update(active, frame, &mut self.pending);
        }

        self.commit_state_change();
    }

    /// Post-update pass over the active branch, then commits again.
    pub fn post_update(&mut self, frame: Frame) {
        if let Some(active) = self.active {
            self.forest.post_update(active, frame, &mut self.pending);
        }

        self.commit_state_change();
    }

    //--- Transition Processing --------------------------------------------

    /// Makes `name` the next commit target, replacing any earlier request.
    ///
    /// Unknown names are ignored and return `false`.
    pub fn request_state_change(&mut self, name: &str) -> bool {
        Transitions::new(self.forest.index(), &mut self.pending).request_state_change(name)
    }

    /// Commits pending transitions, returning how many changed the active state.
    ///
    /// Called automatically at the end of [`update`] and [`post_update`].
    /// Requests raised by exit / enter callbacks are committed in the same
    /// call, up to [`MAXIMUM_STATE_CHANGES`] iterations; anything still
    /// pending after that stays queued for the next call.
    ///
    /// [`update`]: StateTree::update
    /// [`post_update`]: StateTree::post_update
    pub fn commit_state_change(&mut self) -> usize {
        let mut iterations = 0;
        let mut committed = 0;

        while iterations < MAXIMUM_STATE_CHANGES {
            // Cleared before any callback runs so re-entrant requests survive
            let Some(target) = self.pending.take() else {
                break;
            };
            iterations += 1;

            if Some(target) == self.active {
                debug!("State {:?} is already active, skipping", self.forest.name_of(target).unwrap_or_default());
                continue;
            }

            let ancestor = self.forest.find_common_ancestor(self.active, Some(target));
            debug!(
                "Transition {:?} -> {:?} (common ancestor: {:?})",
                self.active.and_then(|id| self.forest.name_of(id)),
                self.forest.name_of(target).unwrap_or_default(),
                ancestor.and_then(|id| self.forest.name_of(id)),
            );

            if let Some(previous) = self.active {
                self.forest.exit(previous, ancestor, &mut self.pending);
            }

            self.active = Some(target);
            self.forest.enter(target, ancestor, &mut self.pending);
            self.forest.post_enter(target, ancestor, &mut self.pending);

            committed += 1;
        }

        if let Some(deferred) = self.pending {
            if iterations >= MAXIMUM_STATE_CHANGES {
                warn!(
                    "Transition budget of {} exhausted, deferring {:?} to the next commit",
                    MAXIMUM_STATE_CHANGES,
                    self.forest.name_of(deferred).unwrap_or_default()
                );
            }
        }

        committed
    }

    //--- Ancestry ---------------------------------------------------------

    /// Boundary state for a transition between `a` and `b`.
    ///
    /// `None` when either side is absent or they share no ancestor found by
    /// the lockstep parent scan.
    pub fn find_common_ancestor(&self, a: Option<StateId>, b: Option<StateId>) -> Option<StateId> {
        self.forest.find_common_ancestor(a, b)
    }

    /// True if `candidate` is `state` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, state: StateId, candidate: StateId) -> bool {
        self.forest.is_ancestor_or_self(state, candidate)
    }

    //--- Queries ----------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.forest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forest.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forest.id_of(name).is_some()
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.forest.id_of(name)
    }

    pub fn state(&self, name: &str) -> Option<&GameState> {
        self.forest.id_of(name).and_then(|id| self.forest.get(id))
    }

    pub fn state_by_id(&self, id: StateId) -> Option<&GameState> {
        self.forest.get(id)
    }

    /// All states in registration order.
    pub fn states(&self) -> impl Iterator<Item = &GameState> + '_ {
        self.forest.iter().map(|(_, state)| state)
    }

    pub fn active_state(&self) -> Option<StateId> {
        self.active
    }

    pub fn active_state_name(&self) -> Option<&str> {
        self.active.and_then(|id| self.forest.name_of(id))
    }

    pub fn pending_state(&self) -> Option<StateId> {
        self.pending
    }

    pub fn pending_state_name(&self) -> Option<&str> {
        self.pending.and_then(|id| self.forest.name_of(id))
    }

    /// Resolved parent name of `name`.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        let id = self.forest.id_of(name)?;
        self.forest.parent(id).and_then(|parent| self.forest.name_of(parent))
    }

    /// Child names of `name` in registration order; empty if unknown.
    pub fn children_of(&self, name: &str) -> Vec<&str> {
        self.state(name)
            .map(|state| {
                state
                    .children()
                    .iter()
                    .filter_map(|&child| self.forest.name_of(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Resolves `system` on `state`, falling back through its ancestors.
    ///
    /// A system on a descendant shadows a same-named one on an ancestor.
    pub fn find_system(&self, state: &str, system: &str) -> Option<&dyn System> {
        let id = self.forest.id_of(state)?;
        self.forest.find_system(id, system)
    }

    pub fn find_system_mut(&mut self, state: &str, system: &str) -> Option<&mut dyn System> {
        let id = self.forest.id_of(state)?;
        self.forest.find_system_mut(id, system)
    }

    /// Attaches `system` to an already registered state.
    ///
    /// Returns `false` for unknown states and duplicate system names.
    pub fn add_system(&mut self, state: &str, name: impl Into<String>, system: Box<dyn System>) -> bool {
        if self.lifecycle != Lifecycle::Building {
            warn!("System added to {:?} after initialization", state);
        }
        let Some(id) = self.forest.id_of(state) else {
            return false;
        };
        self.forest
            .get_mut(id)
            .map(|target| target.add_system(name, system))
            .unwrap_or(false)
    }
}

impl Default for StateTree {
    fn default() -> Self {
        Self::new("")
    }
}

impl fmt::Debug for StateTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTree")
            .field("name", &self.name)
            .field("states", &self.states().map(GameState::name).collect::<Vec<_>>())
            .field("active", &self.active_state_name())
            .field("pending", &self.pending_state_name())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

//=== Tests ===============================================================
