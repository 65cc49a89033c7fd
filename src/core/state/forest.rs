//=========================================================================
// State Forest
//=========================================================================
//
// Arena of every GameState in a tree plus the passes that walk it.
//
// Architecture:
//   states: Vec<GameState>            StateId = position in the Vec
//   index:  HashMap<String, StateId>  name lookup, also lent to Transitions
//
// Branch passes run over a state and its ancestors up to (not including)
// a boundary state. The state itself always runs, even as the boundary:
//   enter / post_enter:  boundary-side first, target last
//   exit:                target first, boundary-side last
//   update / post_update: whole chain, root first
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{GameState, StateId};
use crate::core::context::{Frame, FrameContext, Transitions};
use crate::core::system::System;

//=== StateForest =========================================================

#[derive(Debug, Default)]
pub(super) struct StateForest {
    states: Vec<GameState>,
    index: HashMap<String, StateId>,
}

impl StateForest {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            index: HashMap::new(),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `state` and resolves parent links in both directions.
    ///
    /// Fails on a duplicate name or when the declared parent chain leads
    /// back to `state` itself.
    pub fn insert(&mut self, mut state: GameState) -> Option<StateId> {
        if self.index.contains_key(state.name()) {
            warn!("State {:?} is already registered", state.name());
            return None;
        }

        if self.would_cycle(&state) {
            warn!("State {:?} would close a parent cycle, rejecting", state.name());
            return None;
        }

        let id = StateId::new(self.states.len());

        // Link upwards when the parent is already known
        state.parent = state.parent_name().and_then(|parent| self.index.get(parent).copied());
        if let Some(parent) = state.parent {
            self.states[parent.index()].children.push(id);
        }

        // Adopt states registered earlier that named this one as parent
        let orphans: Vec<StateId> = self
            .states
            .iter()
            .enumerate()
            .filter(|(_, other)| other.parent.is_none() && other.parent_name() == Some(state.name()))
            .map(|(index, _)| StateId::new(index))
            .collect();
        for orphan in &orphans {
            self.states[orphan.index()].parent = Some(id);
        }
        state.children.extend(orphans);

        debug!("Registered state {:?} as {:?}", state.name(), id);
        self.index.insert(state.name().to_string(), id);
        self.states.push(state);
        Some(id)
    }

    /// True if linking `state` would make it its own ancestor.
    fn would_cycle(&self, state: &GameState) -> bool {
        let mut cursor = state.parent_name();
        let mut steps = 0;

        while let Some(name) = cursor {
            if name == state.name() {
                return true;
            }
            // Names past the first unregistered one cannot close a loop yet
            let Some(&id) = self.index.get(name) else {
                return false;
            };
            cursor = self.states[id.index()].parent_name();

            steps += 1;
            if steps > self.states.len() {
                return true;
            }
        }

        false
    }

    //--- Queries ----------------------------------------------------------

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn id_of(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: StateId) -> Option<&GameState> {
        self.states.get(id.index())
    }

    pub fn get_mut(&mut self, id: StateId) -> Option<&mut GameState> {
        self.states.get_mut(id.index())
    }

    /// Ids from another tree that fall outside this arena resolve to `None`.
    pub fn name_of(&self, id: StateId) -> Option<&str> {
        self.get(id).map(GameState::name)
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.get(id).and_then(|state| state.parent)
    }

    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    pub fn index(&self) -> &HashMap<String, StateId> {
        &self.index
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &GameState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (StateId::new(index), state))
    }

    /// Roots in registration order.
    pub fn roots(&self) -> Vec<StateId> {
        self.iter()
            .filter(|(_, state)| state.is_root())
            .map(|(id, _)| id)
            .collect()
    }

    //--- Ancestry ---------------------------------------------------------

    /// True if `candidate` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, id: StateId, candidate: StateId) -> bool {
        let mut cursor = Some(id).filter(|&id| self.contains(id));
        while let Some(current) = cursor {
            if current == candidate {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Boundary for a transition between `a` and `b`.
    ///
    /// `None` when either side is absent or the two states share no
    /// ancestor reachable by stepping both parent cursors in lockstep; exit
    /// and enter then run all the way to their roots.
    pub fn find_common_ancestor(&self, a: Option<StateId>, b: Option<StateId>) -> Option<StateId> {
        let a = a.filter(|&id| self.contains(id))?;
        let b = b.filter(|&id| self.contains(id))?;
        if a == b {
            return Some(a);
        }

        let mut scan_a = self.parent(a);
        let mut scan_b = self.parent(b);

        while let (Some(rung_a), Some(rung_b)) = (scan_a, scan_b) {
            if self.is_ancestor_or_self(b, rung_a) {
                return Some(rung_a);
            }
            if self.is_ancestor_or_self(a, rung_b) {
                return Some(rung_b);
            }

            scan_a = self.parent(rung_a);
            scan_b = self.parent(rung_b);
        }

        None
    }

    /// `id` itself, then its ancestors up to (not including) `boundary`.
    ///
    /// The state's own systems always take part, even when `id` is the
    /// boundary; only the parent walk stops there.
    fn branch(&self, id: StateId, boundary: Option<StateId>) -> Vec<StateId> {
        let mut chain = vec![id];
        let mut cursor = self.parent(id);

        while let Some(current) = cursor {
            if Some(current) == boundary {
                break;
            }
            chain.push(current);
            cursor = self.parent(current);
        }

        chain
    }

    /// Resolves `name` on `id`, then on each ancestor in turn.
    pub fn find_system(&self, id: StateId, name: &str) -> Option<&dyn System> {
        let owner = self.system_owner(id, name)?;
        self.states[owner.index()].local_system(name)
    }

    pub fn find_system_mut(&mut self, id: StateId, name: &str) -> Option<&mut dyn System> {
        let owner = self.system_owner(id, name)?;
        self.states[owner.index()].local_system_mut(name)
    }

    fn system_owner(&self, id: StateId, name: &str) -> Option<StateId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.states[current.index()].systems().contains(name) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    //--- Setup & Teardown -------------------------------------------------

    /// Initializes the systems of `id`, then each child subtree in order.
    pub fn initialize(&mut self, id: StateId, tree: &str) {
        let state = &mut self.states[id.index()];
        if state.is_root() {
            if let Some(parent) = state.parent_name() {
                warn!("State {:?} names unregistered parent {:?}, treating it as a root", state.name(), parent);
            }
        }

        state.initialize_systems(tree, id);

        let children = state.children.clone();
        for child in children {
            self.initialize(child, tree);
        }
    }

    /// Destroys each child subtree in reverse order, then the systems of `id`.
    pub fn destroy(&mut self, id: StateId) {
        let children = self.states[id.index()].children.clone();
        for &child in children.iter().rev() {
            self.destroy(child);
        }

        self.states[id.index()].destroy_systems();
    }

    //--- Branch Passes ----------------------------------------------------

    /// Activates the branch from just below `boundary` down to `id`.
    pub fn enter(&mut self, id: StateId, boundary: Option<StateId>, pending: &mut Option<StateId>) {
        let chain = self.branch(id, boundary);
        let Self { states, index } = self;

        for &current in chain.iter().rev() {
            debug!("Entering state {:?}", states[current.index()].name());
            let mut transitions = Transitions::new(index, pending);
            states[current.index()].activate_systems(&mut transitions);
        }
    }

    /// Runs the post-activation pass over the same branch as [`enter`].
    ///
    /// [`enter`]: StateForest::enter
    pub fn post_enter(&mut self, id: StateId, boundary: Option<StateId>, pending: &mut Option<StateId>) {
        let chain = self.branch(id, boundary);
        let Self { states, index } = self;

        for &current in chain.iter().rev() {
            let mut transitions = Transitions::new(index, pending);
            states[current.index()].post_activate_systems(&mut transitions);
        }
    }

    /// Deactivates `id` and its ancestors up to (not including) `boundary`.
    pub fn exit(&mut self, id: StateId, boundary: Option<StateId>, pending: &mut Option<StateId>) {
        let chain = self.branch(id, boundary);
        let Self { states, index } = self;

        for &current in &chain {
            debug!("Exiting state {:?}", states[current.index()].name());
            let mut transitions = Transitions::new(index, pending);
            states[current.index()].deactivate_systems(&mut transitions);
        }
    }

    /// Updates the whole branch of `id`, root first.
    pub fn update(&mut self, id: StateId, frame: Frame, pending: &mut Option<StateId>) {
        let chain = self.branch(id, None);
        let Self { states, index } = self;

        for &current in chain.iter().rev() {
            let mut context = FrameContext::new(frame, Transitions::new(index, pending));
            states[current.index()].update_systems(&mut context);
        }
    }

    /// Second update pass over the whole branch of `id`, root first.
    pub fn post_update(&mut self, id: StateId, frame: Frame, pending: &mut Option<StateId>) {
        let chain = self.branch(id, None);
        let Self { states, index } = self;

        for &current in chain.iter().rev() {
            let mut context = FrameContext::new(frame, Transitions::new(index, pending));
            states[current.index()].post_update_systems(&mut context);
        }
    }
}

//=== Tests ===============================================================
