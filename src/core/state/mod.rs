//=========================================================================
// State System
//=========================================================================
//
// Hierarchical game states with ancestor-aware transitions.
//
// Architecture:
//   StateTree
//     ├─ forest: StateForest
//     │    ├─ states: Vec<GameState>      (arena, indexed by StateId)
//     │    └─ index:  HashMap<String, StateId>
//     ├─ active:  Option<StateId>
//     └─ pending: Option<StateId>
//
// Flow:
//   update() → active branch, root first → commit_state_change()
//     → common ancestor → exit(old) → enter(new) → post_enter(new)
//
// Parent links are ids into the arena. No state owns another.
//
//=========================================================================

//=== Module Declarations =================================================

mod forest;
mod game_state;
mod state_tree;

//=== Public API ==========================================================

pub use game_state::GameState;
pub use state_tree::{StateTree, MAXIMUM_STATE_CHANGES};

//=== StateId =============================================================

/// Stable handle to a state registered in a [`StateTree`].
///
/// Ids are assigned in registration order and stay valid for the lifetime
/// of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the state in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}
