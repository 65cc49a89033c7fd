//=========================================================================
// Transitions
//=========================================================================
//
// Write access to the tree's pending-transition slot.
//
// Systems request transitions here while the tree is driving them. The
// state tree commits the pending target at the end of the current
// update / post-update call.
//
// The slot holds a single target: a later request overwrites an earlier
// one that has not been committed yet.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::state::StateId;

//=== Transitions =========================================================

/// Handle through which systems request the next active state.
///
/// Obtained from [`FrameContext::transitions`] or passed directly to the
/// activation hooks of [`System`].
///
/// [`FrameContext::transitions`]: super::FrameContext::transitions
/// [`System`]: crate::core::system::System
pub struct Transitions<'a> {
    index: &'a HashMap<String, StateId>,
    pending: &'a mut Option<StateId>,
}

impl<'a> Transitions<'a> {
    pub(crate) fn new(index: &'a HashMap<String, StateId>, pending: &'a mut Option<StateId>) -> Self {
        Self { index, pending }
    }

    /// Requests a transition to the state called `name`.
    ///
    /// The request replaces any uncommitted one. Unknown names leave the
    /// pending slot untouched and return `false`.
    pub fn request_state_change(&mut self, name: &str) -> bool {
        let Some(&target) = self.index.get(name) else {
            warn!("Requested transition to unknown state {:?}, ignoring", name);
            return false;
        };

        if let Some(previous) = self.pending.replace(target) {
            if previous != target {
                debug!("Pending transition {:?} replaced by {:?}", previous, name);
            }
        }
        true
    }

    /// The uncommitted transition target, if any.
    pub fn pending(&self) -> Option<StateId> {
        *self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> HashMap<String, StateId> {
        let mut index = HashMap::new();
        index.insert("Menu".to_string(), StateId::new(0));
        index.insert("Game".to_string(), StateId::new(1));
        index
    }

    #[test]
    fn request_known_state_sets_pending() {
        let index = index();
        let mut pending = None;

        let mut transitions = Transitions::new(&index, &mut pending);
        assert!(transitions.request_state_change("Game"));
        assert_eq!(transitions.pending(), Some(StateId::new(1)));

        assert_eq!(pending, Some(StateId::new(1)));
    }

    #[test]
    fn last_request_wins() {
        let index = index();
        let mut pending = None;

        let mut transitions = Transitions::new(&index, &mut pending);
        transitions.request_state_change("Game");
        transitions.request_state_change("Menu");

        assert_eq!(pending, Some(StateId::new(0)));
    }

    #[test]
    fn unknown_state_leaves_pending_untouched() {
        let index = index();
        let mut pending = Some(StateId::new(1));

        let mut transitions = Transitions::new(&index, &mut pending);
        assert!(!transitions.request_state_change("Credits"));
        assert!(transitions.has_pending());

        assert_eq!(pending, Some(StateId::new(1)));
    }
}
