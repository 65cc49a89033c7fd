//=========================================================================
// Frame & Init Contexts
//=========================================================================
//
// Per-call data passed down the state chain:
// - InitContext: back-references for on_initialize
// - Frame: timing for one tick (Copy, supplied by the driver)
// - FrameContext: Frame plus the tree's transition handle
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::Transitions;
use crate::core::state::StateId;

//=== InitContext =========================================================

/// Context handed to [`System::on_initialize`].
///
/// [`System::on_initialize`]: crate::core::system::System::on_initialize
#[derive(Debug, Clone, Copy)]
pub struct InitContext<'a> {
    tree: &'a str,
    state: &'a str,
    state_id: StateId,
}

impl<'a> InitContext<'a> {
    pub(crate) fn new(tree: &'a str, state: &'a str, state_id: StateId) -> Self {
        Self {
            tree,
            state,
            state_id,
        }
    }

    /// Name of the owning state tree.
    pub fn tree_name(&self) -> &'a str {
        self.tree
    }

    /// Name of the state the system is attached to.
    pub fn state_name(&self) -> &'a str {
        self.state
    }

    /// Arena id of the state the system is attached to.
    pub fn state_id(&self) -> StateId {
        self.state_id
    }
}

//=== Frame ===============================================================

/// Timing information for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    /// Seconds elapsed since the previous tick.
    pub delta_time: f32,

    /// Zero-based tick counter.
    pub tick: u64,
}

impl Frame {
    pub fn new(delta_time: f32, tick: u64) -> Self {
        Self { delta_time, tick }
    }
}

//=== FrameContext ========================================================

/// Context handed to the update passes of every system on the active branch.
///
/// Besides frame timing it exposes [`request_state_change`], the only way
/// code running inside an update can influence the state machine.
///
/// [`request_state_change`]: FrameContext::request_state_change
pub struct FrameContext<'a> {
    frame: Frame,
    transitions: Transitions<'a>,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(frame: Frame, transitions: Transitions<'a>) -> Self {
        Self { frame, transitions }
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Seconds elapsed since the previous tick.
    pub fn delta_time(&self) -> f32 {
        self.frame.delta_time
    }

    pub fn tick(&self) -> u64 {
        self.frame.tick
    }

    /// Requests a transition, committed at the end of the current pass.
    ///
    /// See [`Transitions::request_state_change`].
    pub fn request_state_change(&mut self, name: &str) -> bool {
        self.transitions.request_state_change(name)
    }

    pub fn transitions(&mut self) -> &mut Transitions<'a> {
        &mut self.transitions
    }
}
