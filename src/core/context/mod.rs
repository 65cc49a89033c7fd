//=========================================================================
// Lifecycle Contexts
//=========================================================================
//
// Data handed to systems while the tree drives them.
//
// Architecture:
//   InitContext   (on_initialize)       tree name, owning state
//   Transitions   (activate/deactivate)  name index + pending slot
//   FrameContext  (on_update passes)     Frame timing + Transitions
//
// Every context borrows from the tree for the duration of one call, so
// systems can request transitions without holding a reference to it.
//
//=========================================================================

//=== Module Declarations =================================================

mod frame_context;
mod transitions;

//=== Public API ==========================================================

pub use frame_context::{Frame, FrameContext, InitContext};
pub use transitions::Transitions;
