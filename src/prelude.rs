//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use state_tree::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineHandle, EngineReport};

// States
pub use crate::core::state::{GameState, StateId, StateTree, MAXIMUM_STATE_CHANGES};

// Systems
pub use crate::core::system::{System, SystemFactory, SystemParams, SystemSet};

// Contexts
pub use crate::core::context::{Frame, FrameContext, InitContext, Transitions};

// Descriptors
pub use crate::core::descriptor::{DescriptorError, StateDesc, StateTreeDesc, SystemDesc, TreeBuilder};
