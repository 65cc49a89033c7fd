//=========================================================================
// Core
//
// Building blocks of the state tree, independent of how it is driven.
//
// Architecture:
// ```text
//     system      System trait, SystemSet, SystemFactory
//     context     InitContext, Transitions, FrameContext handed to systems
//     state       GameState, StateTree (arena + transition commit)
//     descriptor  JSON descriptors → TreeBuilder → StateTree
// ```
//
// The fixed-rate loop lives in `crate::engine`; nothing here spawns
// threads or sleeps.
//
//=========================================================================

pub mod context;
pub mod descriptor;
pub mod state;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;
