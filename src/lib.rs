//=========================================================================
// State Tree - Library Root
//
// Hierarchical game-state machine. Each state owns a set of named
// systems; the active state's whole ancestor branch is updated every
// tick, and transitions enter and exit only the states that differ
// below the common ancestor.
//
// Typical usage:
// ```no_run
// use state_tree::prelude::*;
//
// let mut tree = StateTree::new("game");
// tree.add_state(GameState::new("root"));
// tree.add_state(GameState::new("Menu").with_parent("root"));
// tree.request_state_change("Menu");
//
// EngineBuilder::new().with_tps(60.0).build(tree).run();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the state machine itself and is usable without the engine,
// for callers that own their loop and call `StateTree::update` directly.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` drives a tree at a fixed tick rate.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineCommand, EngineHandle, EngineReport, TickControl};
