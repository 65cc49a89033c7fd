//=========================================================================
// Descriptor Loading
//=========================================================================
//
// Declarative tree descriptions and the builder that turns them into a
// live StateTree.
//
// Architecture:
//   JSON ──serde──> StateTreeDesc ──registration_order()──> [&StateDesc]
//                                          ↓
//   SystemFactory ──> TreeBuilder::build() ──> StateTree (main requested)
//
// Descriptor shape:
//   { "name", "main", "states": [
//       { "name", "parent"?, "children": [..], "systems": [
//           { "name", "type", "params": {..} } ] } ] }
//
//=========================================================================

//=== Module Declarations =================================================

mod builder;
mod desc;
mod error;

//=== Public API ==========================================================

pub use builder::TreeBuilder;
pub use desc::{StateDesc, StateTreeDesc, SystemDesc};
pub use error::DescriptorError;
