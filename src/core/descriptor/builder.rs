//=========================================================================
// Tree Builder
//=========================================================================
//
// Assembles a StateTree from a validated descriptor.
//
// Steps:
//   1. registration_order() → structural validation, parents-first order
//   2. per state: create systems through the factory, add_system
//   3. add_state in order, so child order follows the descriptor
//   4. request_state_change(main) → activated on the first tick
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{DescriptorError, StateDesc, StateTreeDesc};
use crate::core::state::{GameState, StateTree};
use crate::core::system::SystemFactory;

//=== TreeBuilder =========================================================

/// Builds [`StateTree`]s from descriptors using a [`SystemFactory`].
///
/// # Example
///
/// ```rust
/// use state_tree::prelude::*;
///
/// #[derive(Default)]
/// struct Music;
/// impl System for Music {
///     fn on_update(&mut self, _frame: &mut FrameContext<'_>) {}
/// }
///
/// let mut factory = SystemFactory::new();
/// factory.register_default::<Music>("Music");
///
/// let desc = StateTreeDesc::from_json_str(r#"{
///     "name": "demo",
///     "main": "Menu",
///     "states": [
///         { "name": "root", "children": ["Menu"],
///           "systems": [ { "name": "music", "type": "Music" } ] },
///         { "name": "Menu" }
///     ]
/// }"#)?;
///
/// let tree = TreeBuilder::new(&factory).build(&desc)?;
/// assert_eq!(tree.pending_state_name(), Some("Menu"));
/// assert!(tree.find_system("Menu", "music").is_some());
/// # Ok::<(), DescriptorError>(())
/// ```
pub struct TreeBuilder<'f> {
    factory: &'f SystemFactory,
}

impl<'f> TreeBuilder<'f> {
    pub fn new(factory: &'f SystemFactory) -> Self {
        Self { factory }
    }

    /// Builds an uninitialized tree with `desc.main` already requested.
    pub fn build(&self, desc: &StateTreeDesc) -> Result<StateTree, DescriptorError> {
        let order = desc.registration_order()?;
        let mut tree = StateTree::new(desc.name.clone());

        for state_desc in order {
            let state = self.build_state(desc, state_desc)?;
            if !tree.add_state(state) {
                return Err(DescriptorError::DuplicateState {
                    name: state_desc.name.clone(),
                });
            }
        }

        tree.request_state_change(&desc.main);

        info!("Built state tree {:?} with {} states (main: {:?})", desc.name, tree.len(), desc.main);
        Ok(tree)
    }

    fn build_state(&self, desc: &StateTreeDesc, state_desc: &StateDesc) -> Result<GameState, DescriptorError> {
        let mut state = GameState::new(state_desc.name.clone());
        if let Some(parent) = desc.parent_of(&state_desc.name) {
            state = state.with_parent(parent);
        }

        for system_desc in &state_desc.systems {
            let system = self
                .factory
                .create_with_params(&system_desc.system_type, &system_desc.params)
                .ok_or_else(|| DescriptorError::UnknownSystemType {
                    state: state_desc.name.clone(),
                    system: system_desc.name.clone(),
                    system_type: system_desc.system_type.clone(),
                })?;

            if !state.add_system(system_desc.name.clone(), system) {
                return Err(DescriptorError::DuplicateSystem {
                    state: state_desc.name.clone(),
                    system: system_desc.name.clone(),
                });
            }
            debug!("Attached {:?} ({}) to state {:?}", system_desc.name, system_desc.system_type, state_desc.name);
        }

        Ok(state)
    }
}

//=== Tests ===============================================================
