//=========================================================================
// System Layer
//=========================================================================
//
// Pluggable per-state behavior with a uniform lifecycle.
//
// Architecture:
//   GameState
//     └─ systems: SystemSet (name → Box<dyn System>, insertion ordered)
//
//   SystemFactory: type name → constructor, used by the descriptor builder
//
// Lifecycle (driven by the owning state):
//   on_initialize → [on_activate → on_post_activate
//                    → (on_update → on_post_update)* → on_deactivate]*
//   → on_destroy
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::context::{FrameContext, InitContext, Transitions};

//=== Module Declarations =================================================

mod factory;
mod system_set;

//=== Public API ==========================================================

pub use factory::{SystemConstructor, SystemFactory, SystemParams};
pub use system_set::SystemSet;

//=== AsAny ===============================================================

/// Upcast helper so boxed systems can be downcast back to their concrete type.
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== System Trait ========================================================

/// A unit of per-state behavior driven by its owning [`GameState`].
///
/// Systems are attached to a state by name and receive every lifecycle call
/// in the order the state defines: registration order for initialize,
/// activate and update passes, reverse registration order for deactivate
/// and destroy.
///
/// # Minimal Implementation
///
/// Only `on_update()` is required. Every other hook defaults to a no-op:
///
/// ```rust
/// use state_tree::prelude::*;
///
/// struct Spinner {
///     angle: f32,
/// }
///
/// impl System for Spinner {
///     fn on_update(&mut self, frame: &mut FrameContext<'_>) {
///         self.angle += 90.0 * frame.delta_time();
///     }
/// }
/// ```
///
/// [`GameState`]: crate::core::state::GameState
pub trait System: AsAny + 'static {
    /// Called once when the owning tree is initialized.
    fn on_initialize(&mut self, _context: &InitContext<'_>) {}

    /// Called once when the owning tree is torn down.
    fn on_destroy(&mut self) {}

    /// Called when the owning state's branch becomes active.
    ///
    /// `transitions` may be used to request a follow-up transition; it is
    /// committed within the same tick, bounded by
    /// [`MAXIMUM_STATE_CHANGES`](crate::core::state::MAXIMUM_STATE_CHANGES).
    fn on_activate(&mut self, _transitions: &mut Transitions<'_>) {}

    /// Called after every state on the entered branch has run `on_activate`.
    fn on_post_activate(&mut self, _transitions: &mut Transitions<'_>) {}

    /// Called when the owning state's branch stops being active.
    fn on_deactivate(&mut self, _transitions: &mut Transitions<'_>) {}

    /// Called every tick while the owning state is on the active branch.
    fn on_update(&mut self, frame: &mut FrameContext<'_>);

    /// Second per-tick pass, run after every `on_update` of the branch.
    fn on_post_update(&mut self, _frame: &mut FrameContext<'_>) {}
}

impl dyn System {
    /// Returns the system as `T` if that is its concrete type.
    pub fn downcast_ref<T: System>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns the system mutably as `T` if that is its concrete type.
    pub fn downcast_mut<T: System>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Returns true if the concrete type of the system is `T`.
    pub fn is<T: System>(&self) -> bool {
        self.as_any().is::<T>()
    }
}
