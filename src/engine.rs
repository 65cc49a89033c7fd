//=========================================================================
// State Tree Engine
//
// Fixed-rate driver for a StateTree.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(tree)──>  Engine  ──run()──>  EngineReport
//         │                              │
//         ├─ with_tps()                  ├─ initialize()
//         ├─ with_channel_capacity()     ├─ per tick: commands → update → post_update
//         └─ with_max_ticks()            └─ destroy()
//
//     EngineHandle (any thread) ──crossbeam channel──> Engine (driving thread)
// ```
//
// The tree itself never leaves the driving thread. Other threads only
// enqueue commands, which are applied at the start of the next tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::context::Frame;
use crate::core::state::StateTree;

//=== EngineCommand =======================================================

/// Requests sent to a running engine through an [`EngineHandle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Forwarded to [`StateTree::request_state_change`] on the driving thread.
    RequestStateChange(String),

    /// Ends the run loop after the current tick.
    Stop,
}

//=== TickControl =========================================================
//
// Signals whether the run loop continues after a tick.
//
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EngineHandle ========================================================

/// Cloneable, thread-safe handle for steering a running [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: Sender<EngineCommand>,
}

impl EngineHandle {
    /// Queues a transition request for the next tick.
    ///
    /// Returns `false` if the command queue is full or the engine is gone.
    pub fn request_state_change(&self, name: impl Into<String>) -> bool {
        self.send(EngineCommand::RequestStateChange(name.into()))
    }

    /// Asks the engine to stop after its current tick.
    pub fn stop(&self) -> bool {
        self.send(EngineCommand::Stop)
    }

    fn send(&self, command: EngineCommand) -> bool {
        match self.sender.try_send(command) {
            Ok(()) => true,
            Err(TrySendError::Full(command)) => {
                warn!("Engine command queue is full, dropping {:?}", command);
                false
            }
            Err(TrySendError::Disconnected(command)) => {
                debug!("Engine is gone, dropping {:?}", command);
                false
            }
        }
    }
}

//=== EngineReport ========================================================

/// Summary returned when an engine finishes running.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineReport {
    /// Ticks executed.
    pub ticks: u64,

    /// Active state at shutdown, before the tree was destroyed.
    pub active_state: Option<String>,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (ticks per second)
/// - **Channel capacity**: 128 commands
/// - **Max ticks**: unbounded
///
/// # Examples
///
/// ```rust
/// use state_tree::prelude::*;
///
/// let mut tree = StateTree::new("demo");
/// tree.add_state(GameState::new("Menu"));
/// tree.request_state_change("Menu");
///
/// let report = EngineBuilder::new()
///     .with_tps(1000.0)
///     .with_max_ticks(3)
///     .build(tree)
///     .run();
///
/// assert_eq!(report.ticks, 3);
/// assert_eq!(report.active_state.as_deref(), Some("Menu"));
/// ```
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    tps: f64,
    channel_capacity: usize,
    max_ticks: Option<u64>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tps: 60.0,
            channel_capacity: 128,
            max_ticks: None,
        }
    }

    /// Sets the target ticks per second.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    /// Sets the capacity of the command channel fed by [`EngineHandle`]s.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Stops [`Engine::run`] after `ticks` ticks.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Builds an engine driving `tree`.
    pub fn build(self, tree: StateTree) -> Engine {
        info!(
            "Building engine for tree {:?} (TPS: {}, channel: {})",
            tree.name(),
            self.tps,
            self.channel_capacity
        );

        let (sender, receiver) = bounded(self.channel_capacity);
        Engine {
            tree,
            tps: self.tps,
            max_ticks: self.max_ticks,
            sender,
            receiver,
            ticks: 0,
            initialized: false,
        }
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Drives a [`StateTree`] at a fixed tick rate on the calling thread.
///
/// Use [`Engine::run`] for a blocking loop, or [`Engine::tick`] plus
/// [`Engine::finish`] when the caller owns the loop.
pub struct Engine {
    tree: StateTree,
    tps: f64,
    max_ticks: Option<u64>,
    sender: Sender<EngineCommand>,
    receiver: Receiver<EngineCommand>,
    ticks: u64,
    initialized: bool,
}

impl Engine {
    //--- Accessors --------------------------------------------------------

    /// Returns a handle other threads can use to steer the engine.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn tree(&self) -> &StateTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut StateTree {
        &mut self.tree
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    //--- Execution --------------------------------------------------------

    /// Runs one tick: queued commands, `update`, then `post_update`.
    ///
    /// Initializes the tree on first use. Returns [`TickControl::Exit`] if a
    /// stop was requested, in which case no update runs.
    pub fn tick(&mut self, delta_time: f32) -> TickControl {
        self.ensure_initialized();

        if let TickControl::Exit = self.apply_commands() {
            return TickControl::Exit;
        }

        let frame = Frame::new(delta_time, self.ticks);
        self.tree.update(frame);
        self.tree.post_update(frame);
        self.ticks += 1;

        TickControl::Continue
    }

    /// Runs until stopped or `max_ticks` is reached, then destroys the tree.
    pub fn run(mut self) -> EngineReport {
        info!("Starting engine runtime (TPS: {})", self.tps);

        let frame_duration = Duration::from_secs_f64(1.0 / self.tps);
        let mut delta = frame_duration;

        loop {
            if self.max_ticks.is_some_and(|max| self.ticks >= max) {
                info!("Reached tick limit ({})", self.ticks);
                break;
            }

            let frame_start = Instant::now();

            //--- Step 1: Commands + tree update ---------------------------
            if let TickControl::Exit = self.tick(delta.as_secs_f32()) {
                info!("Stop requested after {} ticks", self.ticks);
                break;
            }

            //--- Step 2: Maintain fixed pacing ----------------------------
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                thread::sleep(frame_duration - elapsed);
            }
            delta = frame_start.elapsed();
        }

        self.finish()
    }

    /// Destroys the tree and reports the final state.
    pub fn finish(mut self) -> EngineReport {
        let report = EngineReport {
            ticks: self.ticks,
            active_state: self.tree.active_state_name().map(str::to_string),
        };

        self.ensure_initialized();
        self.tree.destroy();

        info!("Engine shutdown complete ({} ticks)", report.ticks);
        report
    }

    //--- Internal Helpers -------------------------------------------------

    fn ensure_initialized(&mut self) {
        if !self.initialized {
            self.tree.initialize();
            self.initialized = true;
        }
    }

    /// Drains queued commands into the tree.
    fn apply_commands(&mut self) -> TickControl {
        loop {
            match self.receiver.try_recv() {
                Ok(EngineCommand::RequestStateChange(name)) => {
                    self.tree.request_state_change(&name);
                }
                Ok(EngineCommand::Stop) => return TickControl::Exit,
                Err(TryRecvError::Empty) => return TickControl::Continue,
                // Engine holds a sender itself, so this only guards the API
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
