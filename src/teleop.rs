//! # Teleoperation Pad Module
//!
//! The polling loop tying everything together: a background task reads raw
//! events from the bound source, feeds the control-state tracker, and
//! publishes a fresh [`CommandSnapshot`] every cycle.
//!
//! ## Lifecycle
//!
//! A pad moves through `Idle -> Running -> Stopped`, with `Stopped`
//! terminal. [`GamepadTeleop::start`] spawns the polling task;
//! [`GamepadTeleop::stop`] cancels it cooperatively. The cancellation token
//! is only checked between read cycles — an in-flight blocking read is never
//! interrupted, so shutdown latency is one read cycle.
//!
//! ## Failure policy
//!
//! Read and decode errors inside the loop are tolerated: the error is
//! logged (at debug level, only when `debug` is configured), the stale
//! snapshot stays published, and the next cycle retries. Transient
//! disconnects are routine for a live input device; the loop's own cadence
//! is its retry mechanism.
//!
//! ## Reading commands
//!
//! The current snapshot is published through a watch channel, so a reader
//! always sees one complete, consistent command — never a half-updated one.
//! [`GamepadTeleop::current_commands`] reads it without blocking;
//! [`GamepadTeleop::subscribe`] hands out an independent receiver, which is
//! the hook for forwarding commands to a transport.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::command::{CommandComputer, CommandSnapshot};
use crate::config::ControllerConfig;
use crate::controller::profile::ProfileKind;
use crate::controller::source::{bind, DefaultSource, EventSource};
use crate::controller::state::ControlState;

/// Polling-loop lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Created but not started.
    Idle,
    /// Background polling task is live.
    Running,
    /// Stop was requested; terminal.
    Stopped,
}

/// Gamepad teleoperation pad: owns the polling loop and publishes command
/// snapshots.
///
/// # Examples
///
/// ```no_run
/// use teleop_bridge::config::ControllerConfig;
/// use teleop_bridge::teleop::GamepadTeleop;
///
/// let mut pad = GamepadTeleop::new(&ControllerConfig::default());
/// pad.start();
///
/// let commands = pad.current_commands();
/// println!("vx = {:.2}", commands.velocity_x);
///
/// pad.stop();
/// ```
pub struct GamepadTeleop {
    computer: CommandComputer,
    debug: bool,
    /// Taken by `start`; `None` once the task owns them.
    source: Option<Box<dyn EventSource>>,
    commands_tx: Option<watch::Sender<CommandSnapshot>>,
    commands_rx: watch::Receiver<CommandSnapshot>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    state: LoopState,
}

impl GamepadTeleop {
    /// Creates a pad bound to real hardware.
    ///
    /// Enumerates input devices and resolves a controller profile; when no
    /// known controller is present the pad falls back to the XInput profile
    /// with a default event source. Absence of a controller is not an
    /// error.
    #[must_use]
    pub fn new(config: &ControllerConfig) -> Self {
        let (bound, kind) = bind();
        let source: Box<dyn EventSource> = match bound {
            Some(source) => Box::new(source),
            None => Box::new(DefaultSource::new()),
        };
        Self::from_parts(source, kind, config)
    }

    /// Creates a pad from an explicit event source and profile family.
    ///
    /// This is the deterministic-construction path: tests (and embedders
    /// with their own device layer) inject a synthetic source here instead
    /// of touching real hardware.
    #[must_use]
    pub fn from_parts(
        source: Box<dyn EventSource>,
        kind: ProfileKind,
        config: &ControllerConfig,
    ) -> Self {
        let computer = CommandComputer::new(kind, config);
        info!("Using controller profile: {}", computer.profile_name());

        let (commands_tx, commands_rx) = watch::channel(CommandSnapshot::default());

        Self {
            computer,
            debug: config.debug,
            source: Some(source),
            commands_tx: Some(commands_tx),
            commands_rx,
            cancel: CancellationToken::new(),
            task: None,
            state: LoopState::Idle,
        }
    }

    /// Starts the background polling task.
    ///
    /// Only an idle pad starts; calling this again while running, or after
    /// stop, is a logged no-op (a stopped pad is terminal).
    pub fn start(&mut self) {
        if self.state != LoopState::Idle {
            warn!("start() ignored: polling loop is {:?}", self.state);
            return;
        }

        // Source and sender are always present while Idle.
        let (Some(mut source), Some(commands_tx)) =
            (self.source.take(), self.commands_tx.take())
        else {
            warn!("start() ignored: polling task parts already taken");
            return;
        };

        let computer = self.computer.clone();
        let debug_errors = self.debug;
        let cancel = self.cancel.clone();

        self.task = Some(tokio::task::spawn_blocking(move || {
            let mut state = ControlState::new();

            while !cancel.is_cancelled() {
                match source.read_events() {
                    Ok(events) => {
                        for event in &events {
                            state.apply(event);
                        }
                        let snapshot = computer.compute(&state);
                        // Send only fails with no receivers; the pad holds one.
                        let _ = commands_tx.send(snapshot);
                    }
                    Err(e) => {
                        if debug_errors {
                            debug!("Gamepad read error: {e}");
                        }
                    }
                }
            }

            info!("Polling loop stopped");
        }));

        self.state = LoopState::Running;
        info!("Polling loop started");
    }

    /// Requests the polling loop to stop.
    ///
    /// Cooperative: the loop exits after its current read cycle completes.
    /// Calling stop again is a no-op; stopping a never-started pad marks it
    /// terminal.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.state = LoopState::Stopped;
    }

    /// Waits for the polling task to finish.
    ///
    /// Call after [`stop`](GamepadTeleop::stop); returns immediately if the
    /// task was never started. A source blocked in a read without events
    /// delays this by one read cycle.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    /// Returns the most recently computed command snapshot.
    ///
    /// Non-blocking; before the first completed cycle this is the zero
    /// snapshot.
    #[must_use]
    pub fn current_commands(&self) -> CommandSnapshot {
        *self.commands_rx.borrow()
    }

    /// Returns an independent receiver for the published snapshots.
    ///
    /// The extension point for forwarding commands elsewhere (a robot
    /// control loop, a network transport): receivers see every published
    /// snapshot and can await changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CommandSnapshot> {
        self.commands_rx.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }
}
