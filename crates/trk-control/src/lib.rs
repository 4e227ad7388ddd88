//! `trk-control`: the real-time control loop of a simulation worker.
//!
//! # Control cycle
//!
//! ```text
//! while Running:
//!   ① cancelled?          → Terminating
//!   ② config-in message?  → dispatch (Terminate → Terminating; others warn)
//!   ③ otherwise one tick:
//!        advance clock, drain pilot commands, WorldStep::step,
//!        forward output to track-out,
//!        sleep (interval − elapsed) × 0.99  or  warn "behind schedule"
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`config`]   | `ControlConfig` (TOML document)                          |
//! | [`state`]    | `LoopState`, `SchedulerState`                            |
//! | [`pacing`]   | `Pace`, `pace` (sleep-or-overrun decision)               |
//! | [`world`]    | `WorldStep`, `TickContext`, `IdleWorld`                  |
//! | [`observer`] | `LoopObserver`, `NoopObserver`                           |
//! | [`builder`]  | `ControlLoopBuilder`, `LoopQueues`                       |
//! | [`control`]  | `ControlLoop`                                            |
//! | [`error`]    | `ControlError`, `ControlResult<T>`                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let config = ControlConfig::load(Path::new("newton.toml"))?;
//! let mut control = ControlLoopBuilder::new(config)
//!     .world(IdleWorld)
//!     .group(LocalGroup::new())
//!     .build()?;
//! control.run(&mut NoopObserver).await?;
//! ```

pub mod builder;
pub mod config;
pub mod control;
pub mod error;
pub mod observer;
pub mod pacing;
pub mod state;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::{ControlLoopBuilder, LoopQueues};
pub use config::{ControlConfig, NetworkConfig, QueueConfig, ReferenceConfig};
pub use control::ControlLoop;
pub use error::{ControlError, ControlResult};
pub use observer::{LoopObserver, NoopObserver};
pub use pacing::{Pace, pace};
pub use state::{LoopState, SchedulerState};
pub use world::{IdleWorld, TickContext, WorldStep};
