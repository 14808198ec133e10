//! Coordination primitives for independent tokio tasks.
//!
//! The crate covers guarded execution with fault containment, fire-and-forget
//! task launching, throttle and debounce gates, a deadline-bounded condition
//! poller, fan-in/fan-out channel combinators and an overwriting ring buffer.

mod config;
mod config_option;
pub mod concurrent;

pub use self::{concurrent::*, config::*, config_option::*};
