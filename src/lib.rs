//! Behavior core for a desktop shark-fin companion.
//!
//! The crate owns the state machine, idle planner, motion and animation
//! bookkeeping for one or more sharks. Windowing, rendering and the OS
//! input hook are host concerns: the host writes pointer samples into an
//! [`input::InputFeed`], drives [`sim::Simulation`] on its timers and
//! draws the [`render::frame::SharkFrame`]s it reads back.

pub mod clock;
pub mod config;
pub mod debug;
pub mod ecs;
pub mod error;
pub mod input;
pub mod render;
pub mod screen;
pub mod shark;
pub mod sim;

pub use sim::Simulation;
