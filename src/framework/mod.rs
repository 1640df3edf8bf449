//! Minimal actor plumbing.
//!
//! This module provides the building blocks the log writer is built on: a
//! typed mailbox, a cloneable address, and request/response over oneshot
//! channels.
//!
//! # Main Components
//!
//! - [`Actor`] - Trait for state that is owned by a single task and driven by requests
//! - [`Mailbox`] - The receiving half; runs the actor's message loop
//! - [`Address`] - The sending half; cheap to clone and share across tasks
//! - [`FrameworkError`] - Failures of the plumbing itself (closed or dropped actor)
//!
//! # Testing
//!
//! See [`mock`] for an address backed by a closure instead of a real actor.

pub mod core;
pub mod mock;

pub use core::*;
