//! Darkstone - browser idle RPG core.
//!
//! Everything here runs on a virtual clock: a [`core::Session`] owns the
//! persisted save, the scheduler, and the active screen, and callers drive
//! it with [`core::Session::advance`]. Rendering is left to the embedder,
//! which reads [`core::Session::snapshot`] after each step.

pub mod activities;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod error;
pub mod items;
pub mod utils;
