//! Progress and status reporting trait.
//!
//! This module defines the CopyObserver trait, which decouples the engine
//! from any specific renderer (CLI, GUI, tests). The engine takes an
//! `Option<&dyn CopyObserver>`; operations run silently when none is
//! attached.
//!
//! All methods are called synchronously from the thread driving the copy.
//! Renderers may throttle or drop percent events, but status events must
//! always be delivered.

use crate::model::FileRole;

/// Trait for receiving progress and status updates from a verified copy.
///
/// Percent events are only emitted when `CopyOptions::enable_progress` is
/// set; status events are emitted whenever an observer is attached.
pub trait CopyObserver: Send {
    /// Called after each written chunk during the byte-copy phase.
    ///
    /// `percent` is the fraction of bytes transferred, in `[0, 100]`.
    fn on_copy_progress(&self, percent: f64);

    /// Called after each digested chunk during a hashing phase.
    ///
    /// Emitted twice per verified copy: once with `FileRole::Source`,
    /// once with `FileRole::Destination`.
    fn on_hash_progress(&self, role: FileRole, percent: f64);

    /// Called on entry to each phase and with the final verdict.
    fn on_status(&self, message: &str);
}
