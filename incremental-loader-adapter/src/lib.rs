//! Adapter utilities for the `incremental-loader` crate.
//!
//! The `incremental-loader` crate is UI-agnostic and only sequences pages. This crate provides
//! small, framework-neutral helpers commonly needed by adapters:
//!
//! - An in-memory [`MemoryViewport`] with simulated scroll geometry (headless UIs, tests)
//! - A [`DeferredRenderer`] that completes pages later, driven by `tick(now_ms)`
//! - A [`Controller`] that turns scroll events into proximity checks and fills short viewports
//!
//! This crate is intentionally framework-agnostic (no DOM/ratatui/egui bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod controller;
mod deferred;
mod memory;
mod surface;


pub use controller::Controller;
pub use deferred::DeferredRenderer;
pub use memory::{MemoryViewport, ViewportMetrics};
pub use surface::ScrollSurface;
