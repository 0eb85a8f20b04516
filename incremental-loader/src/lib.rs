//! A headless incremental loader: reveal a collection page by page as a viewport scrolls.
//!
//! For adapter-level utilities (an in-memory viewport, deferred delivery, scroll controller),
//! see the `incremental-loader-adapter` crate.
//!
//! The loader owns the full item collection and a cursor. Each load step hands the next slice of
//! up to `page_size` items to a renderer, waits for the rendered content (immediately or through a
//! [`Deliver`] handle), appends it to the viewport and re-arms a proximity trigger while items
//! remain.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide a [`Viewport`] implementation:
//! - content appending
//! - a "loading" affordance that can be shown/removed
//! - affordance/viewport geometry for the near-bottom heuristic
//! - a slot for the loader's [`ProximityHandler`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod deliver;
mod loader;
mod options;
mod proximity;
mod state;
mod types;
mod viewport;

#[cfg(test)]
mod tests;

pub use deliver::Deliver;
pub use loader::Loader;
pub use options::{LoaderOptions, OnLoadedCallback, RenderFn};
pub use proximity::ProximityHandler;
pub use state::LoaderState;
pub use types::{LoadStatus, PageRange};
pub use viewport::{Viewport, is_affordance_near};
