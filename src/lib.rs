//! # dotnav-gallery
//!
//! Dot-navigated image carousels with a shared full-screen lightbox.
//! The page's own markup is the data source: every gallery container becomes a
//! carousel with generated dots (and, for the auto-advancing family,
//! thumbnails), and every inline slide feeds one lightbox.
//!
//! # Architecture: Pure Core, Thin Bindings
//!
//! ```text
//! page ──► collect ──► Collection ──► Lightbox ──► LightboxSession ──► LightboxHost
//!   │                                                    │
//!   └────► Carousel (SlideIndex + Autoplay + Swipe) ─────┴──► render(Frame) ──► GalleryView
//! ```
//!
//! Controllers never touch a document. They are written against four small
//! traits: [`collect::PageSource`] to read markup, [`render::GalleryView`] to
//! show state, [`lightbox::LightboxHost`] for the overlay and page scroll, and
//! [`autoplay::TimerFactory`] for repeating timers. The `web` feature
//! implements them over the live DOM; the `cli` feature implements
//! `PageSource` over saved HTML; the tests implement all of them as fakes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`carousel`] | `SlideIndex` state machine and the per-gallery `Carousel` controller |
//! | [`lightbox`] | Page-wide lightbox manager and the owned `LightboxSession` |
//! | [`autoplay`] | Auto-advance timer discipline over a `TimerFactory` |
//! | [`swipe`] | Horizontal swipe classification |
//! | [`render`] | Declarative render step: `Frame` applied to a `GalleryView` |
//! | [`markup`] | Maud templates for dots, thumbnails and the lightbox overlay |
//! | [`collect`] | Slide collection from gallery markup via `PageSource` |
//! | [`contract`] | Markup audit: missing parts, empty galleries, missing trigger |
//! | [`config`] | `config.toml` loading, validation and merging onto stock class names |
//! | [`types`] | Shared types (`Slide`, `Variant`) |
//! | [`output`] | CLI output formatting |
//! | `static_page` | `PageSource` over static HTML (`cli` feature) |
//! | `web` | DOM binding and `start()` entry point (`web` feature, wasm32 only) |
//!
//! # Design Decisions
//!
//! ## One State Machine
//!
//! The inline carousel, the auto-advancing carousel and the lightbox share one
//! [`carousel::SlideIndex`]. Its length is a `NonZeroUsize`, so an empty
//! gallery has no index at all: the boot code skips it instead of every
//! operation checking for it.
//!
//! ## Render, Don't Patch
//!
//! After each navigation the controller renders a whole [`render::Frame`]:
//! every slide, dot and thumbnail gets its active flag set from `(len,
//! current)`. Re-rendering is idempotent and a missed update cannot leave two
//! dots lit.
//!
//! ## The Lightbox Session Owns Page State
//!
//! The scroll lock and the overlay node belong to a
//! [`lightbox::LightboxSession`]. Every close path (button, backdrop click,
//! Escape, drop) goes through the same teardown, which restores scroll and
//! removes the overlay. Keyboard input is gated on the overlay still being in
//! the document.
//!
//! ## One Timer per Gallery
//!
//! Timer handles cancel on drop, and [`autoplay::Autoplay`] always drops the old
//! handle before creating a new one. A manual navigation restarts the interval;
//! a timer tick does not.

pub mod autoplay;
pub mod carousel;
pub mod collect;
pub mod config;
pub mod contract;
pub mod lightbox;
pub mod markup;
pub mod output;
pub mod render;
pub mod swipe;
pub mod types;

#[cfg(feature = "cli")]
pub mod static_page;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

#[cfg(test)]
pub(crate) mod test_helpers;
