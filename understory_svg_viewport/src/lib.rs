// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_svg_viewport --heading-base-level=0

//! Understory SVG Viewport: gated pan/zoom state for a viewport inside an SVG surface.
//!
//! This crate owns the authoritative pan/zoom transform of a viewport element
//! nested in a larger SVG, and decides *whether* and *when* a new transform
//! reaches the surface. It focuses on:
//! - Deriving the initial transform from a declared `viewBox` or from the
//!   measured bounds of the contents, with fit/contain/center options.
//! - Reading absolute and relative (to the initial view) zoom and pan.
//! - Gating every change through [`ViewportHooks`], which can allow, reject,
//!   or override zoom and pan independently per axis.
//! - Coalescing any number of commits into one surface write per frame.
//!
//! It does **not** recognize gestures, animate, or convert screen
//! coordinates. Callers are expected to:
//! - Implement [`SvgSurface`] for their SVG element (DOM, scene node, ...).
//! - Implement [`FrameRequester`] with their display-refresh primitive and
//!   call [`SvgViewport::on_frame`] when the frame fires.
//! - Turn input events into proposed matrices and pass them to
//!   [`SvgViewport::set_ctm`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Affine, Rect, Size};
//! use understory_svg_viewport::{
//!     FrameTiming, NoopHooks, SvgSurface, SvgViewport, ViewportOptions,
//! };
//!
//! #[derive(Default)]
//! struct Element {
//!     view_box: Option<String>,
//!     transform: Option<Affine>,
//! }
//!
//! impl SvgSurface for Element {
//!     fn declared_view_box(&self) -> Option<String> {
//!         self.view_box.clone()
//!     }
//!     fn measured_bounds(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 200.0, 100.0)
//!     }
//!     fn measured_size(&self) -> Size {
//!         Size::new(300.0, 300.0)
//!     }
//!     fn clear_declared_view_box(&mut self) {
//!         self.view_box = None;
//!     }
//!     fn apply_transform(&mut self, transform: Affine) {
//!         self.transform = Some(transform);
//!     }
//! }
//!
//! let element = Element {
//!     view_box: Some("0 0 200 100".into()),
//!     ..Element::default()
//! };
//! let mut vp = SvgViewport::new(
//!     element,
//!     |_: FrameTiming| {},
//!     ViewportOptions::new(300.0, 300.0),
//!     NoopHooks,
//! )
//! .unwrap();
//!
//! // Content is scaled by 1.5 and centered vertically.
//! assert_eq!(vp.zooms().x, 1.5);
//! assert_eq!(vp.pan().y, 75.0);
//! assert_eq!(vp.relative_zoom(), 1.0);
//!
//! // Zoom in; the surface only sees it once the host runs the frame.
//! vp.set_ctm(Affine::new([3.0, 0.0, 0.0, 3.0, 0.0, 0.0]));
//! assert_eq!(vp.relative_zoom(), 2.0);
//! assert!(vp.has_pending_frame());
//! vp.on_frame();
//! assert_eq!(vp.surface().transform, Some(vp.ctm()));
//! ```
//!
//! ## Gating example
//!
//! Hooks see zoom relative to the initial view and pan in absolute units.
//! Returning a [`Verdict`] lets them veto or rewrite each axis:
//!
//! ```rust
//! use kurbo::Vec2;
//! use understory_svg_viewport::{AxisVerdict, RelativeZoom, Verdict, ViewportHooks};
//!
//! /// Keeps zoom within 0.5x..4x of the initial view and pins vertical pan.
//! struct Limits;
//!
//! impl ViewportHooks for Limits {
//!     fn evaluate_zoom(&mut self, _current: RelativeZoom, proposed: RelativeZoom) -> Verdict {
//!         let zoom = proposed.x();
//!         if zoom < 0.5 || zoom > 4.0 {
//!             Verdict::override_both(zoom.clamp(0.5, 4.0))
//!         } else {
//!             Verdict::Allow
//!         }
//!     }
//!
//!     fn evaluate_pan(&mut self, _current: Vec2, _proposed: Vec2) -> Verdict {
//!         Verdict::axes(AxisVerdict::Allow, AxisVerdict::Reject)
//!     }
//! }
//! ```
//!
//! ## Design notes
//!
//! - The transform is axis‑aligned: scale and translation only.
//! - Commits are synchronous; only the surface write is deferred.
//! - A frame reads the live state when it runs, so intermediate states
//!   between two frames are never written.
//! - Each viewport owns its own [`FrameScheduler`]; viewports share nothing.
//! - Misuse of single-axis accessors while separate zooms are enabled, and
//!   degenerate (zero, negative, non-finite) scales, are reported through
//!   `tracing` warnings.
//!
//! This crate is `no_std`.

#![no_std]

extern crate alloc;

mod frame;
mod gate;
mod init;
mod options;
mod state;
mod surface;
mod viewport;

pub use frame::{FrameRequester, FrameScheduler, FrameTiming};
pub use gate::{AxisVerdict, CommitOutcome, NoopHooks, RelativeZoom, Verdict, ViewportHooks};
pub use options::{RefreshRate, ScaleMode, ViewportOptions};
pub use state::{TransformState, ViewBox, ViewBoxError};
pub use surface::{SvgSurface, transform_attribute};
pub use viewport::{SvgViewport, SvgViewportDebugInfo};
