// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Vec2};

use crate::frame::{FrameRequester, FrameScheduler};
use crate::gate::{CommitOutcome, Gate, NoopHooks, RelativeZoom, ViewportHooks};
use crate::init;
use crate::options::ViewportOptions;
use crate::state::{TransformState, ViewBox, ViewBoxError, is_valid_scale};
use crate::surface::SvgSurface;

/// Pan/zoom state of a viewport nested inside an SVG surface.
///
/// `SvgViewport` owns two [`TransformState`]s: the *original* state computed
/// once at construction (what "relative zoom 1.0" means) and the *active*
/// state that callers change through [`SvgViewport::set_ctm`]. Every change
/// is first offered to the [`ViewportHooks`], then committed, then written
/// to the surface on the next frame requested from the [`FrameRequester`].
/// Any number of commits between two frames produce a single write carrying
/// the latest state.
///
/// The host drives frames: when the requester fires, call
/// [`SvgViewport::on_frame`].
#[derive(Clone, Debug)]
pub struct SvgViewport<S, F, H = NoopHooks> {
    surface: S,
    frames: F,
    hooks: H,
    options: ViewportOptions,
    view_box: ViewBox,
    original: TransformState,
    active: TransformState,
    scheduler: FrameScheduler,
}

impl<S, F, H> SvgViewport<S, F, H>
where
    S: SvgSurface,
    F: FrameRequester,
    H: ViewportHooks,
{
    /// Creates the viewport and writes its initial transform to `surface`.
    ///
    /// - If the surface declares a `viewBox`, it is parsed, the content is
    ///   scaled into `options.width` x `options.height` and centered, and the
    ///   attribute is removed from the surface.
    /// - Otherwise the measured bounds of the contents are used as the view
    ///   box and the starting transform is the identity.
    ///
    /// The fit/contain/center options are then applied; the result becomes
    /// the original state and is committed through the hooks like any other
    /// change.
    ///
    /// Fails if `options` has no usable target size, if the `viewBox`
    /// attribute cannot be parsed, or if the content has no area.
    pub fn new(
        surface: S,
        frames: F,
        options: ViewportOptions,
        hooks: H,
    ) -> Result<Self, ViewBoxError> {
        if !is_valid_scale(options.width) || !is_valid_scale(options.height) {
            return Err(ViewBoxError::InvalidTarget {
                width: options.width,
                height: options.height,
            });
        }
        let mut vp = Self {
            surface,
            frames,
            hooks,
            options,
            view_box: ViewBox::default(),
            original: TransformState::IDENTITY,
            active: TransformState::IDENTITY,
            scheduler: FrameScheduler::new(options.refresh_rate),
        };
        vp.cache_view_box()?;
        vp.process_ctm();
        // The first transform is visible immediately rather than next frame.
        vp.scheduler.write(vp.active, &mut vp.surface);
        Ok(vp)
    }

    fn cache_view_box(&mut self) -> Result<(), ViewBoxError> {
        if let Some(declared) = self.surface.declared_view_box() {
            self.view_box = ViewBox::parse(&declared)?.validate()?;
            self.active = init::declared_state(self.view_box, &self.options);
            self.scheduler.schedule(&mut self.frames);
            self.surface.clear_declared_view_box();
        } else {
            self.view_box = ViewBox::from_rect(self.surface.measured_bounds()).validate()?;
        }
        tracing::debug!(
            x = self.view_box.x,
            y = self.view_box.y,
            width = self.view_box.width,
            height = self.view_box.height,
            "cached view box"
        );
        Ok(())
    }

    fn process_ctm(&mut self) {
        let baseline = init::process_ctm(self.view_box, &self.options, self.active);
        self.original = baseline;
        self.set_ctm(baseline.to_affine());
    }

    /// Recomputes the view box from the surface's current on-screen size.
    ///
    /// Use after the surface was resized by external layout. Zoom and pan are
    /// left untouched.
    pub fn recache_view_box(&mut self) {
        let size = self.surface.measured_size();
        self.view_box = ViewBox::new(
            0.0,
            0.0,
            size.width / self.active.zoom_x,
            size.height / self.active.zoom_y,
        );
    }

    /// Proposes a new transform.
    ///
    /// Only the scale (`a`, `d`) and translation (`e`, `f`) coefficients are
    /// read. If they match the active state nothing happens. Otherwise the
    /// zoom and pan hooks decide what survives; the survivor is committed, a
    /// frame is requested, and `notify_zoom` then `notify_pan` fire for each
    /// part that proposed a change and kept at least one axis.
    pub fn set_ctm(&mut self, ctm: Affine) -> CommitOutcome {
        let gate = Gate {
            original: self.original,
            active: self.active,
            separate_zooms: self.options.separate_zooms_enabled,
        };
        let Some((next, outcome)) = gate.evaluate(&mut self.hooks, TransformState::from_affine(ctm))
        else {
            return CommitOutcome::default();
        };

        self.active = next;
        self.scheduler.schedule(&mut self.frames);
        tracing::debug!(
            zoomed = outcome.zoomed,
            panned = outcome.panned,
            zoom_x = next.zoom_x,
            zoom_y = next.zoom_y,
            x = next.x,
            y = next.y,
            "committed viewport transform"
        );

        if outcome.zoomed {
            self.hooks.notify_zoom(gate.relative_zoom(next));
        }
        if outcome.panned {
            self.hooks.notify_pan(next.pan());
        }
        outcome
    }

    /// Runs a frame requested through the [`FrameRequester`].
    ///
    /// Writes the active state as it is now, which includes every commit
    /// made since the request. Returns `false` (and writes nothing) if no
    /// frame was pending.
    pub fn on_frame(&mut self) -> bool {
        self.scheduler.flush(self.active, &mut self.surface)
    }
}

impl<S, F, H> SvgViewport<S, F, H> {
    /// The logical content rectangle.
    #[must_use]
    pub fn view_box(&self) -> ViewBox {
        self.view_box
    }

    /// The baseline state computed at construction.
    #[must_use]
    pub fn original_state(&self) -> TransformState {
        self.original
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> TransformState {
        self.active
    }

    /// Horizontal absolute zoom.
    ///
    /// With separate zooms enabled the axes may differ; this logs a warning
    /// and still returns the horizontal value. Prefer [`Self::zooms`].
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.warn_single_axis("zoom", "zooms");
        self.active.zoom_x
    }

    /// Absolute zoom per axis.
    #[must_use]
    pub fn zooms(&self) -> Vec2 {
        self.active.zooms()
    }

    /// Horizontal zoom relative to the original state.
    ///
    /// Logs a warning when separate zooms are enabled; prefer
    /// [`Self::relative_zooms`] then.
    #[must_use]
    pub fn relative_zoom(&self) -> f64 {
        self.warn_single_axis("relative_zoom", "relative_zooms");
        self.active.zoom_x / self.original.zoom_x
    }

    /// Zoom per axis relative to the original state.
    #[must_use]
    pub fn relative_zooms(&self) -> Vec2 {
        self.compute_relative_zooms(self.active.zoom_x, self.active.zoom_y)
    }

    /// Converts an absolute horizontal scale into the relative frame.
    ///
    /// Depends only on the original state.
    #[must_use]
    pub fn compute_relative_zoom(&self, scale: f64) -> f64 {
        self.warn_single_axis("compute_relative_zoom", "compute_relative_zooms");
        scale / self.original.zoom_x
    }

    /// Converts absolute scales into the relative frame.
    #[must_use]
    pub fn compute_relative_zooms(&self, scale_x: f64, scale_y: f64) -> Vec2 {
        Vec2::new(scale_x / self.original.zoom_x, scale_y / self.original.zoom_y)
    }

    /// Current translation.
    #[must_use]
    pub fn pan(&self) -> Vec2 {
        self.active.pan()
    }

    /// Current transform as a matrix.
    #[must_use]
    pub fn ctm(&self) -> Affine {
        self.active.to_affine()
    }

    /// Options the viewport was created with.
    #[must_use]
    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    /// Returns `true` while a requested frame has not run yet.
    #[must_use]
    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// The rendering surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the rendering surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The injected hooks.
    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Mutable access to the injected hooks.
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Snapshot of the current viewport state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> SvgViewportDebugInfo {
        SvgViewportDebugInfo {
            view_box: self.view_box,
            original: self.original,
            active: self.active,
            relative_zoom: if self.options.separate_zooms_enabled {
                RelativeZoom::Separate(self.relative_zooms())
            } else {
                RelativeZoom::Uniform(self.active.zoom_x / self.original.zoom_x)
            },
            pending_frame: self.scheduler.is_pending(),
        }
    }

    fn warn_single_axis(&self, accessor: &'static str, instead: &'static str) {
        if self.options.separate_zooms_enabled {
            tracing::warn!(
                accessor,
                instead,
                "single-axis zoom accessor used with separate zooms enabled; returning the x axis"
            );
        }
    }
}

/// Debug snapshot of an [`SvgViewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct SvgViewportDebugInfo {
    /// Logical content rectangle.
    pub view_box: ViewBox,
    /// Baseline state.
    pub original: TransformState,
    /// Current state.
    pub active: TransformState,
    /// Current zoom relative to the baseline.
    pub relative_zoom: RelativeZoom,
    /// Whether a frame has been requested but not yet run.
    pub pending_frame: bool,
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    use kurbo::{Affine, Rect, Size, Vec2};

    use super::SvgViewport;
    use crate::frame::FrameTiming;
    use crate::gate::{NoopHooks, RelativeZoom};
    use crate::options::ViewportOptions;
    use crate::state::{TransformState, ViewBox, ViewBoxError};
    use crate::surface::SvgSurface;

    #[derive(Debug, Default)]
    struct Surface {
        view_box: Option<String>,
        bounds: Rect,
        size: Size,
        writes: Vec<Affine>,
    }

    impl SvgSurface for Surface {
        fn declared_view_box(&self) -> Option<String> {
            self.view_box.clone()
        }
        fn measured_bounds(&self) -> Rect {
            self.bounds
        }
        fn measured_size(&self) -> Size {
            self.size
        }
        fn clear_declared_view_box(&mut self) {
            self.view_box = None;
        }
        fn apply_transform(&mut self, transform: Affine) {
            self.writes.push(transform);
        }
    }

    fn ignore_frames(_: FrameTiming) {}

    #[test]
    fn declared_view_box_fit_and_center() {
        let surface = Surface {
            view_box: Some("0 0 200 100".to_string()),
            ..Surface::default()
        };
        let vp = SvgViewport::new(
            surface,
            ignore_frames,
            ViewportOptions::new(300.0, 300.0),
            NoopHooks,
        )
        .unwrap();

        assert_eq!(vp.zooms(), Vec2::new(1.5, 1.5));
        assert!(vp.pan().x.abs() < 1e-9);
        assert!((vp.pan().y - 75.0).abs() < 1e-9);
        assert_eq!(vp.relative_zooms(), Vec2::new(1.0, 1.0));
        assert_eq!(vp.view_box(), ViewBox::new(0.0, 0.0, 200.0, 100.0));

        // The attribute now belongs to the viewport, and the first transform
        // was written synchronously.
        assert_eq!(vp.surface().view_box, None);
        assert_eq!(vp.surface().writes, [vp.ctm()]);
        assert!(!vp.has_pending_frame());
    }

    #[test]
    fn measured_bounds_without_options_keep_identity() {
        let surface = Surface {
            bounds: Rect::new(10.0, 5.0, 60.0, 55.0),
            ..Surface::default()
        };
        let options = ViewportOptions::new(100.0, 100.0)
            .with_fit(false)
            .with_center(false);
        let vp = SvgViewport::new(surface, ignore_frames, options, NoopHooks).unwrap();

        assert_eq!(vp.view_box(), ViewBox::new(10.0, 5.0, 50.0, 50.0));
        assert_eq!(vp.state(), TransformState::IDENTITY);
        assert_eq!(vp.original_state(), TransformState::IDENTITY);
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        let surface = Surface {
            view_box: Some("0 0 0 10".to_string()),
            ..Surface::default()
        };
        let result = SvgViewport::new(
            surface,
            ignore_frames,
            ViewportOptions::new(10.0, 10.0),
            NoopHooks,
        );
        assert_eq!(
            result.err(),
            Some(ViewBoxError::Degenerate {
                width: 0.0,
                height: 10.0
            })
        );

        let empty = Surface::default();
        assert!(
            SvgViewport::new(empty, ignore_frames, ViewportOptions::new(10.0, 10.0), NoopHooks)
                .is_err()
        );
    }

    #[test]
    fn target_size_must_be_positive() {
        let surface = Surface {
            view_box: Some("0 0 200 100".to_string()),
            ..Surface::default()
        };
        let result = SvgViewport::new(
            surface,
            ignore_frames,
            ViewportOptions::default(),
            NoopHooks,
        );
        assert_eq!(
            result.err(),
            Some(ViewBoxError::InvalidTarget {
                width: 0.0,
                height: 0.0
            })
        );

        let surface = Surface {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            ..Surface::default()
        };
        let options = ViewportOptions::new(f64::NAN, 100.0).with_fit(false);
        assert!(SvgViewport::new(surface, ignore_frames, options, NoopHooks).is_err());
    }

    #[test]
    fn recache_divides_measured_size_by_zoom() {
        let surface = Surface {
            bounds: Rect::new(0.0, 0.0, 100.0, 50.0),
            size: Size::new(400.0, 100.0),
            ..Surface::default()
        };
        let options = ViewportOptions::new(200.0, 100.0).with_center(false);
        let mut vp = SvgViewport::new(surface, ignore_frames, options, NoopHooks).unwrap();
        assert_eq!(vp.zooms(), Vec2::new(2.0, 2.0));

        vp.recache_view_box();
        assert_eq!(vp.view_box(), ViewBox::new(0.0, 0.0, 200.0, 50.0));
        assert_eq!(vp.zooms(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn debug_info_reports_relative_zoom_mode() {
        let surface = Surface {
            bounds: Rect::new(0.0, 0.0, 100.0, 100.0),
            ..Surface::default()
        };
        let options = ViewportOptions::new(100.0, 100.0).with_separate_zooms(true);
        let mut vp = SvgViewport::new(surface, ignore_frames, options, NoopHooks).unwrap();
        vp.set_ctm(Affine::new([2.0, 0.0, 0.0, 3.0, 0.0, 0.0]));

        let info = vp.debug_info();
        assert_eq!(info.relative_zoom, RelativeZoom::Separate(Vec2::new(2.0, 3.0)));
        assert!(info.pending_frame);
        assert_eq!(info.original, TransformState::IDENTITY);
    }
}
