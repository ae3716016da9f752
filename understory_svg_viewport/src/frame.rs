// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame coalescing of surface writes.

use core::time::Duration;

use crate::options::RefreshRate;
use crate::state::TransformState;
use crate::surface::SvgSurface;

/// When the host should run the next requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameTiming {
    /// On the next display refresh (`requestAnimationFrame` or equivalent).
    DisplaySync,
    /// After a fixed delay.
    Timeout(Duration),
}

/// Host primitive that runs [`crate::SvgViewport::on_frame`] later.
///
/// Implementations must not call back into the viewport synchronously; the
/// frame is expected to run on a later tick of the host's event loop.
pub trait FrameRequester {
    /// Arranges for one future call to [`crate::SvgViewport::on_frame`].
    fn request_frame(&mut self, timing: FrameTiming);
}

impl<F: FnMut(FrameTiming)> FrameRequester for F {
    fn request_frame(&mut self, timing: FrameTiming) {
        self(timing);
    }
}

/// Guarantees at most one pending surface write per frame.
///
/// Each viewport owns exactly one scheduler; nothing is shared between
/// viewports.
#[derive(Clone, Debug, Default)]
pub struct FrameScheduler {
    pending: bool,
    refresh_rate: RefreshRate,
}

impl FrameScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new(refresh_rate: RefreshRate) -> Self {
        Self {
            pending: false,
            refresh_rate,
        }
    }

    /// Returns `true` while a frame has been requested but not yet flushed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The configured write cadence.
    #[must_use]
    pub fn refresh_rate(&self) -> RefreshRate {
        self.refresh_rate
    }

    /// Requests a frame unless one is already pending.
    ///
    /// Returns `true` if a new request was issued.
    pub fn schedule(&mut self, requester: &mut impl FrameRequester) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        let timing = self.refresh_rate.frame_timing();
        tracing::trace!(?timing, "requesting viewport frame");
        requester.request_frame(timing);
        true
    }

    /// Writes `state` to `surface` if a frame is pending, then clears the flag.
    ///
    /// `state` must be the live state at flush time, not a snapshot taken
    /// when the frame was scheduled. Returns `true` if a write happened.
    pub fn flush(&mut self, state: TransformState, surface: &mut impl SvgSurface) -> bool {
        if !self.pending {
            return false;
        }
        self.write(state, surface);
        true
    }

    /// Writes `state` unconditionally and clears any pending request.
    pub fn write(&mut self, state: TransformState, surface: &mut impl SvgSurface) {
        surface.apply_transform(state.to_affine());
        self.pending = false;
        tracing::trace!(
            zoom_x = state.zoom_x,
            zoom_y = state.zoom_y,
            x = state.x,
            y = state.y,
            "flushed viewport transform"
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::time::Duration;

    use kurbo::{Affine, Rect, Size};

    use super::{FrameScheduler, FrameTiming};
    use crate::options::RefreshRate;
    use crate::state::TransformState;
    use crate::surface::SvgSurface;

    #[derive(Default)]
    struct Writes(Vec<Affine>);

    impl SvgSurface for Writes {
        fn declared_view_box(&self) -> Option<String> {
            None
        }
        fn measured_bounds(&self) -> Rect {
            Rect::ZERO
        }
        fn measured_size(&self) -> Size {
            Size::ZERO
        }
        fn clear_declared_view_box(&mut self) {}
        fn apply_transform(&mut self, transform: Affine) {
            self.0.push(transform);
        }
    }

    #[test]
    fn schedule_requests_once_until_flushed() {
        let mut requests = Vec::new();
        let mut requester = |timing: FrameTiming| requests.push(timing);
        let mut scheduler = FrameScheduler::new(RefreshRate::Hz(20.0));

        assert!(scheduler.schedule(&mut requester));
        assert!(!scheduler.schedule(&mut requester));
        assert!(scheduler.is_pending());

        let mut surface = Writes::default();
        assert!(scheduler.flush(TransformState::IDENTITY, &mut surface));
        assert!(!scheduler.is_pending());

        // A commit after the flush must be able to schedule again.
        assert!(scheduler.schedule(&mut requester));
        assert_eq!(
            requests,
            [
                FrameTiming::Timeout(Duration::from_millis(50)),
                FrameTiming::Timeout(Duration::from_millis(50)),
            ]
        );
    }

    #[test]
    fn flush_without_request_is_a_no_op() {
        let mut scheduler = FrameScheduler::default();
        let mut surface = Writes::default();
        assert!(!scheduler.flush(TransformState::IDENTITY, &mut surface));
        assert!(surface.0.is_empty());
    }
}
