// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`

use crate::frame::FrameTiming;

/// How the initial scale is derived from the view box.
///
/// Resolved from [`ViewportOptions::fit`] and [`ViewportOptions::contain`];
/// see [`ViewportOptions::scale_mode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScaleMode {
    /// Keep whatever scale the view box produced.
    None,
    /// Uniform scale that keeps all content visible; may letterbox.
    #[default]
    Fit,
    /// Uniform scale that leaves no empty space; may crop.
    Contain,
}

impl ScaleMode {
    /// Picks the uniform scale for the given per-axis ratios, if any.
    #[must_use]
    pub fn uniform_scale(self, scale_x: f64, scale_y: f64) -> Option<f64> {
        match self {
            Self::None => None,
            Self::Fit => Some(scale_x.min(scale_y)),
            Self::Contain => Some(scale_x.max(scale_y)),
        }
    }
}

/// Cadence at which committed transforms are written to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RefreshRate {
    /// Follow the display refresh.
    #[default]
    Auto,
    /// Write at most this many times per second.
    ///
    /// Only rates strictly between 1 and 60 Hz throttle below the display;
    /// any other value falls back to display sync.
    Hz(f64),
}

impl RefreshRate {
    /// How the host should schedule the next frame.
    #[must_use]
    pub fn frame_timing(self) -> FrameTiming {
        match self {
            Self::Hz(hz) if hz > 1.0 && hz < 60.0 => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "rate is in (1, 60), so the period is below 1000 ms"
                )]
                let millis = (1000.0 / hz).floor() as u64;
                FrameTiming::Timeout(Duration::from_millis(millis))
            }
            _ => FrameTiming::DisplaySync,
        }
    }
}

/// Construction options for [`crate::SvgViewport`].
///
/// Options are read once at construction and never change afterwards. The
/// gating and notification callbacks are not part of the options; they are
/// supplied as a [`crate::ViewportHooks`] implementation.
///
/// ```rust
/// use understory_svg_viewport::{RefreshRate, ScaleMode, ViewportOptions};
///
/// let options = ViewportOptions::new(300.0, 150.0)
///     .with_contain(true)
///     .with_refresh_rate(RefreshRate::Hz(30.0));
/// // `fit` defaults to on and wins over `contain`.
/// assert_eq!(options.scale_mode(), ScaleMode::Fit);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportOptions {
    /// Target viewport width.
    pub width: f64,
    /// Target viewport height.
    pub height: f64,
    /// Scale uniformly so all content is visible.
    pub fit: bool,
    /// Scale uniformly so no empty space remains. Ignored when `fit` is set.
    pub contain: bool,
    /// Center the content inside the target size.
    pub center: bool,
    /// Allow the horizontal and vertical zoom to differ.
    pub separate_zooms_enabled: bool,
    /// Surface write cadence.
    pub refresh_rate: RefreshRate,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            fit: true,
            contain: false,
            center: true,
            separate_zooms_enabled: false,
            refresh_rate: RefreshRate::Auto,
        }
    }
}

impl ViewportOptions {
    /// Default options for a viewport of the given target size.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Sets the `fit` flag.
    #[must_use]
    pub fn with_fit(mut self, fit: bool) -> Self {
        self.fit = fit;
        self
    }

    /// Sets the `contain` flag.
    #[must_use]
    pub fn with_contain(mut self, contain: bool) -> Self {
        self.contain = contain;
        self
    }

    /// Sets the `center` flag.
    #[must_use]
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Enables or disables independent horizontal/vertical zoom.
    #[must_use]
    pub fn with_separate_zooms(mut self, enabled: bool) -> Self {
        self.separate_zooms_enabled = enabled;
        self
    }

    /// Sets the surface write cadence.
    #[must_use]
    pub fn with_refresh_rate(mut self, refresh_rate: RefreshRate) -> Self {
        self.refresh_rate = refresh_rate;
        self
    }

    /// Resolves the `fit`/`contain` flags. `fit` wins when both are set.
    #[must_use]
    pub fn scale_mode(&self) -> ScaleMode {
        if self.fit {
            ScaleMode::Fit
        } else if self.contain {
            ScaleMode::Contain
        } else {
            ScaleMode::None
        }
    }
}
