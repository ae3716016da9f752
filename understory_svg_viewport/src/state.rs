// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use kurbo::{Affine, Rect, Size, Vec2};

/// Axis‑aligned pan/zoom transform of the viewport.
///
/// `zoom_x`/`zoom_y` are the absolute scale factors applied to the viewport
/// contents and `x`/`y` the translation in surface‑local units. This is the
/// `a`, `d`, `e`, `f` subset of an SVG matrix; skew is never stored.
///
/// Committed states always have both zooms finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformState {
    /// Horizontal scale factor.
    pub zoom_x: f64,
    /// Vertical scale factor.
    pub zoom_y: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl TransformState {
    /// Unit zoom, no translation.
    pub const IDENTITY: Self = Self {
        zoom_x: 1.0,
        zoom_y: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Reads the scale (`a`, `d`) and translation (`e`, `f`) coefficients of
    /// `affine`. Skew coefficients (`b`, `c`) are ignored.
    #[must_use]
    pub fn from_affine(affine: Affine) -> Self {
        let [a, _b, _c, d, e, f] = affine.as_coeffs();
        Self {
            zoom_x: a,
            zoom_y: d,
            x: e,
            y: f,
        }
    }

    /// Returns the equivalent affine matrix `[zoom_x, 0, 0, zoom_y, x, y]`.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::new([self.zoom_x, 0.0, 0.0, self.zoom_y, self.x, self.y])
    }

    /// Both scale factors as a vector.
    #[must_use]
    pub fn zooms(self) -> Vec2 {
        Vec2::new(self.zoom_x, self.zoom_y)
    }

    /// Translation as a vector.
    #[must_use]
    pub fn pan(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Returns `true` if both scale factors are finite and strictly positive.
    #[must_use]
    pub fn is_valid(self) -> bool {
        is_valid_scale(self.zoom_x) && is_valid_scale(self.zoom_y)
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub(crate) fn is_valid_scale(scale: f64) -> bool {
    scale.is_finite() && scale > 0.0
}

/// Logical content rectangle of the surface.
///
/// Mirrors the four numbers of an SVG `viewBox` attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewBox {
    /// Minimum x of the content.
    pub x: f64,
    /// Minimum y of the content.
    pub y: f64,
    /// Content width.
    pub width: f64,
    /// Content height.
    pub height: f64,
}

impl ViewBox {
    /// Creates a view box from its origin and extent.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parses the value of an SVG `viewBox` attribute.
    ///
    /// Numbers may be separated by any mix of whitespace and commas. Only the
    /// first four values are used; trailing values are ignored.
    ///
    /// ```rust
    /// use understory_svg_viewport::ViewBox;
    ///
    /// let vb = ViewBox::parse("0 0, 200 100").unwrap();
    /// assert_eq!(vb, ViewBox::new(0.0, 0.0, 200.0, 100.0));
    /// ```
    pub fn parse(value: &str) -> Result<Self, ViewBoxError> {
        let mut values = [0.0_f64; 4];
        let mut tokens = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty());
        for (index, slot) in values.iter_mut().enumerate() {
            let token = tokens
                .next()
                .ok_or(ViewBoxError::MissingValue { found: index })?;
            *slot = token
                .parse()
                .map_err(|_| ViewBoxError::InvalidNumber { index })?;
        }
        let [x, y, width, height] = values;
        Ok(Self::new(x, y, width, height))
    }

    /// Converts a measured rectangle into a view box.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// The view box as a rectangle.
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// The view box extent.
    #[must_use]
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns an error unless both extents are finite and strictly positive.
    ///
    /// Every scale computation divides by the extent, so a degenerate view
    /// box would otherwise produce infinite or NaN zoom.
    pub fn validate(self) -> Result<Self, ViewBoxError> {
        if is_valid_scale(self.width) && is_valid_scale(self.height) {
            Ok(self)
        } else {
            Err(ViewBoxError::Degenerate {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Error produced while deriving a [`ViewBox`] from surface geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewBoxError {
    /// The `viewBox` attribute held fewer than four values.
    MissingValue {
        /// Number of values that were present.
        found: usize,
    },
    /// A `viewBox` value was not a number.
    InvalidNumber {
        /// Position of the offending value (0..4).
        index: usize,
    },
    /// The content rectangle has a zero, negative, or non-finite extent.
    Degenerate {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// The target size the content is scaled into has a zero, negative, or
    /// non-finite extent.
    InvalidTarget {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
}

impl fmt::Display for ViewBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { found } => {
                write!(f, "viewBox needs 4 values, found {found}")
            }
            Self::InvalidNumber { index } => {
                write!(f, "viewBox value at position {index} is not a number")
            }
            Self::Degenerate { width, height } => {
                write!(f, "content extent {width}x{height} cannot be scaled")
            }
            Self::InvalidTarget { width, height } => {
                write!(f, "target size {width}x{height} cannot be scaled into")
            }
        }
    }
}

impl core::error::Error for ViewBoxError {}
