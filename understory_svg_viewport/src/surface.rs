// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::format;
use alloc::string::String;

use kurbo::{Affine, Rect, Size};

/// The SVG element hosting the viewport, as seen by [`crate::SvgViewport`].
///
/// Implementations wrap whatever backs the surface: a DOM element, a
/// retained scene node, or a test double. Geometry is read during
/// construction and by [`crate::SvgViewport::recache_view_box`]; the
/// transform is written only when a scheduled frame is flushed.
pub trait SvgSurface {
    /// Raw value of the root element's `viewBox` attribute, if declared.
    fn declared_view_box(&self) -> Option<String>;

    /// Bounding box of the viewport contents in their own coordinate space.
    fn measured_bounds(&self) -> Rect;

    /// Size the viewport currently occupies on screen.
    fn measured_size(&self) -> Size;

    /// Removes the declared `viewBox`; scaling is owned by the viewport from
    /// then on.
    fn clear_declared_view_box(&mut self);

    /// Writes `transform` onto the viewport element.
    fn apply_transform(&mut self, transform: Affine);
}

/// Formats `transform` as an SVG `transform` attribute value.
///
/// ```rust
/// use kurbo::Affine;
/// use understory_svg_viewport::transform_attribute;
///
/// let value = transform_attribute(Affine::new([1.5, 0.0, 0.0, 1.5, 0.0, 75.0]));
/// assert_eq!(value, "matrix(1.5,0,0,1.5,0,75)");
/// ```
#[must_use]
pub fn transform_attribute(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!("matrix({a},{b},{c},{d},{e},{f})")
}
