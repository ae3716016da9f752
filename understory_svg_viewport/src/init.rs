// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Initial zoom/pan derived from the surface geometry.

use crate::options::ViewportOptions;
use crate::state::{TransformState, ViewBox};

/// State implied by a declared `viewBox`: the content scaled into the target
/// size and centered.
///
/// Without separate zooms the smaller ratio is used on both axes so the
/// aspect ratio is preserved.
pub(crate) fn declared_state(view_box: ViewBox, options: &ViewportOptions) -> TransformState {
    let scale_x = options.width / view_box.width;
    let scale_y = options.height / view_box.height;
    let (zoom_x, zoom_y) = if options.separate_zooms_enabled {
        (scale_x, scale_y)
    } else {
        let zoom = scale_x.min(scale_y);
        (zoom, zoom)
    };
    TransformState {
        zoom_x,
        zoom_y,
        x: (options.width - view_box.width * zoom_x) / 2.0,
        y: (options.height - view_box.height * zoom_y) / 2.0,
    }
}

/// Applies the fit/contain and center options on top of `start`.
///
/// The result is the baseline ("relative zoom 1.0") of the viewport.
pub(crate) fn process_ctm(
    view_box: ViewBox,
    options: &ViewportOptions,
    start: TransformState,
) -> TransformState {
    let mut state = start;

    let scale_x = options.width / view_box.width;
    let scale_y = options.height / view_box.height;
    if let Some(scale) = options.scale_mode().uniform_scale(scale_x, scale_y) {
        state.zoom_x = scale;
        state.zoom_y = scale;
        state.x = -view_box.x * scale;
        state.y = -view_box.y * scale;
    }

    if options.center {
        state.x = (options.width - (view_box.width + view_box.x * 2.0) * state.zoom_x) / 2.0;
        state.y = (options.height - (view_box.height + view_box.y * 2.0) * state.zoom_y) / 2.0;
    }

    state
}
