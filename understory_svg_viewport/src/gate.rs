// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interception of proposed transforms before they are committed.
//!
//! Every change to the live transform passes through [`ViewportHooks`]:
//! [`ViewportHooks::evaluate_zoom`] sees zoom changes relative to the
//! initial view, [`ViewportHooks::evaluate_pan`] sees absolute pan changes.
//! Each answers with a [`Verdict`] that can allow, reject, or override the
//! change per axis. Notifications fire only for changes that survive.
//!
//! Hooks run synchronously inside [`crate::SvgViewport::set_ctm`], which
//! holds `&mut` on the viewport for the duration, so a hook cannot re-enter
//! the viewport it is gating.

use kurbo::Vec2;

use crate::state::{TransformState, is_valid_scale};

/// Per-axis answer of a gating hook.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum AxisVerdict {
    /// Keep the proposed value.
    #[default]
    Allow,
    /// Keep the current value.
    Reject,
    /// Replace the proposed value.
    ///
    /// Zoom overrides are relative to the initial view (`1.0` is the
    /// initial zoom); pan overrides are absolute translations.
    Override(f64),
}

/// Answer of a gating hook for both axes.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Verdict {
    /// Let the change through unchanged.
    #[default]
    Allow,
    /// Revert the change on both axes.
    Reject,
    /// Decide each axis separately.
    Axes {
        /// Horizontal axis.
        x: AxisVerdict,
        /// Vertical axis.
        y: AxisVerdict,
    },
}

impl Verdict {
    /// Per-axis verdict.
    #[must_use]
    pub fn axes(x: AxisVerdict, y: AxisVerdict) -> Self {
        Self::Axes { x, y }
    }

    /// Overrides both axes with the same value.
    #[must_use]
    pub fn override_both(value: f64) -> Self {
        Self::axes(AxisVerdict::Override(value), AxisVerdict::Override(value))
    }

    /// Splits the verdict into its horizontal and vertical parts.
    #[must_use]
    pub fn resolve(self) -> (AxisVerdict, AxisVerdict) {
        match self {
            Self::Allow => (AxisVerdict::Allow, AxisVerdict::Allow),
            Self::Reject => (AxisVerdict::Reject, AxisVerdict::Reject),
            Self::Axes { x, y } => (x, y),
        }
    }
}

impl From<bool> for Verdict {
    fn from(allow: bool) -> Self {
        if allow { Self::Allow } else { Self::Reject }
    }
}

/// Zoom relative to the initial view, as handed to hooks.
///
/// The viewport reports [`RelativeZoom::Uniform`] unless
/// [`crate::ViewportOptions::separate_zooms_enabled`] is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RelativeZoom {
    /// Single scale shared by both axes.
    Uniform(f64),
    /// Independent horizontal and vertical scales.
    Separate(Vec2),
}

impl RelativeZoom {
    /// Horizontal component.
    #[must_use]
    pub fn x(self) -> f64 {
        match self {
            Self::Uniform(zoom) => zoom,
            Self::Separate(zooms) => zooms.x,
        }
    }

    /// Vertical component.
    #[must_use]
    pub fn y(self) -> f64 {
        match self {
            Self::Uniform(zoom) => zoom,
            Self::Separate(zooms) => zooms.y,
        }
    }
}

/// Gating and notification strategy injected into [`crate::SvgViewport`].
///
/// All methods default to "allow" / "ignore", so implementors only override
/// what they need.
pub trait ViewportHooks {
    /// Called before a zoom change is committed.
    ///
    /// Without [`crate::ViewportOptions::separate_zooms_enabled`] both
    /// arguments are [`RelativeZoom::Uniform`] and only the horizontal part
    /// of the returned verdict is used, for both axes: the `y` half of a
    /// [`Verdict::Axes`] is ignored.
    fn evaluate_zoom(&mut self, _current: RelativeZoom, _proposed: RelativeZoom) -> Verdict {
        Verdict::Allow
    }

    /// Called before a pan change is committed.
    fn evaluate_pan(&mut self, _current: Vec2, _proposed: Vec2) -> Verdict {
        Verdict::Allow
    }

    /// Called after a zoom change was committed.
    fn notify_zoom(&mut self, _zoom: RelativeZoom) {}

    /// Called after a pan change was committed, with the absolute pan.
    fn notify_pan(&mut self, _pan: Vec2) {}
}

/// Hooks that allow everything and observe nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl ViewportHooks for NoopHooks {}

/// What a call to [`crate::SvgViewport::set_ctm`] committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CommitOutcome {
    /// The zoom changed.
    pub zoomed: bool,
    /// The pan changed.
    pub panned: bool,
}

impl CommitOutcome {
    /// Returns `true` if anything was committed.
    #[must_use]
    pub fn changed(self) -> bool {
        self.zoomed || self.panned
    }
}

/// Inputs to one gate evaluation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Gate {
    pub(crate) original: TransformState,
    pub(crate) active: TransformState,
    pub(crate) separate_zooms: bool,
}

impl Gate {
    pub(crate) fn relative_zoom(&self, state: TransformState) -> RelativeZoom {
        if self.separate_zooms {
            RelativeZoom::Separate(Vec2::new(
                state.zoom_x / self.original.zoom_x,
                state.zoom_y / self.original.zoom_y,
            ))
        } else {
            RelativeZoom::Uniform(state.zoom_x / self.original.zoom_x)
        }
    }

    /// Runs `proposed` through `hooks` and returns the state to commit.
    ///
    /// Returns `None` when nothing differs from the active state, or when the
    /// hooks reverted both axes of every proposed change. A change survives
    /// while at least one of its axes was not reverted, even if that axis
    /// did not move.
    pub(crate) fn evaluate<H: ViewportHooks + ?Sized>(
        &self,
        hooks: &mut H,
        mut proposed: TransformState,
    ) -> Option<(TransformState, CommitOutcome)> {
        let active = self.active;
        sanitize(&mut proposed.zoom_x, active.zoom_x, "zoom_x", is_valid_scale);
        sanitize(&mut proposed.zoom_y, active.zoom_y, "zoom_y", is_valid_scale);
        sanitize(&mut proposed.x, active.x, "x", f64::is_finite);
        sanitize(&mut proposed.y, active.y, "y", f64::is_finite);

        let will_zoom = zoom_differs(active, proposed);
        let will_pan = pan_differs(active, proposed);
        if !will_zoom && !will_pan {
            return None;
        }

        let mut zoomed = will_zoom;
        if will_zoom {
            let verdict =
                hooks.evaluate_zoom(self.relative_zoom(active), self.relative_zoom(proposed));
            let (vx, vy) = if self.separate_zooms {
                verdict.resolve()
            } else {
                // A single scalar was offered, so a single answer is honored.
                let (v, _) = verdict.resolve();
                (v, v)
            };
            let original = self.original;
            let reverted_x = apply_axis(vx, &mut proposed.zoom_x, active.zoom_x, "zoom_x", |v| {
                Some(v * original.zoom_x).filter(|z| is_valid_scale(*z))
            });
            let reverted_y = apply_axis(vy, &mut proposed.zoom_y, active.zoom_y, "zoom_y", |v| {
                Some(v * original.zoom_y).filter(|z| is_valid_scale(*z))
            });
            zoomed = !(reverted_x && reverted_y);
        }

        let mut panned = will_pan;
        if will_pan {
            let verdict = hooks.evaluate_pan(active.pan(), proposed.pan());
            let (vx, vy) = verdict.resolve();
            let reverted_x = apply_axis(vx, &mut proposed.x, active.x, "x", |v| {
                Some(v).filter(|p| p.is_finite())
            });
            let reverted_y = apply_axis(vy, &mut proposed.y, active.y, "y", |v| {
                Some(v).filter(|p| p.is_finite())
            });
            panned = !(reverted_x && reverted_y);
        }

        let outcome = CommitOutcome { zoomed, panned };
        outcome.changed().then_some((proposed, outcome))
    }
}

fn zoom_differs(a: TransformState, b: TransformState) -> bool {
    a.zoom_x != b.zoom_x || a.zoom_y != b.zoom_y
}

fn pan_differs(a: TransformState, b: TransformState) -> bool {
    a.x != b.x || a.y != b.y
}

fn sanitize(value: &mut f64, current: f64, axis: &'static str, valid: fn(f64) -> bool) {
    if !valid(*value) {
        tracing::warn!(axis, proposed = *value, "ignoring degenerate transform component");
        *value = current;
    }
}

/// Applies `verdict` to one axis. Returns `true` if the axis was reverted to
/// `current`, either by a rejection or by an unusable override.
fn apply_axis(
    verdict: AxisVerdict,
    value: &mut f64,
    current: f64,
    axis: &'static str,
    resolve_override: impl FnOnce(f64) -> Option<f64>,
) -> bool {
    match verdict {
        AxisVerdict::Allow => false,
        AxisVerdict::Reject => {
            *value = current;
            true
        }
        AxisVerdict::Override(requested) => match resolve_override(requested) {
            Some(resolved) => {
                *value = resolved;
                false
            }
            None => {
                tracing::warn!(
                    axis,
                    requested,
                    "ignoring degenerate override; keeping current value"
                );
                *value = current;
                true
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use kurbo::Vec2;

    use super::{AxisVerdict, CommitOutcome, Gate, RelativeZoom, Verdict, ViewportHooks};
    use crate::state::TransformState;

    const ORIGINAL: TransformState = TransformState {
        zoom_x: 2.0,
        zoom_y: 2.0,
        x: 0.0,
        y: 0.0,
    };

    #[derive(Default)]
    struct Scripted {
        zoom: Verdict,
        pan: Verdict,
        zoom_calls: Vec<(RelativeZoom, RelativeZoom)>,
        pan_calls: Vec<(Vec2, Vec2)>,
    }

    impl ViewportHooks for Scripted {
        fn evaluate_zoom(&mut self, current: RelativeZoom, proposed: RelativeZoom) -> Verdict {
            self.zoom_calls.push((current, proposed));
            self.zoom
        }

        fn evaluate_pan(&mut self, current: Vec2, proposed: Vec2) -> Verdict {
            self.pan_calls.push((current, proposed));
            self.pan
        }
    }

    fn gate(separate_zooms: bool) -> Gate {
        Gate {
            original: ORIGINAL,
            active: ORIGINAL,
            separate_zooms,
        }
    }

    #[test]
    fn identical_proposal_skips_hooks() {
        let mut hooks = Scripted::default();
        assert!(gate(false).evaluate(&mut hooks, ORIGINAL).is_none());
        assert!(hooks.zoom_calls.is_empty());
        assert!(hooks.pan_calls.is_empty());
    }

    #[test]
    fn uniform_zoom_hook_sees_relative_scalars() {
        let mut hooks = Scripted::default();
        let proposed = TransformState {
            zoom_x: 3.0,
            zoom_y: 3.0,
            ..ORIGINAL
        };
        let (state, outcome) = gate(false).evaluate(&mut hooks, proposed).unwrap();
        assert_eq!(state, proposed);
        assert_eq!(
            outcome,
            CommitOutcome {
                zoomed: true,
                panned: false
            }
        );
        assert_eq!(
            hooks.zoom_calls,
            [(RelativeZoom::Uniform(1.0), RelativeZoom::Uniform(1.5))]
        );
        assert!(hooks.pan_calls.is_empty());
    }

    #[test]
    fn uniform_override_applies_to_both_axes() {
        let mut hooks = Scripted {
            zoom: Verdict::axes(AxisVerdict::Override(4.0), AxisVerdict::Reject),
            ..Scripted::default()
        };
        let proposed = TransformState {
            zoom_x: 3.0,
            zoom_y: 3.0,
            ..ORIGINAL
        };
        let (state, _) = gate(false).evaluate(&mut hooks, proposed).unwrap();
        assert_eq!(state.zooms(), Vec2::new(8.0, 8.0));
    }

    #[test]
    fn separate_zoom_rejects_one_axis_and_overrides_the_other() {
        let mut hooks = Scripted {
            zoom: Verdict::axes(AxisVerdict::Reject, AxisVerdict::Override(0.5)),
            ..Scripted::default()
        };
        let proposed = TransformState {
            zoom_x: 3.0,
            zoom_y: 5.0,
            ..ORIGINAL
        };
        let (state, _) = gate(true).evaluate(&mut hooks, proposed).unwrap();
        assert_eq!(state.zooms(), Vec2::new(2.0, 1.0));
        assert_eq!(
            hooks.zoom_calls,
            [(
                RelativeZoom::Separate(Vec2::new(1.0, 1.0)),
                RelativeZoom::Separate(Vec2::new(1.5, 2.5))
            )]
        );
    }

    #[test]
    fn rejecting_everything_commits_nothing() {
        let mut hooks = Scripted {
            zoom: Verdict::Reject,
            pan: Verdict::axes(AxisVerdict::Reject, AxisVerdict::Reject),
            ..Scripted::default()
        };
        let proposed = TransformState {
            zoom_x: 3.0,
            zoom_y: 3.0,
            x: 10.0,
            y: 10.0,
        };
        assert!(gate(true).evaluate(&mut hooks, proposed).is_none());
        assert_eq!(hooks.zoom_calls.len(), 1);
        assert_eq!(hooks.pan_calls.len(), 1);
    }

    #[test]
    fn rejecting_the_moved_axis_still_commits_the_other() {
        let mut hooks = Scripted {
            pan: Verdict::axes(AxisVerdict::Reject, AxisVerdict::Allow),
            ..Scripted::default()
        };
        let proposed = TransformState { x: 30.0, ..ORIGINAL };
        let (state, outcome) = gate(false).evaluate(&mut hooks, proposed).unwrap();
        assert_eq!(state, ORIGINAL);
        assert_eq!(
            outcome,
            CommitOutcome {
                zoomed: false,
                panned: true
            }
        );
    }

    #[test]
    fn degenerate_zoom_override_keeps_current_axis() {
        let mut hooks = Scripted {
            zoom: Verdict::axes(AxisVerdict::Override(0.0), AxisVerdict::Override(-1.0)),
            pan: Verdict::axes(AxisVerdict::Override(f64::INFINITY), AxisVerdict::Allow),
            ..Scripted::default()
        };
        let proposed = TransformState {
            zoom_x: 3.0,
            zoom_y: 3.0,
            x: 4.0,
            y: 6.0,
        };
        let (state, outcome) = gate(true).evaluate(&mut hooks, proposed).unwrap();
        assert_eq!(state.zooms(), ORIGINAL.zooms());
        assert_eq!(state.pan(), Vec2::new(0.0, 6.0));
        assert!(!outcome.zoomed);
        assert!(outcome.panned);
    }

    #[test]
    fn degenerate_proposal_is_reverted_before_hooks() {
        let mut hooks = Scripted::default();
        let proposed = TransformState {
            zoom_x: 0.0,
            zoom_y: f64::NAN,
            ..ORIGINAL
        };
        assert!(gate(true).evaluate(&mut hooks, proposed).is_none());
        assert!(hooks.zoom_calls.is_empty());
    }

    #[test]
    fn verdict_from_bool() {
        assert_eq!(Verdict::from(true), Verdict::Allow);
        assert_eq!(Verdict::from(false), Verdict::Reject);
        assert_eq!(
            Verdict::override_both(2.0).resolve(),
            (AxisVerdict::Override(2.0), AxisVerdict::Override(2.0))
        );
    }
}
