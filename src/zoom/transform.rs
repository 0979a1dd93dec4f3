/// Pinch-zoom and pan transform controller
///
/// Turns a stream of gesture events into a 2D view transform (uniform scale
/// around the surface centre, then a translation). The state transition is a
/// pure function of `(ZoomPanState, GestureEvent)` so it can be exercised
/// without any widget.
use cgmath::{Matrix3, Vector3};

/// Smallest allowed zoom level
pub const MIN_SCALE: f32 = 0.5;
/// Largest allowed zoom level
pub const MAX_SCALE: f32 = 5.0;

/// Input to the controller, already classified by the gesture detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// First pointer went down
    PointerDown { x: f32, y: f32 },
    /// A single tracked pointer moved
    PointerMove { x: f32, y: f32 },
    /// A pointer was lifted; `remaining` pointers are still down
    PointerUp { remaining: usize },
    /// The detector recognised a pinch
    ScaleBegin,
    /// Incremental multiplicative scale factor since the previous callback
    Scale { factor: f32 },
    /// The pinch is over
    ScaleEnd,
}

/// Where the current touch session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Tracking,
    Pinching,
}

/// Zoom and pan state for one displayed image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomPanState {
    /// Zoom level, always within [`MIN_SCALE`, `MAX_SCALE`]
    pub scale: f32,
    /// Accumulated pan in surface pixels (unbounded)
    pub translate_x: f32,
    pub translate_y: f32,
    /// Position of the previous pointer event of this session
    pub last_touch_x: f32,
    pub last_touch_y: f32,
    pub phase: GesturePhase,
}

impl Default for ZoomPanState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            last_touch_x: 0.0,
            last_touch_y: 0.0,
            phase: GesturePhase::Idle,
        }
    }
}

/// Result of one transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: ZoomPanState,
    /// The visible transform changed and must be re-applied
    pub transform_changed: bool,
}

impl ZoomPanState {
    /// Translation only takes visual effect while zoomed in
    pub fn is_zoomed_in(&self) -> bool {
        self.scale > 1.0
    }

    /// Compute the state after `event`.
    pub fn apply(self, event: GestureEvent) -> Step {
        let mut next = self;
        let mut transform_changed = false;

        match event {
            GestureEvent::ScaleBegin => next.phase = GesturePhase::Pinching,
            GestureEvent::Scale { factor } => {
                next.phase = GesturePhase::Pinching;
                next.scale = clamp_scale(self.scale * factor);
                transform_changed = true;
            }
            GestureEvent::ScaleEnd => next.phase = GesturePhase::Tracking,

            // Single-pointer handling is suppressed while a pinch is running
            _ if self.phase == GesturePhase::Pinching => {}

            GestureEvent::PointerDown { x, y } => {
                next.last_touch_x = x;
                next.last_touch_y = y;
                next.phase = GesturePhase::Tracking;
            }
            GestureEvent::PointerMove { x, y } => {
                if self.is_zoomed_in() {
                    next.translate_x += x - self.last_touch_x;
                    next.translate_y += y - self.last_touch_y;
                    transform_changed = true;
                }
                // Always re-anchor so crossing 1.0 mid-gesture does not jump
                next.last_touch_x = x;
                next.last_touch_y = y;
                next.phase = GesturePhase::Tracking;
            }
            GestureEvent::PointerUp { remaining } => {
                if remaining == 0 {
                    next.phase = GesturePhase::Idle;
                }
            }
        }

        Step {
            state: next,
            transform_changed,
        }
    }
}

/// Clamp a candidate scale into range. NaN collapses to the minimum.
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        MIN_SCALE
    } else {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}

/// 2D affine transform in homogeneous coordinates (column-major).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(pub Matrix3<f32>);

impl Affine {
    /// Map a point through the transform.
    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.0 * Vector3::new(x, y, 1.0);
        (p.x, p.y)
    }

    /// Uniform scale factor of the transform
    pub fn scale(&self) -> f32 {
        self.0.x.x
    }
}

/// Build the view transform for a `width` x `height` surface: scale around the
/// surface centre, then translate.
pub fn apply_transform(state: &ZoomPanState, width: f32, height: f32) -> Affine {
    let s = state.scale;
    let cx = width / 2.0;
    let cy = height / 2.0;

    let scale_about_center = Matrix3::new(
        s, 0.0, 0.0, //
        0.0, s, 0.0, //
        cx * (1.0 - s), cy * (1.0 - s), 1.0,
    );
    let translate = Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        state.translate_x, state.translate_y, 1.0,
    );

    Affine(translate * scale_about_center)
}

/// How the rendering surface places the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Default fit-and-centre placement
    #[default]
    Fit,
    /// Placement driven by the controller's matrix
    Matrix,
}

/// Owns the zoom/pan state of one viewer and the surface display mode.
#[derive(Debug, Clone, Default)]
pub struct TransformController {
    state: ZoomPanState,
    mode: DisplayMode,
}

impl TransformController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ZoomPanState {
        &self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Feed one event. Re-applies the transform when it changed and returns
    /// whether that happened.
    pub fn handle(&mut self, event: GestureEvent, surface_width: f32, surface_height: f32) -> bool {
        let step = self.state.apply(event);
        self.state = step.state;
        if step.transform_changed {
            self.apply(surface_width, surface_height);
        }
        step.transform_changed
    }

    /// Recompute the matrix for the given surface size and switch the surface
    /// into matrix-driven mode.
    pub fn apply(&mut self, surface_width: f32, surface_height: f32) -> Affine {
        self.mode = DisplayMode::Matrix;
        apply_transform(&self.state, surface_width, surface_height)
    }

    /// Matrix to draw with on a surface of this size; `None` while the
    /// surface is still in fit mode.
    pub fn matrix_for(&self, surface_width: f32, surface_height: f32) -> Option<Affine> {
        match self.mode {
            DisplayMode::Fit => None,
            DisplayMode::Matrix => Some(apply_transform(&self.state, surface_width, surface_height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::SquareMatrix;

    const EPS: f32 = 1e-4;

    fn run(state: ZoomPanState, events: &[GestureEvent]) -> ZoomPanState {
        events.iter().fold(state, |s, e| s.apply(*e).state)
    }

    fn pinch(factors: &[f32]) -> Vec<GestureEvent> {
        let mut events = vec![GestureEvent::ScaleBegin];
        events.extend(factors.iter().map(|&factor| GestureEvent::Scale { factor }));
        events.push(GestureEvent::ScaleEnd);
        events
    }

    fn zoomed(scale: f32) -> ZoomPanState {
        ZoomPanState {
            scale,
            ..ZoomPanState::default()
        }
    }

    #[test]
    fn test_scale_is_clamped_after_every_step() {
        let factors = [1.5, 1.2, 0.9];
        let state = run(ZoomPanState::default(), &pinch(&factors));
        let expected = factors.iter().fold(1.0f32, |s, f| (s * f).clamp(MIN_SCALE, MAX_SCALE));

        assert!((state.scale - expected).abs() < EPS);
        assert!((state.scale - 1.62).abs() < EPS);
    }

    #[test]
    fn test_oscillating_factors_differ_from_final_only_clamp() {
        // 1.0 * 10 -> clamped to 5.0, * 0.1 -> 0.5
        let factors = [10.0, 0.1];
        let state = run(ZoomPanState::default(), &pinch(&factors));

        let final_only = factors.iter().product::<f32>().clamp(MIN_SCALE, MAX_SCALE);
        assert!((state.scale - 0.5).abs() < EPS);
        assert!((final_only - 1.0).abs() < EPS);
        assert!((state.scale - final_only).abs() > 0.1);
    }

    #[test]
    fn test_scale_multiplies_current_value() {
        let state = run(zoomed(MAX_SCALE), &pinch(&[0.5]));
        assert!((state.scale - 2.5).abs() < EPS);
    }

    #[test]
    fn test_degenerate_factors_are_clamped() {
        assert_eq!(run(zoomed(2.0), &pinch(&[0.0])).scale, MIN_SCALE);
        assert_eq!(run(zoomed(2.0), &pinch(&[-3.0])).scale, MIN_SCALE);
        assert_eq!(run(zoomed(2.0), &pinch(&[f32::NAN])).scale, MIN_SCALE);
        assert_eq!(run(zoomed(2.0), &pinch(&[f32::INFINITY])).scale, MAX_SCALE);
    }

    #[test]
    fn test_pan_ignored_at_base_zoom_but_anchor_moves() {
        let state = run(
            ZoomPanState::default(),
            &[
                GestureEvent::PointerDown { x: 10.0, y: 10.0 },
                GestureEvent::PointerMove { x: 30.0, y: 50.0 },
            ],
        );

        assert_eq!((state.translate_x, state.translate_y), (0.0, 0.0));
        assert_eq!((state.last_touch_x, state.last_touch_y), (30.0, 50.0));
    }

    #[test]
    fn test_pan_applied_when_zoomed_in() {
        let start = zoomed(2.0);
        let step = start.apply(GestureEvent::PointerDown { x: 10.0, y: 10.0 });
        assert!(!step.transform_changed);

        let step = step.state.apply(GestureEvent::PointerMove { x: 25.0, y: 5.0 });
        assert!(step.transform_changed);
        assert_eq!((step.state.translate_x, step.state.translate_y), (15.0, -5.0));
        assert_eq!((step.state.last_touch_x, step.state.last_touch_y), (25.0, 5.0));
    }

    #[test]
    fn test_exactly_one_is_not_zoomed_in() {
        let step = zoomed(1.0)
            .apply(GestureEvent::PointerDown { x: 0.0, y: 0.0 })
            .state
            .apply(GestureEvent::PointerMove { x: 5.0, y: 5.0 });
        assert!(!step.transform_changed);
        assert_eq!(step.state.translate_x, 0.0);
    }

    #[test]
    fn test_no_jump_when_crossing_threshold_mid_gesture() {
        let mut state = run(
            ZoomPanState::default(),
            &[
                GestureEvent::PointerDown { x: 0.0, y: 0.0 },
                GestureEvent::PointerMove { x: 100.0, y: 100.0 },
            ],
        );
        // Zoom changes between moves without touching the anchor
        state.scale = 2.0;
        let state = state.apply(GestureEvent::PointerMove { x: 110.0, y: 100.0 }).state;

        assert_eq!((state.translate_x, state.translate_y), (10.0, 0.0));
    }

    #[test]
    fn test_pointer_events_suppressed_during_pinch() {
        let state = run(
            zoomed(2.0),
            &[
                GestureEvent::PointerDown { x: 0.0, y: 0.0 },
                GestureEvent::ScaleBegin,
                GestureEvent::PointerMove { x: 50.0, y: 50.0 },
                GestureEvent::PointerDown { x: 70.0, y: 70.0 },
            ],
        );

        assert_eq!(state.phase, GesturePhase::Pinching);
        assert_eq!((state.translate_x, state.translate_y), (0.0, 0.0));
        assert_eq!((state.last_touch_x, state.last_touch_y), (0.0, 0.0));
    }

    #[test]
    fn test_tracking_resumes_after_pinch() {
        let state = run(
            ZoomPanState::default(),
            &[
                GestureEvent::PointerDown { x: 0.0, y: 0.0 },
                GestureEvent::ScaleBegin,
                GestureEvent::Scale { factor: 2.0 },
                GestureEvent::ScaleEnd,
                GestureEvent::PointerMove { x: 4.0, y: 6.0 },
            ],
        );

        assert_eq!(state.phase, GesturePhase::Tracking);
        assert_eq!((state.translate_x, state.translate_y), (4.0, 6.0));
    }

    #[test]
    fn test_state_survives_pointer_up() {
        let state = run(
            ZoomPanState::default(),
            &[
                GestureEvent::ScaleBegin,
                GestureEvent::Scale { factor: 3.0 },
                GestureEvent::ScaleEnd,
                GestureEvent::PointerDown { x: 0.0, y: 0.0 },
                GestureEvent::PointerMove { x: 8.0, y: 0.0 },
                GestureEvent::PointerUp { remaining: 0 },
            ],
        );

        assert_eq!(state.phase, GesturePhase::Idle);
        assert!((state.scale - 3.0).abs() < EPS);
        assert_eq!(state.translate_x, 8.0);
    }

    #[test]
    fn test_transform_scales_about_center_then_translates() {
        let state = ZoomPanState {
            scale: 2.0,
            translate_x: 5.0,
            translate_y: -7.0,
            ..ZoomPanState::default()
        };
        let matrix = apply_transform(&state, 200.0, 100.0);

        // The centre only moves by the translation
        let (x, y) = matrix.map_point(100.0, 50.0);
        assert!((x - 105.0).abs() < EPS && (y - 43.0).abs() < EPS);

        // The origin is pushed away from the centre by the scale
        let (x, y) = matrix.map_point(0.0, 0.0);
        assert!((x - (-100.0 + 5.0)).abs() < EPS && (y - (-50.0 - 7.0)).abs() < EPS);
        assert_eq!(matrix.scale(), 2.0);
    }

    #[test]
    fn test_identity_state_gives_identity_matrix() {
        let matrix = apply_transform(&ZoomPanState::default(), 640.0, 480.0);
        assert_eq!(matrix.0, Matrix3::identity());
    }

    #[test]
    fn test_controller_switches_to_matrix_mode_on_first_apply() {
        let mut controller = TransformController::new();
        assert_eq!(controller.mode(), DisplayMode::Fit);

        // Unzoomed pan does not touch the surface
        assert!(!controller.handle(GestureEvent::PointerDown { x: 0.0, y: 0.0 }, 100.0, 100.0));
        assert!(!controller.handle(GestureEvent::PointerMove { x: 9.0, y: 9.0 }, 100.0, 100.0));
        assert_eq!(controller.mode(), DisplayMode::Fit);
        assert!(controller.matrix_for(100.0, 100.0).is_none());

        assert!(controller.handle(GestureEvent::Scale { factor: 1.5 }, 100.0, 100.0));
        assert_eq!(controller.mode(), DisplayMode::Matrix);
        assert_eq!(controller.matrix_for(100.0, 100.0).map(|m| m.scale()), Some(1.5));

        // Zooming back out keeps matrix mode
        controller.handle(GestureEvent::Scale { factor: 0.1 }, 100.0, 100.0);
        assert_eq!(controller.mode(), DisplayMode::Matrix);
        assert_eq!(controller.state().scale, MIN_SCALE);
    }
}
