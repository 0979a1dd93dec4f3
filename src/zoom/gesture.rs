/// Gesture detection
///
/// Classifies raw pointer input (touch fingers, mouse button, wheel) into the
/// [`GestureEvent`]s the transform controller understands. Two or more fingers
/// form a pinch whose incremental factor is the ratio of the current finger
/// span to the previous one.
use super::transform::GestureEvent;

/// Wheel pixel deltas are converted to notches at this rate
const PIXELS_PER_LINE: f32 = 60.0;

/// Spans below this are too small to derive a stable ratio from
const MIN_SPAN: f32 = 1.0;

/// Raw pointer input in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    FingerDown { id: u64, x: f32, y: f32 },
    FingerMove { id: u64, x: f32, y: f32 },
    FingerUp { id: u64 },
    MouseDown { x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    MouseUp,
    /// Wheel scroll in notches (positive zooms in)
    WheelLines { lines: f32 },
    /// Wheel scroll in pixels (trackpads)
    WheelPixels { pixels: f32 },
}

#[derive(Debug, Clone)]
pub struct GestureRouter {
    fingers: Vec<(u64, f32, f32)>,
    mouse_down: bool,
    /// Span of the previous pinch callback; `None` while not pinching
    last_span: Option<f32>,
    wheel_step: f32,
}

impl GestureRouter {
    pub fn new(wheel_step: f32) -> Self {
        Self {
            fingers: Vec::new(),
            mouse_down: false,
            last_span: None,
            wheel_step,
        }
    }

    /// A pinch is currently in progress
    pub fn is_scaling(&self) -> bool {
        self.last_span.is_some()
    }

    pub fn feed(&mut self, input: PointerInput) -> Vec<GestureEvent> {
        match input {
            PointerInput::FingerDown { id, x, y } => self.finger_down(id, x, y),
            PointerInput::FingerMove { id, x, y } => self.finger_move(id, x, y),
            PointerInput::FingerUp { id } => self.finger_up(id),
            PointerInput::MouseDown { x, y } => {
                self.mouse_down = true;
                vec![GestureEvent::PointerDown { x, y }]
            }
            PointerInput::MouseMove { x, y } if self.mouse_down => {
                vec![GestureEvent::PointerMove { x, y }]
            }
            PointerInput::MouseMove { .. } => Vec::new(),
            PointerInput::MouseUp if self.mouse_down => {
                self.mouse_down = false;
                vec![GestureEvent::PointerUp { remaining: 0 }]
            }
            PointerInput::MouseUp => Vec::new(),
            PointerInput::WheelLines { lines } => self.wheel(lines),
            PointerInput::WheelPixels { pixels } => self.wheel(pixels / PIXELS_PER_LINE),
        }
    }

    fn finger_down(&mut self, id: u64, x: f32, y: f32) -> Vec<GestureEvent> {
        self.fingers.retain(|(f, _, _)| *f != id);
        self.fingers.push((id, x, y));

        match self.fingers.len() {
            1 => vec![GestureEvent::PointerDown { x, y }],
            _ if !self.is_scaling() => {
                self.last_span = Some(self.span());
                vec![GestureEvent::ScaleBegin]
            }
            _ => {
                // Another finger joined: restart the ratio from the new span
                self.last_span = Some(self.span());
                Vec::new()
            }
        }
    }

    fn finger_move(&mut self, id: u64, x: f32, y: f32) -> Vec<GestureEvent> {
        let Some(finger) = self.fingers.iter_mut().find(|(f, _, _)| *f == id) else {
            return Vec::new();
        };
        finger.1 = x;
        finger.2 = y;

        match self.last_span {
            Some(previous) => {
                let span = self.span();
                self.last_span = Some(span);
                if previous < MIN_SPAN || span < MIN_SPAN {
                    return Vec::new();
                }
                vec![GestureEvent::Scale {
                    factor: span / previous,
                }]
            }
            None => vec![GestureEvent::PointerMove { x, y }],
        }
    }

    fn finger_up(&mut self, id: u64) -> Vec<GestureEvent> {
        let before = self.fingers.len();
        self.fingers.retain(|(f, _, _)| *f != id);
        if self.fingers.len() == before {
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.is_scaling() {
            if self.fingers.len() < 2 {
                self.last_span = None;
                events.push(GestureEvent::ScaleEnd);
            } else {
                self.last_span = Some(self.span());
            }
        }
        events.push(GestureEvent::PointerUp {
            remaining: self.fingers.len(),
        });
        events
    }

    fn wheel(&mut self, lines: f32) -> Vec<GestureEvent> {
        if lines == 0.0 || !lines.is_finite() {
            return Vec::new();
        }
        let mut events = vec![
            GestureEvent::ScaleBegin,
            GestureEvent::Scale {
                factor: self.wheel_step.powf(lines),
            },
            GestureEvent::ScaleEnd,
        ];
        if !self.mouse_down && self.fingers.is_empty() {
            events.push(GestureEvent::PointerUp { remaining: 0 });
        }
        events
    }

    /// Average distance of the fingers from their centroid
    fn span(&self) -> f32 {
        let n = self.fingers.len() as f32;
        let (sx, sy) = self
            .fingers
            .iter()
            .fold((0.0f32, 0.0f32), |(sx, sy), &(_, x, y)| (sx + x, sy + y));
        let (cx, cy) = (sx / n, sy / n);

        self.fingers
            .iter()
            .map(|&(_, x, y)| ((x - cx).powi(2) + (y - cy).powi(2)).sqrt())
            .sum::<f32>()
            / n
    }
}
