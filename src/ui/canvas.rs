use iced::mouse::{self, Cursor};
use iced::touch;
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::{Point, Rectangle, Renderer, Size, Theme};

use crate::zoom::{Affine, PointerInput, TransformController};
use crate::Message;

/// Draws the viewer image and forwards pointer input as [`PointerInput`]
/// in surface-local coordinates.
pub struct ImageSurface<'a> {
    pub handle: &'a Handle,
    /// Pixel size of the decoded image
    pub image_size: Size,
    pub controller: &'a TransformController,
}

/// Presses that started on the surface. Only their moves and releases are
/// forwarded, so hovering costs nothing.
#[derive(Debug, Default)]
pub struct SurfaceState {
    dragging: bool,
    fingers: Vec<u64>,
}

impl Program<Message> for ImageSurface<'_> {
    type State = SurfaceState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let fitted = fit_rect(self.image_size, bounds.size());
        let target = match self.controller.matrix_for(bounds.width, bounds.height) {
            Some(matrix) => map_rect(&matrix, fitted),
            None => fitted,
        };
        frame.draw_image(target, self.handle);

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let local = |p: Point| (p.x - bounds.x, p.y - bounds.y);

        let input = match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                cursor.position_in(bounds).map(|p| {
                    state.dragging = true;
                    PointerInput::MouseDown { x: p.x, y: p.y }
                })
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if state.dragging =>
            {
                state.dragging = false;
                Some(PointerInput::MouseUp)
            }
            // Drags may leave the surface; keep tracking them
            canvas::Event::Mouse(mouse::Event::CursorMoved { position }) if state.dragging => {
                let (x, y) = local(position);
                Some(PointerInput::MouseMove { x, y })
            }
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) if cursor.is_over(bounds) => {
                Some(match delta {
                    mouse::ScrollDelta::Lines { y, .. } => PointerInput::WheelLines { lines: y },
                    mouse::ScrollDelta::Pixels { y, .. } => PointerInput::WheelPixels { pixels: y },
                })
            }
            canvas::Event::Touch(touch::Event::FingerPressed { id, position })
                if bounds.contains(position) =>
            {
                state.fingers.push(id.0);
                let (x, y) = local(position);
                Some(PointerInput::FingerDown { id: id.0, x, y })
            }
            canvas::Event::Touch(touch::Event::FingerMoved { id, position })
                if state.fingers.contains(&id.0) =>
            {
                let (x, y) = local(position);
                Some(PointerInput::FingerMove { id: id.0, x, y })
            }
            canvas::Event::Touch(
                touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. },
            ) if state.fingers.contains(&id.0) => {
                state.fingers.retain(|&f| f != id.0);
                Some(PointerInput::FingerUp { id: id.0 })
            }
            _ => None,
        };

        match input {
            Some(input) => (
                canvas::event::Status::Captured,
                Some(Message::Pointer(input, bounds.size())),
            ),
            None => (canvas::event::Status::Ignored, None),
        }
    }
}

/// Largest rectangle with the image's aspect ratio that fits the surface,
/// centred, in surface-local coordinates.
pub fn fit_rect(image: Size, surface: Size) -> Rectangle {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rectangle::new(Point::ORIGIN, surface);
    }
    let scale = (surface.width / image.width).min(surface.height / image.height);
    let size = Size::new(image.width * scale, image.height * scale);
    let origin = Point::new(
        (surface.width - size.width) / 2.0,
        (surface.height - size.height) / 2.0,
    );
    Rectangle::new(origin, size)
}

/// Map an axis-aligned rectangle through a scale + translate transform.
pub fn map_rect(matrix: &Affine, rect: Rectangle) -> Rectangle {
    let (x, y) = matrix.map_point(rect.x, rect.y);
    let scale = matrix.scale();
    Rectangle {
        x,
        y,
        width: rect.width * scale,
        height: rect.height * scale,
    }
}
