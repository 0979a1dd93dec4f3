/// Full-surface viewer for a single image
///
/// One `DetailViewer` exists per opened image and is dropped when the viewer
/// closes, so zoom and pan never leak between images.
use iced::widget::image::Handle;
use iced::widget::{button, canvas, column, container, horizontal_space, row, text};
use iced::{Alignment, Element, Length, Size};

use super::canvas::ImageSurface;
use crate::media::loader::LoadedImage;
use crate::state::{ImageInfo, ImageRef};
use crate::zoom::{DisplayMode, GestureRouter, PointerInput, TransformController};
use crate::Message;

#[derive(Debug, Clone)]
pub enum Content {
    Loading,
    Ready { handle: Handle, size: Size },
    Failed(String),
}

#[derive(Debug)]
pub struct DetailViewer {
    image: ImageRef,
    info: ImageInfo,
    content: Content,
    controller: TransformController,
    router: GestureRouter,
}

impl DetailViewer {
    pub fn open(image: ImageRef, wheel_zoom_step: f32) -> Self {
        log::info!("opening viewer for {}", image);
        Self {
            info: ImageInfo {
                display_name: image.display_fallback(),
                size_label: String::new(),
            },
            image,
            content: Content::Loading,
            controller: TransformController::new(),
            router: GestureRouter::new(wheel_zoom_step),
        }
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    #[cfg(test)]
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    #[cfg(test)]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[cfg(test)]
    pub fn controller(&self) -> &TransformController {
        &self.controller
    }

    pub fn on_loaded(&mut self, result: Result<LoadedImage, String>) {
        self.content = match result {
            Ok(loaded) => Content::Ready {
                size: Size::new(loaded.width as f32, loaded.height as f32),
                handle: Handle::from_rgba(loaded.width, loaded.height, loaded.pixels),
            },
            Err(e) => {
                log::warn!("could not load {}: {}", self.image, e);
                Content::Failed(e)
            }
        };
    }

    pub fn on_info(&mut self, info: ImageInfo) {
        self.info = info;
    }

    /// Route raw pointer input through gesture detection into the transform
    /// controller. Returns whether the visible transform changed.
    pub fn on_pointer(&mut self, input: PointerInput, surface: Size) -> bool {
        let mut changed = false;
        for event in self.router.feed(input) {
            changed |= self.controller.handle(event, surface.width, surface.height);
        }
        changed
    }

    pub fn view(&self) -> Element<'_, Message> {
        let toolbar = row![
            button(text("← Back")).on_press(Message::CloseViewer).padding(8),
            column![
                text(&self.info.display_name).size(16),
                text(&self.info.size_label).size(12),
            ]
            .spacing(2),
            horizontal_space(),
            text(zoom_label(&self.controller)).size(12),
        ]
        .spacing(12)
        .padding(8)
        .align_y(Alignment::Center);

        let body: Element<'_, Message> = match &self.content {
            Content::Ready { handle, size } => canvas(ImageSurface {
                handle,
                image_size: *size,
                controller: &self.controller,
            })
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
            Content::Loading => centered(text("Loading…")),
            Content::Failed(reason) => centered(text(format!("Could not load image: {}", reason))),
        };

        column![toolbar, body].into()
    }
}

/// "Fit" until the first gesture, then the current scale as a percentage
fn zoom_label(controller: &TransformController) -> String {
    match controller.mode() {
        DisplayMode::Fit => "Fit".to_string(),
        DisplayMode::Matrix => format!("{:.0}%", controller.state().scale * 100.0),
    }
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
