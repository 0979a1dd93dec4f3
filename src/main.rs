use iced::widget::image::Handle;
use iced::widget::{button, column, container, horizontal_space, row, text, Column};
use iced::{event, keyboard, window, Alignment, Element, Event, Length, Size, Subscription, Task, Theme};
use std::path::PathBuf;

mod config;
mod error;
mod media;
mod state;
mod ui;
mod zoom;

use config::Config;
use media::loader::{self, LoadedImage};
use media::metadata;
use media::picker::{self, DeniedDialog, DesktopAccess, DialogAction, MediaAccess, PickAction, PickResult};
use media::thumbnail::{self, Thumbnail};
use state::{ImageInfo, ImageRef, SelectionStore};
use ui::grid::{GridPresentation, Preview};
use ui::viewer::DetailViewer;
use zoom::PointerInput;

/// Which screen is showing
enum Screen {
    Gallery,
    Viewer(DetailViewer),
}

/// Main application state
struct ImageGallery {
    config: Config,
    /// Images the user picked this session
    selection: SelectionStore,
    /// Tiles mirroring the selection
    grid: GridPresentation,
    screen: Screen,
    /// Permission-denied dialog, when showing
    dialog: Option<DeniedDialog>,
    /// Short status line (e.g. "Image removed")
    notice: Option<String>,
    access: DesktopAccess,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User pressed "Add images"
    PickImages,
    /// Media permission request finished
    PermissionResult(bool),
    /// Picker closed
    ImagesPicked(PickResult),
    /// Background grant pass finished, with the number of grants taken
    GrantsTaken(Result<usize, String>),
    /// A file was dropped on the window
    FileDropped(PathBuf),
    ThumbnailLoaded(ImageRef, Result<Thumbnail, String>),
    ClearAll,
    ImageClicked(ImageRef, usize),
    ImageRemoved(ImageRef, usize),
    Dialog(DialogAction),
    SettingsOpened(Result<(), String>),
    ImageLoaded(ImageRef, Result<LoadedImage, String>),
    InfoResolved(ImageRef, ImageInfo),
    /// Pointer input on the viewer surface, with the surface size
    Pointer(PointerInput, Size),
    CloseViewer,
}

impl ImageGallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();
        log::info!("image gallery started ({:?})", config);
        (Self::with_config(config), Task::none())
    }

    fn with_config(config: Config) -> Self {
        Self {
            config,
            selection: SelectionStore::new(),
            grid: GridPresentation::new(),
            screen: Screen::Gallery,
            dialog: None,
            notice: None,
            access: DesktopAccess,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImages => {
                self.notice = None;
                self.run_pick_action(picker::begin(&self.access))
            }
            Message::PermissionResult(granted) => {
                self.run_pick_action(picker::on_permission_result(granted))
            }
            Message::ImagesPicked(result) => {
                let images = result.into_refs();
                let grants = if images.is_empty() {
                    Task::none()
                } else {
                    Task::perform(picker::take_grants(self.access, images.clone()), |result| {
                        Message::GrantsTaken(result.map_err(|e| e.to_string()))
                    })
                };
                picker::on_pick_result(&mut self.selection, images);
                Task::batch([grants, self.refresh_grid()])
            }
            Message::GrantsTaken(result) => {
                match result {
                    Ok(count) => log::debug!("{} persistable grants taken", count),
                    Err(e) => log::warn!("taking grants failed: {}", e),
                }
                Task::none()
            }
            Message::FileDropped(path) => {
                if !picker::is_image_path(&path) {
                    log::debug!("ignoring dropped file {}", path.display());
                    return Task::none();
                }
                self.update(Message::ImagesPicked(PickResult::Single(ImageRef::new(path))))
            }
            Message::ThumbnailLoaded(image, result) => {
                let preview = match result {
                    Ok(thumb) => Preview::Ready(Handle::from_rgba(thumb.width, thumb.height, thumb.pixels)),
                    Err(e) => {
                        log::warn!("no thumbnail for {}: {}", image, e);
                        Preview::Failed
                    }
                };
                self.grid.set_thumbnail(&image, preview);
                Task::none()
            }
            Message::ClearAll => {
                if self.selection.is_empty() {
                    return Task::none();
                }
                self.selection.clear();
                log::info!("selection cleared");
                self.refresh_grid()
            }
            Message::ImageClicked(image, position) => {
                log::debug!("tile {} clicked", position);
                let viewer = DetailViewer::open(image.clone(), self.config.wheel_zoom_step);
                self.screen = Screen::Viewer(viewer);

                let for_load = image.clone();
                let for_info = image.clone();
                Task::batch([
                    Task::perform(loader::load_full(image.clone()), move |result| {
                        Message::ImageLoaded(for_load.clone(), result.map_err(|e| e.to_string()))
                    }),
                    Task::perform(metadata::resolve(image), move |info| {
                        Message::InfoResolved(for_info.clone(), info)
                    }),
                ])
            }
            Message::ImageRemoved(image, position) => {
                if self.selection.remove(&image) {
                    log::info!("removed {} (tile {})", image, position);
                    self.notice = Some("Image removed".to_string());
                }
                self.refresh_grid()
            }
            Message::Dialog(action) => {
                self.dialog = None;
                match action {
                    DialogAction::OpenSettings => {
                        Task::perform(picker::open_access_settings(self.access), |result| {
                            Message::SettingsOpened(result.map_err(|e| e.to_string()))
                        })
                    }
                    DialogAction::Cancel => Task::none(),
                }
            }
            Message::SettingsOpened(result) => {
                if let Err(e) = result {
                    log::warn!("could not open settings: {}", e);
                }
                Task::none()
            }
            Message::ImageLoaded(image, result) => {
                if let Some(viewer) = self.viewer_for(&image) {
                    viewer.on_loaded(result);
                }
                Task::none()
            }
            Message::InfoResolved(image, info) => {
                if let Some(viewer) = self.viewer_for(&image) {
                    viewer.on_info(info);
                }
                Task::none()
            }
            Message::Pointer(input, surface) => {
                if let Screen::Viewer(viewer) = &mut self.screen {
                    viewer.on_pointer(input, surface);
                }
                Task::none()
            }
            Message::CloseViewer => {
                self.screen = Screen::Gallery;
                Task::none()
            }
        }
    }

    fn run_pick_action(&mut self, action: PickAction) -> Task<Message> {
        match action {
            PickAction::LaunchPicker => Task::perform(picker::pick_images(), Message::ImagesPicked),
            PickAction::RequestPermission => {
                let access = self.access;
                Task::perform(async move { access.request_permission() }, Message::PermissionResult)
            }
            PickAction::ShowDeniedDialog => {
                log::info!("media permission denied");
                self.dialog = Some(DeniedDialog);
                Task::none()
            }
        }
    }

    /// Re-render the grid from the selection and load thumbnails for the new
    /// tiles only.
    fn refresh_grid(&mut self) -> Task<Message> {
        let created = self.grid.set_images(&self.selection.snapshot());
        let size = self.config.thumbnail_size;

        Task::batch(created.into_iter().map(|image| {
            let key = image.clone();
            Task::perform(thumbnail::load_thumbnail(image, size), move |result| {
                Message::ThumbnailLoaded(key.clone(), result.map_err(|e| e.to_string()))
            })
        }))
    }

    /// The open viewer, if it is showing `image`. Late results for a viewer
    /// that was already closed are dropped.
    fn viewer_for(&mut self, image: &ImageRef) -> Option<&mut DetailViewer> {
        match &mut self.screen {
            Screen::Viewer(viewer) if viewer.image() == image => Some(viewer),
            _ => None,
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        match &self.screen {
            Screen::Viewer(viewer) => viewer.view(),
            Screen::Gallery => self.gallery_view(),
        }
    }

    fn gallery_view(&self) -> Element<'_, Message> {
        let visibility = self.grid.visibility();
        let mut content: Column<'_, Message> = column![];

        if visibility.header {
            content = content.push(
                row![
                    text(self.grid.count_label()).size(18),
                    horizontal_space(),
                    button("Clear all").on_press(Message::ClearAll).padding(8),
                ]
                .padding(12)
                .align_y(Alignment::Center),
            );
        }

        let body: Element<Message> = if let Some(dialog) = &self.dialog {
            dialog_view(dialog)
        } else if visibility.empty_state {
            container(
                column![
                    text("No images selected").size(24),
                    text("Pick images to build your gallery").size(14),
                ]
                .spacing(8)
                .align_x(Alignment::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
        } else {
            self.grid.view(&self.config)
        };

        let footer = row![
            text(self.notice.clone().unwrap_or_default()).size(14),
            horizontal_space(),
            button("+ Add images").on_press(Message::PickImages).padding(12),
        ]
        .padding(12)
        .align_y(Alignment::Center);

        content.push(body).push(footer).into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            }) => Some(Message::CloseViewer),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn dialog_view(dialog: &DeniedDialog) -> Element<'static, Message> {
    let buttons = dialog.actions().into_iter().map(|action| -> Element<'static, Message> {
        button(text(action.label()))
            .on_press(Message::Dialog(action))
            .padding(8)
            .into()
    });

    container(
        column![
            text(DeniedDialog::TITLE).size(20),
            text(DeniedDialog::MESSAGE).size(14),
            row(buttons).spacing(12),
        ]
        .spacing(16)
        .max_width(420),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application("Image Gallery", ImageGallery::update, ImageGallery::view)
        .subscription(ImageGallery::subscription)
        .theme(ImageGallery::theme)
        .centered()
        .run_with(ImageGallery::new)
}
