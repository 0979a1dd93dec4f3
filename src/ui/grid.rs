/// Tile grid of the current selection
///
/// The grid keeps one [`Tile`] per selected image. New selections are applied
/// as an edit script from [`super::diff`], so tiles that survive an update keep
/// their decoded thumbnail and bind generation instead of being rebuilt.
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Alignment, ContentFit, Element, Length};
use iced_aw::Wrap;

use super::diff::{self, Edit};
use crate::config::Config;
use crate::state::ImageRef;
use crate::Message;

/// Thumbnail of a tile as delivered by the loader
#[derive(Debug, Clone)]
pub enum Preview {
    Loading,
    Ready(Handle),
    Failed,
}

#[derive(Debug, Clone)]
pub struct Tile {
    pub image: ImageRef,
    pub name: String,
    pub thumbnail: Preview,
    /// Set once when the tile is created; unchanged while the tile survives
    pub generation: u64,
}

/// Which parts of the main screen are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub empty_state: bool,
    pub grid: bool,
    pub header: bool,
}

#[derive(Debug, Default)]
pub struct GridPresentation {
    tiles: Vec<Tile>,
    next_generation: u64,
}

impl GridPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Bring the grid in line with `images` through a minimal edit script.
    /// Returns the refs of the tiles that were created and need a thumbnail.
    pub fn set_images(&mut self, images: &[ImageRef]) -> Vec<ImageRef> {
        let mut current: Vec<ImageRef> = self.tiles.iter().map(|t| t.image.clone()).collect();
        let script = diff::diff(&current, images);
        diff::apply(&mut current, &script);
        debug_assert_eq!(current, images);

        let mut created = Vec::new();
        for edit in script {
            match edit {
                Edit::Remove { index } => {
                    let tile = self.tiles.remove(index);
                    log::debug!("grid: removed tile #{} ({}) at {}", tile.generation, tile.image, index);
                }
                Edit::Insert { index, item } => {
                    let tile = Tile {
                        name: item.display_fallback(),
                        image: item.clone(),
                        thumbnail: Preview::Loading,
                        generation: self.next_generation,
                    };
                    self.next_generation += 1;
                    self.tiles.insert(index, tile);
                    created.push(item);
                }
            }
        }
        created
    }

    /// Attach a loaded (or failed) thumbnail. Ignored if the tile is gone.
    pub fn set_thumbnail(&mut self, image: &ImageRef, thumbnail: Preview) {
        match self.tiles.iter_mut().find(|t| &t.image == image) {
            Some(tile) => tile.thumbnail = thumbnail,
            None => log::debug!("grid: dropping thumbnail for removed {}", image),
        }
    }

    pub fn count_label(&self) -> String {
        match self.len() {
            1 => "1 image selected".to_string(),
            n => format!("{} images selected", n),
        }
    }

    pub fn visibility(&self) -> Visibility {
        let has_tiles = !self.is_empty();
        Visibility {
            empty_state: !has_tiles,
            grid: has_tiles,
            header: has_tiles,
        }
    }

    /// Build the scrollable tile grid
    pub fn view(&self, config: &Config) -> Element<'_, Message> {
        let tiles: Vec<Element<'_, Message>> = self
            .tiles()
            .iter()
            .enumerate()
            .map(|(position, tile)| tile_view(tile, position, config.tile_width))
            .collect();

        let grid = Wrap::with_elements(tiles)
            .spacing(config.tile_spacing)
            .line_spacing(config.tile_spacing);

        scrollable(container(grid).padding(config.tile_spacing).width(Length::Fill))
            .height(Length::Fill)
            .into()
    }
}

fn tile_view(tile: &Tile, position: usize, width: f32) -> Element<'_, Message> {
    let preview: Element<'_, Message> = match &tile.thumbnail {
        Preview::Ready(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(width))
            .content_fit(ContentFit::Cover)
            .into(),
        Preview::Loading => placeholder("Loading…", width),
        Preview::Failed => placeholder("No preview", width),
    };

    let caption = row![
        text(&tile.name).size(12).width(Length::Fill),
        button(text("✕").size(12))
            .on_press(Message::ImageRemoved(tile.image.clone(), position))
            .padding(4)
            .style(button::danger),
    ]
    .spacing(4)
    .align_y(Alignment::Center);

    button(column![preview, caption].spacing(4))
        .on_press(Message::ImageClicked(tile.image.clone(), position))
        .width(Length::Fixed(width))
        .padding(4)
        .style(button::secondary)
        .into()
}

fn placeholder(label: &str, size: f32) -> Element<'_, Message> {
    container(text(label).size(12))
        .width(Length::Fill)
        .height(Length::Fixed(size))
        .center_x(Length::Fill)
        .center_y(Length::Fixed(size))
        .into()
}
