use std::sync::Arc;

use super::data::ImageRef;

/// Immutable, ordered copy of the selection handed to downstream consumers.
pub type Snapshot = Arc<[ImageRef]>;

/// The images the user has chosen in this session.
///
/// Keeps insertion order and never holds the same [`ImageRef`] twice. The
/// expected size is a handful to a few hundred images, so membership is a
/// linear scan rather than a side index.
#[derive(Debug, Default, Clone)]
pub struct SelectionStore {
    images: Vec<ImageRef>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `image` unless an equal ref is already present.
    /// Returns whether the store changed.
    pub fn add(&mut self, image: ImageRef) -> bool {
        if self.contains(&image) {
            return false;
        }
        self.images.push(image);
        true
    }

    /// Add every ref in order, skipping duplicates. An empty batch leaves the
    /// store untouched. Returns how many refs were actually added.
    pub fn add_all(&mut self, images: impl IntoIterator<Item = ImageRef>) -> usize {
        images
            .into_iter()
            .filter(|image| self.add(image.clone()))
            .count()
    }

    /// Remove the first ref equal to `image`. Returns whether one was found.
    pub fn remove(&mut self, image: &ImageRef) -> bool {
        match self.images.iter().position(|i| i == image) {
            Some(index) => {
                self.images.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn contains(&self, image: &ImageRef) -> bool {
        self.images.contains(image)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Ordered copy of the current contents. Later mutations of the store are
    /// not visible through it.
    pub fn snapshot(&self) -> Snapshot {
        Arc::from(self.images.as_slice())
    }
}
