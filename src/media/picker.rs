/// Picking images: media-access permission, the file picker and access grants
///
/// The flow is: check permission -> (request it) -> launch the multi-select
/// picker -> normalise the result -> take a persistable grant per image ->
/// hand the refs to the selection store.
use rfd::AsyncFileDialog;
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::Command;
use tokio::task;

use crate::error::{Error, Result};
use crate::state::{ImageRef, SelectionStore};

/// Extensions offered by the picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Platform seam for media access
pub trait MediaAccess {
    /// Whether the app may read the user's media right now
    fn has_permission(&self) -> bool;

    /// Ask for media access; returns the grant outcome
    fn request_permission(&self) -> bool;

    /// Keep read access to `image` beyond this pick. Not every ref supports
    /// this, so failures are expected.
    fn take_persistable_grant(&self, image: &ImageRef) -> Result<()>;

    /// Send the user to the place where access can be changed
    fn open_settings(&self) -> Result<()>;
}

/// Desktop implementation: access means the picture folder is readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopAccess;

impl DesktopAccess {
    fn pictures_dir() -> Option<PathBuf> {
        dirs::picture_dir()
    }
}

impl MediaAccess for DesktopAccess {
    fn has_permission(&self) -> bool {
        match Self::pictures_dir() {
            Some(dir) if dir.exists() => fs::read_dir(&dir).is_ok(),
            // Nothing to guard: the picker itself enforces file permissions
            _ => true,
        }
    }

    fn request_permission(&self) -> bool {
        // Desktop platforms have no runtime prompt; re-check instead
        self.has_permission()
    }

    fn take_persistable_grant(&self, image: &ImageRef) -> Result<()> {
        File::open(image.path())
            .map(|_| ())
            .map_err(|_| Error::NotReadable(image.path().to_path_buf()))
    }

    fn open_settings(&self) -> Result<()> {
        let target = Self::pictures_dir().unwrap_or_else(|| PathBuf::from("."));
        log::info!("opening {} for permission changes", target.display());
        // Wait for the opener so it is reaped; it hands off to the file
        // manager and exits.
        let status = Command::new(OPENER).arg(&target).status()?;
        if !status.success() {
            log::debug!("{} exited with {}", OPENER, status);
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
const OPENER: &str = "open";
#[cfg(target_os = "windows")]
const OPENER: &str = "explorer";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &str = "xdg-open";

/// What the app should do next in the pick flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickAction {
    LaunchPicker,
    RequestPermission,
    ShowDeniedDialog,
}

/// Start a pick: go straight to the picker when access is already granted.
pub fn begin(access: &impl MediaAccess) -> PickAction {
    if access.has_permission() {
        PickAction::LaunchPicker
    } else {
        PickAction::RequestPermission
    }
}

/// Continue after the permission request returned.
pub fn on_permission_result(granted: bool) -> PickAction {
    if granted {
        PickAction::LaunchPicker
    } else {
        PickAction::ShowDeniedDialog
    }
}

/// Buttons of the permission-denied dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    OpenSettings,
    Cancel,
}

impl DialogAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenSettings => "Open settings",
            Self::Cancel => "Cancel",
        }
    }
}

/// Shown when media access was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeniedDialog;

impl DeniedDialog {
    pub const TITLE: &'static str = "Permission required";
    pub const MESSAGE: &'static str =
        "Access to your pictures was denied. Grant it in settings to pick images.";

    pub fn actions(&self) -> [DialogAction; 2] {
        [DialogAction::OpenSettings, DialogAction::Cancel]
    }
}

/// Raw outcome of a pick, before normalisation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Cancelled,
    Single(ImageRef),
    Multiple(Vec<ImageRef>),
}

impl PickResult {
    /// Build from picker output; `None` means the user cancelled.
    pub fn from_paths(paths: Option<Vec<PathBuf>>) -> Self {
        match paths {
            None => Self::Cancelled,
            Some(mut paths) if paths.len() == 1 => Self::Single(ImageRef::new(paths.remove(0))),
            Some(paths) if paths.is_empty() => Self::Cancelled,
            Some(paths) => Self::Multiple(paths.into_iter().map(ImageRef::new).collect()),
        }
    }

    /// Flatten into the list the selection store consumes
    pub fn into_refs(self) -> Vec<ImageRef> {
        match self {
            Self::Cancelled => Vec::new(),
            Self::Single(image) => vec![image],
            Self::Multiple(images) => images,
        }
    }
}

/// Show the native multi-select image picker.
pub async fn pick_images() -> PickResult {
    let files = AsyncFileDialog::new()
        .set_title("Select images")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_files()
        .await;

    PickResult::from_paths(files.map(|files| {
        files
            .iter()
            .map(|file| file.path().to_path_buf())
            .collect()
    }))
}

/// Whether a dropped file looks like something the picker would offer
pub fn is_image_path(path: &std::path::Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map_or(false, |ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Take a persistable grant for every ref. Refs that do not support it are
/// skipped quietly. Returns how many grants were taken.
pub fn grant_all(access: &impl MediaAccess, images: &[ImageRef]) -> usize {
    images
        .iter()
        .filter(|image| match access.take_persistable_grant(image) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("no persistable grant for {}: {}", image, e);
                false
            }
        })
        .count()
}

/// [`grant_all`] on a blocking thread. Each grant opens a file, which can
/// stall on slow or network media.
pub async fn take_grants<A>(access: A, images: Vec<ImageRef>) -> Result<usize>
where
    A: MediaAccess + Send + 'static,
{
    Ok(task::spawn_blocking(move || grant_all(&access, &images)).await?)
}

/// [`MediaAccess::open_settings`] on a blocking thread
pub async fn open_access_settings<A>(access: A) -> Result<()>
where
    A: MediaAccess + Send + 'static,
{
    task::spawn_blocking(move || access.open_settings()).await?
}

/// Feed one pick result into the store. Empty results leave it untouched.
/// Returns how many images were new.
pub fn on_pick_result(store: &mut SelectionStore, images: Vec<ImageRef>) -> usize {
    if images.is_empty() {
        return 0;
    }
    let added = store.add_all(images);
    log::info!("picked images: {} new, {} selected", added, store.len());
    added
}
