//! Identity handles for images owned by the legacy runtime.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An in-memory image owned by the legacy runtime.
///
/// The bridge only ever keeps references to these; pixel data and window
/// lifecycle stay with the legacy runtime. `renderable` is fixed at creation
/// (an image without display-ready content never becomes renderable), while
/// the window flag follows the runtime opening and closing the image window.
pub struct LegacyImage {
    title: String,
    renderable: bool,
    window_open: AtomicBool,
}

impl LegacyImage {
    pub fn new(title: impl Into<String>, renderable: bool) -> Self {
        Self {
            title: title.into(),
            renderable,
            window_open: AtomicBool::new(false),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the image carries display-ready content.
    pub fn is_renderable(&self) -> bool {
        self.renderable
    }

    /// Whether a window is currently showing this image.
    pub fn has_window(&self) -> bool {
        self.window_open.load(Ordering::Acquire)
    }

    pub fn set_window_open(&self, open: bool) {
        self.window_open.store(open, Ordering::Release);
    }
}

impl fmt::Debug for LegacyImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyImage")
            .field("title", &self.title)
            .field("renderable", &self.renderable)
            .field("window_open", &self.has_window())
            .finish()
    }
}

/// Identity-equality reference to a [`LegacyImage`].
///
/// Two handles are equal iff they point at the same in-memory image; the
/// title plays no part in equality. This is what lets the output tracker
/// store "the image the legacy runtime is talking about" rather than a copy.
#[derive(Clone)]
pub struct ImageHandle(Arc<LegacyImage>);

impl ImageHandle {
    pub fn new(image: Arc<LegacyImage>) -> Self {
        Self(image)
    }

    pub fn image(&self) -> &LegacyImage {
        &self.0
    }
}

impl From<LegacyImage> for ImageHandle {
    fn from(image: LegacyImage) -> Self {
        Self(Arc::new(image))
    }
}

impl PartialEq for ImageHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ImageHandle {}

impl Hash for ImageHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({:?})", self.0.title())
    }
}

/// A modern-side display showing a legacy image.
pub trait ImageDisplay: Send + Sync {
    fn close(&self);
}
