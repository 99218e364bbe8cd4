use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use quadwarp_geometry::{ErrorKind, Point2d, Rect};
use quadwarp_image::RgbImage;
use quadwarp_imgproc::{
    blend::superimpose,
    crop::crop_roi,
    warp::{warp_full, warp_roi, warp_to_template, CanvasBounds},
    WarpConfig, WarpError,
};

/// Default number of undo steps kept per side.
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// One of the two images being aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The reference image; it defines the output size and is never cropped.
    Template,
    /// The image brought into alignment with the template.
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Side::Template => write!(f, "template"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// A value for each side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerSide<T> {
    /// value for the template side
    pub template: T,
    /// value for the target side
    pub target: T,
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        match side {
            Side::Template => &self.template,
            Side::Target => &self.target,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        match side {
            Side::Template => &mut self.template,
            Side::Target => &mut self.target,
        }
    }
}

/// A bounded undo stack.
///
/// Once full, pushing drops the oldest entry.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// Create an empty history keeping at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an entry.
    pub fn push(&mut self, entry: T) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Take the most recent entry.
    pub fn undo(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest number of entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// An error type for the session operations.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    /// The underlying warp failed.
    #[error(transparent)]
    Warp(#[from] WarpError),

    /// The operation needs an image that has not been loaded.
    #[error("No image loaded on the {0} side")]
    MissingImage(Side),

    /// The template defines the output size and cannot be cropped.
    #[error("The template image cannot be cropped")]
    TemplateLocked,
}

impl SessionError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::Warp(err) => err.kind(),
            SessionError::MissingImage(_) | SessionError::TemplateLocked => ErrorKind::InvalidInput,
        }
    }
}

/// The state of a two-image alignment.
///
/// Each side holds an optional image and its own undo history. Operations
/// that change an image record the previous one only once the change has
/// succeeded, so a failed operation leaves the session as it was.
///
/// # Example
///
/// ```
/// use quadwarp::geometry::Quad;
/// use quadwarp::image::RgbImage;
/// use quadwarp::session::{AlignmentSession, Side};
///
/// let mut session = AlignmentSession::default();
/// session.load(Side::Template, RgbImage::from_size_val([40, 30].into(), 0).unwrap());
/// session.load(Side::Target, RgbImage::from_size_val([100, 80].into(), 0).unwrap());
///
/// let outline = Quad::from_size(100.0, 80.0);
/// session.normalize_target(outline.points()).unwrap();
/// assert_eq!(session.image(Side::Target).unwrap().size(), [40, 30].into());
///
/// assert!(session.undo(Side::Target));
/// assert_eq!(session.image(Side::Target).unwrap().size(), [100, 80].into());
/// ```
#[derive(Debug, Clone)]
pub struct AlignmentSession {
    images: PerSide<Option<RgbImage>>,
    history: PerSide<History<RgbImage>>,
    config: WarpConfig,
}

impl Default for AlignmentSession {
    fn default() -> Self {
        Self::new(WarpConfig::default())
    }
}

impl AlignmentSession {
    /// Create an empty session.
    pub fn new(config: WarpConfig) -> Self {
        Self::with_history_capacity(config, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty session keeping `capacity` undo steps per side.
    pub fn with_history_capacity(config: WarpConfig, capacity: usize) -> Self {
        Self {
            images: PerSide::default(),
            history: PerSide {
                template: History::new(capacity),
                target: History::new(capacity),
            },
            config,
        }
    }

    /// The warp configuration.
    pub fn config(&self) -> &WarpConfig {
        &self.config
    }

    /// Replace the image of a side, forgetting its undo history.
    pub fn load(&mut self, side: Side, image: RgbImage) {
        log::debug!("loading {} image of {}", side, image.size());
        self.images[side] = Some(image);
        self.history[side].clear();
    }

    /// The current image of a side.
    pub fn image(&self, side: Side) -> Option<&RgbImage> {
        self.images[side].as_ref()
    }

    /// The undo history of a side.
    pub fn history(&self, side: Side) -> &History<RgbImage> {
        &self.history[side]
    }

    fn require(&self, side: Side) -> Result<&RgbImage, SessionError> {
        self.image(side).ok_or(SessionError::MissingImage(side))
    }

    fn commit(&mut self, side: Side, image: RgbImage) {
        if let Some(previous) = self.images[side].replace(image) {
            self.history[side].push(previous);
        }
    }

    /// Crop the target image to a rubber-band rectangle.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::TemplateLocked`] for the template side, and
    /// when the side has no image or the rectangle covers no pixel.
    pub fn crop(&mut self, side: Side, rect: Rect) -> Result<(), SessionError> {
        if side == Side::Template {
            return Err(SessionError::TemplateLocked);
        }
        let cropped = crop_roi(self.require(side)?, rect)?;
        self.commit(side, cropped);
        Ok(())
    }

    /// Warp the quadrilateral outlined by `points` on the target onto the
    /// template's size.
    ///
    /// The points may come in any order, see [`warp_to_template`].
    pub fn normalize_target(&mut self, points: &[Point2d]) -> Result<(), SessionError> {
        let template = self.require(Side::Template)?.size();
        let warped = warp_to_template(self.require(Side::Target)?, points, template, &self.config)?;
        self.commit(Side::Target, warped);
        Ok(())
    }

    /// Warp a rectangle of the target onto a template of its own size.
    pub fn normalize_target_roi(&mut self, rect: Rect) -> Result<(), SessionError> {
        let warped = warp_roi(self.require(Side::Target)?, rect, &self.config)?;
        self.commit(Side::Target, warped);
        Ok(())
    }

    /// Warp the whole target so that `target_points` land on
    /// `template_points`.
    ///
    /// # Returns
    ///
    /// Where the new target canvas sits in template coordinates; pass
    /// `min_x` and `min_y` to [`AlignmentSession::preview`] to overlay it.
    pub fn align_target(
        &mut self,
        target_points: &[Point2d],
        template_points: &[Point2d],
    ) -> Result<CanvasBounds, SessionError> {
        self.require(Side::Template)?;
        let full = warp_full(
            self.require(Side::Target)?,
            target_points,
            template_points,
            &self.config,
        )?;
        self.commit(Side::Target, full.image);
        Ok(full.bounds)
    }

    /// Overlay the target on the template.
    ///
    /// The target's top-left pixel is placed at `(offset_x, offset_y)` of the
    /// template and blended with `opacity`.
    pub fn preview(
        &self,
        offset_x: i64,
        offset_y: i64,
        opacity: f32,
    ) -> Result<RgbImage, SessionError> {
        let base = self.require(Side::Template)?;
        let overlay = self.require(Side::Target)?;
        Ok(superimpose(base, overlay, offset_x, offset_y, opacity)?)
    }

    /// Restore the previous image of a side.
    ///
    /// Returns `false` if there was nothing to undo.
    pub fn undo(&mut self, side: Side) -> bool {
        match self.history[side].undo() {
            Some(previous) => {
                self.images[side] = Some(previous);
                true
            }
            None => false,
        }
    }
}
