#![deny(missing_docs)]
//! Perspective normalisation and alignment of image pairs.
//!
//! A quadrilateral outlined on one image is warped onto an axis-aligned
//! template, or a whole image is warped so that chosen points land on the
//! matching points of another image.
//!
//! ```
//! use quadwarp::geometry::Point2d;
//! use quadwarp::image::RgbImage;
//! use quadwarp::imgproc::{warp::warp_to_template, WarpConfig};
//!
//! let photo = RgbImage::from_size_val([100, 100].into(), 0).unwrap();
//! let corners = [
//!     Point2d::new(100.0, 100.0),
//!     Point2d::new(0.0, 0.0),
//!     Point2d::new(100.0, 0.0),
//!     Point2d::new(0.0, 100.0),
//! ];
//!
//! let flat = warp_to_template(&photo, &corners, [50, 50].into(), &WarpConfig::default()).unwrap();
//! assert_eq!(flat.size(), [50, 50].into());
//! ```

#[doc(inline)]
pub use quadwarp_image as image;

#[doc(inline)]
pub use quadwarp_geometry as geometry;

#[doc(inline)]
pub use quadwarp_imgproc as imgproc;

/// Two-sided alignment state with undo.
pub mod session;
