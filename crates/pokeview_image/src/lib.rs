//! Pokeview Image Preloading
//!
//! Warms sprite URLs before the detail panel needs them.
//!
//! # Features
//!
//! - **Decoding**: PNG, JPEG, GIF, WebP through the `image` crate
//! - **Network**: HTTP loading via `reqwest` (feature `network`)
//! - **Preloading**: [`preload_images`] never fails and never blocks on bad URLs
//!
//! # Example
//!
//! ```ignore
//! use pokeview_image::{preload_images, HttpImageLoader};
//!
//! let loader = HttpImageLoader::new();
//! preload_images(&loader, &[front_sprite, back_sprite]).await;
//! ```

mod error;
mod loader;
mod preload;

pub use error::{ImageError, Result};
#[cfg(feature = "network")]
pub use loader::HttpImageLoader;
pub use loader::{ImageData, ImageLoader};
pub use preload::{preload_image, preload_images, ImagePreloader, PreloadReport};
