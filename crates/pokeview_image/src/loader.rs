//! Image loading

use crate::error::{ImageError, Result};
use futures::future::BoxFuture;
use image::GenericImageView;

/// Decoded image data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Raw RGBA pixel data
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageData {
    /// Create ImageData from raw RGBA pixels
    pub fn from_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected_len = width as usize * height as usize * 4;
        if pixels.len() != expected_len {
            return Err(ImageError::Decode(format!(
                "Invalid pixel data length: expected {}, got {}",
                expected_len,
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Decode an encoded image (PNG, JPEG, GIF, WebP)
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)?;
        let (width, height) = img.dimensions();
        Ok(Self {
            pixels: img.to_rgba8().into_raw(),
            width,
            height,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get image dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Fetches and decodes an image by URL
pub trait ImageLoader: Send + Sync {
    fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<ImageData>>;
}

/// Loads images over HTTP(S)
#[cfg(feature = "network")]
#[derive(Clone, Debug, Default)]
pub struct HttpImageLoader {
    client: reqwest::Client,
}

#[cfg(feature = "network")]
impl HttpImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "network")]
impl ImageLoader for HttpImageLoader {
    fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<ImageData>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| ImageError::Network(e.to_string()))?;

            if !response.status().is_success() {
                return Err(ImageError::Network(format!(
                    "HTTP error: {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| ImageError::Network(e.to_string()))?;

            ImageData::from_bytes(&bytes)
        })
    }
}
