pub mod decode;
pub mod loader;

use std::sync::Arc;

/// Decoded raster frame in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Solid-color image, mostly useful for tests and placeholders.
    pub fn solid(width: u32, height: u32, rgba_premul: [u8; 4]) -> Self {
        let px = (width as usize).saturating_mul(height as usize);
        let mut bytes = Vec::with_capacity(px.saturating_mul(4));
        for _ in 0..px {
            bytes.extend_from_slice(&rgba_premul);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        }
    }
}
