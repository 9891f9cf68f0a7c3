pub mod cpu;
pub mod recording;

use crate::{
    assets::PreparedImage,
    foundation::core::{Point, Rect, Rgba8Premul},
    foundation::error::ScrollyteResult,
};

/// Read-back of a surface, row-major RGBA8.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel data with straight alpha, the layout PNG encoders expect.
    pub fn into_straight(mut self) -> Vec<u8> {
        if self.premultiplied {
            crate::assets::decode::unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self.data
    }

    /// Premultiplied pixel at `(x, y)`, if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// 2D drawing target owned by one consumer (a frame player or a morph section).
///
/// Drawing calls accumulate until [`Surface::present`]; a surface that receives no calls keeps
/// showing what it presented last.
pub trait Surface {
    /// Pixel size.
    fn size(&self) -> (u32, u32);

    /// Change the pixel size; content is discarded.
    fn resize(&mut self, width: u32, height: u32) -> ScrollyteResult<()>;

    /// Start a new frame on a transparent background.
    fn clear(&mut self);

    /// Draw `image` scaled into `dest` (which may extend past the surface bounds).
    fn draw_image(&mut self, image: &PreparedImage, dest: Rect) -> ScrollyteResult<()>;

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Rgba8Premul) -> ScrollyteResult<()>;

    /// Stroke a closed polygon outline.
    fn stroke_polygon(
        &mut self,
        points: &[Point],
        width: f64,
        color: Rgba8Premul,
    ) -> ScrollyteResult<()>;

    /// Make the accumulated frame visible.
    fn present(&mut self) -> ScrollyteResult<()>;

    /// Read back the presented content, when the surface supports it.
    fn snapshot(&self) -> Option<FrameRGBA>;
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
