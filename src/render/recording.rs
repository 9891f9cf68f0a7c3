use crate::{
    assets::PreparedImage,
    foundation::core::{Point, Rect, Rgba8Premul},
    foundation::error::{ScrollyteError, ScrollyteResult},
    render::{FrameRGBA, Surface},
};

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Image {
        /// Source image size.
        width: u32,
        height: u32,
        /// Destination rectangle.
        dest: Rect,
    },
    Fill {
        points: Vec<Point>,
        color: Rgba8Premul,
    },
    Stroke {
        points: Vec<Point>,
        width: f64,
        color: Rgba8Premul,
    },
}

/// Surface that records calls instead of rasterizing.
///
/// `presented` holds the calls of every presented frame, in order; `pending` the calls since the
/// last present.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    pending: Vec<DrawCall>,
    presented: Vec<Vec<DrawCall>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pending: Vec::new(),
            presented: Vec::new(),
        }
    }

    /// Every presented frame's calls, oldest first.
    pub fn presented(&self) -> &[Vec<DrawCall>] {
        &self.presented
    }

    /// Calls of the most recently presented frame.
    pub fn last_frame(&self) -> Option<&[DrawCall]> {
        self.presented.last().map(Vec::as_slice)
    }

    /// Number of presented frames.
    pub fn present_count(&self) -> usize {
        self.presented.len()
    }

    /// Image draws across all presented frames.
    pub fn image_draws(&self) -> impl Iterator<Item = &DrawCall> {
        self.presented
            .iter()
            .flatten()
            .filter(|c| matches!(c, DrawCall::Image { .. }))
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) -> ScrollyteResult<()> {
        if width == 0 || height == 0 {
            return Err(ScrollyteError::validation("surface size must be non-zero"));
        }
        self.width = width;
        self.height = height;
        self.pending.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.pending.clear();
        self.pending.push(DrawCall::Clear);
    }

    fn draw_image(&mut self, image: &PreparedImage, dest: Rect) -> ScrollyteResult<()> {
        self.pending.push(DrawCall::Image {
            width: image.width,
            height: image.height,
            dest,
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba8Premul) -> ScrollyteResult<()> {
        self.pending.push(DrawCall::Fill {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }

    fn stroke_polygon(
        &mut self,
        points: &[Point],
        width: f64,
        color: Rgba8Premul,
    ) -> ScrollyteResult<()> {
        self.pending.push(DrawCall::Stroke {
            points: points.to_vec(),
            width,
            color,
        });
        Ok(())
    }

    fn present(&mut self) -> ScrollyteResult<()> {
        if !self.pending.is_empty() {
            self.presented.push(std::mem::take(&mut self.pending));
        }
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        None
    }
}
