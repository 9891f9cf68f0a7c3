use std::sync::Arc;

use crate::{
    assets::PreparedImage,
    foundation::core::{Affine, Point, Rect, Rgba8Premul},
    foundation::error::{ScrollyteError, ScrollyteResult},
    render::{FrameRGBA, Surface},
};

/// CPU raster surface on `vello_cpu`.
pub struct CpuSurface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    // Set by `clear`/draw calls, consumed by `present`.
    dirty: bool,
}

impl CpuSurface {
    pub fn new(width: u32, height: u32) -> ScrollyteResult<Self> {
        let (w, h) = surface_dims(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            dirty: false,
        })
    }

    fn begin_draw(&mut self) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.dirty = true;
    }
}

impl Surface for CpuSurface {
    fn size(&self) -> (u32, u32) {
        (u32::from(self.width), u32::from(self.height))
    }

    fn resize(&mut self, width: u32, height: u32) -> ScrollyteResult<()> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    fn clear(&mut self) {
        self.ctx.reset();
        clear_pixmap(&mut self.pixmap, [0, 0, 0, 0]);
        self.dirty = true;
    }

    fn draw_image(&mut self, image: &PreparedImage, dest: Rect) -> ScrollyteResult<()> {
        if image.width == 0 || image.height == 0 {
            return Ok(());
        }
        let pixmap = image_premul_bytes_to_pixmap(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let placement = Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(dest.width() / w, dest.height() / h);

        self.begin_draw();
        self.ctx.set_transform(affine_to_cpu(placement));
        self.ctx.set_paint(paint);
        self.ctx
            .fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba8Premul) -> ScrollyteResult<()> {
        let Some(path) = polygon_to_cpu(points) else {
            return Ok(());
        };
        self.begin_draw();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&path);
        Ok(())
    }

    fn stroke_polygon(
        &mut self,
        points: &[Point],
        width: f64,
        color: Rgba8Premul,
    ) -> ScrollyteResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ScrollyteError::validation("stroke width must be finite and > 0"));
        }
        let Some(path) = polygon_to_cpu(points) else {
            return Ok(());
        };
        self.begin_draw();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
        Ok(())
    }

    fn present(&mut self) -> ScrollyteResult<()> {
        if !self.dirty {
            return Ok(());
        }
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.dirty = false;
        Ok(())
    }

    fn snapshot(&self) -> Option<FrameRGBA> {
        Some(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dirty", &self.dirty)
            .finish()
    }
}

fn surface_dims(width: u32, height: u32) -> ScrollyteResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(ScrollyteError::validation("surface size must be non-zero"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrollyteError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrollyteError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn color_to_cpu(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_straight();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn polygon_to_cpu(points: &[Point]) -> Option<vello_cpu::kurbo::BezPath> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut out = vello_cpu::kurbo::BezPath::new();
    out.move_to(vello_cpu::kurbo::Point::new(first.x, first.y));
    for p in rest {
        out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y));
    }
    out.close_path();
    Some(out)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ScrollyteResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ScrollyteError::asset("frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ScrollyteError::asset("frame height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ScrollyteError::invariant("prepared frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
