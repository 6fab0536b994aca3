use std::io::{Seek, Write};
use std::path::Path;

use bracket_geometry::prelude::Rect;
use image::{ImageFormat, ImageResult, RgbImage};

use super::Renderer;
use crate::data::Rgb;

/// Software framebuffer the size of the game window.
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    image: RgbImage,
    frames: u64,
}

impl PixelCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1) as u32;
        let height = height.max(1) as u32;
        Self {
            image: RgbImage::from_pixel(width, height, Rgb::BLACK.into()),
            frames: 0,
        }
    }

    pub fn width(&self) -> i32 {
        self.image.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.image.height() as i32
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.image.get_pixel_checked(x, y).map(|&pixel| pixel.into())
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Saves the frame; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.image.save(path)
    }

    pub fn write_png<W: Write + Seek>(&self, out: &mut W) -> ImageResult<()> {
        self.image.write_to(out, ImageFormat::Png)
    }
}

impl Renderer for PixelCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let x1 = rect.x1.clamp(0, self.width()) as u32;
        let x2 = rect.x2.clamp(0, self.width()) as u32;
        let y1 = rect.y1.clamp(0, self.height()) as u32;
        let y2 = rect.y2.clamp(0, self.height()) as u32;
        let pixel: image::Rgb<u8> = color.into();
        for y in y1..y2 {
            for x in x1..x2 {
                self.image.put_pixel(x, y, pixel);
            }
        }
    }

    fn present(&mut self) {
        self.frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn fill_is_clipped_to_canvas() {
        let mut canvas = PixelCanvas::new(4, 3);
        canvas.fill_rect(Rect::with_size(2, 1, 10, 10), Rgb::PLAYER);

        assert_eq!(canvas.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(2, 1), Some(Rgb::PLAYER));
        assert_eq!(canvas.pixel(3, 2), Some(Rgb::PLAYER));
        assert_eq!(canvas.pixel(4, 2), None);
        assert_eq!(canvas.pixel(-1, 0), None);
    }

    #[test]
    fn rects_fully_outside_leave_the_frame_untouched() {
        let mut canvas = PixelCanvas::new(4, 3);
        canvas.fill_rect(Rect::with_size(-10, -10, 5, 5), Rgb::PLAYER);
        canvas.fill_rect(Rect::with_size(6, 0, 2, 2), Rgb::PLAYER);

        assert!(canvas.image().pixels().all(|&pixel| Rgb::from(pixel) == Rgb::BLACK));
    }

    #[test]
    fn png_snapshot_decodes_to_the_same_pixels() {
        let mut canvas = PixelCanvas::new(2, 1);
        canvas.fill_rect(Rect::with_size(1, 0, 1, 1), Rgb::GRASS);
        let mut out = Cursor::new(Vec::new());
        canvas.write_png(&mut out).unwrap();

        let decoded = image::load_from_memory(out.get_ref()).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 255, 0]);
    }

    #[test]
    fn save_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = PixelCanvas::new(3, 2);
        canvas.fill_rect(Rect::with_size(0, 1, 3, 1), Rgb(139, 69, 19));
        canvas.save(&path).unwrap();

        let reopened = image::open(&path).unwrap().to_rgb8();
        assert_eq!(reopened.get_pixel(2, 1).0, [139, 69, 19]);
        assert_eq!(reopened.get_pixel(2, 0).0, [0, 0, 0]);
    }
}
