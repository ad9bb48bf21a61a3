use crate::{ColorImage, Rgb};

/// Borrowed 8-bit grayscale image handed to marker localizers.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl GrayImageView<'_> {
    /// Pixel at `(x, y)`; out-of-bounds reads return 0.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }
}

/// Convert an RGB frame to grayscale (BT.601 luma).
pub fn gray_from_color(color: &ColorImage) -> GrayImage {
    GrayImage {
        width: color.width(),
        height: color.height(),
        data: color.as_slice().iter().copied().map(Rgb::luma).collect(),
    }
}
