//! Binary frame data structure

/// One thresholded video frame: `width * height` pixels in row-major order,
/// `true` for foreground and `false` for background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width of the frame in pixels
    pub width: u16,
    /// Height of the frame in pixels
    pub height: u16,
    /// Row-major pixel values
    pub pixels: Vec<bool>,
}

impl Frame {
    /// Creates a frame from row-major pixels.
    ///
    /// The pixel count is not checked here; [`crate::AssetBuilder`] rejects
    /// frames whose length disagrees with the asset dimensions.
    pub fn new(width: u16, height: u16, pixels: Vec<bool>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Creates an all-background frame
    pub fn blank(width: u16, height: u16) -> Self {
        Self::new(width, height, vec![false; width as usize * height as usize])
    }

    /// Creates a frame by evaluating `f(x, y)` for every pixel
    pub fn from_fn(width: u16, height: u16, mut f: impl FnMut(u16, u16) -> bool) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Number of pixels stored in this frame
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds
    pub fn get(&self, x: u16, y: u16) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Number of foreground pixels
    pub fn foreground_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }
}

impl AsRef<[bool]> for Frame {
    fn as_ref(&self) -> &[bool] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let frame = Frame::from_fn(3, 2, |x, y| x == 2 && y == 0);
        assert_eq!(frame.pixels, vec![false, false, true, false, false, false]);
        assert_eq!(frame.get(2, 0), Some(true));
        assert_eq!(frame.get(3, 0), None);
        assert_eq!(frame.foreground_count(), 1);
    }
}
