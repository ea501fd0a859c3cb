//! Decoded video frames and their luminance map.
//!
//! Frames are stored as packed RGB24 (three bytes per pixel, row-major), which
//! is what ffmpeg emits for `-f rawvideo -pix_fmt rgb24`.

use crate::error::{CoreError, CoreResult};

/// Number of colour channels per pixel in an RGB24 frame.
pub const CHANNELS: usize = 3;

/// A single decoded RGB24 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wraps raw RGB24 bytes, checking that the buffer matches the dimensions.
    pub fn from_rgb24(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(CoreError::FrameDecode(format!(
                "expected {expected} bytes for a {width}x{height} rgb24 frame, got {}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Builds a frame by evaluating `pixel(x, y)` for every position.
    ///
    /// ```rust
    /// use barcrop_core::Frame;
    ///
    /// let frame = Frame::from_fn(4, 2, |x, _| if x == 0 { [0, 0, 0] } else { [200, 200, 200] });
    /// assert_eq!(frame.column_luminance()[0], 0.0);
    /// assert_eq!(frame.column_luminance()[1], 200.0);
    /// ```
    pub fn from_fn<F>(width: u32, height: u32, mut pixel: F) -> Self
    where
        F: FnMut(u32, u32) -> [u8; 3],
    {
        let mut data = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&pixel(x, y));
            }
        }
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mean luminance of every column, on a 0-255 scale.
    ///
    /// A pixel's luminance is the mean of its three channels and a column's
    /// luminance is the mean of its pixels.
    pub fn column_luminance(&self) -> Vec<f64> {
        let width = self.width as usize;
        let height = self.height as usize;
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let mut sums = vec![0u64; width];
        for row in self.data.chunks_exact(width * CHANNELS) {
            for (x, pixel) in row.chunks_exact(CHANNELS).enumerate() {
                sums[x] += pixel.iter().map(|&c| u64::from(c)).sum::<u64>();
            }
        }

        let samples_per_column = (height * CHANNELS) as f64;
        sums.into_iter()
            .map(|sum| sum as f64 / samples_per_column)
            .collect()
    }
}
