//! Conversion of decoded images into the classifier's input tensor.

use crate::config::ResizeFilter;
use crate::constants::tensor::{BATCH, CHANNELS, DARKENING_FACTOR, HEIGHT, PIXEL_SCALE, WIDTH};
use image::DynamicImage;
use image::imageops;
use ndarray::{Array4, ArrayView4};

/// Fixed-shape model input: `(1, 512, 512, 3)`, NHWC, values in `[0, 1]`.
///
/// When darkened, values lie in `[0, 0.6]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    data: Array4<f32>,
}

impl NormalizedTensor {
    /// Tensor of the model input shape filled with zeros.
    pub fn zeros() -> Self {
        Self {
            data: Array4::zeros(Self::dims()),
        }
    }

    /// Shape as `[batch, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        let (n, h, w, c) = self.data.dim();
        [n, h, w, c]
    }

    /// Borrow the underlying array.
    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// Iterate over every value in logical order.
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.data.iter()
    }

    /// Copy the values out in row-major (NHWC) order.
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    const fn dims() -> (usize, usize, usize, usize) {
        (BATCH, HEIGHT as usize, WIDTH as usize, CHANNELS)
    }
}

/// Normalize a decoded image into the model input tensor.
///
/// Coerces to 8-bit RGB (dropping alpha, expanding grayscale), resizes to
/// exactly 512x512 ignoring aspect ratio, scales to `[0, 1]`, and
/// multiplies by the darkening factor when `darken` is set.
pub fn normalize(image: &DynamicImage, darken: bool, filter: ResizeFilter) -> NormalizedTensor {
    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, WIDTH, HEIGHT, filter.into());
    let raw = resized.as_raw();

    let scale = if darken { DARKENING_FACTOR } else { 1.0 };
    let width = WIDTH as usize;

    let data = Array4::from_shape_fn(NormalizedTensor::dims(), |(_, y, x, c)| {
        f32::from(raw[(y * width + x) * CHANNELS + c]) / PIXEL_SCALE * scale
    });

    NormalizedTensor { data }
}
