use image::RgbImage;

use crate::region::PixelRegion;

/// Side length of the square Gaussian kernel used to smooth face regions.
///
/// Always odd and at least 1. A size of 1 leaves pixels untouched.
/// Sizes above [`BlurKernelSize::MAX`] are rejected when a blur runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlurKernelSize(u32);

impl BlurKernelSize {
    /// Largest kernel side length a blur accepts.
    pub const MAX: u32 = 1001;

    /// Normalize `strength` to an odd kernel size. Even values (including 0)
    /// round up to the next odd value.
    pub fn new(strength: u32) -> Self {
        if strength % 2 == 0 {
            Self(strength + 1)
        } else {
            Self(strength)
        }
    }

    /// The kernel side length.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether the kernel is within [`BlurKernelSize::MAX`].
    pub fn is_supported(self) -> bool {
        self.0 <= Self::MAX
    }

    /// Standard deviation derived from the kernel size.
    ///
    /// Uses the common `0.3 * ((k - 1) * 0.5 - 1) + 0.8` rule so the kernel
    /// holds roughly ±3σ.
    pub fn sigma(self) -> f64 {
        0.3 * ((self.0 as f64 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

impl From<u32> for BlurKernelSize {
    fn from(strength: u32) -> Self {
        Self::new(strength)
    }
}

/// Normalized 1-D Gaussian weights for `size`.
pub(crate) fn gaussian_kernel(size: BlurKernelSize) -> Vec<f32> {
    let k = size.get() as usize;
    let center = (k / 2) as f64;
    let sigma = size.sigma();
    let scale = -0.5 / (sigma * sigma);

    let raw: Vec<f64> = (0..k)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Reflect an out-of-range index back into `0..len`, mirroring about the
/// edge pixels without repeating them (`gfedcb|abcdefgh|gfedcba`).
fn reflect_101(mut index: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as i64 - 1;
    loop {
        if index < 0 {
            index = -index;
        } else if index > last {
            index = 2 * last - index;
        } else {
            return index as usize;
        }
    }
}

/// Kernel weights for output position `pos`, folded onto the source indices
/// they land on after reflection. At most `len` entries whatever the kernel
/// size.
fn folded_taps(pos: usize, len: usize, kernel: &[f32]) -> Vec<(usize, f32)> {
    let radius = (kernel.len() / 2) as i64;
    let mut weights = vec![0.0f32; len];
    for (t, &weight) in kernel.iter().enumerate() {
        weights[reflect_101(pos as i64 + t as i64 - radius, len)] += weight;
    }
    weights
        .into_iter()
        .enumerate()
        .filter(|&(_, weight)| weight != 0.0)
        .collect()
}

/// Smooth `region` of `image` in place with a separable Gaussian filter.
///
/// The region is filtered in isolation: pixels outside it are neither read
/// nor written, and borders are handled by reflection inside the region.
pub(crate) fn blur_region(image: &mut RgbImage, region: PixelRegion, size: BlurKernelSize) {
    if region.is_empty() || size.get() == 1 {
        return;
    }

    let kernel = gaussian_kernel(size);
    let (w, h) = (region.width as usize, region.height as usize);

    let mut source = Vec::with_capacity(w * h * 3);
    for y in 0..region.height {
        for x in 0..region.width {
            let pixel = image.get_pixel(region.x + x, region.y + y);
            source.extend(pixel.0.iter().map(|&c| c as f32));
        }
    }

    // Horizontal pass.
    let mut horizontal = vec![0.0f32; w * h * 3];
    for x in 0..w {
        let taps = folded_taps(x, w, &kernel);
        for y in 0..h {
            let row = &source[y * w * 3..(y + 1) * w * 3];
            let mut acc = [0.0f32; 3];
            for &(sx, weight) in &taps {
                for (c, value) in acc.iter_mut().enumerate() {
                    *value += weight * row[sx * 3 + c];
                }
            }
            horizontal[(y * w + x) * 3..(y * w + x) * 3 + 3].copy_from_slice(&acc);
        }
    }

    // Vertical pass, written straight back into the image.
    for y in 0..h {
        let taps = folded_taps(y, h, &kernel);
        for x in 0..w {
            let mut acc = [0.0f32; 3];
            for &(sy, weight) in &taps {
                let base = (sy * w + x) * 3;
                for (c, value) in acc.iter_mut().enumerate() {
                    *value += weight * horizontal[base + c];
                }
            }
            let out = image.get_pixel_mut(region.x + x as u32, region.y + y as u32);
            for (channel, value) in out.0.iter_mut().zip(acc) {
                *channel = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}
