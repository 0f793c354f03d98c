use halo_core::Rgba;

/// A pixel type the blur can accumulate.
pub trait BlurSample: Copy {
    fn zero() -> Self;
    fn add_weighted(&mut self, other: Self, weight: f32);
}

impl BlurSample for f32 {
    fn zero() -> Self {
        0.0
    }

    fn add_weighted(&mut self, other: Self, weight: f32) {
        *self += other * weight;
    }
}

impl BlurSample for Rgba {
    fn zero() -> Self {
        Rgba::TRANSPARENT
    }

    fn add_weighted(&mut self, other: Self, weight: f32) {
        self.r += other.r * weight;
        self.g += other.g * weight;
        self.b += other.b * weight;
        self.a += other.a * weight;
    }
}

/// Normalized Gaussian taps for a blur of `radius` pixels.
///
/// Sigma is half the radius and the kernel spans `radius` on each side.
/// Radii below half a pixel produce the identity kernel.
pub fn gaussian_kernel(radius: f32) -> Vec<f32> {
    if !radius.is_finite() || radius < 0.5 {
        return vec![1.0];
    }
    let half = radius.ceil() as usize;
    let sigma = radius / 2.0;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f32> = (0..=2 * half)
        .map(|i| {
            let d = i as f32 - half as f32;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for tap in taps.iter_mut() {
        *tap /= sum;
    }
    taps
}

/// Separable Gaussian blur in place, edges clamped.
///
/// `scratch` is resized as needed and can be reused across frames.
pub fn blur<T: BlurSample>(data: &mut [T], width: usize, height: usize, radius: f32, scratch: &mut Vec<T>) {
    let kernel = gaussian_kernel(radius);
    if kernel.len() == 1 || data.len() != width * height || data.is_empty() {
        return;
    }
    let half = (kernel.len() / 2) as isize;
    scratch.clear();
    scratch.resize(data.len(), T::zero());

    for y in 0..height {
        let row = &data[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = T::zero();
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - half).clamp(0, width as isize - 1) as usize;
                acc.add_weighted(row[sx], *weight);
            }
            scratch[y * width + x] = acc;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let mut acc = T::zero();
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - half).clamp(0, height as isize - 1) as usize;
                acc.add_weighted(scratch[sy * width + x], *weight);
            }
            data[y * width + x] = acc;
        }
    }
}
