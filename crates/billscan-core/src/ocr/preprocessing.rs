//! Image cleanup before OCR.

use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::models::config::{Binarization, PreprocessConfig};

/// Grayscale conversion, denoising and optional binarization.
///
/// Image dimensions are never changed: the layout heuristics work in the
/// pixel space of the input scan.
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Prepare an image for OCR.
    pub fn prepare(&self, image: &DynamicImage) -> DynamicImage {
        if !self.config.enabled {
            return image.clone();
        }

        let mut gray = image.to_luma8();

        if self.config.denoise_sigma > 0.0 {
            gray = image::imageops::blur(&gray, self.config.denoise_sigma);
        }

        let processed = match self.config.binarization {
            Binarization::None => gray,
            Binarization::Otsu => {
                let level = otsu_level(&gray);
                debug!("Otsu threshold: {}", level);
                threshold(&gray, level)
            }
            Binarization::Adaptive => adaptive_threshold(
                &gray,
                self.config.adaptive_block_size,
                self.config.adaptive_offset,
            ),
        };

        DynamicImage::ImageLuma8(processed)
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

/// Threshold maximizing the between-class variance of the histogram.
fn otsu_level(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }

    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background = 0u64;
    let mut background_sum = 0.0f64;
    let mut best_level = 0u8;
    let mut best_variance = 0.0f64;

    for (level, &count) in histogram.iter().enumerate() {
        background += count;
        if background == 0 {
            continue;
        }
        let foreground = total - background;
        if foreground == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;
        let mean_background = background_sum / background as f64;
        let mean_foreground = (weighted_total - background_sum) / foreground as f64;
        let diff = mean_background - mean_foreground;
        let variance = background as f64 * foreground as f64 * diff * diff;

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

fn threshold(image: &GrayImage, level: u8) -> GrayImage {
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        pixel[0] = if pixel[0] > level { 255 } else { 0 };
    }
    result
}

/// Local mean threshold: a pixel turns white when it is brighter than the
/// mean of its `block_size` window minus `offset`. Windows are clipped at
/// the image border.
fn adaptive_threshold(image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let integral = integral_image(image);
    let stride = width as usize + 1;
    let half = block_size / 2;

    GrayImage::from_fn(width, height, |x, y| {
        let (x0, x1) = (x.saturating_sub(half) as usize, (x + half + 1).min(width) as usize);
        let (y0, y1) = (y.saturating_sub(half) as usize, (y + half + 1).min(height) as usize);

        let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
            - integral[y0 * stride + x1]
            - integral[y1 * stride + x0];
        let area = ((x1 - x0) * (y1 - y0)) as u64;
        let mean = (sum / area) as i64;

        if i64::from(image.get_pixel(x, y)[0]) > mean - i64::from(offset) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Summed-area table with a zero first row and column.
fn integral_image(image: &GrayImage) -> Vec<u64> {
    let (width, height) = image.dimensions();
    let stride = width as usize + 1;
    let mut table = vec![0u64; stride * (height as usize + 1)];

    for y in 0..height as usize {
        let mut row_sum = 0u64;
        for x in 0..width as usize {
            row_sum += u64::from(image.get_pixel(x as u32, y as u32)[0]);
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row_sum;
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn two_tone() -> GrayImage {
        GrayImage::from_fn(20, 10, |x, _| if x < 10 { Luma([30]) } else { Luma([220]) })
    }

    #[test]
    fn test_otsu_separates_two_tones() {
        let level = otsu_level(&two_tone());
        assert!((30..220).contains(&level));

        let binary = threshold(&two_tone(), level);
        assert_eq!(binary.get_pixel(0, 0)[0], 0);
        assert_eq!(binary.get_pixel(19, 0)[0], 255);
    }

    #[test]
    fn test_prepare_keeps_dimensions() {
        let config = PreprocessConfig {
            binarization: Binarization::Adaptive,
            ..PreprocessConfig::default()
        };
        let image = DynamicImage::ImageLuma8(two_tone());

        let prepared = ImagePreprocessor::new(config).prepare(&image);
        assert_eq!(prepared.dimensions(), (20, 10));
    }

    #[test]
    fn test_adaptive_keeps_ink_on_paper() {
        let mut page = GrayImage::from_pixel(30, 30, Luma([200]));
        for y in 14..17 {
            for x in 14..17 {
                page.put_pixel(x, y, Luma([40]));
            }
        }

        let binary = adaptive_threshold(&page, 15, 5);
        assert_eq!(binary.get_pixel(15, 15)[0], 0);
        assert_eq!(binary.get_pixel(0, 0)[0], 255);
        assert_eq!(binary.get_pixel(29, 29)[0], 255);
    }

    #[test]
    fn test_integral_image_sums() {
        let image = GrayImage::from_fn(3, 2, |x, y| Luma([(x + 3 * y) as u8]));
        let table = integral_image(&image);
        let stride = 4;

        // Whole image: 0 + 1 + 2 + 3 + 4 + 5
        assert_eq!(table[2 * stride + 3], 15);
        assert_eq!(table[stride + 2], 1);
    }

    #[test]
    fn test_disabled_is_identity() {
        let config = PreprocessConfig {
            enabled: false,
            ..PreprocessConfig::default()
        };
        let image = DynamicImage::ImageLuma8(two_tone());

        let prepared = ImagePreprocessor::new(config).prepare(&image);
        assert_eq!(prepared.to_luma8(), two_tone());
    }
}
