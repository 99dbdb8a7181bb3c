use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};
use mediashelf_core::{FitMode, ResizeOptions};

/// Image resize operations
pub struct ImageResize;

fn scale(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}

impl ImageResize {
    /// Size of the box the image is fitted into, after applying `without_enlargement`.
    ///
    /// Returns `None` when neither dimension is requested.
    pub fn target_box(
        orig_width: u32,
        orig_height: u32,
        options: &ResizeOptions,
    ) -> Option<(u32, u32)> {
        let (width, height) = match (options.width, options.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f64 / orig_width as f64;
                (w, scale(w, aspect_ratio))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f64 / orig_height as f64;
                (scale(h, aspect_ratio), h)
            }
            (None, None) => return None,
        };

        if options.without_enlargement {
            Some((width.min(orig_width).max(1), height.min(orig_height).max(1)))
        } else {
            Some((width.max(1), height.max(1)))
        }
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            imageops::FilterType::CatmullRom
        } else {
            imageops::FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions
    pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }

    /// Scale uniformly so the image covers the box, then crop the overflow around the center.
    pub fn resize_cover(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let factor = (width as f64 / orig_width as f64).max(height as f64 / orig_height as f64);
        let scaled_width = scale(orig_width, factor).max(width);
        let scaled_height = scale(orig_height, factor).max(height);

        let scaled = Self::resize_image(img, scaled_width, scaled_height);
        let x = (scaled_width - width) / 2;
        let y = (scaled_height - height) / 2;
        scaled.crop_imm(x, y, width, height)
    }

    /// Scale uniformly so the image fits inside the box.
    pub fn resize_inside(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let factor = (width as f64 / orig_width as f64).min(height as f64 / orig_height as f64);
        Self::resize_image(img, scale(orig_width, factor), scale(orig_height, factor))
    }

    /// Scale uniformly so the image covers the box, without cropping.
    pub fn resize_outside(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let factor = (width as f64 / orig_width as f64).max(height as f64 / orig_height as f64);
        Self::resize_image(img, scale(orig_width, factor), scale(orig_height, factor))
    }

    /// Fit inside the box and pad the rest with opaque black, centered.
    pub fn resize_contain(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let fitted = Self::resize_inside(img, width, height);
        let (fitted_width, fitted_height) = fitted.dimensions();

        let canvas_img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        let mut canvas = DynamicImage::ImageRgba8(canvas_img);

        let x_offset = width.saturating_sub(fitted_width) / 2;
        let y_offset = height.saturating_sub(fitted_height) / 2;
        imageops::overlay(&mut canvas, &fitted, x_offset as i64, y_offset as i64);

        canvas
    }

    /// Apply resize options to an image
    ///
    /// With `without_enlargement` the result is never larger than the source in
    /// either dimension.
    pub fn apply_resize(img: &DynamicImage, options: &ResizeOptions) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if orig_width == 0 || orig_height == 0 {
            return img.clone();
        }

        let Some((width, height)) = Self::target_box(orig_width, orig_height, options) else {
            return img.clone();
        };

        // A single requested dimension keeps the aspect ratio regardless of fit
        if options.width.is_none() || options.height.is_none() {
            return Self::resize_image(img, width, height);
        }

        let resized = match options.fit {
            FitMode::Cover => Self::resize_cover(img, width, height),
            FitMode::Contain => Self::resize_contain(img, width, height),
            FitMode::Fill => Self::resize_image(img, width, height),
            FitMode::Inside => Self::resize_inside(img, width, height),
            FitMode::Outside => Self::resize_outside(img, width, height),
        };

        if options.without_enlargement {
            let (w, h) = resized.dimensions();
            if w > orig_width || h > orig_height {
                return Self::resize_inside(&resized, orig_width, orig_height);
            }
        }

        resized
    }
}
