//! Pure classification of image geometry.
//!
//! Given one image's natural and rendered dimensions, produce its scale
//! classification together with the formatted percentage, the human-readable
//! label, and the tint/color palette the annotation will use.

use scalemark_dom::ImageMetrics;

/// Palette for proportional downscales (exactly 2x or 4x reductions).
pub const PROPORTIONAL_COLOR: &str = "rgba(0,180,60,0.7)";
pub const PROPORTIONAL_TINT: &str = "brightness(0.7) sepia(1) hue-rotate(90deg) saturate(5)";

/// Palette for generic (non-proportional) downscales.
pub const DOWNSCALE_COLOR: &str = "rgba(0, 80, 255, 0.7)";
pub const DOWNSCALE_TINT: &str = "brightness(0.7) sepia(1) hue-rotate(180deg) saturate(5)";

/// Palette for upscales.
pub const UPSCALE_COLOR: &str = "rgba(255, 40, 40, 0.7)";
pub const UPSCALE_TINT: &str = "brightness(0.7) sepia(1) hue-rotate(-50deg) saturate(5)";

/// Which way the rendered box diverges from the natural resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    /// At least one axis is rendered smaller than natural.
    Downscaled {
        /// True for exact 2x/4x reductions, which get their own palette.
        proportional: bool,
    },
    /// At least one axis is rendered larger than natural.
    Upscaled,
}

/// A classified mismatch, ready to annotate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaledImage {
    pub direction: ScaleDirection,
    /// Canonical formatted percentage, e.g. `50` or `93.75`.
    pub percent: String,
    /// Full overlay label, including the size transition.
    pub label: String,
    /// CSS filter applied to the image itself.
    pub tint: &'static str,
    /// Background color of the overlay label.
    pub color: &'static str,
}

/// Result of classifying one image's geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Some dimension is zero; the image is skipped entirely.
    NotApplicable,
    /// Rendered exactly at natural size.
    Unscaled,
    Scaled(ScaledImage),
}

/// Classify one image's geometry.
#[must_use]
pub fn classify(metrics: ImageMetrics) -> Classification {
    let ImageMetrics {
        natural_w,
        natural_h,
        rendered_w,
        rendered_h,
    } = metrics;
    if natural_w == 0 || natural_h == 0 || rendered_w == 0 || rendered_h == 0 {
        return Classification::NotApplicable;
    }

    let downscaled = rendered_w < natural_w || rendered_h < natural_h;
    let upscaled = rendered_w > natural_w || rendered_h > natural_h;
    if !downscaled && !upscaled {
        return Classification::Unscaled;
    }

    let percent = scale_percent(metrics);
    let transition = format!("[{natural_w}x{natural_h} → {rendered_w}x{rendered_h}]");
    // One axis down and the other up classifies as downscaled: the downscale
    // check runs first, deliberately.
    let scaled = if downscaled {
        // The proportionality window is evaluated against the formatted value,
        // so a percentage that rounds to exactly 50 or 25 counts.
        let rounded: f64 = percent.parse().unwrap_or_default();
        if (rounded - 50.0).abs() < 0.01 {
            ScaledImage {
                direction: ScaleDirection::Downscaled { proportional: true },
                label: format!("Downsized 2x ({percent}%) {transition}"),
                percent,
                tint: PROPORTIONAL_TINT,
                color: PROPORTIONAL_COLOR,
            }
        } else if (rounded - 25.0).abs() < 0.01 {
            ScaledImage {
                direction: ScaleDirection::Downscaled { proportional: true },
                label: format!("Downsized 4x ({percent}%) {transition}"),
                percent,
                tint: PROPORTIONAL_TINT,
                color: PROPORTIONAL_COLOR,
            }
        } else {
            ScaledImage {
                direction: ScaleDirection::Downscaled {
                    proportional: false,
                },
                label: format!("Downsized {percent}% {transition}"),
                percent,
                tint: DOWNSCALE_TINT,
                color: DOWNSCALE_COLOR,
            }
        }
    } else {
        ScaledImage {
            direction: ScaleDirection::Upscaled,
            label: format!("Upsized {percent}% {transition}"),
            percent,
            tint: UPSCALE_TINT,
            color: UPSCALE_COLOR,
        }
    };
    Classification::Scaled(scaled)
}

/// Format the dominant scale factor as a percentage string: two decimals when
/// the value is not within 0.01 of an integer, else the rounded whole number.
fn scale_percent(metrics: ImageMetrics) -> String {
    let width_scale = f64::from(metrics.rendered_w) / f64::from(metrics.natural_w);
    let height_scale = f64::from(metrics.rendered_h) / f64::from(metrics.natural_h);
    let percent = width_scale.max(height_scale) * 100.0;
    if (percent - percent.round()).abs() > 0.01 {
        format!("{percent:.2}")
    } else {
        format!("{}", percent.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Error, anyhow};

    fn scaled(metrics: ImageMetrics) -> Result<ScaledImage, Error> {
        match classify(metrics) {
            Classification::Scaled(scaled) => Ok(scaled),
            other => Err(anyhow!("expected a scaled classification, got {other:?}")),
        }
    }

    #[test]
    fn zero_dimensions_are_not_applicable() {
        assert_eq!(
            classify(ImageMetrics::new(0, 600, 400, 300)),
            Classification::NotApplicable
        );
        assert_eq!(
            classify(ImageMetrics::new(800, 0, 400, 300)),
            Classification::NotApplicable
        );
        assert_eq!(
            classify(ImageMetrics::new(800, 600, 0, 300)),
            Classification::NotApplicable
        );
        assert_eq!(
            classify(ImageMetrics::new(800, 600, 400, 0)),
            Classification::NotApplicable
        );
    }

    #[test]
    fn equal_dimensions_are_unscaled() {
        assert_eq!(
            classify(ImageMetrics::new(800, 600, 800, 600)),
            Classification::Unscaled
        );
    }

    #[test]
    fn half_size_is_a_proportional_2x_downscale() -> Result<(), Error> {
        let result = scaled(ImageMetrics::new(800, 600, 400, 300))?;
        assert_eq!(
            result.direction,
            ScaleDirection::Downscaled { proportional: true }
        );
        assert_eq!(result.percent, "50");
        assert_eq!(result.label, "Downsized 2x (50%) [800x600 → 400x300]");
        assert_eq!(result.tint, PROPORTIONAL_TINT);
        assert_eq!(result.color, PROPORTIONAL_COLOR);
        Ok(())
    }

    #[test]
    fn quarter_size_is_a_proportional_4x_downscale() -> Result<(), Error> {
        let result = scaled(ImageMetrics::new(800, 600, 200, 150))?;
        assert_eq!(
            result.direction,
            ScaleDirection::Downscaled { proportional: true }
        );
        assert_eq!(result.percent, "25");
        assert_eq!(result.label, "Downsized 4x (25%) [800x600 → 200x150]");
        Ok(())
    }

    #[test]
    fn uneven_downscale_uses_the_dominant_axis() -> Result<(), Error> {
        // Width is at 90%, height at 100%; scale is max of the two.
        let result = scaled(ImageMetrics::new(800, 600, 720, 600))?;
        assert_eq!(
            result.direction,
            ScaleDirection::Downscaled {
                proportional: false
            }
        );
        assert_eq!(result.percent, "100");
        assert_eq!(result.label, "Downsized 100% [800x600 → 720x600]");
        assert_eq!(result.tint, DOWNSCALE_TINT);
        assert_eq!(result.color, DOWNSCALE_COLOR);
        Ok(())
    }

    #[test]
    fn ninety_percent_downscale_gets_the_generic_label() -> Result<(), Error> {
        let result = scaled(ImageMetrics::new(800, 600, 720, 540))?;
        assert_eq!(result.percent, "90");
        assert_eq!(result.label, "Downsized 90% [800x600 → 720x540]");
        assert_eq!(
            result.direction,
            ScaleDirection::Downscaled {
                proportional: false
            }
        );
        Ok(())
    }

    #[test]
    fn double_size_is_an_upscale() -> Result<(), Error> {
        let result = scaled(ImageMetrics::new(400, 300, 800, 600))?;
        assert_eq!(result.direction, ScaleDirection::Upscaled);
        assert_eq!(result.percent, "200");
        assert_eq!(result.label, "Upsized 200% [400x300 → 800x600]");
        assert_eq!(result.tint, UPSCALE_TINT);
        assert_eq!(result.color, UPSCALE_COLOR);
        Ok(())
    }

    #[test]
    fn mixed_axes_classify_as_downscaled() -> Result<(), Error> {
        // Height shrank, width grew: the downscale check wins the tie-break.
        let result = scaled(ImageMetrics::new(800, 600, 900, 300))?;
        assert!(matches!(
            result.direction,
            ScaleDirection::Downscaled { .. }
        ));
        Ok(())
    }

    #[test]
    fn fractional_percentages_keep_two_decimals() -> Result<(), Error> {
        let result = scaled(ImageMetrics::new(800, 600, 750, 500))?;
        assert_eq!(result.percent, "93.75");
        assert_eq!(result.label, "Downsized 93.75% [800x600 → 750x500]");
        Ok(())
    }

    #[test]
    fn near_integer_percentages_format_as_whole_numbers() -> Result<(), Error> {
        // 300/600 on one axis, 400/800 on the other: both exactly 50%.
        let result = scaled(ImageMetrics::new(800, 600, 400, 300))?;
        assert_eq!(result.percent, "50");
        Ok(())
    }
}
