//! Node panels: zoom slider mapping and collapse detection.

use valnet_core::geometry::Size;

/// Default icon edge length; panels smaller than this cannot be resized.
pub const DEFAULT_ICON_SIZE: f32 = 64.0;
pub const DEFAULT_MIN_ZOOM: f32 = 0.2;
pub const DEFAULT_MAX_ZOOM: f32 = 2.5;

/// Collapse threshold as a multiple of the icon size.
const COLLAPSE_FACTOR: f32 = 1.25;

/// Zoom range reachable through a panel's slider.
///
/// The slider is quadratic so that most of its travel is spent near the
/// small zoom levels.
///
/// ```
/// use valnet::panel::ZoomRange;
///
/// let range = ZoomRange::default();
/// assert_eq!(range.zoom_at(0.0), 0.2);
/// assert!((range.zoom_at(1.0) - 2.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomRange {
    min: f32,
    max: f32,
}

impl ZoomRange {
    /// Creates a range; the bounds are swapped if given in reverse.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Zoom for a slider at `fraction` of its travel, clamped to `[0, 1]`.
    pub fn zoom_at(&self, fraction: f32) -> f32 {
        let p = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.min + p * p * (self.max - self.min)
    }

    /// Slider fraction that yields `zoom`; the inverse of [`zoom_at`](Self::zoom_at).
    pub fn fraction_for(&self, zoom: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((zoom - self.min) / span).clamp(0.0, 1.0).sqrt()
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM)
    }
}

/// Whether a panel of `size` shows only its title.
pub fn is_collapsed(size: Size, icon_size: f32) -> bool {
    let threshold = COLLAPSE_FACTOR * icon_size;
    size.width() < threshold || size.height() < threshold
}

/// Clamps a requested panel size so neither side drops below the icon.
pub fn clamp_size(size: Size, icon_size: f32) -> Size {
    size.max(Size::new(icon_size, icon_size))
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_zoom_at_endpoints_and_midpoint() {
        let range = ZoomRange::default();
        assert!(approx_eq!(f32, range.zoom_at(0.0), 0.2, ulps = 2));
        assert!(approx_eq!(f32, range.zoom_at(1.0), 2.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, range.zoom_at(0.5), 0.2 + 0.25 * 2.3, epsilon = 1e-6));
    }

    #[test]
    fn test_zoom_at_clamps_fraction() {
        let range = ZoomRange::default();
        assert_eq!(range.zoom_at(-3.0), range.zoom_at(0.0));
        assert_eq!(range.zoom_at(7.0), range.zoom_at(1.0));
        assert_eq!(range.zoom_at(f32::NAN), range.zoom_at(0.0));
    }

    #[test]
    fn test_fraction_for_inverts_zoom_at() {
        let range = ZoomRange::default();
        for step in 0..=10 {
            let fraction = step as f32 / 10.0;
            let zoom = range.zoom_at(fraction);
            assert!(approx_eq!(f32, range.fraction_for(zoom), fraction, epsilon = 1e-4));
        }
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let range = ZoomRange::new(3.0, 1.0);
        assert_eq!(range.min(), 1.0);
        assert_eq!(range.max(), 3.0);
        assert_eq!(ZoomRange::new(1.0, 1.0).fraction_for(1.0), 0.0);
    }

    #[test]
    fn test_is_collapsed_threshold() {
        // 1.25 * 64 = 80
        assert!(is_collapsed(Size::new(79.0, 200.0), DEFAULT_ICON_SIZE));
        assert!(is_collapsed(Size::new(200.0, 79.0), DEFAULT_ICON_SIZE));
        assert!(!is_collapsed(Size::new(80.0, 80.0), DEFAULT_ICON_SIZE));
        assert!(is_collapsed(Size::new(150.0, 25.0), DEFAULT_ICON_SIZE));
    }

    #[test]
    fn test_clamp_size() {
        let clamped = clamp_size(Size::new(10.0, 300.0), DEFAULT_ICON_SIZE);
        assert_eq!(clamped, Size::new(64.0, 300.0));
    }
}
