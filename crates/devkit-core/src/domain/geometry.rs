//! Cover-fit scaling and center cropping.
//!
//! A [`ResizePlan`] turns any source size into the fixed target size in two
//! steps: scale proportionally until the image covers the target in both
//! dimensions, then cut a target-sized window out of the middle.

use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

/// Output size of every transformed image (portrait phone screenshot).
pub const TARGET_SIZE: Dimensions = Dimensions::new(1242, 2688);

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// `true` when `self` is at least as large as `other` in both dimensions.
    pub fn covers(self, other: Dimensions) -> bool {
        self.width >= other.width && self.height >= other.height
    }

    fn ensure_non_empty(self) -> Result<Self, DomainError> {
        if self.width == 0 || self.height == 0 {
            return Err(DomainError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Crop window in scaled-image coordinates; `right`/`bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    /// Window of size `inner` centered in `outer`.
    ///
    /// Margins use floor division, so an odd excess leaves the extra pixel on
    /// the right or bottom edge.
    pub fn centered(outer: Dimensions, inner: Dimensions) -> Self {
        debug_assert!(outer.covers(inner), "{outer} does not cover {inner}");
        let left = (outer.width - inner.width) / 2;
        let top = (outer.height - inner.height) / 2;
        Self {
            left,
            top,
            right: left + inner.width,
            bottom: top + inner.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }
}

/// Size an image must be scaled to so it covers `target` without distortion.
///
/// A source relatively wider than the target is scaled to the target height,
/// anything else to the target width. The free dimension is rounded half to
/// even.
pub fn cover_fit(source: Dimensions, target: Dimensions) -> Result<Dimensions, DomainError> {
    let source = source.ensure_non_empty()?;
    let target = target.ensure_non_empty()?;

    let img_ratio = source.aspect_ratio();
    let target_ratio = target.aspect_ratio();

    if img_ratio > target_ratio {
        let width = to_pixels(img_ratio * f64::from(target.height))?;
        Ok(Dimensions::new(width, target.height))
    } else {
        let height = to_pixels(f64::from(target.width) / img_ratio)?;
        Ok(Dimensions::new(target.width, height))
    }
}

fn to_pixels(value: f64) -> Result<u32, DomainError> {
    let rounded = value.round_ties_even();
    if !rounded.is_finite() || rounded > f64::from(u32::MAX) {
        return Err(DomainError::DimensionOverflow { value });
    }
    Ok(rounded as u32)
}

/// Scale-then-crop recipe for one source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResizePlan {
    pub source: Dimensions,
    pub scaled: Dimensions,
    pub crop: CropBox,
}

impl ResizePlan {
    pub fn new(source: Dimensions, target: Dimensions) -> Result<Self, DomainError> {
        let scaled = cover_fit(source, target)?;
        Ok(Self {
            source,
            scaled,
            crop: CropBox::centered(scaled, target),
        })
    }

    /// Final size after cropping; always the target size.
    pub fn output(&self) -> Dimensions {
        self.crop.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(w: u32, h: u32) -> ResizePlan {
        ResizePlan::new(Dimensions::new(w, h), TARGET_SIZE).unwrap()
    }

    fn assert_invariants(plan: &ResizePlan) {
        assert_eq!(plan.output(), TARGET_SIZE, "{plan:?}");
        assert!(plan.scaled.covers(TARGET_SIZE), "{plan:?}");
        assert_eq!(
            plan.crop.left,
            (plan.scaled.width - TARGET_SIZE.width) / 2
        );
        assert_eq!(
            plan.crop.top,
            (plan.scaled.height - TARGET_SIZE.height) / 2
        );
        assert!(plan.crop.right <= plan.scaled.width);
        assert!(plan.crop.bottom <= plan.scaled.height);
    }

    #[test]
    fn landscape_scales_to_target_height() {
        let p = plan(1920, 1080);
        assert_eq!(p.scaled, Dimensions::new(4779, 2688));
        assert_eq!(
            p.crop,
            CropBox {
                left: 1768,
                top: 0,
                right: 3010,
                bottom: 2688
            }
        );
        assert_invariants(&p);
    }

    #[test]
    fn square_scales_to_target_height() {
        let p = plan(1000, 1000);
        assert_eq!(p.scaled, Dimensions::new(2688, 2688));
        assert_eq!(p.crop.left, 723);
        assert_invariants(&p);
    }

    #[test]
    fn narrow_portrait_scales_to_target_width() {
        let p = plan(500, 2000);
        assert_eq!(p.scaled, Dimensions::new(1242, 4968));
        assert_eq!(p.crop.top, 1140);
        assert_invariants(&p);
    }

    #[test]
    fn exact_target_is_untouched() {
        let p = plan(1242, 2688);
        assert_eq!(p.scaled, TARGET_SIZE);
        assert_eq!(
            p.crop,
            CropBox {
                left: 0,
                top: 0,
                right: 1242,
                bottom: 2688
            }
        );
    }

    #[test]
    fn same_ratio_smaller_source_scales_up_exactly() {
        let p = plan(621, 1344);
        assert_eq!(p.scaled, TARGET_SIZE);
        assert_invariants(&p);
    }

    // Odd excess keeps the extra pixel on the right.
    #[test]
    fn odd_excess_floors_left_margin() {
        let p = plan(1243, 2688);
        assert_eq!(p.scaled, Dimensions::new(1243, 2688));
        assert_eq!(p.crop.left, 0);
        assert_eq!(p.crop.right, 1242);
    }

    #[test]
    fn degenerate_inputs_still_cover() {
        for (w, h) in [(1, 1), (1, 2), (1, 3), (1, 10), (1, 4000), (2, 1), (4000, 1), (3, 7)] {
            assert_invariants(&plan(w, h));
        }
    }

    #[test]
    fn sweep_of_sizes_keeps_invariants() {
        for w in (1..=4000).step_by(397) {
            for h in (1..=4000).step_by(311) {
                assert_invariants(&plan(w, h));
            }
        }
    }

    #[test]
    fn rounding_is_half_to_even() {
        // 1x4 -> ratio 0.25 -> height 1242 / 0.25 = 4968 exactly
        assert_eq!(plan(1, 4).scaled, Dimensions::new(1242, 4968));
        assert_eq!(to_pixels(2.5).unwrap(), 2);
        assert_eq!(to_pixels(3.5).unwrap(), 4);
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(
            ResizePlan::new(Dimensions::new(0, 10), TARGET_SIZE),
            Err(DomainError::EmptyImage { width: 0, height: 10 })
        ));
    }

    #[test]
    fn overflow_is_reported() {
        let err = cover_fit(Dimensions::new(u32::MAX, 1), Dimensions::new(1, u32::MAX));
        assert!(matches!(err, Err(DomainError::DimensionOverflow { .. })));
    }

    #[test]
    fn small_targets_work_too() {
        let target = Dimensions::new(12, 26);
        let p = ResizePlan::new(Dimensions::new(40, 30), target).unwrap();
        assert_eq!(p.output(), target);
        assert!(p.scaled.covers(target));
    }
}
