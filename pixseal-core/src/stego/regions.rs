//! Signature region geometry.
//!
//! Three fixed-size rectangles, spatially separated so that cropping any one
//! edge of the image leaves at least one intact copy of the signature. The
//! descriptors are format constants; they never change at runtime.

use serde::{Deserialize, Serialize};

/// Minimum image width accepted by the sign operation.
pub const MIN_SIGNABLE_WIDTH: u32 = 64;

/// Minimum image height accepted by the sign operation.
pub const MIN_SIGNABLE_HEIGHT: u32 = 64;

/// Identifies one of the three embedding regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionId {
    TopLeft,
    TopRight,
    BottomCenter,
}

impl RegionId {
    /// All regions, in embedding order.
    pub const ALL: [RegionId; 3] = [RegionId::TopLeft, RegionId::TopRight, RegionId::BottomCenter];

    pub fn as_u8(self) -> u8 {
        match self {
            RegionId::TopLeft => 0,
            RegionId::TopRight => 1,
            RegionId::BottomCenter => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RegionId::TopLeft),
            1 => Some(RegionId::TopRight),
            2 => Some(RegionId::BottomCenter),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RegionId::TopLeft => "top-left",
            RegionId::TopRight => "top-right",
            RegionId::BottomCenter => "bottom-center",
        }
    }

    /// The region descriptor for this id.
    pub fn descriptor(self) -> &'static Region {
        &REGIONS[self.as_u8() as usize]
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-size rectangle reserved for one embedded signature copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    /// Rectangle width in pixels.
    pub width: u32,
    /// Rectangle height in pixels.
    pub height: u32,
}

/// The three predefined regions. Each covers 128 pixels, which at 4 bits per
/// pixel yields 64 bytes of capacity, enough for a 48-byte record plus zero
/// padding.
pub const REGIONS: [Region; 3] = [
    Region {
        id: RegionId::TopLeft,
        width: 32,
        height: 4,
    },
    Region {
        id: RegionId::TopRight,
        width: 4,
        height: 32,
    },
    Region {
        id: RegionId::BottomCenter,
        width: 32,
        height: 4,
    },
];

impl Region {
    /// Top-left pixel coordinate of this region within a `width`x`height`
    /// image. Meaningful only when [`Region::fits`] holds.
    pub fn origin(&self, image_width: u32, image_height: u32) -> (u32, u32) {
        match self.id {
            RegionId::TopLeft => (0, 0),
            RegionId::TopRight => (image_width.saturating_sub(self.width), 0),
            RegionId::BottomCenter => (
                (image_width / 2).saturating_sub(self.width / 2),
                image_height.saturating_sub(self.height),
            ),
        }
    }

    /// Whether this region lies entirely within the given image dimensions.
    pub fn fits(&self, image_width: u32, image_height: u32) -> bool {
        let (x, y) = self.origin(image_width, image_height);
        x.checked_add(self.width).is_some_and(|right| right <= image_width)
            && y.checked_add(self.height).is_some_and(|bottom| bottom <= image_height)
    }

    /// Number of carrier pixels in this region.
    pub const fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Embedding capacity in bytes (two 4-bit nibbles per pixel).
    pub const fn capacity_bytes(&self) -> usize {
        (self.pixel_count() / 2) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RECORD_LEN;

    #[test]
    fn test_region_id_byte_roundtrip() {
        for id in RegionId::ALL {
            assert_eq!(RegionId::from_u8(id.as_u8()), Some(id));
        }
        assert_eq!(RegionId::from_u8(3), None);
    }

    #[test]
    fn test_every_region_holds_a_record() {
        for region in &REGIONS {
            assert!(region.capacity_bytes() >= RECORD_LEN + 16);
            assert_eq!(region.capacity_bytes(), 64);
        }
    }

    #[test]
    fn test_origins_at_reference_size() {
        let (w, h) = (128, 128);
        assert_eq!(RegionId::TopLeft.descriptor().origin(w, h), (0, 0));
        assert_eq!(RegionId::TopRight.descriptor().origin(w, h), (124, 0));
        assert_eq!(RegionId::BottomCenter.descriptor().origin(w, h), (48, 124));
    }

    #[test]
    fn test_all_regions_fit_at_minimum_size() {
        for region in &REGIONS {
            assert!(
                region.fits(MIN_SIGNABLE_WIDTH, MIN_SIGNABLE_HEIGHT),
                "{} does not fit the minimum signable image",
                region.id
            );
        }
    }

    #[test]
    fn test_regions_do_not_overlap_at_minimum_size() {
        let (w, h) = (MIN_SIGNABLE_WIDTH, MIN_SIGNABLE_HEIGHT);
        let rects: Vec<(u32, u32, u32, u32)> = REGIONS
            .iter()
            .map(|r| {
                let (x, y) = r.origin(w, h);
                (x, y, x + r.width, y + r.height)
            })
            .collect();

        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                let (ax0, ay0, ax1, ay1) = rects[i];
                let (bx0, by0, bx1, by1) = rects[j];
                let disjoint = ax1 <= bx0 || bx1 <= ax0 || ay1 <= by0 || by1 <= ay0;
                assert!(disjoint, "regions {i} and {j} overlap at minimum size");
            }
        }
    }

    #[test]
    fn test_narrow_image_drops_unfit_regions() {
        // Tall and narrow: the horizontal strips cannot fit.
        assert!(!RegionId::TopLeft.descriptor().fits(16, 512));
        assert!(RegionId::TopRight.descriptor().fits(16, 512));
        assert!(!RegionId::BottomCenter.descriptor().fits(16, 512));
    }
}
