//! Collision detection
//!
//! Pure overlap tests between the player and hostiles. Three strategies:
//! - AABB overlap (edge-touching counts as a hit)
//! - circle vs rectangle (bird eggs)
//! - pixel-accurate overlap over sprite alpha masks

use serde::{Deserialize, Serialize};

use super::geom::{Circle, PixelRect, Rect};
use super::mask::{AlphaSampler, SpriteKind};

/// Which test decides a lethal player/hostile contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionMode {
    #[default]
    Aabb,
    Pixel,
}

impl CollisionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionMode::Aabb => "aabb",
            CollisionMode::Pixel => "pixel",
        }
    }
}

/// A sprite placed on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub sprite: SpriteKind,
    pub rect: Rect,
}

impl Placed {
    pub fn new(sprite: SpriteKind, rect: Rect) -> Self {
        Self { sprite, rect }
    }
}

/// Axis-aligned overlap.
///
/// Rectangles overlap unless one lies strictly beyond an edge of the other,
/// so rectangles sharing only an edge DO overlap.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(b.left() > a.right() || b.right() < a.left() || b.top() > a.bottom() || b.bottom() < a.top())
}

/// Circle vs axis-aligned rectangle
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let center = rect.center();

    let dist_x = (circle.center.x - center.x).abs();
    let dist_y = (circle.center.y - center.y).abs();

    if dist_x > half_w + circle.radius || dist_y > half_h + circle.radius {
        return false;
    }
    if dist_x <= half_w || dist_y <= half_h {
        return true;
    }

    // Nearest corner
    let dx = dist_x - half_w;
    let dy = dist_y - half_h;
    dx * dx + dy * dy <= circle.radius * circle.radius
}

/// Pixel-accurate overlap.
///
/// True iff some pixel inside both bounding boxes is non-transparent in both
/// sprites. Missing alpha data for either sprite means no overlap.
pub fn pixel_overlap(sampler: &dyn AlphaSampler, a: &Placed, b: &Placed) -> bool {
    let Some(shared) = a.rect.intersection(&b.rect) else {
        return false;
    };
    let region = PixelRect::enclosing(&shared);
    if region.is_empty() {
        return false;
    }

    let Some(mask_a) = sampler.sample(a.sprite, &a.rect, &region) else {
        return false;
    };
    let Some(mask_b) = sampler.sample(b.sprite, &b.rect, &region) else {
        return false;
    };
    if mask_a.region != region || mask_b.region != region {
        return false;
    }

    mask_a
        .alpha
        .iter()
        .zip(&mask_b.alpha)
        .any(|(&pa, &pb)| pa != 0 && pb != 0)
}

/// Run the configured lethal-contact test
pub fn sprites_collide(
    mode: CollisionMode,
    sampler: &dyn AlphaSampler,
    a: &Placed,
    b: &Placed,
) -> bool {
    match mode {
        CollisionMode::Aabb => rects_overlap(&a.rect, &b.rect),
        CollisionMode::Pixel => pixel_overlap(sampler, a, b),
    }
}
