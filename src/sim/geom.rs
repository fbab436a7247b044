//! Surface-space geometry
//!
//! Top-left origin, y grows downward, units are surface pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{MIN_ENTITY_EXTENT, SURFACE_HEIGHT, SURFACE_WIDTH};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Extents below `MIN_ENTITY_EXTENT` (including NaN) are clamped up
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(MIN_ENTITY_EXTENT),
            height: height.max(MIN_ENTITY_EXTENT),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Shared area of two rectangles, `None` when it is empty or zero-width
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());

        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        })
    }

    /// Move the rectangle so it lies inside `[min, max]`.
    ///
    /// When the bounds are smaller than the rectangle it is pinned to `min`.
    pub fn clamp_into(&mut self, min: Vec2, max: Vec2) {
        let hi = (max - self.size()).max(min);
        self.x = self.x.clamp(min.x, hi.x);
        self.y = self.y.clamp(min.y, hi.y);
    }
}

/// Integer rectangle on the pixel grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Smallest pixel rectangle covering `rect`
    pub fn enclosing(rect: &Rect) -> Self {
        let x0 = rect.left().floor();
        let y0 = rect.top().floor();
        let x1 = rect.right().ceil();
        let y1 = rect.bottom().ceil();
        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0).max(0.0) as u32,
            height: (y1 - y0).max(0.0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Circle (projectiles)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::from_center(self.center, Vec2::splat(self.radius * 2.0))
    }
}

/// Current drawing surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
        }
    }
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(MIN_ENTITY_EXTENT),
            height: height.max(MIN_ENTITY_EXTENT),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}
