//! Sprite alpha masks for pixel-accurate collision
//!
//! The simulation never touches a live drawing surface. Pixel collision asks an
//! [`AlphaSampler`] for the alpha values a sprite would produce when drawn into
//! its bounding box, restricted to a pixel region. Hosts back this with decoded
//! image data; tests and headless runs use [`SpriteSheet`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::geom::{PixelRect, Rect};

/// Which sprite an entity is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Dino,
    Obstacle,
    Meteor,
    Bird,
    Egg,
}

/// Alpha values for a pixel region, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaGrid {
    pub region: PixelRect,
    pub alpha: Vec<u8>,
}

impl AlphaGrid {
    /// Returns `None` if `alpha` does not cover `region` exactly
    pub fn new(region: PixelRect, alpha: Vec<u8>) -> Option<Self> {
        (alpha.len() == region.area()).then_some(Self { region, alpha })
    }

    /// Alpha at a surface pixel, 0 outside the region
    pub fn get(&self, x: i32, y: i32) -> u8 {
        let lx = x - self.region.x;
        let ly = y - self.region.y;
        if lx < 0 || ly < 0 || lx as u32 >= self.region.width || ly as u32 >= self.region.height {
            return 0;
        }
        self.alpha[ly as usize * self.region.width as usize + lx as usize]
    }
}

/// Source of per-pixel alpha data
pub trait AlphaSampler {
    /// Alpha of `sprite` scaled into `dest`, sampled over `region`.
    ///
    /// `None` means the data is not available (yet).
    fn sample(&self, sprite: SpriteKind, dest: &Rect, region: &PixelRect) -> Option<AlphaGrid>;

    /// Width / height of the sprite image, if known
    fn aspect_ratio(&self, _sprite: SpriteKind) -> Option<f32> {
        None
    }
}

/// Sampler with no assets loaded; nothing is pixel-collidable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSprites;

impl AlphaSampler for NoSprites {
    fn sample(&self, _sprite: SpriteKind, _dest: &Rect, _region: &PixelRect) -> Option<AlphaGrid> {
        None
    }
}

/// Decoded sprite alpha channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, alpha: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || alpha.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            alpha,
        })
    }

    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut alpha = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                alpha.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            alpha,
        }
    }

    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self::from_fn(width, height, |_, _| value)
    }

    /// Opaque ellipse inscribed in the bitmap, transparent corners
    pub fn ellipse(width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        Self::from_fn(width, height, |x, y| {
            let nx = (x as f32 + 0.5) / w * 2.0 - 1.0;
            let ny = (y as f32 + 0.5) / h * 2.0 - 1.0;
            if nx * nx + ny * ny <= 1.0 { 255 } else { 0 }
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// In-memory sprite set, nearest-neighbour scaled
#[derive(Debug, Clone, Default)]
pub struct SpriteSheet {
    bitmaps: HashMap<SpriteKind, Bitmap>,
}

impl SpriteSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: SpriteKind, bitmap: Bitmap) {
        self.bitmaps.insert(kind, bitmap);
    }

    pub fn with(mut self, kind: SpriteKind, bitmap: Bitmap) -> Self {
        self.insert(kind, bitmap);
        self
    }

    /// Rounded silhouettes for every sprite, used by headless runs
    pub fn procedural() -> Self {
        Self::new()
            .with(SpriteKind::Dino, Bitmap::ellipse(32, 32))
            .with(SpriteKind::Obstacle, Bitmap::ellipse(16, 32))
            .with(SpriteKind::Meteor, Bitmap::ellipse(32, 32))
            .with(SpriteKind::Bird, Bitmap::ellipse(30, 20))
            .with(SpriteKind::Egg, Bitmap::ellipse(10, 10))
    }
}

impl AlphaSampler for SpriteSheet {
    fn sample(&self, sprite: SpriteKind, dest: &Rect, region: &PixelRect) -> Option<AlphaGrid> {
        let bitmap = self.bitmaps.get(&sprite)?;
        let (bw, bh) = (bitmap.width as f32, bitmap.height as f32);

        let mut alpha = Vec::with_capacity(region.area());
        for py in 0..region.height {
            // Sample at pixel centers
            let sy = (region.y + py as i32) as f32 + 0.5;
            let v = (sy - dest.y) / dest.height;
            for px in 0..region.width {
                let sx = (region.x + px as i32) as f32 + 0.5;
                let u = (sx - dest.x) / dest.width;
                let value = if (0.0..1.0).contains(&u) && (0.0..1.0).contains(&v) {
                    bitmap.alpha_at((u * bw) as u32, (v * bh) as u32)
                } else {
                    0
                };
                alpha.push(value);
            }
        }
        AlphaGrid::new(*region, alpha)
    }

    fn aspect_ratio(&self, sprite: SpriteKind) -> Option<f32> {
        self.bitmaps.get(&sprite).map(Bitmap::aspect_ratio)
    }
}
