//! Bounding-rectangle transforms and the per-control transform cache
//!
//! A control's screen bounds are its local source rectangle `(0, 0, size)`
//! pushed through the composed transform
//!
//! ```text
//! translate(-origin) · scale(scale) · translate(draw_position + origin)
//! ```
//!
//! where `origin = normalized_origin * size`. Scaling therefore happens
//! around the origin point and the result is positioned at the draw position.
//!
//! ## Loose Bounds
//!
//! The transform is applied to the four corners of the source rectangle and
//! the axis-aligned box of the transformed corners is taken. With only
//! translation and scaling this is exact, and it stays correct for negative
//! scales, which mirror the rectangle.

use std::cell::Cell;

use super::types::{Rect, Vec2};

/// A 2D affine transform restricted to scale and translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    pub scale: Vec2,
    pub translation: Vec2,
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        scale: Vec2::ONE,
        translation: Vec2::ZERO,
    };

    pub fn translation(offset: Vec2) -> Self {
        Self {
            scale: Vec2::ONE,
            translation: offset,
        }
    }

    pub fn scaling(scale: Vec2) -> Self {
        Self {
            scale,
            translation: Vec2::ZERO,
        }
    }

    /// Compose so that `self` is applied first, then `next`
    pub fn then(self, next: Affine2) -> Affine2 {
        Affine2 {
            scale: self.scale.mul_elem(next.scale),
            translation: self.translation.mul_elem(next.scale) + next.translation,
        }
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        point.mul_elem(self.scale) + self.translation
    }

    /// Transform a rectangle using the loose bounds algorithm
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            Vec2::new(rect.left(), rect.top()),
            Vec2::new(rect.right(), rect.top()),
            Vec2::new(rect.left(), rect.bottom()),
            Vec2::new(rect.right(), rect.bottom()),
        ];

        let transformed = corners.map(|p| self.transform_point(p));

        let min = transformed
            .iter()
            .copied()
            .fold(Vec2::splat(f64::INFINITY), Vec2::min);
        let max = transformed
            .iter()
            .copied()
            .fold(Vec2::splat(f64::NEG_INFINITY), Vec2::max);

        Rect::from_corners(min, max)
    }

    /// The bounds transform of a control with the given geometry
    pub fn for_control(draw_position: Vec2, size: Vec2, scale: Vec2, normalized_origin: Vec2) -> Affine2 {
        let origin = normalized_origin.mul_elem(size);
        Affine2::translation(-origin)
            .then(Affine2::scaling(scale))
            .then(Affine2::translation(draw_position + origin))
    }
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Lazily recomputed bounding rectangle
///
/// Any geometry write calls [`TransformCache::invalidate`]; the next read
/// through [`TransformCache::bounds`] rebuilds the rectangle once. Interior
/// mutability lets bounds be read through a shared reference.
#[derive(Debug, Clone)]
pub struct TransformCache {
    dirty: Cell<bool>,
    bounds: Cell<Rect>,
    recomputations: Cell<u64>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self {
            dirty: Cell::new(true),
            bounds: Cell::new(Rect::zero()),
            recomputations: Cell::new(0),
        }
    }

    pub fn invalidate(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// How many times the rectangle has been rebuilt
    pub fn recomputations(&self) -> u64 {
        self.recomputations.get()
    }

    /// Current bounds, rebuilding them first if the cache is dirty
    pub fn bounds(&self, draw_position: Vec2, size: Vec2, scale: Vec2, normalized_origin: Vec2) -> Rect {
        if self.dirty.get() {
            let transform = Affine2::for_control(draw_position, size, scale, normalized_origin);
            let source = Rect::from_origin_size(Vec2::ZERO, size);
            self.bounds.set(transform.transform_rect(&source));
            self.recomputations.set(self.recomputations.get() + 1);
            self.dirty.set(false);
        }
        self.bounds.get()
    }
}

impl Default for TransformCache {
    fn default() -> Self {
        Self::new()
    }
}
