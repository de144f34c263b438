//! Rectangular regions that restrict where a recognizer accepts new touches.

use bevy::math::Vec2;
use bevy::reflect::Reflect;
use serde::{Deserialize, Serialize};

/// The corner, edge or center of the surface that an anchored [`BoundaryRegion`] is placed against
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
pub enum Anchor {
    /// The origin of surface space
    #[default]
    BottomLeft,
    /// The middle of the bottom edge
    BottomCenter,
    /// The bottom right corner
    BottomRight,
    /// The middle of the left edge
    CenterLeft,
    /// The center of the surface
    Center,
    /// The middle of the right edge
    CenterRight,
    /// The top left corner
    TopLeft,
    /// The middle of the top edge
    TopCenter,
    /// The top right corner
    TopRight,
}

impl Anchor {
    /// The fraction of the surface (and of the region) that this anchor sits at, in `[0, 1]` on both axes
    #[must_use]
    pub fn fraction(self) -> Vec2 {
        match self {
            Anchor::BottomLeft => Vec2::new(0.0, 0.0),
            Anchor::BottomCenter => Vec2::new(0.5, 0.0),
            Anchor::BottomRight => Vec2::new(1.0, 0.0),
            Anchor::CenterLeft => Vec2::new(0.0, 0.5),
            Anchor::Center => Vec2::new(0.5, 0.5),
            Anchor::CenterRight => Vec2::new(1.0, 0.5),
            Anchor::TopLeft => Vec2::new(0.0, 1.0),
            Anchor::TopCenter => Vec2::new(0.5, 1.0),
            Anchor::TopRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// The 2D area within which a recognizer accepts a newly-began touch.
///
/// Regions use the same y-up surface space as [`TouchSample`](crate::touch::TouchSample),
/// with the origin in the bottom-left corner.
/// Extents are expected to be positive: malformed regions are not rejected,
/// they simply never contain anything.
///
/// # Example
/// ```rust
/// use bevy::math::Vec2;
/// use leafwing_touch::boundary::BoundaryRegion;
///
/// let region = BoundaryRegion::new(10., 10., 100., 50.);
///
/// assert!(region.contains(Vec2::new(10., 60.)));
/// assert!(!region.contains(Vec2::new(9.9, 30.)));
/// assert_eq!(region.center(), Vec2::new(60., 35.));
///
/// let highlighted = region.expanded(5.);
/// assert!(highlighted.contains(Vec2::new(6., 30.)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct BoundaryRegion {
    min: Vec2,
    size: Vec2,
    anchor: Option<Anchor>,
}

impl BoundaryRegion {
    /// Creates a region from its bottom-left corner and its size
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
            anchor: None,
        }
    }

    /// Creates a region of the given size centered on `center`
    #[must_use]
    pub fn from_center(width: f32, height: f32, center: Vec2) -> Self {
        let size = Vec2::new(width, height);
        Self {
            min: center - size / 2.0,
            size,
            anchor: None,
        }
    }

    /// Creates a region of `size` placed against `anchor` on a surface of `surface_size`.
    ///
    /// The matching point of the region is put on the anchor point of the surface,
    /// then moved by `offset`: a `TopRight` region sits flush in the top-right corner for a zero offset.
    #[must_use]
    pub fn anchored(anchor: Anchor, offset: Vec2, size: Vec2, surface_size: Vec2) -> Self {
        let fraction = anchor.fraction();
        Self {
            min: surface_size * fraction - size * fraction + offset,
            size,
            anchor: Some(anchor),
        }
    }

    /// A copy of this region with every coordinate multiplied by `scale`.
    ///
    /// Used to map regions authored at a design-time resolution onto the running resolution,
    /// see [`GestureSettings::runtime_scale`](crate::settings::GestureSettings::runtime_scale).
    #[must_use]
    pub fn scaled(&self, scale: Vec2) -> Self {
        Self {
            min: self.min * scale,
            size: self.size * scale,
            anchor: self.anchor,
        }
    }

    /// A copy of this region grown by `margin` on all four sides
    #[must_use]
    pub fn expanded(&self, margin: f32) -> Self {
        self.expanded_xy(margin, margin)
    }

    /// A copy of this region grown by `x_margin` on the left and right and `y_margin` on the top and bottom
    #[must_use]
    pub fn expanded_xy(&self, x_margin: f32, y_margin: f32) -> Self {
        let margin = Vec2::new(x_margin, y_margin);
        Self {
            min: self.min - margin,
            size: self.size + margin * 2.0,
            anchor: self.anchor,
        }
    }

    /// The bottom-left corner
    #[inline]
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.min
    }

    /// The top-right corner
    #[inline]
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// The width and height
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// The center point
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// The anchor this region was placed with, if any
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    /// Does this region contain `point`?
    ///
    /// All four edges are inclusive.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        self.min.x <= point.x && point.x <= max.x && self.min.y <= point.y && point.y <= max.y
    }
}
