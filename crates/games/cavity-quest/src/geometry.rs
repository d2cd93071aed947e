use serde::{Deserialize, Serialize};

/// Sprites are authored at half size and drawn at 2x; hitbox insets are in sprite pixels.
const SPRITE_SCALE: f32 = 2.0;

/// Axis-aligned rectangle with a top-left origin (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Open-interval overlap: touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }

    /// Whether the horizontal spans overlap (open interval).
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }
}

/// Raw bounding-box overlap test.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Entity kinds with a gameplay hitbox smaller than their drawn bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitboxKind {
    Player,
    Enemy,
    HealthPickup,
    Tooth,
}

impl HitboxKind {
    /// `(offset_x, offset_y, w, h)` of the hitbox relative to the entity's top-left.
    pub fn inset(self) -> (f32, f32, f32, f32) {
        let (ox, oy, w, h) = match self {
            HitboxKind::Player => (12.0, 10.0, 16.0, 20.0),
            HitboxKind::Enemy => (10.0, 12.0, 12.0, 16.0),
            HitboxKind::HealthPickup => (6.0, 6.0, 12.0, 12.0),
            HitboxKind::Tooth => (8.0, 8.0, 8.0, 12.0),
        };
        (
            ox * SPRITE_SCALE,
            oy * SPRITE_SCALE,
            w * SPRITE_SCALE,
            h * SPRITE_SCALE,
        )
    }
}

/// Map an entity's bounds to its kind-specific hitbox.
///
/// Only the origin of `bounds` matters; hitbox size comes from the kind table.
pub fn hitbox(bounds: &Rect, kind: HitboxKind) -> Rect {
    let (ox, oy, w, h) = kind.inset();
    Rect::new(bounds.x + ox, bounds.y + oy, w, h)
}

/// Overlap test between two entities' gameplay hitboxes.
pub fn hitbox_overlaps(a: &Rect, a_kind: HitboxKind, b: &Rect, b_kind: HitboxKind) -> bool {
    overlaps(&hitbox(a, a_kind), &hitbox(b, b_kind))
}
