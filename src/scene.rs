//! Scene layout in normalized device coordinates.
//!
//! Slots are laid out left to right and centred on the origin, sized so the
//! whole row fits inside `[-EXTENT, EXTENT]`. The cage is a four-sided outline
//! around the row. At most [`MAX_DRAWN_SLOTS`] slots are drawn; any capacity
//! beyond that shows up as an overflow bar along the bottom of the cage.
//! Nothing here touches WebGL; the renderer uploads
//! [`SceneLayout::vertices`] as-is.

use crate::model::Element;

/// Half-width of the area the row of slots may use.
pub const EXTENT: f32 = 0.9;
/// Upper bound on slot pitch so a two-slot array does not fill the screen.
const MAX_PITCH: f32 = 0.4;
/// Fraction of the pitch taken by the gap between neighbouring slots.
const GAP: f32 = 0.12;
const CAGE_PAD: f32 = 0.03;
const CAGE_THICKNESS: f32 = 0.012;

/// Slots laid out individually; the rest of a larger capacity is summarized.
pub const MAX_DRAWN_SLOTS: usize = 256;

/// Floats per vertex: `x, y, r, g, b, a`.
pub const VERTEX_STRIDE: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub f32, pub f32, pub f32, pub f32);

impl Rgba {
    fn with_alpha(self, a: f32) -> Self {
        Rgba(self.0, self.1, self.2, a)
    }
}

const PALETTE: [Rgba; 6] = [
    Rgba(0.30, 0.69, 0.95, 1.0),
    Rgba(0.96, 0.62, 0.26, 1.0),
    Rgba(0.45, 0.83, 0.48, 1.0),
    Rgba(0.91, 0.38, 0.52, 1.0),
    Rgba(0.70, 0.55, 0.95, 1.0),
    Rgba(0.98, 0.86, 0.35, 1.0),
];
const EMPTY_SLOT: Rgba = Rgba(0.55, 0.58, 0.65, 0.30);
const CAGE: Rgba = Rgba(0.85, 0.87, 0.92, 0.9);
const OVERFLOW: Rgba = Rgba(0.85, 0.87, 0.92, 0.45);

/// Axis-aligned rectangle; `(x, y)` is the lower-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub color: Rgba,
}

impl Quad {
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y + self.h
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Quad) -> bool {
        other.x >= self.x && other.right() <= self.right() && other.y >= self.y && other.top() <= self.top()
    }
}

/// Per-axis scale that keeps square slots square on a `width` x `height`
/// canvas: the shorter side spans the full `[-1, 1]` range.
pub fn aspect_scale(width: f32, height: f32) -> (f32, f32) {
    if width <= 0.0 || height <= 0.0 {
        return (1.0, 1.0);
    }
    let m = width.min(height);
    (m / width, m / height)
}

/// Ease-out cubic over `[0, 1]`.
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Capacity animation started by a grow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: usize,
    pub to: usize,
    start_ms: f64,
    duration_ms: u32,
}

impl Tween {
    /// A tween that is already finished at `capacity`.
    pub fn settled(capacity: usize) -> Self {
        Self {
            from: capacity,
            to: capacity,
            start_ms: 0.0,
            duration_ms: 0,
        }
    }

    pub fn start(from: usize, to: usize, now_ms: f64, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            start_ms: now_ms,
            duration_ms,
        }
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (((now_ms - self.start_ms) / self.duration_ms as f64) as f32).clamp(0.0, 1.0)
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// Everything the renderer draws for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLayout {
    pub slots: Vec<Quad>,
    pub cage: [Option<Quad>; 4],
    /// Number of leading drawn slots holding a value.
    pub filled: usize,
    /// Capacity not drawn as individual slots.
    pub hidden: usize,
    /// Bar inside the cage marking `hidden > 0`.
    pub overflow: Option<Quad>,
}

impl SceneLayout {
    /// Lay out `capacity` slots with `values` filling the leading ones.
    ///
    /// While a grow animates from `from_capacity`, the cage width follows the
    /// eased capacity and the new trailing slots fade in. Pass `progress = 1`
    /// for the settled scene. Both capacities are clamped to
    /// [`MAX_DRAWN_SLOTS`] before layout.
    pub fn compute(values: &[Element], from_capacity: usize, capacity: usize, progress: f32) -> Self {
        if capacity == 0 {
            return Self::default();
        }
        let hidden = capacity.saturating_sub(MAX_DRAWN_SLOTS);
        let capacity = capacity.min(MAX_DRAWN_SLOTS);
        let from_capacity = from_capacity.min(capacity);

        let eased = ease_out(progress);
        let from = from_capacity as f32;
        let shown = from + (capacity as f32 - from) * eased;
        let shown = shown.max(1.0);

        let pitch = (2.0 * EXTENT / shown).min(MAX_PITCH);
        let size = pitch * (1.0 - GAP);
        let row_width = pitch * shown;
        let x0 = -row_width / 2.0;
        let y0 = -size / 2.0;

        let slots = (0..capacity)
            .map(|i| {
                let color = match values.get(i) {
                    Some(_) => PALETTE[i % PALETTE.len()],
                    None => EMPTY_SLOT,
                };
                let color = if i >= from_capacity {
                    color.with_alpha(color.3 * eased)
                } else {
                    color
                };
                Quad {
                    x: x0 + i as f32 * pitch + pitch * GAP / 2.0,
                    y: y0,
                    w: size,
                    h: size,
                    color,
                }
            })
            .collect();

        let left = x0 - CAGE_PAD;
        let bottom = y0 - CAGE_PAD;
        let w = row_width + 2.0 * CAGE_PAD;
        let h = size + 2.0 * CAGE_PAD;
        let t = CAGE_THICKNESS;
        let edge = |x, y, w, h| Some(Quad { x, y, w, h, color: CAGE });
        let cage = [
            edge(left - t, bottom - t, w + 2.0 * t, t),
            edge(left - t, bottom + h, w + 2.0 * t, t),
            edge(left - t, bottom, t, h),
            edge(left + w, bottom, t, h),
        ];

        let overflow = (hidden > 0).then(|| Quad {
            x: x0,
            y: bottom + CAGE_PAD * 0.25,
            w: row_width,
            h: CAGE_PAD * 0.5,
            color: OVERFLOW,
        });

        Self {
            slots,
            cage,
            filled: values.len().min(capacity),
            hidden,
            overflow,
        }
    }

    /// Outer bounds of the cage, if there is one.
    pub fn cage_bounds(&self) -> Option<Quad> {
        let [Some(bottom), Some(top), _, _] = self.cage else {
            return None;
        };
        Some(Quad {
            x: bottom.x,
            y: bottom.y,
            w: bottom.w,
            h: top.top() - bottom.y,
            color: CAGE,
        })
    }

    /// Two triangles per quad, cage drawn last so it sits on top.
    pub fn vertices(&self) -> Vec<f32> {
        let quads = self
            .slots
            .iter()
            .chain(self.overflow.iter())
            .chain(self.cage.iter().flatten());
        let mut out = Vec::with_capacity((self.slots.len() + 5) * 6 * VERTEX_STRIDE);
        for q in quads {
            let Rgba(r, g, b, a) = q.color;
            let (x1, y1, x2, y2) = (q.x, q.y, q.right(), q.top());
            for (x, y) in [(x1, y1), (x2, y1), (x2, y2), (x1, y1), (x2, y2), (x1, y2)] {
                out.extend_from_slice(&[x, y, r, g, b, a]);
            }
        }
        out
    }
}
