//! Pure gesture geometry: translate, rotate, 8-grip resize, and
//! proportional subtree scaling.
//!
//! Every function returns new geometry; the caller persists the result as
//! an Update event. Output dimensions never drop below the caller-supplied
//! minimum size — pass [`MIN_SIZE`] unless the host configures its own
//! floor.

use crate::model::Geometry;
use serde::{Deserialize, Serialize};

/// Default minimum node dimension, in canvas units.
pub const MIN_SIZE: f32 = 1.0;

// ─── Resize grips ────────────────────────────────────────────────────────

/// The eight resize grips around a selection: four edges and four corners.
///
/// Wire names are kebab-case (`"top-left"` etc.); an unknown grip name
/// fails to parse at the boundary, so the engine itself never sees an
/// unrecognized handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// How a grip drag treats the children of the resized node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    /// Edge grips resize one dimension; children keep their geometry.
    Constraint,
    /// Corner grips express proportional-scale intent; the caller should
    /// propagate the resize to descendants via [`scale_from_bounds`].
    Scale,
}

impl Handle {
    pub fn resize_mode(self) -> ResizeMode {
        match self {
            Self::Left | Self::Right | Self::Top | Self::Bottom => ResizeMode::Constraint,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight => {
                ResizeMode::Scale
            }
        }
    }

    fn moves_left_edge(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    fn moves_right_edge(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    fn moves_bottom_edge(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

// ─── Transforms ──────────────────────────────────────────────────────────

/// Shift a node by a pointer delta.
pub fn translate(geo: Geometry, dx: f32, dy: f32) -> Geometry {
    Geometry {
        x: geo.x + dx,
        y: geo.y + dy,
        ..geo
    }
}

/// Set the absolute rotation angle, in degrees.
pub fn rotate(geo: Geometry, angle_degrees: f32) -> Geometry {
    Geometry {
        rotation: angle_degrees,
        ..geo
    }
}

/// Bearing from `center` to `point`, in degrees. Converts a
/// rotation-handle drag position into the absolute angle for [`rotate`].
pub fn angle_between(center: (f32, f32), point: (f32, f32)) -> f32 {
    (point.1 - center.1).atan2(point.0 - center.0).to_degrees()
}

/// Apply a grip drag to a node's geometry.
///
/// Grips on the left/top move the origin so the opposite edge stays
/// anchored; right/bottom grips leave the origin in place. Corners
/// compose both edge behaviors. Dimensions are floored at `min_size`,
/// and the anchor holds even when the floor kicks in.
pub fn resize(geo: Geometry, handle: Handle, dx: f32, dy: f32, min_size: f32) -> Geometry {
    let mut out = geo;

    if handle.moves_left_edge() {
        let width = (geo.width - dx).max(min_size);
        out.x = geo.x + (geo.width - width);
        out.width = width;
    } else if handle.moves_right_edge() {
        out.width = (geo.width + dx).max(min_size);
    }

    if handle.moves_top_edge() {
        let height = (geo.height - dy).max(min_size);
        out.y = geo.y + (geo.height - height);
        out.height = height;
    } else if handle.moves_bottom_edge() {
        out.height = (geo.height + dy).max(min_size);
    }

    out
}

/// Map a child's geometry through its container's old → new bounds.
///
/// Used when a corner resize must scale the whole subtree: the child's
/// position follows the container origin affinely, its size scales by the
/// same factors. Degenerate old dimensions are guarded with a floor of 1
/// so the scale factors stay finite.
pub fn scale_from_bounds(child: Geometry, old: Geometry, new: Geometry, min_size: f32) -> Geometry {
    let sx = new.width / old.width.max(1.0);
    let sy = new.height / old.height.max(1.0);
    Geometry {
        x: new.x + (child.x - old.x) * sx,
        y: new.y + (child.y - old.y) * sy,
        width: (child.width * sx).max(min_size),
        height: (child.height * sy).max(min_size),
        rotation: child.rotation,
    }
}
