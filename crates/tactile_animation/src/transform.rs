//! Transform composition
//!
//! A [`TransformComposer`] binds an ordered list of transform operations
//! to shared values. Composing reads every bound value exactly once, in
//! declaration order, and produces a [`TransformSnapshot`] for the view.
//! The order is part of the result: translate-then-rotate is not the same
//! transform as rotate-then-translate.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::values::{ValueId, ValueStore};

/// Unit of a rotation entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    Degrees,
    Radians,
}

/// A single operation in a view's transform list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformOp {
    TranslateX,
    TranslateY,
    RotateX(AngleUnit),
    RotateY(AngleUnit),
    RotateZ(AngleUnit),
    Scale,
    /// Layout width (style entry, not part of the matrix)
    Width,
    /// Shadow elevation (style entry, not part of the matrix)
    Elevation,
    /// Opacity (style entry, not part of the matrix)
    Opacity,
}

impl TransformOp {
    /// Value that leaves the view unchanged
    pub fn identity(&self) -> f64 {
        match self {
            TransformOp::Scale | TransformOp::Opacity => 1.0,
            _ => 0.0,
        }
    }

    /// Whether this entry contributes to the geometric matrix
    pub fn is_geometric(&self) -> bool {
        !matches!(
            self,
            TransformOp::Width | TransformOp::Elevation | TransformOp::Opacity
        )
    }
}

/// One resolved entry of a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TransformEntry {
    pub op: TransformOp,
    pub value: f64,
}

impl TransformEntry {
    /// Rotation angle in radians, or `None` for non-rotation entries
    pub fn radians(&self) -> Option<f64> {
        match self.op {
            TransformOp::RotateX(unit) | TransformOp::RotateY(unit) | TransformOp::RotateZ(unit) => {
                Some(match unit {
                    AngleUnit::Degrees => self.value.to_radians(),
                    AngleUnit::Radians => self.value,
                })
            }
            _ => None,
        }
    }
}

/// Ordered transform of one view at one instant
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransformSnapshot {
    entries: SmallVec<[TransformEntry; 8]>,
}

impl TransformSnapshot {
    pub fn entries(&self) -> &[TransformEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformEntry> {
        self.entries.iter()
    }

    /// Operations in snapshot order
    pub fn ops(&self) -> impl Iterator<Item = TransformOp> + '_ {
        self.entries.iter().map(|entry| entry.op)
    }

    /// Value of the first entry with the given operation
    pub fn get(&self, op: TransformOp) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.op == op)
            .map(|entry| entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compose the geometric entries into a single matrix
    ///
    /// Entries are multiplied left to right, so the last entry is applied
    /// to a point first, matching how view transform lists behave.
    pub fn to_matrix(&self) -> Mat4 {
        self.entries
            .iter()
            .filter(|entry| entry.op.is_geometric())
            .fold(Mat4::IDENTITY, |acc, entry| {
                let m = match entry.op {
                    TransformOp::TranslateX => Mat4::translation(entry.value, 0.0, 0.0),
                    TransformOp::TranslateY => Mat4::translation(0.0, entry.value, 0.0),
                    TransformOp::RotateX(_) => Mat4::rotation_x(entry.radians().unwrap_or(0.0)),
                    TransformOp::RotateY(_) => Mat4::rotation_y(entry.radians().unwrap_or(0.0)),
                    TransformOp::RotateZ(_) => Mat4::rotation_z(entry.radians().unwrap_or(0.0)),
                    TransformOp::Scale => Mat4::scale(entry.value),
                    _ => Mat4::IDENTITY,
                };
                acc.mul(&m)
            })
    }
}

/// Declared transform order for one view
#[derive(Clone, Debug, Default)]
pub struct TransformComposer {
    bindings: SmallVec<[(TransformOp, ValueId); 8]>,
}

impl TransformComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation sourced from `value` (builder pattern)
    pub fn with(mut self, op: TransformOp, value: ValueId) -> Self {
        self.bindings.push((op, value));
        self
    }

    pub fn push(&mut self, op: TransformOp, value: ValueId) {
        self.bindings.push((op, value));
    }

    pub fn bindings(&self) -> &[(TransformOp, ValueId)] {
        &self.bindings
    }

    /// Read every bound value once, in order
    ///
    /// A handle whose value was removed resolves to the operation's
    /// identity so the view stays renderable.
    pub fn compose(&self, values: &ValueStore) -> TransformSnapshot {
        let entries = self
            .bindings
            .iter()
            .map(|&(op, id)| {
                let value = values.current(id).unwrap_or_else(|| {
                    tracing::warn!("compose: value {:#x} was removed", id.to_raw());
                    op.identity()
                });
                TransformEntry { op, value }
            })
            .collect();
        TransformSnapshot { entries }
    }
}

/// Column-vector 4x4 matrix
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4(pub [[f64; 4]; 4]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.0[0][3] = x;
        m.0[1][3] = y;
        m.0[2][3] = z;
        m
    }

    /// Uniform scale in x and y
    pub fn scale(s: f64) -> Self {
        let mut m = Self::IDENTITY;
        m.0[0][0] = s;
        m.0[1][1] = s;
        m
    }

    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut out = [[0.0; 4]; 4];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.0[i][k] * other.0[k][j]).sum();
            }
        }
        Mat4(out)
    }

    /// Transform a point (w = 1)
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let v = [p[0], p[1], p[2], 1.0];
        let mut out = [0.0; 3];
        for (i, cell) in out.iter_mut().enumerate() {
            *cell = (0..4).map(|k| self.0[i][k] * v[k]).sum();
        }
        out
    }
}
