//! Similarity transforms on the plane.

use crate::{Result, Sim2Error, io};
use approx::{AbsDiffEq, RelativeEq};
use nalgebra::{DMatrix, Matrix2, Matrix3, Vector2};
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Mul, path::Path};

/// A transform between two planar coordinate frames consisting of a
/// rotation, a translation and a uniform scaling.
///
/// Applying the transform maps points expressed in the source frame to
/// their coordinates in the destination frame. The rotation matrix is
/// trusted to be a proper rotation (orthonormal with determinant +1);
/// it is never validated or normalized.
///
/// The equivalent 3x3 homogeneous matrix
///
/// ```text
/// [ R   t ]
/// [ 0  1/s]
/// ```
///
/// is precomputed at construction and used for batched point
/// transformation and matrix conversion.
#[derive(Clone, Debug)]
pub struct Sim2 {
    rotation: Matrix2<f64>,
    translation: Vector2<f64>,
    scale: f64,
    matrix: Matrix3<f64>,
}

/// Flat on-disk form of a [`Sim2`]: the rotation matrix flattened in
/// row-major order, the translation and the scale factor.
#[derive(Serialize, Deserialize)]
struct Sim2Record {
    #[serde(rename = "R")]
    rotation: [f64; 4],
    #[serde(rename = "t")]
    translation: [f64; 2],
    #[serde(rename = "s", default)]
    scale: f64,
}

impl Sim2 {
    /// Creates the similarity transform consisting of the given rotation,
    /// translation and uniform scaling.
    ///
    /// # Errors
    /// Returns [`Sim2Error::ZeroScale`] if `scale` is zero, since the
    /// homogeneous matrix stores the reciprocal of the scale factor.
    pub fn new(rotation: Matrix2<f64>, translation: Vector2<f64>, scale: f64) -> Result<Self> {
        if scale == 0.0 {
            return Err(Sim2Error::ZeroScale);
        }
        Ok(Self::from_validated_parts(rotation, translation, scale))
    }

    /// Creates the identity transform.
    pub fn identity() -> Self {
        Self::from_validated_parts(Matrix2::identity(), Vector2::zeros(), 1.0)
    }

    /// Decomposes the given 3x3 homogeneous matrix into a similarity
    /// transform: the rotation is the top-left 2x2 block, the translation
    /// the top-right 2x1 block and the scale the reciprocal of the
    /// bottom-right cell.
    ///
    /// # Errors
    /// Returns [`Sim2Error::ZeroScale`] if the bottom-right cell is zero.
    pub fn from_matrix(matrix: &Matrix3<f64>) -> Result<Self> {
        if matrix[(2, 2)] == 0.0 {
            return Err(Sim2Error::ZeroScale);
        }
        Self::new(
            matrix.fixed_view::<2, 2>(0, 0).into_owned(),
            matrix.fixed_view::<2, 1>(0, 2).into_owned(),
            matrix[(2, 2)].recip(),
        )
    }

    /// Reads a similarity transform from the JSON file at the given path.
    ///
    /// The file must hold a flat object with the rotation matrix flattened
    /// row-major under `R`, the translation under `t` and the scale factor
    /// under `s`. Integer and floating-point numbers are both accepted.
    ///
    /// # Errors
    /// Returns [`Sim2Error::ZeroScale`] if the scale value is zero or
    /// missing, and the IO error variants if the file cannot be read or
    /// parsed.
    pub fn from_json(file_path: impl AsRef<Path>) -> Result<Self> {
        let record: Sim2Record = io::parse_json_file(file_path)?;
        let [r00, r01, r10, r11] = record.rotation;
        let [tx, ty] = record.translation;
        Self::new(
            Matrix2::new(r00, r01, r10, r11),
            Vector2::new(tx, ty),
            record.scale,
        )
    }

    /// Writes the transform to the given path as a flat JSON object with
    /// the same three keys accepted by [`Self::from_json`].
    pub fn save_as_json(&self, file_path: impl AsRef<Path>) -> Result<()> {
        let record = Sim2Record {
            rotation: [
                self.rotation[(0, 0)],
                self.rotation[(0, 1)],
                self.rotation[(1, 0)],
                self.rotation[(1, 1)],
            ],
            translation: [self.translation.x, self.translation.y],
            scale: self.scale,
        };
        io::write_json_file(&record, file_path)
    }

    fn from_validated_parts(rotation: Matrix2<f64>, translation: Vector2<f64>, scale: f64) -> Self {
        let mut matrix = Matrix3::identity();
        matrix.fixed_view_mut::<2, 2>(0, 0).copy_from(&rotation);
        matrix.fixed_view_mut::<2, 1>(0, 2).copy_from(&translation);
        matrix[(2, 2)] = scale.recip();
        Self {
            rotation,
            translation,
            scale,
            matrix,
        }
    }

    /// The rotational part of the transform.
    pub fn rotation(&self) -> &Matrix2<f64> {
        &self.rotation
    }

    /// The translational part of the transform, expressed in
    /// destination-frame units.
    pub fn translation(&self) -> &Vector2<f64> {
        &self.translation
    }

    /// The uniform scale factor of the transform.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The 3x3 homogeneous matrix form of the transform.
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// The rotation angle in degrees, in the range [-180, 180].
    pub fn theta_deg(&self) -> f64 {
        self.rotation[(1, 0)]
            .atan2(self.rotation[(0, 0)])
            .to_degrees()
    }

    /// Composes this transform with the given one: if `self` maps frame
    /// `b` to frame `a` and `other` maps frame `c` to frame `b`, the
    /// result maps frame `c` directly to frame `a`.
    ///
    /// The composition multiplies the homogeneous matrices and decomposes
    /// the product back into its parts.
    pub fn compose(&self, other: &Self) -> Self {
        let matrix = self.matrix * other.matrix;
        Self {
            rotation: matrix.fixed_view::<2, 2>(0, 0).into_owned(),
            translation: matrix.fixed_view::<2, 1>(0, 2).into_owned(),
            scale: matrix[(2, 2)].recip(),
            matrix,
        }
    }

    /// Computes the transform mapping the destination frame back to the
    /// source frame.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.transpose();
        let translation = -(rotation * self.translation) * self.scale;
        Self::from_validated_parts(rotation, translation, self.scale.recip())
    }

    /// Transforms a batch of 2D points expressed in the source frame into
    /// their coordinates in the destination frame.
    ///
    /// The points must be laid out one per row, as an N x 2 matrix. The
    /// points are homogenized, multiplied through the homogeneous matrix
    /// in a single batched product and projected back to 2D by dividing
    /// with the homogeneous coordinate.
    ///
    /// # Errors
    /// Returns [`Sim2Error::InvalidPointLayout`] if the input does not
    /// have exactly two columns; a bare coordinate pair must be passed as
    /// a 1 x 2 matrix.
    pub fn transform_from(&self, points: &DMatrix<f64>) -> Result<DMatrix<f64>> {
        if points.ncols() != 2 {
            return Err(Sim2Error::InvalidPointLayout {
                nrows: points.nrows(),
                ncols: points.ncols(),
            });
        }

        let homogeneous = points.transpose().insert_row(2, 1.0);
        let projected = self.matrix * homogeneous;

        let mut transformed = DMatrix::zeros(points.nrows(), 2);
        for j in 0..points.nrows() {
            let w = projected[(2, j)];
            transformed[(j, 0)] = projected[(0, j)] / w;
            transformed[(j, 1)] = projected[(1, j)] / w;
        }
        Ok(transformed)
    }
}

impl Default for Sim2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl PartialEq for Sim2 {
    fn eq(&self, other: &Self) -> bool {
        self.rotation == other.rotation
            && self.translation == other.translation
            && self.scale == other.scale
    }
}

impl Mul for Sim2 {
    type Output = Sim2;

    fn mul(self, rhs: Sim2) -> Sim2 {
        self.compose(&rhs)
    }
}

impl Mul for &Sim2 {
    type Output = Sim2;

    fn mul(self, rhs: &Sim2) -> Sim2 {
        self.compose(rhs)
    }
}

impl fmt::Display for Sim2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Angle (deg.): {:.1}, Trans.: [{}, {}], Scale: {}",
            self.theta_deg(),
            self.translation.x,
            self.translation.y,
            self.scale
        )
    }
}

impl AbsDiffEq for Sim2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rotation.abs_diff_eq(&other.rotation, epsilon)
            && self.translation.abs_diff_eq(&other.translation, epsilon)
            && self.scale.abs_diff_eq(&other.scale, epsilon)
    }
}

impl RelativeEq for Sim2 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.rotation
            .relative_eq(&other.rotation, epsilon, max_relative)
            && self
                .translation
                .relative_eq(&other.translation, epsilon, max_relative)
            && self.scale.relative_eq(&other.scale, epsilon, max_relative)
    }
}
