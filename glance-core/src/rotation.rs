/// Arbitrary-axis rotation matrices built from an orthonormal change of basis
use nalgebra::{Matrix4, Vector3 as NaVector3};

use crate::vector::Vector3;

/// Rotation by `angle` radians around `axis`, right-hand rule.
///
/// The axis is moved onto X by the change of basis `M` (rows `u, v, w`),
/// rotated there with the elementary X rotation and moved back with `Mᵀ`:
/// `R = Mᵀ · Rx(angle) · M`.
///
/// `axis` need not be unit length but must not be zero.
pub fn rotation_matrix(axis: Vector3, angle: f32) -> Matrix4<f32> {
    let (u, v, w) = orthonormal_basis(axis);

    #[rustfmt::skip]
    let m = Matrix4::new(
        u.x, u.y, u.z, 0.0,
        v.x, v.y, v.z, 0.0,
        w.x, w.y, w.z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );

    // Orthonormal rows, so the inverse is the transpose
    let m_inverse = m.transpose();

    let (sine, cosine) = angle.sin_cos();

    #[rustfmt::skip]
    let rx = Matrix4::new(
        1.0, 0.0,    0.0,     0.0,
        0.0, cosine, -sine,   0.0,
        0.0, sine,   cosine,  0.0,
        0.0, 0.0,    0.0,     1.0,
    );

    m_inverse * rx * m
}

/// Same as [`rotation_matrix`] with the angle given in degrees.
pub fn rotation_matrix_degrees(axis: Vector3, degrees: f32) -> Matrix4<f32> {
    rotation_matrix(axis, degrees.to_radians())
}

/// Right-handed orthonormal basis `(u, v, w)` with `u` along `axis`.
///
/// `v` is seeded from a vector guaranteed not to be parallel to `u`, then
/// corrected to be exactly orthogonal once `w` is known.
pub fn orthonormal_basis(axis: Vector3) -> (Vector3, Vector3, Vector3) {
    let u = axis.normalized();
    let v = u.generate_differently_directed_vector().normalized();
    let w = u.cross(&v).normalized();
    let v = w.cross(&u).normalized();
    (u, v, w)
}

/// Apply a homogeneous matrix to a direction (`w = 0`).
pub fn transform_direction(matrix: &Matrix4<f32>, direction: Vector3) -> Vector3 {
    matrix
        .transform_vector(&NaVector3::from(direction))
        .into()
}

/// Apply a homogeneous matrix to a point (`w = 1`).
pub fn transform_point(matrix: &Matrix4<f32>, point: Vector3) -> Vector3 {
    matrix.transform_point(&point.to_point()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    fn axes() -> Vec<Vector3> {
        vec![
            Vector3::X,
            Vector3::Y,
            Vector3::Z,
            -Vector3::Y,
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.3, -2.0, 0.7),
            Vector3::new(-5.0, 0.0, 0.01),
        ]
    }

    fn angles() -> Vec<f32> {
        vec![0.0, 0.5_f32.to_radians(), 0.3, -1.2, FRAC_PI_2, PI, 4.0]
    }

    fn assert_vec_eq(a: Vector3, b: Vector3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-4);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn test_basis_is_orthonormal_and_right_handed() {
        for axis in axes() {
            let (u, v, w) = orthonormal_basis(axis);
            assert_abs_diff_eq!(u.norm(), 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(v.norm(), 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(w.norm(), 1.0, epsilon = EPSILON);
            assert_abs_diff_eq!(u.dot(&v), 0.0, epsilon = EPSILON);
            assert_abs_diff_eq!(u.dot(&w), 0.0, epsilon = EPSILON);
            assert_abs_diff_eq!(v.dot(&w), 0.0, epsilon = EPSILON);
            assert_vec_eq(u.cross(&v), w);
        }
    }

    #[test]
    fn test_zero_angle_is_identity() {
        for axis in axes() {
            let m = rotation_matrix(axis, 0.0);
            assert_relative_eq!(m, Matrix4::identity(), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_right_hand_rule_about_z() {
        let m = rotation_matrix(Vector3::Z, FRAC_PI_2);
        assert_vec_eq(transform_direction(&m, Vector3::X), Vector3::Y);
        assert_vec_eq(transform_direction(&m, Vector3::Y), -Vector3::X);
    }

    #[test]
    fn test_matches_nalgebra_axis_angle() {
        for axis in axes() {
            for angle in angles() {
                let ours = rotation_matrix(axis, angle);
                let reference = Matrix4::from_axis_angle(
                    &nalgebra::Unit::new_normalize(NaVector3::from(axis)),
                    angle,
                );
                assert_relative_eq!(ours, reference, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_result_is_orthogonal() {
        for axis in axes() {
            for angle in angles() {
                let m = rotation_matrix(axis, angle);
                assert_relative_eq!(m * m.transpose(), Matrix4::identity(), epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_rotation_preserves_norm() {
        let v = Vector3::new(2.0, -1.0, 0.5);
        for axis in axes() {
            for angle in angles() {
                let rotated = transform_direction(&rotation_matrix(axis, angle), v);
                assert_abs_diff_eq!(rotated.norm(), v.norm(), epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_rotations_about_same_axis_compose_additively() {
        let v = Vector3::new(0.4, 1.5, -2.0);
        let pairs = [(0.3, 0.5), (-1.0, 2.5), (FRAC_PI_2, FRAC_PI_2), (0.01, -0.02)];

        for axis in axes() {
            for (first, second) in pairs {
                let twice = transform_direction(
                    &rotation_matrix(axis, second),
                    transform_direction(&rotation_matrix(axis, first), v),
                );
                let once = transform_direction(&rotation_matrix(axis, first + second), v);
                assert_vec_eq(twice, once);
            }
        }
    }

    #[test]
    fn test_axis_is_fixed() {
        for axis in axes() {
            let rotated = transform_direction(&rotation_matrix(axis, 1.1), axis);
            assert_vec_eq(rotated, axis);
        }
    }

    #[test]
    fn test_degrees_entry_point() {
        let m = rotation_matrix_degrees(Vector3::Z, 90.0);
        assert_vec_eq(transform_point(&m, Vector3::new(2.0, 0.0, 0.0)), Vector3::new(0.0, 2.0, 0.0));
    }
}
