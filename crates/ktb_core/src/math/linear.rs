//! Closed-form 2×2 linear solver.

use crate::types::SolverError;

/// Determinants smaller than this in absolute value are treated as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Solves `A · x = b` for a 2×2 matrix using Cramer's rule.
///
/// `a` is given row-major: `[[a00, a01], [a10, a11]]`.
///
/// # Errors
///
/// - [`SolverError::NonFiniteInput`] if any coefficient is NaN or infinite
/// - [`SolverError::SingularMatrix`] if `|det(A)| < SINGULAR_TOLERANCE`
///
/// # Example
///
/// ```
/// use ktb_core::math::linear::solve_2x2;
///
/// // x + y = 3, x - y = 1
/// let [x, y] = solve_2x2([[1.0, 1.0], [1.0, -1.0]], [3.0, 1.0]).unwrap();
/// assert!((x - 2.0).abs() < 1e-12);
/// assert!((y - 1.0).abs() < 1e-12);
///
/// // Singular system
/// assert!(solve_2x2([[1.0, 1.0], [1.0, 1.0]], [1.0, 0.0]).is_err());
/// ```
pub fn solve_2x2(a: [[f64; 2]; 2], b: [f64; 2]) -> Result<[f64; 2], SolverError> {
    let coefficients = [a[0][0], a[0][1], a[1][0], a[1][1], b[0], b[1]];
    if let Some(bad) = coefficients.iter().find(|v| !v.is_finite()) {
        return Err(SolverError::NonFiniteInput(format!(
            "coefficient {} in system {:?} = {:?}",
            bad, a, b
        )));
    }

    let determinant = a[0][0] * a[1][1] - a[0][1] * a[1][0];
    if determinant.abs() < SINGULAR_TOLERANCE {
        return Err(SolverError::SingularMatrix { determinant });
    }

    let x0 = (b[0] * a[1][1] - a[0][1] * b[1]) / determinant;
    let x1 = (a[0][0] * b[1] - b[0] * a[1][0]) / determinant;
    Ok([x0, x1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity() {
        let [x, y] = solve_2x2([[1.0, 0.0], [0.0, 1.0]], [4.0, -2.0]).unwrap();
        assert_relative_eq!(x, 4.0);
        assert_relative_eq!(y, -2.0);
    }

    #[test]
    fn test_general_system() {
        // 2x + 3y = 8, 5x - y = 3  =>  x = 1, y = 2
        let [x, y] = solve_2x2([[2.0, 3.0], [5.0, -1.0]], [8.0, 3.0]).unwrap();
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let result = solve_2x2([[1.0, 1.0], [1.0, 1.0]], [5.0, 0.0]);
        assert!(matches!(result, Err(SolverError::SingularMatrix { .. })));
    }

    #[test]
    fn test_non_finite_input() {
        let result = solve_2x2([[1.0, 1.0], [f64::NAN, 1.0]], [5.0, 0.0]);
        assert!(matches!(result, Err(SolverError::NonFiniteInput(_))));

        let result = solve_2x2([[1.0, 1.0], [0.5, 1.0]], [f64::INFINITY, 0.0]);
        assert!(matches!(result, Err(SolverError::NonFiniteInput(_))));
    }
}
