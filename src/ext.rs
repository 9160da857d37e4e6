use nalgebra::{Complex, Dim, Matrix, RawStorage};

/// Builds a `Complex<f32>` from cartesian parts,
/// `cart!(re)` leaves the imaginary part at zero
#[macro_export]
macro_rules! cart {
    ($re:expr) => {
        ::nalgebra::Complex::<f32>::new($re, 0.0)
    };
    ($re:expr, $im:expr) => {
        ::nalgebra::Complex::<f32>::new($re, $im)
    };
}

/// True if `lhs` and `rhs` are within `margin` of each other
/// in the complex plane
pub fn equal_c(lhs: Complex<f32>, rhs: Complex<f32>, margin: f32) -> bool {
    (lhs - rhs).norm() <= margin.abs()
}

/// Compares complex elements using `equal_c`
///
/// Matrices of different shape are never equal
pub fn equal_to_matrix_c<R1, C1, S1, R2, C2, S2>(
    lhs: &Matrix<Complex<f32>, R1, C1, S1>,
    rhs: &Matrix<Complex<f32>, R2, C2, S2>,
    margin: f32,
) -> bool
where
    R1: Dim,
    C1: Dim,
    S1: RawStorage<Complex<f32>, R1, C1>,
    R2: Dim,
    C2: Dim,
    S2: RawStorage<Complex<f32>, R2, C2>,
{
    lhs.shape() == rhs.shape()
        && lhs
            .iter()
            .zip(rhs.iter())
            .all(|(l, r)| equal_c(*l, *r, margin))
}

/// Formats a basis index as a bitstring with the highest qubit first
pub fn bitstring(index: usize, n_qubits: usize) -> String {
    format!("{:0width$b}", index, width = n_qubits)
}
