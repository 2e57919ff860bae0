//! In-place, index-driven kernels over column-major buffers
//!
//! Every kernel takes a flat buffer plus its row dimension
//! (`value(i, j) = data[i + j * row_dim]`) and half-open index ranges.
//! Kernels never allocate or resize the buffers they are given; index
//! validity is the caller's contract and is only checked by slice bounds.
//!
//! Kernels with a parallel implementation take a [`DispatchConfig`] and
//! split their outer range across rayon workers once it exceeds the
//! primitive's threshold.
//!
//! [`DispatchConfig`]: crate::DispatchConfig

mod axpy;
mod copy;
mod dot;
mod householder;
mod multiply;
mod rank2;
mod rotate;
mod substitute;
mod symv;
mod tridiagonal;

pub use axpy::{axpy, axpy_column, axpy_row, subtract_scaled};
pub use copy::{conjugate_transpose, copy_column, copy_row, fill, fill_columns, transpose};
pub use dot::{dot, dot_conjugated, dot_strided};
pub use householder::{
    generate_apply_and_copy_column, generate_apply_and_copy_row, householder_hermitian,
    householder_left, householder_right, Householder,
};
pub use multiply::{multiply, multiply_both, multiply_left};
pub use rank2::{rank2_update, rank2_update_parallel};
pub use rotate::{rotate_columns, rotate_rows, Rotation};
pub use substitute::{substitute_backwards, substitute_forwards, SubstitutionOptions};
pub use symv::{symmetric_matrix_vector, symmetric_matrix_vector_parallel};
pub use tridiagonal::tred2;
