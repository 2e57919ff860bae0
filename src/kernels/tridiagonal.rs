//! Householder tridiagonalisation of a real symmetric matrix (`tred2`)
//!
//! The classic EISPACK routine, traversing the column-major buffer so the
//! innermost loops run down columns. Only the lower triangle is read.

use crate::scalar::Real;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Reduces the symmetric `dim x dim` buffer to tridiagonal form
///
/// On return `d` holds the diagonal and `e[0..dim-1]` the sub-diagonal
/// (`e[k]` couples `k` and `k + 1`; `e[dim-1]` is zero). With
/// `accumulate` the buffer is overwritten by the orthogonal `Q` satisfying
/// `A = Q T Qᵀ`; without it the buffer is left as scratch.
///
/// # Example
///
/// ```
/// use rayo::kernels::tred2;
///
/// // already tridiagonal: [[2, 1, 0], [1, 2, 1], [0, 1, 2]]
/// let mut data = vec![2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0];
/// let mut d = vec![0.0; 3];
/// let mut e = vec![0.0; 3];
/// tred2(&mut data, 3, &mut d, &mut e, true);
///
/// let trace: f64 = d.iter().sum();
/// assert!((trace - 6.0).abs() < 1e-12);
/// assert_eq!(e[2], 0.0);
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip(data, d, e)))]
pub fn tred2<T: Real>(data: &mut [T], dim: usize, d: &mut [T], e: &mut [T], accumulate: bool) {
    let n = dim;
    if n == 0 {
        return;
    }
    let at = |row: usize, col: usize| row + col * n;

    for j in 0..n {
        d[j] = data[at(n - 1, j)].clone();
    }

    for i in (1..n).rev() {
        let mut scale = T::zero();
        let mut h = T::zero();
        for value in &d[..i] {
            scale += value.modulus();
        }

        if scale.is_zero() {
            e[i] = d[i - 1].clone();
            for j in 0..i {
                d[j] = data[at(i - 1, j)].clone();
                data[at(i, j)] = T::zero();
                data[at(j, i)] = T::zero();
            }
        } else {
            for value in &mut d[..i] {
                *value = value.clone() / scale.clone();
                h += value.clone() * value.clone();
            }
            let mut f = d[i - 1].clone();
            let mut g = h.sqrt();
            if f > T::zero() {
                g = -g;
            }
            e[i] = scale * g.clone();
            h -= f.clone() * g.clone();
            d[i - 1] = f - g;
            for value in &mut e[..i] {
                *value = T::zero();
            }

            // e = A d over the leading i x i block, lower triangle only
            for j in 0..i {
                f = d[j].clone();
                data[at(j, i)] = f.clone();
                g = e[j].clone() + data[at(j, j)].clone() * f.clone();
                for k in j + 1..i {
                    let v = data[at(k, j)].clone();
                    g += v.clone() * d[k].clone();
                    e[k] += v * f.clone();
                }
                e[j] = g;
            }

            f = T::zero();
            for j in 0..i {
                e[j] = e[j].clone() / h.clone();
                f += e[j].clone() * d[j].clone();
            }
            let hh = f / (h.clone() + h.clone());
            for j in 0..i {
                e[j] -= hh.clone() * d[j].clone();
            }

            for j in 0..i {
                let f = d[j].clone();
                let g = e[j].clone();
                for k in j..i {
                    data[at(k, j)] -= f.clone() * e[k].clone() + g.clone() * d[k].clone();
                }
                d[j] = data[at(i - 1, j)].clone();
                data[at(i, j)] = T::zero();
            }
        }
        d[i] = h;
    }

    if accumulate {
        for i in 0..n - 1 {
            data[at(n - 1, i)] = data[at(i, i)].clone();
            data[at(i, i)] = T::one();
            let h = d[i + 1].clone();
            if !h.is_zero() {
                for k in 0..=i {
                    d[k] = data[at(k, i + 1)].clone() / h.clone();
                }
                for j in 0..=i {
                    let mut g = T::zero();
                    for k in 0..=i {
                        g += data[at(k, i + 1)].clone() * data[at(k, j)].clone();
                    }
                    for k in 0..=i {
                        data[at(k, j)] -= g.clone() * d[k].clone();
                    }
                }
            }
            for k in 0..=i {
                data[at(k, i + 1)] = T::zero();
            }
        }
        for j in 0..n {
            d[j] = data[at(n - 1, j)].clone();
            data[at(n - 1, j)] = T::zero();
        }
        data[at(n - 1, n - 1)] = T::one();
    } else {
        for j in 0..n {
            d[j] = data[at(j, j)].clone();
        }
    }

    for i in 1..n {
        e[i - 1] = e[i].clone();
    }
    e[n - 1] = T::zero();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn symmetric(n: usize, seed: &[f64]) -> Vec<f64> {
        let mut a = vec![0.0; n * n];
        for j in 0..n {
            for i in j..n {
                a[i + j * n] = seed[i + j * n];
                a[j + i * n] = seed[i + j * n];
            }
        }
        a
    }

    /// Q T Qᵀ from the outputs of `tred2`
    fn rebuild(q: &[f64], d: &[f64], e: &[f64], n: usize) -> Vec<f64> {
        let mut t = vec![0.0; n * n];
        for k in 0..n {
            t[k + k * n] = d[k];
            if k + 1 < n {
                t[k + 1 + k * n] = e[k];
                t[k + (k + 1) * n] = e[k];
            }
        }
        let mut qt = vec![0.0; n * n];
        for j in 0..n {
            for i in 0..n {
                qt[i + j * n] = (0..n).map(|k| q[i + k * n] * t[k + j * n]).sum();
            }
        }
        let mut a = vec![0.0; n * n];
        for j in 0..n {
            for i in 0..n {
                a[i + j * n] = (0..n).map(|k| qt[i + k * n] * q[j + k * n]).sum();
            }
        }
        a
    }

    #[test]
    fn test_single_element() {
        let mut data = vec![4.0];
        let mut d = vec![0.0];
        let mut e = vec![9.0];
        tred2(&mut data, 1, &mut d, &mut e, true);
        assert_eq!(d, vec![4.0]);
        assert_eq!(e, vec![0.0]);
        assert_eq!(data, vec![1.0]);
    }

    #[test]
    fn test_diagonal_input_is_degenerate_every_step() {
        let mut data = vec![1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 3.0];
        let mut d = vec![0.0; 3];
        let mut e = vec![0.0; 3];
        tred2(&mut data, 3, &mut d, &mut e, true);
        assert_eq!(d, vec![1.0, 2.0, 3.0]);
        assert_eq!(e, vec![0.0; 3]);
    }

    #[test]
    fn test_upper_triangle_is_not_read() {
        let full = symmetric(4, &(0..16).map(|i| (i as f64 * 0.3).sin()).collect::<Vec<_>>());
        let mut lower_only = full.clone();
        for j in 1..4 {
            for i in 0..j {
                lower_only[i + j * 4] = f64::NAN;
            }
        }
        let (mut d1, mut e1) = (vec![0.0; 4], vec![0.0; 4]);
        let (mut d2, mut e2) = (vec![0.0; 4], vec![0.0; 4]);
        let mut a = full;
        tred2(&mut a, 4, &mut d1, &mut e1, false);
        tred2(&mut lower_only, 4, &mut d2, &mut e2, false);
        assert_eq!(d1, d2);
        assert_eq!(e1, e2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn test_reconstruction(
            n in 1usize..10,
            seed in proptest::collection::vec(-5.0f64..5.0, 81)
        ) {
            let a = symmetric(n, &seed);
            let mut q = a.clone();
            let mut d = vec![0.0; n];
            let mut e = vec![0.0; n];
            tred2(&mut q, n, &mut d, &mut e, true);

            let rebuilt = rebuild(&q, &d, &e, n);
            for (x, y) in rebuilt.iter().zip(&a) {
                prop_assert!((x - y).abs() < 1e-9);
            }

            // same tridiagonal with or without accumulation
            let mut scratch = a.clone();
            let mut d_only = vec![0.0; n];
            let mut e_only = vec![0.0; n];
            tred2(&mut scratch, n, &mut d_only, &mut e_only, false);
            prop_assert_eq!(d, d_only);
            prop_assert_eq!(e, e_only);
        }
    }
}
