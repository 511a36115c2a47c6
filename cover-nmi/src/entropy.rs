//! Shannon entropies (in bits) of the joint and marginal membership
//! distributions. Terms with zero probability contribute nothing.

use crate::error::NmiResult;
use crate::joint::JointDistribution;
use crate::progress::{CancelToken, ProgressObserver, Stage};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;

/// `-p log2(p)`, and 0 for `p <= 0`
#[inline]
pub fn entropy_term(p: f64) -> f64 {
    if p > 0.0 {
        -p * p.log2()
    } else {
        0.0
    }
}

/// `-p log2(p) - (1-p) log2(1-p)`
#[inline]
pub fn binary_entropy(p: f64) -> f64 {
    entropy_term(p) + entropy_term(1.0 - p)
}

/// Entropy of the four outcomes `{11, 10, 01, 00}` with `p00 = 1 - p11 - p10 - p01`
#[inline]
pub fn joint_entropy(p11: f64, p10: f64, p01: f64) -> f64 {
    // symmetric in (p10, p01) down to the last bit
    let p00 = 1.0 - p11 - (p10 + p01);
    entropy_term(p11) + (entropy_term(p10) + entropy_term(p01)) + entropy_term(p00)
}

/// `H(k, l)` for every community pair
pub fn joint_entropies(
    joint: &JointDistribution,
    observer: &dyn ProgressObserver,
    cancel: &CancelToken,
) -> NmiResult<Array2<f64>> {
    let (kk, ll) = joint.dim();

    let stage = Stage::JointEntropy;
    observer.start(stage, kk as u64);

    let rows = (0..kk)
        .into_par_iter()
        .map(|k| -> NmiResult<Vec<f64>> {
            cancel.check()?;
            let row = (0..ll)
                .map(|l| {
                    let (p11, p10, p01) = joint.cell(k, l);
                    joint_entropy(p11, p10, p01)
                })
                .collect();
            observer.advance(stage, 1);
            Ok(row)
        })
        .collect::<NmiResult<Vec<_>>>()?;

    observer.finish(stage);

    let mut h_kl = Array2::<f64>::zeros((kk, ll));
    for (k, row) in rows.into_iter().enumerate() {
        h_kl.row_mut(k).assign(&ArrayView1::from(&row));
    }
    Ok(h_kl)
}

/// Binary entropy of each marginal probability
pub fn marginal_entropies(p: &Array1<f64>) -> Array1<f64> {
    p.mapv(binary_entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn log2(x: f64) -> f64 {
        x.log2()
    }

    #[test]
    fn test_zero_probability_convention() {
        assert_eq!(entropy_term(0.0), 0.0);
        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert_abs_diff_eq!(binary_entropy(0.5), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(joint_entropy(0.25, 0.25, 0.25), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(joint_entropy(0.5, 0.0, 0.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_joint_entropy_fixture() {
        let joint = JointDistribution::new(
            array![[0.375, 0.25], [0.5, 0.625]],
            array![[0.125, 0.25], [0.375, 0.25]],
            array![[0.125, 0.375], [0.0, 0.0]],
        );
        let h_kl = joint_entropies(&joint, &NoProgress, &CancelToken::new()).unwrap();

        let expected = array![
            [3.0 - 0.75 * log2(3.0), 2.5 - 0.375 * log2(3.0)],
            [2.0 - 0.375 * log2(3.0), 2.75 - 0.625 * log2(5.0)]
        ];
        assert_abs_diff_eq!(h_kl, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_marginal_entropy_fixture() {
        let h_k = marginal_entropies(&array![0.5, 0.875]);
        assert_abs_diff_eq!(h_k, array![1.0, 3.0 - 0.875 * log2(7.0)], epsilon = 1e-12);
    }

    #[test]
    fn test_cancelled() {
        let joint = JointDistribution::new(
            array![[0.5]],
            array![[0.0]],
            array![[0.0]],
        );
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(joint_entropies(&joint, &NoProgress, &cancel).is_err());
    }
}
