//! Normalized conditional entropy of two covers (Lancichinetti,
//! Fortunato & Kertész 2009, appendix B).
//!
//! ```text
//! H(X_k | Y)  = min over feasible l of H(X_k, Y_l) - H(Y_l)
//! H(X | Y)    = mean_k H(X_k | Y) / H(X_k)
//! NMI         = 1 - [H(X | Y) + H(Y | X)] / 2
//! ```
//!
//! A pair `(k, l)` is feasible (B.14) when
//! `h(p11) + h(p00) >= h(p10) + h(p01)`.

use crate::entropy::binary_entropy;
use crate::error::{CoverSide, NmiError, NmiResult};
use crate::joint::JointDistribution;
use crate::progress::CancelToken;
use log::warn;
use ndarray::{ArrayView1, ArrayView2};

/// Whether `Y_l` can serve as a best match of `X_k`
#[inline]
pub fn is_feasible(p11: f64, p10: f64, p01: f64) -> bool {
    let p00 = 1.0 - p11 - (p10 + p01);
    binary_entropy(p11) + binary_entropy(p00) >= binary_entropy(p10) + binary_entropy(p01)
}

/// One direction of the symmetrized conditional entropy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalEntropy {
    /// mean normalized conditional entropy over the row communities
    pub value: f64,
    /// row communities without any feasible match
    pub unmatched: usize,
}

/// Both directions and the resulting NMI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub nmi: f64,
    pub cond_a: ConditionalEntropy,
    pub cond_b: ConditionalEntropy,
}

/// Normalized conditional entropy of the row cover given the column cover.
///
/// * `a_b`, `a_notb`, `nota_b` - joint masses, rows index the row cover
/// * `h_joint` - `H(k, l)`
/// * `h_rows`, `h_cols` - marginal entropies of the two covers
/// * `row_ids` - original community ids of the rows (for errors)
/// * `cancel` - checked before each row
#[allow(clippy::too_many_arguments)]
pub fn conditional_entropy(
    a_b: ArrayView2<f64>,
    a_notb: ArrayView2<f64>,
    nota_b: ArrayView2<f64>,
    h_joint: ArrayView2<f64>,
    h_rows: ArrayView1<f64>,
    h_cols: ArrayView1<f64>,
    side: CoverSide,
    row_ids: &[u64],
    cancel: &CancelToken,
) -> NmiResult<ConditionalEntropy> {
    let (kk, ll) = h_joint.dim();
    if kk == 0 {
        return Err(NmiError::EmptyCover { side });
    }

    let mut total = 0.0;
    let mut unmatched = 0;

    for k in 0..kk {
        cancel.check()?;
        let h_k = h_rows[k];
        if h_k <= 0.0 {
            return Err(NmiError::ZeroMarginal {
                side,
                community_id: row_ids[k],
            });
        }

        let best = (0..ll)
            .filter(|&l| is_feasible(a_b[[k, l]], a_notb[[k, l]], nota_b[[k, l]]))
            .map(|l| h_joint[[k, l]] - h_cols[l])
            .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |m| m.min(h))));

        match best {
            Some(h) => total += h / h_k,
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        warn!(
            "{} of {} communities in {} have no feasible match; counted as fully explained",
            unmatched, kk, side
        );
    }

    Ok(ConditionalEntropy {
        value: total / kk as f64,
        unmatched,
    })
}

/// Symmetrized LFK NMI from the joint masses and the entropies
pub fn aggregate(
    joint: &JointDistribution,
    h_kl: ArrayView2<f64>,
    h_k: ArrayView1<f64>,
    h_l: ArrayView1<f64>,
    ids_a: &[u64],
    ids_b: &[u64],
    cancel: &CancelToken,
) -> NmiResult<Aggregate> {
    let cond_a = conditional_entropy(
        joint.a_b.view(),
        joint.a_notb.view(),
        joint.nota_b.view(),
        h_kl,
        h_k,
        h_l,
        CoverSide::A,
        ids_a,
        cancel,
    )?;

    // the same computation with the roles of A and B swapped
    let cond_b = conditional_entropy(
        joint.a_b.t(),
        joint.nota_b.t(),
        joint.a_notb.t(),
        h_kl.t(),
        h_l,
        h_k,
        CoverSide::B,
        ids_b,
        cancel,
    )?;

    let nmi = (1.0 - (cond_a.value + cond_b.value) / 2.0).clamp(0.0, 1.0);

    Ok(Aggregate {
        nmi,
        cond_a,
        cond_b,
    })
}
