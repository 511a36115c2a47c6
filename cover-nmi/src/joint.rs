//! Pairwise joint membership masses between the communities of two covers.
//!
//! For community `k` of A and `l` of B, a node in both contributes
//! `min(w_a, w_b)` to `a_b` and the remainders to `a_notb`/`nota_b`;
//! a node in only one of them contributes its full weight to that
//! side. Summed over nodes this is
//!
//! ```text
//! a_b[k,l]    = S(k,l) / n
//! a_notb[k,l] = (mass_a[k] - S(k,l)) / n
//! nota_b[k,l] = (mass_b[l] - S(k,l)) / n
//! S(k,l)      = sum over shared nodes of min(w_a, w_b)
//! ```
//!
//! so only the shared nodes need to be visited. Each row `k` walks
//! the members of `k` and, through the reverse index of B, only the
//! communities those members belong to.

use crate::error::NmiResult;
use crate::membership::MembershipTable;
use crate::progress::{CancelToken, ProgressObserver, Stage};
use log::info;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;

/// `a_b`, `a_notb`, `nota_b` of shape `(num_coms_a, num_coms_b)`
#[derive(Debug, Clone, PartialEq)]
pub struct JointDistribution {
    pub a_b: Array2<f64>,
    pub a_notb: Array2<f64>,
    pub nota_b: Array2<f64>,
}

impl JointDistribution {
    pub fn new(a_b: Array2<f64>, a_notb: Array2<f64>, nota_b: Array2<f64>) -> Self {
        debug_assert_eq!(a_b.dim(), a_notb.dim());
        debug_assert_eq!(a_b.dim(), nota_b.dim());
        Self {
            a_b,
            a_notb,
            nota_b,
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.a_b.dim()
    }

    /// `(p11, p10, p01)` of the pair `(k, l)`
    #[inline]
    pub fn cell(&self, k: usize, l: usize) -> (f64, f64, f64) {
        (self.a_b[[k, l]], self.a_notb[[k, l]], self.nota_b[[k, l]])
    }
}

/// Estimate the joint distribution of every community pair.
///
/// Rows are computed in parallel. The cancellation token is checked
/// before each row; once cancelled the whole estimate is discarded.
pub fn joint_distribution(
    a: &MembershipTable,
    b: &MembershipTable,
    observer: &dyn ProgressObserver,
    cancel: &CancelToken,
) -> NmiResult<JointDistribution> {
    let num_nodes = a.num_nodes().max(b.num_nodes());
    let kk = a.num_communities();
    let ll = b.num_communities();

    info!("joint distribution over {} x {} community pairs", kk, ll);

    let stage = Stage::JointDistribution;
    observer.start(stage, kk as u64);

    let shared_rows = (0..kk)
        .into_par_iter()
        .map(|k| -> NmiResult<Vec<f64>> {
            cancel.check()?;
            let row = shared_mass_row(a, b, k);
            observer.advance(stage, 1);
            Ok(row)
        })
        .collect::<NmiResult<Vec<_>>>()?;

    observer.finish(stage);

    let mut shared = Array2::<f64>::zeros((kk, ll));
    for (k, row) in shared_rows.into_iter().enumerate() {
        shared.row_mut(k).assign(&ArrayView1::from(&row));
    }

    let n = num_nodes as f64;
    let mass_a = Array1::from(a.masses());
    let mass_b = Array1::from(b.masses());

    let mut a_notb = shared.mapv(|s| -s);
    a_notb += &mass_a.insert_axis(Axis(1));
    a_notb.mapv_inplace(|x| x.max(0.0) / n);

    let mut nota_b = shared.mapv(|s| -s);
    nota_b += &mass_b.insert_axis(Axis(0));
    nota_b.mapv_inplace(|x| x.max(0.0) / n);

    let a_b = shared / n;

    Ok(JointDistribution::new(a_b, a_notb, nota_b))
}

/// `S(k, l)` for all `l`: the shared `min(w_a, w_b)` mass of row `k`
fn shared_mass_row(a: &MembershipTable, b: &MembershipTable, k: usize) -> Vec<f64> {
    let mut row = vec![0.0; b.num_communities()];
    for &(node, w_a) in a.community(k).members.iter() {
        for &(l, w_b) in b.memberships_of(node) {
            row[l] += w_a.min(w_b);
        }
    }
    row
}

// consistency checks on the estimate
#[cfg(test)]
impl JointDistribution {
    /// Mass in neither community, `1 - a_b - a_notb - nota_b`
    pub fn nota_notb(&self) -> Array2<f64> {
        (1.0 - &self.a_b - &self.a_notb - &self.nota_b).mapv(|p| p.max(0.0))
    }

    /// The same distribution with the roles of A and B swapped
    pub fn transposed(&self) -> Self {
        Self {
            a_b: self.a_b.t().to_owned(),
            a_notb: self.nota_b.t().to_owned(),
            nota_b: self.a_notb.t().to_owned(),
        }
    }

    /// Marginal of A implied by column `l`: `a_b[:, l] + a_notb[:, l]`
    pub fn row_marginal(&self, l: usize) -> Array1<f64> {
        &self.a_b.column(l) + &self.a_notb.column(l)
    }

    /// Marginal of B implied by row `k`: `a_b[k, :] + nota_b[k, :]`
    pub fn column_marginal(&self, k: usize) -> Array1<f64> {
        &self.a_b.row(k) + &self.nota_b.row(k)
    }
}

/// Joint distribution by brute force over every node; reference for tests
#[cfg(test)]
pub(crate) fn joint_distribution_dense(
    a: &MembershipTable,
    b: &MembershipTable,
) -> JointDistribution {
    let n = a.num_nodes();
    let (kk, ll) = (a.num_communities(), b.num_communities());
    let mut a_b = Array2::<f64>::zeros((kk, ll));
    let mut a_notb = Array2::<f64>::zeros((kk, ll));
    let mut nota_b = Array2::<f64>::zeros((kk, ll));

    for node in 0..n {
        for k in 0..kk {
            let w_a = a.weight(node, k);
            for l in 0..ll {
                let w_b = b.weight(node, l);
                let m = w_a.min(w_b);
                a_b[[k, l]] += m;
                a_notb[[k, l]] += w_a - m;
                nota_b[[k, l]] += w_b - m;
            }
        }
    }

    let n = n as f64;
    JointDistribution::new(a_b / n, a_notb / n, nota_b / n)
}
