//! Overlapping-cover NMI: membership tables → joint distribution →
//! entropies → normalized conditional entropy.

use crate::aggregate::aggregate;
use crate::config::{NmiConfig, Normalization};
use crate::cover::Cover;
use crate::entropy::{joint_entropies, marginal_entropies};
use crate::error::{CoverSide, NmiError, NmiResult};
use crate::joint::joint_distribution;
use crate::marginal::marginal;
use crate::membership::build_memberships;
use crate::progress::{CancelToken, NoProgress, ProgressObserver};
use log::info;
use serde::Serialize;

/// NMI together with the quantities it was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NmiReport {
    pub nmi: f64,
    /// normalized `H(A | B)`
    pub h_cond_a: f64,
    /// normalized `H(B | A)`
    pub h_cond_b: f64,
    pub num_nodes: usize,
    pub num_coms_a: usize,
    pub num_coms_b: usize,
    /// empty or universal communities removed before estimation
    pub dropped_a: usize,
    pub dropped_b: usize,
    /// communities whose best-match search found no feasible partner
    pub unmatched_a: usize,
    pub unmatched_b: usize,
}

/// Evaluates covers with a fixed configuration, observer and cancel token
pub struct NmiEvaluator<'a> {
    config: NmiConfig,
    observer: &'a dyn ProgressObserver,
    cancel: CancelToken,
}

impl Default for NmiEvaluator<'_> {
    fn default() -> Self {
        Self::new(NmiConfig::default())
    }
}

impl<'a> NmiEvaluator<'a> {
    pub fn new(config: NmiConfig) -> Self {
        Self {
            config,
            observer: &NoProgress,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &NmiConfig {
        &self.config
    }

    /// Compare cover `a` with cover `b`.
    ///
    /// If every community of both covers is empty or universal the
    /// covers are taken as identical (NMI 1). If only one of them has
    /// nothing left, the result is `EmptyCover`.
    pub fn evaluate(&self, a: &Cover, b: &Cover) -> NmiResult<NmiReport> {
        self.config.validate()?;
        self.cancel.check()?;

        let m = build_memberships(a, b, &self.config)?;

        let mut report = NmiReport {
            nmi: 1.0,
            h_cond_a: 0.0,
            h_cond_b: 0.0,
            num_nodes: m.num_nodes(),
            num_coms_a: m.a.num_communities(),
            num_coms_b: m.b.num_communities(),
            dropped_a: m.a.dropped().len(),
            dropped_b: m.b.dropped().len(),
            unmatched_a: 0,
            unmatched_b: 0,
        };

        match (m.a.is_empty(), m.b.is_empty()) {
            (true, true) => {
                info!("no informative community in either cover");
                return Ok(report);
            }
            (true, false) => return Err(NmiError::EmptyCover { side: CoverSide::A }),
            (false, true) => return Err(NmiError::EmptyCover { side: CoverSide::B }),
            (false, false) => {}
        }

        let joint = joint_distribution(&m.a, &m.b, self.observer, &self.cancel)?;

        let h_kl = joint_entropies(&joint, self.observer, &self.cancel)?;
        let h_k = marginal_entropies(&marginal(&m.a));
        let h_l = marginal_entropies(&marginal(&m.b));

        let agg = aggregate(
            &joint,
            h_kl.view(),
            h_k.view(),
            h_l.view(),
            &m.a.community_ids(),
            &m.b.community_ids(),
            &self.cancel,
        )?;

        report.nmi = agg.nmi;
        report.h_cond_a = agg.cond_a.value;
        report.h_cond_b = agg.cond_b.value;
        report.unmatched_a = agg.cond_a.unmatched;
        report.unmatched_b = agg.cond_b.unmatched;

        info!(
            "NMI = {:.6} (H(A|B) = {:.6}, H(B|A) = {:.6})",
            report.nmi, report.h_cond_a, report.h_cond_b
        );

        // an interrupt during the last stage still discards the result
        self.cancel.check()?;
        Ok(report)
    }
}

/// NMI between two covers
pub fn overlapping_nmi(a: &Cover, b: &Cover, config: &NmiConfig) -> NmiResult<f64> {
    Ok(NmiEvaluator::new(*config).evaluate(a, b)?.nmi)
}

/// NMI with graded memberships
pub fn weighted_overlapping(
    a: &Cover,
    b: &Cover,
    normalization: Normalization,
) -> NmiResult<f64> {
    overlapping_nmi(a, b, &NmiConfig::weighted(normalization))
}

/// NMI with memberships thresholded at `threshold`
pub fn unweighted_overlapping(a: &Cover, b: &Cover, threshold: f64) -> NmiResult<f64> {
    overlapping_nmi(a, b, &NmiConfig::unweighted(threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_one_sided_empty_cover() {
        // every community of b spans all nodes
        let a = Cover::from_pairs(vec![(0, 0), (1, 1)]).unwrap();
        let b = Cover::from_pairs(vec![(0, 0), (1, 0)]).unwrap();
        let err = overlapping_nmi(&a, &b, &NmiConfig::default()).unwrap_err();
        assert_eq!(err, NmiError::EmptyCover { side: CoverSide::B });

        let err = overlapping_nmi(&b, &a, &NmiConfig::default()).unwrap_err();
        assert_eq!(err, NmiError::EmptyCover { side: CoverSide::A });
    }

    #[test]
    fn test_both_empty_is_identical() {
        let a = Cover::from_pairs(vec![(0, 0), (1, 0)]).unwrap();
        let b = Cover::from_triplets(vec![(0, 3, 1.0), (1, 3, 1.0), (1, 4, 0.0)]).unwrap();
        let report = NmiEvaluator::default().evaluate(&a, &b).unwrap();
        assert_eq!(report.nmi, 1.0);
        assert_eq!(report.dropped_a, 1);
        assert_eq!(report.dropped_b, 2);
    }

    #[test]
    fn test_cancelled_before_start() {
        let a = Cover::from_pairs(vec![(0, 0), (1, 1)]).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let res = NmiEvaluator::default()
            .with_cancel_token(cancel)
            .evaluate(&a, &a);
        assert_eq!(res, Err(NmiError::Cancelled));
    }

    /// Cancels the evaluation once the joint entropies are done
    struct CancelAfterEntropy(CancelToken);

    impl ProgressObserver for CancelAfterEntropy {
        fn finish(&self, stage: crate::progress::Stage) {
            if stage == crate::progress::Stage::JointEntropy {
                self.0.cancel();
            }
        }
    }

    #[test]
    fn test_cancelled_during_aggregation() {
        let a = Cover::from_triplets(vec![(0, 0, 1.0), (0, 1, 0.75), (1, 1, 1.0)]).unwrap();
        let b = Cover::from_triplets(vec![(0, 0, 0.75), (0, 1, 0.5), (1, 0, 0.25), (1, 1, 0.75)])
            .unwrap();
        let cancel = CancelToken::new();
        let observer = CancelAfterEntropy(cancel.clone());

        let res = NmiEvaluator::default()
            .with_observer(&observer)
            .with_cancel_token(cancel)
            .evaluate(&a, &b);
        assert_eq!(res, Err(NmiError::Cancelled));
    }

    #[test]
    fn test_vanishing_membership_is_dropped() {
        let a = Cover::from_triplets(vec![(0, 0, 5e-324), (1, 1, 1.0)]).unwrap();
        let b = Cover::from_pairs(vec![(0, 0), (1, 1)]).unwrap();
        let report = NmiEvaluator::new(NmiConfig::weighted(Normalization::None))
            .evaluate(&a, &b)
            .unwrap();
        assert_eq!(report.dropped_a, 1);
        assert_eq!(report.num_coms_a, 1);
        assert!((0.0..=1.0).contains(&report.nmi));
    }

    #[test]
    fn test_invalid_threshold() {
        let a = Cover::from_pairs(vec![(0, 0), (1, 1)]).unwrap();
        assert!(matches!(
            unweighted_overlapping(&a, &a, -1.0),
            Err(NmiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_report_counts() {
        let a = Cover::from_triplets(vec![(0, 0, 1.0), (0, 1, 0.75), (1, 1, 1.0)]).unwrap();
        let b = Cover::from_triplets(vec![(0, 0, 0.75), (0, 1, 0.5), (1, 0, 0.25), (1, 1, 0.75)])
            .unwrap();
        let report = NmiEvaluator::new(NmiConfig::weighted(Normalization::None))
            .evaluate(&a, &b)
            .unwrap();
        assert_eq!(report.num_nodes, 2);
        assert_eq!(report.num_coms_a, 2);
        assert_eq!(report.num_coms_b, 2);
        assert_abs_diff_eq!(
            report.nmi,
            1.0 - (report.h_cond_a + report.h_cond_b) / 2.0,
            epsilon = 1e-12
        );
    }
}
