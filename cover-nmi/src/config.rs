use crate::error::{NmiError, NmiResult};

pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Axis along which raw membership weights are rescaled by their maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// use `member_prob` as given
    None,
    /// divide by the largest weight within the same community
    #[default]
    PerCommunity,
    /// divide by the largest weight of the same node
    PerNode,
}

/// Arguments for one NMI evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmiConfig {
    /// graded membership (`true`) or thresholded set membership (`false`)
    pub weighted: bool,
    pub normalization: Normalization,
    /// membership cutoff in unweighted mode; ignored when `weighted`
    pub threshold: f64,
}

impl Default for NmiConfig {
    fn default() -> Self {
        Self {
            weighted: true,
            normalization: Normalization::PerCommunity,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl NmiConfig {
    /// Weighted estimator with the given normalization
    pub fn weighted(normalization: Normalization) -> Self {
        Self {
            weighted: true,
            normalization,
            ..Default::default()
        }
    }

    /// Unweighted estimator; raw weights `>= threshold` count as members
    pub fn unweighted(threshold: f64) -> Self {
        Self {
            weighted: false,
            normalization: Normalization::None,
            threshold,
        }
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// `normalize = true` selects the per-community axis
    pub fn with_normalize(self, normalize: bool) -> Self {
        self.with_normalization(if normalize {
            Normalization::PerCommunity
        } else {
            Normalization::None
        })
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> NmiResult<()> {
        if !self.weighted && !(0.0..=1.0).contains(&self.threshold) {
            return Err(NmiError::InvalidConfig(format!(
                "threshold {} is outside [0, 1]",
                self.threshold
            )));
        }
        Ok(())
    }
}
