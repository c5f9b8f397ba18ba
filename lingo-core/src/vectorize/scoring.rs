//! TF-IDF weighting.

use crate::vectorize::types::FittedVectorizer;
use lingo_types::Norm;

/// Inverse document frequency of a term seen in `df` of `n` documents.
///
/// Smoothed: `ln((1 + n) / (1 + df)) + 1`, as if one extra document held
/// every term. Unsmoothed: `ln(n / df) + 1`. Both are at least 1 for
/// `df <= n`, so no fitted term ever weighs zero.
#[inline]
pub(crate) fn idf_weight(n: usize, df: usize, smooth: bool) -> f64 {
    let (n, df) = (n as f64, df as f64);
    if smooth {
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    } else {
        (n / df).ln() + 1.0
    }
}

impl FittedVectorizer {
    /// Turns `(feature index, raw count)` pairs into normalized weights.
    #[inline]
    pub(crate) fn weigh(&self, counts: &[(u32, u32)]) -> Vec<(u32, f64)> {
        let sublinear = self.config.sublinear_tf;
        let mut weights: Vec<(u32, f64)> = counts
            .iter()
            .map(|&(i, count)| {
                let tf = if sublinear {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (i, tf * self.idf[i as usize])
            })
            .collect();

        if self.config.norm == Norm::L2 {
            l2_normalize(&mut weights);
        }
        weights
    }
}

/// Scales weights to unit Euclidean length. A zero row stays zero.
#[inline]
fn l2_normalize(weights: &mut [(u32, f64)]) {
    let norm = weights.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in weights.iter_mut() {
            *w /= norm;
        }
    }
}
