//! Evaluation metrics for predicted labels.

use core::fmt;

use crate::error::{LingoError, Result};

/// Fraction of predictions equal to the true label.
///
/// Returns 0.0 for empty input.
///
/// # Errors
///
/// `LingoError::LengthMismatch` if the slices differ in length.
pub fn accuracy<T, P>(y_true: &[T], y_pred: &[P]) -> Result<f64>
where
    T: AsRef<str>,
    P: AsRef<str>,
{
    check_lengths(y_true.len(), y_pred.len())?;
    if y_true.is_empty() {
        return Ok(0.0);
    }
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t.as_ref() == p.as_ref())
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Precision, recall and F1 of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    /// Class label.
    pub label: String,
    /// Correct predictions of this class over all predictions of it.
    pub precision: f64,
    /// Correct predictions of this class over all true samples of it.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Number of true samples of this class.
    pub support: usize,
}

/// Averaged precision, recall and F1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageMetrics {
    /// Mean precision over classes, unweighted or weighted by support.
    pub precision: f64,
    /// Mean recall over classes, unweighted or weighted by support.
    pub recall: f64,
    /// Mean F1 over classes, unweighted or weighted by support.
    pub f1: f64,
    /// Total number of samples.
    pub support: usize,
}

/// Per-class and averaged scores over a set of predictions.
///
/// Classes are the sorted union of true and predicted labels. A ratio with a
/// zero denominator scores 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    /// One entry per class, sorted by label.
    pub classes: Vec<ClassMetrics>,
    /// Overall accuracy.
    pub accuracy: f64,
    /// Unweighted mean over classes.
    pub macro_avg: AverageMetrics,
    /// Mean over classes weighted by support.
    pub weighted_avg: AverageMetrics,
}

impl ClassificationReport {
    /// Scores `y_pred` against `y_true`.
    pub fn new<T, P>(y_true: &[T], y_pred: &[P]) -> Result<Self>
    where
        T: AsRef<str>,
        P: AsRef<str>,
    {
        check_lengths(y_true.len(), y_pred.len())?;

        let mut labels: Vec<&str> = y_true
            .iter()
            .map(|t| t.as_ref())
            .chain(y_pred.iter().map(|p| p.as_ref()))
            .collect();
        labels.sort_unstable();
        labels.dedup();

        let k = labels.len();
        let mut true_pos = vec![0usize; k];
        let mut predicted = vec![0usize; k];
        let mut support = vec![0usize; k];
        let slot = |label: &str| {
            labels
                .binary_search_by(|entry| (**entry).cmp(label))
                .unwrap_or_default()
        };

        for (t, p) in y_true.iter().zip(y_pred) {
            let (t, p) = (slot(t.as_ref()), slot(p.as_ref()));
            support[t] += 1;
            predicted[p] += 1;
            if t == p {
                true_pos[t] += 1;
            }
        }

        let classes: Vec<ClassMetrics> = labels
            .iter()
            .enumerate()
            .map(|(c, label)| {
                let precision = ratio(true_pos[c], predicted[c]);
                let recall = ratio(true_pos[c], support[c]);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label: (*label).to_owned(),
                    precision,
                    recall,
                    f1,
                    support: support[c],
                }
            })
            .collect();

        let total = y_true.len();
        let macro_avg = average(&classes, |_| 1.0, total);
        let weighted_avg = average(&classes, |m| m.support as f64, total);

        Ok(Self {
            accuracy: accuracy(y_true, y_pred)?,
            classes,
            macro_avg,
            weighted_avg,
        })
    }

    /// Looks up the scores of one class.
    pub fn class(&self, label: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|m| m.label == label)
    }
}

fn check_lengths(truth: usize, pred: usize) -> Result<()> {
    if truth != pred {
        return Err(LingoError::LengthMismatch {
            texts: truth,
            labels: pred,
        });
    }
    Ok(())
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn average(
    classes: &[ClassMetrics],
    weight: impl Fn(&ClassMetrics) -> f64,
    support: usize,
) -> AverageMetrics {
    let total: f64 = classes.iter().map(&weight).sum();
    if total == 0.0 {
        return AverageMetrics {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
            support,
        };
    }
    let mean = |field: fn(&ClassMetrics) -> f64| {
        classes.iter().map(|m| weight(m) * field(m)).sum::<f64>() / total
    };
    AverageMetrics {
        precision: mean(|m| m.precision),
        recall: mean(|m| m.recall),
        f1: mean(|m| m.f1),
        support,
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LAST: &str = "weighted avg";
        let width = self
            .classes
            .iter()
            .map(|m| m.label.chars().count())
            .max()
            .unwrap_or(0)
            .max(LAST.len());

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for m in &self.classes {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                m.label, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        for (name, avg) in [("macro avg", &self.macro_avg), (LAST, &self.weighted_avg)] {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, avg.precision, avg.recall, avg.f1, avg.support
            )?;
        }
        Ok(())
    }
}
