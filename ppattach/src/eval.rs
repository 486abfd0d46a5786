//! Evaluation of predicted dependency trees on attachment samples.

use std::ops::AddAssign;

use crate::error::EvalError;
use crate::extract::Extractor;
use crate::sentence::Sentence;

/// Attachment accuracy counts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Evaluation {
    pub total: usize,
    pub correct: usize,
}

impl Evaluation {
    /// Fraction of samples whose preposition has the gold governor.
    ///
    /// Returns `0` when there are no samples.
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.;
        }

        self.correct as f32 / self.total as f32
    }
}

impl AddAssign for Evaluation {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.correct += other.correct;
    }
}

/// Evaluate the preposition attachments of a predicted sentence.
///
/// Samples are extracted from the gold sentence. A sample is correct
/// when the preposition has the same governor in both sentences.
/// Diagnostics are logged and do not count as samples.
pub fn evaluate(
    extractor: &Extractor<'_>,
    gold: &Sentence,
    pred: &Sentence,
) -> Result<Evaluation, EvalError> {
    if gold.len() != pred.len() {
        return Err(EvalError::LengthMismatch {
            gold: gold.len(),
            pred: pred.len(),
        });
    }

    let mut evaluation = Evaluation::default();
    for attachment in extractor.attachments(gold) {
        let attachment = match attachment {
            Ok(attachment) => attachment,
            Err(diagnostic) => {
                log::debug!("Skipping sample: {}", diagnostic);
                continue;
            }
        };

        let prep = attachment.position().prep();
        evaluation.total += 1;
        if gold.parent(prep) == pred.parent(prep) {
            evaluation.correct += 1;
        }
    }

    Ok(evaluation)
}
