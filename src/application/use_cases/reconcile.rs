// ============================================================
// ROW RECONCILER
// ============================================================
// Merge provider answers back onto lead rows by phone key

use crate::domain::lead::{RowSet, ValidationOutcomes, ValidationResult};
use crate::domain::phone::PhoneNormalizer;
use crate::domain::search::ValidationAnswer;

/// Key each provider answer with the same normalizer used for the rows,
/// so `e164` and `raw` answers land on the same key. Answers without
/// digits are dropped.
pub fn normalize_answers(
    answers: &[ValidationAnswer],
    normalizer: &PhoneNormalizer,
) -> Vec<ValidationResult> {
    answers
        .iter()
        .filter_map(|answer| {
            normalizer
                .normalize(&answer.number)
                .map(|phone_key| ValidationResult {
                    phone_key,
                    status: answer.status,
                })
        })
        .collect()
}

/// Build the key → status lookup. When a key repeats, the last answer wins.
pub fn build_outcomes(
    answers: &[ValidationAnswer],
    normalizer: &PhoneNormalizer,
) -> ValidationOutcomes {
    normalize_answers(answers, normalizer)
        .into_iter()
        .map(|result| (result.phone_key, result.status))
        .collect()
}

/// Apply `outcomes` to `rows`, returning a new row set.
///
/// Same length, same order. A row whose key has an answer takes that
/// status; every other row keeps the status it had. Answers matching no
/// row are ignored.
pub fn reconcile(rows: &RowSet, outcomes: &ValidationOutcomes) -> RowSet {
    rows.iter()
        .map(|row| {
            match row.phone_key().and_then(|key| outcomes.get(key)) {
                Some(status) => row.clone().with_validation_status((*status).into()),
                None => row.clone(),
            }
        })
        .collect()
}

/// Number of rows in `rows` that have an answer in `outcomes`.
pub fn matched_rows(rows: &RowSet, outcomes: &ValidationOutcomes) -> usize {
    rows.iter()
        .filter(|row| row.phone_key().is_some_and(|key| outcomes.contains_key(key)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::lead::{LeadRow, ResultStatus, ValidationStatus};

    fn answer(number: &str, status: ResultStatus) -> ValidationAnswer {
        ValidationAnswer {
            number: number.to_string(),
            status,
        }
    }

    fn rows() -> RowSet {
        let n = PhoneNormalizer::default();
        RowSet::new(vec![
            LeadRow::new("Padaria X", "(41) 99999-0000", &n),
            LeadRow::new("Mercado Y", "41988887777", &n),
            LeadRow::new("Sem fone", "", &n),
            LeadRow::new("Padaria X filial", "+55 41 99999 0000", &n),
            LeadRow::new("Antigo", "11 97777-6666", &n)
                .with_validation_status(ValidationStatus::Invalid),
        ])
    }

    #[test]
    fn test_keys_from_both_number_forms_match() {
        let outcomes = build_outcomes(
            &[
                answer("+5541999990000", ResultStatus::Valid),
                answer("41 98888-7777", ResultStatus::Invalid),
                answer("", ResultStatus::Valid),
            ],
            &PhoneNormalizer::default(),
        );
        assert_eq!(outcomes.len(), 2);

        let merged = reconcile(&rows(), &outcomes);
        assert_eq!(merged.rows()[0].validation_status(), ValidationStatus::Valid);
        assert_eq!(merged.rows()[1].validation_status(), ValidationStatus::Invalid);
    }

    #[test]
    fn test_unmatched_rows_keep_prior_status() {
        let input = rows();
        let outcomes = build_outcomes(
            &[answer("+5541999990000", ResultStatus::Valid)],
            &PhoneNormalizer::default(),
        );
        let merged = reconcile(&input, &outcomes);

        for (before, after) in input.iter().zip(merged.iter()) {
            if before.phone_key().map(|k| k.as_str()) != Some("+5541999990000") {
                assert_eq!(after, before);
            }
        }
        assert_eq!(merged.rows()[4].validation_status(), ValidationStatus::Invalid);
        assert_eq!(merged.rows()[2].validation_status(), ValidationStatus::Unvalidated);
    }

    #[test]
    fn test_duplicate_keys_each_receive_the_answer() {
        let outcomes = build_outcomes(
            &[answer("+5541999990000", ResultStatus::Valid)],
            &PhoneNormalizer::default(),
        );
        let merged = reconcile(&rows(), &outcomes);

        assert_eq!(merged.rows()[0].validation_status(), ValidationStatus::Valid);
        assert_eq!(merged.rows()[3].validation_status(), ValidationStatus::Valid);
        assert_eq!(matched_rows(&rows(), &outcomes), 2);
    }

    #[test]
    fn test_answers_for_unknown_numbers_are_ignored() {
        let input = rows();
        let outcomes = build_outcomes(
            &[answer("+14155550100", ResultStatus::Valid)],
            &PhoneNormalizer::default(),
        );
        assert_eq!(reconcile(&input, &outcomes), input);
        assert_eq!(matched_rows(&input, &outcomes), 0);
    }

    #[test]
    fn test_answers_are_keyed_like_rows() {
        let results = normalize_answers(
            &[
                answer("41 98888-7777", ResultStatus::Invalid),
                answer("sem numero", ResultStatus::Valid),
            ],
            &PhoneNormalizer::default(),
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].phone_key.as_str(), "+5541988887777");
        assert_eq!(results[0].status, ResultStatus::Invalid);
    }

    #[test]
    fn test_later_answer_wins_for_repeated_key() {
        let outcomes = build_outcomes(
            &[
                answer("+5541999990000", ResultStatus::Unknown),
                answer("41999990000", ResultStatus::Valid),
            ],
            &PhoneNormalizer::default(),
        );
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes.values().next(), Some(&ResultStatus::Valid));
    }
}
