use itertools::Itertools;
use rand::Rng;

use crate::decode::decode_entities;
use crate::error::QuizError;
use crate::provider::RawQuestion;

pub const MIN_OPTIONS: usize = 2;

/// A question ready for display: decoded text and options in their final order.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: String,
    pub selected_option: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl Question {
    /// Build a question from its wire record, decoding entities and shuffling the options.
    pub fn from_raw<R: Rng + ?Sized>(raw: RawQuestion, rng: &mut R) -> Result<Self, QuizError> {
        let text = decode_entities(&raw.question).into_owned();
        if text.trim().is_empty() {
            return Err(QuizError::DataFormat("question text is empty".into()));
        }

        let correct_option = decode_entities(&raw.correct_answer).into_owned();
        let mut options = raw
            .incorrect_answers
            .iter()
            .map(|answer| decode_entities(answer).into_owned())
            .collect::<Vec<String>>();
        options.push(correct_option.clone());

        if options.len() < MIN_OPTIONS {
            return Err(QuizError::DataFormat(format!(
                "expected at least {MIN_OPTIONS} options, got {}",
                options.len()
            )));
        }
        if !options.iter().all_unique() {
            return Err(QuizError::DataFormat(format!(
                "duplicate options for question {text:?}"
            )));
        }

        shuffle(&mut options, rng);

        Ok(Self {
            text,
            options,
            correct_option,
            selected_option: None,
            category: raw.category.map(|c| decode_entities(&c).into_owned()),
            difficulty: raw.difficulty,
        })
    }

    pub fn is_answered(&self) -> bool {
        self.selected_option.is_some()
    }

    pub fn is_correct(&self) -> bool {
        self.selected_option.as_deref() == Some(self.correct_option.as_str())
    }
}

/// Build every question in a batch; one bad record fails the whole batch.
pub fn build_questions<R: Rng + ?Sized>(
    raw: Vec<RawQuestion>,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    if raw.is_empty() {
        return Err(QuizError::DataFormat("no questions returned".into()));
    }
    raw.into_iter()
        .map(|record| Question::from_raw(record, rng))
        .collect()
}

/// In-place Fisher-Yates: walk from the last index down, swapping each slot
/// with a uniformly chosen slot at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    fn raw(question: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
        RawQuestion {
            question: question.to_string(),
            incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.to_string(),
            category: Some("Science &amp; Nature".to_string()),
            difficulty: Some("medium".to_string()),
        }
    }

    #[test]
    fn test_shuffle_keeps_every_element() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut items = vec![1, 2, 3, 4, 5, 6, 7, 8];
        shuffle(&mut items, &mut rng);

        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_shuffle_is_not_constant() {
        let mut rng = StdRng::seed_from_u64(42);
        let orderings: HashSet<Vec<u8>> = (0..50)
            .map(|_| {
                let mut items = vec![0u8, 1, 2, 3];
                shuffle(&mut items, &mut rng);
                items
            })
            .collect();
        assert!(orderings.len() > 1);
    }

    #[test]
    fn test_shuffle_covers_all_permutations() {
        let mut rng = StdRng::seed_from_u64(1);
        let orderings: HashSet<Vec<u8>> = (0..600)
            .map(|_| {
                let mut items = vec![0u8, 1, 2];
                shuffle(&mut items, &mut rng);
                items
            })
            .collect();
        assert_eq!(orderings.len(), 6);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut empty: Vec<u8> = vec![];
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut single = vec![9];
        shuffle(&mut single, &mut rng);
        assert_eq!(single, vec![9]);
    }

    #[test]
    fn test_from_raw_decodes_and_contains_correct_option() {
        let mut rng = StdRng::seed_from_u64(11);
        let question = Question::from_raw(
            raw(
                "Which is &quot;red&quot;?",
                "Mars",
                &["Venus", "Jupiter", "Saturn"],
            ),
            &mut rng,
        )
        .unwrap();

        assert_eq!(question.text, "Which is \"red\"?");
        assert_eq!(question.options.len(), 4);
        assert!(question.options.contains(&question.correct_option));
        assert!(question.options.iter().all_unique());
        assert_eq!(question.selected_option, None);
        assert_eq!(question.category.as_deref(), Some("Science & Nature"));
        assert_eq!(question.difficulty.as_deref(), Some("medium"));
    }

    #[test]
    fn test_from_raw_decodes_options() {
        let mut rng = StdRng::seed_from_u64(5);
        let question =
            Question::from_raw(raw("Q", "Rock &amp; Roll", &["Jazz", "Blues"]), &mut rng).unwrap();
        assert_eq!(question.correct_option, "Rock & Roll");
        assert!(question.options.contains(&"Rock & Roll".to_string()));
    }

    #[test]
    fn test_from_raw_rejects_too_few_options() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_matches!(
            Question::from_raw(raw("Q", "A", &[]), &mut rng),
            Err(QuizError::DataFormat(_))
        );
    }

    #[test]
    fn test_from_raw_rejects_duplicate_options() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_matches!(
            Question::from_raw(raw("Q", "A", &["B", "A", "C"]), &mut rng),
            Err(QuizError::DataFormat(_))
        );
    }

    #[test]
    fn test_from_raw_rejects_duplicates_after_decoding() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_matches!(
            Question::from_raw(raw("Q", "A&amp;B", &["A&B", "C"]), &mut rng),
            Err(QuizError::DataFormat(_))
        );
    }

    #[test]
    fn test_from_raw_rejects_empty_text() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_matches!(
            Question::from_raw(raw("  ", "A", &["B"]), &mut rng),
            Err(QuizError::DataFormat(_))
        );
    }

    #[test]
    fn test_is_correct() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut question = Question::from_raw(raw("Q", "A", &["B", "C"]), &mut rng).unwrap();
        assert!(!question.is_answered());
        assert!(!question.is_correct());

        question.selected_option = Some("B".into());
        assert!(question.is_answered());
        assert!(!question.is_correct());

        question.selected_option = Some("A".into());
        assert!(question.is_correct());
    }

    #[test]
    fn test_build_questions_preserves_count_and_order() {
        let mut rng = StdRng::seed_from_u64(9);
        let questions = build_questions(
            vec![
                raw("First", "1", &["2", "3", "4"]),
                raw("Second", "5", &["6", "7", "8"]),
            ],
            &mut rng,
        )
        .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].text, "First");
        assert_eq!(questions[1].text, "Second");
    }

    #[test]
    fn test_build_questions_empty_batch() {
        let mut rng = StdRng::seed_from_u64(9);
        assert_matches!(
            build_questions(vec![], &mut rng),
            Err(QuizError::DataFormat(_))
        );
    }

    #[test]
    fn test_build_questions_one_bad_record_fails_batch() {
        let mut rng = StdRng::seed_from_u64(9);
        assert_matches!(
            build_questions(
                vec![raw("Good", "1", &["2"]), raw("Bad", "1", &["1"])],
                &mut rng
            ),
            Err(QuizError::DataFormat(_))
        );
    }
}
