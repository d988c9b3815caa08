use proptest::prelude::*;
use spam_rs::classifier::mock::MockClassifier;
use spam_rs::normalize::{is_normalized, normalize};
use spam_rs::Predictor;
use std::sync::Arc;

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC*") {
        let once = normalize(&s);
        let twice = normalize(&once);
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn normalize_output_is_lowercase_letters_and_single_spaces(s in ".*") {
        let out = normalize(&s);
        prop_assert!(is_normalized(&out), "not normalized: {:?}", out);
    }

    #[test]
    fn normalize_keeps_ascii_words(words in prop::collection::vec("[a-zA-Z]{1,8}", 0..8), sep in "[ \t\n]{1,3}") {
        let input = words.join(&sep);
        let expected = words.join(" ").to_lowercase();
        prop_assert_eq!(normalize(&input), expected);
    }

    #[test]
    fn letterless_input_is_ham_with_full_confidence(s in "[0-9 !?.,$%\t\n]*") {
        let mock = Arc::new(MockClassifier::fixed(0.99));
        let predictor = Predictor::new(mock.clone());

        let result = predictor.predict(&s);
        prop_assert_eq!(result.label(), "Ham");
        prop_assert_eq!(result.confidence(), 1.0);
        prop_assert_eq!(result.normalized_text.as_str(), "");
        prop_assert_eq!(mock.calls(), 0);
    }

    #[test]
    fn degraded_predictor_always_errors(s in ".*") {
        let predictor = Predictor::unavailable("no model");
        let result = predictor.predict(&s);
        prop_assert!(result.is_error());
        prop_assert_eq!(result.confidence(), 0.0);
        prop_assert_eq!(result.normalized_text.as_str(), "");
    }

    #[test]
    fn confidence_is_mass_of_returned_label(p_spam in 0.0f64..=1.0) {
        let predictor = Predictor::new(Arc::new(MockClassifier::fixed(p_spam)));
        let result = predictor.predict("some message text");

        let expected = if p_spam > 1.0 - p_spam { p_spam } else { 1.0 - p_spam };
        prop_assert_eq!(result.confidence(), expected);
        prop_assert!(result.confidence() >= 0.5);
    }
}
