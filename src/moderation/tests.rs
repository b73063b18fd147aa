use super::*;

#[test]
fn clean_text_passes_through() {
    let filter = ForbiddenWordFilter::default();
    let censored = filter.censor("any cafe discounts near city hall?");
    assert_eq!(censored, "any cafe discounts near city hall?");
    assert!(!ForbiddenWordFilter::is_rejected(&censored));
}

#[test]
fn builtin_word_is_replaced_with_sentinel() {
    let filter = ForbiddenWordFilter::default();
    let censored = filter.censor("best casino nearby");
    assert!(censored.contains(REJECTION_SENTINEL));
    assert!(ForbiddenWordFilter::is_rejected(&censored));
}

#[test]
fn matching_ignores_case_and_punctuation() {
    let filter = ForbiddenWordFilter::default();
    assert!(ForbiddenWordFilter::is_rejected(&filter.censor("CASINO!")));
    assert!(ForbiddenWordFilter::is_rejected(&filter.censor("(betting)")));
}

#[test]
fn substring_of_a_clean_word_is_not_matched() {
    // "scasinos" is not the token "casino"
    let filter = ForbiddenWordFilter::default();
    assert!(!ForbiddenWordFilter::is_rejected(
        &filter.censor("my favourite scasinos brand")
    ));
}

#[test]
fn extra_words_extend_the_builtin_list() {
    let filter = ForbiddenWordFilter::with_extra_words(&["crypto".to_string()]);
    assert!(ForbiddenWordFilter::is_rejected(
        &filter.censor("crypto cashback?")
    ));
    assert!(ForbiddenWordFilter::is_rejected(
        &filter.censor("lottery tickets")
    ));
}

#[test]
fn whitespace_is_normalized() {
    let filter = ForbiddenWordFilter::default();
    assert_eq!(filter.censor("two   words"), "two words");
}
