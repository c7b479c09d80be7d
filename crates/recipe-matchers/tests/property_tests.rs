//! Property tests for the match rule

use std::sync::Arc;

use proptest::prelude::*;
use recipe_core::{Action, Ledger, Resource};
use recipe_matchers::ResourceMatcher;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn recorded(resource_type: &str, name: &str, action: &str) -> Ledger {
    let resource = Resource::builder(resource_type, name)
        .action(action)
        .build()
        .unwrap();
    let mut ledger = Ledger::new();
    ledger.record(Arc::new(resource), Action::new(action));
    ledger
}

proptest! {
    #[test]
    fn every_word_of_a_composite_action_matches(words in prop::collection::vec(word(), 1..4)) {
        let action = words.join("_");
        let ledger = recorded("widget", "w", &action);
        let entry = ledger.all().next().unwrap();

        for word in &words {
            prop_assert!(ResourceMatcher::new(word.as_str(), "widget").matches_entry(entry, "w"));
        }
        prop_assert!(ResourceMatcher::new(action.as_str(), "widget").matches_entry(entry, "w"));
    }

    #[test]
    fn words_outside_the_action_never_match(words in prop::collection::vec(word(), 1..4), other in word()) {
        prop_assume!(!words.contains(&other));
        let action = words.join("_");
        prop_assume!(action != other);
        let ledger = recorded("widget", "w", &action);
        let entry = ledger.all().next().unwrap();

        prop_assert!(!ResourceMatcher::new(other.as_str(), "widget").matches_entry(entry, "w"));
    }

    #[test]
    fn names_must_be_equal(name in "[a-z./-]{1,12}", other in "[a-z./-]{1,12}") {
        prop_assume!(name != other);
        let ledger = recorded("file", &name, "create");
        let entry = ledger.all().next().unwrap();

        prop_assert!(ResourceMatcher::new("create", "file").matches_entry(entry, &name));
        prop_assert!(!ResourceMatcher::new("create", "file").matches_entry(entry, &other));
    }

    #[test]
    fn templates_only_specialize_file_creation(action in prop::sample::select(vec!["delete", "touch", "create_if_missing"])) {
        let ledger = recorded("template", "t", action);
        let entry = ledger.all().next().unwrap();

        prop_assert!(!ResourceMatcher::new(action, "file").matches_entry(entry, "t"));
    }
}
