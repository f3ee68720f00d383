//! Property-based tests for search pass invariants.
//!
//! Tests validate:
//! 1. An item matches iff the query is empty or found case-insensitively in its text
//! 2. Repeating a search yields the same matched set
//! 3. reset() leaves the same state as search("")
//! 4. has_matches agrees with match_count, and exactly one outcome hook fires per pass

use proptest::prelude::*;
use searchify::config::{MatchMethod, Options};
use searchify::model::{Document, ElementId, ItemList, ItemSpec};
use searchify::state::Searchify;
use std::cell::Cell;
use std::rc::Rc;

fn item_texts() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 ]{0,12}", 0..12)
}

fn query() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9]{0,3}"
}

fn match_method() -> impl Strategy<Value = MatchMethod> {
    prop_oneof![Just(MatchMethod::InPlace), Just(MatchMethod::Duplicate)]
}

fn bind(texts: &[String], options: Options) -> (Document, Searchify) {
    let items: Vec<ItemSpec> = texts.iter().map(ItemSpec::new).collect();
    let ItemList {
        mut document,
        container,
    } = ItemList::build(&items).unwrap();
    let ctl = Searchify::bind(&mut document, container, options).unwrap();
    (document, ctl)
}

fn matched_texts(doc: &Document, ids: &[ElementId]) -> Vec<String> {
    ids.iter().map(|id| doc.text_content(*id)).collect()
}

// ===== Property 1: Case-Insensitive Partition =====

proptest! {
    #[test]
    fn matches_are_case_insensitive_substrings(
        texts in item_texts(),
        query in query(),
        method in match_method(),
    ) {
        let (mut doc, mut ctl) = bind(&texts, Options::default().match_method(method));
        ctl.search(&mut doc, &query).unwrap();

        let needle = query.to_lowercase();
        let expected: Vec<String> = texts
            .iter()
            .filter(|text| text.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        prop_assert_eq!(matched_texts(&doc, ctl.matches()), expected);
    }

    #[test]
    fn in_place_marks_exactly_the_matches(texts in item_texts(), query in query()) {
        let (mut doc, mut ctl) = bind(&texts, Options::default());
        ctl.search(&mut doc, &query).unwrap();

        for item in ctl.items() {
            let marked = doc.has_class(*item, "searchify-match");
            prop_assert_eq!(marked, ctl.matches().contains(item));
        }
    }
}

// ===== Property 2: Idempotence =====

proptest! {
    #[test]
    fn repeated_search_is_idempotent(
        texts in item_texts(),
        query in query(),
        method in match_method(),
    ) {
        let (mut doc, mut ctl) = bind(&texts, Options::default().match_method(method));

        ctl.search(&mut doc, &query).unwrap();
        let first = matched_texts(&doc, ctl.matches());
        let first_html = doc.outer_html(doc.root());

        ctl.search(&mut doc, &query).unwrap();
        prop_assert_eq!(matched_texts(&doc, ctl.matches()), first);
        prop_assert_eq!(doc.outer_html(doc.root()), first_html);
    }
}

// ===== Property 3: Reset =====

proptest! {
    #[test]
    fn reset_equals_empty_search(
        texts in item_texts(),
        query in query(),
        method in match_method(),
    ) {
        let options = Options::default().match_method(method);

        let (mut reset_doc, mut reset_ctl) = bind(&texts, options.clone());
        reset_ctl.search(&mut reset_doc, &query).unwrap();
        reset_ctl.reset(&mut reset_doc).unwrap();

        let (mut search_doc, mut search_ctl) = bind(&texts, options);
        search_ctl.search(&mut search_doc, &query).unwrap();
        search_ctl.search(&mut search_doc, "").unwrap();

        prop_assert_eq!(reset_ctl.query(), "");
        prop_assert_eq!(reset_ctl.match_count(), texts.len());
        prop_assert_eq!(
            reset_doc.outer_html(reset_doc.root()),
            search_doc.outer_html(search_doc.root())
        );
    }
}

// ===== Property 4: Outcome Consistency =====

proptest! {
    #[test]
    fn exactly_one_outcome_hook_per_pass(texts in item_texts(), queries in prop::collection::vec(query(), 1..5)) {
        let matched = Rc::new(Cell::new(0usize));
        let unmatched = Rc::new(Cell::new(0usize));
        let (on_matched, on_unmatched) = (Rc::clone(&matched), Rc::clone(&unmatched));
        let options = Options::default()
            .on_matches(move |_, _, _, _| {
                on_matched.set(on_matched.get() + 1);
                Ok(())
            })
            .on_no_matches(move |_, _, _| {
                on_unmatched.set(on_unmatched.get() + 1);
                Ok(())
            });
        let (mut doc, mut ctl) = bind(&texts, options);

        for query in &queries {
            let (before_matched, before_unmatched) = (matched.get(), unmatched.get());
            ctl.search(&mut doc, query).unwrap();

            prop_assert_eq!(ctl.has_matches(), ctl.match_count() > 0);
            let fired = (matched.get() - before_matched) + (unmatched.get() - before_unmatched);
            prop_assert_eq!(fired, 1);
            prop_assert_eq!(matched.get() > before_matched, ctl.has_matches());
        }
    }
}
