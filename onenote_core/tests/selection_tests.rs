use onenote_core::selection::{pick_by_name_or_id, PickOptions, Selection};
use serde_json::{json, Value};

fn notebooks() -> Vec<Value> {
    vec![
        json!({"id": "1-abc", "displayName": "Work"}),
        json!({"id": "1-def", "displayName": "Work Journal"}),
        json!({"id": "1-ghi", "displayName": "Recipes"}),
    ]
}

#[test]
fn test_exact_name_beats_partial_matches() {
    // "work" matches "Work" exactly and "Work Journal" as a substring;
    // the exact tier must win before substrings are considered.
    let action = pick_by_name_or_id(&notebooks(), Some("work"), PickOptions::default());
    match action {
        Selection::Selected(v) => assert_eq!(v["id"], "1-abc"),
        other => panic!("expected a selection, got {:?}", other),
    }
}

#[test]
fn test_single_partial_match_selects() {
    let action = pick_by_name_or_id(&notebooks(), Some("recip"), PickOptions::default());
    match action {
        Selection::Selected(v) => assert_eq!(v["displayName"], "Recipes"),
        other => panic!("expected a selection, got {:?}", other),
    }
}

#[test]
fn test_multiple_partial_matches_are_ambiguous() {
    let action = pick_by_name_or_id(&notebooks(), Some("wor"), PickOptions::default());
    match action {
        Selection::Ambiguous(candidates) => {
            assert_eq!(candidates.len(), 2);
            assert_eq!(candidates[0]["id"], "1-abc");
            assert_eq!(candidates[1]["id"], "1-def");
        }
        other => panic!("expected ambiguity, got {:?}", other),
    }
}

#[test]
fn test_duplicate_exact_names_are_ambiguous() {
    let items = vec![
        json!({"id": "a", "displayName": "Personal"}),
        json!({"id": "b", "displayName": "personal"}),
    ];
    let action = pick_by_name_or_id(&items, Some("Personal"), PickOptions::default());
    match action {
        Selection::Ambiguous(candidates) => assert_eq!(candidates.len(), 2),
        other => panic!("expected ambiguity, got {:?}", other),
    }
}

#[test]
fn test_id_match_is_a_fallback() {
    // "1-def" matches no name, so the id tier picks it up.
    let action = pick_by_name_or_id(&notebooks(), Some("1-def"), PickOptions::default());
    match action {
        Selection::Selected(v) => assert_eq!(v["displayName"], "Work Journal"),
        other => panic!("expected a selection, got {:?}", other),
    }
}

#[test]
fn test_empty_items_select_nothing() {
    let items: Vec<Value> = Vec::new();
    assert_eq!(
        pick_by_name_or_id(&items, Some("anything"), PickOptions::default()),
        Selection::None
    );
    assert_eq!(
        pick_by_name_or_id(
            &items,
            None,
            PickOptions {
                allow_empty_query: true,
                ..PickOptions::default()
            }
        ),
        Selection::None
    );
}

#[test]
fn test_empty_query_requires_opt_in() {
    // Without the opt-in an absent query selects nothing, even with items.
    assert_eq!(
        pick_by_name_or_id(&notebooks(), None, PickOptions::default()),
        Selection::None
    );
    assert_eq!(
        pick_by_name_or_id(&notebooks(), Some(""), PickOptions::default()),
        Selection::None
    );

    let action = pick_by_name_or_id(
        &notebooks(),
        None,
        PickOptions {
            allow_empty_query: true,
            ..PickOptions::default()
        },
    );
    match action {
        Selection::Selected(v) => assert_eq!(v["id"], "1-abc"),
        other => panic!("expected first item, got {:?}", other),
    }
}

#[test]
fn test_records_without_name_field_still_participate() {
    let items = vec![
        json!({"id": "x-1"}),
        json!({"id": "x-2", "displayName": "Meeting Notes"}),
    ];
    let action = pick_by_name_or_id(&items, Some("meeting"), PickOptions::default());
    match action {
        Selection::Selected(v) => assert_eq!(v["id"], "x-2"),
        other => panic!("expected a selection, got {:?}", other),
    }

    // The nameless record is reachable by id.
    let action = pick_by_name_or_id(&items, Some("x-1"), PickOptions::default());
    match action {
        Selection::Selected(v) => assert_eq!(v["id"], "x-1"),
        other => panic!("expected a selection, got {:?}", other),
    }
}

#[test]
fn test_custom_keys_are_honored() {
    let items = vec![
        json!({"sectionId": "s-1", "title": "Drafts"}),
        json!({"sectionId": "s-2", "title": "Archive"}),
    ];
    let options = PickOptions {
        name_key: "title",
        id_key: "sectionId",
        allow_empty_query: false,
    };
    match pick_by_name_or_id(&items, Some("archive"), options) {
        Selection::Selected(v) => assert_eq!(v["sectionId"], "s-2"),
        other => panic!("expected a selection, got {:?}", other),
    }
    match pick_by_name_or_id(&items, Some("s-1"), options) {
        Selection::Selected(v) => assert_eq!(v["title"], "Drafts"),
        other => panic!("expected a selection, got {:?}", other),
    }
}
