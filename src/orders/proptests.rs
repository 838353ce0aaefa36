//! Property-based tests for the order status classifier

use super::*;
use proptest::prelude::*;
use serde_json::{Map, Value};

// ============================================================================
// Arbitrary Generators
// ============================================================================

const HANDED_OVER: &str = "ჩაბარებული";
const AT_BRANCH: &str = "განაწილებულია ფილიალში";
const COLLECTION_NOTES: &[&str] = &["გამონაწილებულია", "გასაგზავნია"];

/// Every literal the rule table compares against, plus near misses
const KEYWORDS: &[&str] = &[
    "გამონაწილებულია",
    "გასაგზავნია",
    AT_BRANCH,
    "გამზადებულია შეკვეთა",
    "გამზადებულია",
    HANDED_OVER,
    "გაგზავნილია ფოსტაში",
    "თბილისი",
    "ბათუმი",
    "ფილიალიდან გატანა",
    "ადგილიდან გატანა",
    "სწრაფი მიწოდება",
    "სწრაფი მიწოდება ფილიალიდან",
    "დაგეგმილი მიწოდება",
    "დაგეგმილი მიწოდება ფილიალიდან",
    "მიწოდება",
    "georgian post",
    " Georgian Post ",
    "tnt",
    "TNT",
    "Fri, 07 Mar 2025 00:00:00 GMT",
    "1-2",
];

const SENTINEL: &str = "private-value";

fn arb_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        2 => Just(Some(String::new())),
        5 => prop::sample::select(KEYWORDS).prop_map(|k| Some(k.to_string())),
        2 => "[a-zA-Z0-9 ]{1,12}".prop_map(Some),
    ]
}

/// Personal fields the backend always sends, tagged so leaks are detectable
fn pii_extra() -> Map<String, Value> {
    PII_FIELDS
        .iter()
        .map(|field| ((*field).to_string(), Value::String(format!("{SENTINEL}-{field}"))))
        .collect()
}

prop_compose! {
    fn arb_record()(
        item_collection_note in arb_field(),
        delivery_type in arb_field(),
        delivery_status_2 in arb_field(),
        tracking_code in arb_field(),
        city in arb_field(),
        order_ready_status in arb_field(),
        delivery_time in arb_field(),
        status_update in arb_field(),
        order_status_1 in arb_field(),
        order_date in arb_field(),
        standard_deadline in arb_field(),
    ) -> OrderRecord {
        OrderRecord {
            item_collection_note,
            delivery_type,
            delivery_status_2,
            tracking_code,
            city,
            order_ready_status,
            delivery_time,
            status_update,
            order_status_1,
            order_date,
            standard_deadline,
            extra: pii_extra(),
        }
        .normalized()
    }
}

fn blank_or(field: Option<&str>, value: &str) -> bool {
    matches!(field, None | Some("")) || field == Some(value)
}

fn in_process(o: &OrderRecord) -> bool {
    o.item_collection_note
        .as_deref()
        .is_some_and(|n| COLLECTION_NOTES.contains(&n))
        && blank_or(o.order_status_1.as_deref(), AT_BRANCH)
        && blank_or(o.status_update.as_deref(), "გამზადებულია")
}

/// Everything the model or the user could see for this outcome
fn visible_text(outcome: &StatusOutcome) -> String {
    let mut text = outcome.transfer_message().unwrap_or_default().to_string();
    text.push_str(&outcome.tool_content().unwrap_or_default());
    text
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Every record gets exactly one outcome the tool can turn into text
    #[test]
    fn prop_classify_is_total(record in arb_record()) {
        let outcome = classify(&record);
        prop_assert!(!visible_text(&outcome).is_empty());
        prop_assert_ne!(outcome, StatusOutcome::NotFound);
    }

    #[test]
    fn prop_in_process_wins(
        mut record in arb_record(),
        note in prop::sample::select(COLLECTION_NOTES),
        status in prop_oneof![Just(None), Just(Some("")), Just(Some(AT_BRANCH))],
        update in prop_oneof![Just(None), Just(Some("")), Just(Some("გამზადებულია"))],
    ) {
        record.item_collection_note = Some(note.to_string());
        record.order_status_1 = status.map(str::to_string);
        record.status_update = update.map(str::to_string);
        prop_assert!(in_process(&record));
        prop_assert_eq!(classify(&record), StatusOutcome::Transfer(TransferReason::InProcess));
    }

    /// A handed-over order is delivered regardless of every other field
    #[test]
    fn prop_delivered_iff_handed_over(record in arb_record()) {
        let delivered = classify(&record) == StatusOutcome::Transfer(TransferReason::Delivered);
        prop_assert_eq!(delivered, record.status_update.as_deref() == Some(HANDED_OVER));
    }

    /// Ready pickup orders are offered for collection, so a cancellation
    /// can only come from an order still at the branch
    #[test]
    fn prop_cancelled_only_from_branch(record in arb_record()) {
        if classify(&record) == StatusOutcome::Transfer(TransferReason::Cancelled) {
            prop_assert_eq!(record.order_status_1.as_deref(), Some(AT_BRANCH));
        }
    }

    #[test]
    fn prop_personal_fields_never_visible(record in arb_record()) {
        let outcome = classify(&record);
        prop_assert!(!visible_text(&outcome).contains(SENTINEL));

        if let StatusOutcome::PassThrough(view) = &outcome {
            let parsed: Value = serde_json::from_str(view).unwrap();
            let map = parsed.as_object().unwrap();
            for field in PII_FIELDS {
                prop_assert!(!map.contains_key(*field));
            }
        }
    }

    /// Arbitrary backend payloads, including unknown fields and odd types
    #[test]
    fn prop_arbitrary_payload_never_panics(
        fields in prop::collection::hash_map(
            "[a-z_0-9]{1,20}",
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                "[a-zA-Z ]{0,10}".prop_map(Value::from),
            ],
            0..12,
        )
    ) {
        let payload: Map<String, Value> = fields.into_iter().collect();
        let record: OrderRecord = serde_json::from_value(Value::Object(payload)).unwrap();
        let _ = classify(&record.normalized());
    }
}
