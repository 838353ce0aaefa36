//! Order status classifier
//!
//! An ordered table of (predicate, outcome) rules evaluated top-down; the
//! first match wins. Several rules overlap on purpose and the order encodes
//! business precedence, so do not reorder without checking the tests.

use super::backend::OrderLookupError;
use super::record::OrderRecord;
use super::templates;
use serde::{Deserialize, Serialize};

// Field values as the order backend writes them
const NOTE_ALLOCATED: &str = "გამონაწილებულია";
const NOTE_TO_SHIP: &str = "გასაგზავნია";
const STATUS_AT_BRANCH: &str = "განაწილებულია ფილიალში";
const STATUS_READY: &str = "გამზადებულია შეკვეთა";
const UPDATE_PREPARED: &str = "გამზადებულია";
const UPDATE_HANDED_OVER: &str = "ჩაბარებული";
const POSTED: &str = "გაგზავნილია ფოსტაში";
const CAPITAL: &str = "თბილისი";

const PICKUP_TYPES: &[&str] = &["ფილიალიდან გატანა", "ადგილიდან გატანა"];
const FAST_TYPES: &[&str] = &["სწრაფი მიწოდება", "სწრაფი მიწოდება ფილიალიდან"];
const SCHEDULED_TYPES: &[&str] = &["დაგეგმილი მიწოდება", "დაგეგმილი მიწოდება ფილიალიდან"];
const STANDARD_TYPE: &str = "მიწოდება";

const CARRIER_POSTAL: &str = "georgian post";
const CARRIER_COURIER: &str = "tnt";

/// Why an order is handed to an operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferReason {
    InProcess,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryZone {
    Capital,
    Regions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Carrier {
    Postal,
    Courier,
}

impl Carrier {
    fn from_ready_status(status: &str) -> Option<Self> {
        match status {
            CARRIER_POSTAL => Some(Carrier::Postal),
            CARRIER_COURIER => Some(Carrier::Courier),
            _ => None,
        }
    }
}

/// A scripted reply: template key plus its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum ScriptedReply {
    ReadyForPickup {
        branch: String,
    },
    FastDelivery {
        deadline: String,
    },
    ScheduledDelivery {
        window: String,
    },
    StandardDelivery {
        zone: DeliveryZone,
        carrier: Carrier,
        deadline: String,
        tracking_code: String,
    },
}

impl ScriptedReply {
    pub fn template_key(&self) -> &'static str {
        match self {
            ScriptedReply::ReadyForPickup { .. } => "ready_for_pickup",
            ScriptedReply::FastDelivery { .. } => "fast_delivery",
            ScriptedReply::ScheduledDelivery { .. } => "scheduled_delivery",
            ScriptedReply::StandardDelivery {
                zone: DeliveryZone::Capital,
                ..
            } => "standard_delivery_capital",
            ScriptedReply::StandardDelivery {
                zone: DeliveryZone::Regions,
                ..
            } => "standard_delivery_regions",
        }
    }

    /// Exact customer-facing text
    pub fn render(&self) -> String {
        match self {
            ScriptedReply::ReadyForPickup { branch } => templates::ready_for_pickup(branch),
            ScriptedReply::FastDelivery { deadline } => templates::fast_delivery(deadline),
            ScriptedReply::ScheduledDelivery { window } => templates::scheduled_delivery(window),
            ScriptedReply::StandardDelivery {
                zone,
                carrier,
                deadline,
                tracking_code,
            } => {
                let transit = match zone {
                    DeliveryZone::Capital => templates::TRANSIT_CAPITAL,
                    DeliveryZone::Regions => templates::TRANSIT_REGIONS,
                };
                match carrier {
                    Carrier::Postal => templates::standard_postal(deadline, tracking_code, transit),
                    Carrier::Courier => {
                        templates::standard_courier(deadline, tracking_code, transit)
                    }
                }
            }
        }
    }
}

/// Classification result for one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    NotFound,
    Transfer(TransferReason),
    ScriptedReply(ScriptedReply),
    /// No rule matched; carries the record with personal fields removed
    PassThrough(String),
}

impl StatusOutcome {
    /// Message shown to the user when the outcome hands off to an operator
    pub fn transfer_message(&self) -> Option<&'static str> {
        match self {
            StatusOutcome::NotFound => Some(templates::NOT_FOUND),
            StatusOutcome::Transfer(TransferReason::InProcess) => Some(templates::IN_PROCESS),
            StatusOutcome::Transfer(TransferReason::Delivered) => Some(templates::DELIVERED),
            StatusOutcome::Transfer(TransferReason::Cancelled) => Some(templates::CANCELLED),
            StatusOutcome::ScriptedReply(_) | StatusOutcome::PassThrough(_) => None,
        }
    }

    /// Content of the tool result the model sees for a non-transfer outcome
    pub fn tool_content(&self) -> Option<String> {
        match self {
            StatusOutcome::ScriptedReply(reply) => {
                Some(format!("{}{}", templates::VERBATIM_PREFIX, reply.render()))
            }
            StatusOutcome::PassThrough(view) => {
                Some(format!("{}{view}", templates::PASS_THROUGH_PREFIX))
            }
            StatusOutcome::NotFound | StatusOutcome::Transfer(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusOutcome::NotFound => "not_found",
            StatusOutcome::Transfer(TransferReason::InProcess) => "in_process",
            StatusOutcome::Transfer(TransferReason::Delivered) => "delivered",
            StatusOutcome::Transfer(TransferReason::Cancelled) => "cancelled",
            StatusOutcome::ScriptedReply(reply) => reply.template_key(),
            StatusOutcome::PassThrough(_) => "pass_through",
        }
    }
}

/// One row of the rule table
struct Rule {
    name: &'static str,
    matches: fn(&OrderRecord) -> bool,
    outcome: fn(&OrderRecord) -> StatusOutcome,
}

const RULES: &[Rule] = &[
    Rule {
        name: "in_process",
        matches: |o| {
            one_of(o.item_collection_note.as_deref(), &[NOTE_ALLOCATED, NOTE_TO_SHIP])
                && empty_or(o.order_status_1.as_deref(), STATUS_AT_BRANCH)
                && empty_or(o.status_update.as_deref(), UPDATE_PREPARED)
        },
        outcome: |_| StatusOutcome::Transfer(TransferReason::InProcess),
    },
    Rule {
        name: "delivered",
        matches: |o| is(o.status_update.as_deref(), UPDATE_HANDED_OVER),
        outcome: |_| StatusOutcome::Transfer(TransferReason::Delivered),
    },
    Rule {
        name: "ready_for_pickup",
        matches: |o| {
            one_of(o.delivery_type.as_deref(), PICKUP_TYPES)
                && is(o.order_status_1.as_deref(), STATUS_READY)
                && is(o.status_update.as_deref(), "")
        },
        outcome: |o| {
            StatusOutcome::ScriptedReply(ScriptedReply::ReadyForPickup {
                branch: o.ready_status(),
            })
        },
    },
    Rule {
        name: "pickup_delivered",
        matches: |o| {
            one_of(o.delivery_type.as_deref(), PICKUP_TYPES)
                && one_of(o.order_status_1.as_deref(), &[STATUS_AT_BRANCH, STATUS_READY])
                && is(o.status_update.as_deref(), UPDATE_HANDED_OVER)
        },
        outcome: |_| StatusOutcome::Transfer(TransferReason::Delivered),
    },
    Rule {
        name: "pickup_cancelled",
        matches: |o| {
            one_of(o.delivery_type.as_deref(), PICKUP_TYPES)
                && one_of(o.order_status_1.as_deref(), &[STATUS_READY, STATUS_AT_BRANCH])
                && is(o.status_update.as_deref(), "")
        },
        outcome: |_| StatusOutcome::Transfer(TransferReason::Cancelled),
    },
    Rule {
        name: "fast_delivery",
        matches: |o| {
            one_of(o.delivery_type.as_deref(), FAST_TYPES)
                && present(o.tracking_code.as_deref())
                && present(o.standard_deadline.as_deref())
                && ready_not_updated(o)
        },
        outcome: |o| {
            StatusOutcome::ScriptedReply(ScriptedReply::FastDelivery {
                deadline: o.deadline().to_string(),
            })
        },
    },
    Rule {
        name: "scheduled_delivery",
        matches: |o| {
            one_of(o.delivery_type.as_deref(), SCHEDULED_TYPES)
                && present(o.tracking_code.as_deref())
                && present(o.delivery_time.as_deref())
                && ready_not_updated(o)
        },
        outcome: |o| {
            StatusOutcome::ScriptedReply(ScriptedReply::ScheduledDelivery {
                window: o.delivery_time.clone().unwrap_or_default(),
            })
        },
    },
    Rule {
        name: "standard_delivery_regions",
        matches: |o| standard_delivery(o, DeliveryZone::Regions),
        outcome: |o| standard_outcome(o, DeliveryZone::Regions),
    },
    Rule {
        name: "standard_delivery_capital",
        matches: |o| standard_delivery(o, DeliveryZone::Capital),
        outcome: |o| standard_outcome(o, DeliveryZone::Capital),
    },
];

/// Classify a normalized order record. Total: records no rule matches
/// fall through to a sanitized pass-through.
pub fn classify(record: &OrderRecord) -> StatusOutcome {
    for rule in RULES {
        if (rule.matches)(record) {
            let outcome = (rule.outcome)(record);
            tracing::debug!(rule = rule.name, outcome = outcome.label(), "Order rule matched");
            return outcome;
        }
    }
    StatusOutcome::PassThrough(record.sanitized_view())
}

/// Classify the result of a backend lookup. Lookup failures of any kind
/// resolve to `NotFound`.
pub fn classify_lookup(lookup: Result<OrderRecord, OrderLookupError>) -> StatusOutcome {
    match lookup {
        Ok(record) => classify(&record.normalized()),
        Err(e) => {
            tracing::info!(error = %e, "Order lookup failed, treating as not found");
            StatusOutcome::NotFound
        }
    }
}

fn is(field: Option<&str>, expected: &str) -> bool {
    field == Some(expected)
}

fn one_of(field: Option<&str>, options: &[&str]) -> bool {
    field.is_some_and(|f| options.contains(&f))
}

/// Absent, empty, or the given value
fn empty_or(field: Option<&str>, value: &str) -> bool {
    matches!(field, None | Some("")) || field == Some(value)
}

fn present(field: Option<&str>) -> bool {
    field.is_some_and(|f| !f.is_empty())
}

fn ready_not_updated(o: &OrderRecord) -> bool {
    is(o.order_status_1.as_deref(), STATUS_READY) && is(o.status_update.as_deref(), "")
}

fn zone_of(city: &str) -> DeliveryZone {
    if city.to_lowercase() == CAPITAL {
        DeliveryZone::Capital
    } else {
        DeliveryZone::Regions
    }
}

fn standard_delivery(o: &OrderRecord, zone: DeliveryZone) -> bool {
    is(o.delivery_type.as_deref(), STANDARD_TYPE)
        && present(o.tracking_code.as_deref())
        && present(o.standard_deadline.as_deref())
        && o
            .city
            .as_deref()
            .is_some_and(|c| !c.is_empty() && zone_of(c) == zone)
        && Carrier::from_ready_status(&o.ready_status()).is_some()
        && ready_not_updated(o)
        && one_of(o.delivery_status_2.as_deref(), &[POSTED, ""])
}

fn standard_outcome(o: &OrderRecord, zone: DeliveryZone) -> StatusOutcome {
    match Carrier::from_ready_status(&o.ready_status()) {
        Some(carrier) => StatusOutcome::ScriptedReply(ScriptedReply::StandardDelivery {
            zone,
            carrier,
            deadline: o.deadline().to_string(),
            tracking_code: o.tracking_code.clone().unwrap_or_default(),
        }),
        None => StatusOutcome::PassThrough(o.sanitized_view()),
    }
}
