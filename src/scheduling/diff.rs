use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;

use super::{DateKey, ScheduleError, SlotCollection, SlotTime};
use crate::api::types::{EventFullResponse, EventPatch, EventSlot, SlotPayload, UpdateEventRequest};
use crate::utils::validation::non_empty;

/// Editable text fields of an event as currently typed by the creator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
}

impl EventDraft {
    pub fn from_event(event: &EventFullResponse) -> Self {
        Self {
            title: event.event.title.clone(),
            description: event.event.description.clone().unwrap_or_default(),
            location: event.event.location.clone().unwrap_or_default(),
        }
    }
}

/// Whether saving would change anything on the server.
pub fn has_changes(
    original: &EventFullResponse,
    draft: &EventDraft,
    collection: &SlotCollection,
    tz: Tz,
) -> bool {
    let event = &original.event;
    if draft.title.trim() != event.title.trim()
        || draft.description.trim() != event.description.as_deref().unwrap_or("").trim()
        || draft.location.trim() != event.location.as_deref().unwrap_or("").trim()
    {
        return true;
    }

    // Server slots sharing a local minute collapse into one editable slot.
    let mut before: Vec<(DateKey, SlotTime)> = original.slots.iter().map(|slot| local_minute(slot, tz)).collect();
    let mut after: Vec<(DateKey, SlotTime)> = collection
        .iter()
        .flat_map(|(date, slots)| slots.iter().map(move |s| (date, s.time)))
        .collect();

    before.sort_unstable();
    before.dedup();
    after.sort_unstable();
    before != after
}

fn local_minute(slot: &EventSlot, tz: Tz) -> (DateKey, SlotTime) {
    let local = slot.slot_start.with_timezone(&tz).naive_local();
    (DateKey::new(local.date()), SlotTime::from(local.time()))
}

/// Builds the `PUT events/:id` payload.
///
/// Local slots map back to server slots only by an exactly equal UTC instant;
/// server slots with no local counterpart are listed for deletion. A server
/// slot that shares its local minute with a matched one was folded into it
/// on load and is left alone.
pub fn build_update(
    original: &EventFullResponse,
    draft: &EventDraft,
    collection: &SlotCollection,
    tz: Tz,
) -> Result<UpdateEventRequest, ScheduleError> {
    let mut slots = Vec::with_capacity(collection.total_slots());
    let mut kept: HashSet<i64> = HashSet::new();

    for (date, day_slots) in collection.iter() {
        for slot in day_slots {
            let slot_start: DateTime<Utc> = date.instant_in(slot.time, tz)?.with_timezone(&Utc);
            let millis = slot_start.timestamp_millis();
            kept.insert(millis);
            let id = original
                .slots
                .iter()
                .find(|s| s.slot_start.timestamp_millis() == millis)
                .map(|s| s.id);
            slots.push(SlotPayload { id, slot_start });
        }
    }

    let is_kept = |slot: &EventSlot| kept.contains(&slot.slot_start.timestamp_millis());
    let matched_minutes: HashSet<(DateKey, SlotTime)> = original
        .slots
        .iter()
        .filter(|s| is_kept(*s))
        .map(|s| local_minute(s, tz))
        .collect();
    let deleted_slot_ids = original
        .slots
        .iter()
        .filter(|s| !is_kept(*s) && !matched_minutes.contains(&local_minute(s, tz)))
        .map(|s| s.id)
        .collect();

    Ok(UpdateEventRequest {
        event: EventPatch {
            id: original.event.id,
            public_id: original.event.public_id.clone(),
            title: draft.title.trim().to_string(),
            description: non_empty(&draft.description),
            location: non_empty(&draft.location),
        },
        slots,
        deleted_slot_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::test_support::{event_with_slots, slot_at};
    use chrono::NaiveDate;

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 12, 1).unwrap().and_hms_opt(8, 0, 0).unwrap()
    }

    #[test]
    fn test_unchanged_event_has_no_changes() {
        let original = event_with_slots(vec![slot_at(1, "2024-01-01T09:00:00Z")]);
        let collection = SlotCollection::from_server_slots(&original.slots, Tz::UTC);
        let draft = EventDraft::from_event(&original);

        assert!(!has_changes(&original, &draft, &collection, Tz::UTC));
        let update = build_update(&original, &draft, &collection, Tz::UTC).unwrap();
        assert!(update.deleted_slot_ids.is_empty());
        assert_eq!(update.slots.len(), 1);
        assert_eq!(update.slots[0].id, Some(1));
    }

    #[test]
    fn test_reflexive_regardless_of_order_and_timezone() {
        let original = event_with_slots(vec![
            slot_at(3, "2024-01-02T15:30:00Z"),
            slot_at(1, "2024-01-01T09:00:00Z"),
            slot_at(2, "2024-01-01T23:45:00Z"),
        ]);
        for tz in [Tz::UTC, chrono_tz::Europe::Moscow, chrono_tz::America::New_York] {
            let collection = SlotCollection::from_server_slots(&original.slots, tz);
            let draft = EventDraft::from_event(&original);
            assert!(!has_changes(&original, &draft, &collection, tz), "changes detected in {tz}");
            let update = build_update(&original, &draft, &collection, tz).unwrap();
            assert!(update.deleted_slot_ids.is_empty());
            assert!(update.slots.iter().all(|s| s.id.is_some()));
        }
    }

    #[test]
    fn test_text_changes_are_detected() {
        let original = event_with_slots(vec![slot_at(1, "2024-01-01T09:00:00Z")]);
        let collection = SlotCollection::from_server_slots(&original.slots, Tz::UTC);

        let mut draft = EventDraft::from_event(&original);
        draft.location = "Room 4".into();
        assert!(has_changes(&original, &draft, &collection, Tz::UTC));

        let mut draft = EventDraft::from_event(&original);
        draft.title = format!("{}  ", original.event.title);
        assert!(!has_changes(&original, &draft, &collection, Tz::UTC));
    }

    #[test]
    fn test_moved_slot_becomes_addition_and_deletion() {
        let original = event_with_slots(vec![
            slot_at(1, "2024-01-01T09:00:00Z"),
            slot_at(2, "2024-01-01T10:00:00Z"),
        ]);
        let mut collection = SlotCollection::from_server_slots(&original.slots, Tz::UTC);
        let date = DateKey::from_ymd(2024, 1, 1).unwrap();
        let key = collection
            .slots(date)
            .iter()
            .find(|s| s.server_id == Some(2))
            .unwrap()
            .id;
        collection
            .update_slot_time(date, key, "11:30".parse().unwrap(), now())
            .unwrap();
        let draft = EventDraft::from_event(&original);

        assert!(has_changes(&original, &draft, &collection, Tz::UTC));
        let update = build_update(&original, &draft, &collection, Tz::UTC).unwrap();
        assert_eq!(update.deleted_slot_ids, vec![2]);
        let new_slot = update.slots.iter().find(|s| s.id.is_none()).unwrap();
        assert_eq!(new_slot.slot_start.to_rfc3339(), "2024-01-01T11:30:00+00:00");
    }

    #[test]
    fn test_local_times_are_converted_to_utc() {
        let original = event_with_slots(vec![slot_at(7, "2024-01-01T06:00:00Z")]);
        let tz = chrono_tz::Europe::Moscow;
        let collection = SlotCollection::from_server_slots(&original.slots, tz);
        let date = DateKey::from_ymd(2024, 1, 1).unwrap();
        assert_eq!(collection.slots(date)[0].time.to_string(), "09:00");

        let update = build_update(&original, &EventDraft::from_event(&original), &collection, tz).unwrap();
        assert_eq!(update.slots[0].id, Some(7));
    }

    #[test]
    fn test_empty_optional_fields_become_null() {
        let original = event_with_slots(vec![slot_at(1, "2024-01-01T09:00:00Z")]);
        let collection = SlotCollection::from_server_slots(&original.slots, Tz::UTC);
        let draft = EventDraft {
            title: "  Board games  ".into(),
            description: "   ".into(),
            location: String::new(),
        };
        let update = build_update(&original, &draft, &collection, Tz::UTC).unwrap();
        assert_eq!(update.event.title, "Board games");
        assert_eq!(update.event.description, None);
        assert_eq!(update.event.location, None);
    }

    #[test]
    fn test_slots_in_the_same_minute_are_not_a_change() {
        let original = event_with_slots(vec![
            slot_at(1, "2024-01-01T09:00:00Z"),
            slot_at(2, "2024-01-01T09:00:30Z"),
        ]);
        let mut collection = SlotCollection::from_server_slots(&original.slots, Tz::UTC);
        assert_eq!(collection.total_slots(), 1);
        let draft = EventDraft::from_event(&original);

        assert!(!has_changes(&original, &draft, &collection, Tz::UTC));
        let update = build_update(&original, &draft, &collection, Tz::UTC).unwrap();
        assert!(update.deleted_slot_ids.is_empty());
        assert_eq!(update.slots.len(), 1);
        assert_eq!(update.slots[0].id, Some(1));

        collection.remove_date(DateKey::from_ymd(2024, 1, 1).unwrap());
        let update = build_update(&original, &draft, &collection, Tz::UTC).unwrap();
        let mut deleted = update.deleted_slot_ids.clone();
        deleted.sort_unstable();
        assert_eq!(deleted, vec![1, 2]);
    }

    #[test]
    fn test_removed_date_lists_all_its_slots_for_deletion() {
        let original = event_with_slots(vec![
            slot_at(1, "2024-01-01T09:00:00Z"),
            slot_at(2, "2024-01-01T10:00:00Z"),
            slot_at(3, "2024-01-02T10:00:00Z"),
        ]);
        let mut collection = SlotCollection::from_server_slots(&original.slots, Tz::UTC);
        collection.remove_date(DateKey::from_ymd(2024, 1, 1).unwrap());
        let update = build_update(&original, &EventDraft::from_event(&original), &collection, Tz::UTC).unwrap();
        let mut deleted = update.deleted_slot_ids.clone();
        deleted.sort_unstable();
        assert_eq!(deleted, vec![1, 2]);
        assert_eq!(update.slots.len(), 1);
    }
}
