mod common;

use std::sync::Arc;

use common::{at, event, harness, listed, slot, Call, FakeApi, PUBLIC_ID};
use timetally::api::types::{ArchivedEvent, EventType};
use timetally::flows::{
    bootstrap, ArchiveFlow, CreateEventFlow, EditEventFlow, EventDetailFlow, EventsTab, FinalizeOutcome, FlowError,
    HomeFlow,
};
use timetally::host::{HostError, LaunchParams, RecordingBridge, Route};
use timetally::i18n::{Language, Message};
use timetally::scheduling::{DateKey, ScheduleError, SlotTime, TemplateTarget, VoteState};
use timetally::utils::validation::ValidationError;

fn en(message: Message) -> &'static str {
    Language::En.text(message)
}

fn day(y: i32, m: u32, d: u32) -> DateKey {
    DateKey::from_ymd(y, m, d).unwrap()
}

fn time(raw: &str) -> SlotTime {
    raw.parse().unwrap()
}

mod bootstrap_tests {
    use super::*;

    #[tokio::test]
    async fn test_outside_telegram_is_unsupported() {
        let api = FakeApi::default();
        let host = RecordingBridge::outside_telegram();
        assert_eq!(bootstrap(&host, &api).await, Route::EnvUnsupported);
        assert!(api.calls().is_empty());
        assert_eq!(host.ready_calls(), 0);
    }

    #[tokio::test]
    async fn test_init_failure_is_unsupported() {
        let api = FakeApi::default();
        let host = RecordingBridge::default().with_init_error(HostError::Init("no init data".into()));
        assert_eq!(bootstrap(&host, &api).await, Route::EnvUnsupported);
    }

    #[tokio::test]
    async fn test_rejected_init_data_is_unsupported() {
        let api = FakeApi::default();
        api.fail_with(401);
        let host = RecordingBridge::default();
        assert_eq!(bootstrap(&host, &api).await, Route::EnvUnsupported);
        assert_eq!(api.calls(), vec![Call::Validate]);
    }

    #[tokio::test]
    async fn test_start_param_opens_public_event() {
        let api = FakeApi::default();
        let host = RecordingBridge::new(LaunchParams {
            start_param: Some(format!("ev:{PUBLIC_ID}")),
            ..LaunchParams::default()
        });

        let route = bootstrap(&host, &api).await;

        assert_eq!(route.to_string(), format!("/event/public/{PUBLIC_ID}"));
        assert_eq!(host.ready_calls(), 1);
    }

    #[tokio::test]
    async fn test_garbage_start_param_lands_home() {
        let api = FakeApi::default();
        let host = RecordingBridge::new(LaunchParams {
            start_param: Some("not-a-uuid".into()),
            ..LaunchParams::default()
        });
        assert_eq!(bootstrap(&host, &api).await, Route::Home);
    }
}

mod create_tests {
    use super::*;

    // 10:00 local time in Berlin.
    const NOW: &str = "2024-07-01T08:00:00Z";

    #[tokio::test]
    async fn test_submit_sends_local_midnight_and_times() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());

        assert!(flow.toggle_date(day(2024, 7, 5)));
        flow.add_slot(day(2024, 7, 5)).await.unwrap();
        flow.title = "  Board games  ".into();

        let route = flow.submit().await.unwrap();
        assert_eq!(route, Route::EventDetail(77));

        let calls = h.api.calls();
        let Some(Call::Create(request)) = calls.last() else {
            panic!("expected a create call, got {calls:?}");
        };
        assert_eq!(request.title, "Board games");
        assert_eq!(request.timezone, "Europe/Berlin");
        assert_eq!(request.event_type, EventType::Poll);
        assert_eq!(request.dates.len(), 1);
        assert_eq!(request.dates[0].date, at("2024-07-04T22:00:00Z"));
        assert_eq!(request.dates[0].time_slots, vec![time("12:00"), time("13:00")]);
        assert_eq!(request.description, None);

        let history = h.host.main_button_history();
        assert!(history.iter().any(|b| b.is_loader_visible));
        assert_eq!(h.host.main_button().unwrap().text, en(Message::CreateEventButton));
    }

    #[tokio::test]
    async fn test_invalid_form_alerts_and_sends_nothing() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());

        let err = flow.submit().await.unwrap_err();
        assert!(matches!(err, FlowError::Validation(ValidationError::EmptyTitleAndNoSlots)));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::FormNoTitleNoSlots)));
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_past_and_foreign_month_days_are_not_selectable() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());

        assert!(!flow.toggle_date(day(2024, 6, 30)));
        assert!(!flow.toggle_date(day(2024, 8, 2)));
        assert!(flow.slots().is_empty());

        flow.next_month();
        assert!(flow.toggle_date(day(2024, 8, 2)));
    }

    #[tokio::test]
    async fn test_multiple_choice_needs_two_slots() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());
        flow.toggle_date(day(2024, 7, 5));

        assert!(flow.set_multiple_choice(true).await.is_err());
        assert!(!flow.multiple_choice());
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::MultipleChoiceNeedsTwoSlots)));

        let second = flow.add_slot(day(2024, 7, 5)).await.unwrap();
        flow.set_multiple_choice(true).await.unwrap();
        assert!(flow.multiple_choice());

        flow.remove_slot(day(2024, 7, 5), second).unwrap();
        assert!(!flow.multiple_choice());
    }

    #[tokio::test]
    async fn test_switching_type_resets_multiple_choice() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());
        flow.toggle_date(day(2024, 7, 5));
        flow.toggle_date(day(2024, 7, 6));
        flow.set_multiple_choice(true).await.unwrap();

        flow.set_event_type(EventType::Booking);
        assert!(!flow.multiple_choice());
        flow.set_multiple_choice(true).await.unwrap();
        assert!(!flow.multiple_choice());
    }

    #[tokio::test]
    async fn test_template_and_remove_all() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());
        flow.toggle_date(day(2024, 7, 5));
        flow.toggle_date(day(2024, 7, 6));

        // 09:00..17:00 hourly, noon already present on both days.
        let added = flow.apply_template(TemplateTarget::AllSelected).await.unwrap();
        assert_eq!(added, 14);

        h.host.script_confirms([false]);
        assert!(!flow.remove_all().await.unwrap());
        assert_eq!(flow.slots().total_slots(), 16);

        assert!(flow.remove_all().await.unwrap());
        assert!(flow.slots().is_empty());
        assert_eq!(h.host.confirms(), vec![en(Message::ConfirmRemoveAllSlots); 2]);
    }

    #[tokio::test]
    async fn test_duplicate_time_is_rejected() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());
        flow.toggle_date(day(2024, 7, 5));
        let second = flow.add_slot(day(2024, 7, 5)).await.unwrap();

        let err = flow
            .update_slot_time(day(2024, 7, 5), second, time("12:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::Schedule(_)));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::DuplicateTime)));
    }

    #[tokio::test]
    async fn test_backend_failure_restores_button() {
        let api = FakeApi::default();
        api.fail_with(500);
        let h = harness(api, NOW);
        let mut flow = CreateEventFlow::new(h.ctx.clone());
        flow.toggle_date(day(2024, 7, 5));
        flow.title = "Chess".into();

        assert!(matches!(flow.submit().await, Err(FlowError::Api(_))));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::ErrorCreatingEvent)));
        let button = h.host.main_button().unwrap();
        assert!(button.is_enabled && !button.is_loader_visible);
    }
}

mod edit_tests {
    use super::*;

    const NOW: &str = "2024-07-01T08:00:00Z";

    fn poll(event_type: EventType) -> timetally::api::types::EventFullResponse {
        event(
            true,
            event_type,
            vec![
                slot(1, "2024-07-10T10:00:00Z", 2),
                slot(2, "2024-07-10T12:00:00Z", 0),
                slot(3, "2024-07-11T10:00:00Z", 0),
            ],
        )
    }

    #[tokio::test]
    async fn test_participant_cannot_edit() {
        let h = harness(FakeApi::default(), NOW);
        let err = EditEventFlow::from_snapshot(h.ctx.clone(), event(false, EventType::Poll, vec![]))
            .err()
            .unwrap();
        assert!(matches!(err, FlowError::NotCreator));
        assert_eq!(err.fallback_route(), Route::Home);
    }

    #[tokio::test]
    async fn test_unchanged_save_skips_request() {
        let h = harness(FakeApi::with_event(poll(EventType::Poll)), NOW);
        let mut flow = EditEventFlow::load(h.ctx.clone(), 10).await.unwrap();

        assert_eq!(flow.slots().total_slots(), 3);
        assert!(!flow.has_changes());
        assert_eq!(flow.save().await.unwrap(), Route::EventDetail(10));
        assert_eq!(h.api.calls(), vec![Call::Event(10)]);
        assert_eq!(h.host.secondary_button().unwrap().text, en(Message::CancelButton));
    }

    #[tokio::test]
    async fn test_removing_voted_date_needs_confirmation() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EditEventFlow::from_snapshot(h.ctx.clone(), poll(EventType::Poll)).unwrap();
        flow.next_month();
        flow.previous_month();

        h.host.script_confirms([false, true]);
        assert!(!flow.toggle_date(day(2024, 7, 10)).await.unwrap());
        assert!(flow.slots().contains_date(day(2024, 7, 10)));

        assert!(flow.toggle_date(day(2024, 7, 10)).await.unwrap());
        assert!(!flow.slots().contains_date(day(2024, 7, 10)));
        assert_eq!(h.host.confirms(), vec![en(Message::ConfirmRemoveVotedDate); 2]);

        // Day without votes goes without asking.
        assert!(flow.toggle_date(day(2024, 7, 11)).await.unwrap());
        assert_eq!(h.host.confirms().len(), 2);
    }

    #[tokio::test]
    async fn test_booking_wording_for_booked_slot() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EditEventFlow::from_snapshot(h.ctx.clone(), poll(EventType::Booking)).unwrap();
        let booked = flow.slots().slots(day(2024, 7, 10))[0].id;

        h.host.script_confirms([false]);
        assert!(!flow.remove_slot(day(2024, 7, 10), booked).await.unwrap());
        assert_eq!(h.host.confirms(), vec![en(Message::ConfirmRemoveBookedSlot)]);
        assert_eq!(flow.slots().total_slots(), 3);
    }

    #[tokio::test]
    async fn test_save_sends_diff() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EditEventFlow::from_snapshot(h.ctx.clone(), poll(EventType::Poll)).unwrap();
        flow.toggle_date(day(2024, 7, 10)).await.unwrap();
        flow.draft.location = "Cafe Central".into();

        assert_eq!(flow.save().await.unwrap(), Route::EventDetail(10));

        let calls = h.api.calls();
        let Some(Call::Update(10, request)) = calls.last() else {
            panic!("expected an update call, got {calls:?}");
        };
        assert_eq!(request.deleted_slot_ids, vec![1, 2]);
        assert_eq!(request.slots.len(), 1);
        assert_eq!(request.slots[0].id, Some(3));
        assert_eq!(request.event.location.as_deref(), Some("Cafe Central"));
    }

    #[tokio::test]
    async fn test_template_replaces_slots_without_votes() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EditEventFlow::from_snapshot(h.ctx.clone(), poll(EventType::Poll)).unwrap();
        flow.template = timetally::scheduling::TimeTemplate {
            start_time: time("09:00"),
            end_time: time("11:00"),
            repeat_interval: 60,
        };

        // 12:00 has votes and stays, the unvoted 14:00 goes.
        let added = flow.apply_template(TemplateTarget::Date(day(2024, 7, 10))).await.unwrap();
        assert_eq!(added, 2);
        let times: Vec<String> = flow
            .slots()
            .display_slots(day(2024, 7, 10))
            .iter()
            .map(|s| s.time.to_string())
            .collect();
        assert_eq!(times, vec!["09:00", "10:00", "12:00"]);
        assert_eq!(flow.slots().slots(day(2024, 7, 11)).len(), 1);

        flow.save().await.unwrap();
        let calls = h.api.calls();
        let Some(Call::Update(10, request)) = calls.last() else {
            panic!("expected an update call, got {calls:?}");
        };
        assert_eq!(request.deleted_slot_ids, vec![2]);
        assert_eq!(request.slots.iter().filter(|s| s.id.is_none()).count(), 2);
    }

    #[tokio::test]
    async fn test_save_with_skipped_clock_time_alerts() {
        let h = harness(FakeApi::default(), "2024-03-01T08:00:00Z");
        let snapshot = event(true, EventType::Poll, vec![slot(1, "2024-03-31T08:00:00Z", 0)]);
        let mut flow = EditEventFlow::from_snapshot(h.ctx.clone(), snapshot).unwrap();
        let date = day(2024, 3, 31);
        let key = flow.slots().slots(date)[0].id;

        // Berlin jumps from 02:00 to 03:00 that night.
        flow.update_slot_time(date, key, time("02:30")).await.unwrap();
        let err = flow.save().await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Schedule(ScheduleError::NonexistentLocalTime { .. })
        ));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::NonexistentTime)));
        assert!(h.api.calls().is_empty());
        let button = h.host.main_button().unwrap();
        assert_eq!(button.text, en(Message::SaveChangesButton));
        assert!(!button.is_loader_visible);
    }

    #[tokio::test]
    async fn test_failed_save_restores_buttons() {
        let api = FakeApi::default();
        api.fail_with(500);
        let h = harness(api, NOW);
        let mut flow = EditEventFlow::from_snapshot(h.ctx.clone(), poll(EventType::Poll)).unwrap();
        flow.draft.title = "Team lunch".into();

        assert!(matches!(flow.save().await, Err(FlowError::Api(_))));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::ErrorUpdatingEvent)));
        assert_eq!(h.host.main_button().unwrap().text, en(Message::SaveChangesButton));
        assert!(h.host.secondary_button().unwrap().is_visible);
        assert_eq!(flow.cancel(), Route::EventDetail(10));
    }
}

mod detail_tests {
    use super::*;
    use timetally::api::types::EventFullResponse;

    // 13:00 in Berlin: slot 1 is over, slot 2 is still ahead.
    const NOW: &str = "2024-07-10T11:00:00Z";

    fn snapshot(is_creator: bool) -> EventFullResponse {
        event(
            is_creator,
            EventType::Poll,
            vec![
                slot(2, "2024-07-10T12:00:00Z", 1),
                slot(1, "2024-07-10T10:00:00Z", 0),
                slot(3, "2024-07-11T10:00:00Z", 0),
            ],
        )
    }

    fn ids(flow: &EventDetailFlow) -> Vec<i64> {
        flow.visible_slots().iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn test_visible_slots_per_role() {
        let h = harness(FakeApi::default(), NOW);
        let creator = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(true)).unwrap();
        assert_eq!(ids(&creator), vec![1, 2, 3]);

        let participant = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(false)).unwrap();
        assert_eq!(ids(&participant), vec![2, 3]);

        let mut voted = snapshot(false);
        voted.slots[1].current_user_voted = true;
        let participant = EventDetailFlow::from_snapshot(h.ctx.clone(), voted).unwrap();
        assert_eq!(ids(&participant), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_grouping_follows_display_timezone() {
        let h = harness(FakeApi::default(), NOW);
        let mut remote = snapshot(true);
        remote.event.timezone = "America/New_York".into();
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), remote).unwrap();

        let groups = flow.grouped_slots();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].heading, "July 10, Wed");
        let times: Vec<&str> = groups[0].rows.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(times, vec!["12:00", "14:00"]);

        assert!(flow.timezones_differ());
        flow.set_use_event_timezone(true);
        let groups = flow.grouped_slots();
        assert_eq!(groups[0].rows[0].time, "06:00");
    }

    #[tokio::test]
    async fn test_vote_submit_updates_snapshot() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(false)).unwrap();

        assert_eq!(flow.vote_session().state(), VoteState::Editing);
        assert!(!h.host.main_button().unwrap().is_enabled);

        assert!(flow.toggle_slot(2));
        assert!(h.host.main_button().unwrap().is_enabled);

        assert_eq!(flow.press_main_button().await.unwrap(), None);
        assert_eq!(h.api.calls(), vec![Call::Votes(10, vec![2])]);

        let voted = flow.snapshot().slot(2).unwrap();
        assert_eq!(voted.vote_count, 2);
        assert!(voted.current_user_voted);
        assert_eq!(flow.snapshot().current_user_votes.len(), 1);
        assert_eq!(flow.vote_session().state(), VoteState::Viewing);
        assert_eq!(h.host.main_button().unwrap().text, en(Message::EditSelectionButton));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::SelectionConfirmed)));

        // Viewing: the main button re-opens the selection.
        flow.press_main_button().await.unwrap();
        assert_eq!(flow.vote_session().state(), VoteState::Editing);
    }

    #[tokio::test]
    async fn test_failed_vote_rolls_back() {
        let api = FakeApi::default();
        api.fail_with(503);
        let h = harness(api, NOW);
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(false)).unwrap();

        flow.toggle_slot(3);
        assert!(matches!(flow.submit_votes().await, Err(FlowError::Api(_))));
        assert!(!flow.vote_session().is_selected(3));
        assert_eq!(flow.vote_session().state(), VoteState::Editing);
        assert_eq!(flow.snapshot().slot(3).unwrap().vote_count, 0);
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::ErrorSubmittingVotes)));
    }

    #[tokio::test]
    async fn test_finalize_asks_for_location_then_unfinalize() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(true)).unwrap();
        assert_eq!(h.host.main_button().unwrap().text, en(Message::CancelEventButton));
        assert_eq!(h.host.secondary_button().unwrap().text, en(Message::EditEventButton));

        assert!(flow.toggle_slot(2));
        assert_eq!(h.host.main_button().unwrap().text, en(Message::FinalizeButton));

        assert_eq!(flow.finalize().await.unwrap(), FinalizeOutcome::NeedsLocation);
        assert!(h.api.calls().is_empty());

        flow.temp_location = " Cafe Central ".into();
        assert_eq!(flow.finalize().await.unwrap(), FinalizeOutcome::Finalized(2));
        assert_eq!(h.api.calls(), vec![Call::Finalize(10, 2, Some("Cafe Central".into()))]);
        assert_eq!(flow.snapshot().event.final_slot_id, Some(2));
        assert_eq!(flow.snapshot().event.location.as_deref(), Some("Cafe Central"));
        assert_eq!(ids(&flow), vec![2]);
        assert_eq!(h.host.secondary_button().unwrap().text, en(Message::UnfinalizeButton));
        assert!(!flow.toggle_slot(3));

        h.host.script_confirms([false]);
        assert!(!flow.unfinalize().await.unwrap());
        assert!(flow.unfinalize().await.unwrap());
        assert_eq!(flow.snapshot().event.final_slot_id, None);
        assert_eq!(h.api.calls().last(), Some(&Call::Unfinalize(10)));
    }

    #[tokio::test]
    async fn test_booking_hides_and_refuses_taken_slots() {
        let h = harness(FakeApi::default(), NOW);
        let booking = event(
            false,
            EventType::Booking,
            vec![
                slot(5, "2024-07-11T10:00:00Z", 1),
                slot(6, "2024-07-11T12:00:00Z", 0),
            ],
        );
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), booking).unwrap();
        assert_eq!(ids(&flow), vec![6]);

        assert!(!flow.toggle_slot(5));
        assert!(!flow.vote_session().is_selected(5));

        assert!(flow.toggle_slot(6));
        flow.press_main_button().await.unwrap();
        assert_eq!(h.api.calls(), vec![Call::Votes(10, vec![6])]);
        assert_eq!(flow.snapshot().slot(5).unwrap().vote_count, 1);

        // Outside of editing only the own booking is listed.
        assert_eq!(flow.vote_session().state(), VoteState::Viewing);
        assert_eq!(ids(&flow), vec![6]);
        flow.press_main_button().await.unwrap();
        assert_eq!(ids(&flow), vec![6]);
    }

    #[tokio::test]
    async fn test_own_booking_stays_visible() {
        let h = harness(FakeApi::default(), NOW);
        let mut booking = event(
            false,
            EventType::Booking,
            vec![
                slot(5, "2024-07-11T10:00:00Z", 1),
                slot(6, "2024-07-11T12:00:00Z", 0),
                slot(7, "2024-07-11T14:00:00Z", 2),
            ],
        );
        booking.slots[0].current_user_voted = true;
        booking.current_user_votes.push(timetally::api::types::CurrentUserVote {
            slot_id: 5,
            created_at: at("2024-07-01T08:00:00Z"),
        });
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), booking).unwrap();
        assert_eq!(ids(&flow), vec![5]);

        flow.press_main_button().await.unwrap();
        assert_eq!(ids(&flow), vec![5, 6]);
        assert!(!flow.toggle_slot(7));
        assert!(flow.toggle_slot(6));
        assert!(flow.toggle_slot(5));
        assert!(flow.vote_session().is_selected(5));
    }

    #[tokio::test]
    async fn test_booking_creator_cannot_pick_candidate() {
        let h = harness(FakeApi::default(), NOW);
        let mut booking = snapshot(true);
        booking.event.event_type = EventType::Booking;
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), booking).unwrap();

        assert!(!flow.toggle_slot(2));
        assert_eq!(flow.finalize().await.unwrap(), FinalizeOutcome::NoCandidate);
    }

    #[tokio::test]
    async fn test_delete_and_edit_routes() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(true)).unwrap();

        assert_eq!(flow.press_secondary_button().await.unwrap(), Some(Route::EventEdit(10)));

        h.host.script_confirms([false]);
        assert_eq!(flow.press_main_button().await.unwrap(), None);
        assert!(h.api.calls().is_empty());

        assert_eq!(flow.press_main_button().await.unwrap(), Some(Route::Home));
        assert_eq!(h.api.calls(), vec![Call::Delete(10)]);
        assert_eq!(h.host.confirms(), vec![en(Message::ConfirmDeleteEvent); 2]);
    }

    #[tokio::test]
    async fn test_participant_cannot_manage_event() {
        let h = harness(FakeApi::default(), NOW);
        let mut flow = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(false)).unwrap();
        assert!(matches!(flow.edit(), Err(FlowError::NotCreator)));
        assert!(matches!(flow.delete().await, Err(FlowError::NotCreator)));
        assert!(!h.host.secondary_button().unwrap().is_visible);
    }

    #[tokio::test]
    async fn test_share_and_calendar_links() {
        let h = harness(FakeApi::default(), NOW);
        let mut finalized = snapshot(false);
        finalized.event.final_slot_id = Some(2);
        let flow = EventDetailFlow::from_snapshot(h.ctx.clone(), finalized).unwrap();
        assert!(!h.host.main_button().unwrap().is_visible);

        let share = flow.share();
        assert!(share.starts_with(
            "https://t.me/share/url?url=https%3A%2F%2Ft.me%2Fcomunna_bot%2Ftimetally%3Fstartapp%3D0190a6b2"
        ));
        assert!(share.contains("&text="));
        assert_eq!(h.host.opened_telegram_links(), vec![share]);

        let calendar = flow.add_to_calendar().unwrap();
        assert_eq!(
            calendar,
            "http://localhost:3000/calendar?title=Team%20dinner&startTime=2024-07-10T12%3A00%3A00.000Z&language_code=en"
        );
        assert_eq!(h.host.opened_links(), vec![calendar]);
    }

    #[tokio::test]
    async fn test_calendar_needs_final_slot() {
        let h = harness(FakeApi::default(), NOW);
        let flow = EventDetailFlow::from_snapshot(h.ctx.clone(), snapshot(false)).unwrap();
        assert!(matches!(flow.add_to_calendar(), Err(FlowError::NotFinalized)));
    }

    #[tokio::test]
    async fn test_load_public_and_failed_load() {
        let h = harness(FakeApi::with_event(snapshot(false)), NOW);
        let uuid = PUBLIC_ID.parse().unwrap();
        let flow = EventDetailFlow::load_public(h.ctx.clone(), uuid).await.unwrap();
        assert_eq!(flow.snapshot().event.id, 10);
        assert_eq!(h.api.calls(), vec![Call::PublicEvent(PUBLIC_ID.into())]);

        assert!(EventDetailFlow::load(h.ctx.clone(), 99).await.is_err());
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::ErrorLoadingEvent)));
    }

    #[tokio::test]
    async fn test_unknown_event_timezone_is_an_error() {
        let h = harness(FakeApi::default(), NOW);
        let mut broken = snapshot(false);
        broken.event.timezone = "Mars/Olympus".into();
        let err = EventDetailFlow::from_snapshot(h.ctx.clone(), broken).err().unwrap();
        assert!(matches!(err, FlowError::InvalidTimezone(_)));
    }

    #[test]
    fn test_context_language_follows_launch_params() {
        let host = Arc::new(RecordingBridge::new(LaunchParams {
            language_code: Some("ru".into()),
            ..LaunchParams::default()
        }));
        let ctx = timetally::flows::AppContext::new(Arc::new(FakeApi::default()), host, chrono_tz::UTC);
        assert_eq!(ctx.language, Language::Ru);
    }
}

mod home_tests {
    use super::*;

    const NOW: &str = "2024-07-01T08:00:00Z";

    fn row_ids(rows: &[timetally::flows::EventRow]) -> Vec<i64> {
        rows.iter().map(|r| r.id).collect()
    }

    #[tokio::test]
    async fn test_active_events_split_by_creator() {
        let api = FakeApi::with_lists(
            vec![listed(1, true, 3, None), listed(2, false, 5, Some(9)), listed(3, true, 0, Some(4))],
            Vec::new(),
        );
        let h = harness(api, NOW);
        let mut home = HomeFlow::load(h.ctx.clone()).await.unwrap();
        assert_eq!(h.api.calls(), vec![Call::ActiveEvents]);

        let mine = home.rows();
        assert_eq!(row_ids(&mine), vec![1, 3]);
        assert_eq!(mine[0].participant_count, Some(3));
        assert!(!mine[0].is_finalized);
        assert!(mine[1].is_finalized);

        home.tab = EventsTab::Others;
        let others = home.rows();
        assert_eq!(row_ids(&others), vec![2]);
        assert_eq!(others[0].participant_count, None);
        assert_eq!(EventsTab::Others.title(Language::En), en(Message::OtherEventsTab));
    }

    #[tokio::test]
    async fn test_home_navigation() {
        let h = harness(FakeApi::with_lists(vec![listed(1, true, 3, None)], Vec::new()), NOW);
        let home = HomeFlow::load(h.ctx.clone()).await.unwrap();

        let button = h.host.main_button().unwrap();
        assert_eq!(button.text, en(Message::CreateEventButton));
        assert!(button.is_visible && button.is_enabled);
        assert!(!h.host.secondary_button().unwrap().is_visible);

        assert_eq!(home.press_main_button(), Route::Create);
        assert_eq!(home.open_event(1), Some(Route::EventDetail(1)));
        assert_eq!(home.open_event(99), None);
        assert_eq!(home.open_archive().to_string(), "/archive");
    }

    #[tokio::test]
    async fn test_share_from_list() {
        let h = harness(FakeApi::with_lists(vec![listed(1, true, 3, None)], Vec::new()), NOW);
        let home = HomeFlow::load(h.ctx.clone()).await.unwrap();

        let url = home.share(1).unwrap();
        assert!(url.starts_with("https://t.me/share/url?url="));
        assert!(url.contains("startapp%3D0190a6b2-7c3e-7b4a-9f1e-2d3c4b5a6f01"));
        assert_eq!(h.host.opened_telegram_links(), vec![url]);
        assert_eq!(home.share(2), None);
    }

    #[tokio::test]
    async fn test_failed_list_load_alerts() {
        let api = FakeApi::default();
        api.fail_with(500);
        let h = harness(api, NOW);

        assert!(matches!(HomeFlow::load(h.ctx.clone()).await, Err(FlowError::Api(_))));
        assert!(h.host.last_alert().unwrap().ends_with(en(Message::ErrorLoadingEvents)));
        assert!(matches!(ArchiveFlow::load(h.ctx.clone()).await, Err(FlowError::Api(_))));
        assert_eq!(h.api.calls(), vec![Call::ActiveEvents, Call::ArchivedEvents]);
    }

    #[tokio::test]
    async fn test_archive_rows_and_routes() {
        let archived = vec![
            ArchivedEvent {
                base: listed(4, true, 2, Some(1)),
                is_deleted: false,
                is_expired: true,
            },
            ArchivedEvent {
                base: listed(5, false, 0, None),
                is_deleted: true,
                is_expired: false,
            },
        ];
        let h = harness(FakeApi::with_lists(Vec::new(), archived), NOW);
        let mut archive = ArchiveFlow::load(h.ctx.clone()).await.unwrap();

        let mine = archive.rows();
        assert_eq!(row_ids(&mine), vec![4]);
        assert!(mine[0].is_expired);
        assert_eq!(mine[0].participant_count, Some(2));

        archive.tab = EventsTab::Others;
        assert_eq!(row_ids(&archive.rows()), vec![5]);

        assert_eq!(archive.back(), Route::Home);
        assert_eq!(archive.press_main_button(), Route::Create);
        assert_eq!(h.host.main_button().unwrap().text, en(Message::CreateEventButton));
    }
}
