use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::api::types::{CurrentUserVote, EventFullResponse};

/// A mutation the server has acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    VotesSubmitted {
        slot_ids: Vec<i64>,
        at: DateTime<Utc>,
    },
    Finalized {
        slot_id: i64,
        location: Option<String>,
    },
    Unfinalized,
}

/// Returns the snapshot as it would look after `action`, without refetching.
pub fn reduce(previous: &EventFullResponse, action: &EventAction) -> EventFullResponse {
    let mut next = previous.clone();
    match action {
        EventAction::VotesSubmitted { slot_ids, at } => {
            let before: HashSet<i64> = previous.current_user_votes.iter().map(|v| v.slot_id).collect();
            let after: HashSet<i64> = slot_ids.iter().copied().collect();

            for slot in &mut next.slots {
                let had = before.contains(&slot.id);
                let has = after.contains(&slot.id);
                if has && !had {
                    slot.vote_count += 1;
                } else if had && !has {
                    slot.vote_count = slot.vote_count.saturating_sub(1);
                }
                slot.current_user_voted = has;
            }
            next.current_user_votes = slot_ids
                .iter()
                .map(|&slot_id| CurrentUserVote {
                    slot_id,
                    created_at: *at,
                })
                .collect();
        }
        EventAction::Finalized { slot_id, location } => {
            next.event.final_slot_id = Some(*slot_id);
            if let Some(location) = location.as_ref().filter(|l| !l.trim().is_empty()) {
                next.event.location = Some(location.clone());
            }
        }
        EventAction::Unfinalized => {
            next.event.final_slot_id = None;
        }
    }
    next
}
