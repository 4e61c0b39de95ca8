use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{CalendarEvent, Intent, PendingBooking, SessionState};
use crate::services::availability::{free_slots, suggest_slots};
use crate::services::calendar::CalendarStore;
use crate::services::clock::Clock;
use crate::services::extract;
use crate::services::intent::classify;

const DEFAULT_DURATION_MINUTES: i64 = 60;
const DEFAULT_TITLE: &str = "Meeting";

const HELP_TEXT: &str = "I'm here to help with your calendar! You can ask me to:\n\
    • Schedule a meeting (e.g., 'Book a call for tomorrow afternoon')\n\
    • Check availability (e.g., 'Do you have free time this Friday?')\n\
    • Cancel appointments\n\nWhat would you like to do?";

const ASK_FOR_DATE: &str = "I'd be happy to help you schedule a meeting! When would you like \
    to meet? You can say things like 'tomorrow afternoon', 'this Friday at 3pm', or 'next week'.";

const ASK_FOR_CHECK_DATE: &str = "I'd be happy to check my availability for you! What date \
    would you like to check? You can say things like 'this Friday', 'tomorrow', or 'next week'.";

/// One processed turn: the assistant's reply plus the state to carry into
/// the next turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutput {
    pub response: String,
    pub session_state: SessionState,
}

/// Strategy seam for the conversation engine. The deterministic rule-based
/// engine below is the shipped implementation; an LLM-backed one would slot
/// in behind the same trait.
pub trait DialogueEngine: Send + Sync {
    fn process_turn(&self, text: &str, session_state: SessionState) -> anyhow::Result<TurnOutput>;
}

/// Deterministic keyword/pattern-driven engine. Sole mutator of the calendar
/// store: events are appended either instantly (an explicitly named free
/// slot) or after an explicit yes on a pending booking.
pub struct RuleBasedEngine {
    store: Arc<Mutex<CalendarStore>>,
    clock: Arc<dyn Clock>,
}

impl RuleBasedEngine {
    pub fn new(store: Arc<Mutex<CalendarStore>>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn confirm_pending(&self, state: &mut SessionState) -> anyhow::Result<TurnOutput> {
        let Some(pending) = state.pending_booking.take() else {
            state.reset();
            return turn("There is no pending booking to confirm.", state);
        };

        let mut store = lock(&self.store)?;
        // The slot can have been taken between proposal and confirmation.
        if store.is_booked(pending.date, &pending.time) {
            state.reset();
            return turn(
                format!(
                    "I'm sorry, but {} on {} is no longer available. Would you like to \
                     check another time?",
                    pending.time,
                    human_date(pending.date)
                ),
                state,
            );
        }

        tracing::info!(date = %pending.date, time = %pending.time, "booking confirmed");
        store.append(CalendarEvent {
            date: pending.date,
            time: pending.time.clone(),
            duration_minutes: pending.duration_minutes,
            title: pending.title.clone(),
        });
        state.reset();
        turn(
            format!(
                "Your meeting has been booked for {} at {}.",
                human_date(pending.date),
                pending.time
            ),
            state,
        )
    }

    fn select_time(
        &self,
        text: &str,
        state: &mut SessionState,
        now: NaiveDateTime,
    ) -> anyhow::Result<TurnOutput> {
        let hour: u32 = match text.trim().parse() {
            Ok(h) if h <= 23 => h,
            // The classifier only routes 1-2 digit input here, but an hour
            // like "99" still needs rejecting. Recovery is not meaningful
            // mid-selection, so start over.
            _ => {
                state.reset();
                return turn(
                    "Sorry, I didn't understand that time. Please enter an hour like '13' \
                     for 1 PM.",
                    state,
                );
            }
        };
        let label = format!("{hour:02}:00");

        // Selecting from an offered list: the choice must be on it.
        if let Some(slots) = state.available_slots.clone() {
            if !slots.contains(&label) {
                return turn(
                    format!(
                        "{label} is not an available slot. Please select one of the \
                         available times: {}",
                        slots.join(", ")
                    ),
                    state,
                );
            }
            let date = state
                .selected_date
                .or(state.availability_date)
                .unwrap_or_else(|| now.date());
            return propose_booking(state, date, label);
        }

        // An availability date without a recorded slot list still resolves
        // the bare hour against that date.
        if let Some(date) = state.availability_date {
            return propose_booking(state, date, label);
        }

        state.reset();
        turn(HELP_TEXT, state)
    }

    fn check_availability(
        &self,
        date: Option<NaiveDate>,
        state: &mut SessionState,
    ) -> anyhow::Result<TurnOutput> {
        let Some(date) = date else {
            state.checking_availability = true;
            return turn(ASK_FOR_CHECK_DATE, state);
        };

        let free = free_slots(&*lock(&self.store)?, date);
        state.reset();
        if free.is_empty() {
            return turn(no_slots_message(date), state);
        }

        state.availability_date = Some(date);
        state.available_slots = Some(free.clone());
        turn(
            format!(
                "On {}, I have these free slots: {}. Would you like to book one of these \
                 times? Please reply with the hour (e.g., '13' for 1 PM).",
                human_date(date),
                free.join(", ")
            ),
            state,
        )
    }

    fn handle_booking(
        &self,
        text: &str,
        date: Option<NaiveDate>,
        time_label: Option<String>,
        state: &mut SessionState,
    ) -> anyhow::Result<TurnOutput> {
        state.booking_flow = true;

        let Some(date) = date else {
            state.waiting_for_date = true;
            return turn(ASK_FOR_DATE, state);
        };

        let mut store = lock(&self.store)?;
        let free = free_slots(&store, date);
        state.selected_date = Some(date);

        // An explicit "between H-H" range narrows the offered slots.
        if let Some(range) = extract::extract_hour_range(text) {
            let in_range: Vec<String> = free
                .iter()
                .filter(|slot| {
                    slot_hour(slot).is_some_and(|h| range.start <= h && h <= range.end)
                })
                .cloned()
                .collect();

            if in_range.is_empty() {
                state.reset();
                return turn(
                    format!(
                        "I'm sorry, but I don't have any free slots between {} and {} on {}. \
                         Would you like to check a different time or date?",
                        range.start_text,
                        range.end_text,
                        human_date(date)
                    ),
                    state,
                );
            }

            state.waiting_for_time = true;
            state.available_slots = Some(in_range.clone());
            return turn(
                format!(
                    "Great! I have availability on {} between {} and {}. Available slots: {}. \
                     Which time works best for you?",
                    human_date(date),
                    range.start_text,
                    range.end_text,
                    in_range.join(", ")
                ),
                state,
            );
        }

        if let Some(time) = time_label {
            if free.contains(&time) {
                // An explicitly named free slot books in one turn.
                tracing::info!(date = %date, time = %time, "booked directly");
                store.append(CalendarEvent {
                    date,
                    time: time.clone(),
                    duration_minutes: DEFAULT_DURATION_MINUTES,
                    title: DEFAULT_TITLE.to_string(),
                });
                state.reset();
                return turn(
                    format!(
                        "Perfect! I've booked your meeting for {} at {time}.",
                        human_date(date)
                    ),
                    state,
                );
            }
            state.waiting_for_time = true;
            return turn(
                format!(
                    "I'm sorry, but {time} is not available on {}. {}",
                    human_date(date),
                    suggest_slots(&free)
                ),
                state,
            );
        }

        if free.is_empty() {
            state.waiting_for_date = true;
            return turn(no_slots_message(date), state);
        }

        state.waiting_for_time = true;
        state.available_slots = Some(free.clone());
        turn(
            format!(
                "Great! I have availability on {}. {} What time works best for you?",
                human_date(date),
                suggest_slots(&free)
            ),
            state,
        )
    }
}

impl DialogueEngine for RuleBasedEngine {
    fn process_turn(&self, text: &str, mut state: SessionState) -> anyhow::Result<TurnOutput> {
        let now = self.clock.now();
        let intent = classify(text, &state, now);
        let (date, time_label) = extract::extract(text, now);

        tracing::info!(
            intent = intent.as_str(),
            date = ?date,
            time = ?time_label,
            "processing turn"
        );

        // Pending booking: explicit yes commits, explicit no/cancel discards.
        if state.pending_confirmation {
            match intent {
                Intent::Confirm => return self.confirm_pending(&mut state),
                Intent::Cancel | Intent::Reject => {
                    state.reset();
                    return turn(
                        "Booking cancelled. Let me know if you want to check availability \
                         or book another slot!",
                        &mut state,
                    );
                }
                _ => {}
            }
        }

        match intent {
            Intent::SelectTime => self.select_time(text, &mut state, now),
            Intent::Greeting => {
                state.reset();
                turn(
                    "Hello! I'm your calendar assistant. I can help you schedule meetings, \
                     check availability, or manage your calendar. What would you like to do?",
                    &mut state,
                )
            }
            Intent::Check => self.check_availability(date, &mut state),
            Intent::Book => self.handle_booking(text, date, time_label, &mut state),
            // Unknown, plus confirm/cancel/reject outside a pending booking:
            // re-prompt for whatever a stale phase flag is still missing.
            _ => {
                if state.waiting_for_date {
                    turn(
                        "I'm still waiting for you to tell me when you'd like to schedule \
                         the meeting. You can say things like 'tomorrow', 'this Friday', or \
                         'next week'.",
                        &mut state,
                    )
                } else if state.waiting_for_time {
                    turn(
                        "I'm still waiting for you to tell me what time you'd like to meet. \
                         You can say things like '3pm', '2:30 PM', or 'morning'.",
                        &mut state,
                    )
                } else if state.checking_availability {
                    turn(
                        "I'm still waiting for you to tell me what date you'd like me to \
                         check. You can say things like 'tomorrow', 'this Friday', or 'next \
                         week'.",
                        &mut state,
                    )
                } else {
                    turn(HELP_TEXT, &mut state)
                }
            }
        }
    }
}

fn propose_booking(
    state: &mut SessionState,
    date: NaiveDate,
    label: String,
) -> anyhow::Result<TurnOutput> {
    state.pending_confirmation = true;
    state.pending_booking = Some(PendingBooking {
        date,
        time: label.clone(),
        duration_minutes: DEFAULT_DURATION_MINUTES,
        title: DEFAULT_TITLE.to_string(),
    });
    turn(
        format!(
            "You selected {label} on {}. Do you want to book this slot? (yes/no)",
            human_date(date)
        ),
        state,
    )
}

fn turn(response: impl Into<String>, state: &mut SessionState) -> anyhow::Result<TurnOutput> {
    Ok(TurnOutput {
        response: response.into(),
        session_state: state.clone(),
    })
}

fn lock(store: &Arc<Mutex<CalendarStore>>) -> anyhow::Result<std::sync::MutexGuard<'_, CalendarStore>> {
    store
        .lock()
        .map_err(|_| anyhow::anyhow!("calendar store lock poisoned"))
}

fn no_slots_message(date: NaiveDate) -> String {
    format!(
        "I'm sorry, but I don't have any free slots on {}. Would you like to check another date?",
        human_date(date)
    )
}

fn human_date(date: NaiveDate) -> String {
    date.format("%A, %B %d").to_string()
}

fn slot_hour(slot: &str) -> Option<u32> {
    slot.split(':').next().and_then(|h| h.parse().ok())
}
