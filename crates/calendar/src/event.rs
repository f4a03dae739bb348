use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use wardboard_core::{DomainError, DomainResult, EventId};

/// Broad event category used for filtering and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Meeting,
    Activity,
    Service,
    #[default]
    Other,
}

/// Submitted event form data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: NaiveDate,
    /// Kept as entered ("7:00 PM"); only used for display and as a
    /// secondary sort key.
    pub time: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub category: EventCategory,
}

/// A calendar entry. Ordering on the calendar is by date, then time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardEvent {
    pub id: EventId,
    pub title: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub attendees: Vec<String>,
    pub category: EventCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WardEvent {
    pub fn create(id: EventId, draft: EventDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let draft = validate(draft)?;
        Ok(Self {
            id,
            title: draft.title,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            description: draft.description,
            attendees: draft.attendees,
            category: draft.category,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, draft: EventDraft, now: DateTime<Utc>) -> DomainResult<()> {
        let draft = validate(draft)?;
        self.title = draft.title;
        self.date = draft.date;
        self.time = draft.time;
        self.location = draft.location;
        self.description = draft.description;
        self.attendees = draft.attendees;
        self.category = draft.category;
        self.updated_at = now;
        Ok(())
    }

    /// Calendar ordering key: date first, then the display time string.
    pub fn sort_key(&self) -> (NaiveDate, &str) {
        (self.date, self.time.as_str())
    }
}

fn validate(mut draft: EventDraft) -> DomainResult<EventDraft> {
    draft.title = draft.title.trim().to_string();
    if draft.title.is_empty() {
        return Err(DomainError::validation("event title cannot be empty"));
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, date: &str, time: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            date: date.parse().unwrap(),
            time: time.to_string(),
            location: None,
            description: None,
            attendees: Vec::new(),
            category: EventCategory::Meeting,
        }
    }

    #[test]
    fn orders_by_date_then_time() {
        let a = WardEvent::create(EventId::new(), draft("A", "2026-05-03", "09:00"), Utc::now())
            .unwrap();
        let b = WardEvent::create(EventId::new(), draft("B", "2026-05-03", "11:00"), Utc::now())
            .unwrap();
        let c = WardEvent::create(EventId::new(), draft("C", "2026-04-26", "19:00"), Utc::now())
            .unwrap();

        let mut events = vec![a.clone(), b.clone(), c.clone()];
        events.sort_by(|x, y| x.sort_key().cmp(&y.sort_key()));
        assert_eq!(
            events.iter().map(|e| e.title.as_str()).collect::<Vec<_>>(),
            vec!["C", "A", "B"]
        );
    }

    #[test]
    fn empty_title_rejected() {
        assert!(
            WardEvent::create(EventId::new(), draft("  ", "2026-05-03", "09:00"), Utc::now())
                .is_err()
        );
    }
}
