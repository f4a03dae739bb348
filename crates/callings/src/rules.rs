//! Edit-form transition rules.
//!
//! Deciding which follow-up tasks an edit produces is done by comparing the
//! stored record against the applied submission — no IO, no clock reads
//! beyond the context passed in.

use chrono::NaiveDate;

use wardboard_tasks::{LcrTaskKind, TaskDetails, TaskDraft};

use crate::calling::Calling;

/// Everything a transition rule needs beyond the two record snapshots.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    /// Display name of the member linked on the updated record, if any.
    /// Without a resolvable holder no task can be described, so the rules
    /// stay silent.
    pub member_name: Option<&'a str>,
    /// Display name of the operator performing the edit.
    pub actor_name: &'a str,
    pub today: NaiveDate,
}

/// Workflow side-effect rules for an edit of an existing calling.
///
/// - sustained date set or changed ⇒ one "calling sustained" draft, dated
///   with the submitted sustained date;
/// - set-apart flag false→true ⇒ one "calling set apart" draft, dated today,
///   crediting the acting operator;
/// - anything else (title, organization, notes, member link alone) ⇒ no
///   drafts.
///
/// Both rules can fire on the same edit; the order of the returned drafts is
/// sustained first, matching the order the checks ran in the original flow.
pub fn side_effects(prev: &Calling, next: &Calling, ctx: &RuleContext<'_>) -> Vec<TaskDraft> {
    let mut drafts = Vec::new();

    let (Some(member), Some(member_name)) = (next.member, ctx.member_name) else {
        return drafts;
    };

    let details = |date: NaiveDate, notes: String| TaskDetails {
        member_id: Some(member),
        member_name: Some(member_name.to_string()),
        calling_id: Some(next.id),
        calling_title: Some(next.title.clone()),
        date: Some(date),
        notes: Some(notes),
    };

    if let Some(date) = next.sustained_date {
        if prev.sustained_date != Some(date) {
            drafts.push(TaskDraft {
                kind: LcrTaskKind::CallingSustained,
                description: format!("{member_name} was sustained as {}", next.title),
                details: details(date, "Sustained in Sacrament Meeting".to_string()),
            });
        }
    }

    if next.is_set_apart && !prev.is_set_apart {
        drafts.push(TaskDraft {
            kind: LcrTaskKind::CallingSetApart,
            description: format!("{member_name} was set apart as {}", next.title),
            details: details(ctx.today, format!("Set apart by {}", ctx.actor_name)),
        });
    }

    drafts
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use wardboard_core::{CallingId, MemberId};

    use super::*;
    use crate::calling::{CallingDraft, CallingStatus};

    fn filled(sustained: Option<NaiveDate>, set_apart: bool) -> Calling {
        Calling::create(
            CallingId::new(),
            CallingDraft {
                title: "Ward Mission Leader".to_string(),
                organization: "Ward Missionary".to_string(),
                status: CallingStatus::Filled,
                member: Some(MemberId::new()),
                sustained_date: sustained,
                is_set_apart: set_apart,
                ..CallingDraft::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn ctx<'a>(member_name: &'a str) -> RuleContext<'a> {
        RuleContext {
            member_name: Some(member_name),
            actor_name: "Bishop Allred",
            today: Utc::now().date_naive(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn sustained_date_set_fires_once() {
        let prev = filled(None, false);
        let mut next = prev.clone();
        next.sustained_date = Some(date("2026-03-01"));

        let drafts = side_effects(&prev, &next, &ctx("Edna Marsh"));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].kind, LcrTaskKind::CallingSustained);
        assert_eq!(drafts[0].details.date, Some(date("2026-03-01")));
        assert_eq!(
            drafts[0].description,
            "Edna Marsh was sustained as Ward Mission Leader"
        );
    }

    #[test]
    fn sustained_date_changed_fires_once() {
        let prev = filled(Some(date("2026-01-04")), false);
        let mut next = prev.clone();
        next.sustained_date = Some(date("2026-02-01"));

        let drafts = side_effects(&prev, &next, &ctx("Edna Marsh"));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].details.date, Some(date("2026-02-01")));
    }

    #[test]
    fn unrelated_edit_fires_nothing() {
        let prev = filled(Some(date("2026-01-04")), true);
        let mut next = prev.clone();
        next.notes = Some("meets in the overflow room".to_string());
        next.organization = "Other".to_string();

        assert!(side_effects(&prev, &next, &ctx("Edna Marsh")).is_empty());
    }

    #[test]
    fn set_apart_false_to_true_fires_once() {
        let prev = filled(Some(date("2026-01-04")), false);
        let mut next = prev.clone();
        next.is_set_apart = true;

        let drafts = side_effects(&prev, &next, &ctx("Edna Marsh"));
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].kind, LcrTaskKind::CallingSetApart);
        assert_eq!(
            drafts[0].details.notes.as_deref(),
            Some("Set apart by Bishop Allred")
        );
    }

    #[test]
    fn set_apart_true_to_true_is_not_a_transition() {
        let prev = filled(Some(date("2026-01-04")), true);
        let next = prev.clone();
        assert!(side_effects(&prev, &next, &ctx("Edna Marsh")).is_empty());
    }

    #[test]
    fn both_rules_can_fire_on_one_edit() {
        let prev = filled(None, false);
        let mut next = prev.clone();
        next.sustained_date = Some(date("2026-03-01"));
        next.is_set_apart = true;

        let drafts = side_effects(&prev, &next, &ctx("Edna Marsh"));
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].kind, LcrTaskKind::CallingSustained);
        assert_eq!(drafts[1].kind, LcrTaskKind::CallingSetApart);
    }

    #[test]
    fn no_resolvable_member_means_no_tasks() {
        let prev = filled(None, false);
        let mut next = prev.clone();
        next.sustained_date = Some(date("2026-03-01"));

        let ctx = RuleContext {
            member_name: None,
            actor_name: "Bishop Allred",
            today: Utc::now().date_naive(),
        };
        assert!(side_effects(&prev, &next, &ctx).is_empty());
    }
}
