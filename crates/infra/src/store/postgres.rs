//! Postgres-backed collections.
//!
//! One concrete store per table, explicit column mapping, runtime-checked
//! queries. Schema lives in `crates/infra/migrations/schema.sql`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use wardboard_auth::{AccountStatus, Grant, Role, UserAccount};
use wardboard_calendar::{EventCategory, WardEvent};
use wardboard_callings::{Calling, CallingStatus};
use wardboard_core::{
    CallingId, EventId, GroupId, MemberId, ResponseId, TaskId, UserId,
};
use wardboard_directory::{Member, MemberStatus};
use wardboard_groups::FheGroup;
use wardboard_survey::{SurveyResponse, SurveySubmission};
use wardboard_tasks::{LcrTask, LcrTaskKind, TaskDetails};

use super::{Collection, StoreError};

fn bad_column(col: &str, value: &str) -> StoreError {
    StoreError::Backend(format!("unexpected value in column {col}: {value}"))
}

fn json_err(e: serde_json::Error) -> StoreError {
    StoreError::Backend(format!("json mapping error: {e}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// members
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgMembers {
    pool: PgPool,
}

impl PgMembers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn member_from_row(row: &PgRow) -> Result<Member, StoreError> {
    let status: String = row.try_get("status")?;
    Ok(Member {
        id: MemberId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        status: match status.as_str() {
            "active" => MemberStatus::Active,
            "less-active" => MemberStatus::LessActive,
            other => return Err(bad_column("members.status", other)),
        },
        skills: row
            .try_get::<Option<Vec<String>>, _>("skills")?
            .unwrap_or_default(),
        fhe_group: row
            .try_get::<Option<Uuid>, _>("fhe_group_id")?
            .map(GroupId::from_uuid),
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<MemberId, Member> for PgMembers {
    async fn get(&self, key: MemberId) -> Result<Option<Member>, StoreError> {
        let row = sqlx::query("SELECT * FROM members WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(member_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Member>, StoreError> {
        let rows = sqlx::query("SELECT * FROM members ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(member_from_row).collect()
    }

    async fn upsert(&self, key: MemberId, value: Member) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO members
              (id, name, email, phone, address, status, skills, fhe_group_id, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
              name = EXCLUDED.name, email = EXCLUDED.email, phone = EXCLUDED.phone,
              address = EXCLUDED.address, status = EXCLUDED.status, skills = EXCLUDED.skills,
              fhe_group_id = EXCLUDED.fhe_group_id, notes = EXCLUDED.notes,
              updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(&value.name)
        .bind(&value.email)
        .bind(&value.phone)
        .bind(&value.address)
        .bind(match value.status {
            MemberStatus::Active => "active",
            MemberStatus::LessActive => "less-active",
        })
        .bind(&value.skills)
        .bind(value.fhe_group.map(|g| *g.as_uuid()))
        .bind(&value.notes)
        .bind(value.created_at)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: MemberId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// callings
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgCallings {
    pool: PgPool,
}

impl PgCallings {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn calling_from_row(row: &PgRow) -> Result<Calling, StoreError> {
    let status: String = row.try_get("status")?;
    Ok(Calling {
        id: CallingId::from_uuid(row.try_get("id")?),
        title: row.try_get("title")?,
        organization: row.try_get("organization")?,
        status: match status.as_str() {
            "filled" => CallingStatus::Filled,
            "vacant" => CallingStatus::Vacant,
            other => return Err(bad_column("callings.status", other)),
        },
        member: row
            .try_get::<Option<Uuid>, _>("member_id")?
            .map(MemberId::from_uuid),
        sustained_date: row.try_get("sustained_date")?,
        is_set_apart: row.try_get("is_set_apart")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<CallingId, Calling> for PgCallings {
    async fn get(&self, key: CallingId) -> Result<Option<Calling>, StoreError> {
        let row = sqlx::query("SELECT * FROM callings WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(calling_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Calling>, StoreError> {
        let rows = sqlx::query("SELECT * FROM callings ORDER BY organization, title")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(calling_from_row).collect()
    }

    async fn upsert(&self, key: CallingId, value: Calling) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO callings
              (id, title, organization, status, member_id, sustained_date, is_set_apart, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
              title = EXCLUDED.title, organization = EXCLUDED.organization,
              status = EXCLUDED.status, member_id = EXCLUDED.member_id,
              sustained_date = EXCLUDED.sustained_date, is_set_apart = EXCLUDED.is_set_apart,
              notes = EXCLUDED.notes, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(&value.title)
        .bind(&value.organization)
        .bind(match value.status {
            CallingStatus::Filled => "filled",
            CallingStatus::Vacant => "vacant",
        })
        .bind(value.member.map(|m| *m.as_uuid()))
        .bind(value.sustained_date)
        .bind(value.is_set_apart)
        .bind(&value.notes)
        .bind(value.created_at)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: CallingId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM callings WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM callings")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// fhe_groups
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgGroups {
    pool: PgPool,
}

impl PgGroups {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn group_from_row(row: &PgRow) -> Result<FheGroup, StoreError> {
    Ok(FheGroup {
        id: GroupId::from_uuid(row.try_get("id")?),
        name: row.try_get("name")?,
        leader: row
            .try_get::<Option<Uuid>, _>("leader_id")?
            .map(MemberId::from_uuid),
        location: row.try_get("location")?,
        meeting_time: row.try_get("meeting_time")?,
        activity_image: row.try_get("activity_image")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<GroupId, FheGroup> for PgGroups {
    async fn get(&self, key: GroupId) -> Result<Option<FheGroup>, StoreError> {
        let row = sqlx::query("SELECT * FROM fhe_groups WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(group_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<FheGroup>, StoreError> {
        let rows = sqlx::query("SELECT * FROM fhe_groups ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(group_from_row).collect()
    }

    async fn upsert(&self, key: GroupId, value: FheGroup) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO fhe_groups
              (id, name, leader_id, location, meeting_time, activity_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
              name = EXCLUDED.name, leader_id = EXCLUDED.leader_id,
              location = EXCLUDED.location, meeting_time = EXCLUDED.meeting_time,
              activity_image = EXCLUDED.activity_image, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(&value.name)
        .bind(value.leader.map(|m| *m.as_uuid()))
        .bind(&value.location)
        .bind(&value.meeting_time)
        .bind(&value.activity_image)
        .bind(value.created_at)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: GroupId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM fhe_groups WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM fhe_groups")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// events
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgEvents {
    pool: PgPool,
}

impl PgEvents {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn event_from_row(row: &PgRow) -> Result<WardEvent, StoreError> {
    let category: String = row.try_get("type")?;
    Ok(WardEvent {
        id: EventId::from_uuid(row.try_get("id")?),
        title: row.try_get("title")?,
        date: row.try_get("date")?,
        time: row.try_get("time")?,
        location: row.try_get("location")?,
        description: row.try_get("description")?,
        attendees: row
            .try_get::<Option<Vec<String>>, _>("attendees")?
            .unwrap_or_default(),
        category: match category.as_str() {
            "meeting" => EventCategory::Meeting,
            "activity" => EventCategory::Activity,
            "service" => EventCategory::Service,
            "other" => EventCategory::Other,
            other => return Err(bad_column("events.type", other)),
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<EventId, WardEvent> for PgEvents {
    async fn get(&self, key: EventId) -> Result<Option<WardEvent>, StoreError> {
        let row = sqlx::query("SELECT * FROM events WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<WardEvent>, StoreError> {
        let rows = sqlx::query(r#"SELECT * FROM events ORDER BY date, "time""#)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(event_from_row).collect()
    }

    async fn upsert(&self, key: EventId, value: WardEvent) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO events
              (id, title, date, "time", location, description, attendees, type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
              title = EXCLUDED.title, date = EXCLUDED.date, "time" = EXCLUDED."time",
              location = EXCLUDED.location, description = EXCLUDED.description,
              attendees = EXCLUDED.attendees, type = EXCLUDED.type,
              updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(&value.title)
        .bind(value.date)
        .bind(&value.time)
        .bind(&value.location)
        .bind(&value.description)
        .bind(&value.attendees)
        .bind(match value.category {
            EventCategory::Meeting => "meeting",
            EventCategory::Activity => "activity",
            EventCategory::Service => "service",
            EventCategory::Other => "other",
        })
        .bind(value.created_at)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: EventId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// survey_responses
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgResponses {
    pool: PgPool,
}

impl PgResponses {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn response_from_row(row: &PgRow) -> Result<SurveyResponse, StoreError> {
    Ok(SurveyResponse {
        id: ResponseId::from_uuid(row.try_get("id")?),
        submission: SurveySubmission {
            full_name: row.try_get("full_name")?,
            record_number: row.try_get("record_number")?,
            birth_date: row.try_get("birth_date")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            family_members: row.try_get("family_members")?,
            marital_status: row.try_get("marital_status")?,
            previous_ward: row.try_get("previous_ward")?,
            previous_stake: row.try_get("previous_stake")?,
            move_in_date: row.try_get("move_in_date")?,
            is_homeowner: row.try_get("is_homeowner")?,
            is_renting: row.try_get("is_renting")?,
            skills: row.try_get("skills")?,
            interests: row.try_get("interests")?,
            calling_preferences: row.try_get("calling_preferences")?,
            additional_info: row.try_get("additional_info")?,
        },
        submitted_at: row.try_get("submitted_at")?,
        processed: row.try_get("processed")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<ResponseId, SurveyResponse> for PgResponses {
    async fn get(&self, key: ResponseId) -> Result<Option<SurveyResponse>, StoreError> {
        let row = sqlx::query("SELECT * FROM survey_responses WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(response_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<SurveyResponse>, StoreError> {
        let rows = sqlx::query("SELECT * FROM survey_responses ORDER BY submitted_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(response_from_row).collect()
    }

    async fn upsert(&self, key: ResponseId, value: SurveyResponse) -> Result<(), StoreError> {
        let s = &value.submission;
        sqlx::query(
            r#"
            INSERT INTO survey_responses
              (id, full_name, record_number, birth_date, email, phone, address,
               family_members, marital_status, previous_ward, previous_stake,
               move_in_date, is_homeowner, is_renting, skills, interests,
               calling_preferences, additional_info, submitted_at, processed,
               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22)
            ON CONFLICT (id) DO UPDATE SET
              full_name = EXCLUDED.full_name, record_number = EXCLUDED.record_number,
              birth_date = EXCLUDED.birth_date, email = EXCLUDED.email,
              phone = EXCLUDED.phone, address = EXCLUDED.address,
              family_members = EXCLUDED.family_members, marital_status = EXCLUDED.marital_status,
              previous_ward = EXCLUDED.previous_ward, previous_stake = EXCLUDED.previous_stake,
              move_in_date = EXCLUDED.move_in_date, is_homeowner = EXCLUDED.is_homeowner,
              is_renting = EXCLUDED.is_renting, skills = EXCLUDED.skills,
              interests = EXCLUDED.interests, calling_preferences = EXCLUDED.calling_preferences,
              additional_info = EXCLUDED.additional_info, processed = EXCLUDED.processed,
              updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(&s.full_name)
        .bind(&s.record_number)
        .bind(s.birth_date)
        .bind(&s.email)
        .bind(&s.phone)
        .bind(&s.address)
        .bind(&s.family_members)
        .bind(&s.marital_status)
        .bind(&s.previous_ward)
        .bind(&s.previous_stake)
        .bind(s.move_in_date)
        .bind(s.is_homeowner)
        .bind(s.is_renting)
        .bind(&s.skills)
        .bind(&s.interests)
        .bind(&s.calling_preferences)
        .bind(&s.additional_info)
        .bind(value.submitted_at)
        .bind(value.processed)
        .bind(value.created_at)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: ResponseId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM survey_responses WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM survey_responses")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// lcr_update_tasks
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgTasks {
    pool: PgPool,
}

impl PgTasks {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn task_from_row(row: &PgRow) -> Result<LcrTask, StoreError> {
    let kind: String = row.try_get("type")?;
    let details: serde_json::Value = row.try_get("details")?;
    Ok(LcrTask {
        id: TaskId::from_uuid(row.try_get("id")?),
        kind: match kind.as_str() {
            "calling_sustained" => LcrTaskKind::CallingSustained,
            "calling_set_apart" => LcrTaskKind::CallingSetApart,
            "new_member" => LcrTaskKind::NewMember,
            "released_from_calling" => LcrTaskKind::ReleasedFromCalling,
            "other" => LcrTaskKind::Other,
            other => return Err(bad_column("lcr_update_tasks.type", other)),
        },
        description: row.try_get("description")?,
        details: serde_json::from_value::<TaskDetails>(details).map_err(json_err)?,
        created_at: row.try_get("created_at")?,
        created_by: row.try_get("created_by")?,
        completed: row.try_get("completed")?,
        completed_at: row.try_get("completed_at")?,
        completed_by: row.try_get("completed_by")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<TaskId, LcrTask> for PgTasks {
    async fn get(&self, key: TaskId) -> Result<Option<LcrTask>, StoreError> {
        let row = sqlx::query("SELECT * FROM lcr_update_tasks WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(task_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<LcrTask>, StoreError> {
        let rows = sqlx::query("SELECT * FROM lcr_update_tasks ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn upsert(&self, key: TaskId, value: LcrTask) -> Result<(), StoreError> {
        let details = serde_json::to_value(&value.details).map_err(json_err)?;
        sqlx::query(
            r#"
            INSERT INTO lcr_update_tasks
              (id, type, description, details, created_at, created_by,
               completed, completed_at, completed_by, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
              type = EXCLUDED.type, description = EXCLUDED.description,
              details = EXCLUDED.details, completed = EXCLUDED.completed,
              completed_at = EXCLUDED.completed_at, completed_by = EXCLUDED.completed_by,
              updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(match value.kind {
            LcrTaskKind::CallingSustained => "calling_sustained",
            LcrTaskKind::CallingSetApart => "calling_set_apart",
            LcrTaskKind::NewMember => "new_member",
            LcrTaskKind::ReleasedFromCalling => "released_from_calling",
            LcrTaskKind::Other => "other",
        })
        .bind(&value.description)
        .bind(details)
        .bind(value.created_at)
        .bind(&value.created_by)
        .bind(value.completed)
        .bind(value.completed_at)
        .bind(&value.completed_by)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: TaskId) -> Result<bool, StoreError> {
        // Tasks are never deleted by the application; this exists to satisfy
        // the collection contract for admin tooling.
        let result = sqlx::query("DELETE FROM lcr_update_tasks WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM lcr_update_tasks")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// users
// ─────────────────────────────────────────────────────────────────────────────

pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<UserAccount, StoreError> {
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;
    let permissions: Option<serde_json::Value> = row.try_get("permissions")?;
    Ok(UserAccount {
        id: UserId::from_uuid(row.try_get("id")?),
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: role
            .parse::<Role>()
            .map_err(|_| bad_column("users.role", &role))?,
        permissions: permissions
            .map(serde_json::from_value::<Vec<Grant>>)
            .transpose()
            .map_err(json_err)?,
        status: match status.as_str() {
            "active" => AccountStatus::Active,
            "inactive" => AccountStatus::Inactive,
            other => return Err(bad_column("users.status", other)),
        },
        last_login: row.try_get("last_login")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl Collection<UserId, UserAccount> for PgUsers {
    async fn get(&self, key: UserId) -> Result<Option<UserAccount>, StoreError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = $1")
            .bind(key.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<UserAccount>, StoreError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(user_from_row).collect()
    }

    async fn upsert(&self, key: UserId, value: UserAccount) -> Result<(), StoreError> {
        let permissions = value
            .permissions
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(json_err)?;
        sqlx::query(
            r#"
            INSERT INTO users
              (id, email, name, role, permissions, status, last_login,
               password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
              email = EXCLUDED.email, name = EXCLUDED.name, role = EXCLUDED.role,
              permissions = EXCLUDED.permissions, status = EXCLUDED.status,
              last_login = EXCLUDED.last_login, password_hash = EXCLUDED.password_hash,
              updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key.as_uuid())
        .bind(&value.email)
        .bind(&value.name)
        .bind(value.role.as_str())
        .bind(permissions)
        .bind(match value.status {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
        })
        .bind(value.last_login)
        .bind(&value.password_hash)
        .bind(value.created_at)
        .bind(value.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, key: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(key.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get::<i64, _>(0)? as u64)
    }
}
