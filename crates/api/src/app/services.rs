//! Store wiring and workflow orchestration.
//!
//! Every multi-step flow in the application lives here: the routes stay
//! thin (parse, authorize, call, map). Task-producing flows issue the
//! follow-up task insert first and the record write second; a failure
//! between the two surfaces as an error with the task already queued,
//! which an operator can see and reconcile (a missing reminder cannot).

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use wardboard_auth::{Identity, Role, UserAccount};
use wardboard_calendar::{EventDraft, WardEvent};
use wardboard_callings::{side_effects, Calling, CallingDraft, CallingStatus, RuleContext};
use wardboard_core::{
    CallingId, DomainError, EventId, GroupId, MemberId, ResponseId, TaskId, UserId,
};
use wardboard_directory::{Member, MemberDraft};
use wardboard_groups::{FheGroup, GroupDraft};
use wardboard_infra::{
    credentials, Collection, CredentialError, InMemorySessionStore, MemCollection, SessionStore,
    SessionToken, StoreError,
};
use wardboard_survey::{member_draft_from_response, SurveyResponse, SurveySubmission};
use wardboard_tasks::{LcrTask, LcrTaskKind, TaskDetails, TaskDraft};

use crate::context::CurrentUser;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

type Store<K, V> = Arc<dyn Collection<K, V>>;

pub struct WardServices {
    members: Store<MemberId, Member>,
    callings: Store<CallingId, Calling>,
    groups: Store<GroupId, FheGroup>,
    events: Store<EventId, WardEvent>,
    responses: Store<ResponseId, SurveyResponse>,
    tasks: Store<TaskId, LcrTask>,
    users: Store<UserId, UserAccount>,
    sessions: Arc<dyn SessionStore>,
}

impl WardServices {
    /// All-in-memory wiring for dev and tests.
    pub fn in_memory() -> Self {
        Self {
            members: Arc::new(MemCollection::new()),
            callings: Arc::new(MemCollection::new()),
            groups: Arc::new(MemCollection::new()),
            events: Arc::new(MemCollection::new()),
            responses: Arc::new(MemCollection::new()),
            tasks: Arc::new(MemCollection::new()),
            users: Arc::new(MemCollection::new()),
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }

    /// Postgres-backed record stores. Sessions stay process-local:
    /// session state is established at sign-in and torn down at sign-out,
    /// never shared across processes.
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use wardboard_infra::store::postgres::{
            PgCallings, PgEvents, PgGroups, PgMembers, PgResponses, PgTasks, PgUsers,
        };
        Self {
            members: Arc::new(PgMembers::new(pool.clone())),
            callings: Arc::new(PgCallings::new(pool.clone())),
            groups: Arc::new(PgGroups::new(pool.clone())),
            events: Arc::new(PgEvents::new(pool.clone())),
            responses: Arc::new(PgResponses::new(pool.clone())),
            tasks: Arc::new(PgTasks::new(pool.clone())),
            users: Arc::new(PgUsers::new(pool)),
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }

    // ------------------------------------------------------------------
    // auth
    // ------------------------------------------------------------------

    /// Verify credentials, stamp last-login, and open a session.
    ///
    /// Unknown email, wrong password, and inactive account all collapse
    /// to the same `Unauthorized` so the response leaks nothing.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<(SessionToken, Identity)> {
        let email = email.trim().to_lowercase();
        let mut user = self
            .users
            .list()
            .await?
            .into_iter()
            .find(|u| u.email == email)
            .ok_or(DomainError::Unauthorized)?;

        if user.status != wardboard_auth::AccountStatus::Active {
            return Err(DomainError::Unauthorized.into());
        }
        if !credentials::verify_password(password, &user.password_hash)? {
            return Err(DomainError::Unauthorized.into());
        }

        user.record_login(Utc::now());
        self.users.upsert(user.id, user.clone()).await?;

        let token = self.sessions.open(user.id).await?;
        tracing::info!(user = %user.email, "signed in");
        Ok((token, user.identity()))
    }

    pub async fn sign_out(&self, token: &SessionToken) -> ServiceResult<()> {
        self.sessions.close(token).await?;
        Ok(())
    }

    /// Resolve a bearer token to the operator behind it. `None` covers
    /// unknown tokens, deleted accounts, and deactivated accounts alike.
    pub async fn current_user(&self, token: &SessionToken) -> ServiceResult<Option<CurrentUser>> {
        let Some(user_id) = self.sessions.resolve(token).await? else {
            return Ok(None);
        };
        let Some(user) = self.users.get(user_id).await? else {
            return Ok(None);
        };
        if user.status != wardboard_auth::AccountStatus::Active {
            return Ok(None);
        }
        Ok(Some(CurrentUser::new(user.identity())))
    }

    // ------------------------------------------------------------------
    // members
    // ------------------------------------------------------------------

    pub async fn list_members(&self) -> ServiceResult<Vec<Member>> {
        let mut members = self.members.list().await?;
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    pub async fn unassigned_members(&self) -> ServiceResult<Vec<Member>> {
        Ok(self
            .list_members()
            .await?
            .into_iter()
            .filter(|m| m.fhe_group.is_none())
            .collect())
    }

    pub async fn get_member(&self, id: MemberId) -> ServiceResult<Member> {
        self.members
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn create_member(&self, draft: MemberDraft) -> ServiceResult<Member> {
        let member = Member::create(MemberId::new(), draft, Utc::now())?;
        self.members.upsert(member.id, member.clone()).await?;
        Ok(member)
    }

    pub async fn update_member(&self, id: MemberId, draft: MemberDraft) -> ServiceResult<Member> {
        let mut member = self.get_member(id).await?;
        member.apply(draft, Utc::now())?;
        self.members.upsert(member.id, member.clone()).await?;
        Ok(member)
    }

    /// Delete a member, vacating any calling they hold first. The vacate
    /// writes produce no follow-up tasks; a deletion is not a release.
    pub async fn delete_member(&self, id: MemberId) -> ServiceResult<()> {
        let _ = self.get_member(id).await?;

        let now = Utc::now();
        for mut calling in self.callings.list().await? {
            if calling.member == Some(id) {
                calling.vacate(now);
                self.callings.upsert(calling.id, calling).await?;
            }
        }

        self.members.delete(id).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // callings
    // ------------------------------------------------------------------

    pub async fn list_callings(&self) -> ServiceResult<Vec<Calling>> {
        let mut callings = self.callings.list().await?;
        callings.sort_by(|a, b| (&a.organization, &a.title).cmp(&(&b.organization, &b.title)));
        Ok(callings)
    }

    pub async fn vacant_callings(&self) -> ServiceResult<Vec<Calling>> {
        Ok(self
            .list_callings()
            .await?
            .into_iter()
            .filter(|c| c.status == CallingStatus::Vacant)
            .collect())
    }

    pub async fn get_calling(&self, id: CallingId) -> ServiceResult<Calling> {
        self.callings
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn create_calling(&self, draft: CallingDraft) -> ServiceResult<Calling> {
        let calling = Calling::create(CallingId::new(), draft, Utc::now())?;
        self.callings.upsert(calling.id, calling.clone()).await?;
        Ok(calling)
    }

    /// Edit-form path: apply the draft and fire the sustained / set-apart
    /// transition rules against the stored previous values.
    pub async fn update_calling(
        &self,
        id: CallingId,
        draft: CallingDraft,
        actor: &CurrentUser,
    ) -> ServiceResult<Calling> {
        let prev = self.get_calling(id).await?;
        let now = Utc::now();

        let mut next = prev.clone();
        next.apply(draft, now)?;

        let member_name = match next.member {
            Some(member_id) => self.members.get(member_id).await?.map(|m| m.name),
            None => None,
        };
        let ctx = RuleContext {
            member_name: member_name.as_deref(),
            actor_name: actor.display_name(),
            today: now.date_naive(),
        };

        for draft in side_effects(&prev, &next, &ctx) {
            self.insert_task(draft, actor, now).await?;
        }
        self.callings.upsert(next.id, next.clone()).await?;
        Ok(next)
    }

    /// Dedicated assignment flow: only valid on a vacant calling, always
    /// produces a sustained task.
    pub async fn assign_calling(
        &self,
        id: CallingId,
        member_id: MemberId,
        actor: &CurrentUser,
    ) -> ServiceResult<Calling> {
        let mut calling = self.get_calling(id).await?;
        let member = self.get_member(member_id).await?;
        let now = Utc::now();

        let draft = calling.assign(member_id, &member.name, now)?;
        self.insert_task(draft, actor, now).await?;
        self.callings.upsert(calling.id, calling.clone()).await?;
        Ok(calling)
    }

    /// Dedicated release flow: vacates the calling and produces a
    /// released task for the former holder.
    pub async fn release_calling(
        &self,
        id: CallingId,
        actor: &CurrentUser,
    ) -> ServiceResult<Calling> {
        let mut calling = self.get_calling(id).await?;
        let member_id = calling
            .member
            .ok_or_else(|| DomainError::invariant("calling has no member to release"))?;
        let member = self.get_member(member_id).await?;
        let now = Utc::now();

        let draft = calling.release(&member.name, now)?;
        self.insert_task(draft, actor, now).await?;
        self.callings.upsert(calling.id, calling.clone()).await?;
        Ok(calling)
    }

    pub async fn delete_calling(&self, id: CallingId) -> ServiceResult<()> {
        if !self.callings.delete(id).await? {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // fhe groups
    // ------------------------------------------------------------------

    pub async fn list_groups(&self) -> ServiceResult<Vec<FheGroup>> {
        let mut groups = self.groups.list().await?;
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    pub async fn get_group(&self, id: GroupId) -> ServiceResult<FheGroup> {
        self.groups
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn create_group(&self, draft: GroupDraft) -> ServiceResult<FheGroup> {
        let group = FheGroup::create(GroupId::new(), draft, Utc::now())?;
        self.groups.upsert(group.id, group.clone()).await?;
        Ok(group)
    }

    pub async fn update_group(&self, id: GroupId, draft: GroupDraft) -> ServiceResult<FheGroup> {
        let mut group = self.get_group(id).await?;
        group.apply(draft, Utc::now())?;
        self.groups.upsert(group.id, group.clone()).await?;
        Ok(group)
    }

    /// Delete a group and unlink every member assigned to it.
    pub async fn delete_group(&self, id: GroupId) -> ServiceResult<()> {
        let _ = self.get_group(id).await?;

        let now = Utc::now();
        for mut member in self.members.list().await? {
            if member.fhe_group == Some(id) {
                member.set_group(None, now);
                self.members.upsert(member.id, member).await?;
            }
        }

        self.groups.delete(id).await?;
        Ok(())
    }

    /// Members assigned to the given group.
    pub async fn group_roster(&self, id: GroupId) -> ServiceResult<Vec<Member>> {
        let _ = self.get_group(id).await?;
        Ok(self
            .list_members()
            .await?
            .into_iter()
            .filter(|m| m.fhe_group == Some(id))
            .collect())
    }

    pub async fn add_group_member(&self, id: GroupId, member_id: MemberId) -> ServiceResult<()> {
        let _ = self.get_group(id).await?;
        let mut member = self.get_member(member_id).await?;
        member.set_group(Some(id), Utc::now());
        self.members.upsert(member.id, member).await?;
        Ok(())
    }

    pub async fn remove_group_member(&self, id: GroupId, member_id: MemberId) -> ServiceResult<()> {
        let _ = self.get_group(id).await?;
        let mut member = self.get_member(member_id).await?;
        if member.fhe_group != Some(id) {
            return Err(DomainError::validation("member is not in this group").into());
        }
        member.set_group(None, Utc::now());
        self.members.upsert(member.id, member).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // calendar
    // ------------------------------------------------------------------

    pub async fn list_events(&self) -> ServiceResult<Vec<WardEvent>> {
        let mut events = self.events.list().await?;
        events.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(events)
    }

    pub async fn get_event(&self, id: EventId) -> ServiceResult<WardEvent> {
        self.events
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn create_event(&self, draft: EventDraft) -> ServiceResult<WardEvent> {
        let event = WardEvent::create(EventId::new(), draft, Utc::now())?;
        self.events.upsert(event.id, event.clone()).await?;
        Ok(event)
    }

    pub async fn update_event(&self, id: EventId, draft: EventDraft) -> ServiceResult<WardEvent> {
        let mut event = self.get_event(id).await?;
        event.apply(draft, Utc::now())?;
        self.events.upsert(event.id, event.clone()).await?;
        Ok(event)
    }

    pub async fn delete_event(&self, id: EventId) -> ServiceResult<()> {
        if !self.events.delete(id).await? {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // survey
    // ------------------------------------------------------------------

    pub async fn submit_response(
        &self,
        submission: SurveySubmission,
    ) -> ServiceResult<SurveyResponse> {
        let response = SurveyResponse::create(ResponseId::new(), submission, Utc::now())?;
        self.responses.upsert(response.id, response.clone()).await?;
        Ok(response)
    }

    pub async fn list_responses(&self) -> ServiceResult<Vec<SurveyResponse>> {
        let mut responses = self.responses.list().await?;
        responses.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(responses)
    }

    pub async fn get_response(&self, id: ResponseId) -> ServiceResult<SurveyResponse> {
        self.responses
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn set_response_processed(
        &self,
        id: ResponseId,
        processed: bool,
    ) -> ServiceResult<SurveyResponse> {
        let mut response = self.get_response(id).await?;
        response.set_processed(processed, Utc::now());
        self.responses.upsert(response.id, response.clone()).await?;
        Ok(response)
    }

    /// Create a directory entry from an intake submission: contact fields
    /// copied over, a "new member" follow-up task queued, and the source
    /// response marked processed. The response itself is kept.
    pub async fn create_member_from_response(
        &self,
        id: ResponseId,
        actor: &CurrentUser,
    ) -> ServiceResult<Member> {
        let mut response = self.get_response(id).await?;
        if response.processed {
            return Err(
                DomainError::validation("response has already been processed").into(),
            );
        }

        let now = Utc::now();
        let member = Member::create(MemberId::new(), member_draft_from_response(&response), now)?;
        self.members.upsert(member.id, member.clone()).await?;

        let draft = TaskDraft {
            kind: LcrTaskKind::NewMember,
            description: format!("{} was added as a new member", member.name),
            details: TaskDetails {
                member_id: Some(member.id),
                member_name: Some(member.name.clone()),
                calling_id: None,
                calling_title: None,
                date: Some(now.date_naive()),
                notes: Some("Added from survey response".to_string()),
            },
        };
        self.insert_task(draft, actor, now).await?;

        response.set_processed(true, now);
        self.responses.upsert(response.id, response).await?;
        Ok(member)
    }

    // ------------------------------------------------------------------
    // follow-up tasks
    // ------------------------------------------------------------------

    /// Newest first; `completed = None` lists everything.
    pub async fn list_tasks(&self, completed: Option<bool>) -> ServiceResult<Vec<LcrTask>> {
        let mut tasks = self.tasks.list().await?;
        if let Some(completed) = completed {
            tasks.retain(|t| t.completed == completed);
        }
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    pub async fn get_task(&self, id: TaskId) -> ServiceResult<LcrTask> {
        self.tasks
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn complete_task(&self, id: TaskId, actor: &CurrentUser) -> ServiceResult<LcrTask> {
        let mut task = self.get_task(id).await?;
        task.complete(actor.display_name(), Utc::now());
        self.tasks.upsert(task.id, task.clone()).await?;
        Ok(task)
    }

    pub async fn reopen_task(&self, id: TaskId) -> ServiceResult<LcrTask> {
        let mut task = self.get_task(id).await?;
        task.reopen(Utc::now());
        self.tasks.upsert(task.id, task.clone()).await?;
        Ok(task)
    }

    async fn insert_task(
        &self,
        draft: TaskDraft,
        actor: &CurrentUser,
        now: chrono::DateTime<Utc>,
    ) -> ServiceResult<LcrTask> {
        let task = LcrTask::from_draft(draft, actor.display_name(), now);
        tracing::info!(kind = ?task.kind, description = %task.description, "queued follow-up task");
        self.tasks.upsert(task.id, task.clone()).await?;
        Ok(task)
    }

    // ------------------------------------------------------------------
    // users
    // ------------------------------------------------------------------

    pub async fn list_users(&self) -> ServiceResult<Vec<UserAccount>> {
        let mut users = self.users.list().await?;
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    pub async fn get_user(&self, id: UserId) -> ServiceResult<UserAccount> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: Role,
        password: &str,
    ) -> ServiceResult<UserAccount> {
        let email_normalized = email.trim().to_lowercase();
        if self
            .users
            .list()
            .await?
            .iter()
            .any(|u| u.email == email_normalized)
        {
            return Err(DomainError::validation("email is already in use").into());
        }

        let hash = credentials::hash_password(password)?;
        let user = UserAccount::new(UserId::new(), email, name, role, hash, Utc::now())?;
        self.users.upsert(user.id, user.clone()).await?;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: UserId,
        name: Option<String>,
        role: Option<Role>,
        status: Option<wardboard_auth::AccountStatus>,
        password: Option<String>,
    ) -> ServiceResult<UserAccount> {
        let mut user = self.get_user(id).await?;
        let now = Utc::now();

        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(DomainError::validation("display name cannot be empty").into());
            }
            user.name = name;
        }
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(status) = status {
            user.status = status;
        }
        if let Some(password) = password {
            user.password_hash = credentials::hash_password(&password)?;
        }
        user.updated_at = now;

        self.users.upsert(user.id, user.clone()).await?;
        Ok(user)
    }

    /// Replace an account's grant set; `None` restores role defaults.
    pub async fn set_user_grants(
        &self,
        id: UserId,
        grants: Option<Vec<wardboard_auth::Grant>>,
    ) -> ServiceResult<UserAccount> {
        let mut user = self.get_user(id).await?;
        user.set_grants(grants, Utc::now());
        self.users.upsert(user.id, user.clone()).await?;
        Ok(user)
    }

    /// Operators cannot delete their own account out from under their
    /// session.
    pub async fn delete_user(&self, id: UserId, actor: &CurrentUser) -> ServiceResult<()> {
        if id == actor.user_id() {
            return Err(DomainError::validation("cannot delete your own account").into());
        }
        if !self.users.delete(id).await? {
            return Err(DomainError::not_found().into());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // dashboard
    // ------------------------------------------------------------------

    pub async fn dashboard_counts(&self) -> ServiceResult<crate::app::dto::DashboardCounts> {
        let vacant_callings = self.vacant_callings().await?.len() as u64;
        let pending_tasks = self.list_tasks(Some(false)).await?.len() as u64;
        let unprocessed_responses = self
            .list_responses()
            .await?
            .iter()
            .filter(|r| !r.processed)
            .count() as u64;

        Ok(crate::app::dto::DashboardCounts {
            members: self.members.count().await?,
            callings: self.callings.count().await?,
            vacant_callings,
            fhe_groups: self.groups.count().await?,
            events: self.events.count().await?,
            pending_tasks,
            unprocessed_responses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wardboard_auth::AccountStatus;

    fn actor() -> CurrentUser {
        CurrentUser::new(Identity {
            user_id: UserId::new(),
            email: "clerk@example.org".to_string(),
            display_name: "Ward Clerk".to_string(),
            role: Role::WardClerk,
            permissions: None,
        })
    }

    async fn seed_member(svc: &WardServices, name: &str) -> Member {
        svc.create_member(MemberDraft {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    async fn seed_vacant_calling(svc: &WardServices, title: &str) -> Calling {
        svc.create_calling(CallingDraft {
            title: title.to_string(),
            organization: "Elders Quorum".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn assign_fills_calling_and_queues_sustained_task() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Orson Pratt").await;
        let calling = seed_vacant_calling(&svc, "Ward Mission Leader").await;

        let updated = svc.assign_calling(calling.id, member.id, &actor).await.unwrap();

        assert_eq!(updated.status, CallingStatus::Filled);
        assert_eq!(updated.member, Some(member.id));
        assert_eq!(updated.sustained_date, Some(Utc::now().date_naive()));

        let tasks = svc.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind, LcrTaskKind::CallingSustained);
        assert_eq!(
            tasks[0].description,
            "Orson Pratt was sustained as Ward Mission Leader"
        );
        assert_eq!(tasks[0].created_by, "Ward Clerk");
    }

    #[tokio::test]
    async fn assign_to_filled_calling_is_rejected_and_queues_nothing() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let a = seed_member(&svc, "First Holder").await;
        let b = seed_member(&svc, "Second Hopeful").await;
        let calling = seed_vacant_calling(&svc, "Clerk").await;

        svc.assign_calling(calling.id, a.id, &actor).await.unwrap();
        let err = svc.assign_calling(calling.id, b.id, &actor).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvariantViolation(_))
        ));
        assert_eq!(svc.list_tasks(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn release_vacates_and_queues_released_task() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Jane Manning").await;
        let calling = seed_vacant_calling(&svc, "Relief Society President").await;
        svc.assign_calling(calling.id, member.id, &actor).await.unwrap();

        let released = svc.release_calling(calling.id, &actor).await.unwrap();

        assert_eq!(released.status, CallingStatus::Vacant);
        assert_eq!(released.member, None);
        assert_eq!(released.sustained_date, None);
        assert!(!released.is_set_apart);

        let tasks = svc.list_tasks(None).await.unwrap();
        let released_task = tasks
            .iter()
            .find(|t| t.kind == LcrTaskKind::ReleasedFromCalling)
            .unwrap();
        assert_eq!(released_task.details.member_id, Some(member.id));
        assert_eq!(
            released_task.description,
            "Jane Manning was released from Relief Society President"
        );
    }

    #[tokio::test]
    async fn edit_with_sustained_date_queues_exactly_one_task() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Eliza Snow").await;
        let calling = seed_vacant_calling(&svc, "Primary President").await;

        let draft = CallingDraft {
            title: calling.title.clone(),
            organization: calling.organization.clone(),
            status: CallingStatus::Filled,
            member: Some(member.id),
            sustained_date: Some(NaiveDate::from_ymd_opt(2026, 8, 2).unwrap()),
            is_set_apart: false,
            notes: None,
        };
        svc.update_calling(calling.id, draft.clone(), &actor).await.unwrap();

        let tasks = svc.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind, LcrTaskKind::CallingSustained);
        assert_eq!(
            tasks[0].details.date,
            Some(NaiveDate::from_ymd_opt(2026, 8, 2).unwrap())
        );

        // Unrelated edit: same sustained date, new notes. No new task.
        let draft = CallingDraft {
            notes: Some("meets with bishopric monthly".to_string()),
            ..draft
        };
        svc.update_calling(calling.id, draft, &actor).await.unwrap();
        assert_eq!(svc.list_tasks(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edit_set_apart_transition_queues_task_once() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Parley Pratt").await;
        let calling = seed_vacant_calling(&svc, "Sunday School President").await;
        svc.assign_calling(calling.id, member.id, &actor).await.unwrap();

        let current = svc.get_calling(calling.id).await.unwrap();
        let draft = CallingDraft {
            title: current.title.clone(),
            organization: current.organization.clone(),
            status: current.status,
            member: current.member,
            sustained_date: current.sustained_date,
            is_set_apart: true,
            notes: None,
        };
        svc.update_calling(calling.id, draft.clone(), &actor).await.unwrap();

        let set_apart: Vec<_> = svc
            .list_tasks(None)
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == LcrTaskKind::CallingSetApart)
            .collect();
        assert_eq!(set_apart.len(), 1);

        // true -> true does not fire again.
        svc.update_calling(calling.id, draft, &actor).await.unwrap();
        let set_apart = svc
            .list_tasks(None)
            .await
            .unwrap()
            .into_iter()
            .filter(|t| t.kind == LcrTaskKind::CallingSetApart)
            .count();
        assert_eq!(set_apart, 1);
    }

    #[tokio::test]
    async fn delete_member_vacates_callings_without_tasks() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Departing Member").await;
        let calling = seed_vacant_calling(&svc, "Ward Greeter").await;
        svc.assign_calling(calling.id, member.id, &actor).await.unwrap();
        let tasks_before = svc.list_tasks(None).await.unwrap().len();

        svc.delete_member(member.id).await.unwrap();

        let calling = svc.get_calling(calling.id).await.unwrap();
        assert_eq!(calling.status, CallingStatus::Vacant);
        assert_eq!(calling.member, None);
        assert!(matches!(
            svc.get_member(member.id).await.unwrap_err(),
            ServiceError::Domain(DomainError::NotFound)
        ));
        // The cascade is a deletion, not a release.
        assert_eq!(svc.list_tasks(None).await.unwrap().len(), tasks_before);
    }

    #[tokio::test]
    async fn survey_to_member_round_trip() {
        let svc = WardServices::in_memory();
        let actor = actor();

        let response = svc
            .submit_response(SurveySubmission {
                full_name: "Newell Whitney".to_string(),
                email: Some("newell@example.org".to_string()),
                phone: Some("555-0142".to_string()),
                address: Some("12 Kirtland Rd".to_string()),
                skills: Some("bookkeeping, carpentry".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!response.processed);

        let member = svc
            .create_member_from_response(response.id, &actor)
            .await
            .unwrap();
        assert_eq!(member.name, "Newell Whitney");
        assert_eq!(member.email.as_deref(), Some("newell@example.org"));
        assert_eq!(member.phone.as_deref(), Some("555-0142"));
        assert_eq!(member.address.as_deref(), Some("12 Kirtland Rd"));
        assert_eq!(member.skills, vec!["bookkeeping", "carpentry"]);

        let response = svc.get_response(response.id).await.unwrap();
        assert!(response.processed);

        let tasks = svc.list_tasks(None).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].kind, LcrTaskKind::NewMember);
        assert_eq!(tasks[0].details.member_id, Some(member.id));

        // Second attempt on the processed response is rejected.
        let err = svc
            .create_member_from_response(response.id, &actor)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn task_complete_and_reopen_stamping() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Brother Brown").await;
        let calling = seed_vacant_calling(&svc, "Executive Secretary").await;
        svc.assign_calling(calling.id, member.id, &actor).await.unwrap();

        let task = svc.list_tasks(Some(false)).await.unwrap().remove(0);
        let done = svc.complete_task(task.id, &actor).await.unwrap();
        assert!(done.completed);
        assert_eq!(done.completed_by.as_deref(), Some("Ward Clerk"));
        assert!(done.completed_at.is_some());
        assert!(svc.list_tasks(Some(false)).await.unwrap().is_empty());

        let reopened = svc.reopen_task(task.id).await.unwrap();
        assert!(!reopened.completed);
        assert_eq!(reopened.completed_by, None);
        assert_eq!(reopened.completed_at, None);
    }

    #[tokio::test]
    async fn sign_in_and_out() {
        let svc = WardServices::in_memory();
        let user = svc
            .create_user("Bishop@Example.org", "Bishop Partridge", Role::Bishopric, "hunter2!")
            .await
            .unwrap();
        assert_eq!(user.email, "bishop@example.org");

        let err = svc.sign_in("bishop@example.org", "wrong").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Unauthorized)
        ));

        let (token, identity) = svc.sign_in("bishop@example.org", "hunter2!").await.unwrap();
        assert_eq!(identity.role, Role::Bishopric);

        let current = svc.current_user(&token).await.unwrap().unwrap();
        assert_eq!(current.user_id(), user.id);

        let stamped = svc.get_user(user.id).await.unwrap();
        assert!(stamped.last_login.is_some());

        svc.sign_out(&token).await.unwrap();
        assert!(svc.current_user(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn inactive_account_cannot_sign_in_or_keep_session() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let user = svc
            .create_user("former@example.org", "Former Clerk", Role::WardClerk, "pw-123456")
            .await
            .unwrap();
        let (token, _) = svc.sign_in("former@example.org", "pw-123456").await.unwrap();

        svc.update_user(user.id, None, None, Some(AccountStatus::Inactive), None)
            .await
            .unwrap();

        // Existing session dies with the deactivation.
        assert!(svc.current_user(&token).await.unwrap().is_none());
        let err = svc.sign_in("former@example.org", "pw-123456").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Unauthorized)
        ));
        let _ = actor;
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let svc = WardServices::in_memory();
        svc.create_user("clerk@example.org", "Clerk One", Role::WardClerk, "pw-123456")
            .await
            .unwrap();
        let err = svc
            .create_user("CLERK@example.org", "Clerk Two", Role::WardClerk, "pw-abcdef")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn cannot_delete_own_account() {
        let svc = WardServices::in_memory();
        let user = svc
            .create_user("admin@example.org", "Admin", Role::Admin, "pw-123456")
            .await
            .unwrap();
        let me = CurrentUser::new(user.identity());
        let err = svc.delete_user(user.id, &me).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn group_membership_and_roster() {
        let svc = WardServices::in_memory();
        let member = seed_member(&svc, "Grouped Member").await;
        let group = svc
            .create_group(GroupDraft {
                name: "North FHE Group".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        svc.add_group_member(group.id, member.id).await.unwrap();
        let roster = svc.group_roster(group.id).await.unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, member.id);
        assert!(svc.unassigned_members().await.unwrap().is_empty());

        svc.delete_group(group.id).await.unwrap();
        let member = svc.get_member(member.id).await.unwrap();
        assert_eq!(member.fhe_group, None);
    }

    #[tokio::test]
    async fn dashboard_counts_reflect_state() {
        let svc = WardServices::in_memory();
        let actor = actor();
        let member = seed_member(&svc, "Counted Member").await;
        let filled = seed_vacant_calling(&svc, "Filled Calling").await;
        let _vacant = seed_vacant_calling(&svc, "Vacant Calling").await;
        svc.assign_calling(filled.id, member.id, &actor).await.unwrap();
        svc.submit_response(SurveySubmission {
            full_name: "Pending Response".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

        let counts = svc.dashboard_counts().await.unwrap();
        assert_eq!(counts.members, 1);
        assert_eq!(counts.callings, 2);
        assert_eq!(counts.vacant_callings, 1);
        assert_eq!(counts.pending_tasks, 1);
        assert_eq!(counts.unprocessed_responses, 1);
    }
}
