//! The controller that owns all application state.
//!
//! `Tickit` holds the store, the task repository, the user profile and the
//! progression engine. Every mutation goes through it: it applies the change,
//! runs the progression rules, persists both entities and publishes events.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, TickitError};
use crate::events::{event_bus, AppEvent, EventRx, EventTx};
use crate::fields::Status;
use crate::profile::UserProfile;
use crate::progression::{ProgressionEngine, StreakOutcome};
use crate::repository::{TaskChange, TaskQuery, TaskRepository};
use crate::store::{self, KeyValueStore, TASKS_KEY, USER_KEY};
use crate::suggest::TaskBreakdown;
use crate::task::{SubTask, Task, TaskDraft, TaskPatch};

/// Application state and the single writer for it.
pub struct Tickit<S: KeyValueStore> {
    store: S,
    repo: TaskRepository,
    profile: UserProfile,
    engine: ProgressionEngine,
    events: EventTx,
    outbox: Vec<AppEvent>,
}

impl<S: KeyValueStore> Tickit<S> {
    /// Load tasks and profile from `store`. Missing or malformed entries fall
    /// back to an empty collection and a fresh profile named `user_name`.
    pub fn load(store: S, engine: ProgressionEngine, user_name: &str, now: DateTime<Utc>) -> Self {
        let tasks: Vec<Task> = store::load_or_default(&store, TASKS_KEY, Vec::new);
        let profile = store::load_or_default(&store, USER_KEY, || UserProfile::new(user_name, now));
        let profile = engine.sync_badges(&profile);
        let (events, _) = event_bus();
        debug!(tasks = tasks.len(), level = profile.level, "loaded state");
        Tickit {
            store,
            repo: TaskRepository::from_tasks(tasks),
            profile,
            engine,
            events,
            outbox: Vec::new(),
        }
    }

    /// Load state and start a session at `now`.
    pub fn open<Tz: TimeZone>(
        store: S,
        engine: ProgressionEngine,
        user_name: &str,
        now: &DateTime<Tz>,
    ) -> Result<Self> {
        let mut app = Self::load(store, engine, user_name, now.with_timezone(&Utc));
        app.start_session(now)?;
        Ok(app)
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> EventRx {
        self.events.subscribe()
    }

    pub fn tasks(&self) -> &[Task] {
        self.repo.tasks()
    }

    pub fn repository(&self) -> &TaskRepository {
        &self.repo
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn engine(&self) -> &ProgressionEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn task(&self, id: Uuid) -> Option<&Task> {
        self.repo.get(id)
    }

    pub fn resolve(&self, reference: &str) -> Result<Uuid> {
        self.repo.resolve(reference)
    }

    pub fn query(&self, query: &TaskQuery, today: NaiveDate) -> Vec<&Task> {
        self.repo.query(query, today)
    }

    /// Evaluate the daily streak and any badges it unlocks.
    pub fn start_session<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<StreakOutcome> {
        self.transaction(|app| {
            let first_run = app.store.get(USER_KEY).is_none();
            let update = app.engine.evaluate_streak(&app.profile, now);
            if update.profile.streak != app.profile.streak {
                app.emit(AppEvent::StreakChanged {
                    streak: update.profile.streak,
                });
            }
            let changed = update.profile != app.profile;
            app.profile = update.profile;
            let unlocked = app.unlock_badges(now.with_timezone(&Utc));
            if first_run || changed || unlocked {
                app.save_profile()?;
            }
            Ok(update.outcome)
        })
    }

    /// Create a task and persist the collection.
    pub fn add_task(
        &mut self,
        draft: TaskDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        self.transaction(|app| {
            let task = app.repo.create(draft, today, now).clone();
            app.save_tasks()?;
            app.emit(AppEvent::TaskCreated(task.id));
            Ok(task)
        })
    }

    /// Merge `patch` into a task. A first completion credits the task's XP to
    /// the profile.
    ///
    /// The task collection, which records the reward as paid, is written
    /// before the profile. A failed write leaves the in-memory state as it
    /// was, and a partial write can lose a reward but never pay it twice.
    pub fn update_task(
        &mut self,
        id: Uuid,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<TaskChange> {
        self.transaction(|app| app.apply_update(id, patch, now))
    }

    pub fn complete_task(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<TaskChange> {
        self.update_task(id, TaskPatch::status(Status::Completed), now)
    }

    /// Move a task back to TODO. With `reset_reward` its XP can be earned again.
    pub fn reopen_task(
        &mut self,
        id: Uuid,
        reset_reward: bool,
        now: DateTime<Utc>,
    ) -> Result<TaskChange> {
        self.transaction(|app| {
            if reset_reward {
                app.repo.reset_reward(id)?;
            }
            app.apply_update(id, TaskPatch::status(Status::Todo), now)
        })
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<Task> {
        self.transaction(|app| {
            let task = app.repo.delete(id)?;
            app.save_tasks()?;
            app.emit(AppEvent::TaskDeleted(id));
            Ok(task)
        })
    }

    pub fn add_subtask(&mut self, id: Uuid, title: &str) -> Result<SubTask> {
        self.transaction(|app| {
            let sub = app.repo.add_subtask(id, title)?;
            app.save_tasks()?;
            app.emit(AppEvent::TaskUpdated(id));
            Ok(sub)
        })
    }

    pub fn toggle_subtask(&mut self, id: Uuid, index: usize) -> Result<SubTask> {
        self.transaction(|app| {
            let sub = app.repo.toggle_subtask(id, index)?;
            app.save_tasks()?;
            app.emit(AppEvent::TaskUpdated(id));
            Ok(sub)
        })
    }

    /// Append suggested subtasks and adopt the suggested priority when it parses.
    pub fn apply_breakdown(
        &mut self,
        id: Uuid,
        breakdown: &TaskBreakdown,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let current = self
            .repo
            .get(id)
            .ok_or_else(|| TickitError::TaskNotFound(id.to_string()))?;
        let mut subtasks = current.subtasks.clone();
        subtasks.extend(
            breakdown
                .subtasks
                .iter()
                .map(|s| s.title.trim())
                .filter(|t| !t.is_empty())
                .map(SubTask::new),
        );
        let patch = TaskPatch {
            subtasks: Some(subtasks),
            priority: breakdown.priority(),
            ..Default::default()
        };
        Ok(self.update_task(id, patch, now)?.task)
    }

    /// Run `f` against the live state. On error the repository and profile
    /// are restored and queued events are dropped; on success they are sent.
    fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let repo = self.repo.clone();
        let profile = self.profile.clone();
        self.outbox.clear();
        match f(self) {
            Ok(value) => {
                for event in std::mem::take(&mut self.outbox) {
                    // No subscribers is fine.
                    let _ = self.events.send(event);
                }
                Ok(value)
            }
            Err(e) => {
                debug!(error = %e, "mutation failed, state left unchanged");
                self.repo = repo;
                self.profile = profile;
                self.outbox.clear();
                Err(e)
            }
        }
    }

    fn apply_update(
        &mut self,
        id: Uuid,
        patch: TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<TaskChange> {
        let change = self.repo.update(id, patch, now)?;
        if let Some(xp) = change.reward {
            self.grant_xp(xp, now);
        }
        self.save_tasks()?;
        if change.reward.is_some() {
            self.save_profile()?;
        }

        if change.completed_now() {
            self.emit(AppEvent::TaskCompleted {
                id,
                xp: change.reward.unwrap_or(0),
            });
        } else {
            self.emit(AppEvent::TaskUpdated(id));
        }
        Ok(change)
    }

    fn grant_xp(&mut self, amount: u32, now: DateTime<Utc>) {
        let grant = self.engine.grant_xp(&self.profile, amount);
        self.profile = grant.profile;
        self.emit(AppEvent::XpGained {
            amount,
            level: self.profile.level,
            xp: self.profile.xp,
        });
        if grant.levels_gained > 0 {
            info!(level = self.profile.level, "reached new level");
            self.emit(AppEvent::LevelUp {
                level: self.profile.level,
            });
        }
        self.unlock_badges(now);
    }

    /// Returns whether any badge was unlocked.
    fn unlock_badges(&mut self, now: DateTime<Utc>) -> bool {
        let (profile, unlocked) = self.engine.evaluate_badges(&self.profile, now);
        self.profile = profile;
        let any = !unlocked.is_empty();
        for badge in unlocked {
            self.emit(AppEvent::BadgeUnlocked(badge));
        }
        any
    }

    fn save_tasks(&mut self) -> Result<()> {
        store::save(&mut self.store, TASKS_KEY, &self.repo.tasks())
    }

    fn save_profile(&mut self) -> Result<()> {
        store::save(&mut self.store, USER_KEY, &self.profile)
    }

    /// Queue an event for the end of the current transaction.
    fn emit(&mut self, event: AppEvent) {
        self.outbox.push(event);
    }
}
