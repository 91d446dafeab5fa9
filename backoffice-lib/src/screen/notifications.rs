//! Notification center
//!
//! Builds the notification list from pending working hours, pending
//! rosters and confirmed rosters coming up soon. Read and dismissed flags
//! are kept locally and survive rebuilds.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Days;
use chrono::NaiveDate;
use chrono::Utc;
use log::debug;
use log::warn;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::error::StoreError;
use crate::model::Client;
use crate::model::Entity;
use crate::model::Notification;
use crate::model::NotificationKind;
use crate::model::Priority;
use crate::model::Profile;
use crate::model::Project;
use crate::model::Roster;
use crate::model::RosterStatus;
use crate::model::WorkingHours;
use crate::model::WorkingHoursStatus;
use crate::query::Filter;
use crate::query::OrderBy;
use crate::query::Query;
use crate::store::ChangeKind;
use crate::store::RemoteStore;

use super::controller::Fetched;
use super::notify::Notifier;
use super::notify::Toast;
use super::realtime::Watcher;
use super::sequence::RequestSequencer;

/// Rows a notification list is built from.
#[derive(Debug, Clone, Default)]
pub struct NotificationSources {
    pub pending_hours: Vec<WorkingHours>,
    pub pending_rosters: Vec<Roster>,
    /// Confirmed rosters dated within the lookahead.
    pub upcoming_rosters: Vec<Roster>,
    pub profiles: Vec<Profile>,
    pub projects: Vec<Project>,
    pub clients: Vec<Client>,
}

/// Builds notifications, most urgent first and newest first within a
/// priority. Every notification starts unread.
///
/// Rows without a creation time are stamped with `now`.
pub fn build_notifications(
    sources: &NotificationSources,
    lookahead_days: u32,
    now: DateTime<Utc>,
) -> Vec<Notification> {
    let profiles: HashMap<Uuid, &str> = sources
        .profiles
        .iter()
        .map(|p| (p.id, p.full_name.as_str()))
        .collect();
    let projects: HashMap<Uuid, &str> = sources.projects.iter().map(|p| (p.id, p.name.as_str())).collect();
    let clients: HashMap<Uuid, &str> = sources.clients.iter().map(|c| (c.id, c.company.as_str())).collect();
    let mut notifications = Vec::new();

    for entry in &sources.pending_hours {
        let message = format!(
            "{} submitted working hours for {} on {}",
            lookup(&profiles, Some(entry.profile_id), "Unknown"),
            lookup(&projects, entry.project_id, "Unknown Project"),
            entry.date.format("%b %-d, %Y"),
        );
        notifications.push(
            Notification::new(
                format!("wh-{}", entry.id),
                NotificationKind::WorkingHoursPending,
                Priority::Medium,
                "Working Hours Approval Required",
                message,
                entry.created_at.unwrap_or(now),
            )
            .with_source(entry.id),
        );
    }

    for roster in &sources.pending_rosters {
        let message = format!(
            "New roster \"{}\" for {} at {} - {}",
            roster.name.as_deref().unwrap_or("Unnamed"),
            lookup(&profiles, roster.profile_id, "Unknown"),
            lookup(&clients, roster.client_id, "Unknown Client"),
            lookup(&projects, roster.project_id, "Unknown Project"),
        );
        notifications.push(
            Notification::new(
                format!("roster-{}", roster.id),
                NotificationKind::RosterPending,
                Priority::High,
                "Roster Confirmation Required",
                message,
                roster.created_at.unwrap_or(now),
            )
            .with_source(roster.id),
        );
    }

    let upcoming = sources.upcoming_rosters.len();
    if upcoming > 0 {
        let plural = if upcoming == 1 { "" } else { "s" };
        let (title, when) = if lookahead_days <= 1 {
            ("Upcoming Rosters Tomorrow".to_string(), "for tomorrow".to_string())
        } else {
            (
                format!("Upcoming Rosters (next {lookahead_days} days)"),
                format!("in the next {lookahead_days} days"),
            )
        };
        notifications.push(Notification::new(
            "upcoming-rosters",
            NotificationKind::System,
            Priority::Low,
            title,
            format!("{upcoming} confirmed roster{plural} scheduled {when}"),
            now,
        ));
    }

    notifications.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    notifications
}

fn lookup<'a>(names: &HashMap<Uuid, &'a str>, id: Option<Uuid>, fallback: &'a str) -> &'a str {
    id.and_then(|id| names.get(&id).copied()).unwrap_or(fallback)
}

/// Dates from tomorrow through `days` days ahead of `today`, inclusive.
fn lookahead(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let days = u64::from(days.max(1));
    let first = today.checked_add_days(Days::new(1)).unwrap_or(today);
    let last = today.checked_add_days(Days::new(days)).unwrap_or(first);
    (first, last)
}

/// Live notification list with local read state.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

struct CenterInner {
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    config: DashboardConfig,
    state: Mutex<CenterState>,
}

#[derive(Default)]
struct CenterState {
    notifications: Vec<Notification>,
    read: HashSet<String>,
    dismissed: HashSet<String>,
    sequencer: RequestSequencer,
}

impl NotificationCenter {
    pub fn new(store: Arc<dyn RemoteStore>, notifier: Arc<dyn Notifier>, config: DashboardConfig) -> Self {
        Self {
            inner: Arc::new(CenterInner {
                store,
                notifier,
                config,
                state: Mutex::new(CenterState::default()),
            }),
        }
    }

    /// Visible notifications, most urgent first.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.state.lock().await.notifications.clone()
    }

    pub async fn unread_count(&self) -> usize {
        let state = self.inner.state.lock().await;
        state.notifications.iter().filter(|n| !n.read).count()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.lock().await.sequencer.is_loading()
    }

    /// Marks one notification read. Returns `false` for unknown ids.
    pub async fn mark_read(&self, id: &str) -> bool {
        let mut state = self.inner.state.lock().await;
        let CenterState { notifications, read, .. } = &mut *state;
        let Some(n) = notifications.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        n.read = true;
        read.insert(id.to_string());
        true
    }

    pub async fn mark_all_read(&self) {
        let mut state = self.inner.state.lock().await;
        let CenterState { notifications, read, .. } = &mut *state;
        for n in notifications.iter_mut() {
            n.read = true;
            read.insert(n.id.clone());
        }
    }

    /// Hides a notification until it stops being generated. Returns `false`
    /// for unknown ids.
    pub async fn dismiss(&self, id: &str) -> bool {
        let mut state = self.inner.state.lock().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        if state.notifications.len() == before {
            return false;
        }
        state.dismissed.insert(id.to_string());
        true
    }

    /// Rebuilds the list as of now.
    pub async fn refresh(&self) -> Fetched {
        let now = Utc::now();
        self.refresh_at(now.date_naive(), now).await
    }

    /// Rebuilds the list as of `today`.
    ///
    /// On failure the previous list stays and an error toast is raised.
    pub async fn refresh_at(&self, today: NaiveDate, now: DateTime<Utc>) -> Fetched {
        let id = self.inner.state.lock().await.sequencer.issue();
        debug!("Building notifications #{id}");

        let lookahead_days = self.inner.config.notification_lookahead_days;
        let outcome = self.load(today, lookahead_days).await;

        let mut state = self.inner.state.lock().await;
        if !state.sequencer.try_apply(id) {
            debug!("Dropping stale notifications #{id}");
            return Fetched::Stale;
        }
        let sources = match outcome {
            Ok(sources) => sources,
            Err(e) => {
                warn!("Failed to build notifications: {e}");
                self.inner.notifier.notify(Toast::error("Failed to load notifications"));
                return Fetched::Failed;
            }
        };

        let CenterState {
            notifications,
            read,
            dismissed,
            ..
        } = &mut *state;
        let built = build_notifications(&sources, lookahead_days, now);
        let current: HashSet<&str> = built.iter().map(|n| n.id.as_str()).collect();
        read.retain(|id| current.contains(id.as_str()));
        dismissed.retain(|id| current.contains(id.as_str()));

        *notifications = built
            .iter()
            .cloned()
            .filter(|n| !dismissed.contains(&n.id))
            .map(|mut n| {
                n.read = read.contains(&n.id);
                n
            })
            .collect();
        Fetched::Applied
    }

    async fn load(&self, today: NaiveDate, lookahead_days: u32) -> Result<NotificationSources> {
        let (first, last) = lookahead(today, lookahead_days);
        let newest = || Query::new().order_by(OrderBy::desc("created_at"));

        let pending_hours = newest().filter(Filter::eq("status", WorkingHoursStatus::Pending));
        let pending_rosters = newest().filter(Filter::eq("status", RosterStatus::Pending));
        let upcoming_rosters = Query::new()
            .filter(Filter::eq("status", RosterStatus::Confirmed))
            .filter(Filter::ge("date", first))
            .filter(Filter::le("date", last));
        let everything = Query::new();

        let (pending_hours, pending_rosters, upcoming_rosters, profiles, projects, clients) = futures::try_join!(
            self.fetch_all::<WorkingHours>(&pending_hours),
            self.fetch_all::<Roster>(&pending_rosters),
            self.fetch_all::<Roster>(&upcoming_rosters),
            self.fetch_all::<Profile>(&everything),
            self.fetch_all::<Project>(&everything),
            self.fetch_all::<Client>(&everything),
        )?;

        Ok(NotificationSources {
            pending_hours,
            pending_rosters,
            upcoming_rosters,
            profiles,
            projects,
            clients,
        })
    }

    async fn fetch_all<E: Entity>(&self, query: &Query) -> Result<Vec<E>> {
        let timeout = self.inner.config.fetch_timeout;
        let result = tokio::time::timeout(timeout, self.inner.store.query(E::TABLE, query))
            .await
            .map_err(|_| StoreError::Timeout(timeout))??;
        Ok(result
            .rows
            .iter()
            .map(E::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Rebuilds on every insert or update of working hours and rosters
    /// until `cancel` fires.
    pub fn watch(&self, cancel: CancellationToken) -> Result<Watcher> {
        let center = self.clone();
        let watcher = Watcher::spawn(
            self.inner.store.as_ref(),
            &[WorkingHours::TABLE, Roster::TABLE],
            &[ChangeKind::Insert, ChangeKind::Update],
            cancel,
            move |_| {
                let center = center.clone();
                async move {
                    center.refresh().await;
                }
            },
        )?;
        Ok(watcher)
    }
}
