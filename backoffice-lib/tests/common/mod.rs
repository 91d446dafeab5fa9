//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use backoffice_lib::config::DashboardConfig;
use backoffice_lib::error::StoreError;
use backoffice_lib::model::Row;
use backoffice_lib::query::Query;
use backoffice_lib::query::QueryResult;
use backoffice_lib::screen::Screen;
use backoffice_lib::screen::ScreenController;
use backoffice_lib::screen::ToastLog;
use backoffice_lib::store::ChangeKind;
use backoffice_lib::store::ChangeStream;
use backoffice_lib::store::InMemoryStore;
use backoffice_lib::store::RemoteStore;
use simplelog::ConfigBuilder;
use simplelog::LevelFilter;
use simplelog::TestLogger;
use tokio::sync::oneshot;
use uuid::Uuid;

static LOGGER: Once = Once::new();

/// Routes library logs to the test harness output.
pub fn init_logger() {
    LOGGER.call_once(|| {
        let config = ConfigBuilder::new().set_target_level(LevelFilter::Off).build();
        let _ = TestLogger::init(LevelFilter::Debug, config);
    });
}

pub const TABLES: &[&str] = &[
    "clients",
    "projects",
    "profiles",
    "rosters",
    "roster_profiles",
    "working_hours",
    "payroll",
    "bank_accounts",
    "bank_transactions",
];

pub fn memory_store() -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::new().with_tables(TABLES))
}

pub fn client_row(name: &str, company: &str) -> Row {
    Row::with_id(Uuid::new_v4())
        .set("name", name)
        .set("email", format!("{}@example.com", name.to_lowercase()))
        .set("company", company)
        .set("status", "active")
}

/// What the next `query` call on a [`ScriptedStore`] does.
pub enum Step {
    /// Answer from the backing store right away.
    Pass,
    /// Fail with this error.
    Fail(StoreError),
    /// Wait for the sender to fire, then answer from the backing store.
    Hold(oneshot::Receiver<()>),
    /// Wait for the sender to fire, then fail with this error.
    HoldThenFail(oneshot::Receiver<()>, StoreError),
}

/// A store whose query calls follow a script; mutations and
/// subscriptions go straight to an [`InMemoryStore`].
pub struct ScriptedStore {
    pub inner: Arc<InMemoryStore>,
    steps: Mutex<VecDeque<Step>>,
    queries: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            steps: Mutex::new(VecDeque::new()),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn push(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    /// Scripts a held call and returns the sender that releases it.
    pub fn hold(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Step::Hold(rx));
        tx
    }

    /// Number of query calls started so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Yields until `n` query calls have started.
    pub async fn wait_for_queries(&self, n: usize) {
        while self.queries() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl RemoteStore for ScriptedStore {
    async fn query(&self, table: &str, query: &Query) -> Result<QueryResult, StoreError> {
        let step = self.steps.lock().unwrap().pop_front().unwrap_or(Step::Pass);
        self.queries.fetch_add(1, Ordering::SeqCst);
        match step {
            Step::Pass => self.inner.query(table, query).await,
            Step::Fail(err) => Err(err),
            Step::Hold(rx) => {
                let _ = rx.await;
                self.inner.query(table, query).await
            }
            Step::HoldThenFail(rx, err) => {
                let _ = rx.await;
                Err(err)
            }
        }
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: Uuid, patch: Row) -> Result<Row, StoreError> {
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete(table, id).await
    }

    fn subscribe(&self, table: &str, kinds: &[ChangeKind]) -> Result<ChangeStream, StoreError> {
        self.inner.subscribe(table, kinds)
    }
}

/// Builds a controller with a fresh toast log.
pub fn controller<S: Screen>(
    screen: S,
    store: Arc<dyn RemoteStore>,
) -> (ScreenController<S>, Arc<ToastLog>) {
    let toasts = Arc::new(ToastLog::new());
    let controller = ScreenController::new(screen, store, toasts.clone(), DashboardConfig::default())
        .expect("default config is valid");
    (controller, toasts)
}
