//! Generic screen controller

use std::sync::Arc;

use log::debug;
use log::info;
use log::warn;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::error::Error;
use crate::error::Result;
use crate::error::StoreError;
use crate::error::ValidationError;
use crate::model::Entity;
use crate::model::Row;
use crate::model::TableRow;
use crate::query::Filter;
use crate::query::OrderBy;
use crate::query::Query;
use crate::query::Range;
use crate::store::ChangeKind;
use crate::store::RemoteStore;
use crate::table::ColumnDescriptor;
use crate::table::ExportPayload;
use crate::table::ExportRequest;
use crate::table::ExportScope;
use crate::table::PaginatedResult;
use crate::table::RenderedTable;
use crate::table::TableEvent;
use crate::table::TableState;
use crate::table::TableView;

use super::notify::Notifier;
use super::notify::Toast;
use super::realtime::Watcher;
use super::sequence::RequestSequencer;

/// Whether a form creates a new row or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Everything that differs between one dashboard screen and the next.
pub trait Screen: Send + Sync + 'static {
    /// Typed row shown in the table.
    type Row: Entity + std::fmt::Debug;

    /// Singular name used in messages, e.g. "Client".
    fn noun(&self) -> &'static str;

    /// Plural name used in messages, e.g. "clients".
    fn plural(&self) -> &'static str;

    /// Fields the search box matches against.
    fn search_fields(&self) -> &'static [&'static str];

    /// Ordering used while no column sort is active.
    fn default_order(&self) -> Option<OrderBy> {
        Some(OrderBy::desc("created_at"))
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Self::Row>>;

    /// Checks a submitted form. Runs before any remote call.
    fn validate(&self, form: &Row, mode: FormMode) -> std::result::Result<(), ValidationError>;

    /// Turns a validated form into the row sent to the store.
    ///
    /// Derived fields are computed here.
    fn prepare(&self, form: Row, _mode: FormMode) -> Row {
        form
    }

    fn infinite_scroll(&self) -> bool {
        false
    }
}

/// Outcome of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetched {
    /// The response replaced the displayed result.
    Applied,
    /// A newer fetch was issued; this response was dropped.
    Stale,
    /// The fetch failed; the previous result stays.
    Failed,
}

/// What a [`TableEvent`] led to.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// State changed and the table was re-queried.
    Fetched(Fetched),
    /// The event did not change anything.
    Unchanged,
    /// Local state changed without a fetch.
    Updated,
    /// Rows packaged for the export service.
    Exported {
        request: ExportRequest,
        payload: ExportPayload,
    },
    /// The caller should print the current view.
    Print,
    /// Rows for an all-pages export could not be fetched.
    ExportFailed,
}

/// A numbered fetch and the query it sends.
struct Ticket {
    id: u64,
    query: Query,
    page: usize,
    page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan {
    /// Fetch everything up to the current page and replace the result.
    Replace,
    /// Fetch only the current page and append it (infinite scroll).
    Append,
}

/// Owns one screen's table state and talks to the remote store.
///
/// Cheap to clone; clones share state. Fetches may overlap freely: each is
/// numbered and only the response to the newest one is applied.
pub struct ScreenController<S: Screen> {
    inner: Arc<ControllerInner<S>>,
}

impl<S: Screen> Clone for ScreenController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct ControllerInner<S: Screen> {
    screen: S,
    store: Arc<dyn RemoteStore>,
    notifier: Arc<dyn Notifier>,
    view: TableView<S::Row>,
    config: DashboardConfig,
    state: Mutex<ControllerState<S::Row>>,
}

struct ControllerState<R> {
    table: TableState,
    result: PaginatedResult<R>,
    sequencer: RequestSequencer,
}

impl<S: Screen> ScreenController<S> {
    /// Creates a controller. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(
        screen: S,
        store: Arc<dyn RemoteStore>,
        notifier: Arc<dyn Notifier>,
        config: DashboardConfig,
    ) -> Result<Self> {
        config.validate()?;
        let view = TableView::new(screen.columns())?
            .with_infinite_scroll(screen.infinite_scroll())
            .with_page_window(config.page_window)
            .with_page_size_options(config.page_size_options.clone());
        let table = view.initial_state(config.default_page_size);
        let result = PaginatedResult::empty(config.default_page_size);

        Ok(Self {
            inner: Arc::new(ControllerInner {
                screen,
                store,
                notifier,
                view,
                config,
                state: Mutex::new(ControllerState {
                    table,
                    result,
                    sequencer: RequestSequencer::new(),
                }),
            }),
        })
    }

    pub fn screen(&self) -> &S {
        &self.inner.screen
    }

    pub fn view(&self) -> &TableView<S::Row> {
        &self.inner.view
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub(crate) fn notify(&self, toast: Toast) {
        self.inner.notifier.notify(toast);
    }

    /// Rows currently displayed.
    pub async fn rows(&self) -> Vec<S::Row> {
        self.inner.state.lock().await.result.rows().to_vec()
    }

    pub async fn result(&self) -> PaginatedResult<S::Row> {
        self.inner.state.lock().await.result.clone()
    }

    pub async fn state(&self) -> TableState {
        self.inner.state.lock().await.table.clone()
    }

    /// Returns `true` while any fetch is outstanding.
    pub async fn is_loading(&self) -> bool {
        self.inner.state.lock().await.sequencer.is_loading()
    }

    /// Renders the current result.
    pub async fn render(&self) -> RenderedTable {
        let state = self.inner.state.lock().await;
        self.inner
            .view
            .render(&state.result, &state.table, state.sequencer.is_loading())
    }

    /// Looks up a displayed row by id.
    pub async fn find(&self, id: Uuid) -> Option<S::Row> {
        let state = self.inner.state.lock().await;
        state.result.rows().iter().find(|r| r.row_id() == Some(id)).cloned()
    }

    /// Returns a row by id, from the displayed rows or else from the store.
    pub async fn get(&self, id: Uuid) -> Result<S::Row> {
        match self.find(id).await {
            Some(row) => Ok(row),
            None => self.load(id).await,
        }
    }

    /// Reads a row from the store, ignoring the displayed rows.
    pub async fn load(&self, id: Uuid) -> Result<S::Row> {
        Ok(S::Row::from_row(&self.stored_row(id).await?)?)
    }

    async fn stored_row(&self, id: Uuid) -> Result<Row> {
        let query = Query::new().filter(Filter::eq("id", id)).range(Range::new(0, 0));
        let result = self.inner.store.query(S::Row::TABLE, &query).await?;
        result.rows.into_iter().next().ok_or(Error::RowNotFound(id))
    }

    /// Re-queries the current page.
    ///
    /// On failure the previous result stays and an error toast is raised.
    pub async fn refresh(&self) -> Fetched {
        self.fetch(Plan::Replace).await
    }

    async fn fetch(&self, plan: Plan) -> Fetched {
        let ticket = {
            let mut state = self.inner.state.lock().await;
            self.issue(&mut state, plan)
        };
        self.run(plan, ticket).await
    }

    /// Numbers a fetch and captures the query for the current table state.
    ///
    /// Callers that change the table state issue under the same lock, so a
    /// response can only be applied to the state it was queried for.
    fn issue(&self, state: &mut ControllerState<S::Row>, plan: Plan) -> Ticket {
        Ticket {
            id: state.sequencer.issue(),
            query: self.query_for(&state.table, plan),
            page: state.table.page(),
            page_size: state.table.page_size(),
        }
    }

    fn query_for(&self, table: &TableState, plan: Plan) -> Query {
        let query = table.to_query(
            self.inner.screen.search_fields(),
            self.inner.screen.default_order().as_ref(),
        );
        if self.inner.view.is_infinite_scroll() && plan == Plan::Replace {
            query.range(Range::new(0, table.page() * table.page_size() - 1))
        } else {
            query
        }
    }

    async fn run(&self, mut plan: Plan, mut ticket: Ticket) -> Fetched {
        let table = S::Row::TABLE;
        loop {
            let Ticket { id, query, page, page_size } = ticket;
            debug!("Fetching {table} #{id}: {query}");

            let outcome = self.query_rows(&query).await;

            let mut state = self.inner.state.lock().await;
            let newest = state.sequencer.try_apply(id);
            if !newest || self.query_for(&state.table, plan) != query {
                match &outcome {
                    Ok(_) => debug!("Dropping stale response #{id} for {table}"),
                    Err(e) => debug!("Dropping stale failure #{id} for {table}: {e}"),
                }
                return Fetched::Stale;
            }

            let (rows, total) = match outcome {
                Ok(found) => found,
                Err(e) => {
                    warn!("Failed to fetch {table}: {e}");
                    self.inner
                        .notifier
                        .notify(Toast::error(format!("Failed to fetch {}", self.inner.screen.plural())));
                    return Fetched::Failed;
                }
            };

            state.table.clamp_page(total);
            if state.table.page() != page {
                debug!("Page {page} of {table} is past the end, moving to {}", state.table.page());
                plan = Plan::Replace;
                ticket = self.issue(&mut state, plan);
                continue;
            }

            let next = PaginatedResult::new(rows, total, page, page_size);
            match plan {
                Plan::Append if state.result.page() + 1 == page => state.result.extend(next),
                Plan::Append => {
                    plan = Plan::Replace;
                    ticket = self.issue(&mut state, plan);
                    continue;
                }
                Plan::Replace => state.result = next,
            }
            return Fetched::Applied;
        }
    }

    async fn query_rows(&self, query: &Query) -> Result<(Vec<S::Row>, usize)> {
        let timeout = self.inner.config.fetch_timeout;
        let result = tokio::time::timeout(timeout, self.inner.store.query(S::Row::TABLE, query))
            .await
            .map_err(|_| StoreError::Timeout(timeout))??;
        let rows = result
            .rows
            .iter()
            .map(S::Row::from_row)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((rows, result.total_count))
    }

    /// Applies a table interaction and re-queries when needed.
    pub async fn handle(&self, event: TableEvent) -> Handled {
        let (plan, ticket) = {
            let mut state = self.inner.state.lock().await;
            let plan = match event {
                TableEvent::SearchSubmitted(text) => {
                    state.table.set_search(text);
                    Plan::Replace
                }
                TableEvent::SortRequested(key) => {
                    state.table.toggle_sort(&key);
                    Plan::Replace
                }
                TableEvent::ColumnFilterChanged { key, value } => {
                    if !state.table.set_column_filter(key, value) {
                        return Handled::Unchanged;
                    }
                    Plan::Replace
                }
                TableEvent::PageRequested(page) => {
                    let append = self.inner.view.is_infinite_scroll() && page == state.result.page() + 1;
                    state.table.set_page(page);
                    if append { Plan::Append } else { Plan::Replace }
                }
                TableEvent::PageSizeRequested(size) => {
                    state.table.set_page_size(size);
                    Plan::Replace
                }
                TableEvent::ColumnVisibilityToggled(key) => {
                    return match state.table.toggle_column(&key) {
                        Some(_) => Handled::Updated,
                        None => Handled::Unchanged,
                    };
                }
                TableEvent::PrintRequested => return Handled::Print,
                TableEvent::ExportRequested(request) => {
                    drop(state);
                    return self.export(request).await;
                }
            };
            let ticket = self.issue(&mut state, plan);
            (plan, ticket)
        };
        Handled::Fetched(self.run(plan, ticket).await)
    }

    /// Packages rows for an export request.
    ///
    /// The current page uses the displayed rows; all pages re-queries
    /// without a row range.
    pub async fn export(&self, request: ExportRequest) -> Handled {
        self.inner.notifier.notify(Toast::info(format!(
            "Exporting as {}...",
            request.format.as_str().to_uppercase()
        )));

        let rows = match request.scope {
            ExportScope::CurrentPage => self.rows().await,
            ExportScope::AllPages => {
                let query = {
                    let state = self.inner.state.lock().await;
                    state
                        .table
                        .to_query(
                            self.inner.screen.search_fields(),
                            self.inner.screen.default_order().as_ref(),
                        )
                        .unbounded()
                };
                match self.query_rows(&query).await {
                    Ok((rows, _)) => rows,
                    Err(e) => {
                        warn!("Failed to export {}: {e}", S::Row::TABLE);
                        self.inner
                            .notifier
                            .notify(Toast::error(format!("Failed to export {}", self.inner.screen.plural())));
                        return Handled::ExportFailed;
                    }
                }
            }
        };

        let payload = ExportPayload::build(self.inner.view.columns(), &request, &rows);
        Handled::Exported { request, payload }
    }

    /// Validates, inserts and re-queries.
    pub async fn create(&self, form: Row) -> Result<S::Row> {
        self.check(&form, FormMode::Create)?;
        let row = self.inner.screen.prepare(form, FormMode::Create);
        let inserted = self.inner.store.insert(S::Row::TABLE, row).await;
        let row = self.settle(ChangeKind::Insert, inserted)?;
        self.refresh().await;
        Ok(S::Row::from_row(&row)?)
    }

    /// Validates, patches and re-queries.
    ///
    /// The form is laid over the stored row before derived fields are
    /// computed, so fields the form leaves out keep their stored values.
    pub async fn update(&self, id: Uuid, form: Row) -> Result<S::Row> {
        self.check(&form, FormMode::Update)?;
        let mut row = match self.stored_row(id).await {
            Ok(row) => row,
            Err(e) => {
                warn!("Failed to read {} {id} for update: {e}", S::Row::TABLE);
                self.inner.notifier.notify(Toast::error(format!(
                    "Failed to update {}",
                    self.inner.screen.noun().to_lowercase()
                )));
                return Err(e);
            }
        };
        row.merge(&form);
        let patch = self.inner.screen.prepare(row, FormMode::Update);
        self.patch(id, patch).await
    }

    /// Sends a patch as-is, skipping validation and preparation.
    pub(crate) async fn patch(&self, id: Uuid, patch: Row) -> Result<S::Row> {
        let updated = self.inner.store.update(S::Row::TABLE, id, patch).await;
        let row = self.settle(ChangeKind::Update, updated)?;
        self.refresh().await;
        Ok(S::Row::from_row(&row)?)
    }

    /// Deletes and re-queries.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let deleted = self.inner.store.delete(S::Row::TABLE, id).await;
        self.settle(ChangeKind::Delete, deleted)?;
        self.refresh().await;
        Ok(())
    }

    fn check(&self, form: &Row, mode: FormMode) -> Result<()> {
        self.inner.screen.validate(form, mode).map_err(|e| {
            debug!("Rejected {} form: {e}", S::Row::TABLE);
            self.inner.notifier.notify(Toast::error(e.to_string()));
            Error::from(e)
        })
    }

    /// Toasts the outcome of a mutation.
    fn settle<T>(&self, kind: ChangeKind, outcome: std::result::Result<T, StoreError>) -> Result<T> {
        let (done, verb) = match kind {
            ChangeKind::Insert => ("created", "create"),
            ChangeKind::Update => ("updated", "update"),
            ChangeKind::Delete => ("deleted", "delete"),
        };
        let noun = self.inner.screen.noun();
        match outcome {
            Ok(value) => {
                info!("{noun} {done} in {}", S::Row::TABLE);
                self.inner
                    .notifier
                    .notify(Toast::success(format!("{noun} {done} successfully")));
                Ok(value)
            }
            Err(e) => {
                warn!("Failed to {verb} {}: {e}", S::Row::TABLE);
                self.inner
                    .notifier
                    .notify(Toast::error(format!("Failed to {verb} {}", noun.to_lowercase())));
                Err(e.into())
            }
        }
    }

    /// Refreshes on every insert, update or delete of this screen's table
    /// until `cancel` fires.
    pub fn watch(&self, cancel: tokio_util::sync::CancellationToken) -> Result<Watcher> {
        let controller = self.clone();
        let watcher = Watcher::spawn(
            self.inner.store.as_ref(),
            &[S::Row::TABLE],
            ChangeKind::ALL,
            cancel,
            move |_| {
                let controller = controller.clone();
                async move {
                    controller.refresh().await;
                }
            },
        )?;
        Ok(watcher)
    }
}
