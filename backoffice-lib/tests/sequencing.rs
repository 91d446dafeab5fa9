//! Overlapping fetches and fetch failures.

mod common;

use std::sync::Arc;
use std::time::Duration;

use backoffice_lib::config::DashboardConfig;
use backoffice_lib::error::StoreError;
use backoffice_lib::screen::ClientsController;
use backoffice_lib::screen::ClientsScreen;
use backoffice_lib::screen::Fetched;
use backoffice_lib::screen::Handled;
use backoffice_lib::screen::ToastLevel;
use backoffice_lib::screen::ToastLog;
use backoffice_lib::table::TableBody;
use backoffice_lib::table::TableEvent;
use common::ScriptedStore;
use common::Step;
use common::client_row;
use common::controller;
use common::init_logger;
use common::memory_store;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn scripted() -> Arc<ScriptedStore> {
    let inner = memory_store();
    inner.seed(
        "clients",
        [
            client_row("Ann", "Alpha Co"),
            client_row("Bob", "Beta Co"),
            client_row("Cid", "Gamma Co"),
        ],
    );
    Arc::new(ScriptedStore::new(inner))
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_newer() {
    init_logger();
    let store = scripted();
    let (clients, toasts) = controller(ClientsScreen, store.clone());

    let release = store.hold();
    let slow = {
        let clients = clients.clone();
        tokio::spawn(async move { clients.handle(TableEvent::SearchSubmitted("alpha".into())).await })
    };
    store.wait_for_queries(1).await;
    assert!(clients.is_loading().await);

    let fast = clients.handle(TableEvent::SearchSubmitted("beta".into())).await;
    assert_eq!(fast, Handled::Fetched(Fetched::Applied));
    assert!(clients.is_loading().await);

    release.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), Handled::Fetched(Fetched::Stale));

    let rows = clients.rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Beta Co");
    assert!(!clients.is_loading().await);
    assert!(toasts.toasts().is_empty());
}

fn spawn_handle(clients: &ClientsController, event: TableEvent) -> JoinHandle<Handled> {
    let clients = clients.clone();
    tokio::spawn(async move { clients.handle(event).await })
}

#[tokio::test]
async fn test_older_response_never_moves_newer_page() {
    init_logger();
    let inner = memory_store();
    inner.seed(
        "clients",
        std::iter::once(client_row("Ann", "Alpha Co"))
            .chain((0..29).map(|i| client_row(&format!("Member{i}"), "Zeta Co"))),
    );
    let store = Arc::new(ScriptedStore::new(inner));
    let (clients, toasts) = controller(ClientsScreen, store.clone());

    let release_search = store.hold();
    let search = spawn_handle(&clients, TableEvent::SearchSubmitted("ann".into()));
    store.wait_for_queries(1).await;

    let release_clear = store.hold();
    let clear = spawn_handle(&clients, TableEvent::SearchSubmitted(String::new()));
    store.wait_for_queries(2).await;

    let release_page = store.hold();
    let page = spawn_handle(&clients, TableEvent::PageRequested(3));
    store.wait_for_queries(3).await;

    release_search.send(()).unwrap();
    assert_eq!(search.await.unwrap(), Handled::Fetched(Fetched::Stale));
    let state = clients.state().await;
    assert_eq!(state.page(), 3);
    assert_eq!(state.filters().search, "");
    assert!(clients.rows().await.is_empty());

    release_clear.send(()).unwrap();
    assert_eq!(clear.await.unwrap(), Handled::Fetched(Fetched::Stale));
    assert_eq!(clients.state().await.page(), 3);

    release_page.send(()).unwrap();
    assert_eq!(page.await.unwrap(), Handled::Fetched(Fetched::Applied));

    let result = clients.result().await;
    assert_eq!(result.page(), 3);
    assert_eq!(result.total(), 30);
    assert_eq!(result.rows().len(), 10);
    assert!(!clients.is_loading().await);
    assert!(toasts.toasts().is_empty());
}

#[tokio::test]
async fn test_failure_keeps_previous_result() {
    init_logger();
    let store = scripted();
    let (clients, toasts) = controller(ClientsScreen, store.clone());
    clients.refresh().await;
    let before = clients.result().await;

    store.push(Step::Fail(StoreError::service(503, "unavailable")));
    assert_eq!(clients.refresh().await, Fetched::Failed);

    assert_eq!(clients.result().await, before);
    let toast = toasts.last().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.title, "Error");
    assert_eq!(toast.description, "Failed to fetch clients");
    assert!(matches!(clients.render().await.body, TableBody::Rows(ref rows) if rows.len() == 3));
}

#[tokio::test]
async fn test_stale_failure_is_silent() {
    init_logger();
    let store = scripted();
    let (clients, toasts) = controller(ClientsScreen, store.clone());

    let (release, rx) = oneshot::channel();
    store.push(Step::HoldThenFail(rx, StoreError::service(500, "boom")));
    let slow = {
        let clients = clients.clone();
        tokio::spawn(async move { clients.refresh().await })
    };
    store.wait_for_queries(1).await;

    assert_eq!(clients.refresh().await, Fetched::Applied);
    release.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), Fetched::Stale);

    assert_eq!(clients.rows().await.len(), 3);
    assert_eq!(toasts.count(ToastLevel::Error), 0);
}

#[tokio::test]
async fn test_loading_placeholder_only_without_rows() {
    init_logger();
    let store = scripted();
    let (clients, _) = controller(ClientsScreen, store.clone());

    let release = store.hold();
    let first = {
        let clients = clients.clone();
        tokio::spawn(async move { clients.refresh().await })
    };
    store.wait_for_queries(1).await;
    assert_eq!(clients.render().await.body, TableBody::Loading);
    release.send(()).unwrap();
    first.await.unwrap();

    let release = store.hold();
    let second = {
        let clients = clients.clone();
        tokio::spawn(async move { clients.refresh().await })
    };
    store.wait_for_queries(2).await;
    let rendered = clients.render().await;
    assert!(matches!(rendered.body, TableBody::Rows(ref rows) if rows.len() == 3));
    assert!(rendered.pagination.unwrap().is_loading());
    release.send(()).unwrap();
    second.await.unwrap();
}

#[tokio::test]
async fn test_slow_fetch_times_out() {
    init_logger();
    let store = scripted();
    let toasts = Arc::new(ToastLog::new());
    let config = DashboardConfig::default().with_fetch_timeout(Duration::from_millis(20));
    let clients = ClientsController::new(ClientsScreen, store.clone(), toasts.clone(), config).unwrap();

    let _release = store.hold();
    assert_eq!(clients.refresh().await, Fetched::Failed);
    assert_eq!(toasts.last().unwrap().description, "Failed to fetch clients");
    assert!(!clients.is_loading().await);
}
