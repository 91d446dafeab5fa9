//! Screen controller flows against the in-memory store.

mod common;


use backoffice_lib::error::Error;
use backoffice_lib::model::BankAccount;
use backoffice_lib::model::Client;
use backoffice_lib::model::Row;
use backoffice_lib::model::RosterStatus;
use backoffice_lib::model::types::Money;
use backoffice_lib::query::SortOrder;
use backoffice_lib::screen::BankScreen;
use backoffice_lib::screen::ClientsScreen;
use backoffice_lib::screen::Fetched;
use backoffice_lib::screen::FormMode;
use backoffice_lib::screen::Handled;
use backoffice_lib::screen::PayrollScreen;
use backoffice_lib::screen::RostersScreen;
use backoffice_lib::screen::Screen;
use backoffice_lib::screen::ToastLevel;
use backoffice_lib::screen::WorkingHoursScreen;
use backoffice_lib::store::InMemoryStore;
use backoffice_lib::store::RemoteStore;
use backoffice_lib::table::Cell;
use backoffice_lib::table::ColumnDescriptor;
use backoffice_lib::table::ExportAction;
use backoffice_lib::table::ExportFormat;
use backoffice_lib::table::ExportScope;
use backoffice_lib::table::TableBody;
use backoffice_lib::table::TableEvent;
use chrono::NaiveDate;
use chrono::TimeDelta;
use chrono::Utc;
use common::client_row;
use common::controller;
use common::init_logger;
use common::memory_store;
use rust_decimal::Decimal;
use uuid::Uuid;

fn seed_clients(store: &InMemoryStore, n: usize) {
    let now = Utc::now();
    store.seed(
        "clients",
        (0..n).map(|i| {
            client_row(&format!("Contact{i:02}"), &format!("Company {i:02}"))
                .set("created_at", now - TimeDelta::minutes(i as i64))
        }),
    );
}

// =============================================================================
// Fetching and table events
// =============================================================================

#[tokio::test]
async fn test_refresh_loads_first_page_newest_first() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 12);
    let (clients, toasts) = controller(ClientsScreen, store);

    assert_eq!(clients.refresh().await, Fetched::Applied);

    let result = clients.result().await;
    assert_eq!(result.rows().len(), 10);
    assert_eq!(result.total(), 12);
    assert!(result.has_more());
    assert_eq!(result.rows()[0].name, "Contact00");
    assert!(!clients.is_loading().await);
    assert!(toasts.toasts().is_empty());

    let rendered = clients.render().await;
    assert_eq!(rendered.summary.to_string(), "Showing 1 to 10 of 12 entries");
    assert!(matches!(rendered.body, TableBody::Rows(ref rows) if rows.len() == 10));
}

#[tokio::test]
async fn test_search_resets_to_first_page() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 25);
    let (clients, _) = controller(ClientsScreen, store);

    clients.handle(TableEvent::PageRequested(2)).await;
    assert_eq!(clients.state().await.page(), 2);

    let handled = clients.handle(TableEvent::SearchSubmitted("company 1".into())).await;
    assert_eq!(handled, Handled::Fetched(Fetched::Applied));
    assert_eq!(clients.state().await.page(), 1);
    assert_eq!(clients.result().await.total(), 10);
}

#[tokio::test]
async fn test_sort_toggle_keeps_page() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 25);
    let (clients, _) = controller(ClientsScreen, store);

    clients.handle(TableEvent::PageRequested(2)).await;
    clients.handle(TableEvent::SortRequested("name".into())).await;
    let state = clients.state().await;
    assert_eq!(state.page(), 2);
    assert_eq!(state.filters().sort_of("name"), Some(SortOrder::Asc));
    assert_eq!(clients.rows().await[0].name, "Contact10");

    clients.handle(TableEvent::SortRequested("name".into())).await;
    assert_eq!(clients.state().await.filters().sort_of("name"), Some(SortOrder::Desc));
    assert_eq!(clients.rows().await[0].name, "Contact14");
}

#[tokio::test]
async fn test_column_filter_and_page_size() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 30);
    let (clients, _) = controller(ClientsScreen, store);

    clients.handle(TableEvent::PageSizeRequested(25)).await;
    assert_eq!(clients.rows().await.len(), 25);

    let event = clients.view().change_column_filter("company", "company 2").unwrap();
    clients.handle(event.clone()).await;
    assert_eq!(clients.result().await.total(), 10);

    assert_eq!(clients.handle(event).await, Handled::Unchanged);
    assert!(clients.view().change_column_filter("phone", "555").is_none());
}

#[tokio::test]
async fn test_hidden_column_is_not_rendered_or_exported() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 3);
    let (clients, _) = controller(ClientsScreen, store);
    clients.refresh().await;

    let toggle = clients.view().toggle_column("email").unwrap();
    assert_eq!(clients.handle(toggle).await, Handled::Updated);

    let rendered = clients.render().await;
    assert!(rendered.headers.iter().all(|h| h.key != "email"));

    let state = clients.state().await;
    let event = clients
        .view()
        .export(
            ExportAction::Export(ExportFormat::Csv),
            &["name", "email", "actions"],
            ExportScope::CurrentPage,
            &state,
        )
        .unwrap();
    let Handled::Exported { request, payload } = clients.handle(event).await else {
        panic!("expected an export");
    };
    assert_eq!(request.columns, vec!["name"]);
    assert_eq!(payload.headers, vec!["Contact"]);
    assert_eq!(payload.rows.len(), 3);
}

#[tokio::test]
async fn test_export_all_pages_requeries() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 14);
    let (clients, toasts) = controller(ClientsScreen, store);
    clients.refresh().await;

    let state = clients.state().await;
    let event = clients
        .view()
        .export(
            ExportAction::Export(ExportFormat::Excel),
            &["company"],
            ExportScope::AllPages,
            &state,
        )
        .unwrap();
    let Handled::Exported { payload, .. } = clients.handle(event).await else {
        panic!("expected an export");
    };
    assert_eq!(payload.rows.len(), 14);
    assert_eq!(toasts.last().unwrap().description, "Exporting as EXCEL...");

    let print = clients
        .view()
        .export(ExportAction::Print, &["company"], ExportScope::AllPages, &state)
        .unwrap();
    assert_eq!(clients.handle(print).await, Handled::Print);
}

// =============================================================================
// Mutations
// =============================================================================

#[tokio::test]
async fn test_create_rejects_invalid_form_without_remote_call() {
    init_logger();
    let store = memory_store();
    let (clients, toasts) = controller(ClientsScreen, store.clone());

    let form = Row::new().set("name", "Ann").set("email", "  ");
    let err = clients.create(form).await.unwrap_err();

    let Error::Validation(validation) = err else {
        panic!("expected a validation error");
    };
    assert!(validation.has_field("email"));
    assert!(validation.has_field("company"));
    assert_eq!(store.len("clients"), 0);
    assert_eq!(toasts.count(ToastLevel::Error), 1);
}

#[tokio::test]
async fn test_create_update_delete_roundtrip() {
    init_logger();
    let store = memory_store();
    let (clients, toasts) = controller(ClientsScreen, store.clone());

    let form = Row::new()
        .set("name", "Ann")
        .set("email", "ann@acme.test")
        .set("company", "Acme");
    let created: Client = clients.create(form).await.unwrap();
    assert_eq!(toasts.last().unwrap().description, "Client created successfully");
    assert_eq!(clients.rows().await, vec![created.clone()]);

    let patch = Row::new()
        .set("name", "Ann B")
        .set("email", "ann@acme.test")
        .set("company", "Acme");
    let updated = clients.update(created.id, patch).await.unwrap();
    assert_eq!(updated.name, "Ann B");
    assert_eq!(clients.find(created.id).await.unwrap().name, "Ann B");

    clients.delete(created.id).await.unwrap();
    assert!(clients.rows().await.is_empty());
    assert_eq!(toasts.last().unwrap().description, "Client deleted successfully");
    assert_eq!(toasts.count(ToastLevel::Success), 3);
}

#[tokio::test]
async fn test_failed_mutation_keeps_rows() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 2);
    let (clients, toasts) = controller(ClientsScreen, store);
    clients.refresh().await;
    let before = clients.result().await;

    let err = clients.delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert_eq!(clients.result().await, before);
    assert_eq!(toasts.last().unwrap().description, "Failed to delete client");
}

#[tokio::test]
async fn test_delete_last_row_on_last_page_clamps_page() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 11);
    let (clients, _) = controller(ClientsScreen, store);

    clients.handle(TableEvent::PageRequested(2)).await;
    let last = clients.rows().await;
    assert_eq!(last.len(), 1);

    clients.delete(last[0].id).await.unwrap();
    assert_eq!(clients.state().await.page(), 1);
    let result = clients.result().await;
    assert_eq!(result.rows().len(), 10);
    assert_eq!(result.page(), 1);
}

// =============================================================================
// Domain screens
// =============================================================================

fn roster_form() -> Row {
    Row::new()
        .set("name", "Night shift")
        .set("date", "2024-06-01")
        .set("start_time", "09:00")
        .set("end_time", "17:30")
        .set("status", "confirmed")
}

#[tokio::test]
async fn test_roster_create_defaults() {
    init_logger();
    let (rosters, _) = controller(RostersScreen, memory_store());

    let roster = rosters.create(roster_form()).await.unwrap();
    assert_eq!(roster.status, RosterStatus::Pending);
    assert_eq!(roster.expected_profiles, Some(1));
    assert_eq!(roster.total_hours, Some(Decimal::new(85, 1)));
}

#[tokio::test]
async fn test_roster_status_machine() {
    init_logger();
    let store = memory_store();
    let (rosters, toasts) = controller(RostersScreen, store.clone());
    let roster = rosters.create(roster_form()).await.unwrap();

    let confirmed = rosters.set_status(roster.id, RosterStatus::Confirmed).await.unwrap();
    assert_eq!(confirmed.status, RosterStatus::Confirmed);

    let err = rosters.set_status(roster.id, RosterStatus::Cancelled).await.unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: "confirmed", to: "cancelled" }));
    assert_eq!(toasts.last().unwrap().level, ToastLevel::Error);
    assert_eq!(
        store.get("rosters", roster.id).unwrap().value("status").to_string(),
        "confirmed"
    );

    let pending = rosters.toggle_confirmation(roster.id).await.unwrap();
    assert_eq!(pending.status, RosterStatus::Pending);
    let cancelled = rosters.set_status(roster.id, RosterStatus::Cancelled).await.unwrap();
    assert_eq!(cancelled.status, RosterStatus::Cancelled);
    assert!(rosters.toggle_confirmation(roster.id).await.is_err());
}

#[tokio::test]
async fn test_roster_status_change_reads_current_status() {
    init_logger();
    let store = memory_store();
    let (rosters, toasts) = controller(RostersScreen, store.clone());
    let roster = rosters.create(roster_form()).await.unwrap();
    assert_eq!(rosters.find(roster.id).await.unwrap().status, RosterStatus::Pending);

    store
        .update("rosters", roster.id, Row::new().set("status", "confirmed"))
        .await
        .unwrap();

    let err = rosters.set_status(roster.id, RosterStatus::Cancelled).await.unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { from: "confirmed", to: "cancelled" }));
    assert_eq!(toasts.last().unwrap().level, ToastLevel::Error);
    assert_eq!(
        store.get("rosters", roster.id).unwrap().value("status").to_string(),
        "confirmed"
    );

    let pending = rosters.toggle_confirmation(roster.id).await.unwrap();
    assert_eq!(pending.status, RosterStatus::Pending);
}

#[tokio::test]
async fn test_roster_edit_form_cannot_change_status() {
    init_logger();
    let (rosters, _) = controller(RostersScreen, memory_store());
    let roster = rosters.create(roster_form()).await.unwrap();

    let edited = rosters.update(roster.id, roster_form()).await.unwrap();
    assert_eq!(edited.status, RosterStatus::Pending);
}

#[tokio::test]
async fn test_payroll_figures_are_recomputed() {
    init_logger();
    let (payroll, _) = controller(PayrollScreen, memory_store());

    let form = Row::new()
        .set("profile_id", Uuid::new_v4())
        .set("pay_period_start", "2024-06-01")
        .set("pay_period_end", "2024-06-14")
        .set("total_hours", "40")
        .set("hourly_rate", "25")
        .set("deductions", "100")
        .set("gross_pay", "1")
        .set("net_pay", "1");
    let record = payroll.create(form).await.unwrap();
    assert_eq!(record.gross_pay, Some(Money::from_int(1000)));
    assert_eq!(record.net_pay, Some(Money::from_int(900)));

    let summary = payroll.summary().await;
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.total_net, Money::from_int(900));
}

#[tokio::test]
async fn test_partial_payroll_update_keeps_stored_inputs() {
    init_logger();
    let (payroll, _) = controller(PayrollScreen, memory_store());
    let profile_id = Uuid::new_v4();
    let required = Row::new()
        .set("profile_id", profile_id)
        .set("pay_period_start", "2024-06-01")
        .set("pay_period_end", "2024-06-14");

    let form = required
        .clone()
        .set("total_hours", "40")
        .set("hourly_rate", "25")
        .set("deductions", "100");
    let record = payroll.create(form).await.unwrap();

    let updated = payroll
        .update(record.id, required.set("deductions", "50"))
        .await
        .unwrap();
    assert_eq!(updated.total_hours, Some(Decimal::from(40)));
    assert_eq!(updated.hourly_rate, Some(Money::from_int(25)));
    assert_eq!(updated.gross_pay, Some(Money::from_int(1000)));
    assert_eq!(updated.net_pay, Some(Money::from_int(950)));
}

#[tokio::test]
async fn test_update_of_missing_row_is_rejected() {
    init_logger();
    let (payroll, toasts) = controller(PayrollScreen, memory_store());
    let form = Row::new()
        .set("profile_id", Uuid::new_v4())
        .set("pay_period_start", "2024-06-01")
        .set("pay_period_end", "2024-06-14");

    let err = payroll.update(Uuid::new_v4(), form).await.unwrap_err();
    assert!(matches!(err, Error::RowNotFound(_)));
    assert_eq!(toasts.last().unwrap().description, "Failed to update payroll record");
}

#[tokio::test]
async fn test_payroll_rejects_reversed_period() {
    init_logger();
    let (payroll, _) = controller(PayrollScreen, memory_store());
    let form = Row::new()
        .set("profile_id", Uuid::new_v4())
        .set("pay_period_start", "2024-06-14")
        .set("pay_period_end", "2024-06-01");
    let screen = PayrollScreen;
    assert!(screen.validate(&form, FormMode::Create).is_err());
    assert!(payroll.create(form).await.is_err());
}

#[tokio::test]
async fn test_working_hours_payable_is_derived() {
    init_logger();
    let (hours, _) = controller(WorkingHoursScreen, memory_store());

    let form = Row::new()
        .set("profile_id", Uuid::new_v4())
        .set("client_id", Uuid::new_v4())
        .set("project_id", Uuid::new_v4())
        .set("date", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())
        .set("start_time", "08:00")
        .set("end_time", "12:00")
        .set("hourly_rate", "30");
    let entry = hours.create(form).await.unwrap();
    assert_eq!(entry.total_hours, Some(Decimal::from(4)));
    assert_eq!(entry.payable_amount, Some(Money::from_int(120)));
    assert_eq!(hours.summary().await.pending, 1);
}

#[tokio::test]
async fn test_bank_amount_is_stored_unsigned() {
    init_logger();
    let (bank, _) = controller(BankScreen, memory_store());
    let account = BankAccount {
        id: Uuid::new_v4(),
        bank_name: "First".into(),
        account_number: "001".into(),
        opening_balance: Some(Money::from_int(1000)),
        is_primary: true,
    };

    let deposit = Row::new()
        .set("bank_account_id", account.id)
        .set("type", "deposit")
        .set("amount", "500")
        .set("description", "Invoice 12")
        .set("category", "sales")
        .set("date", "2024-06-01");
    let withdrawal = deposit
        .clone()
        .set("type", "withdrawal")
        .set("amount", "-200")
        .set("date", "2024-06-02");
    bank.create(deposit).await.unwrap();
    let stored = bank.create(withdrawal).await.unwrap();
    assert_eq!(stored.amount, Some(Money::from_int(200)));

    let summary = bank.summary(&[account]).await;
    assert_eq!(summary.total_balance, Money::from_int(1300));
    assert_eq!(summary.withdrawal_count, 1);
}

// =============================================================================
// Infinite scroll
// =============================================================================

struct FeedScreen;

impl Screen for FeedScreen {
    type Row = Client;

    fn noun(&self) -> &'static str {
        "Client"
    }

    fn plural(&self) -> &'static str {
        "clients"
    }

    fn search_fields(&self) -> &'static [&'static str] {
        &["name"]
    }

    fn columns(&self) -> Vec<ColumnDescriptor<Client>> {
        vec![ColumnDescriptor::new("name", "Name").render(|v, _| Cell::text(v.to_string()))]
    }

    fn validate(
        &self,
        _form: &Row,
        _mode: FormMode,
    ) -> Result<(), backoffice_lib::error::ValidationError> {
        Ok(())
    }

    fn infinite_scroll(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn test_infinite_scroll_appends_pages() {
    init_logger();
    let store = memory_store();
    seed_clients(&store, 23);
    let (feed, _) = controller(FeedScreen, store.clone());
    feed.refresh().await;

    let result = feed.result().await;
    let more = feed.view().load_more(&result, false).unwrap();
    assert_eq!(more, TableEvent::PageRequested(2));
    feed.handle(more).await;
    assert_eq!(feed.rows().await.len(), 20);

    let rendered = feed.render().await;
    assert!(rendered.pagination.is_none());
    assert_eq!(rendered.load_more.unwrap().next_page, 3);

    store.seed("clients", [client_row("Late", "Late Co")]);
    feed.refresh().await;
    let result = feed.result().await;
    assert_eq!(result.rows().len(), 20);
    assert_eq!(result.total(), 24);
}
