//! End-to-end flows: repository writes propagating into dashboard streams.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};

use duka_credit::CreditCustomer;
use duka_dashboard::Dashboard;
use duka_finance::FinanceRecord;
use duka_repository::Repositories;
use duka_stock::StockItem;
use duka_store::InMemoryBackend;

async fn setup() -> (Repositories, Dashboard) {
    duka_observability::init();
    let repositories = Repositories::open(Arc::new(InMemoryBackend::new()))
        .await
        .unwrap();
    let dashboard = Dashboard::new(&repositories);
    (repositories, dashboard)
}

#[tokio::test]
async fn low_stock_alert_follows_quantity_updates() {
    let (repositories, dashboard) = setup().await;
    let mut low_stock = dashboard.low_stock_items();
    assert_eq!(low_stock.recv().await.unwrap(), vec![]);

    let mut sugar = StockItem::new("Sugar", 8, 150, 170, 15);
    sugar.id = Some(repositories.stock.add(&sugar).await.unwrap());

    let alerts = low_stock.recv().await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].name, "Sugar");

    sugar.quantity = 20;
    repositories.stock.update(&sugar).await.unwrap();
    assert_eq!(low_stock.recv().await.unwrap(), vec![]);
}

#[tokio::test]
async fn latest_finance_record_switches_to_the_newer_date() {
    let (repositories, dashboard) = setup().await;
    let mut latest = dashboard.latest_finance_record();
    assert_eq!(latest.recv().await.unwrap(), None);

    let day_one = Utc::now() - ChronoDuration::days(1);
    repositories
        .finance
        .add(&FinanceRecord::new(day_one, 25_000, 15_000, 5_000))
        .await
        .unwrap();

    let first = latest.recv().await.unwrap().unwrap();
    assert_eq!(first.total(), 45_000);
    assert_eq!(first.date, day_one);

    let day_two = Utc::now();
    let second_key = repositories
        .finance
        .add(&FinanceRecord::new(day_two, 30_000, 10_000, 2_000))
        .await
        .unwrap();

    let second = latest.recv().await.unwrap().unwrap();
    assert_eq!(second.id, Some(second_key));
    assert_eq!(second.total(), 42_000);
}

#[tokio::test]
async fn equal_dates_resolve_to_the_highest_key() {
    let (repositories, dashboard) = setup().await;
    let mut latest = dashboard.latest_finance_record();
    assert_eq!(latest.recv().await.unwrap(), None);

    let date = Utc::now();
    repositories
        .finance
        .add(&FinanceRecord::new(date, 100, 0, 0))
        .await
        .unwrap();
    latest.recv().await.unwrap();

    let later_key = repositories
        .finance
        .add(&FinanceRecord::new(date, 200, 0, 0))
        .await
        .unwrap();

    let winner = latest.recv().await.unwrap().unwrap();
    assert_eq!(winner.id, Some(later_key));
}

#[tokio::test]
async fn total_credit_sums_signed_balances() {
    let (repositories, dashboard) = setup().await;
    let mut total = dashboard.total_credit();
    assert_eq!(total.recv().await.unwrap(), 0);

    repositories
        .credit
        .add(&CreditCustomer::new("Wanjiku", "0712345678", 1500))
        .await
        .unwrap();
    assert_eq!(total.recv().await.unwrap(), 1500);

    repositories
        .credit
        .add(&CreditCustomer::new("Otieno", "0798765432", -200))
        .await
        .unwrap();
    assert_eq!(total.recv().await.unwrap(), 1300);
}

#[tokio::test]
async fn total_credit_recomputes_on_delete() {
    let (repositories, dashboard) = setup().await;
    let mut total = dashboard.total_credit();
    assert_eq!(total.recv().await.unwrap(), 0);

    let mut customer = CreditCustomer::new("Wanjiku", "0712345678", 1500);
    customer.id = Some(repositories.credit.add(&customer).await.unwrap());
    assert_eq!(total.recv().await.unwrap(), 1500);

    repositories.credit.delete(&customer).await.unwrap();
    assert_eq!(total.recv().await.unwrap(), 0);

    // The key is now stale; a second delete must fail loudly.
    assert!(repositories
        .credit
        .delete(&customer)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn last_three_days_shows_newest_first_and_truncates() {
    let (repositories, dashboard) = setup().await;
    let mut recent = dashboard.last_three_days_records();
    assert_eq!(recent.recv().await.unwrap(), vec![]);

    let now = Utc::now();
    let dates = [
        now - ChronoDuration::days(10), // outside the window
        now - ChronoDuration::days(1),
        now - ChronoDuration::hours(2),
        now,
        now - ChronoDuration::hours(1),
    ];
    let mut keys = Vec::new();
    for date in dates {
        keys.push(
            repositories
                .finance
                .add(&FinanceRecord::new(date, 100, 0, 0))
                .await
                .unwrap(),
        );
    }

    // Newest three of the in-window records: now, now-1h, now-2h.
    let expected = vec![keys[3], keys[4], keys[2]];
    loop {
        let records = recent.recv().await.unwrap();
        let got: Vec<_> = records.iter().map(|r| r.id.unwrap()).collect();
        if got == expected {
            break;
        }
    }
}

#[tokio::test]
async fn concurrent_observers_see_identical_derived_values() {
    let (repositories, dashboard) = setup().await;
    let mut first = dashboard.total_credit();
    let mut second = dashboard.total_credit();
    assert_eq!(first.recv().await, second.recv().await);

    repositories
        .credit
        .add(&CreditCustomer::new("Wanjiku", "0712345678", 700))
        .await
        .unwrap();

    assert_eq!(first.recv().await, Some(700));
    assert_eq!(second.recv().await, Some(700));
}

#[tokio::test(start_paused = true)]
async fn keep_alive_replays_then_rederives_after_the_window() {
    let repositories = Repositories::open(Arc::new(InMemoryBackend::new()))
        .await
        .unwrap();
    let grace = Duration::from_secs(5);
    let dashboard = Dashboard::with_grace(&repositories, grace);

    let mut total = dashboard.total_credit();
    assert_eq!(total.recv().await.unwrap(), 0);
    repositories
        .credit
        .add(&CreditCustomer::new("Wanjiku", "0712345678", 1500))
        .await
        .unwrap();
    assert_eq!(total.recv().await.unwrap(), 1500);
    drop(total);

    // Back within the grace window: cached value, no fresh derivation.
    tokio::time::sleep(grace / 2).await;
    let mut replayed = dashboard.total_credit();
    assert_eq!(replayed.recv().await.unwrap(), 1500);
    drop(replayed);

    // Past the window: fresh start from the initial value, then a full
    // re-derivation from the store.
    tokio::time::sleep(grace * 2).await;
    let mut fresh = dashboard.total_credit();
    assert_eq!(fresh.recv().await.unwrap(), 0);
    assert_eq!(fresh.recv().await.unwrap(), 1500);
}
