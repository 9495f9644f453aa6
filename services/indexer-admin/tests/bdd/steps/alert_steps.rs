//! BDD step definitions for alerts raised into the app shell

use cucumber::then;
use indexer_admin::app::AlertEntry;

use crate::world::IndexerAdminWorld;

async fn last_alert(world: &IndexerAdminWorld) -> AlertEntry {
    world
        .shell
        .alerts_after(0)
        .await
        .pop()
        .expect("no alerts were raised")
}

#[then("no alerts were raised")]
async fn no_alerts(world: &mut IndexerAdminWorld) {
    let alerts = world.shell.alerts_after(0).await;
    assert!(alerts.is_empty(), "unexpected alerts: {:?}", alerts);
}

#[then(expr = "{int} alert(s) titled {string} was raised")]
async fn alerts_titled(world: &mut IndexerAdminWorld, count: usize, title: String) {
    let alerts = world.shell.alerts_after(0).await;
    let matching = alerts.iter().filter(|e| e.alert.title == title).count();
    assert_eq!(matching, count, "alerts: {:?}", alerts);
}

#[then(expr = "the last alert is a {string} alert lasting {int} seconds")]
async fn last_alert_style(world: &mut IndexerAdminWorld, variant: String, seconds: u32) {
    let entry = last_alert(world).await;
    assert_eq!(entry.alert.variant.to_string(), variant);
    assert_eq!(entry.alert.duration_sec, seconds);
}

#[then(expr = "the last alert message contains {string}")]
async fn last_alert_contains(world: &mut IndexerAdminWorld, expected: String) {
    let entry = last_alert(world).await;
    assert!(
        entry.alert.message.contains(&expected),
        "Expected alert message to contain '{}', got '{}'",
        expected,
        entry.alert.message
    );
}

#[then(expr = "the last alert reports {int} new and {int} changed configs")]
async fn last_alert_counts(world: &mut IndexerAdminWorld, created: u64, changed: u64) {
    let entry = last_alert(world).await;
    assert_eq!(
        entry.alert.message,
        format!(
            "Successful import:\n\tnew: {},\n\tchanged: {}",
            created, changed
        )
    );
}
