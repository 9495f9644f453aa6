//! BDD step definitions for the delete dialog

use cucumber::{given, then, when};

use crate::world::IndexerAdminWorld;

#[given(expr = "the API server rejects deletes with {string}")]
fn rejects_deletes(world: &mut IndexerAdminWorld, reason: String) {
    world.server().reject_deletes = Some(reason);
}

#[when(expr = "the delete dialog is opened for {string}")]
async fn open_dialog(world: &mut IndexerAdminWorld, name: String) {
    let id = world.id_of(&name);
    let popup = world.table().show_delete_popup(&id).await;
    assert!(popup.is_some(), "no config with id {}", id);
}

#[when("the delete-data switch is turned on")]
async fn switch_on(world: &mut IndexerAdminWorld) {
    world.table().set_delete_data(true).await;
}

#[when("the deletion is confirmed")]
async fn confirm(world: &mut IndexerAdminWorld) {
    world.table().confirm_delete().await;
}

#[when("the deletion is cancelled")]
async fn cancel(world: &mut IndexerAdminWorld) {
    world.table().cancel_delete().await;
}

#[then(expr = "the dialog lists dashboard {string}")]
async fn lists_dashboard(world: &mut IndexerAdminWorld, title: String) {
    let popup = world.table().delete_popup().await.expect("dialog closed");
    assert_eq!(popup.affected_dashboards(), vec![title.as_str()]);
}

#[then("the dialog lists no dashboards")]
async fn lists_no_dashboards(world: &mut IndexerAdminWorld) {
    let popup = world.table().delete_popup().await.expect("dialog closed");
    assert!(popup.affected_dashboards().is_empty());
}

#[then("the dialog offers to delete indexed data")]
async fn offers_delete_data(world: &mut IndexerAdminWorld) {
    let popup = world.table().delete_popup().await.expect("dialog closed");
    assert!(popup.offers_delete_data());
}

#[then("the dialog does not offer to delete indexed data")]
async fn withholds_delete_data(world: &mut IndexerAdminWorld) {
    let popup = world.table().delete_popup().await.expect("dialog closed");
    assert!(!popup.offers_delete_data());
}

#[then("the delete dialog is closed")]
async fn dialog_closed(world: &mut IndexerAdminWorld) {
    assert!(world.table().delete_popup().await.is_none());
}

#[then(expr = "the API received a delete of {string} with delete data {string}")]
fn received_delete(world: &mut IndexerAdminWorld, name: String, delete_data: String) {
    let id = world.id_of(&name);
    let expected = delete_data == "true";
    assert_eq!(world.server().deletes, vec![(id, expected)]);
}

#[then("the API received no deletes")]
fn received_no_deletes(world: &mut IndexerAdminWorld) {
    assert!(world.server().deletes.is_empty());
}
