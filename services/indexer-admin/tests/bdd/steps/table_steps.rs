//! BDD step definitions for the index table: setup, connectivity and polling

use cucumber::{given, then, when};
use indexer_admin::model::{IndexConfig, IndexId, RunningStatus};
use indexer_admin::table::{Connectivity, TableBody};

use crate::world::IndexerAdminWorld;

#[given(expr = "an API server with index configs {string}")]
fn server_with_configs(world: &mut IndexerAdminWorld, names: String) {
    let configs: Vec<IndexConfig> = names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(i, name)| IndexConfig::new(IndexId::from(i as u64 + 1), name))
        .collect();
    for config in &configs {
        world.ids.insert(config.name().to_string(), config.id());
    }
    world.server().configs = configs;
}

#[given(expr = "the API server lists the raw configs {string}")]
fn server_with_raw_configs(world: &mut IndexerAdminWorld, json: String) {
    world.server().configs = serde_json::from_str(&json).expect("invalid config list");
}

#[given("an API server with no index configs")]
fn server_without_configs(world: &mut IndexerAdminWorld) {
    world.server().configs.clear();
}

#[given(expr = "index {string} has completed a successful run")]
fn successful_run(world: &mut IndexerAdminWorld, name: String) {
    let mut server = world.server();
    let config = server
        .configs
        .iter_mut()
        .find(|c| c.name() == name)
        .expect("index not on server");
    config.set_successful_run(true);
}

#[given(expr = "index {string} is used in dashboard {string}")]
fn used_in_dashboard(world: &mut IndexerAdminWorld, name: String, title: String) {
    let mut server = world.server();
    let config = server
        .configs
        .iter_mut()
        .find(|c| c.name() == name)
        .expect("index not on server");
    config.insert_dashboard(format!("{}-dashboard", title.to_lowercase()), title);
}

#[given("the index table has started")]
async fn table_started(world: &mut IndexerAdminWorld) {
    world.table().start().await;
}

fn mark_running(world: &mut IndexerAdminWorld, name: &str) {
    let id = world.id_of(name);
    world
        .server()
        .running
        .insert(id, serde_json::json!({"phase": "indexing", "progress": 0.5}));
}

#[given(expr = "index {string} is running")]
fn index_running(world: &mut IndexerAdminWorld, name: String) {
    mark_running(world, &name);
}

#[when(expr = "index {string} starts running")]
fn index_starts_running(world: &mut IndexerAdminWorld, name: String) {
    mark_running(world, &name);
}

#[when("no index is running")]
fn nothing_running(world: &mut IndexerAdminWorld) {
    world.server().running = RunningStatus::new();
}

#[when("the API server goes down")]
fn server_down(world: &mut IndexerAdminWorld) {
    world.server().up = false;
}

#[when("the API server comes back")]
fn server_up(world: &mut IndexerAdminWorld) {
    world.server().up = true;
}

#[when(expr = "the config list is polled {int} time(s)")]
async fn poll_configs(world: &mut IndexerAdminWorld, times: usize) {
    let table = world.table();
    for _ in 0..times {
        table.load_indexes().await;
    }
}

#[when("the running status is polled")]
async fn poll_running(world: &mut IndexerAdminWorld) {
    world.table().load_running().await;
}

#[then("the index table is online")]
fn table_online(world: &mut IndexerAdminWorld) {
    assert_eq!(world.table().connectivity(), Connectivity::Online);
}

#[then("the index table is offline")]
fn table_offline(world: &mut IndexerAdminWorld) {
    assert_eq!(world.table().connectivity(), Connectivity::Offline);
}

#[then(expr = "the table shows {int} index config(s)")]
async fn table_shows(world: &mut IndexerAdminWorld, count: usize) {
    assert_eq!(world.table().configs().await.len(), count);
}

#[then(expr = "the config list was fetched {int} time(s)")]
fn configs_fetched(world: &mut IndexerAdminWorld, count: usize) {
    assert_eq!(world.server().config_fetches, count);
}

#[then(expr = "row {string} has status {string}")]
async fn row_status(world: &mut IndexerAdminWorld, name: String, expected: String) {
    let snapshot = world.table().snapshot().await;
    let TableBody::Rows { rows } = snapshot.body else {
        panic!("table has no rows");
    };
    let row = rows
        .iter()
        .find(|r| r.config.name() == name)
        .unwrap_or_else(|| panic!("no row for {}", name));
    assert_eq!(serde_json::to_value(row.status).unwrap(), expected);
}
