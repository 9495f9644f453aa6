//! BDD step definitions for importing and exporting bundles

use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use indexer_admin::model::ImportCounts;
use indexer_admin::table::pretty_json;

use crate::world::IndexerAdminWorld;

#[given(expr = "the API server reports {int} new and {int} changed configs on import")]
fn import_counts(world: &mut IndexerAdminWorld, created: u64, changed: u64) {
    world.server().import_counts = ImportCounts { created, changed };
}

#[given(expr = "the API server exports the bundle {string}")]
fn export_bundle(world: &mut IndexerAdminWorld, bundle: String) {
    world.server().export = serde_json::from_str(&bundle).expect("invalid bundle");
}

#[when(expr = "the file {string} is imported with contents:")]
async fn import_file(world: &mut IndexerAdminWorld, file_name: String, step: &Step) {
    let contents = step.docstring.as_deref().unwrap_or_default().trim();
    world.table().import(&file_name, contents).await;
}

#[when("the exported bundle is imported again")]
async fn reimport_export(world: &mut IndexerAdminWorld) {
    let table = world.table();
    let text = table.export().await.expect("export failed");
    table.import("indexer-configs.conf", &text).await;
}

#[then(expr = "the API received the config {string}")]
fn received_config(world: &mut IndexerAdminWorld, expected: String) {
    assert_eq!(world.server().imports, vec![vec![expected]]);
}

#[then(expr = "the API received an import of {int} configs")]
fn received_import(world: &mut IndexerAdminWorld, count: usize) {
    let server = world.server();
    assert_eq!(server.imports.len(), 1);
    assert_eq!(server.imports[0].len(), count);
    for config in &server.imports[0] {
        assert!(serde_json::from_str::<serde_json::Value>(config).is_ok());
        assert!(!config.contains('\n'));
    }
}

#[then("the API received no imports")]
fn received_no_imports(world: &mut IndexerAdminWorld) {
    assert!(world.server().imports.is_empty());
}

#[then("no import file is selected")]
async fn no_import_file(world: &mut IndexerAdminWorld) {
    assert_eq!(world.table().import_file().await, None);
}

#[then("the response body is the bundle indented with four spaces")]
fn body_is_pretty_bundle(world: &mut IndexerAdminWorld) {
    let expected = pretty_json(&world.server().export).unwrap();
    assert_eq!(world.response_body.as_deref(), Some(expected.as_str()));
    assert!(expected.contains("\n    {"));
}
