//! BDD step definitions for the web dashboard

use axum::body::Body;
use axum::http::Request;
use cucumber::{then, when};
use tower::ServiceExt;

use indexer_admin::dashboard::{build_router, DashboardState};

use crate::world::IndexerAdminWorld;

#[when(expr = "the dashboard page {string} is requested")]
async fn request_page(world: &mut IndexerAdminWorld, uri: String) {
    let app = build_router(DashboardState {
        shell: world.shell.clone(),
        table: world.table(),
        export_file_name: "indexer-configs.conf".to_string(),
    });
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    world.response_status = Some(response.status().as_u16());
    world.response_headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(String::from_utf8(body.to_vec()).unwrap());
}

#[then(expr = "the response status is {int}")]
fn response_status(world: &mut IndexerAdminWorld, status: u16) {
    assert_eq!(world.response_status, Some(status));
}

#[then(expr = "the response header {string} is {string}")]
fn response_header(world: &mut IndexerAdminWorld, name: String, expected: String) {
    let name = name.to_lowercase();
    let value = world
        .response_headers
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v.as_str());
    assert_eq!(value, Some(expected.as_str()));
}

#[then(expr = "the response should contain {string}")]
fn response_contains(world: &mut IndexerAdminWorld, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        body.contains(&expected),
        "Expected response to contain '{}', but it didn't.\nResponse body:\n{}",
        expected,
        body
    );
}

#[then(expr = "the response should not contain {string}")]
fn response_lacks(world: &mut IndexerAdminWorld, unexpected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        !body.contains(&unexpected),
        "Expected response not to contain '{}'",
        unexpected
    );
}
