use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, DevOps, Engineer, Group};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Send one request through a long-lived router so state persists.
async fn call<S>(app: &mut S, req: Request<String>) -> axum::response::Response
where
    S: Service<Request<String>, Response = axum::response::Response, Error = std::convert::Infallible>,
{
    ServiceExt::ready(app).await.unwrap().call(req).await.unwrap()
}

// --- list ---

#[tokio::test]
async fn collections_start_empty() {
    for uri in ["/engineers", "/dev", "/op", "/devops"] {
        let resp = app().oneshot(bare_request("GET", uri)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let items: Vec<serde_json::Value> = body_json(resp).await;
        assert!(items.is_empty(), "{uri}");
    }
}

// --- create ---

#[tokio::test]
async fn create_engineer_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/engineers",
            r#"{"name":"Colin","email":"colin@x.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let engineer: Engineer = body_json(resp).await;
    assert!(!engineer.id.is_empty());
    assert_eq!(engineer.name, "Colin");
    assert_eq!(engineer.email, "colin@x.com");
}

#[tokio::test]
async fn create_engineer_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/engineers", r#"{"nom":"Colin"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_dev_with_unknown_engineer_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/dev",
            r#"{"name":"Team1","engineers":[{"id":"nope"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_devops_with_unknown_groups_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/devops",
            r#"{"dev":[{"id":"D1"}],"ops":[{"id":"O1"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_bytes(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("D1"));
}

// --- get / update / delete of unknown ids ---

#[tokio::test]
async fn unknown_ids_return_404() {
    let cases = [
        bare_request("GET", "/engineers/id/missing"),
        bare_request("GET", "/dev/id/missing"),
        bare_request("GET", "/op/missing"),
        bare_request("GET", "/devops/missing"),
        json_request("PUT", "/engineers/id/missing", r#"{"name":"a","email":"b"}"#),
        json_request("PUT", "/dev/missing", r#"{"name":"a"}"#),
        json_request("PUT", "/op/missing", r#"{"name":"a"}"#),
        json_request("PUT", "/devops/missing", r#"{"dev":[],"ops":[]}"#),
        bare_request("DELETE", "/engineers/missing"),
        bare_request("DELETE", "/dev/missing"),
        bare_request("DELETE", "/op/missing"),
        bare_request("DELETE", "/devops/missing"),
    ];
    for req in cases {
        let label = format!("{} {}", req.method(), req.uri());
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{label}");
    }
}

// --- full lifecycle ---

#[tokio::test]
async fn group_and_pairing_lifecycle() {
    let mut app = app().into_service();

    // engineer
    let resp = call(
        &mut app,
        json_request("POST", "/engineers", r#"{"name":"Colin","email":"colin@x.com"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let colin: Engineer = body_json(resp).await;

    // dev group embeds the full engineer on read
    let body = format!(r#"{{"name":"Team1","engineers":[{{"id":"{}"}}]}}"#, colin.id);
    let resp = call(&mut app, json_request("POST", "/dev", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let dev: Group = body_json(resp).await;

    let resp = call(&mut app, bare_request("GET", &format!("/dev/id/{}", dev.id))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Group = body_json(resp).await;
    assert_eq!(fetched.name, "Team1");
    assert_eq!(fetched.engineers, vec![colin.clone()]);

    // ops group without engineers
    let resp = call(&mut app, json_request("POST", "/op", r#"{"name":"Pager"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let ops: Group = body_json(resp).await;
    assert!(ops.engineers.is_empty());

    // pairing
    let body = format!(r#"{{"dev":[{{"id":"{}"}}],"ops":[{{"id":"{}"}}]}}"#, dev.id, ops.id);
    let resp = call(&mut app, json_request("POST", "/devops", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let pairing: DevOps = body_json(resp).await;
    assert_eq!(pairing.dev[0].id, dev.id);
    assert_eq!(pairing.ops[0].id, ops.id);

    // pairing update echoes only the id
    let body = format!(r#"{{"dev":[{{"id":"{}"}}],"ops":[{{"id":"{}"}}]}}"#, dev.id, ops.id);
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/devops/{}", pairing.id), &body),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let echo: serde_json::Value = body_json(resp).await;
    assert_eq!(echo, serde_json::json!({ "id": pairing.id }));

    // pairing read embeds groups with their engineers
    let resp = call(&mut app, bare_request("GET", &format!("/devops/{}", pairing.id))).await;
    let fetched: DevOps = body_json(resp).await;
    assert_eq!(fetched.dev[0].engineers, vec![colin.clone()]);

    // update dev group to drop the engineer
    let resp = call(
        &mut app,
        json_request("PUT", &format!("/dev/{}", dev.id), r#"{"name":"Team1b"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Group = body_json(resp).await;
    assert_eq!(updated.name, "Team1b");
    assert!(updated.engineers.is_empty());

    // delete pairing, then again
    let resp = call(&mut app, bare_request("DELETE", &format!("/devops/{}", pairing.id))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());
    let resp = call(&mut app, bare_request("DELETE", &format!("/devops/{}", pairing.id))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // listing reflects what is left
    let resp = call(&mut app, bare_request("GET", "/devops")).await;
    let left: Vec<DevOps> = body_json(resp).await;
    assert!(left.is_empty());
    let resp = call(&mut app, bare_request("GET", "/dev")).await;
    let left: Vec<Group> = body_json(resp).await;
    assert_eq!(left.len(), 1);
}
