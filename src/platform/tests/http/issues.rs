use platform::issues::Issue;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::json;
use serde_json::Value;

use crate::run_http_service;

async fn create_issue(cl: &Client, base_url: &str, project: &str, body: Value) -> Issue {
    let resp = cl
        .post(format!("{base_url}/api/issues/{project}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json::<Issue>().await.unwrap()
}

async fn list_issues(cl: &Client, url: String) -> Vec<Issue> {
    let resp = cl.get(url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json::<Vec<Issue>>().await.unwrap()
}

#[tokio::test]
async fn test_create_issue_with_every_field() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "Functional Test - Every field",
        "assigned_to": "Chai and Mocha",
        "status_text": "In QA",
        // a stray project in the body is discarded in favor of the path
        "project": "spoofed",
    }))
    .await;

    assert_eq!(issue.issue_title, "Title");
    assert_eq!(issue.issue_text, "text");
    assert_eq!(issue.created_by, "Functional Test - Every field");
    assert_eq!(issue.assigned_to, "Chai and Mocha");
    assert_eq!(issue.status_text, "In QA");
    assert_eq!(issue.project, "apitest");
    assert!(issue.open);
    assert_eq!(issue.created_on, issue.updated_on);
    assert!(!issue.id.is_empty());
}

#[tokio::test]
async fn test_create_issue_with_only_required_fields() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "Functional Test - Required fields",
    }))
    .await;

    assert_eq!(issue.assigned_to, "");
    assert_eq!(issue.status_text, "");
    assert!(issue.open);
}

#[tokio::test]
async fn test_create_issue_with_missing_required_fields() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let bodies = [
        json!({"issue_title": "Title", "issue_text": "text"}),
        json!({"issue_title": "Title", "created_by": "joe"}),
        json!({"issue_text": "text", "created_by": "joe"}),
        json!({}),
        // empty strings count as missing
        json!({"issue_title": "", "issue_text": "text", "created_by": "joe"}),
    ];

    for body in bodies {
        let resp = cl
            .post(format!("{base_url}/api/issues/apitest"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp: Value = resp.json().await.unwrap();
        assert_eq!(resp, json!({"error": "required field(s) missing"}));
    }
}

#[tokio::test]
async fn test_view_issues_on_a_project() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    // empty project lists as an empty array
    let issues = list_issues(&cl, format!("{base_url}/api/issues/alpha")).await;
    assert!(issues.is_empty());

    for title in ["one", "two"] {
        create_issue(&cl, &base_url, "alpha", json!({
            "issue_title": title,
            "issue_text": "text",
            "created_by": "joe",
        }))
        .await;
    }
    create_issue(&cl, &base_url, "beta", json!({
        "issue_title": "other",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let issues = list_issues(&cl, format!("{base_url}/api/issues/alpha")).await;
    assert_eq!(
        issues.iter().map(|i| i.issue_title.as_str()).collect::<Vec<_>>(),
        vec!["one", "two"]
    );

    // projects only see their own issues
    let issues = list_issues(&cl, format!("{base_url}/api/issues/beta")).await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_title, "other");
}

#[tokio::test]
async fn test_view_issues_with_one_filter() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "alice",
    }))
    .await;
    create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "bob",
    }))
    .await;

    let issues =
        list_issues(&cl, format!("{base_url}/api/issues/apitest?created_by=alice")).await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].created_by, "alice");
}

#[tokio::test]
async fn test_view_issues_by_id_and_timestamp() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let first = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "first",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;
    // keep the two creation instants distinct
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "second",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest?_id={}", second.id)).await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, second.id);

    let resp = cl
        .get(format!("{base_url}/api/issues/apitest"))
        .query(&[("created_on", first.created_on.to_rfc3339())])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let issues = resp.json::<Vec<Issue>>().await.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, first.id);

    // an unparsable timestamp matches nothing
    let issues =
        list_issues(&cl, format!("{base_url}/api/issues/apitest?created_on=yesterday")).await;
    assert!(issues.is_empty());
}

#[tokio::test]
async fn test_view_issues_with_multiple_filters() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "alice",
    }))
    .await;
    create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Other",
        "issue_text": "text",
        "created_by": "alice",
    }))
    .await;

    let issues = list_issues(
        &cl,
        format!("{base_url}/api/issues/apitest?created_by=alice&issue_title=Title"),
    )
    .await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_title, "Title");
    assert_eq!(issues[0].created_by, "alice");
}

#[tokio::test]
async fn test_view_issues_open_filter() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let kept_open = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "open one",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;
    let closed = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "closed one",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let resp = cl
        .put(format!("{base_url}/api/issues/apitest"))
        .json(&json!({"_id": closed.id, "open": false}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest?open=true")).await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, kept_open.id);

    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest?open=false")).await;
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].id, closed.id);

    // a filter key no issue carries matches nothing
    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest?flavor=vanilla")).await;
    assert!(issues.is_empty());
}

#[tokio::test]
async fn test_update_one_field() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let resp = cl
        .put(format!("{base_url}/api/issues/apitest"))
        .json(&json!({"_id": issue.id, "issue_text": "Updated text"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(
        resp,
        json!({"result": "successfully updated", "_id": issue.id})
    );

    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest")).await;
    assert_eq!(issues[0].issue_text, "Updated text");
    // unspecified fields stay untouched, updated_on is refreshed
    assert_eq!(issues[0].issue_title, "Title");
    assert!(issues[0].updated_on >= issues[0].created_on);
}

#[tokio::test]
async fn test_update_multiple_fields() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let resp = cl
        .put(format!("{base_url}/api/issues/apitest"))
        .json(&json!({
            "_id": issue.id,
            "issue_title": "Updated title",
            "issue_text": "Updated text",
            "open": false,
        }))
        .send()
        .await
        .unwrap();
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(
        resp,
        json!({"result": "successfully updated", "_id": issue.id})
    );

    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest")).await;
    assert_eq!(issues[0].issue_title, "Updated title");
    assert_eq!(issues[0].issue_text, "Updated text");
    assert!(!issues[0].open);
}

#[tokio::test]
async fn test_update_with_missing_id() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let resp = cl
        .put(format!("{base_url}/api/issues/apitest"))
        .json(&json!({"issue_text": "Updated text"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(resp, json!({"error": "missing _id"}));
}

#[tokio::test]
async fn test_update_with_no_fields() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    for body in [
        json!({"_id": issue.id}),
        // empty strings are skipped, not applied
        json!({"_id": issue.id, "issue_title": "", "assigned_to": ""}),
    ] {
        let resp = cl
            .put(format!("{base_url}/api/issues/apitest"))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp: Value = resp.json().await.unwrap();
        assert_eq!(
            resp,
            json!({"error": "no update field(s) sent", "_id": issue.id})
        );
    }
}

#[tokio::test]
async fn test_update_with_open_null_is_a_sent_field() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let resp = cl
        .put(format!("{base_url}/api/issues/apitest"))
        .json(&json!({"_id": issue.id, "open": null}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(
        resp,
        json!({"result": "successfully updated", "_id": issue.id})
    );

    // the stored value stays untouched
    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest")).await;
    assert!(issues[0].open);
    assert!(issues[0].updated_on >= issues[0].created_on);
}

#[tokio::test]
async fn test_update_missing_or_malformed_id_is_not_a_fault() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    for id in ["999999", "not-an-id"] {
        let resp = cl
            .put(format!("{base_url}/api/issues/apitest"))
            .json(&json!({"_id": id, "issue_text": "Updated text"}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp: Value = resp.json().await.unwrap();
        assert_eq!(resp, json!({"error": "could not update", "_id": id}));
    }
}

#[tokio::test]
async fn test_delete_issue() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let issue = create_issue(&cl, &base_url, "apitest", json!({
        "issue_title": "Title",
        "issue_text": "text",
        "created_by": "joe",
    }))
    .await;

    let resp = cl
        .delete(format!("{base_url}/api/issues/apitest"))
        .json(&json!({"_id": issue.id}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(
        resp,
        json!({"result": "successfully deleted", "_id": issue.id})
    );

    let issues = list_issues(&cl, format!("{base_url}/api/issues/apitest")).await;
    assert!(issues.is_empty());

    // a delete is not repeatable
    let resp = cl
        .delete(format!("{base_url}/api/issues/apitest"))
        .json(&json!({"_id": issue.id}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(resp, json!({"error": "could not delete", "_id": issue.id}));
}

#[tokio::test]
async fn test_delete_missing_or_malformed_id() {
    let (base_url, _md, _pp) = run_http_service().await.unwrap();
    let cl = Client::new();

    let resp = cl
        .delete(format!("{base_url}/api/issues/apitest"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let resp: Value = resp.json().await.unwrap();
    assert_eq!(resp, json!({"error": "missing _id"}));

    for id in ["424242", "not-an-id"] {
        let resp = cl
            .delete(format!("{base_url}/api/issues/apitest"))
            .json(&json!({"_id": id}))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp: Value = resp.json().await.unwrap();
        assert_eq!(resp, json!({"error": "could not delete", "_id": id}));
    }
}
