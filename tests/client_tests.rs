//! Integration tests for the TwentyClient using mockito for HTTP mocking.

use mockito::{Matcher, Server};
use serde_json::json;
use twenty_sync::client::RestListParams;
use twenty_sync::{TwentyApiError, TwentyClient};

fn client(server: &Server) -> TwentyClient {
    TwentyClient::with_base_url(server.url(), "test-api-key".to_string())
}

#[test]
fn test_graphql_returns_data() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/graphql")
        .match_header("authorization", "Bearer test-api-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"first": 5}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"people": {"edges": [], "totalCount": 0}}}"#)
        .create();

    let data = client(&server)
        .graphql("query { people { totalCount } }", json!({"first": 5}))
        .unwrap();

    mock.assert();
    assert_eq!(data["people"]["totalCount"], 0);
}

#[test]
fn test_graphql_errors_on_http_200() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": null, "errors": [{"message": "Field \"foo\" does not exist"}]}"#)
        .create();

    let client = client(&server);
    let err = client.graphql("query { foo }", json!({})).unwrap_err();

    mock.assert();
    match err {
        TwentyApiError::GraphqlError(messages) => {
            assert_eq!(messages, vec!["Field \"foo\" does not exist".to_string()])
        }
        other => panic!("expected GraphqlError, got {:?}", other),
    }
    assert_eq!(client.metrics().graphql_errors_total(), 1);
}

#[test]
fn test_graphql_errors_on_http_400() {
    let mut server = Server::new();

    let mock = server
        .mock("POST", "/graphql")
        .with_status(400)
        .with_body(r#"{"errors": [{"message": "Variable \"$data\" got invalid value"}]}"#)
        .create();

    let err = client(&server).graphql("mutation {}", json!({})).unwrap_err();

    mock.assert();
    assert!(matches!(err, TwentyApiError::GraphqlError(_)));
    assert!(err.to_string().contains("got invalid value"));
}

#[test]
fn test_graphql_without_data_is_an_error() {
    let mut server = Server::new();

    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": null}"#)
        .create();

    let err = client(&server).graphql("query {}", json!({})).unwrap_err();
    assert!(matches!(err, TwentyApiError::Other(_)));
}

#[test]
fn test_status_codes_map_to_errors() {
    let mut server = Server::new();

    let _unauthorized = server
        .mock("GET", "/rest/people/a")
        .with_status(401)
        .create();
    let _missing = server
        .mock("GET", "/rest/people/b")
        .with_status(404)
        .with_body("no such person")
        .create();
    let _limited = server
        .mock("GET", "/rest/people/c")
        .with_status(429)
        .create();
    let _broken = server
        .mock("GET", "/rest/people/d")
        .with_status(500)
        .with_body("boom")
        .create();

    let client = client(&server);
    assert!(matches!(
        client.rest_get("people", "a"),
        Err(TwentyApiError::Unauthorized)
    ));
    assert!(matches!(
        client.rest_get("people", "b"),
        Err(TwentyApiError::NotFound(msg)) if msg == "no such person"
    ));
    assert!(matches!(
        client.rest_get("people", "c"),
        Err(TwentyApiError::RateLimitExceeded)
    ));
    assert!(matches!(
        client.rest_get("people", "d"),
        Err(TwentyApiError::ApiError { status: 500, .. })
    ));
    assert_eq!(client.metrics().http_errors_total(), 4);
}

#[test]
fn test_rest_list_encodes_filter_and_order() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/rest/companies")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "10".into()),
            Matcher::UrlEncoded("filter".into(), r#"name[ilike]:"%acme%""#.into()),
            Matcher::UrlEncoded("order_by".into(), "createdAt[DescNullsLast]".into()),
        ]))
        .match_header("authorization", "Bearer test-api-key")
        .with_status(200)
        .with_body(r#"{"data": {"companies": [{"id": "c1", "name": "Acme"}]}, "totalCount": 1}"#)
        .create();

    let body = client(&server)
        .rest_list(
            "companies",
            &RestListParams {
                filter: Some(r#"name[ilike]:"%acme%""#.to_string()),
                limit: 10,
                order_by: Some("createdAt[DescNullsLast]".to_string()),
            },
        )
        .unwrap();

    mock.assert();
    assert_eq!(body["data"]["companies"][0]["name"], "Acme");
}

#[test]
fn test_rest_write_methods() {
    let mut server = Server::new();

    let create = server
        .mock("POST", "/rest/notes")
        .match_body(Matcher::PartialJson(json!({"title": "Kickoff"})))
        .with_status(201)
        .with_body(r#"{"data": {"createNote": {"id": "n1", "title": "Kickoff"}}}"#)
        .create();
    let update = server
        .mock("PUT", "/rest/notes/n1")
        .match_body(Matcher::PartialJson(json!({"title": "Renamed"})))
        .with_status(200)
        .with_body(r#"{"data": {"updateNote": {"id": "n1", "title": "Renamed"}}}"#)
        .create();
    let delete = server
        .mock("DELETE", "/rest/notes/n1")
        .with_status(200)
        .with_body(r#"{"data": {"deleteNote": {"id": "n1"}}}"#)
        .create();

    let client = client(&server);
    let created = client
        .rest_create("notes", &json!({"title": "Kickoff"}))
        .unwrap();
    let updated = client
        .rest_update("notes", "n1", &json!({"title": "Renamed"}))
        .unwrap();
    let deleted = client.rest_delete("notes", "n1").unwrap();

    create.assert();
    update.assert();
    delete.assert();
    assert_eq!(created["data"]["createNote"]["id"], "n1");
    assert_eq!(updated["data"]["updateNote"]["title"], "Renamed");
    assert_eq!(deleted["data"]["deleteNote"]["id"], "n1");
    assert_eq!(client.metrics().http_requests_total(), 3);
}

#[test]
fn test_empty_body_is_null() {
    let mut server = Server::new();

    let _mock = server
        .mock("DELETE", "/rest/tasks/t1")
        .with_status(204)
        .create();

    let body = client(&server).rest_delete("tasks", "t1").unwrap();
    assert!(body.is_null());
}
