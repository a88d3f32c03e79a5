mod common;

use std::sync::Arc;

use axum::{http::StatusCode, Router};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use cards::domain::store::StoreError;
use cards::{CardsConfig, CardsModule};
use common::{body_json, empty_request, json_request, test_app, FailingStore};

async fn create(app: &Router, body: Value) -> String {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/cards", &body.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["inserted_id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn welcome_lists_endpoints() {
    let app = test_app(false);
    let response = app.oneshot(empty_request("GET", "/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Welcome to the Playing Cards API!");
    assert!(json["endpoints"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn create_then_get() {
    let app = test_app(false);
    let id = create(&app, json!({"rank": "A", "suit": "Hearts"})).await;

    let response = app
        .oneshot(empty_request("GET", &format!("/cards/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["_id"], id);
    assert_eq!(json["color"], "Red");
    assert_eq!(json["value"], 14);
}

#[tokio::test]
async fn empty_object_has_no_data() {
    let app = test_app(false);
    let response = app
        .oneshot(json_request("POST", "/cards", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn missing_body_has_no_data() {
    let app = test_app(false);
    let response = app.oneshot(empty_request("POST", "/cards")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn malformed_and_non_object_bodies() {
    let app = test_app(false);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/cards", "{\"rank\": "))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid JSON body: "));

    let response = app
        .oneshot(json_request("POST", "/cards", "[1, 2]"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Request body must be a JSON object"})
    );
}

#[tokio::test]
async fn validation_messages() {
    let app = test_app(false);
    let cases = [
        (json!({"suit": "Hearts"}), "Missing required fields: 'rank' and 'suit'"),
        (json!({"rank": "1", "suit": "Hearts"}), "Invalid rank: 1"),
        (json!({"rank": 10, "suit": "Hearts"}), "Invalid rank: 10"),
        (json!({"rank": "A", "suit": "Unicorns"}), "Invalid suit: Unicorns"),
    ];

    for (body, message) in cases {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/cards", &body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(response).await, json!({"error": message}));
    }
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = test_app(false);
    for (method, body) in [("GET", None), ("DELETE", None), ("PATCH", Some("{\"a\":1}"))] {
        let request = match body {
            Some(body) => json_request(method, "/cards/not-a-valid-id", body),
            None => empty_request(method, "/cards/not-a-valid-id"),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(body_json(response).await, json!({"error": "Invalid ID format"}));
    }
}

#[tokio::test]
async fn undecodable_id_is_bad_request_json() {
    let app = test_app(false);
    for request in [
        empty_request("GET", "/cards/%FF"),
        empty_request("DELETE", "/cards/%FF"),
        json_request("PATCH", "/cards/%FF", "{\"a\":1}"),
        json_request("PUT", "/cards/%FF", "{\"rank\":\"2\",\"suit\":\"Clubs\"}"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Invalid ID format"}));
    }
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let app = test_app(false);
    let uri = "/cards/507f1f77bcf86cd799439011";

    for request in [
        empty_request("GET", uri),
        empty_request("DELETE", uri),
        json_request("PATCH", uri, "{\"a\":1}"),
        json_request("PUT", uri, "{\"rank\":\"2\",\"suit\":\"Clubs\"}"),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "Card not found"}));
    }
}

#[tokio::test]
async fn search_without_matches_uses_capitalized_key() {
    let app = test_app(false);
    create(&app, json!({"rank": "A", "suit": "Hearts"})).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/cards/search?suit=Unicorns"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"Message": "no data found"}));

    let response = app
        .oneshot(empty_request("GET", "/cards/search?suit=Hearts&rank=A"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["value"], 14);
}

#[tokio::test]
async fn search_on_numbers_finds_nothing() {
    let app = test_app(false);
    create(&app, json!({"rank": "A", "suit": "Hearts"})).await;

    let response = app
        .oneshot(empty_request("GET", "/cards/search?value=14"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn replace_patch_and_list() {
    let app = test_app(false);
    let id = create(&app, json!({"rank": "2", "suit": "Spades"})).await;
    let uri = format!("/cards/{id}");

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, r#"{"rank":"K","suit":"Diamonds"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"modified_count": 1}));

    let response = app
        .clone()
        .oneshot(json_request("PATCH", &uri, r#"{"owner":"bob"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"modified_count": 1}));

    let response = app
        .oneshot(empty_request("GET", "/cards"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!([{
            "_id": id,
            "rank": "K",
            "suit": "Diamonds",
            "color": "Red",
            "value": 13,
            "owner": "bob",
        }])
    );
}

#[tokio::test]
async fn put_validates_before_parsing_id() {
    let app = test_app(false);
    let response = app
        .oneshot(json_request("PUT", "/cards/bad-id", "{}"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({"error": "No data provided"}));
}

#[tokio::test]
async fn delete_one_then_all() {
    let app = test_app(false);
    let id = create(&app, json!({"rank": "9", "suit": "Clubs"})).await;
    create(&app, json!({"rank": "8", "suit": "Clubs"})).await;
    create(&app, json!({"rank": "7", "suit": "Clubs"})).await;

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/cards/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"deleted_count": 1}));

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/cards"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"message": "All cards deleted (2)"})
    );

    let response = app.oneshot(empty_request("GET", "/cards")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn duplicate_create_conflicts_when_unique() {
    let app = test_app(true);
    create(&app, json!({"rank": "A", "suit": "Hearts"})).await;

    let response = app
        .oneshot(json_request("POST", "/cards", r#"{"rank":"A","suit":"Hearts"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Duplicate card entry: This card already exists in the database. Duplicates are not allowed."})
    );
}

#[tokio::test]
async fn duplicate_patch_conflicts_when_unique() {
    let app = test_app(true);
    create(&app, json!({"rank": "A", "suit": "Hearts"})).await;
    let id = create(&app, json!({"rank": "K", "suit": "Hearts"})).await;

    let response = app
        .oneshot(json_request("PATCH", &format!("/cards/{id}"), r#"{"rank":"A"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(response).await,
        json!({"error": "the card already exist, cannot update this card with the same data"})
    );
}

#[tokio::test]
async fn store_errors_are_internal() {
    let module = CardsModule::with_store(
        Arc::new(FailingStore(StoreError::backend("connection refused"))),
        CardsConfig::default(),
    );
    let app = api_ingress::ApiIngress::default().build_router(module.register_rest(Router::new()));

    let response = app.oneshot(empty_request("GET", "/cards")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"error": "connection refused"}));
}

#[tokio::test]
async fn put_on_search_path_is_not_allowed() {
    let app = test_app(false);
    let response = app
        .oneshot(json_request("PUT", "/cards/search", r#"{"rank":"A","suit":"Hearts"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = test_app(false);
    let response = app.oneshot(empty_request("GET", "/cards")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
