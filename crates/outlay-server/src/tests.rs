//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use outlay_core::db::Database;
use outlay_core::models::NewExpense;
use tower::ServiceExt;

fn setup_test_db() -> Database {
    let db = Database::in_memory().unwrap();
    db.seed_default_categories().unwrap();
    db
}

fn setup_test_app() -> Router {
    create_router(setup_test_db(), None, ServerConfig::default())
}

/// App with one user (id returned) holding expenses from Nov 2023 to Feb 2024
fn setup_app_with_expenses() -> (Router, i64) {
    let db = setup_test_db();
    let user = db.create_user("Alice").unwrap();
    let category_id = db.list_categories().unwrap()[0].id;

    for (amount, (y, m, d)) in [
        (100.0, (2023, 11, 10)),
        (200.0, (2023, 12, 5)),
        (50.0, (2024, 1, 3)),
        (250.0, (2024, 1, 20)),
        (40.0, (2024, 2, 2)),
        (35.0, (2024, 2, 14)),
    ] {
        db.insert_expense(&NewExpense {
            user_id: user.id,
            category_id,
            amount,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            description: None,
        })
        .unwrap();
    }

    (create_router(db, None, ServerConfig::default()), user.id)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

// ========== Basic API Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins("http://a.test, ,http://b.test "),
        vec!["http://a.test".to_string(), "http://b.test".to_string()]
    );
    assert!(parse_origins("").is_empty());
}

// ========== User & Category API Tests ==========

#[tokio::test]
async fn test_create_and_list_users() {
    let app = setup_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", serde_json::json!({"name": "Bob"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Bob");

    let response = app.oneshot(get_request("/api/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_user_conflict() {
    let app = setup_test_app();

    let body = serde_json::json!({"name": "Bob"});
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(json_request("POST", "/api/users", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_list_categories_seeded() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/categories")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Food"));
    assert!(names.contains(&"Other"));
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_expense_lifecycle() {
    let (app, user_id) = setup_app_with_expenses();

    let body = serde_json::json!({
        "user_id": user_id,
        "category_id": 1,
        "amount": 12.5,
        "date": "2024-01-15",
        "description": "Lunch"
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = get_body_json(response).await;
    assert_eq!(created["amount"], 12.5);
    assert_eq!(created["date"], "2024-01-15");
    assert_eq!(created["user_name"], "Alice");
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/expenses/{}", id),
            serde_json::json!({"amount": 20.0}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = get_body_json(response).await;
    assert_eq!(updated["amount"], 20.0);
    assert_eq!(updated["description"], "Lunch");

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/expenses/{}", id),
            serde_json::json!({"description": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = get_body_json(response).await;
    assert!(cleared["description"].is_null());
    assert_eq!(cleared["amount"], 20.0);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/expenses/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["message"], "Expense deleted");

    let response = app
        .oneshot(get_request(&format!("/api/expenses/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_expense_validation_details() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 0,
        "category_id": 1,
        "amount": -5,
        "date": "2999-01-01"
    });
    let response = app
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["user_id", "amount", "date"]);
}

#[tokio::test]
async fn test_create_expense_unknown_user() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 999,
        "category_id": 1,
        "amount": 5,
        "date": "2024-01-01"
    });
    let response = app
        .oneshot(json_request("POST", "/api/expenses", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_json_rejected() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/expenses")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn test_update_missing_expense_not_found() {
    let app = setup_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/expenses/4242",
            serde_json::json!({"amount": 1.0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_expenses_filters() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/expenses?user_id={}&from=2024-01-01&to=2024-01-31&sort=amount&order=asc",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let amounts: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![50.0, 250.0]);

    let response = app
        .oneshot(get_request("/api/expenses?sort=name"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Statistics API Tests ==========

#[tokio::test]
async fn test_top_days() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!("/api/stats/top-days/{}?limit=2", user_id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["date"], "2024-01-20");
    assert_eq!(data[0]["total_amount"], 250.0);
    assert_eq!(data[1]["date"], "2023-12-05");
    assert!(json.get("message").is_none());
}

#[tokio::test]
async fn test_top_days_no_data_message() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/stats/top-days/7")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());
    assert_eq!(json["message"], "No spending data available for this user");
}

#[tokio::test]
async fn test_monthly_change_pinned_date() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!(
            "/api/stats/monthly-change/{}?date=2024-01-25",
            user_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["current_total"], 300.0);
    assert_eq!(json["previous_total"], 200.0);
    assert_eq!(json["percentage_change"], 50.0);
    assert_eq!(json["previous_month"]["year"], 2023);
    assert_eq!(json["previous_month"]["month"], 12);
}

#[tokio::test]
async fn test_monthly_change_undefined_is_null() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!(
            "/api/stats/monthly-change/{}?date=2023-11-30",
            user_id
        )))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert!(json["percentage_change"].is_null());
    assert_eq!(
        json["message"],
        "Insufficient data to calculate month-over-month change"
    );
}

#[tokio::test]
async fn test_prediction() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!(
            "/api/stats/prediction/{}?date=2024-02-20",
            user_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    // (100 + 200 + 300) / 3
    assert_eq!(json["predicted_amount"], 200.0);
    assert_eq!(json["confidence"], "high");
    assert_eq!(json["months_analyzed"], 3);
}

#[tokio::test]
async fn test_prediction_without_history() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_request("/api/stats/prediction/3?date=2024-02-20"))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert!(json["predicted_amount"].is_null());
    assert_eq!(json["confidence"], "none");
    assert_eq!(json["months_analyzed"], 0);
    assert_eq!(json["message"], "Not enough data to generate prediction");
}

#[tokio::test]
async fn test_invalid_reference_date() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!(
            "/api/stats/prediction/{}?date=02-20-2024",
            user_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_daily_totals_ascending() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!("/api/stats/daily/{}", user_id)))
        .await
        .unwrap();

    let json = get_body_json(response).await;
    let dates: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["date"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
    assert_eq!(dates.len(), 6);
}

#[tokio::test]
async fn test_report_matches_compute_endpoint() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/stats/report/{}?date=2024-02-20&limit=3",
            user_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let from_db = get_body_json(response).await;

    // Feed the same records back through the client snapshot path
    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/expenses?user_id={}", user_id)))
        .await
        .unwrap();
    let expenses = get_body_json(response).await;
    let records: Vec<serde_json::Value> = expenses
        .as_array()
        .unwrap()
        .iter()
        .map(|e| {
            serde_json::json!({
                "id": e["id"],
                "user_id": e["user_id"],
                "category_id": e["category_id"],
                "amount": e["amount"],
                "date": format!("{}T00:00:00.000Z", e["date"].as_str().unwrap()),
            })
        })
        .collect();

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/stats/compute",
            serde_json::json!({
                "user_id": user_id,
                "records": records,
                "reference_date": "2024-02-20",
                "limit": 3
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let from_snapshot = get_body_json(response).await;

    assert_eq!(from_db, from_snapshot);
}

#[tokio::test]
async fn test_compute_rejects_mixed_users() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "records": [
            {"id": 1, "user_id": 1, "category_id": 1, "amount": 5.0, "date": "2024-01-01"},
            {"id": 2, "user_id": 2, "category_id": 1, "amount": 5.0, "date": "2024-01-02"}
        ]
    });
    let response = app
        .oneshot(json_request("POST", "/api/stats/compute", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_compute_rejects_malformed_date() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "records": [
            {"id": 9, "user_id": 1, "category_id": 1, "amount": 5.0, "date": "last tuesday"}
        ]
    });
    let response = app
        .oneshot(json_request("POST", "/api/stats/compute", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("record 9"));
}

#[tokio::test]
async fn test_compute_rejects_overflowing_totals() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "user_id": 1,
        "reference_date": "2024-02-10",
        "records": [
            {"id": 1, "user_id": 1, "category_id": 1, "amount": 1e308, "date": "2024-01-01"},
            {"id": 2, "user_id": 1, "category_id": 1, "amount": 1e308, "date": "2024-01-02"},
            {"id": 3, "user_id": 1, "category_id": 1, "amount": 1e308, "date": "2024-02-01"}
        ]
    });
    let response = app
        .oneshot(json_request("POST", "/api/stats/compute", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("record 2"));
}

#[tokio::test]
async fn test_non_numeric_user_id_is_json_error() {
    let app = setup_test_app();

    let response = app
        .oneshot(get_request("/api/stats/report/alice"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_limit_is_json_error() {
    let (app, user_id) = setup_app_with_expenses();

    let response = app
        .oneshot(get_request(&format!(
            "/api/stats/top-days/{}?limit=abc",
            user_id
        )))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_non_numeric_expense_id_is_json_error() {
    let app = setup_test_app();

    let response = app.oneshot(get_request("/api/expenses/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].is_string());
}
