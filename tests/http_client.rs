//! HttpPortalClient against an in-process mock backend.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use pharmacy_portal::api::{ApiError, AuthApi, BranchOrderApi, BranchReturnApi};
use pharmacy_portal::domain::aggregates::order::{OrderCreateRequest, OrderListParams, OrderStatus};
use pharmacy_portal::domain::aggregates::returns::ReturnCreateRequest;
use pharmacy_portal::domain::value_objects::{OrderId, PharmacyId, ProductId};
use pharmacy_portal::validation::LoginRequest;
use pharmacy_portal::{CartLineItem, HttpPortalClient, ReturnLineItem, Session, SubmissionFlow, Won};

#[derive(Default)]
struct Backend {
    allow_refresh: AtomicBool,
    refresh_calls: AtomicUsize,
    orders: Mutex<Vec<Value>>,
    list_query: Mutex<Option<HashMap<String, String>>>,
}

type Reply = (StatusCode, Json<Value>);

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers.get("authorization").and_then(|v| v.to_str().ok()).and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> Reply { (StatusCode::UNAUTHORIZED, Json(json!({"success": false, "message": "토큰이 만료되었습니다."}))) }

async fn login(Json(body): Json<Value>) -> Reply {
    if body["password"] != "Pharm123!" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"success": false, "message": "아이디 또는 비밀번호가 일치하지 않습니다."})));
    }
    (StatusCode::OK, Json(json!({"success": true, "data": {
        "accessToken": "stale",
        "user": {"userId": 107, "email": body["email"], "role": "BRANCH", "point": -1000, "creditStatus": "FULL"},
        "profile": {"pharmacyId": 7, "userId": 107, "pharmacyName": "Central", "bizRegNo": "123-45-67890",
                    "representativeName": "Kim", "postcode": "04524", "address": "Seoul", "contact": "02-1234-5678", "status": "ACTIVE"}
    }})))
}

async fn refresh(State(backend): State<Arc<Backend>>, headers: HeaderMap) -> Reply {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    assert!(bearer(&headers).is_none(), "refresh must not carry the access token");
    if backend.allow_refresh.load(Ordering::SeqCst) {
        (StatusCode::OK, Json(json!({"accessToken": "fresh"})))
    } else {
        unauthorized()
    }
}

async fn create_order(State(backend): State<Arc<Backend>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    if bearer(&headers) != Some("fresh") {
        return unauthorized();
    }
    let total = body["items"].as_array().map_or(0, |items| items.iter().filter_map(|i| i["subtotalPrice"].as_i64()).sum::<i64>());
    backend.orders.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({"success": true, "data": {"orderId": 42, "totalPrice": total}})))
}

async fn list_orders(State(backend): State<Arc<Backend>>, Query(query): Query<HashMap<String, String>>) -> Reply {
    *backend.list_query.lock().unwrap() = Some(query);
    (StatusCode::OK, Json(json!({
        "success": true,
        "data": [{"orderId": 42, "pharmacyId": 7, "pharmacyName": "Central", "createdAt": "2025-09-01T10:00:00",
                  "totalPrice": 500, "status": "REQUESTED"}],
        "totalElements": 11, "totalPages": 2, "currentPage": 0
    })))
}

async fn create_return(Json(body): Json<Value>) -> Reply {
    if body["orderId"] == 99 {
        return (StatusCode::BAD_REQUEST, Json(json!({"success": false, "message": "존재하지 않는 주문입니다."})));
    }
    (StatusCode::OK, Json(json!({"success": false, "data": null, "error": "반품 기간이 지났습니다."})))
}

async fn spawn_backend(backend: Arc<Backend>) -> SocketAddr {
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/orders", post(create_order))
        .route("/orders/branch/orders", get(list_orders))
        .route("/returns", post(create_return))
        .with_state(backend);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend failed");
    });
    addr
}

async fn client_for(backend: &Arc<Backend>) -> HttpPortalClient {
    let addr = spawn_backend(Arc::clone(backend)).await;
    HttpPortalClient::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

fn order_request() -> OrderCreateRequest {
    let lines = [CartLineItem::new(ProductId(1), "Tylenol", "Janssen", Won(100), 5)];
    OrderCreateRequest::from_lines(PharmacyId(7), &lines)
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_replayed() {
    let backend = Arc::new(Backend::default());
    backend.allow_refresh.store(true, Ordering::SeqCst);
    let client = client_for(&backend).await;
    client.set_access_token(Some("stale".into())).await;

    let created = client.create_order(&order_request()).await.unwrap();
    assert_eq!(created.order_id, OrderId(42));
    assert_eq!(created.total_price, Some(Won(500)));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(client.access_token().await.as_deref(), Some("fresh"));

    let sent = backend.orders.lock().unwrap();
    assert_eq!(sent[0]["pharmacyId"], 7);
    assert_eq!(sent[0]["items"][0]["subtotalPrice"], 500);
}

#[tokio::test]
async fn test_failed_refresh_drops_token() {
    let backend = Arc::new(Backend::default());
    let client = client_for(&backend).await;
    client.set_access_token(Some("stale".into())).await;

    let err = client.create_order(&order_request()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(backend.orders.lock().unwrap().is_empty());
    assert_eq!(client.access_token().await, None);
}

#[tokio::test]
async fn test_login_stores_token_and_bad_credentials_skip_refresh() {
    let backend = Arc::new(Backend::default());
    let client = client_for(&backend).await;

    let bad = LoginRequest { email: "branch@example.com".into(), password: "wrong-pass".into() };
    let err = client.branch_login(&bad).await.unwrap_err();
    assert_eq!(err.server_message(), Some("아이디 또는 비밀번호가 일치하지 않습니다."));
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);

    let good = LoginRequest { email: "branch@example.com".into(), password: "Pharm123!".into() };
    let login = client.branch_login(&good).await.unwrap();
    assert_eq!(login.user.point, -1000);
    assert_eq!(client.access_token().await.as_deref(), Some("stale"));

    let invalid = LoginRequest { email: "not-an-email".into(), password: "x".into() };
    assert!(matches!(client.branch_login(&invalid).await, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn test_paginated_list_decodes_flat_counters() {
    let backend = Arc::new(Backend::default());
    let client = client_for(&backend).await;

    let params = OrderListParams { pharmacy_id: Some(PharmacyId(7)), status: Some(OrderStatus::Requested), page: Some(0), size: Some(10) };
    let page = client.list_branch_orders(&params).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].status, OrderStatus::Requested);
    assert_eq!(page.info.total_elements, 11);
    assert_eq!(page.info.total_pages, 2);

    let query = backend.list_query.lock().unwrap().clone().unwrap();
    assert_eq!(query["status"], "REQUESTED");
    assert_eq!(query["pharmacyId"], "7");
    assert_eq!(query["size"], "10");
}

#[tokio::test]
async fn test_rejections_carry_server_message() {
    let backend = Arc::new(Backend::default());
    let client = client_for(&backend).await;
    let lines = [ReturnLineItem::new(ProductId(1), "Tylenol", "Janssen", Won(100), 1)];

    let rejected = client.create_return(&ReturnCreateRequest::from_lines(PharmacyId(7), OrderId(5), "오배송", &lines)).await.unwrap_err();
    assert!(matches!(rejected, ApiError::Rejected { .. }));
    assert_eq!(rejected.server_message(), Some("반품 기간이 지났습니다."));

    let status = client.create_return(&ReturnCreateRequest::from_lines(PharmacyId(7), OrderId(99), "오배송", &lines)).await.unwrap_err();
    assert!(matches!(status, ApiError::Status { status: 400, .. }));
    assert_eq!(status.server_message(), Some("존재하지 않는 주문입니다."));
}

#[tokio::test]
async fn test_order_flow_end_to_end() {
    let backend = Arc::new(Backend::default());
    backend.allow_refresh.store(true, Ordering::SeqCst);
    let client = client_for(&backend).await;

    let mut session = Session::new();
    let login = client
        .branch_login(&LoginRequest { email: "branch@example.com".into(), password: "Pharm123!".into() })
        .await
        .unwrap();
    session.login(login);
    session.order_cart.add_item(CartLineItem::new(ProductId(1), "Tylenol", "Janssen", Won(100), 2));
    session.order_cart.add_item(CartLineItem::new(ProductId(1), "Tylenol", "Janssen", Won(100), 3));

    let flow = SubmissionFlow::new(client);
    let receipt = flow.submit_order(&mut session).await.unwrap();
    assert_eq!(receipt.total_price, Won(500));
    assert_eq!(receipt.outstanding_balance, Won(1_500));
    assert!(session.order_cart.is_empty());
}
