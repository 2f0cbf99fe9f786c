mod common;

use axum::http::{Method, StatusCode};
use common::{admin_token, member_token, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

async fn register(app: &TestApp, email: &str) -> Value {
    let (status, json) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({
                "name": "Mai",
                "email": email,
                "password": "hunter22",
                "image_url": "https://cdn.example.com/u/mai.png"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["user"].clone()
}

async fn product(app: &TestApp) -> Value {
    let (status, json) = app
        .send(
            Method::POST,
            "/products",
            Some(&admin_token()),
            Some(json!({
                "name": "Linen shirt",
                "price": 45.0,
                "colorSizes": [{ "color": "white", "sizes": [{ "size": "S", "quantity": 4 }] }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["product"].clone()
}

fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, json) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_category_crud() {
    let app = TestApp::new();
    let admin = admin_token();

    let (status, json) = app
        .send(Method::POST, "/categories", Some(&admin), Some(json!({ "name": "Shoes" })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/categories/{}", json["category"]["id"].as_str().unwrap());

    let (status, json) = app
        .send(
            Method::PUT,
            &uri,
            Some(&admin),
            Some(json!({ "name": "Footwear", "description": "All shoes" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"]["name"], "Footwear");

    let (_, json) = app.get("/categories").await;
    assert_eq!(json["categories"].as_array().unwrap().len(), 1);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_requires_name_and_admin() {
    let app = TestApp::new();

    let (status, _) = app
        .send(Method::POST, "/categories", Some(&admin_token()), Some(json!({ "name": "" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::POST, "/categories", None, Some(json!({ "name": "Bags" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_user() {
    let app = TestApp::new();
    let user = register(&app, "Mai@Example.com").await;

    assert_eq!(user["email"], "mai@example.com");
    assert_eq!(user["role"], "member");
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password").is_none());

    let (status, _) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({
                "name": "Other",
                "email": "mai@example.com",
                "password": "secret99",
                "image_url": "https://cdn.example.com/u/o.png"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();
    let (status, json) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({ "name": "Mai", "email": "nope", "password": "1", "image_url": "x" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_user_lookup_is_admin_only() {
    let app = TestApp::new();
    let user = register(&app, "mai@example.com").await;
    let uri = format!("/users/{}", user["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::GET, &uri, Some(&member_token(id_of(&user))), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app.send(Method::GET, &uri, Some(&admin_token()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["id"], user["id"]);

    let (_, json) = app.send(Method::GET, "/users", Some(&admin_token()), None).await;
    assert_eq!(json["users"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_comments_flow() {
    let app = TestApp::new();
    let user = register(&app, "mai@example.com").await;
    let product = product(&app).await;
    let token = member_token(id_of(&user));

    let mut ids = Vec::new();
    for content in ["First", "Second"] {
        let (status, json) = app
            .send(
                Method::POST,
                "/comments",
                Some(&token),
                Some(json!({
                    "content": content,
                    "rating": 4,
                    "userId": user["id"],
                    "productId": product["id"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", json);
        ids.push(json["comment"]["id"].as_str().unwrap().to_string());
    }

    let (_, json) = app.get("/comments").await;
    let comments = json["comments"].as_array().unwrap();
    assert_eq!(comments[0]["content"], "Second");
    assert_eq!(comments[1]["content"], "First");

    let owned = format!(
        "/products/{}/users/{}/comments/{}",
        product["id"].as_str().unwrap(),
        user["id"].as_str().unwrap(),
        ids[0]
    );
    let (status, json) = app
        .send(Method::PUT, &owned, Some(&token), Some(json!({ "rating": 2 })))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", json);
    assert_eq!(json["comment"]["rating"], 2.0);
    assert_eq!(json["comment"]["content"], "First");

    // Someone else cannot touch it
    let stranger = member_token(Uuid::new_v4());
    let (status, _) = app.send(Method::DELETE, &owned, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Wrong product in the path does not match
    let mismatched = format!(
        "/products/{}/users/{}/comments/{}",
        Uuid::new_v4(),
        user["id"].as_str().unwrap(),
        ids[0]
    );
    let (status, _) = app.send(Method::DELETE, &mismatched, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::DELETE, &owned, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/comments/{}", ids[0])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_as_someone_else_rejected() {
    let app = TestApp::new();
    let user = register(&app, "mai@example.com").await;
    let product = product(&app).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/comments",
            Some(&member_token(Uuid::new_v4())),
            Some(json!({
                "content": "Nice",
                "rating": 5,
                "userId": user["id"],
                "productId": product["id"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            "/comments",
            None,
            Some(json!({ "content": "Nice", "rating": 5, "userId": user["id"], "productId": product["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_favorites_flow() {
    let app = TestApp::new();
    let user = register(&app, "mai@example.com").await;
    let product = product(&app).await;
    let token = member_token(id_of(&user));
    let uri = format!("/users/{}/favorites", user["id"].as_str().unwrap());

    let body = json!({ "productId": product["id"] });
    let (status, json) = app
        .send(Method::POST, &uri, Some(&token), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    assert_eq!(json["favorite"]["customerId"], user["id"]);

    let (status, _) = app.send(Method::POST, &uri, Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let favorites = json["favorites"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["product"]["name"], "Linen shirt");

    let (status, _) = app
        .send(Method::GET, &uri, Some(&member_token(Uuid::new_v4())), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let single = format!("{}/{}", uri, product["id"].as_str().unwrap());
    let (status, _) = app.send(Method::DELETE, &single, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.send(Method::DELETE, &single, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favorite_unknown_product() {
    let app = TestApp::new();
    let user = register(&app, "mai@example.com").await;
    let uri = format!("/users/{}/favorites", user["id"].as_str().unwrap());

    let (status, json) = app
        .send(
            Method::POST,
            &uri,
            Some(&admin_token()),
            Some(json!({ "productId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Product not found");
}
