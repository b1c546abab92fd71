#![allow(dead_code)]

use std::net::SocketAddr;

use reqwest::Client;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;

use ticketdesk::config::Config;

/// A running test server backed by its own SQLite file.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Call one boundary operation and return the envelope as JSON.
    pub async fn invoke(&self, op: &str, args: Value) -> Value {
        self.client
            .post(self.url("/api/v1/invoke"))
            .json(&json!({ "op": op, "args": args }))
            .send()
            .await
            .expect("invoke request failed")
            .json()
            .await
            .expect("invoke response was not JSON")
    }

    /// Create a user through the boundary and return its id.
    pub async fn create_user(&self, first: &str, email: &str, role_id: i64) -> i64 {
        let body = self
            .invoke(
                "users.create",
                json!({
                    "firstName": first,
                    "lastName": "Tester",
                    "email": email,
                    "password": "secret123",
                    "roleId": role_id,
                }),
            )
            .await;
        assert_eq!(body["success"], true, "create user failed: {body}");
        body["id"].as_i64().unwrap()
    }

    /// Create an `Open` ticket and return its id.
    pub async fn create_ticket(&self, title: &str, created_by: i64, assigned_to: Option<i64>) -> i64 {
        let body = self
            .invoke(
                "tickets.create",
                json!({
                    "title": title,
                    "description": format!("{title} description"),
                    "categoryId": 1,
                    "createdBy": created_by,
                    "status": "Open",
                    "assignedTo": assigned_to,
                }),
            )
            .await;
        assert_eq!(body["success"], true, "create ticket failed: {body}");
        body["id"].as_i64().unwrap()
    }
}

pub fn test_config(database_url: String) -> Config {
    Config {
        database_url,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        pool_size: 5,
        page_size: 5,
        seed_demo: false,
        log_level: "warn".to_string(),
    }
}

/// A fresh, migrated database without demo data.
pub async fn test_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let config = test_config(url);

    let pool = ticketdesk::connect(&config)
        .await
        .expect("Failed to open test database");
    ticketdesk::db::setup::auto_setup(&pool, false)
        .await
        .expect("Failed to set up test database");

    (pool, dir)
}

/// Spawn the app on a random port with a fresh database.
pub async fn spawn_app() -> TestApp {
    let (pool, dir) = test_pool().await;
    let config = test_config(String::new());

    let app = ticketdesk::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        _dir: dir,
    }
}
