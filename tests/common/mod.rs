#![allow(dead_code)]

use std::net::TcpListener;
use std::path::PathBuf;

use chirpy::configuration::{
    ApplicationSettings, DatabaseSettings, JwtSettings, PolkaSettings, Settings,
};
use chirpy::startup::run;
use chirpy::store::Database;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const POLKA_API_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub jwt: JwtSettings,
    pub db_path: PathBuf,
    pub client: reqwest::Client,
    // keeps the document and static files alive for the test's duration
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let static_dir = dir.path().join("public");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "Welcome to Chirpy").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let db_path = dir.path().join("database.json");
    let settings = Settings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port,
            static_dir,
        },
        database: DatabaseSettings {
            path: db_path.clone(),
        },
        jwt: JwtSettings {
            secret: "integration-test-secret-key-32-chars!".to_string(),
            access_token_expiry: 3600,
            issuer: "chirpy".to_string(),
        },
        polka: PolkaSettings {
            api_key: POLKA_API_KEY.to_string(),
        },
    };

    let database = Database::new(&db_path).await.expect("Failed to open store");
    let jwt = settings.jwt.clone();
    let server = run(listener, database, settings).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        jwt,
        db_path,
        client: reqwest::Client::new(),
        _dir: dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn create_user(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Create a user, log in, and return the login response body
    pub async fn signed_in_user(&self, email: &str, password: &str) -> Value {
        assert_eq!(201, self.create_user(email, password).await.status().as_u16());
        let response = self.login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/chirps"))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
