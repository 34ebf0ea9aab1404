use super::*;
use crate::characters::Character;
use crate::error::{DatabaseError, Error};
use crate::store::CharacterStore;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // for oneshot()

mod characters;

/// In-memory store with an optional forced failure
#[derive(Default)]
struct MockStore {
    characters: BTreeMap<i64, Character>,
    broken: bool,
}

impl MockStore {
    fn with(characters: Vec<Character>) -> Self {
        Self {
            characters: characters.into_iter().map(|c| (c.id, c)).collect(),
            broken: false,
        }
    }

    fn broken() -> Self {
        Self {
            characters: BTreeMap::new(),
            broken: true,
        }
    }

    fn check(&self) -> crate::Result<()> {
        if self.broken {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "database is locked".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CharacterStore for MockStore {
    async fn list_character_ids(&self) -> crate::Result<Vec<i64>> {
        self.check()?;
        Ok(self.characters.keys().copied().collect())
    }

    async fn get_character(&self, id: i64) -> crate::Result<Character> {
        self.check()?;
        self.characters
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound { id })
    }
}

fn router_with(store: MockStore) -> axum::Router {
    create_router(AppState::new(Arc::new(store)))
}

fn daredevil_and_kingpin() -> MockStore {
    MockStore::with(vec![
        Character::new(832654, "Daredevil", "some broke lawyer"),
        Character::new(831256, "Kingpin", "crime boss"),
        Character::new(391264, "Stick", ""),
    ])
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_api_server_serves_and_shuts_down() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();

    let server = tokio::spawn({
        let state = AppState::new(Arc::new(daredevil_and_kingpin()));
        let shutdown = shutdown.clone();
        async move { serve(listener, state, shutdown).await }
    });

    let body = reqwest::get(format!("http://{address}/characters"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "[391264,831256,832654]");

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop after shutdown is cancelled")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_start_api_server_reports_bind_failure() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = taken.local_addr().unwrap();

    let state = AppState::new(Arc::new(MockStore::default()));
    let result = start_api_server(state, address, CancellationToken::new()).await;

    assert!(matches!(result, Err(Error::Io(_))));
}
