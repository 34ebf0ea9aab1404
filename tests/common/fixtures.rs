//! Simulated upstream catalogue and wiring helpers

use marvel_forwarder::config::{Config, RetryConfig};
use marvel_forwarder::{Database, MarvelClient, SyncService};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::{Request, ResponseTemplate};

pub const ENDPOINT: &str = "/v1/public/characters";
pub const PUBLIC_KEY: &str = "006127f9ec4cdd9da3973a1090fa1a75";
pub const PRIVATE_KEY: &str = "265d12b39c12c21e267f5cc97137d5b0";

/// Upstream id of the character at catalogue position `i`
pub fn character_id(i: i64) -> i64 {
    1_011_000 + i
}

/// One upstream page of a catalogue holding `total` characters
pub fn page_body(offset: i64, limit: i64, total: i64) -> serde_json::Value {
    let count = (total - offset).clamp(0, limit);
    let results: Vec<_> = (offset..offset + count)
        .map(|i| {
            json!({
                "id": character_id(i),
                "name": format!("Character {i}"),
                "description": format!("Description {i}"),
                "modified": "2014-04-29T14:18:17-0400",
                "thumbnail": {"path": "http://i.annihil.us/u/prod/marvel/i/mg/c/e0/535fecbbb9784", "extension": "jpg"},
            })
        })
        .collect();
    json!({
        "code": 200,
        "status": "Ok",
        "copyright": "© 2024 MARVEL",
        "attributionText": "Data provided by Marvel. © 2024 MARVEL",
        "etag": "f0fbae65eb2f8f28bdeea0a29be8749a4e67acb3",
        "data": {
            "offset": offset,
            "limit": limit,
            "total": total,
            "count": count,
            "results": results,
        }
    })
}

fn query_value(req: &Request, key: &str) -> Option<i64> {
    req.url
        .query_pairs()
        .find(|(k, _)| k == key)
        .and_then(|(_, v)| v.parse().ok())
}

/// Responder serving the catalogue, failing every request for `failing_offset`
pub fn catalogue(
    total: i64,
    failing_offset: Option<i64>,
) -> impl Fn(&Request) -> ResponseTemplate + Send + Sync {
    move |req: &Request| match (query_value(req, "offset"), query_value(req, "limit")) {
        (Some(offset), _) if Some(offset) == failing_offset => ResponseTemplate::new(500),
        (Some(offset), Some(limit)) => {
            ResponseTemplate::new(200).set_body_json(page_body(offset, limit, total))
        }
        _ => ResponseTemplate::new(409),
    }
}

/// Configuration pointing at `server_uri`, with a short retry schedule
pub fn test_config(server_uri: &str, database: &NamedTempFile) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("MARVEL_API_URL", format!("{server_uri}{ENDPOINT}")),
        ("PUBLIC_KEY", PUBLIC_KEY.to_string()),
        ("PRIVATE_KEY", PRIVATE_KEY.to_string()),
        ("DATABASE_URL", format!("sqlite://{}", database.path().display())),
        ("PAGE_LIMIT", "100".to_string()),
        ("MAX_RETRIES", "2".to_string()),
    ]);
    let mut config = Config::from_lookup(|key| vars.get(key).cloned()).unwrap();
    config.retry = RetryConfig {
        initial_interval: Duration::from_millis(10),
        max_interval: Duration::from_millis(50),
        ..config.retry
    };
    config
}

/// Build a sync service and keep a handle on its database
pub async fn sync_service(config: Config) -> (SyncService, Database) {
    let db = Database::connect(&config.database_url).await.unwrap();
    let client = MarvelClient::new(config.upstream, config.retry).unwrap();
    (SyncService::new(client, db.clone()), db)
}
