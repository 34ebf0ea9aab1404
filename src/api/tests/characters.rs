use super::*;

#[tokio::test]
async fn test_list_characters_ascending() {
    let (status, body) = get(router_with(daredevil_and_kingpin()), "/characters").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[391264,831256,832654]");
}

#[tokio::test]
async fn test_list_characters_empty() {
    let (status, body) = get(router_with(MockStore::default()), "/characters").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_list_characters_store_failure() {
    let (status, body) = get(router_with(MockStore::broken()), "/characters").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        r#"{"error":"internal_error","error_description":"Sorry, there was a problem. Please try again later."}"#
    );
}

#[tokio::test]
async fn test_get_character_found() {
    let (status, body) = get(router_with(daredevil_and_kingpin()), "/characters/832654").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"ID":832654,"Name":"Daredevil","Description":"some broke lawyer"}"#
    );
}

#[tokio::test]
async fn test_get_character_empty_description() {
    let (status, body) = get(router_with(daredevil_and_kingpin()), "/characters/391264").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"ID":391264,"Name":"Stick","Description":""}"#);
}

#[tokio::test]
async fn test_get_character_not_found() {
    let (status, body) = get(router_with(daredevil_and_kingpin()), "/characters/83253").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        r#"{"error":"no_such_character","error_description":"no such character"}"#
    );
}

#[tokio::test]
async fn test_get_character_malformed_id() {
    for uri in ["/characters/not-a-number", "/characters/12a", "/characters/1.5"] {
        let (status, body) = get(router_with(daredevil_and_kingpin()), uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(
            body,
            r#"{"error":"malformed_id","error_description":"malformed ID"}"#,
            "{uri}"
        );
    }
}

#[tokio::test]
async fn test_get_character_store_failure() {
    let (status, body) = get(router_with(MockStore::broken()), "/characters/832654").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(r#""error":"internal_error""#));
    assert!(!body.contains("locked"));
}
