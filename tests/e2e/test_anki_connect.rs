use crate::e2e::helpers;

use anki_tts_backfill::infrastructure::repositories::{
    AnkiConnectRepository, CardRepository, CardStoreError,
};
use helpers::assertions::anki_calls;
use helpers::fixtures::{note, AUDIO_FIELD, SOURCE_FIELD};
use helpers::mocks::{anki_action, anki_error, mount_anki};
use helpers::TestContext;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn it_should_report_the_api_version() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(&ctx.anki, vec![]).await;

    let version = ctx.card_repo().version().await.unwrap();

    assert_eq!(version, 6);
}

#[tokio::test]
async fn it_should_send_the_query_to_find_notes() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(&ctx.anki, vec![note(11, "Hej", ""), note(12, "Tack", "")]).await;

    let ids = ctx.card_repo().find_notes("deck:*").await.unwrap();

    assert_eq!(ids, vec![11, 12]);
    let calls = anki_calls(&ctx.anki, "findNotes").await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["params"], json!({ "query": "deck:*" }));
}

#[tokio::test]
async fn it_should_convert_notes_info_into_cards() {
    let ctx = TestContext::new().await.unwrap();
    anki_action("notesInfo")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [note(11, "<b>Hej</b>", ""), {}],
            "error": null
        })))
        .mount(&ctx.anki)
        .await;

    let cards = ctx.card_repo().notes_info(&[11, 99]).await.unwrap();

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].note_id, 11);
    assert_eq!(cards[0].field(SOURCE_FIELD), Some("<b>Hej</b>"));
    assert_eq!(cards[0].field(AUDIO_FIELD), Some(""));
}

#[tokio::test]
async fn it_should_not_call_notes_info_without_ids() {
    let ctx = TestContext::new().await.unwrap();

    let cards = ctx.card_repo().notes_info(&[]).await.unwrap();

    assert!(cards.is_empty());
    assert!(ctx.anki.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn it_should_update_a_single_field() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(&ctx.anki, vec![]).await;

    ctx.card_repo()
        .update_note_field(11, AUDIO_FIELD, "[sound:a.mp3]")
        .await
        .unwrap();

    let calls = anki_calls(&ctx.anki, "updateNoteFields").await;
    assert_eq!(
        calls[0]["params"],
        json!({
            "note": {
                "id": 11,
                "fields": { AUDIO_FIELD: "[sound:a.mp3]" }
            }
        })
    );
}

#[tokio::test]
async fn it_should_surface_service_errors() {
    let ctx = TestContext::new().await.unwrap();
    anki_action("findNotes")
        .respond_with(anki_error("invalid search"))
        .mount(&ctx.anki)
        .await;

    let err = ctx.card_repo().find_notes("deck:(").await.unwrap_err();

    match err {
        CardStoreError::Service(message) => assert_eq!(message, "invalid search"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn it_should_require_a_result_for_queries() {
    let ctx = TestContext::new().await.unwrap();
    anki_action("version")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null, "error": null })))
        .mount(&ctx.anki)
        .await;

    let err = ctx.card_repo().version().await.unwrap_err();

    assert!(matches!(err, CardStoreError::MissingResult("version")));
}

#[tokio::test]
async fn it_should_fail_when_anki_is_not_running() {
    // Reserve a free port, then release it so nothing is listening there
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let repo = AnkiConnectRepository::new(reqwest::Client::new(), format!("http://127.0.0.1:{}", port));

    let err = repo.version().await.unwrap_err();

    assert!(matches!(err, CardStoreError::Transport(_)));
}
