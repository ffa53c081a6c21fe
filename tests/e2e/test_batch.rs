use crate::e2e::helpers;

use anki_tts_backfill::domain::audio::{derive_filename, AudioFormat, NamingConfig};
use anki_tts_backfill::domain::batch::{
    BatchError, BatchOptions, BatchReport, BatchService, BatchServiceApi,
};
use anki_tts_backfill::infrastructure::repositories::FsMediaRepository;
use helpers::assertions::{anki_calls, assert_sound_tag, request_bodies};
use helpers::fixtures::{mock_mp3_audio, note, AUDIO_FIELD};
use helpers::mocks::{anki_action, anki_error, mount_anki, mount_openai, mount_openai_failure};
use helpers::{test_options, TestContext};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::ResponseTemplate;

#[tokio::test]
async fn it_should_process_candidates_and_isolate_failures() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(
        &ctx.anki,
        vec![
            note(1, "Jag heter Anna", ""),
            note(2, "Var bor du?", ""),
            note(3, "Jag bor i <b>Malmö</b>", ""),
        ],
    )
    .await;
    mount_openai(&ctx.openai).await;
    mount_openai_failure(&ctx.openai, "Var bor du?").await;

    let report = ctx.service(test_options()).run().await.unwrap();

    assert_eq!(
        report,
        BatchReport {
            processed: 2,
            errored: 1,
            total: 3,
            attempted: 3,
            single_item: false,
        }
    );

    let updates = anki_calls(&ctx.anki, "updateNoteFields").await;
    assert_eq!(updates.len(), 2);
    let first = assert_sound_tag(&updates[0], 1, AUDIO_FIELD);
    assert_sound_tag(&updates[1], 3, AUDIO_FIELD);

    let files = ctx.media_files().unwrap();
    assert_eq!(files.len(), 2);
    assert!(first.contains(&files[0]) || first.contains(&files[1]));

    let written = std::fs::read(ctx.media_dir.path().join(&files[0])).unwrap();
    assert_eq!(written, mock_mp3_audio());
}

#[tokio::test]
async fn it_should_query_the_configured_deck_and_fields() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(&ctx.anki, vec![]).await;

    let report = ctx.service(test_options()).run().await.unwrap();

    assert_eq!(report.total, 0);
    let calls = anki_calls(&ctx.anki, "findNotes").await;
    assert_eq!(
        calls[0]["params"]["query"],
        r#""Swedish sentence audio:" "Swedish Example:_*" "deck:About me""#
    );
    assert!(anki_calls(&ctx.anki, "notesInfo").await.is_empty());
}

#[tokio::test]
async fn it_should_only_process_the_first_card_in_single_item_mode() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(
        &ctx.anki,
        (1..=5).map(|id| note(id, &format!("Mening nummer {}", id), "")).collect(),
    )
    .await;
    mount_openai(&ctx.openai).await;
    let options = BatchOptions {
        single_item: true,
        ..test_options()
    };

    let report = ctx.service(options).run().await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.total, 5);
    let bodies = request_bodies(&ctx.openai).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["input"], "Mening nummer 1");
}

#[tokio::test]
async fn it_should_skip_cards_with_audio_or_missing_fields() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(
        &ctx.anki,
        vec![
            note(1, "Hej", "[sound:swedish_hej_00000000.mp3]"),
            json!({ "noteId": 2, "fields": { "Front": { "value": "Hej", "order": 0 } } }),
            note(3, "", ""),
            note(4, "God natt", ""),
        ],
    )
    .await;
    mount_openai(&ctx.openai).await;

    let report = ctx.service(test_options()).run().await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.processed, 1);
    let updates = anki_calls(&ctx.anki, "updateNoteFields").await;
    assert_eq!(updates.len(), 1);
    assert_sound_tag(&updates[0], 4, AUDIO_FIELD);
}

#[tokio::test]
async fn it_should_name_files_after_the_raw_text() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(&ctx.anki, vec![note(1, "<i>Jag äter äpplen</i> idag", "")]).await;
    mount_openai(&ctx.openai).await;

    ctx.service(test_options()).run().await.unwrap();

    let expected = derive_filename(
        "<i>Jag äter äpplen</i> idag",
        AudioFormat::Mp3,
        &NamingConfig::default(),
    );
    assert_eq!(ctx.media_files().unwrap(), vec![expected.clone()]);
    assert!(expected.starts_with("swedish_jag_äter_äpplen_"));

    let bodies = request_bodies(&ctx.openai).await;
    assert_eq!(bodies[0]["input"], "Jag äter äpplen idag");
}

#[tokio::test]
async fn it_should_count_failed_updates_and_keep_the_file() {
    let ctx = TestContext::new().await.unwrap();
    anki_action("updateNoteFields")
        .respond_with(anki_error("cannot update note while it is open in the browser"))
        .with_priority(1)
        .mount(&ctx.anki)
        .await;
    mount_anki(&ctx.anki, vec![note(1, "Hej", "")]).await;
    mount_openai(&ctx.openai).await;

    let report = ctx.service(test_options()).run().await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.errored, 1);
    assert_eq!(ctx.media_files().unwrap().len(), 1);
}

#[tokio::test]
async fn it_should_count_unwritable_media_dir_as_item_error() {
    let ctx = TestContext::new().await.unwrap();
    mount_anki(&ctx.anki, vec![note(1, "Hej", ""), note(2, "Tack", "")]).await;
    mount_openai(&ctx.openai).await;
    let service = BatchService::new(
        Arc::new(ctx.card_repo()),
        Arc::new(ctx.tts_repo()),
        Arc::new(FsMediaRepository::new(ctx.media_dir.path().join("does-not-exist"))),
        test_options(),
    );

    let report = service.run().await.unwrap();

    assert_eq!(report.errored, 2);
    assert_eq!(report.processed, 0);
    assert!(anki_calls(&ctx.anki, "updateNoteFields").await.is_empty());
}

#[tokio::test]
async fn it_should_abort_when_connectivity_check_fails() {
    let ctx = TestContext::new().await.unwrap();
    anki_action("version")
        .respond_with(anki_error("unsupported action"))
        .mount(&ctx.anki)
        .await;

    let result = ctx.service(test_options()).run().await;

    assert!(matches!(result, Err(BatchError::Connectivity(_))));
    assert!(anki_calls(&ctx.anki, "findNotes").await.is_empty());
}

#[tokio::test]
async fn it_should_abort_when_the_query_fails() {
    let ctx = TestContext::new().await.unwrap();
    anki_action("version")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 6, "error": null })))
        .mount(&ctx.anki)
        .await;
    anki_action("findNotes")
        .respond_with(anki_error("collection is not available"))
        .mount(&ctx.anki)
        .await;

    let result = ctx.service(test_options()).run().await;

    match result {
        Err(BatchError::Query(message)) => assert!(message.contains("collection is not available")),
        other => panic!("unexpected result {:?}", other),
    }
}
