use serde_json::Value;
use wiremock::MockServer;

/// JSON bodies of every request the server received, in arrival order
pub async fn request_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|request| request.body_json::<Value>().ok())
        .collect()
}

/// AnkiConnect requests for one action
pub async fn anki_calls(server: &MockServer, action: &str) -> Vec<Value> {
    request_bodies(server)
        .await
        .into_iter()
        .filter(|body| body.get("action").and_then(Value::as_str) == Some(action))
        .collect()
}

pub fn assert_sound_tag(update: &Value, note_id: u64, field: &str) -> String {
    let note = &update["params"]["note"];
    assert_eq!(note["id"].as_u64(), Some(note_id));

    let tag = note["fields"][field]
        .as_str()
        .expect("update carries the audio field")
        .to_string();
    assert!(
        tag.starts_with("[sound:swedish_") && tag.ends_with(".mp3]"),
        "unexpected audio tag {}",
        tag
    );
    tag
}
