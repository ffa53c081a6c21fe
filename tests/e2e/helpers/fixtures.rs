use serde_json::{json, Value};

pub const SOURCE_FIELD: &str = "Swedish Example";
pub const AUDIO_FIELD: &str = "Swedish sentence audio";

/// A notesInfo entry shaped like AnkiConnect's
pub fn note(note_id: u64, source: &str, audio: &str) -> Value {
    json!({
        "noteId": note_id,
        "profile": "User 1",
        "modelName": "Swedish sentences",
        "tags": [],
        "mod": 1718000000u64,
        "cards": [note_id + 1],
        "fields": {
            SOURCE_FIELD: { "value": source, "order": 0 },
            AUDIO_FIELD: { "value": audio, "order": 1 }
        }
    })
}

pub fn mock_mp3_audio() -> Vec<u8> {
    // Minimal MP3 frame header plus padding
    vec![
        0xFF, 0xFB, 0x90, 0x00, // MP3 frame header
        0x00, 0x00, 0x00, 0x00, // Padding
    ]
}
