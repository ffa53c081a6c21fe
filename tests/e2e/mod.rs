// End-to-end tests for the Anki TTS backfill
//
// Both external services are replaced by wiremock servers:
// - AnkiConnect: one mock per action, matched on the `action` field
// - OpenAI: POST /audio/speech returning fake audio bytes
//
// Audio is written into a temporary media directory per test, so tests run
// in parallel without sharing state.

mod test_anki_connect;
mod test_batch;
