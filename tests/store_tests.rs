// Tests for the store wire types and the device identifier
//
// The insert contract's field names are external; these tests pin them.

use chrono::{TimeZone, Utc};
use su_recorder::device::DeviceId;
use su_recorder::store::{NewRecording, Prompt, StoreSettings};
use tempfile::TempDir;

#[test]
fn test_new_recording_serializes_contract_fields() {
    let record = NewRecording {
        user_id: "user-1".to_string(),
        question_id: 7,
        province_id: 42,
        audio_url: "https://speech.example/confirm/clip.wav?cb=123-1".to_string(),
        audio_duration: 2,
        audio_script: "hello".to_string(),
        age: 29,
        recorded_at: Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap(),
    };

    let value = serde_json::to_value(&record).unwrap();
    let object = value.as_object().unwrap();

    for field in [
        "user_id",
        "question_id",
        "province_id",
        "audio_url",
        "audio_duration",
        "audio_script",
        "age",
        "recorded_at",
    ] {
        assert!(object.contains_key(field), "missing field {}", field);
    }

    assert_eq!(object["audio_duration"], 2);
    // ISO-8601 timestamp
    assert!(object["recorded_at"]
        .as_str()
        .unwrap()
        .starts_with("2025-10-27T14:30:00"));
}

#[test]
fn test_prompt_deserializes_with_type_rename() {
    let json = r#"{
        "id": 11,
        "text": "Say your favorite dish",
        "type": "open",
        "hint": "one sentence is fine",
        "prompt_audio_url": "https://store.example/prompts/11.wav"
    }"#;

    let prompt: Prompt = serde_json::from_str(json).unwrap();
    assert_eq!(prompt.id, 11);
    assert_eq!(prompt.kind, "open");
    assert_eq!(prompt.hint.as_deref(), Some("one sentence is fine"));
    assert!(prompt.prompt_audio_url.is_some());
}

#[test]
fn test_prompt_optional_fields_default() {
    let json = r#"{ "id": 3, "text": "Count to five", "type": "read" }"#;

    let prompt: Prompt = serde_json::from_str(json).unwrap();
    assert_eq!(prompt.hint, None);
    assert_eq!(prompt.prompt_audio_url, None);
}

#[test]
fn test_settings_message_is_optional() {
    let settings: StoreSettings =
        serde_json::from_str(r#"{ "maintenance_mode": false }"#).unwrap();
    assert!(!settings.maintenance_mode);
    assert!(settings.maintenance_message.is_none());

    let settings: StoreSettings = serde_json::from_str(
        r#"{ "maintenance_mode": true, "maintenance_message": "back at noon" }"#,
    )
    .unwrap();
    assert!(settings.maintenance_mode);
    assert_eq!(settings.maintenance_message.as_deref(), Some("back at noon"));
}

#[test]
fn test_device_id_is_stable_across_loads() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("device-id");

    let first = DeviceId::load_or_create(&path).unwrap();
    let second = DeviceId::load_or_create(&path).unwrap();

    assert!(!first.as_str().is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_device_id_differs_per_installation() {
    let temp_dir = TempDir::new().unwrap();

    let a = DeviceId::load_or_create(temp_dir.path().join("a")).unwrap();
    let b = DeviceId::load_or_create(temp_dir.path().join("b")).unwrap();

    assert_ne!(a, b);
}

#[test]
fn test_device_id_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/dir/device-id");

    let id = DeviceId::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert!(!id.as_str().is_empty());
}
