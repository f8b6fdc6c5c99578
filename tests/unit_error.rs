use std::path::PathBuf;

use taskman::error::{exit_codes, Error};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::Validation("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let op = Error::CorruptStore {
        path: PathBuf::from("tasks.json"),
        message: "expected value".to_string(),
    };
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);

    let lock = Error::LockFailed(PathBuf::from("tasks.json.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn details_identify_the_task() {
    let err = Error::NotFound("Pay rent".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    assert_eq!(err.kind(), "not_found");
    assert!(err.to_string().contains("Task not found"));
    assert_eq!(
        err.details(),
        Some(serde_json::json!({ "name": "Pay rent" }))
    );
}
