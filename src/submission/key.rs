use uuid::Uuid;

/// Every submission is stored under this prefix.
pub const KEY_PREFIX: &str = "form-submissions";

/// `form-submissions/data_<timestamp>_<id>.json`, with `:` and `.` in the
/// timestamp replaced by `-`.
pub fn storage_key(timestamp: &str, submission_id: Uuid) -> String {
    let sanitized = timestamp.replace([':', '.'], "-");
    format!("{KEY_PREFIX}/data_{sanitized}_{submission_id}.json")
}
