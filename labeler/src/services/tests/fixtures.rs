//! Shared fixtures for store tests

pub const STATE_JSON: &str = r#"{"row_index":1,"responses":[["7","Keep","Alberto"]]}"#;
pub const DATASET_CSV: &str = "Id., Name ,Score\n1,alpha,0.5\n2,beta,0.7\n";

/// Dropbox-style error body
pub fn dropbox_error(summary: &str) -> serde_json::Value {
    serde_json::json!({
        "error_summary": summary,
        "error": { ".tag": "path" }
    })
}

/// Drive-style error body
pub fn drive_error(code: u16, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": { "code": code, "message": message }
    })
}
