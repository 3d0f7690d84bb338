use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of submitting one record to the downstream service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Absent when the call never got a response (transport failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl SubmitOutcome {
    pub fn created(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status_code: None,
        }
    }

    pub fn rejected(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status_code: Some(status_code),
        }
    }

    pub fn transport(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            status_code: None,
        }
    }
}

/// Per-record entry of an [`ImportSummary`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub product_name: Option<String>,
    pub sl_no: Option<i64>,
    pub result: SubmitOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub message: String,
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: f64,
    pub total_products: usize,
    pub successful_insertions: usize,
    pub failed_insertions: usize,
    pub details: Vec<ImportResult>,
}

impl ImportSummary {
    pub fn new(batch_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            message: "Bulk insertion completed".to_string(),
            batch_id,
            started_at,
            elapsed_ms: 0.0,
            total_products: 0,
            successful_insertions: 0,
            failed_insertions: 0,
            details: Vec::new(),
        }
    }

    /// Append one result and keep the counters in step with `details`.
    pub fn push(&mut self, result: ImportResult) {
        if result.result.success {
            self.successful_insertions += 1;
        } else {
            self.failed_insertions += 1;
        }
        self.total_products += 1;
        self.details.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str, outcome: SubmitOutcome) -> ImportResult {
        ImportResult {
            product_name: Some(name.to_string()),
            sl_no: Some(1),
            result: outcome,
        }
    }

    #[test]
    fn push_keeps_counts_consistent() {
        let mut summary = ImportSummary::new(Uuid::new_v4(), Utc::now());
        summary.push(entry("a", SubmitOutcome::created(json!({"id": "1"}))));
        summary.push(entry("b", SubmitOutcome::rejected(400, "duplicate")));
        summary.push(entry("c", SubmitOutcome::transport("connection refused")));

        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.successful_insertions, 1);
        assert_eq!(summary.failed_insertions, 2);
        let names: Vec<_> = summary
            .details
            .iter()
            .map(|d| d.product_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn transport_failure_omits_status_code() {
        let value = serde_json::to_value(SubmitOutcome::transport("timed out")).unwrap();
        assert_eq!(value, json!({ "success": false, "error": "timed out" }));
    }

    #[test]
    fn rejection_carries_status_code() {
        let value = serde_json::to_value(SubmitOutcome::rejected(409, "exists")).unwrap();
        assert_eq!(value["status_code"], 409);
        assert!(value.get("data").is_none());
    }
}
