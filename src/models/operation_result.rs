use serde::{Deserialize, Serialize};

/// Envelope returned by every backend call, successful or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Enforces the envelope invariants: success carries data and no error,
    /// failure carries an error prefixed with the operation name.
    pub fn normalize(self, operation: &str) -> Self {
        match (self.success, self.data) {
            (true, Some(data)) => Self::ok(data),
            (true, None) => Self::failure(format!("{operation}: response is missing data")),
            (false, _) => {
                let cause = self
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| "backend reported a failure".to_string());
                Self::failure(format!("{operation}: {cause}"))
            }
        }
    }
}
