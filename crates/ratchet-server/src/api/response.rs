//! Wire envelopes shared by every endpoint.

use serde::Serialize;

use ratchet_core::{PagedData, ReturnCode};

/// Payload carrying a single id (or nothing).
#[derive(Debug, Clone, Serialize)]
pub struct SingleData {
    /// The id the operation resolved to, if any.
    pub id: Option<i64>,
}

/// Standard response envelope: a result code plus an optional id payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    /// Result code of the operation.
    pub state: ReturnCode,
    /// Id payload; null on paths that have no id to report.
    pub data: Option<SingleData>,
}

impl ApiResponse {
    /// Successful response carrying an optional id.
    pub fn success(id: Option<i64>) -> Self {
        Self {
            state: ReturnCode::Success,
            data: Some(SingleData { id }),
        }
    }

    /// Failure response carrying the given code and optional id echo.
    pub fn failure(state: ReturnCode, id: Option<i64>) -> Self {
        Self {
            state,
            data: Some(SingleData { id }),
        }
    }

    /// Failure response with no payload at all.
    pub fn failure_empty(state: ReturnCode) -> Self {
        Self { state, data: None }
    }
}

/// Response envelope for paginated catalog queries.
#[derive(Debug, Serialize)]
pub struct PagedApiResponse {
    /// Result code of the operation.
    pub state: ReturnCode,
    /// The requested page.
    pub data: PagedData,
}

impl PagedApiResponse {
    /// Successful page response.
    pub fn success(data: PagedData) -> Self {
        Self {
            state: ReturnCode::Success,
            data,
        }
    }
}
