//! Response types for the Absence Engine API.
//!
//! This module defines the listing DTOs, the error response structures and
//! the mapping of engine errors to HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AbsenceType, DayLength};
use crate::projection::DayAbsence;

/// One entry of the absence listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceDto {
    /// The date of the entry.
    pub date: NaiveDate,
    /// Covered fraction of the day, `0.5` or `1`.
    #[serde(with = "rust_decimal::serde::float")]
    pub day_length: Decimal,
    /// `MORNING`, `NOON` or `FULL`.
    pub absence_period_name: DayLength,
    /// `VACATION`, `SICK` or `NO_WORKDAY`.
    #[serde(rename = "type")]
    pub absence_type: AbsenceType,
    /// Approval state; empty for no-workday entries.
    pub status: String,
    /// Id of the application or sick note; empty for no-workday entries.
    pub href: String,
}

impl From<DayAbsence> for AbsenceDto {
    fn from(entry: DayAbsence) -> Self {
        Self {
            date: entry.date,
            day_length: entry.duration(),
            absence_period_name: entry.day_length,
            absence_type: entry.absence_type,
            status: entry
                .status
                .map(|status| status.as_str().to_string())
                .unwrap_or_default(),
            href: entry
                .source_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }
}

/// Body of the absence listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsencesResponse {
    /// Entries ascending by date.
    pub absences: Vec<AbsenceDto>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates an error for an unparseable query string.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::new("INVALID_QUERY", message)
    }

    /// Creates an error for an unparseable path parameter.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::new("INVALID_PATH", message)
    }

    /// Creates a person not found error response.
    pub fn person_not_found(person_id: u64) -> Self {
        Self::with_details(
            "PERSON_NOT_FOUND",
            format!("No person found for ID={}", person_id),
            "The requested person does not exist in the loaded snapshot",
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::InvalidRange { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_RANGE", message))
            }
            EngineError::InvalidTypeFilter { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_TYPE", message))
            }
            EngineError::InvalidMonth { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_MONTH", message))
            }
            EngineError::PersonNotFound { person_id } => {
                ApiErrorResponse::bad_request(ApiError::person_not_found(person_id))
            }
            EngineError::InvalidAbsenceType { .. }
            | EngineError::InvalidAbsenceStatus { .. }
            | EngineError::InvalidDayLength { .. }
            | EngineError::InvalidRecord { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "DATA_ERROR",
                    "Absence data is inconsistent",
                    message,
                ),
            },
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message: reason } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, reason),
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AbsenceStatus, SourceId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_absence_dto_serialization() {
        let dto = AbsenceDto::from(DayAbsence {
            date: date("2016-01-04"),
            absence_type: AbsenceType::Vacation,
            day_length: DayLength::Morning,
            status: Some(AbsenceStatus::Allowed),
            source_id: Some(SourceId(1337)),
        });
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["date"], "2016-01-04");
        assert_eq!(json["dayLength"], 0.5);
        assert_eq!(json["absencePeriodName"], "MORNING");
        assert_eq!(json["type"], "VACATION");
        assert_eq!(json["status"], "ALLOWED");
        assert_eq!(json["href"], "1337");
    }

    #[test]
    fn test_no_workday_dto_has_empty_href() {
        let dto = AbsenceDto::from(DayAbsence {
            date: date("2016-01-06"),
            absence_type: AbsenceType::NoWorkday,
            day_length: DayLength::Full,
            status: None,
            source_id: None,
        });
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["dayLength"], 1.0);
        assert_eq!(json["type"], "NO_WORKDAY");
        assert_eq!(json["status"], "");
        assert_eq!(json["href"], "");
    }

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let api_error: ApiErrorResponse = EngineError::InvalidTypeFilter {
            value: "FOO".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_TYPE");

        let api_error: ApiErrorResponse = EngineError::PersonNotFound { person_id: 7 }.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert!(api_error.error.message.contains("ID=7"));
    }

    #[test]
    fn test_config_errors_map_to_internal_error() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "absences.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
