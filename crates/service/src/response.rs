//! Structured result envelope and the domain → wire error mapping.

use serde::Serialize;

use stockpile_core::{DomainError, EntityKind};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Wire-level error: HTTP-ish status, stable machine code, human message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceError {
    pub status: u16,
    #[serde(rename = "errorCode")]
    pub error_code: &'static str,
    pub error: String,
}

/// Serialized error body inside the envelope.
pub type ErrorBody = ServiceError;

impl ServiceError {
    fn new(status: u16, error_code: &'static str, error: impl Into<String>) -> Self {
        Self {
            status,
            error_code,
            error: error.into(),
        }
    }
}

fn not_found_code(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Team => "team_not_found",
        EntityKind::User => "user_not_found",
        EntityKind::Membership => "membership_not_found",
        EntityKind::Item => "item_not_found",
        EntityKind::Location => "location_not_found",
        EntityKind::Transaction => "transaction_not_found",
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Unauthenticated => {
                Self::new(401, "unauthenticated", "authentication required")
            }
            DomainError::Forbidden => Self::new(403, "forbidden", "forbidden"),
            DomainError::InsufficientPermissions => Self::new(
                403,
                "insufficient_permissions",
                "your role does not allow this action",
            ),
            DomainError::SubscriptionInactive => Self::new(
                403,
                "subscription_inactive",
                "the team's subscription does not cover this feature",
            ),
            DomainError::Validation(msg) => Self::new(400, "validation_error", msg),
            DomainError::InvalidId(msg) => Self::new(400, "validation_error", msg),
            DomainError::NotFound(kind) => {
                Self::new(404, not_found_code(kind), format!("{kind} not found"))
            }
            DomainError::Conflict(msg) => Self::new(409, "conflict", msg),
            DomainError::InsufficientStock(msg) => Self::new(409, "insufficient_stock", msg),
            DomainError::LastAdmin => Self::new(
                409,
                "last_admin",
                "a team must keep at least one active admin",
            ),
            // The original message is for logs only; callers get a generic one.
            DomainError::Internal(_) => Self::new(500, "internal_error", "internal error"),
        }
    }
}

/// Discriminated result envelope: `{ok:true, data}` or `{ok:false, error}`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Ok { ok: bool, data: T },
    Err { ok: bool, error: ErrorBody },
}

impl<T> ApiResponse<T> {
    pub fn from_result(result: ServiceResult<T>) -> Self {
        match result {
            Ok(data) => ApiResponse::Ok { ok: true, data },
            Err(error) => ApiResponse::Err { ok: false, error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_are_masked() {
        let err: ServiceError =
            DomainError::internal("pg: connection refused on 10.0.0.3").into();
        assert_eq!(err.status, 500);
        assert_eq!(err.error_code, "internal_error");
        assert!(!err.error.contains("pg"), "storage text must not leak");
    }

    #[test]
    fn envelope_shape() {
        let ok = ApiResponse::from_result(Ok(serde_json::json!({"id": 1})));
        let value = serde_json::to_value(&ok).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["data"]["id"], 1);

        let err: ApiResponse<serde_json::Value> =
            ApiResponse::from_result(Err(DomainError::Unauthenticated.into()));
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["status"], 401);
        assert_eq!(value["error"]["errorCode"], "unauthenticated");
    }

    #[test]
    fn status_split_matches_taxonomy() {
        let cases: Vec<(DomainError, u16, &str)> = vec![
            (DomainError::Unauthenticated, 401, "unauthenticated"),
            (DomainError::Forbidden, 403, "forbidden"),
            (
                DomainError::InsufficientPermissions,
                403,
                "insufficient_permissions",
            ),
            (DomainError::validation("bad"), 400, "validation_error"),
            (
                DomainError::NotFound(EntityKind::Item),
                404,
                "item_not_found",
            ),
            (DomainError::conflict("dup"), 409, "conflict"),
            (
                DomainError::insufficient_stock("short"),
                409,
                "insufficient_stock",
            ),
            (DomainError::LastAdmin, 409, "last_admin"),
            (DomainError::SubscriptionInactive, 403, "subscription_inactive"),
            (DomainError::internal("x"), 500, "internal_error"),
        ];
        for (domain, status, code) in cases {
            let err: ServiceError = domain.into();
            assert_eq!(err.status, status, "{code}");
            assert_eq!(err.error_code, code);
        }
    }
}
