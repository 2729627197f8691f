//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, PlaceOrderError, PricingError};
use order_store::StoreError;

/// API-level error type that maps to HTTP responses.
///
/// Every variant renders as `{"error": <summary>, "details": <detail>}`.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Order placement failed.
    PlaceOrder(PlaceOrderError),
    /// Ledger or query failure.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Invalid input", msg),
            ApiError::PlaceOrder(err) => place_order_error_to_response(err),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(%status, error, details = %details, "request failed");
        }

        let body = serde_json::json!({ "error": error, "details": details });
        (status, axum::Json(body)).into_response()
    }
}

fn place_order_error_to_response(err: PlaceOrderError) -> (StatusCode, &'static str, String) {
    let status = match &err {
        PlaceOrderError::Validation(_) => StatusCode::BAD_REQUEST,
        PlaceOrderError::Pricing(PricingError::NoInventoryData | PricingError::Overflow { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PlaceOrderError::Pricing(PricingError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        PlaceOrderError::InsufficientStock { .. } => StatusCode::CONFLICT,
        PlaceOrderError::Persistence {
            source: StoreError::CustomerNotFound(_),
            ..
        } => StatusCode::NOT_FOUND,
        PlaceOrderError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.summary(), err.to_string())
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, &'static str, String) {
    match &err {
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid input", err.to_string()),
        DomainError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Store error",
            err.to_string(),
        ),
    }
}

impl From<PlaceOrderError> for ApiError {
    fn from(err: PlaceOrderError) -> Self {
        ApiError::PlaceOrder(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use domain::ValidationError;

    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn validation_is_bad_request() {
        let err = ApiError::from(PlaceOrderError::from(ValidationError::CustomerIdRequired));
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_inventory_is_unprocessable() {
        let err = ApiError::from(PlaceOrderError::from(PricingError::NoInventoryData));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn unpriceable_total_is_unprocessable() {
        let err = ApiError::from(PlaceOrderError::from(PricingError::Overflow {
            unit_price: rust_decimal::Decimal::MAX,
            gallons: domain::Gallons::new(2).unwrap(),
        }));
        assert_eq!(status_of(err), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn shortage_is_conflict() {
        let err = ApiError::from(PlaceOrderError::InsufficientStock {
            requested: 10,
            available: 1,
        });
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn store_failure_is_internal() {
        let err = ApiError::from(DomainError::Store(StoreError::Unavailable(
            "down".to_string(),
        )));
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
