use crate::app::response;
use crate::gateway::GatewayError;
use crate::http::Resp;
use hyper::StatusCode;

/// Status code of a gateway outcome
pub fn status_for(error: &GatewayError) -> StatusCode {
    match error {
        GatewayError::BadRequest(_) | GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
        GatewayError::NotFound { .. } => StatusCode::NOT_FOUND,
        GatewayError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error response for a gateway failure
///
/// `{"error": "..."}`, or for validation
/// `{"error": "validation failed", "fieldErrors": {...}}`.
/// Store details stay in the server log.
pub fn gateway_error_response(error: &GatewayError) -> Resp {
    let status = status_for(error);
    match error {
        GatewayError::Validation(errors) => response::field_errors(errors),
        GatewayError::Store(_) => response::error(status, "internal server error"),
        other => response::error(status, &other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldErrors;
    use crate::store::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&GatewayError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&GatewayError::Validation(FieldErrors::new())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&GatewayError::NotFound { variant: "todo8".into(), id: "1".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&GatewayError::Store(StoreError::Poisoned)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
