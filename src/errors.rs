use derive_more::{Display, Error};
use log::error;
use ntex::{http, web};

/// Reasons a delivery fails signature verification.
///
/// All variants map to the same 401 response; they only differ in logs.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    #[display("missing_header")]
    MissingHeader,
    #[display("malformed_header")]
    MalformedHeader,
    #[display("malformed_signature")]
    MalformedSignature,
    #[display("signature_mismatch")]
    Mismatch,
}

/// Errors surfaced by the webhook endpoints.
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    /// A required secret is not configured
    #[display("configuration missing: {_0}")]
    ConfigurationMissing(#[error(not(source))] &'static str),
    /// The delivery could not be authenticated
    #[display("signature invalid: {_0}")]
    SignatureInvalid(SignatureError),
    /// The subscription handshake was refused
    #[display("verification failed")]
    VerificationFailed,
}

impl From<SignatureError> for WebhookError {
    fn from(err: SignatureError) -> Self {
        WebhookError::SignatureInvalid(err)
    }
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        // rejections are logged with their reason where they are detected
        if let WebhookError::ConfigurationMissing(_) = self {
            error!("{}", self);
        }

        web::HttpResponse::build(self.status_code()).finish()
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::ConfigurationMissing(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
            WebhookError::SignatureInvalid(_) => http::StatusCode::UNAUTHORIZED,
            WebhookError::VerificationFailed => http::StatusCode::FORBIDDEN,
        }
    }
}

/// Errors from the outbound Graph API sender.
#[derive(Debug, Display, Error)]
pub enum OutboundError {
    #[display("configuration missing: {_0}")]
    ConfigurationMissing(#[error(not(source))] &'static str),
    #[display("delivery failed: {_0}")]
    DeliveryFailed(#[error(not(source))] String),
}

/// Returns a [NotFound](http::StatusCode::NOT_FOUND) with no body for urls not defined
pub async fn serve_not_found() -> web::HttpResponse {
    web::HttpResponse::NotFound().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::web::error::WebResponseError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebhookError::ConfigurationMissing("APP_SECRET").status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebhookError::from(SignatureError::MissingHeader).status_code(),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::VerificationFailed.status_code(),
            http::StatusCode::FORBIDDEN
        );
    }

    #[ntex::test]
    async fn test_error_responses_have_empty_bodies() {
        let req = web::test::TestRequest::default().to_http_request();

        for (err, status) in [
            (
                WebhookError::from(SignatureError::Mismatch),
                http::StatusCode::UNAUTHORIZED,
            ),
            (
                WebhookError::VerificationFailed,
                http::StatusCode::FORBIDDEN,
            ),
            (
                WebhookError::ConfigurationMissing("APP_SECRET"),
                http::StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ] {
            let resp = err.error_response(&req);
            assert_eq!(resp.status(), status);
            assert!(web::test::read_body(web::WebResponse::new(resp, req.clone()))
                .await
                .is_empty());
        }
    }

    #[test]
    fn test_display_keeps_reason() {
        let err = WebhookError::from(SignatureError::MalformedSignature);
        assert_eq!(err.to_string(), "signature invalid: malformed_signature");
        assert_eq!(
            OutboundError::ConfigurationMissing("GRAPH_API_TOKEN").to_string(),
            "configuration missing: GRAPH_API_TOKEN"
        );
    }
}
