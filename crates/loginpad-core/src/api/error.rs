use thiserror::Error;

/// Why a login request did not produce a session.
///
/// The display strings are shown to the user verbatim under the form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("No Server Response")]
    NoServerResponse,

    #[error("Missing Username or Password")]
    BadRequest,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Login Failed")]
    Unknown,
}

impl LoginError {
    /// Map a non-success HTTP status to the error shown for it
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            400 => LoginError::BadRequest,
            401 => LoginError::Unauthorized,
            _ => LoginError::Unknown,
        }
    }

    /// Classify a transport error. Anything that failed before a status
    /// line arrived counts as no response.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::from_status(status),
            None if err.is_decode() => LoginError::Unknown,
            None => LoginError::NoServerResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_status_classification() {
        assert_eq!(LoginError::from_status(StatusCode::BAD_REQUEST), LoginError::BadRequest);
        assert_eq!(LoginError::from_status(StatusCode::UNAUTHORIZED), LoginError::Unauthorized);
        assert_eq!(LoginError::from_status(StatusCode::FORBIDDEN), LoginError::Unknown);
        assert_eq!(LoginError::from_status(StatusCode::INTERNAL_SERVER_ERROR), LoginError::Unknown);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(LoginError::NoServerResponse.to_string(), "No Server Response");
        assert_eq!(LoginError::BadRequest.to_string(), "Missing Username or Password");
        assert_eq!(LoginError::Unauthorized.to_string(), "Unauthorized");
        assert_eq!(LoginError::Unknown.to_string(), "Login Failed");
    }
}
