/*!
 * Tests for error types and conversions
 */

use napiprojekt::errors::{AppError, ConversionError, HashError, ProviderError};

#[test]
fn test_hashError_tooShort_shouldDisplayPositionAndLength() {
    let error = HashError::TooShort { position: 16, length: 16 };
    let display = format!("{}", error);
    assert!(display.contains("too short"));
    assert!(display.contains("16"));
}

#[test]
fn test_hashError_invalidDigit_shouldDisplayCharacter() {
    let error = HashError::InvalidDigit { position: 3, character: 'x' };
    let display = format!("{}", error);
    assert!(display.contains("'x'"));
    assert!(display.contains("position 3"));
}

#[test]
fn test_providerError_fromHashError_shouldWrapAsMalformedHash() {
    let error: ProviderError = HashError::TooShort { position: 14, length: 0 }.into();
    assert!(matches!(error, ProviderError::MalformedHash(_)));
    assert!(format!("{}", error).starts_with("Malformed hash"));
    assert!(!error.is_transport());
}

#[test]
fn test_providerError_fromConversionError_shouldWrapAsConversion() {
    let error: ProviderError = ConversionError::Timeout(60).into();
    assert!(matches!(error, ProviderError::Conversion(ConversionError::Timeout(60))));
    assert!(format!("{}", error).contains("60 seconds"));
    assert!(!error.is_transport());
}

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 503,
        message: "Service Unavailable".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("503"));
    assert!(display.contains("Service Unavailable"));
}

#[test]
fn test_providerError_isTransport_shouldCoverNetworkVariants() {
    assert!(ProviderError::RequestFailed("x".to_string()).is_transport());
    assert!(ProviderError::ConnectionError("x".to_string()).is_transport());
    assert!(ProviderError::Timeout("x".to_string()).is_transport());
    assert!(ProviderError::ApiError { status_code: 500, message: "x".to_string() }.is_transport());

    assert!(!ProviderError::NotInitialized.is_transport());
    assert!(!ProviderError::UnsupportedLanguage("xx".to_string()).is_transport());
    assert!(!ProviderError::MissingHash("movie".to_string()).is_transport());
}

#[test]
fn test_appError_fromProviderError_shouldWrapCorrectly() {
    let app_error: AppError = ProviderError::NotInitialized.into();
    assert!(matches!(app_error, AppError::Provider(ProviderError::NotInitialized)));
    assert!(format!("{}", app_error).contains("not initialized"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.srt");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
    assert!(format!("{}", app_error).contains("missing.srt"));
}

#[test]
fn test_appError_fromJsonError_shouldBecomeConfigError() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let app_error: AppError = json_error.into();
    assert!(matches!(app_error, AppError::Config(_)));
}
