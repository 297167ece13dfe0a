//! Error message tests.
//!
//! The CLI prints these messages verbatim, so their wording is part of the interface.

use memtest_core::common::{BackendError, HarnessError, ValidationError};

#[test]
fn read_percentage_names_rejected_value() {
    let err = ValidationError::ReadPercentage(150);
    assert_eq!(
        err.to_string(),
        "read percentage has to be an integer number between 0 and 100, got 150"
    );
}

#[test]
fn unknown_kind_names_rejected_class() {
    let err = ValidationError::UnknownGeneratorKind("UnknownGenerator".to_string());
    assert_eq!(err.to_string(), "unknown generator class UnknownGenerator");
}

#[test]
fn missing_parameter_message() {
    let err = ValidationError::MissingParameter {
        kind: "RandomGenerator",
        parameter: "rate",
    };
    assert_eq!(err.to_string(), "RandomGenerator requires parameter `rate`");
}

#[test]
fn backend_state_message() {
    let err = BackendError::InvalidState {
        operation: "simulate",
        state: "uninstantiated",
    };
    assert_eq!(
        err.to_string(),
        "cannot simulate while the simulation is uninstantiated"
    );
}

#[test]
fn harness_error_is_transparent_over_validation_and_backend() {
    let validation: HarnessError = ValidationError::ReadPercentage(-1).into();
    assert_eq!(
        validation.to_string(),
        ValidationError::ReadPercentage(-1).to_string()
    );
    assert!(matches!(
        validation,
        HarnessError::Validation(ValidationError::ReadPercentage(-1))
    ));

    let backend: HarnessError = BackendError::Unrealizable("no".to_string()).into();
    assert_eq!(backend.to_string(), "system is not realizable: no");
}
