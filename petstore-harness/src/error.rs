//! Failure types reported by the harness.
//!
//! Every variant describes a violation that ends the current scenario. Nothing
//! here is retried: a dropped connection and a wrong status code are reported
//! the same way.

use std::fmt;

/// A single field of an entity that did not hold the expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMismatch {
    /// Name of the diverging field (e.g. "name", "photoUrls").
    pub field: &'static str,
    /// Debug rendering of the expected value.
    pub expected: String,
    /// Debug rendering of the actual value.
    pub actual: String,
}

impl FieldMismatch {
    pub fn new(field: &'static str, expected: impl fmt::Debug, actual: impl fmt::Debug) -> Self {
        Self {
            field,
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected pet {} to be {} but was {}",
            self.field, self.expected, self.actual
        )
    }
}

/// What a negative-path call observed instead of the expected failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsenceOutcome {
    /// The call succeeded.
    Succeeded { status: u16 },
    /// The call failed, but with another code. Code 0 means no response.
    WrongCode { code: u16, body: Option<String> },
}

/// The harness error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// A happy-path call did not return the documented status.
    ContractViolation {
        operation: String,
        expected: u16,
        code: u16,
        body: Option<String>,
    },
    /// A happy-path call returned the documented status but a body that is not
    /// the expected entity.
    MalformedPayload {
        operation: String,
        status: u16,
        message: String,
        body: String,
    },
    /// A negative-path call did not fail with the documented code.
    ExpectedAbsenceViolation {
        operation: String,
        expected: u16,
        outcome: AbsenceOutcome,
    },
    /// A field check found a diverging value.
    FieldMismatch(FieldMismatch),
    /// A collecting assertion chain found one or more diverging values.
    FieldMismatches(Vec<FieldMismatch>),
    /// A check was invoked on an absent entity.
    MissingEntity,
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::ContractViolation {
                operation,
                expected,
                code,
                body,
            } => {
                write!(
                    f,
                    "API returned error while {}: {} (expected {})",
                    operation, code, expected
                )?;
                if let Some(body) = body {
                    write!(f, "\nBody: {}", body)?;
                }
                Ok(())
            }
            HarnessError::MalformedPayload {
                operation,
                status,
                message,
                body,
            } => write!(
                f,
                "payload did not match the pet shape while {} ({} response): {}\nBody: {}",
                operation, status, message, body
            ),
            HarnessError::ExpectedAbsenceViolation {
                operation,
                expected,
                outcome,
            } => match outcome {
                AbsenceOutcome::Succeeded { status } => write!(
                    f,
                    "expected {} to fail with {} but it succeeded with {}",
                    operation, expected, status
                ),
                AbsenceOutcome::WrongCode { code, body } => {
                    write!(
                        f,
                        "expected {} to fail with {} but it failed with {}",
                        operation, expected, code
                    )?;
                    if let Some(body) = body {
                        write!(f, "\nBody: {}", body)?;
                    }
                    Ok(())
                }
            },
            HarnessError::FieldMismatch(mismatch) => write!(f, "{}", mismatch),
            HarnessError::FieldMismatches(mismatches) => {
                writeln!(f, "{} pet field(s) diverged:", mismatches.len())?;
                for mismatch in mismatches {
                    writeln!(f, "  - {}", mismatch)?;
                }
                Ok(())
            }
            HarnessError::MissingEntity => write!(f, "expected a pet but there was none"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<FieldMismatch> for HarnessError {
    fn from(mismatch: FieldMismatch) -> Self {
        HarnessError::FieldMismatch(mismatch)
    }
}

/// A type alias for `Result<T, HarnessError>`.
pub type Result<T> = std::result::Result<T, HarnessError>;
