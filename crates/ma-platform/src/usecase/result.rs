//! Use Case Result Type
//!
//! Outcome of a use case execution. Failures can be built anywhere; success
//! is only produced inside the crate, by the use cases themselves.

use super::error::UseCaseError;

/// Result type for use case execution.
///
/// ```ignore
/// if meetup.is_owned_by(&command.subscriber_id) {
///     return UseCaseResult::failure(Rejection::SelfSubscription.into());
/// }
/// ```
pub enum UseCaseResult<T> {
    /// Successful result containing the outcome event.
    Success(T),
    /// Failed result containing the error.
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UseCaseResult::Failure(_))
    }

    /// Get the success value, consuming self.
    ///
    /// Panics on a failure.
    pub fn unwrap(self) -> T {
        match self {
            UseCaseResult::Success(v) => v,
            UseCaseResult::Failure(e) => panic!("Called unwrap on a Failure: {}", e),
        }
    }

    /// Get the error, consuming self.
    ///
    /// Panics on a success.
    pub fn unwrap_err(self) -> UseCaseError {
        match self {
            UseCaseResult::Success(_) => panic!("Called unwrap_err on a Success"),
            UseCaseResult::Failure(e) => e,
        }
    }

    pub fn into_result(self) -> Result<T, UseCaseError> {
        match self {
            UseCaseResult::Success(v) => Ok(v),
            UseCaseResult::Failure(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, UseCaseError>> for UseCaseResult<T> {
    fn from(result: Result<T, UseCaseError>) -> Self {
        match result {
            Ok(v) => UseCaseResult::Success(v),
            Err(e) => UseCaseResult::Failure(e),
        }
    }
}

impl<T> From<UseCaseResult<T>> for Result<T, UseCaseError> {
    fn from(result: UseCaseResult<T>) -> Self {
        result.into_result()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UseCaseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCaseResult::Success(v) => f.debug_tuple("Success").field(v).finish(),
            UseCaseResult::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result: UseCaseResult<String> = UseCaseResult::success("admitted".to_string());
        assert!(result.is_success());
        assert_eq!(result.unwrap(), "admitted");
    }

    #[test]
    fn test_failure_result() {
        let result: UseCaseResult<String> =
            UseCaseResult::failure(UseCaseError::validation("CODE", "message"));
        assert!(result.is_failure());
        assert_eq!(result.unwrap_err().code(), "CODE");
    }

    #[test]
    fn test_from_std_result() {
        let ok: UseCaseResult<i32> = Ok(7).into();
        assert_eq!(ok.unwrap(), 7);

        let err: UseCaseResult<i32> = Err(UseCaseError::commit("boom")).into();
        assert_eq!(err.into_result().unwrap_err().code(), "COMMIT_FAILED");
    }
}
