use std::fmt::Display;

pub trait ResultExt<T, InitialError> {
    /// Map an error to a string-based error variant
    ///
    /// Converts `Result<T, InitialError>` to `Result<T, FinalError>` where FinalError has a variant
    /// that takes a String, using the Display implementation of InitialError.
    ///
    /// # Example
    /// ```rust
    /// use tagtext_util::result_ext::ResultExt;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// enum TagError {
    ///     #[error("write failed: {0}")]
    ///     Write(String),
    /// }
    ///
    /// fn example() -> Result<u8, TagError> {
    ///     "not a number".parse::<u8>().map_err_str(TagError::Write)
    /// }
    ///
    /// assert!(matches!(example(), Err(TagError::Write(_))));
    /// ```
    fn map_err_str<FinalError, F>(self, f: F) -> Result<T, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError;
}

impl<Type, InitialError> ResultExt<Type, InitialError> for Result<Type, InitialError> {
    fn map_err_str<FinalError, F>(self, f: F) -> Result<Type, FinalError>
    where
        InitialError: Display,
        F: FnOnce(String) -> FinalError,
    {
        self.map_err(|e| f(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Wrapped(String),
    }

    #[test]
    fn test_map_err_str_uses_display() {
        let result: Result<(), std::fmt::Error> = Err(std::fmt::Error);
        let mapped = result.map_err_str(TestError::Wrapped);
        assert_eq!(mapped, Err(TestError::Wrapped(std::fmt::Error.to_string())));
    }
}
