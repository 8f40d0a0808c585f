/// Result of validating a mutation attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValidationResult {
    /// The mutation passed validation and was committed.
    #[default]
    Valid,
    /// The mutation was rejected; state is unchanged.
    Invalid(String),
}

impl ValidationResult {
    /// Create a failed result with a human-readable message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Whether the mutation was accepted.
    pub fn ok(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn is_valid(&self) -> bool {
        self.ok()
    }

    pub fn is_invalid(&self) -> bool {
        !self.ok()
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }

    /// Chain another check, keeping the first failure.
    pub fn and_then(self, f: impl FnOnce() -> ValidationResult) -> Self {
        match self {
            Self::Valid => f(),
            invalid => invalid,
        }
    }
}

impl From<Result<(), String>> for ValidationResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::Valid,
            Err(message) => Self::Invalid(message),
        }
    }
}
