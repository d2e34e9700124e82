//! Behavior errors. These never propagate to the caller; behaviors report
//! them through [`Dom::console_error`](crate::Dom::console_error).

/// Reasons a behavior declines to bind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UiError {
    #[error("{what} element not found: {selector:?}")]
    NotFound { what: &'static str, selector: String },

    #[error("Invalid option {option}: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },
}

impl UiError {
    pub(crate) fn not_found(what: &'static str, selector: &str) -> Self {
        Self::NotFound {
            what,
            selector: selector.to_string(),
        }
    }

    pub(crate) fn invalid(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}

/// Reject empty selectors and class names.
pub(crate) fn require_non_empty(option: &'static str, value: &str) -> Result<(), UiError> {
    if value.trim().is_empty() {
        return Err(UiError::invalid(option, "must not be empty"));
    }
    Ok(())
}
