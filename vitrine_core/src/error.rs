// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for fallible construction and parsing.
//!
//! Frame-loop operations do not return these; they record a
//! [`Diagnostic`](crate::trace::Diagnostic) and carry on.

use alloc::string::{String, ToString};

use crate::trace::DiagnosticKind;

/// A failure reported by the flexbox backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The backend rejected an operation.
    #[error("flexbox backend error: {0}")]
    Backend(String),
    /// A layout pass for the given root did not complete.
    #[error("layout pass for root {root} did not complete")]
    PassFailed {
        /// Slot index of the layout root.
        root: u32,
    },
}

impl From<taffy::TaffyError> for LayoutError {
    fn from(err: taffy::TaffyError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// A container attribute could not be applied.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// The attribute name is not recognized.
    #[error("unknown layout attribute `{0}`")]
    UnknownAttribute(String),
    /// The attribute is known but the value is not one of its keywords.
    #[error("unknown value `{value}` for `{attribute}`")]
    UnknownValue {
        /// Canonical attribute name.
        attribute: &'static str,
        /// The rejected input.
        value: String,
    },
    /// The attribute expects a number and the value did not parse as one.
    #[error("`{attribute}` expects a number, got `{value}`")]
    InvalidNumber {
        /// Canonical attribute name.
        attribute: &'static str,
        /// The rejected input.
        value: String,
    },
}

impl StyleError {
    /// The diagnostic category this error is reported under.
    #[must_use]
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            Self::UnknownAttribute(_) => DiagnosticKind::UnknownAttribute,
            Self::UnknownValue { .. } => DiagnosticKind::UnknownValue,
            Self::InvalidNumber { .. } => DiagnosticKind::InvalidConfig,
        }
    }

    /// Canonical name of the attribute involved.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownAttribute(_) => "attribute",
            Self::UnknownValue { attribute, .. } | Self::InvalidNumber { attribute, .. } => {
                attribute
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_error_messages() {
        let e = StyleError::UnknownValue {
            attribute: "justify-content",
            value: "diagonal".into(),
        };
        assert_eq!(
            e.to_string(),
            "unknown value `diagonal` for `justify-content`"
        );
        assert_eq!(e.diagnostic_kind(), DiagnosticKind::UnknownValue);
        assert_eq!(e.field(), "justify-content");
    }

    #[test]
    fn unknown_attribute_maps_to_its_kind() {
        let e = StyleError::UnknownAttribute("colour".into());
        assert_eq!(e.diagnostic_kind(), DiagnosticKind::UnknownAttribute);
        assert_eq!(e.to_string(), "unknown layout attribute `colour`");
    }
}
