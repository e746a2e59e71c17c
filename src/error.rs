//! Error types for the dynamic array model and its browser front-end.

use std::error::Error;
use std::fmt;

/// Returned by [`DynamicArray::remove_last`](crate::DynamicArray::remove_last)
/// when there is nothing to remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyError;

impl fmt::Display for EmptyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot remove from an empty array")
    }
}

impl Error for EmptyError {}

/// Errors surfaced by configuration parsing and front-end setup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VizError {
    /// A query-string value could not be parsed for `key`.
    Config {
        /// Query key that was rejected.
        key: String,
        /// Raw value as it appeared in the query.
        value: String,
    },
    /// A required DOM object (window, document, element) was missing.
    Dom(&'static str),
    /// Shader compilation, program linking, or buffer creation failed.
    WebGl(String),
    /// The "Add Element" input did not hold an integer.
    NotANumber(String),
    /// An operation hit an empty array.
    Empty(EmptyError),
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { key, value } => write!(f, "invalid value '{value}' for '{key}'"),
            Self::Dom(what) => write!(f, "{what} not found"),
            Self::WebGl(msg) => write!(f, "webgl: {msg}"),
            Self::NotANumber(raw) => write!(f, "'{raw}' is not a whole number"),
            Self::Empty(e) => write!(f, "{e}"),
        }
    }
}

impl Error for VizError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Empty(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EmptyError> for VizError {
    fn from(e: EmptyError) -> Self {
        Self::Empty(e)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<VizError> for wasm_bindgen::JsValue {
    fn from(e: VizError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_error_displays_reason() {
        assert_eq!(EmptyError.to_string(), "cannot remove from an empty array");
    }

    #[test]
    fn viz_error_wraps_empty_as_source() {
        let err = VizError::from(EmptyError);
        assert_eq!(err, VizError::Empty(EmptyError));
        assert!(err.source().is_some());
        assert!(VizError::Dom("canvas").source().is_none());
    }

    #[test]
    fn config_error_names_key_and_value() {
        let err = VizError::Config {
            key: "capacity".into(),
            value: "lots".into(),
        };
        assert_eq!(err.to_string(), "invalid value 'lots' for 'capacity'");
    }

    #[test]
    fn not_a_number_quotes_input() {
        assert_eq!(
            VizError::NotANumber("4.5".into()).to_string(),
            "'4.5' is not a whole number"
        );
    }
}
