use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Translation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationOptions {
    /// Host variable holding the function's return value, used for `\result`
    pub result_variable: String,
    /// Prefix of the temporaries that hold pre-state values
    pub old_value_prefix: String,
    /// Run the simplifier on predicates before translating them
    pub simplify_before_translation: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            result_variable: "__retval__".to_string(),
            old_value_prefix: "__old_".to_string(),
            simplify_before_translation: true,
        }
    }
}

impl TranslationOptions {
    /// Load options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize options to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Name of the `n`th old-value temporary
    pub fn old_value_name(&self, n: usize) -> String {
        format!("{}{}", self.old_value_prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TranslationOptions::default();
        assert_eq!(options.result_variable, "__retval__");
        assert_eq!(options.old_value_name(3), "__old_3");
        assert!(options.simplify_before_translation);
    }

    #[test]
    fn test_partial_json() {
        let options = TranslationOptions::from_json(r#"{"result_variable": "ret"}"#).unwrap();
        assert_eq!(options.result_variable, "ret");
        assert_eq!(options.old_value_prefix, "__old_");

        let back = TranslationOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(back, options);
    }

    #[test]
    fn test_malformed_json() {
        let err = TranslationOptions::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
