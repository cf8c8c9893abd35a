//! Encoding and decoding rules

use serde::{Deserialize, Serialize};

/// Options applied while encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingRules {
    /// Point repeated dynamic payloads of a region at a single copy
    pub optimize: bool,
    /// Accept named-field records for tuples in addition to positional tuples
    pub accept_records: bool,
}

impl Default for EncodingRules {
    fn default() -> Self {
        Self {
            optimize: false,
            accept_records: true,
        }
    }
}

/// Options applied while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingRules {
    /// Return tuples whose members are all named as [`crate::Value::Record`]
    pub structs_as_records: bool,
    /// Reject non-canonical words (dirty padding, bools other than 0/1,
    /// invalid UTF-8) instead of coercing them
    pub strict: bool,
    /// Largest accepted array or byte-string length
    pub max_length: Option<usize>,
}

impl Default for DecodingRules {
    fn default() -> Self {
        Self {
            structs_as_records: true,
            strict: false,
            max_length: None,
        }
    }
}

impl DecodingRules {
    /// Default rules for return data: positional tuples
    pub fn return_values() -> Self {
        Self {
            structs_as_records: false,
            ..Self::default()
        }
    }

    /// Same rules with positional tuples
    pub fn positional(self) -> Self {
        Self { structs_as_records: false, ..self }
    }

    /// Same rules in strict mode
    pub fn strict(self) -> Self {
        Self { strict: true, ..self }
    }

    pub(crate) fn check_length(&self, declared: usize) -> Result<(), crate::AbiError> {
        match self.max_length {
            Some(limit) if declared > limit => Err(crate::AbiError::size_limit(declared, limit)),
            _ => Ok(()),
        }
    }
}

/// Full rule set, as loaded from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Rules for call data and return data encoding
    pub encoding: EncodingRules,
    /// Rules for call data decoding
    pub decoding: DecodingRules,
    /// Rules for return data decoding
    pub return_decoding: DecodingRules,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            encoding: EncodingRules::default(),
            decoding: DecodingRules::default(),
            return_decoding: DecodingRules::return_values(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_asymmetry() {
        let rules = Rules::default();
        assert!(rules.decoding.structs_as_records);
        assert!(!rules.return_decoding.structs_as_records);
    }

    #[test]
    fn test_rules_deserialize_partial() {
        let rules: Rules = toml::from_str(
            r#"
            [encoding]
            optimize = true

            [decoding]
            strict = true
            max_length = 1024
            "#,
        )
        .unwrap();
        assert!(rules.encoding.optimize);
        assert!(rules.encoding.accept_records);
        assert!(rules.decoding.strict);
        assert_eq!(rules.decoding.max_length, Some(1024));
        assert_eq!(rules.return_decoding, DecodingRules::return_values());
    }

    #[test]
    fn test_check_length() {
        let rules = DecodingRules { max_length: Some(4), ..DecodingRules::default() };
        assert!(rules.check_length(4).is_ok());
        assert!(matches!(
            rules.check_length(5),
            Err(crate::AbiError::SizeLimit { declared: 5, limit: 4, .. })
        ));
    }
}
