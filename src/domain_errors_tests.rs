// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for domain configuration error types.

#[cfg(test)]
mod tests {
    use crate::domain_errors::DomainConfigError;
    use crate::selector::LabelSelector;
    use std::collections::BTreeMap;
    use std::error::Error as _;

    fn parse_error() -> serde_yaml::Error {
        serde_yaml::from_str::<LabelSelector>("not: valid: yaml: ::").unwrap_err()
    }

    #[test]
    fn test_config_parse_error_names_domain() {
        let error = DomainConfigError::ConfigParse {
            domain: "broken.example.com".to_string(),
            source: parse_error(),
        };

        assert!(error
            .to_string()
            .starts_with("Failed to parse selector for domain 'broken.example.com': "));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_missing_default_domain_includes_data() {
        let data = BTreeMap::from([(
            "prod.example.com".to_string(),
            "{selector: {env: prod}}".to_string(),
        )]);
        let error = DomainConfigError::MissingDefaultDomain { data };

        assert_eq!(
            error.to_string(),
            r#"Config {"prod.example.com": "{selector: {env: prod}}"} must have a default domain"#
        );
    }

    #[test]
    fn test_validation_errors_are_not_transient() {
        let parse = DomainConfigError::ConfigParse {
            domain: "a".to_string(),
            source: parse_error(),
        };
        let missing = DomainConfigError::MissingDefaultDomain {
            data: BTreeMap::new(),
        };

        assert!(!parse.is_transient());
        assert!(!missing.is_transient());
    }

    #[test]
    fn test_status_reasons() {
        let parse = DomainConfigError::ConfigParse {
            domain: "a".to_string(),
            source: parse_error(),
        };
        let missing = DomainConfigError::MissingDefaultDomain {
            data: BTreeMap::new(),
        };

        assert_eq!(parse.status_reason(), "ConfigParseError");
        assert_eq!(missing.status_reason(), "MissingDefaultDomain");
    }
}
