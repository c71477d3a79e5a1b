//! Argument validation against parameter contracts
//!
//! Callers send a loose JSON object. Validation resolves aliases to canonical
//! names, checks types, allowed values and bounds, fills defaults, and reports
//! every violation at once.

use certgate_domain::{ParamContract, ParamType, ValidationError};
use serde_json::{Map, Value};

/// Arguments that passed their contracts, keyed by canonical name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: Map<String, Value>,
}

impl ValidatedArgs {
    /// Optional string argument; absent when omitted without default.
    pub fn string(&self, name: &str) -> Option<String> {
        self.values.get(name).and_then(Value::as_str).map(str::to_string)
    }

    /// Required string argument.
    pub fn required_string(&self, name: &str) -> Result<String, ValidationError> {
        self.string(name).ok_or_else(|| ValidationError::field(name, "is required"))
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.values.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Validate `args` against `params`.
///
/// `null` is accepted as an empty argument object. For each contract the
/// canonical name wins over an alias when both are present. Empty strings are
/// treated as omitted. Keys that match no contract are ignored.
pub fn validate(params: &[ParamContract], args: &Value) -> Result<ValidatedArgs, ValidationError> {
    let empty = Map::new();
    let object = match args {
        Value::Null => &empty,
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::field(
                "arguments",
                format!("must be a JSON object, got {}", json_type_name(other)),
            ))
        }
    };

    let mut errors = ValidationError::new();
    let mut values = Map::new();

    for contract in params {
        match lookup(contract, object) {
            Some(value) => {
                if let Err(message) = check_value(contract, value) {
                    errors.add_field_error(contract.name, message);
                } else {
                    values.insert(contract.name.to_string(), value.clone());
                }
            }
            None if contract.required => {
                errors.add_field_error(contract.name, "is required");
            }
            None => {
                if let Some(default) = contract.default.to_json() {
                    values.insert(contract.name.to_string(), default);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(ValidatedArgs { values })
    } else {
        Err(errors)
    }
}

fn lookup<'a>(contract: &ParamContract, object: &'a Map<String, Value>) -> Option<&'a Value> {
    std::iter::once(contract.name)
        .chain(contract.aliases.iter().copied())
        .filter_map(|key| object.get(key))
        .find(|value| !is_blank(value))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_value(contract: &ParamContract, value: &Value) -> Result<(), String> {
    match contract.param_type {
        ParamType::String => {
            let Some(text) = value.as_str() else {
                return Err(format!("must be a string, got {}", json_type_name(value)));
            };
            if !contract.allowed.is_empty() && !contract.allowed.contains(&text) {
                return Err(format!("must be one of {}", contract.allowed.join(", ")));
            }
        }
        ParamType::Integer => {
            let Some(number) = value.as_i64() else {
                return Err(format!("must be an integer, got {}", json_type_name(value)));
            };
            if let Some(min) = contract.min {
                if number < min {
                    return Err(format!("must be at least {min}"));
                }
            }
        }
        ParamType::Boolean => {
            if !value.is_boolean() {
                return Err(format!("must be a boolean, got {}", json_type_name(value)));
            }
        }
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use certgate_domain::ParamDefault;
    use serde_json::json;

    use super::*;

    const PARAMS: &[ParamContract] = &[
        ParamContract::required("issuer_dn", ParamType::String, "Issuer DN")
            .aliases(&["issuerDN"]),
        ParamContract::optional("reason", ParamType::String, "Reason")
            .default_value(ParamDefault::Str("UNSPECIFIED"))
            .allowed(&["UNSPECIFIED", "KEY_COMPROMISE"]),
        ParamContract::optional("crl_partition_index", ParamType::Integer, "Partition")
            .aliases(&["crlPartitionIndex"])
            .default_value(ParamDefault::Int(0))
            .min(0),
        ParamContract::optional("delta_crl", ParamType::Boolean, "Delta")
            .default_value(ParamDefault::Bool(false)),
    ];

    #[test]
    fn fills_defaults_for_omitted_arguments() {
        let args = validate(PARAMS, &json!({"issuer_dn": "CN=Root"})).unwrap();

        assert_eq!(args.string("issuer_dn").as_deref(), Some("CN=Root"));
        assert_eq!(args.string("reason").as_deref(), Some("UNSPECIFIED"));
        assert_eq!(args.integer("crl_partition_index"), Some(0));
        assert!(!args.flag("delta_crl"));
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let args =
            validate(PARAMS, &json!({"issuerDN": "CN=Root", "crlPartitionIndex": 3})).unwrap();

        assert_eq!(args.string("issuer_dn").as_deref(), Some("CN=Root"));
        assert_eq!(args.integer("crl_partition_index"), Some(3));
        assert!(!args.contains("issuerDN"));
    }

    #[test]
    fn canonical_name_wins_over_alias() {
        let args =
            validate(PARAMS, &json!({"issuer_dn": "CN=A", "issuerDN": "CN=B"})).unwrap();
        assert_eq!(args.string("issuer_dn").as_deref(), Some("CN=A"));
    }

    #[test]
    fn null_arguments_mean_empty_object() {
        let err = validate(PARAMS, &Value::Null).unwrap_err();
        assert!(err.has_field("issuer_dn"));
        assert_eq!(err.errors.len(), 1);
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = validate(PARAMS, &json!(["CN=Root"])).unwrap_err();
        assert!(err.has_field("arguments"));
        assert!(err.to_string().contains("got array"));
    }

    #[test]
    fn empty_required_string_counts_as_missing() {
        let err = validate(PARAMS, &json!({"issuer_dn": "  "})).unwrap_err();
        assert_eq!(err.to_string(), "issuer_dn: is required");
    }

    #[test]
    fn reports_every_violation_together() {
        let err = validate(
            PARAMS,
            &json!({"reason": "key_compromise", "crl_partition_index": -1, "delta_crl": "yes"}),
        )
        .unwrap_err();

        assert_eq!(err.errors.len(), 4);
        assert!(err.has_field("issuer_dn"));
        assert!(err.has_field("reason"));
        assert!(err.has_field("crl_partition_index"));
        assert!(err.has_field("delta_crl"));
        assert!(err.to_string().contains("must be at least 0"));
    }

    #[test]
    fn rejects_wrong_types() {
        let err = validate(PARAMS, &json!({"issuer_dn": 42, "crl_partition_index": 1.5}))
            .unwrap_err();
        assert!(err.to_string().contains("issuer_dn: must be a string, got integer"));
        assert!(err.to_string().contains("crl_partition_index: must be an integer, got number"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let args = validate(PARAMS, &json!({"issuer_dn": "CN=Root", "verbose": true})).unwrap();
        assert!(!args.contains("verbose"));
    }
}
