//! Operation argument contracts
//!
//! A `ParamContract` is the only description of what an operation accepts.
//! Validation, schema listing and default filling all read from it.

use serde::Serialize;
use serde_json::{json, Value};

/// JSON type an argument must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Boolean,
}

/// Value used when an optional argument is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamDefault {
    /// Omitted means absent
    None,
    Str(&'static str),
    Int(i64),
    Bool(bool),
    /// Filled by the dispatcher at call time (e.g. enrollment usernames)
    Generated,
}

impl ParamDefault {
    pub fn to_json(self) -> Option<Value> {
        match self {
            Self::None | Self::Generated => None,
            Self::Str(s) => Some(Value::String(s.to_string())),
            Self::Int(i) => Some(json!(i)),
            Self::Bool(b) => Some(Value::Bool(b)),
        }
    }
}

/// Contract for one named argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamContract {
    pub name: &'static str,
    /// Alternate spellings accepted from callers (camelCase forms)
    pub aliases: &'static [&'static str],
    pub param_type: ParamType,
    pub required: bool,
    pub default: ParamDefault,
    /// Closed set of accepted string values; empty means unrestricted
    pub allowed: &'static [&'static str],
    /// Inclusive lower bound for integers
    pub min: Option<i64>,
    pub description: &'static str,
}

impl ParamContract {
    pub const fn required(
        name: &'static str,
        param_type: ParamType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            param_type,
            required: true,
            default: ParamDefault::None,
            allowed: &[],
            min: None,
            description,
        }
    }

    pub const fn optional(
        name: &'static str,
        param_type: ParamType,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            param_type,
            required: false,
            default: ParamDefault::None,
            allowed: &[],
            min: None,
            description,
        }
    }

    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub const fn default_value(mut self, default: ParamDefault) -> Self {
        self.default = default;
        self
    }

    pub const fn allowed(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }

    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Whether `key` names this argument, canonically or by alias.
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }

    /// JSON-schema fragment for listing.
    pub fn schema(&self) -> Value {
        let mut schema = json!({
            "type": self.param_type,
            "description": self.description,
        });
        if let Some(default) = self.default.to_json() {
            schema["default"] = default;
        }
        if !self.allowed.is_empty() {
            schema["enum"] = json!(self.allowed);
        }
        if let Some(min) = self.min {
            schema["minimum"] = json!(min);
        }
        schema
    }
}

/// Listing schema for a parameter set.
pub fn input_schema(params: &[ParamContract]) -> Value {
    let properties: serde_json::Map<String, Value> =
        params.iter().map(|p| (p.name.to_string(), p.schema())).collect();
    let required: Vec<&str> = params.iter().filter(|p| p.required).map(|p| p.name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REASON: ParamContract = ParamContract::optional("reason", ParamType::String, "Reason")
        .default_value(ParamDefault::Str("UNSPECIFIED"))
        .allowed(&["UNSPECIFIED", "KEY_COMPROMISE"]);

    #[test]
    fn matches_name_and_aliases() {
        let contract = ParamContract::required("issuer_dn", ParamType::String, "Issuer DN")
            .aliases(&["issuerDN"]);
        assert!(contract.matches("issuer_dn"));
        assert!(contract.matches("issuerDN"));
        assert!(!contract.matches("issuer"));
    }

    #[test]
    fn schema_lists_defaults_and_enums() {
        let schema = REASON.schema();
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["default"], "UNSPECIFIED");
        assert_eq!(schema["enum"], json!(["UNSPECIFIED", "KEY_COMPROMISE"]));
    }

    #[test]
    fn input_schema_collects_required_names() {
        let params = [
            ParamContract::required("serial_number", ParamType::String, "Serial"),
            ParamContract::optional("crl_partition_index", ParamType::Integer, "Partition")
                .default_value(ParamDefault::Int(0))
                .min(0),
        ];
        let schema = input_schema(&params);
        assert_eq!(schema["required"], json!(["serial_number"]));
        assert_eq!(schema["properties"]["crl_partition_index"]["minimum"], 0);
        assert_eq!(schema["properties"]["crl_partition_index"]["default"], 0);
    }

    #[test]
    fn generated_defaults_have_no_json_value() {
        assert!(ParamDefault::Generated.to_json().is_none());
        assert_eq!(ParamDefault::Bool(false).to_json(), Some(Value::Bool(false)));
    }
}
