//! Certificate revocation reasons

use serde::{Deserialize, Serialize};

use crate::impl_wire_enum_conversions;

/// Revocation reason codes accepted by the backend (RFC 5280 names).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationReason {
    #[default]
    Unspecified,
    KeyCompromise,
    CaCompromise,
    AffiliationChanged,
    Superseded,
    CessationOfOperation,
    CertificateHold,
    RemoveFromCrl,
    PrivilegeWithdrawn,
    AaCompromise,
}

impl_wire_enum_conversions!(RevocationReason {
    Unspecified => "UNSPECIFIED",
    KeyCompromise => "KEY_COMPROMISE",
    CaCompromise => "CA_COMPROMISE",
    AffiliationChanged => "AFFILIATION_CHANGED",
    Superseded => "SUPERSEDED",
    CessationOfOperation => "CESSATION_OF_OPERATION",
    CertificateHold => "CERTIFICATE_HOLD",
    RemoveFromCrl => "REMOVE_FROM_CRL",
    PrivilegeWithdrawn => "PRIVILEGE_WITHDRAWN",
    AaCompromise => "AA_COMPROMISE",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_matches_wire_table() {
        for reason in RevocationReason::ALL {
            let value = serde_json::to_value(reason).unwrap();
            assert_eq!(value, serde_json::Value::String(reason.as_str().to_string()));
        }
    }

    #[test]
    fn default_is_unspecified() {
        assert_eq!(RevocationReason::default().as_str(), "UNSPECIFIED");
    }

    #[test]
    fn ten_reasons() {
        assert_eq!(RevocationReason::WIRE_VALUES.len(), 10);
        assert!("KEY_COMPROMISED".parse::<RevocationReason>().is_err());
    }
}
