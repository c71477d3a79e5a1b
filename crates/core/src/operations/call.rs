//! Typed operation calls
//!
//! An `OperationCall` is a validated, fully-defaulted request for one
//! non-composite operation. The endpoint mapper consumes it without touching
//! loose JSON.

use certgate_domain::constants::{DEFAULT_SEARCH_MAX_RESULTS, GENERATED_USERNAME_PREFIX};
use certgate_domain::{GatewayError, RevocationReason, ValidationError};
use chrono::Utc;
use uuid::Uuid;

use super::arguments::ValidatedArgs;
use super::catalog::OperationKind;

/// Criteria for `search_certificates`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub query: Option<String>,
    pub max_results: i64,
    pub subject_dn: Option<String>,
    pub issuer_dn: Option<String>,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            query: None,
            max_results: DEFAULT_SEARCH_MAX_RESULTS,
            subject_dn: None,
            issuer_dn: None,
        }
    }
}

/// Which CRL to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrlSelector {
    pub delta: bool,
    pub partition_index: i64,
}

/// Fields of an enrollment request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRequest {
    pub certificate_request: String,
    pub ca_name: String,
    pub certificate_profile: String,
    pub end_entity_profile: String,
    pub username: String,
}

/// A validated call to a single backend endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationCall {
    CertificateApiStatus,
    ListCas,
    CaVersion,
    SearchCertificates(SearchCriteria),
    GetCertificateBySerial { serial_number: String, issuer_dn: Option<String> },
    GetCertificateStatus { issuer_dn: String, serial_number: String },
    RevokeCertificate { issuer_dn: String, serial_number: String, reason: RevocationReason },
    /// `issuer_dn` of `None` addresses the default CA
    GetCrl { issuer_dn: Option<String>, crl: CrlSelector },
    GetLatestCrl { issuer_dn: String, crl: CrlSelector },
    CreateCrl { issuer_dn: String, delta: bool },
    GetCrlInfo { issuer_dn: String },
    GetCaCertificate { ca_subject_dn: String },
    GetCaCertificates { ca_subject_dn: String },
    EnrollCertificate(EnrollmentRequest),
}

impl OperationCall {
    /// Build the typed call for `kind` from validated arguments.
    ///
    /// Composite operations have no single request and are rejected here.
    pub fn build(kind: OperationKind, args: &ValidatedArgs) -> Result<Self, GatewayError> {
        let call = match kind {
            OperationKind::TestConnection | OperationKind::Troubleshoot => {
                return Err(GatewayError::Internal(format!(
                    "{} is a composite operation without a request mapping",
                    kind.name()
                )))
            }
            OperationKind::CertificateApiStatus => Self::CertificateApiStatus,
            OperationKind::ListCas => Self::ListCas,
            OperationKind::CaVersion => Self::CaVersion,
            OperationKind::SearchCertificates => Self::SearchCertificates(SearchCriteria {
                query: args.string("query"),
                max_results: args.integer("max_results").unwrap_or(DEFAULT_SEARCH_MAX_RESULTS),
                subject_dn: args.string("subject_dn"),
                issuer_dn: args.string("issuer_dn"),
            }),
            OperationKind::GetCertificateBySerial => Self::GetCertificateBySerial {
                serial_number: args.required_string("serial_number")?,
                issuer_dn: args.string("issuer_dn"),
            },
            OperationKind::GetCertificateStatus => Self::GetCertificateStatus {
                issuer_dn: args.required_string("issuer_dn")?,
                serial_number: args.required_string("serial_number")?,
            },
            OperationKind::RevokeCertificate => Self::RevokeCertificate {
                issuer_dn: args.required_string("issuer_dn")?,
                serial_number: args.required_string("serial_number")?,
                reason: parse_reason(args)?,
            },
            OperationKind::GetCrl => {
                Self::GetCrl { issuer_dn: args.string("issuer_dn"), crl: crl_selector(args) }
            }
            OperationKind::GetLatestCrl => Self::GetLatestCrl {
                issuer_dn: args.required_string("issuer_dn")?,
                crl: crl_selector(args),
            },
            OperationKind::CreateCrl => Self::CreateCrl {
                issuer_dn: args.required_string("issuer_dn")?,
                delta: args.flag("delta_crl"),
            },
            OperationKind::GetCrlInfo => {
                Self::GetCrlInfo { issuer_dn: args.required_string("issuer_dn")? }
            }
            OperationKind::GetCaCertificate => {
                Self::GetCaCertificate { ca_subject_dn: args.required_string("ca_subject_dn")? }
            }
            OperationKind::GetCaCertificates => {
                Self::GetCaCertificates { ca_subject_dn: args.required_string("ca_subject_dn")? }
            }
            OperationKind::EnrollCertificate => Self::EnrollCertificate(EnrollmentRequest {
                certificate_request: args.required_string("certificate_request")?,
                ca_name: args.required_string("ca_name")?,
                certificate_profile: args.required_string("certificate_profile")?,
                end_entity_profile: args.required_string("end_entity_profile")?,
                username: args.string("username").unwrap_or_else(generate_username),
            }),
        };
        Ok(call)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CertificateApiStatus => OperationKind::CertificateApiStatus,
            Self::ListCas => OperationKind::ListCas,
            Self::CaVersion => OperationKind::CaVersion,
            Self::SearchCertificates(_) => OperationKind::SearchCertificates,
            Self::GetCertificateBySerial { .. } => OperationKind::GetCertificateBySerial,
            Self::GetCertificateStatus { .. } => OperationKind::GetCertificateStatus,
            Self::RevokeCertificate { .. } => OperationKind::RevokeCertificate,
            Self::GetCrl { .. } => OperationKind::GetCrl,
            Self::GetLatestCrl { .. } => OperationKind::GetLatestCrl,
            Self::CreateCrl { .. } => OperationKind::CreateCrl,
            Self::GetCrlInfo { .. } => OperationKind::GetCrlInfo,
            Self::GetCaCertificate { .. } => OperationKind::GetCaCertificate,
            Self::GetCaCertificates { .. } => OperationKind::GetCaCertificates,
            Self::EnrollCertificate(_) => OperationKind::EnrollCertificate,
        }
    }
}

fn crl_selector(args: &ValidatedArgs) -> CrlSelector {
    CrlSelector {
        delta: args.flag("delta_crl"),
        partition_index: args.integer("crl_partition_index").unwrap_or(0),
    }
}

fn parse_reason(args: &ValidatedArgs) -> Result<RevocationReason, ValidationError> {
    match args.string("reason") {
        Some(reason) => reason.parse().map_err(|err: String| ValidationError::field("reason", err)),
        None => Ok(RevocationReason::default()),
    }
}

/// Unique end-entity username: prefix, UTC timestamp, random suffix.
pub fn generate_username() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{GENERATED_USERNAME_PREFIX}_{}_{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}
