//! Operation registry
//!
//! The closed set of operations and the argument contracts each one accepts.

use certgate_domain::constants::{
    DEFAULT_CERTIFICATE_PROFILE, DEFAULT_END_ENTITY_PROFILE, DEFAULT_SEARCH_MAX_RESULTS,
};
use certgate_domain::{input_schema, ParamContract, ParamDefault, ParamType, RevocationReason};
use serde_json::Value;

/// Every operation the gateway exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    TestConnection,
    Troubleshoot,
    CertificateApiStatus,
    ListCas,
    CaVersion,
    SearchCertificates,
    GetCertificateBySerial,
    GetCertificateStatus,
    RevokeCertificate,
    GetCrl,
    GetLatestCrl,
    CreateCrl,
    GetCrlInfo,
    GetCaCertificate,
    GetCaCertificates,
    EnrollCertificate,
}

/// Registry entry for one operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub description: &'static str,
    pub params: &'static [ParamContract],
}

impl OperationDescriptor {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn input_schema(&self) -> Value {
        input_schema(self.params)
    }

    pub fn param(&self, name: &str) -> Option<&'static ParamContract> {
        self.params.iter().find(|p| p.name == name)
    }
}

impl OperationKind {
    pub const ALL: &'static [Self] = &[
        Self::TestConnection,
        Self::Troubleshoot,
        Self::CertificateApiStatus,
        Self::ListCas,
        Self::CaVersion,
        Self::SearchCertificates,
        Self::GetCertificateBySerial,
        Self::GetCertificateStatus,
        Self::RevokeCertificate,
        Self::GetCrl,
        Self::GetLatestCrl,
        Self::CreateCrl,
        Self::GetCrlInfo,
        Self::GetCaCertificate,
        Self::GetCaCertificates,
        Self::EnrollCertificate,
    ];

    /// Wire name used by callers.
    pub fn name(self) -> &'static str {
        match self {
            Self::TestConnection => "test_ejbca_connection",
            Self::Troubleshoot => "troubleshoot_connection",
            Self::CertificateApiStatus => "get_certificate_api_status",
            Self::ListCas => "get_ca_list",
            Self::CaVersion => "get_ca_version",
            Self::SearchCertificates => "search_certificates",
            Self::GetCertificateBySerial => "get_certificate_by_serial",
            Self::GetCertificateStatus => "get_certificate_status",
            Self::RevokeCertificate => "revoke_certificate",
            Self::GetCrl => "get_crl",
            Self::GetLatestCrl => "get_latest_crl",
            Self::CreateCrl => "create_crl",
            Self::GetCrlInfo => "get_crl_info",
            Self::GetCaCertificate => "get_ca_certificate",
            Self::GetCaCertificates => "get_ca_certificates",
            Self::EnrollCertificate => "enroll_certificate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Composite operations orchestrate other operations and have no
    /// request mapping of their own.
    pub fn is_composite(self) -> bool {
        matches!(self, Self::TestConnection | Self::Troubleshoot)
    }

    pub fn descriptor(self) -> OperationDescriptor {
        let (description, params): (&'static str, &'static [ParamContract]) = match self {
            Self::TestConnection => (
                "Test connection to the EJBCA REST API and report authentication status",
                NO_PARAMS,
            ),
            Self::Troubleshoot => (
                "Run connection diagnostics and derive setup recommendations",
                NO_PARAMS,
            ),
            Self::CertificateApiStatus => (
                "Get the status and version of the certificate management REST API",
                NO_PARAMS,
            ),
            Self::ListCas => ("Get the list of authorized certificate authorities", NO_PARAMS),
            Self::CaVersion => ("Get version information for the CA REST API", NO_PARAMS),
            Self::SearchCertificates => {
                ("Search for certificates using various criteria", SEARCH_PARAMS)
            }
            Self::GetCertificateBySerial => {
                ("Get certificate details by serial number", BY_SERIAL_PARAMS)
            }
            Self::GetCertificateStatus => {
                ("Get the revocation status of a certificate", ISSUER_AND_SERIAL_PARAMS)
            }
            Self::RevokeCertificate => {
                ("Revoke a certificate with the specified reason", REVOKE_PARAMS)
            }
            Self::GetCrl => (
                "Get the CRL for a CA, or the default CA, with delta and partition support",
                GET_CRL_PARAMS,
            ),
            Self::GetLatestCrl => {
                ("Get the latest CRL for a specific CA", LATEST_CRL_PARAMS)
            }
            Self::CreateCrl => ("Generate a new CRL for a specific CA", CREATE_CRL_PARAMS),
            Self::GetCrlInfo => ("Get CRL information for a specific CA", ISSUER_PARAMS),
            Self::GetCaCertificate => {
                ("Download the certificate of a specific CA", CA_SUBJECT_PARAMS)
            }
            Self::GetCaCertificates => {
                ("Get the certificate chain of a specific CA", CA_SUBJECT_PARAMS)
            }
            Self::EnrollCertificate => (
                "Enroll a new certificate from a certificate signing request (CSR)",
                ENROLL_PARAMS,
            ),
        };

        OperationDescriptor { kind: self, description, params }
    }
}

/// Every registry entry, in listing order.
pub fn descriptors() -> Vec<OperationDescriptor> {
    OperationKind::ALL.iter().map(|kind| kind.descriptor()).collect()
}

/* -------------------------------------------------------------------------- */
/* Argument contracts */
/* -------------------------------------------------------------------------- */

const NO_PARAMS: &[ParamContract] = &[];

const ISSUER_DN: ParamContract =
    ParamContract::required("issuer_dn", ParamType::String, "Issuer distinguished name")
        .aliases(&["issuerDN"]);

const OPTIONAL_ISSUER_DN: ParamContract = ParamContract::optional(
    "issuer_dn",
    ParamType::String,
    "Issuer distinguished name (optional)",
)
.aliases(&["issuerDN"]);

const SERIAL_NUMBER: ParamContract = ParamContract::required(
    "serial_number",
    ParamType::String,
    "Certificate serial number in hexadecimal format",
)
.aliases(&["serial", "serialNumber"]);

const DELTA_CRL: ParamContract = ParamContract::optional(
    "delta_crl",
    ParamType::Boolean,
    "true for the delta CRL, false for the complete CRL",
)
.aliases(&["deltaCrl"])
.default_value(ParamDefault::Bool(false));

const CRL_PARTITION_INDEX: ParamContract =
    ParamContract::optional("crl_partition_index", ParamType::Integer, "CRL partition index")
        .aliases(&["crlPartitionIndex"])
        .default_value(ParamDefault::Int(0))
        .min(0);

const SEARCH_PARAMS: &[ParamContract] = &[
    ParamContract::optional("query", ParamType::String, "Search query string"),
    ParamContract::optional(
        "max_results",
        ParamType::Integer,
        "Maximum number of results to return",
    )
    .aliases(&["maxResults"])
    .default_value(ParamDefault::Int(DEFAULT_SEARCH_MAX_RESULTS))
    .min(1),
    ParamContract::optional(
        "subject_dn",
        ParamType::String,
        "Subject distinguished name to search for",
    )
    .aliases(&["subjectDN"]),
    ParamContract::optional(
        "issuer_dn",
        ParamType::String,
        "Issuer distinguished name to search for",
    )
    .aliases(&["issuerDN"]),
];

const BY_SERIAL_PARAMS: &[ParamContract] = &[SERIAL_NUMBER, OPTIONAL_ISSUER_DN];

const ISSUER_AND_SERIAL_PARAMS: &[ParamContract] = &[ISSUER_DN, SERIAL_NUMBER];

const REVOKE_PARAMS: &[ParamContract] = &[
    ISSUER_DN,
    SERIAL_NUMBER,
    ParamContract::optional("reason", ParamType::String, "Revocation reason")
        .default_value(ParamDefault::Str("UNSPECIFIED"))
        .allowed(RevocationReason::WIRE_VALUES),
];

const GET_CRL_PARAMS: &[ParamContract] = &[
    ParamContract::optional(
        "issuer_dn",
        ParamType::String,
        "CRL issuer DN (the CA subject DN); omit for the default CA",
    )
    .aliases(&["issuerDN"]),
    DELTA_CRL,
    CRL_PARTITION_INDEX,
];

const LATEST_CRL_PARAMS: &[ParamContract] = &[ISSUER_DN, DELTA_CRL, CRL_PARTITION_INDEX];

const CREATE_CRL_PARAMS: &[ParamContract] = &[
    ISSUER_DN,
    ParamContract::optional(
        "delta_crl",
        ParamType::Boolean,
        "true to also create the delta CRL",
    )
    .aliases(&["deltaCrl"])
    .default_value(ParamDefault::Bool(false)),
];

const ISSUER_PARAMS: &[ParamContract] = &[ISSUER_DN];

const CA_SUBJECT_PARAMS: &[ParamContract] = &[ParamContract::required(
    "ca_subject_dn",
    ParamType::String,
    "CA subject distinguished name",
)
.aliases(&["caSubjectDN"])];

const ENROLL_PARAMS: &[ParamContract] = &[
    ParamContract::required(
        "certificate_request",
        ParamType::String,
        "Certificate signing request in PEM format",
    )
    .aliases(&["certificateRequest"]),
    ParamContract::required("ca_name", ParamType::String, "Certificate authority name")
        .aliases(&["caName"]),
    ParamContract::optional("certificate_profile", ParamType::String, "Certificate profile name")
        .aliases(&["certificateProfile"])
        .default_value(ParamDefault::Str(DEFAULT_CERTIFICATE_PROFILE)),
    ParamContract::optional("end_entity_profile", ParamType::String, "End entity profile name")
        .aliases(&["endEntityProfile"])
        .default_value(ParamDefault::Str(DEFAULT_END_ENTITY_PROFILE)),
    ParamContract::optional(
        "username",
        ParamType::String,
        "End entity username (generated when omitted)",
    )
    .default_value(ParamDefault::Generated),
];
