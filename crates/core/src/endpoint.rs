//! Endpoint mapper
//!
//! Translates a typed operation call into the backend's method, path, query
//! and body. Pure: no I/O, no clock, no randomness. Path segments reproduce the
//! backend's casing exactly (`getLatestCrl`, `getcrl`, `createcrl`).

use certgate_domain::constants::{DEFAULT_SEARCH_MAX_RESULTS, ENROLLMENT_PLACEHOLDER_PASSWORD};
use certgate_domain::RequestDescriptor;
use serde_json::json;

use crate::operations::{CrlSelector, OperationCall};

/// Build the backend request for `call`.
pub fn map_request(call: &OperationCall) -> RequestDescriptor {
    match call {
        OperationCall::CertificateApiStatus => RequestDescriptor::get("certificate/status"),
        OperationCall::ListCas => RequestDescriptor::get("ca"),
        OperationCall::CaVersion => RequestDescriptor::get("ca/version"),

        OperationCall::SearchCertificates(criteria) => {
            let mut request = RequestDescriptor::get("certificate/search");
            if let Some(query) = &criteria.query {
                request = request.with_query("query", query);
            }
            if criteria.max_results != DEFAULT_SEARCH_MAX_RESULTS {
                request = request.with_query("maxResults", criteria.max_results.to_string());
            }
            if let Some(subject_dn) = &criteria.subject_dn {
                request = request.with_query("subjectDN", subject_dn);
            }
            if let Some(issuer_dn) = &criteria.issuer_dn {
                request = request.with_query("issuerDN", issuer_dn);
            }
            request
        }

        OperationCall::GetCertificateBySerial { serial_number, issuer_dn } => match issuer_dn {
            Some(issuer_dn) => RequestDescriptor::get(format!(
                "certificate/{}/{}",
                encode(issuer_dn),
                encode(serial_number)
            )),
            None => RequestDescriptor::get(format!(
                "certificate/serialnumber/{}",
                encode(serial_number)
            )),
        },

        OperationCall::GetCertificateStatus { issuer_dn, serial_number } => {
            RequestDescriptor::get(format!(
                "certificate/{}/{}/revocationstatus",
                encode(issuer_dn),
                encode(serial_number)
            ))
        }

        OperationCall::RevokeCertificate { issuer_dn, serial_number, reason } => {
            RequestDescriptor::put(format!(
                "certificate/{}/{}/revoke",
                encode(issuer_dn),
                encode(serial_number)
            ))
            .with_body(json!({ "reason": reason.as_str() }))
        }

        OperationCall::GetLatestCrl { issuer_dn, crl } => with_crl_query(
            RequestDescriptor::get(format!("ca/{}/getLatestCrl", encode(issuer_dn))),
            *crl,
        ),

        OperationCall::GetCrl { issuer_dn, crl } => {
            let request = match issuer_dn {
                Some(issuer_dn) => {
                    RequestDescriptor::get(format!("ca/{}/getcrl", encode(issuer_dn)))
                }
                None => RequestDescriptor::get("ca/crl"),
            };
            with_crl_query(request, *crl)
        }

        OperationCall::CreateCrl { issuer_dn, delta } => {
            let request = RequestDescriptor::post(format!("ca/{}/createcrl", encode(issuer_dn)));
            if *delta {
                request.with_query("deltacrl", "true")
            } else {
                request
            }
        }

        OperationCall::GetCrlInfo { issuer_dn } => {
            RequestDescriptor::get(format!("ca/{}/crlinfo", encode(issuer_dn)))
        }

        OperationCall::GetCaCertificate { ca_subject_dn } => {
            RequestDescriptor::get(format!("ca/{}/certificate/download", encode(ca_subject_dn)))
        }

        OperationCall::GetCaCertificates { ca_subject_dn } => {
            RequestDescriptor::get(format!("ca/{}/certificate", encode(ca_subject_dn)))
        }

        OperationCall::EnrollCertificate(enrollment) => {
            RequestDescriptor::post("certificate/enroll").with_body(json!({
                "certificateRequest": enrollment.certificate_request,
                "certificateAuthorityName": enrollment.ca_name,
                "certificateProfileName": enrollment.certificate_profile,
                "endEntityProfileName": enrollment.end_entity_profile,
                "username": enrollment.username,
                "password": ENROLLMENT_PLACEHOLDER_PASSWORD,
            }))
        }
    }
}

/// Only non-default CRL selectors reach the query string.
fn with_crl_query(mut request: RequestDescriptor, crl: CrlSelector) -> RequestDescriptor {
    if crl.delta {
        request = request.with_query("deltaCrl", "true");
    }
    if crl.partition_index != 0 {
        request = request.with_query("crlPartitionIndex", crl.partition_index.to_string());
    }
    request
}

/// Percent-encode one path segment, reserved characters included.
fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
