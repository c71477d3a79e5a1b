//! Gateway constants
//!
//! Centralized location for backend wire constants and fixed limits.

// Backend location
pub const DEFAULT_BASE_URL: &str = "https://localhost:443";
pub const REST_API_PREFIX: &str = "ejbca/ejbca-rest-api/v1";

// Transport
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const REQUESTED_WITH_HEADER: &str = "X-Keyfactor-Requested-With";
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const CRL_CONTENT_TYPE_PREFIX: &str = "application/pkix-crl";

// Response normalization
pub const BINARY_PREVIEW_BYTES: usize = 50;
pub const ERROR_DETAIL_MAX_CHARS: usize = 500;
/// Keys that only ever carried transport metadata and never reach callers.
pub const INTERNAL_BODY_FIELDS: &[&str] = &["_method", "_status_code", "_url"];

// Enrollment
pub const DEFAULT_CERTIFICATE_PROFILE: &str = "ENDUSER";
pub const DEFAULT_END_ENTITY_PROFILE: &str = "EMPTY";
pub const ENROLLMENT_PLACEHOLDER_PASSWORD: &str = "certgate_temp_password";
pub const GENERATED_USERNAME_PREFIX: &str = "certgate_user";

// Search
pub const DEFAULT_SEARCH_MAX_RESULTS: i64 = 10;

// Dispatcher
pub const TROUBLESHOOT_HINT: &str = "Try `troubleshoot_connection` first to verify setup.";
