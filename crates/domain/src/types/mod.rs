//! Domain types and models

pub mod envelope;
pub mod operation;
pub mod outcome;
pub mod request;
pub mod revocation;

pub use envelope::{Classification, EnvelopeBody, EnvelopeError, ResponseEnvelope};
pub use operation::{input_schema, ParamContract, ParamDefault, ParamType};
pub use outcome::{Channel, RawBody, RawOutcome};
pub use request::{HttpMethod, RequestDescriptor};
pub use revocation::RevocationReason;
