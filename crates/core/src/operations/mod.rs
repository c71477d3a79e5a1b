//! Operation registry, argument contracts and typed calls

pub mod arguments;
pub mod call;
pub mod catalog;

pub use arguments::{validate, ValidatedArgs};
pub use call::{generate_username, CrlSelector, EnrollmentRequest, OperationCall, SearchCriteria};
pub use catalog::{descriptors, OperationDescriptor, OperationKind};
