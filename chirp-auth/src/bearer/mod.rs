pub mod errors;
pub mod extractor;

pub use errors::CredentialError;
pub use extractor::extract_bearer;
pub use extractor::parse_bearer;
