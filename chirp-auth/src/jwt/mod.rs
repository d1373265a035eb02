pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::AccessClaims;
pub use codec::AccessTokenCodec;
pub use codec::DEFAULT_ISSUER;
pub use errors::TokenError;
