pub mod errors;
pub mod issuer;
pub mod models;

pub use errors::RefreshTokenError;
pub use issuer::RefreshTokenIssuer;
pub use models::NewRefreshToken;
pub use models::RefreshTokenRecord;
