pub mod errors;
pub mod memory;
pub mod ports;

pub use errors::StoreError;
pub use memory::InMemoryCredentialStore;
pub use ports::RefreshTokenStore;
pub use ports::UserCredentialStore;
pub use ports::UserCredentials;
