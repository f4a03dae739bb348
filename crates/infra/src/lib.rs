//! Infrastructure layer: storage adapters, sessions, credentials.

pub mod credentials;
pub mod sessions;
pub mod store;

pub use credentials::{hash_password, verify_password, CredentialError};
pub use sessions::{InMemorySessionStore, SessionStore, SessionToken};
pub use store::{Collection, MemCollection, StoreError};
