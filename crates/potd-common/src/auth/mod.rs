//! Authentication utilities

mod service_account;

pub use service_account::{
    AssertionClaims, ServiceAccountKey, ServiceAccountSigner, DEFAULT_TOKEN_URI,
    SHEETS_READONLY_SCOPE,
};
