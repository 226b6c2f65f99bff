//! Leclat - spa business backend.
//!
//! Accounts with roles, credential management (hashing, bearer tokens,
//! password reset), appointment booking, the service catalog, client medical
//! histories and contact messages, served as an HTTP/JSON API on top of SQLite.

pub mod appointment;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod history;
pub mod logging;
pub mod web;

pub use auth::{
    get_profile, hash_password, login, register, update_profile, validate_password,
    verify_password, Authenticated, Caller, Claims, CredentialHash, PasswordError, ProfileUpdate,
    RegistrationRequest, TokenError, TokenIssuer, TokenSubject, ValidationError,
};
pub use config::Config;
pub use db::{Account, AccountRepository, AccountUpdate, Database, NewAccount, Role};
pub use error::{LeclatError, Result};
