//! Credential resolution.
//!
//! The API key comes from the process environment. A `.env` file, if one
//! exists in the working directory or any parent, is loaded first and its
//! values override variables already set.

pub mod env;

pub use env::{load_dotenv, EnvCredentialSource, GOOGLE_API_KEY};
