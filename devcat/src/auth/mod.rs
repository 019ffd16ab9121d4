//! Authentication and authorization.
//!
//! Clients log in at `POST /api/login_check` with their email and password and receive a
//! signed JWT. Every other `/api` route expects it as `Authorization: Bearer <token>`; the
//! [`CurrentClient`](current_user::CurrentClient) extractor verifies it and resolves the
//! principal.
//!
//! - [`current_user`]: the principal type and its extractor
//! - [`password`]: Argon2 hashing and the credential digest
//! - [`permissions`]: ownership checks and effective roles
//! - [`session`]: token creation and verification

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
