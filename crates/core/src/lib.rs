//! Functional core of the hedwige backend.
//!
//! Types, pure functions and the trait seams shared by the auth crate and
//! the server:
//! - `auth`: sessions, identity-provider grants, session storage trait
//! - `mail`: Gmail message models and their reshaping into list/detail views
//! - `calendar`: upcoming-events query and invariant enforcement
//! - `upstream`: resource API traits and their error type

pub mod auth;
pub mod calendar;
pub mod mail;
pub mod upstream;
