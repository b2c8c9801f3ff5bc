//! Calls Google resource APIs on behalf of a session and reshapes the
//! answers into the JSON the frontend reads.

pub mod calendar;
pub mod mail;
