//! Types shared between the raffle core and its rendering front-ends.

pub mod domain;
pub mod error;
pub mod notice;
