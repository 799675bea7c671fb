//! Domain layer for the Accounts domain

pub mod entities;
pub mod state;
