//! Domain layer for the Conversations domain

pub mod entities;
pub mod state;
pub mod title;
