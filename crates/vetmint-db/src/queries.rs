//! Database query functions organized by table.

pub mod notifications;
pub mod state;
