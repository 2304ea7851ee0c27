pub mod aggregate;
pub mod classify;
pub mod palette;
pub mod panel;
