//! Front-end adapters mapping files and streams onto pool operations.

pub mod csv;
