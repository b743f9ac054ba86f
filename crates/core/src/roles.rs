//! Operator role names stored in the `users.role` column.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_NURSE: &str = "nurse";
