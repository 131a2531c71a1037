// Database entities (sea-orm models)
pub mod activity;
pub mod group;
pub mod group_permission;
pub mod permission;
pub mod session;
pub mod user;
