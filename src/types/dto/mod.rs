// Wire-facing request/response models
pub mod activity;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod group;
pub mod permission;
pub mod user;
