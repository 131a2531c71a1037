// Internal types not exposed on the wire
pub mod action;

pub use action::Action;
