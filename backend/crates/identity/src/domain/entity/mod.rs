//! Entity Module

pub mod account;
pub mod credential;
pub mod seller_profile;
