//! Value Object Module

pub mod account_id;
pub mod account_name;
pub mod account_role;
pub mod email;
pub mod phone_number;
