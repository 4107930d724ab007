pub mod classify;
pub mod crypto;
pub mod gateway;
pub mod validate;
