pub mod currency;
pub mod requests;
pub mod responses;
