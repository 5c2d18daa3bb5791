pub mod capture;
pub mod hand;
