pub mod hands;
