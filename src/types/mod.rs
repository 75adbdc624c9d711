pub mod investment;
pub mod quote;
