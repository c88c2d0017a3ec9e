pub mod admin;
pub mod enter;
pub mod randomness;
pub mod upkeep;
pub mod withdraw;
