pub mod config;
pub mod error;
pub mod explanation;
pub mod markdown;
pub mod proof;
pub mod propositional_logic;
