pub mod parser;
pub mod syntax;
pub mod truth_table;
pub mod types;
pub mod verdict;
