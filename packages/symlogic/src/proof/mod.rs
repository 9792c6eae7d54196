pub mod catalogue;
pub mod derive;
pub mod matching;
pub mod steps;
