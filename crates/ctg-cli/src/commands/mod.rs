pub mod compile;
pub mod export;
pub mod lists;
pub mod matching;
