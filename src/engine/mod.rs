// src/engine/mod.rs

pub mod question_bank;
pub mod ranking;
pub mod rounds;
pub mod scoring;

pub use question_bank::QuestionBank;
