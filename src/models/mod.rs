// src/models/mod.rs

pub mod question;
pub mod quiz_status;
pub mod score;
