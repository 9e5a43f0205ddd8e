// src/models/mod.rs

pub mod commit;
pub mod daily;
pub mod project;
