// src/handlers/mod.rs

pub mod tasks;
