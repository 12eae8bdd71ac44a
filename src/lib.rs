//! Career Guide: bilingual career guidance for 12th-grade students.

pub mod channels;
pub mod config;
pub mod error;
pub mod guidance;
pub mod llm;
