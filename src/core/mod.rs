pub mod filter;
pub mod pattern;
pub mod render;
pub mod walk;
