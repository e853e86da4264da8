pub mod ast;
pub mod diff;
