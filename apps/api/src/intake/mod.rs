// Form intake and prompt assembly.
// The intake record is plain data; assembly is a pure function over it and the catalog.

pub mod assembler;
pub mod models;
pub mod prompts;
