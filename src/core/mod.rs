// Core modules implementing parsing, pyramid layout, and error modeling.
pub mod error;
pub mod parse;
pub mod pyramid;
