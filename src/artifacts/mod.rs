pub mod divergence;
pub mod moon;
pub mod objects;
pub mod prompt;
pub mod status;
