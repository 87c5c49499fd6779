pub mod domain;
pub mod family;
pub mod format;
pub mod patterns;
