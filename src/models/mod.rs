pub mod import;
pub mod product;

pub use import::*;
pub use product::*;
