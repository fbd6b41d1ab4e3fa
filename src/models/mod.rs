mod lenient;
pub mod portfolio;
pub mod record;

pub use portfolio::*;
pub use record::*;
