mod fs;
mod names;

pub(crate) use fs::*;
pub use names::clean_country_name;
