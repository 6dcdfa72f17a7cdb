mod attribution;
mod cleanup;
mod finalize;
mod persist;
mod placement;

pub use attribution::{assign_country, COUNTRY_FIELD};
pub use cleanup::{feature_count, remove_extra_cells, retain_country};
pub use finalize::{finalize, finalize_country, load_countries, CountryInputs, FinalizeReport};
pub use persist::{update_cells, CellData, WriteOutcome};
pub use placement::{count_placements, PV_FIELD, TURBINE_FIELD};
