#![doc = "Siting input preparation: boundary staging, placement counts and country attribution for hexagon cells"]
mod common;
mod geom;
mod layer;
mod layout;
mod settings;

pub mod io;
pub mod pipeline;
pub mod prepare;

#[doc(inline)]
pub use common::clean_country_name;

#[doc(inline)]
pub use geom::{utm_epsg, Crs};

#[doc(inline)]
pub use layer::{CellLayer, Countries, CountryNaming, Feature, Layer, PointLayer, Properties, VectorLayer};

#[doc(inline)]
pub use layout::Layout;

#[doc(inline)]
pub use settings::Settings;

#[doc(inline)]
pub use pipeline::{finalize, CountryInputs, FinalizeReport, WriteOutcome};

#[doc(inline)]
pub use prepare::prepare;
