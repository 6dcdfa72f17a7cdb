mod countries;
mod layer;

pub use countries::{Countries, CountryNaming};
pub use layer::{CellLayer, Feature, Layer, PointLayer, Properties, VectorLayer};
