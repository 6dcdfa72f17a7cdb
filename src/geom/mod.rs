mod buffer;
mod crs;
mod geom;
mod shp;

pub use crs::{utm_epsg, Crs};
pub(crate) use buffer::buffer;
pub(crate) use crs::{crs_from_prj_wkt, Reprojector};
pub(crate) use geom::Geometries;
pub(crate) use shp::shape_to_geometry;
