use std::fmt;
use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use regex::Regex;

/// A coordinate reference system identified by its EPSG code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crs(u32);

impl Crs {
    /// WGS84 longitude/latitude, the GeoJSON default.
    pub const WGS84: Crs = Crs(4326);

    #[inline] pub fn from_epsg(code: u32) -> Self { Self(code) }

    #[inline] pub fn epsg(self) -> u32 { self.0 }

    /// Whether coordinates are degrees of longitude/latitude.
    #[inline]
    pub fn is_geographic(self) -> bool {
        matches!(self.0, 4326 | 4269 | 4937)
    }

    /// Build the PROJ.4 definition for the supported EPSG codes.
    /// - 4326 / 4269: WGS84 / NAD83 lon/lat
    /// - 3857: web mercator
    /// - 326zz / 327zz: WGS84 UTM north / south
    fn proj4(self) -> Result<String> {
        let def = match self.0 {
            4326 => "+proj=longlat +datum=WGS84 +no_defs +type=crs".to_string(),
            4269 | 4937 => "+proj=longlat +datum=NAD83 +no_defs +type=crs".to_string(),
            3857 => "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +nadgrids=@null +no_defs +type=crs".to_string(),
            code @ 32601..=32660 => format!("+proj=utm +zone={} +datum=WGS84 +units=m +no_defs +type=crs", code - 32600),
            code @ 32701..=32760 => format!("+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs +type=crs", code - 32700),
            code => bail!("[geom::Crs] unsupported EPSG code: {code}"),
        };
        Ok(def)
    }

    /// The OGC URN used in the legacy GeoJSON `crs` member.
    pub fn urn(self) -> String {
        format!("urn:ogc:def:crs:EPSG::{}", self.0)
    }

    /// Parse an OGC URN / `EPSG:nnnn` string as written in GeoJSON `crs` members.
    pub fn from_urn(name: &str) -> Option<Self> {
        if name.ends_with("CRS84") {
            return Some(Self::WGS84);
        }
        name.rsplit(':').next()?.trim().parse().ok().map(Self)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

/// Maps coordinates between two CRSs.
pub(crate) struct Reprojector {
    from: Proj4,
    to: Proj4,
    from_geographic: bool,
    to_geographic: bool,
}

impl Reprojector {
    pub(crate) fn new(from: Crs, to: Crs) -> Result<Self> {
        let build = |crs: Crs| -> Result<Proj4> {
            let proj_string = crs.proj4()?;
            Proj4::from_proj_string(&proj_string)
                .with_context(|| anyhow!("failed to build PROJ.4 for {crs}: {proj_string}"))
        };

        Ok(Self {
            from: build(from)?,
            to: build(to)?,
            from_geographic: from.is_geographic(),
            to_geographic: to.is_geographic(),
        })
    }

    /// Transform one coordinate; degrees ↔ radians conversion is handled here.
    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = if self.from_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| anyhow!("CRS transform failed at ({}, {}): {e:?}", coord.x, coord.y))?;

        Ok(if self.to_geographic {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        })
    }

    /// Transform every coordinate of a geometry.
    pub(crate) fn apply<G>(&self, geometry: &G) -> Result<G>
    where
        G: MapCoords<f64, f64, Output = G>,
    {
        geometry.try_map_coords(|coord| self.coord(coord))
    }
}

/// UTM zone EPSG code (WGS84) for a lon/lat location, rounding half to even.
pub fn utm_epsg(latitude: f64, longitude: f64) -> u32 {
    let hemisphere = ((45.0 + latitude) / 90.0).round_ties_even();
    let zone = ((183.0 + longitude) / 6.0).round_ties_even();
    (32700.0 - hemisphere * 100.0 + zone) as u32
}

/// Detect the CRS described by a shapefile `.prj` (WKT1).
/// Tries, in order: the outermost EPSG authority, a UTM zone name, a bare WGS84 geographic CRS.
pub(crate) fn crs_from_prj_wkt(wkt: &str) -> Option<Crs> {
    static AUTHORITY: OnceLock<Regex> = OnceLock::new();
    static UTM_ZONE: OnceLock<Regex> = OnceLock::new();

    let authority = AUTHORITY.get_or_init(|| {
        Regex::new(r#"^AUTHORITY\[\s*"EPSG"\s*,\s*"?(\d+)"?\s*\]"#).expect("valid regex")
    });
    let utm_zone = UTM_ZONE.get_or_init(|| {
        Regex::new(r"(?i)UTM[_ ]zone[_ ](\d{1,2})\s*([NS])").expect("valid regex")
    });

    let is_projected = wkt.trim_start().starts_with("PROJCS");

    // Only a direct child of the root names the CRS; nested ones name its datum, units, etc.
    if let Some(code) = root_children(wkt)
        .filter_map(|start| authority.captures(&wkt[start..]))
        .last()
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        if is_projected || Crs(code).is_geographic() {
            return Some(Crs(code));
        }
    }

    if let Some(caps) = utm_zone.captures(wkt) {
        let zone: u32 = caps[1].parse().ok()?;
        let base = if caps[2].eq_ignore_ascii_case("S") { 32700 } else { 32600 };
        return Some(Crs(base + zone));
    }

    if !is_projected && wkt.contains("WGS") && wkt.contains("1984") {
        return Some(Crs::WGS84);
    }

    None
}

/// Byte offsets of the direct children of the root WKT node (depth one, outside quotes).
fn root_children(wkt: &str) -> impl Iterator<Item = usize> + '_ {
    let mut depth = 0usize;
    let mut quoted = false;
    let mut at_start = false;
    wkt.char_indices().filter_map(move |(idx, c)| {
        let starts_child = at_start && depth == 1 && !quoted && !c.is_whitespace();
        if starts_child || !c.is_whitespace() {
            at_start = false;
        }
        match c {
            '"' => quoted = !quoted,
            '[' | '(' if !quoted => { depth += 1; at_start = true; }
            ']' | ')' if !quoted => depth = depth.saturating_sub(1),
            ',' if !quoted => at_start = true,
            _ => {}
        }
        starts_child.then_some(idx)
    })
}
