use anyhow::{bail, Result};
use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use shapefile as shp;

/// Coerce a shapefile shape into an owned geo geometry, raising an error for unsupported shape types.
pub(crate) fn shape_to_geometry(shape: shp::Shape) -> Result<Option<Geometry<f64>>> {
    Ok(Some(match shape {
        shp::Shape::NullShape => return Ok(None),
        shp::Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
        shp::Shape::Multipoint(mp) => Geometry::MultiPoint(MultiPoint(
            mp.points().iter().map(|p| Point::new(p.x, p.y)).collect(),
        )),
        shp::Shape::Polyline(line) => {
            let mut parts: Vec<LineString<f64>> = line.parts().iter()
                .map(|part| LineString(part.iter().map(|p| Coord { x: p.x, y: p.y }).collect()))
                .collect();
            if parts.len() == 1 {
                Geometry::LineString(parts.remove(0))
            } else {
                Geometry::MultiLineString(MultiLineString(parts))
            }
        }
        shp::Shape::Polygon(polygon) => Geometry::MultiPolygon(polygon_to_multipolygon(&polygon)),
        other => bail!("[geom::shape_to_geometry] unsupported shape type: {:?}", other.shapetype()),
    }))
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
fn polygon_to_multipolygon(p: &shp::Polygon) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last {
                coords.push(first)
            }
        }
    }

    /// Get the signed area of a geo::Coord list (negative for clockwise)
    fn signed_area(pts: &[Coord<f64>]) -> f64 {
        pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
    }

    // Shapefile stores each exterior ring (clockwise) followed by its holes (counter-clockwise).
    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in p.rings() {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = LineString(coords);

        if is_exterior {
            if let Some(ext) = current_exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
            }
            current_exterior = Some(ls);
        } else {
            current_holes.push(ls);
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    fn pt(x: f64, y: f64) -> shp::Point { shp::Point { x, y } }

    #[test]
    fn groups_holes_with_their_exterior() {
        let polygon = shp::Polygon::with_rings(vec![
            shp::PolygonRing::Outer(vec![pt(0.0, 0.0), pt(0.0, 4.0), pt(4.0, 4.0), pt(4.0, 0.0), pt(0.0, 0.0)]),
            shp::PolygonRing::Inner(vec![pt(1.0, 1.0), pt(2.0, 1.0), pt(2.0, 2.0), pt(1.0, 2.0), pt(1.0, 1.0)]),
            shp::PolygonRing::Outer(vec![pt(10.0, 0.0), pt(10.0, 1.0), pt(11.0, 1.0), pt(11.0, 0.0), pt(10.0, 0.0)]),
        ]);

        let Some(Geometry::MultiPolygon(mp)) = shape_to_geometry(shp::Shape::Polygon(polygon)).unwrap() else {
            panic!("expected a multipolygon");
        };
        assert_eq!(mp.0.len(), 2);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!((mp.unsigned_area() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn converts_points_and_null_shapes() {
        let point = shape_to_geometry(shp::Shape::Point(pt(3.0, 4.0))).unwrap();
        assert_eq!(point, Some(Geometry::Point(Point::new(3.0, 4.0))));
        assert_eq!(shape_to_geometry(shp::Shape::NullShape).unwrap(), None);
    }
}
