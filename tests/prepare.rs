use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use siteprep::io::{read_layer, read_raw_geojson};
use siteprep::prepare::{EpsgRecord, ExclusionJob};
use siteprep::{prepare, Crs, Layout, Settings};

const TEMPLATE: &str = "\
aoi: data/Country.geojson
layers:
  - file: data/Country_oceans.geojson
";

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]],
    })
}

fn collection(features: Vec<(Value, Value)>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features.into_iter()
            .map(|(geometry, properties)| json!({"type": "Feature", "geometry": geometry, "properties": properties}))
            .collect::<Vec<_>>(),
    })
}

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn setup(root: &Path) -> Settings {
    let world = collection(vec![
        (square(36.0, -2.0, 37.0, -1.0), json!({"NAME": "Kenya"})),
        (square(-5.0, 6.0, -4.0, 7.0), json!({"NAME": "Côte d'Ivoire"})),
    ]);
    write(&root.join("data/world.geojson"), &serde_json::to_vec(&world).unwrap());

    let oceans = collection(vec![
        (square(37.0, -3.0, 40.0, 0.0), json!({"name": "Indian Ocean"})),
        (square(100.0, 0.0, 110.0, 10.0), json!({"name": "South China Sea"})),
    ]);
    write(&root.join("data/oceans.geojson"), &serde_json::to_vec(&oceans).unwrap());

    write(&root.join("inputs_spider/Country_config.yml"), TEMPLATE.as_bytes());
    write(&root.join("inputs_spider/Country_config_hydro.yml"), format!("{TEMPLATE}  - file: data/Country_hydropower_dams.geojson\n").as_bytes());

    Settings {
        world_path: Some(PathBuf::from("data/world.geojson")),
        ocean_path: Some(PathBuf::from("data/oceans.geojson")),
        ..Settings::default()
    }
}

fn feature_count(path: &Path) -> usize {
    read_raw_geojson(path).unwrap()["features"].as_array().map_or(0, Vec::len)
}

#[test]
fn stages_every_input_for_a_country() {
    let dir = tempfile::tempdir().unwrap();
    let settings = setup(dir.path());
    let layout = Layout::new(dir.path());

    prepare(&layout, &settings, &["Kenya".to_string()], false).unwrap();

    let record: EpsgRecord = serde_json::from_slice(&fs::read(layout.epsg_record("Kenya")).unwrap()).unwrap();
    assert_eq!(record.epsg, 32737);
    assert_eq!(read_layer(&layout.boundary_utm("Kenya")).unwrap().crs(), Crs::from_epsg(32737));
    assert!(layout.boundary_buffer("Kenya").exists());
    assert_eq!(feature_count(&layout.indexer_boundary("Kenya")), 1);

    // only the neighbouring ocean reaches into the buffer
    assert_eq!(feature_count(&layout.exclusion_oceans("Kenya")), 1);
    let oceans = read_layer(&layout.indexer_layer("Kenya", "oceans")).unwrap();
    assert_eq!(oceans.crs(), Crs::WGS84);
    assert_eq!(oceans.features()[0].get_str("name"), Some("Indian Ocean"));

    let job: ExclusionJob = serde_json::from_slice(&fs::read(layout.exclusion_job("Kenya")).unwrap()).unwrap();
    assert_eq!(job.srs, 32737);
    assert_eq!(job.region, layout.boundary_utm("Kenya"));

    let config = fs::read_to_string(layout.indexer_config("Kenya")).unwrap();
    assert!(config.contains("data/Kenya_oceans.geojson"));
    assert!(!layout.final_hydropower("Kenya").exists());
}

#[test]
fn country_names_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let settings = setup(dir.path());
    let layout = Layout::new(dir.path());

    prepare(&layout, &settings, &["Côte d'Ivoire".to_string()], false).unwrap();

    assert!(layout.epsg_record("CotedIvoire").exists());
    let config = fs::read_to_string(layout.indexer_config("CotedIvoire")).unwrap();
    assert!(config.contains("data/CotedIvoire.geojson"));
}

#[test]
fn hydro_run_stages_plants() {
    let dir = tempfile::tempdir().unwrap();
    let settings = setup(dir.path());
    let layout = Layout::new(dir.path());
    write(&layout.hydropower_csv("Kenya"), b"\
id,lat,lon,name,type,capacity,avg_annual_generation_GWh,head,country_code
1,-1.5,36.5,Alpha,dam,120,400,85,KE
2,-1.6,36.6,Beta,dam,40,100,,KE
");

    prepare(&layout, &settings, &["Kenya".to_string()], true).unwrap();

    assert_eq!(feature_count(&layout.indexer_layer("Kenya", "hydropower_dams")), 1);
    assert_eq!(feature_count(&layout.final_hydropower("Kenya")), 1);
    let config = fs::read_to_string(layout.indexer_config("Kenya")).unwrap();
    assert!(config.contains("data/Kenya_hydropower_dams.geojson"));
}

#[test]
fn hydro_run_requires_plant_list() {
    let dir = tempfile::tempdir().unwrap();
    let settings = setup(dir.path());
    let layout = Layout::new(dir.path());

    assert!(prepare(&layout, &settings, &["Kenya".to_string()], true).is_err());
}

#[test]
fn unknown_country_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = setup(dir.path());
    let layout = Layout::new(dir.path());

    let err = prepare(&layout, &settings, &["Atlantis".to_string()], false).unwrap_err();
    assert!(format!("{err:#}").contains("Atlantis"));
}
