use std::fs;

use game_content::{ConfigLoader, ContentFactory, StageLoader};
use game_core::ObstacleKind;

fn write_data_dir(config: &str, stage: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("config.toml"), config).expect("write config");
    fs::create_dir(dir.path().join("stages")).expect("stages dir");
    fs::write(dir.path().join("stages").join("pen.ron"), stage).expect("write stage");
    dir
}

const PEN: &str = r#"(
    name: "pen",
    obstacles: [
        (name: "crate", center: (5.0, 1.0, 5.0), size: (2.0, 2.0, 2.0)),
        (name: "ramp", center: (-5.0, 0.5, 0.0), size: (4.0, 1.0, 4.0)),
    ],
)"#;

#[test]
fn factory_loads_config_and_sized_stage() {
    let dir = write_data_dir("[arena]\nhalf_extent = 20.0\ntarget_bones = 10\n", PEN);
    let factory = ContentFactory::new(dir.path());

    let config = factory.load_config().expect("config loads");
    assert_eq!(config.arena.half_extent, 20.0);
    assert_eq!(config.arena.target_bones, 10);

    let stage = factory.load_stage("pen", &config).expect("stage loads");
    let boundary: Vec<_> = stage
        .obstacles()
        .iter()
        .filter(|o| o.kind == ObstacleKind::Boundary)
        .collect();
    assert_eq!(boundary.len(), 4);
    assert!(boundary.iter().all(|o| o.bounds.max.x.abs().max(o.bounds.min.x.abs()) <= 21.0));
    assert_eq!(stage.platforms().count(), 1);
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let factory = ContentFactory::new(dir.path());
    let err = factory.load_config().unwrap_err();
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn malformed_stage_reports_parse_failure() {
    let dir = write_data_dir("", "(name: \"pen\", obstacles: [(name: 3)])");
    let config = ConfigLoader::load(&dir.path().join("config.toml")).expect("empty config is default");
    let err = StageLoader::load(&dir.path().join("stages/pen.ron"), 40.0, 0.15).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse stage RON"));
    assert_eq!(config, game_core::GameConfig::default());
}
