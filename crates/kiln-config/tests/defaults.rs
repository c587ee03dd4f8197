//! Tests for default values and the conventional project layout.

use kiln_config::{Category, ImagesConfig, KilnConfig, ModeFlags, Project, ServerConfig};
use std::path::{Path, PathBuf};

#[test]
fn kiln_config_defaults() {
    let config = KilnConfig::default();
    assert_eq!(config.build_root, PathBuf::from("build"));
    assert_eq!(config.paths.html.source, "src/*.html");
    assert_eq!(config.paths.html.watch.as_deref(), Some("src/**/*.html"));
    assert_eq!(config.paths.styles.source, "src/scss/**/*.scss");
    assert_eq!(config.paths.fonts.source, "src/fonts/*.woff");
    assert_eq!(config.paths.images.source, "src/images/**/*");
    assert_eq!(config.paths.scripts.source, "src/javascript/**/*.js");
    assert_eq!(config.scripts.bundle, "index.js");
    assert_eq!(config.styles.browsers, vec!["defaults".to_string()]);
}

#[test]
fn image_and_server_defaults() {
    assert_eq!(
        ImagesConfig::default(),
        ImagesConfig {
            jpeg_quality: 50,
            png_level: 6
        }
    );
    assert_eq!(ServerConfig::default().port, 3000);
}

#[test]
fn every_destination_sits_under_build_root() {
    let project =
        Project::resolve(Path::new("/site"), KilnConfig::default(), ModeFlags::default()).unwrap();
    for category in Category::ALL {
        assert!(project.paths.get(category).dest.starts_with(project.build_root()));
    }
}

#[test]
fn path_table_is_deterministic() {
    let a = Project::resolve(Path::new("/site"), KilnConfig::default(), ModeFlags::default())
        .unwrap();
    let b = Project::resolve(Path::new("/site"), KilnConfig::default(), ModeFlags::default())
        .unwrap();
    for category in Category::ALL {
        let (left, right) = (a.paths.get(category), b.paths.get(category));
        assert_eq!(left.source_pattern, right.source_pattern);
        assert_eq!(left.watch_pattern, right.watch_pattern);
        assert_eq!(left.dest, right.dest);
    }
}

#[test]
fn root_is_normalized() {
    let project = Project::resolve(
        Path::new("/site/./sub/.."),
        KilnConfig::default(),
        ModeFlags::default(),
    )
    .unwrap();
    assert_eq!(project.root(), Path::new("/site"));
}
