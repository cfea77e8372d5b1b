use super::*;

#[test]
fn empty_object_takes_defaults() {
    let cfg = PipelineConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PipelineConfig::default());
    assert_eq!(cfg.super_sample, 4);
    assert!(!cfg.parallel);
    assert_eq!(cfg.fonts[0].index, 7);
    assert_eq!(cfg.fonts.len(), 3);
}

#[test]
fn zero_super_sample_is_rejected() {
    let r = PipelineConfig::from_reader(r#"{"super_sample":0}"#.as_bytes());
    assert!(matches!(r, Err(IconStackError::Validation(_))));
}

#[test]
fn unknown_fields_and_bad_json_are_serde_errors() {
    let r = PipelineConfig::from_reader(r#"{"supersample":2}"#.as_bytes());
    assert!(matches!(r, Err(IconStackError::Serde(_))));
    let r = PipelineConfig::from_reader("not json".as_bytes());
    assert!(matches!(r, Err(IconStackError::Serde(_))));
}

#[test]
fn sources_parse_as_tagged_specs() {
    let json = r#"{
        "sources": {
            "icon_small_back": { "kind": "file", "path": "bars.png" },
            "icon_small_middle": { "kind": "blank" },
            "top_shelf": { "kind": "prompt", "prompt": "cinematic wide banner" }
        }
    }"#;
    let cfg = PipelineConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.source_for("icon_small_back"), SourceSpec::file("bars.png"));
    assert_eq!(cfg.source_for("icon_small_middle"), SourceSpec::Blank);
    assert!(matches!(
        cfg.source_for("top_shelf"),
        SourceSpec::Prompt { .. }
    ));
    assert_eq!(
        cfg.source_for("top_shelf_wide"),
        SourceSpec::file("abstract_wide_artistic_banner_fe.png")
    );
}

#[test]
fn sources_are_validated() {
    for json in [
        r#"{"sources":{"nope":{"kind":"blank"}}}"#,
        r#"{"sources":{"top_shelf":{"kind":"file","path":"../x.png"}}}"#,
        r#"{"sources":{"top_shelf":{"kind":"prompt","prompt":"  "}}}"#,
        r#"{"only":["icon_medium"]}"#,
        r#"{"threads":0}"#,
    ] {
        assert!(
            matches!(
                PipelineConfig::from_reader(json.as_bytes()),
                Err(IconStackError::Validation(_))
            ),
            "{json}"
        );
    }
}

#[test]
fn only_selects_families() {
    let cfg = PipelineConfig::from_reader(r#"{"only":["icon_small","top_shelf"]}"#.as_bytes())
        .unwrap();
    assert!(cfg.selects("icon_small"));
    assert!(!cfg.selects("icon_large"));
    assert!(PipelineConfig::default().selects("anything"));
}

#[test]
fn from_path_rebases_relative_dirs() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("iconstack.json");
    std::fs::write(
        &path,
        r#"{"source_dir":"in","output_dir":"/abs/out","catalog_dir":"cat"}"#,
    )
    .unwrap();
    let cfg = PipelineConfig::from_path(&path).unwrap();
    assert_eq!(cfg.source_dir, dir.join("in"));
    assert_eq!(cfg.output_dir, PathBuf::from("/abs/out"));
    assert_eq!(cfg.catalog_dir, Some(dir.join("cat")));
}

#[test]
fn missing_file_is_a_validation_error() {
    assert!(matches!(
        PipelineConfig::from_path("/nonexistent/iconstack.json"),
        Err(IconStackError::Validation(_))
    ));
}
