use super::*;

const MINIMAL: &str = r#"{
    "input": {
        "sprite_path": "ringbell.png",
        "num_frames": 16,
        "frame_rate": 12,
        "layout": { "grid": { "rows": 4, "cols": 4 } }
    },
    "output": {
        "json_path": "out/ringbell.json",
        "frames_dir": "ringbellframes"
    }
}"#;

fn parse(s: &str) -> ConvertConfig {
    serde_json::from_str(s).unwrap()
}

#[test]
fn minimal_config_fills_defaults() {
    let cfg = parse(MINIMAL);
    cfg.validate().unwrap();

    assert_eq!(cfg.input.layout.order, FrameOrder::RowMajor);
    assert_eq!(cfg.input.layout.padding, 0);
    assert!(!cfg.input.layout.trim);
    assert!(cfg.input.layout.custom_frames.is_empty());
    assert_eq!(cfg.output.name, "SpriteAnimation");
    assert_eq!(cfg.output.image.format, FrameFormat::Png);
    assert_eq!(cfg.output.image.quality, 100);
    assert_eq!(cfg.output.image.background.alpha, 0.0);
    assert_eq!(cfg.threads, None);
}

#[test]
fn order_and_format_use_snake_case_names() {
    let cfg = parse(
        r#"{
        "input": {
            "sprite_path": "s.png", "num_frames": 2, "frame_rate": 24,
            "layout": { "grid": { "rows": 2, "cols": 1 }, "order": "column_major" }
        },
        "output": {
            "json_path": "o.json", "frames_dir": "f",
            "image": { "format": "jpeg", "quality": 80,
                       "background": { "r": 255, "g": 255, "b": 255, "alpha": 1.0 } }
        }
    }"#,
    );
    assert_eq!(cfg.input.layout.order, FrameOrder::ColumnMajor);
    assert_eq!(cfg.output.image.format, FrameFormat::Jpeg);
    assert_eq!(cfg.output.image.quality, 80);
    cfg.validate().unwrap();
}

#[test]
fn resolve_paths_rebases_relative_only() {
    let mut cfg = parse(MINIMAL);
    cfg.output.frames_dir = PathBuf::from("/abs/frames");
    cfg.resolve_paths(Path::new("/work/project"));

    assert_eq!(
        cfg.input.sprite_path,
        PathBuf::from("/work/project/ringbell.png")
    );
    assert_eq!(
        cfg.output.json_path,
        PathBuf::from("/work/project/out/ringbell.json")
    );
    assert_eq!(cfg.output.frames_dir, PathBuf::from("/abs/frames"));
}

#[test]
fn validate_rejects_zero_frames() {
    let mut cfg = parse(MINIMAL);
    cfg.input.num_frames = 0;
    assert!(matches!(cfg.validate(), Err(ConvertError::InvalidLayout(_))));
}

#[test]
fn validate_rejects_bad_frame_rate() {
    let mut cfg = parse(MINIMAL);
    cfg.input.frame_rate = 0.0;
    assert!(cfg.validate().is_err());
    cfg.input.frame_rate = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_empty_grid_without_custom_frames() {
    let mut cfg = parse(MINIMAL);
    cfg.input.layout.grid.cols = 0;
    assert!(matches!(cfg.validate(), Err(ConvertError::InvalidLayout(_))));

    cfg.input.layout.custom_frames = vec![Rect::new(0, 0, 8, 8); 16];
    cfg.validate().unwrap();
}

#[test]
fn validate_rejects_out_of_range_image_options() {
    let mut cfg = parse(MINIMAL);
    cfg.output.image.quality = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = parse(MINIMAL);
    cfg.output.image.quality = 101;
    assert!(cfg.validate().is_err());

    let mut cfg = parse(MINIMAL);
    cfg.output.image.background.alpha = 1.5;
    assert!(cfg.validate().is_err());
}

#[test]
fn validate_rejects_zero_threads() {
    let mut cfg = parse(MINIMAL);
    cfg.threads = Some(0);
    assert!(cfg.validate().is_err());
    cfg.threads = Some(2);
    cfg.validate().unwrap();
}

#[test]
fn from_path_reports_missing_file_as_io() {
    let err = ConvertConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, ConvertError::Io { .. }));
}

#[test]
fn from_path_resolves_against_config_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, MINIMAL).unwrap();

    let cfg = ConvertConfig::from_path(&path).unwrap();
    assert_eq!(cfg.input.sprite_path, dir.path().join("ringbell.png"));
    assert_eq!(cfg.output.frames_dir, dir.path().join("ringbellframes"));
}

#[test]
fn from_path_rejects_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        ConvertConfig::from_path(&path),
        Err(ConvertError::Config(_))
    ));
}

#[test]
fn default_config_is_valid_and_roundtrips() {
    let cfg = ConvertConfig::default();
    cfg.validate().unwrap();
    let s = cfg.to_json_pretty().unwrap();
    let de: ConvertConfig = serde_json::from_str(&s).unwrap();
    assert_eq!(de, cfg);
}
