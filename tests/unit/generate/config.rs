use super::*;

#[test]
fn defaults_match_the_reference_player() {
    let cfg = GeneratorConfig::default();
    assert_eq!(cfg.height, 100);
    assert_eq!(cfg.signal_pool.len(), 25);
    assert_eq!(cfg.signal_pool[0], "signal-A");
    assert_eq!(cfg.signal_pool[24], "signal-Y");
    assert_eq!(cfg.clock_signal, "signal-heart");
    assert_eq!((cfg.module_distance, cfg.layer_size, cfg.layer_distance), (10, 500, 5));
    assert_eq!(cfg.frame_delay, 0);
    assert!(cfg.covers.show_before && cfg.covers.show_after);
    cfg.validate().unwrap();
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: GeneratorConfig =
        serde_json::from_str(r#"{"height": 8, "covers": {"show_after": false}}"#).unwrap();
    assert_eq!(cfg.height, 8);
    assert_eq!(cfg.layer_size, 500);
    assert!(cfg.covers.show_before);
    assert!(!cfg.covers.show_after);
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(serde_json::from_str::<GeneratorConfig>(r#"{"hieght": 8}"#).is_err());
}

#[test]
fn rejects_heights_that_do_not_pack() {
    for height in [0, 6, 102] {
        let cfg = GeneratorConfig {
            height,
            ..GeneratorConfig::default()
        };
        assert!(
            matches!(cfg.validate(), Err(LampreelError::Validation(_))),
            "height {height}"
        );
    }
}

#[test]
fn rejects_a_short_or_duplicated_pool() {
    let short = GeneratorConfig {
        height: 16,
        signal_pool: vec!["signal-A".into(), "signal-B".into()],
        ..GeneratorConfig::default()
    };
    assert!(short.validate().is_err());

    let dup = GeneratorConfig {
        height: 8,
        signal_pool: vec!["signal-A".into(), "signal-A".into()],
        ..GeneratorConfig::default()
    };
    assert!(dup.validate().is_err());
}

#[test]
fn layout_uses_only_the_needed_channels() {
    let cfg = GeneratorConfig {
        height: 8,
        ..GeneratorConfig::default()
    };
    let l = cfg.layout(GridSize::new(5, 8).unwrap()).unwrap();
    assert_eq!(l.channels, vec!["signal-A", "signal-B"]);
    assert_eq!(l.clock_signal, "signal-heart");
    assert!(cfg.layout(GridSize::new(5, 12).unwrap()).is_err());
}

#[test]
fn cover_indices_default_to_first_and_last() {
    assert_eq!(CoverConfig::default().resolve(42), (1, 42));
}

#[test]
fn out_of_range_cover_indices_are_clamped() {
    let covers = CoverConfig {
        before_frame: Some(0),
        after_frame: Some(99),
        ..CoverConfig::default()
    };
    assert_eq!(covers.resolve(10), (1, 10));

    let inside = CoverConfig {
        before_frame: Some(3),
        after_frame: Some(7),
        ..CoverConfig::default()
    };
    assert_eq!(inside.resolve(10), (3, 7));
}

#[test]
fn unreadable_picture_falls_back_to_the_frame() {
    let covers = CoverConfig {
        before_picture: Some(PathBuf::from("target/lampreel_missing_cover.png")),
        ..CoverConfig::default()
    };
    let plan = covers.plan(5);
    assert!(plan.before.enabled);
    assert_eq!(plan.before.frame_index, 1);
    assert!(plan.before.picture.is_none());
    assert_eq!(plan.after.frame_index, 5);
}

#[test]
fn readable_picture_is_attached() {
    let dir = PathBuf::from("target/lampreel_config_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cover.png");
    image::RgbImage::from_pixel(3, 2, image::Rgb([10, 20, 30]))
        .save(&path)
        .unwrap();

    let covers = CoverConfig {
        after_picture: Some(path),
        ..CoverConfig::default()
    };
    let plan = covers.plan(5);
    let picture = plan.after.picture.unwrap();
    assert_eq!((picture.width, picture.height), (3, 2));
    assert_eq!(picture.pixel(2, 1), [10, 20, 30]);
}

#[test]
fn disabled_cover_skips_its_picture() {
    let covers = CoverConfig {
        show_before: false,
        before_picture: Some(PathBuf::from("target/never_read.png")),
        ..CoverConfig::default()
    };
    let plan = covers.plan(3);
    assert!(!plan.before.enabled);
    assert!(plan.before.picture.is_none());
}

#[test]
fn config_file_round_trip() {
    let dir = PathBuf::from("target/lampreel_config_tests");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("player.json");
    std::fs::write(&path, r#"{"height": 12, "frame_delay": 30}"#).unwrap();
    let cfg = GeneratorConfig::from_path(&path).unwrap();
    assert_eq!(cfg.height, 12);
    assert_eq!(cfg.frame_delay, 30);

    std::fs::write(&path, "{not json").unwrap();
    assert!(matches!(
        GeneratorConfig::from_path(&path),
        Err(LampreelError::Serde(_))
    ));
}
