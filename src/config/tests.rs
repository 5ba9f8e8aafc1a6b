use super::*;

#[test]
fn test_default_configs() {
    let configs = TileMapViewConfigs::default();

    assert_eq!(configs.cleared_land_picture, PictureRef::new("land1a", 1));
    assert_eq!(configs.info_box_top_margin, 10);
    assert!(configs.preview_enabled);
    assert_eq!(configs.render_flags, TileMapRenderFlags::all());
    assert_eq!(configs.log, log::LogSettings::default());
}

#[test]
fn test_missing_fields_get_defaults() {
    // Empty object:
    {
        let configs: TileMapViewConfigs = TileMapViewConfigs::from_json_str("{}").unwrap();
        assert_eq!(configs, TileMapViewConfigs::default());
    }

    // Partial object:
    {
        let json = r#"{ "info_box_top_margin": 25, "preview_enabled": false }"#;
        let configs: TileMapViewConfigs = TileMapViewConfigs::from_json_str(json).unwrap();

        assert_eq!(configs.info_box_top_margin, 25);
        assert!(!configs.preview_enabled);
        assert_eq!(configs.cleared_land_picture, PictureRef::new("land1a", 1));
        assert_eq!(configs.render_flags, TileMapRenderFlags::all());
    }
}

#[test]
fn test_render_flags_from_json() {
    let json = r#"{ "render_flags": "DrawTerrain | DrawWalkers" }"#;
    let configs: TileMapViewConfigs = TileMapViewConfigs::from_json_str(json).unwrap();

    assert_eq!(configs.render_flags, TileMapRenderFlags::DrawTerrain | TileMapRenderFlags::DrawWalkers);
}

#[test]
fn test_malformed_json_is_an_error() {
    let result: Result<TileMapViewConfigs, String> = TileMapViewConfigs::from_json_str("{ info_box_top_margin: ");
    assert!(result.is_err());

    let result: Result<TileMapViewConfigs, String> = TileMapViewConfigs::from_json_str(r#"{ "info_box_top_margin": "ten" }"#);
    assert!(result.is_err());
}

#[test]
fn test_load_failure_falls_back_to_defaults() {
    let path = std::env::temp_dir().join("citysim_tilemap_no_such_configs.json");
    let _ = std::fs::remove_file(&path);

    let configs: TileMapViewConfigs = TileMapViewConfigs::load_from_path(&path);
    assert_eq!(configs, TileMapViewConfigs::default());
}

#[test]
fn test_save_and_load_file() {
    let path = std::env::temp_dir().join(format!("citysim_tilemap_configs_{}.json", std::process::id()));

    let configs = TileMapViewConfigs {
        cleared_land_picture: PictureRef::new("land2a", 7),
        info_box_top_margin: 42,
        ..Default::default()
    };

    assert!(configs.save_to_path(&path));

    let loaded: TileMapViewConfigs = TileMapViewConfigs::load_from_path(&path);
    assert_eq!(loaded, configs);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_log_settings_from_json() {
    let json = r#"{ "log": { "level": "Warn", "source_location": true } }"#;
    let configs: TileMapViewConfigs = TileMapViewConfigs::from_json_str(json).unwrap();

    assert_eq!(configs.log.level, log::Level::Warn);
    assert!(configs.log.source_location);
    assert!(configs.log.tty_colors);

    let result: Result<TileMapViewConfigs, String> = TileMapViewConfigs::from_json_str(r#"{ "log": { "level": "Loud" } }"#);
    assert!(result.is_err());
}
