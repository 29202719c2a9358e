//! End-to-end properties of the encoding policy: identical schemas map to
//! identical descriptors, builds are idempotent and order-independent, and
//! unknown shapes abort the build instead of guessing.

use std::io::Write;

use chunk_policy::{
    all_variables, build_encoding_map, AxisSizing, BloscAlgorithm, CompressionEngine, DataType,
    Dataset, EncodingConfig, EncodingError, RuleTable, ShapeRule, ShuffleMode, Variable,
};

fn campaign_rules() -> RuleTable {
    RuleTable::new(vec![
        ShapeRule::exact("time_series", [("time", AxisSizing::Elements(65_536))]),
        ShapeRule::exact(
            "time_height",
            [
                ("time", AxisSizing::Elements(4096)),
                ("height", AxisSizing::Elements(64)),
            ],
        ),
        ShapeRule::any_single("single_axis", AxisSizing::FullExtent),
    ])
}

fn engine() -> CompressionEngine {
    CompressionEngine::new(EncodingConfig::default().codec_spec())
}

#[test]
fn variables_with_equal_schema_get_equal_descriptors() {
    // Two variables that differ in everything except (dims, sizes, dtype).
    let ds = Dataset::from_variables([
        Variable::data("air_temperature", [("time", 200_000)], DataType::Float32),
        Variable::data("relative_humidity", [("time", 200_000)], DataType::Float32),
    ]);

    let map = build_encoding_map(&ds, &campaign_rules(), &engine(), all_variables)
        .expect("build");

    assert_eq!(
        map.get("air_temperature").expect("ta"),
        map.get("relative_humidity").expect("rh"),
    );
}

#[test]
fn building_twice_is_byte_identical() {
    let ds = Dataset::from_variables([
        Variable::data("ta", [("time", 200_000)], DataType::Float32),
        Variable::data("lwp", [("time", 200_000), ("height", 100)], DataType::Float64),
        Variable::data("station", [("time", 200_000)], DataType::String),
    ]);
    let rules = campaign_rules();
    let engine = engine();

    let first = build_encoding_map(&ds, &rules, &engine, all_variables).expect("first");
    let second = build_encoding_map(&ds, &rules, &engine, all_variables).expect("second");

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).expect("serialize"),
        serde_json::to_string(&second).expect("serialize"),
    );
}

#[test]
fn insertion_order_does_not_change_descriptors() {
    let vars = [
        Variable::data("ta", [("time", 200_000)], DataType::Float32),
        Variable::data("lwp", [("time", 200_000), ("height", 100)], DataType::Float64),
        Variable::data("height", [("height", 100)], DataType::Float32),
    ];

    let forward = Dataset::from_variables(vars.clone());
    let reversed = Dataset::from_variables(vars.into_iter().rev());

    let rules = campaign_rules();
    let engine = engine();
    let a = build_encoding_map(&forward, &rules, &engine, all_variables).expect("forward");
    let b = build_encoding_map(&reversed, &rules, &engine, all_variables).expect("reversed");

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).expect("serialize"),
        serde_json::to_string(&b).expect("serialize"),
    );
}

#[test]
fn literal_target_clamps_to_small_extent() {
    let ds = Dataset::from_variables([Variable::data(
        "bins",
        [("bin", 3)],
        DataType::Float32,
    )]);
    let rules = RuleTable::new(vec![ShapeRule::exact(
        "bins",
        [("bin", AxisSizing::Elements(64))],
    )]);

    let map = build_encoding_map(&ds, &rules, &engine(), all_variables).expect("build");
    assert_eq!(map.get("bins").expect("bins").chunks.as_slice(), &[3]);
}

#[test]
fn unknown_shape_aborts_without_a_map() {
    let ds = Dataset::from_variables([
        Variable::data("fine", [("time", 1000)], DataType::Float32),
        Variable::data("odd", [("foo", 2), ("bar", 5)], DataType::Float32),
    ]);

    let err = build_encoding_map(&ds, &campaign_rules(), &engine(), all_variables)
        .expect_err("no rule for (foo, bar)");

    match err {
        EncodingError::UnclassifiedShape { variable, dims } => {
            assert_eq!(variable, "odd");
            assert_eq!(dims, vec!["foo".to_string(), "bar".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn literal_scenario_time_series() {
    let ds = Dataset::from_variables([Variable::data(
        "ta",
        [("time", 200_000)],
        DataType::Float32,
    )]);

    let map = build_encoding_map(&ds, &campaign_rules(), &engine(), all_variables)
        .expect("build");
    assert_eq!(map.get("ta").expect("ta").chunks.as_slice(), &[65_536]);
}

#[test]
fn literal_scenario_time_height() {
    let ds = Dataset::from_variables([Variable::data(
        "lwc",
        [("time", 200_000), ("height", 100)],
        DataType::Float64,
    )]);

    let map = build_encoding_map(&ds, &campaign_rules(), &engine(), all_variables)
        .expect("build");
    assert_eq!(map.get("lwc").expect("lwc").chunks.as_slice(), &[4096, 64]);
}

#[test]
fn literal_scenario_scalar() {
    let ds = Dataset::from_variables([Variable::data(
        "campaign_id",
        [] as [(&str, u64); 0],
        DataType::Int32,
    )]);

    let map = build_encoding_map(&ds, &campaign_rules(), &engine(), all_variables)
        .expect("build");
    let desc = map.get("campaign_id").expect("scalar");
    assert!(desc.chunks.is_empty());
    assert!(desc.compressor.is_some());
}

#[test]
fn literal_scenario_text_falls_back_to_uncompressed() {
    let ds = Dataset::from_variables([Variable::data(
        "instrument_serial",
        [("time", 200_000)],
        DataType::String,
    )]);

    let map = build_encoding_map(&ds, &campaign_rules(), &engine(), all_variables)
        .expect("build");
    let desc = map.get("instrument_serial").expect("text");
    assert_eq!(desc.compressor, None);
    // The chunk shape is still resolved normally.
    assert_eq!(desc.chunks.as_slice(), &[65_536]);
}

#[test]
fn rule_table_loads_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(
        br#"
rules:
  - name: soundings
    match: { exact: [sounding, pressure] }
    chunks: { sounding: -1, pressure: 2240 }
  - name: single_axis
    match: any_single
    rest: full
"#,
    )
    .expect("write");

    let rules = RuleTable::from_yaml_file(file.path()).expect("load");
    let ds = Dataset::from_variables([Variable::data(
        "temperature",
        [("sounding", 120), ("pressure", 4500)],
        DataType::Float32,
    )]);

    let map = build_encoding_map(&ds, &rules, &engine(), all_variables).expect("build");
    assert_eq!(
        map.get("temperature").expect("t").chunks.as_slice(),
        &[120, 2240]
    );
}

#[test]
fn engine_from_env_style_config_keeps_invariants() {
    let config = EncodingConfig {
        algorithm: BloscAlgorithm::Lz4,
        level: 5,
        shuffle: ShuffleMode::None,
    };
    config.validate().expect("valid");

    let engine = CompressionEngine::new(config.codec_spec());
    assert_eq!(engine.threads(), 1);
    assert_eq!(engine.codec().algorithm, BloscAlgorithm::Lz4);
}
