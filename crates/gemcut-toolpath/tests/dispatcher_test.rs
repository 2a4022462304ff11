use gemcut_core::{ConfigError, CutError, CutList, MachineInstruction, Precision};
use gemcut_toolpath::{generate_cutlist, generate_json, PrecisionProfile};
use serde_json::json;

fn configuration(desired_cut: serde_json::Value) -> String {
    json!({
        "block": {
            "thickness": 2.0, "width": 6.0, "length": 6.0,
            "origin_x": 0.0, "origin_y": 0.0, "physical_rotation": 0.0
        },
        "desired_cut": desired_cut,
        "laser_cut_config": {
            "jump_speed": 500, "mark_speed": 50, "kerf_angle": 4,
            "xy_spacing": 0.05, "z_spacing": 0.25, "z_final_overshoot": 0.25
        }
    })
    .to_string()
}

#[test]
fn test_unknown_process_is_rejected() {
    let err = generate_json(&configuration(json!({"cut_process": "unsupported"}))).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(matches!(
        err,
        CutError::Configuration(ConfigError::UnknownCutProcess(ref name)) if name == "unsupported"
    ));
    assert!(err.to_string().contains("No such cut exists"));
}

#[test]
fn test_missing_field_is_rejected() {
    let err = generate_json(&configuration(json!({
        "cut_process": "line", "x1": 0, "y1": 0, "x2": 1, "final_dimension_z": 1
    })))
    .unwrap_err();
    assert!(matches!(
        err,
        CutError::Configuration(ConfigError::MissingField { ref field, .. }) if field == "y2"
    ));
}

#[test]
fn test_every_process_dispatches() {
    let cuts = [
        json!({"cut_process": "line", "x1": 0, "y1": 0, "x2": 4, "y2": 0, "final_dimension_z": 0.5}),
        json!({"cut_process": "simple_core", "final_dimension_x": 2, "final_dimension_y": 2}),
        json!({"cut_process": "vertical_core", "final_dimension_x": 2, "final_dimension_y": 2}),
        json!({
            "cut_process": "oss_stacked", "final_dimension_x": 2, "final_dimension_y": 2,
            "pyramid_height": 0.5, "base_height": 0.4, "gap_size": 0.1, "core": "no",
            "excess": "bottom", "num_of_seeds": 0, "layers": "max"
        }),
        json!({"cut_process": "z_focus", "final_dimension_y": 2, "final_dimension_z": 1}),
        json!({"cut_process": "cross"}),
    ];

    for cut in cuts {
        let output = generate_json(&configuration(cut.clone())).unwrap();
        let cutlist = CutList::from_json(&output).unwrap();
        assert!(cutlist.is_bracketed(), "{cut}");
    }
}

#[test]
fn test_line_segment_precision() {
    let output = generate_json(&configuration(json!({
        "cut_process": "line", "x1": 0, "y1": 0, "x2": 3, "y2": 0, "final_dimension_z": 0.25
    })))
    .unwrap();
    let records: Vec<Vec<String>> = serde_json::from_str(&output).unwrap();
    assert_eq!(records[1], vec!["z_step", "-0.25"]);
    assert_eq!(records[2], vec!["jump", "0.000000", "0.000000"]);
    assert_eq!(records[3], vec!["mark", "3.000000", "0.000000"]);
}

#[test]
fn test_precision_profile_override() {
    let config = gemcut_core::CutConfiguration::from_json_str(&configuration(json!({
        "cut_process": "z_focus", "final_dimension_y": 1, "final_dimension_z": 0.5
    })))
    .unwrap();
    let cutlist = generate_cutlist(
        &config.desired_cut,
        config.block.as_ref(),
        &config.laser,
        &PrecisionProfile::uniform(Precision::Fixed(2)),
    )
    .unwrap();
    let jump = cutlist
        .iter()
        .find(|i| matches!(i, MachineInstruction::Jump(_)))
        .unwrap();
    assert_eq!(jump.to_record(), vec!["jump", "0.00", "0.50"]);
}
