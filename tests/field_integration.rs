//! Field-level runs: input files, parallel checks, adjustment and contact what-ifs.

mod common;

use std::io::Write;

use pvt_equil::{
    EquilConfig, EquilError, EquilibriumRegion, ExtrapolationPolicy, Field, FieldInput, Phase,
    RegionStatus, Severity,
};

fn field_with(regions: Vec<EquilibriumRegion>) -> Field {
    let input = FieldInput {
        pvt: vec![common::pvt_tables(1)],
        equil: regions,
    };
    Field::from_input(input, &EquilConfig::default()).unwrap()
}

fn out_of_domain_region(eqlnum: u32) -> EquilibriumRegion {
    EquilibriumRegion {
        ref_pressure: 700.0,
        ..common::scenario_region(eqlnum)
    }
}

#[test]
fn test_check_reports_every_active_region_in_order() {
    let mut inactive = common::scenario_region(3);
    inactive.active = false;
    let field = field_with(vec![
        common::scenario_region(1),
        common::oversaturated_region(2),
        inactive,
    ]);

    let report = field.check(&EquilConfig::default());
    let eqlnums: Vec<u32> = report.regions.iter().map(|r| r.eqlnum).collect();
    assert_eq!(eqlnums, vec![1, 2]);
    assert_eq!(report.inactive_regions, vec![3]);

    assert!(report.region(1).unwrap().is_valid());
    let second = report.region(2).unwrap();
    assert_eq!(second.status, RegionStatus::Checked);
    assert!(second.with_severity(Severity::Error).count() > 0);
    assert_eq!(report.totals().fatals, 0);
    assert!(report.is_valid());
}

#[test]
fn test_failed_region_does_not_hide_others() {
    let field = field_with(vec![out_of_domain_region(1), common::scenario_region(2)]);
    let report = field.check(&EquilConfig::default());

    assert_eq!(report.regions.len(), 2);
    let failed: Vec<u32> = report.failed_regions().map(|r| r.eqlnum).collect();
    assert_eq!(failed, vec![1]);
    match &report.region(1).unwrap().status {
        RegionStatus::Failed { error } => assert!(error.contains("outside PVT table interval")),
        RegionStatus::Checked => panic!("region 1 should have failed"),
    }
    assert!(report.region(2).unwrap().is_valid());
    assert!(!report.is_valid());
}

#[test]
fn test_clamp_policy_recovers_out_of_domain_region() {
    let input = FieldInput {
        pvt: vec![common::pvt_tables(1)],
        equil: vec![out_of_domain_region(1)],
    };
    let mut config = EquilConfig::default();
    config.interpolation.extrapolation = ExtrapolationPolicy::Clamp;
    let field = Field::from_input(input, &config).unwrap();
    let report = field.check(&config);
    assert_eq!(report.failed_regions().count(), 0);
    assert!(field.engine(1).unwrap().has_reported_out_of_range());
}

#[test]
fn test_profiles_match_direct_computation() {
    let field = field_with(vec![common::scenario_region(1), common::scenario_region(2)]);
    let profiles = field.profiles(20);
    assert_eq!(profiles.len(), 2);
    let direct = field.profile(1, 20).unwrap();
    let (eqlnum, first) = &profiles[0];
    assert_eq!(*eqlnum, 1);
    assert_eq!(first.as_ref().unwrap(), &direct);
}

#[test]
fn test_invalid_fields_rejected() {
    let policy = ExtrapolationPolicy::Reject;

    let duplicate_pvt = FieldInput {
        pvt: vec![common::pvt_tables(1), common::pvt_tables(1)],
        equil: vec![common::scenario_region(1)],
    };
    assert!(matches!(
        Field::new(duplicate_pvt, policy),
        Err(EquilError::Configuration(_))
    ));

    let duplicate_eql = FieldInput {
        pvt: vec![common::pvt_tables(1)],
        equil: vec![common::scenario_region(1), common::scenario_region(1)],
    };
    assert!(matches!(
        Field::new(duplicate_eql, policy),
        Err(EquilError::Configuration(_))
    ));

    let mut orphan = common::scenario_region(1);
    orphan.pvtnum = 9;
    let missing_tables = FieldInput {
        pvt: vec![common::pvt_tables(1)],
        equil: vec![orphan.clone()],
    };
    let err = Field::new(missing_tables, policy).unwrap_err();
    assert!(err.to_string().contains("PVTNUM 9"));

    // Inactive regions are not validated against the tables.
    orphan.active = false;
    let carried = FieldInput {
        pvt: vec![common::pvt_tables(1)],
        equil: vec![orphan],
    };
    assert!(Field::new(carried, policy).is_ok());
}

#[test]
fn test_with_owc_builds_new_field() {
    let field = field_with(vec![common::scenario_region(1)]);
    let moved = field.with_owc(1, 4300.0).unwrap();

    assert_eq!(field.region(1).unwrap().owc, 4400.0);
    assert_eq!(moved.region(1).unwrap().owc, 4300.0);

    let profile = moved.profile(1, 20).unwrap();
    let at_contact = profile.nodes().iter().find(|n| n.depth == 4300.0).unwrap();
    assert_eq!(at_contact.phase, Phase::Water);

    assert!(field.with_owc(7, 4300.0).is_err());
    // GOC below OWC fails validation.
    assert!(matches!(
        field.with_goc(1, 4450.0),
        Err(EquilError::Configuration(_))
    ));
}

#[test]
fn test_adjust_fixes_oversaturated_region() {
    let mut inactive = common::scenario_region(3);
    inactive.active = false;
    let field = field_with(vec![
        common::scenario_region(1),
        common::oversaturated_region(2),
        inactive.clone(),
    ]);
    let adjustment = field.adjust(&EquilConfig::default()).unwrap();

    assert!(adjustment.before.region(2).unwrap().counts().errors > 0);
    assert_eq!(adjustment.after.region(2).unwrap().counts().errors, 0);
    assert_eq!(adjustment.after.region(1).unwrap().counts().errors, 0);

    // Inactive regions are copied through untouched.
    assert_eq!(adjustment.field.region(3), Some(&inactive));
    assert_ne!(
        adjustment.field.region(2).unwrap().trends,
        common::oversaturated_region(2).trends
    );
}

#[test]
fn test_input_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = common::field_input();

    let toml_path = dir.path().join("field.toml");
    input.save(&toml_path).unwrap();
    assert_eq!(FieldInput::load(&toml_path).unwrap(), input);

    let json_path = dir.path().join("field.json");
    input.save(&json_path).unwrap();
    assert_eq!(FieldInput::load(&json_path).unwrap(), input);
}

#[test]
fn test_adjusted_output_loads_and_checks() {
    let dir = tempfile::tempdir().unwrap();
    let field = field_with(vec![common::oversaturated_region(1)]);
    let config = EquilConfig::default();
    let adjustment = field.adjust(&config).unwrap();

    let path = dir.path().join("adjusted.toml");
    adjustment.field.to_input().save(&path).unwrap();

    let reloaded = Field::from_input(FieldInput::load(&path).unwrap(), &config).unwrap();
    let report = reloaded.check(&config);
    assert_eq!(report.totals().errors, 0);
    assert_eq!(report.totals().fatals, 0);
}

#[test]
fn test_malformed_input_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[[equil]]\neqlnum = \"one\"").unwrap();
    let err = FieldInput::load(file.path()).unwrap_err();
    assert!(matches!(EquilError::from(err), EquilError::Configuration(_)));
}

#[test]
fn test_report_rendering() {
    let field = field_with(vec![common::oversaturated_region(1), out_of_domain_region(2)]);
    let report = field.check(&EquilConfig::default());

    let text = report.to_string();
    assert!(text.contains("EQUIL nr: 1"));
    assert!(text.contains("ERRORS:"));
    assert!(text.contains("FAILED:"));

    let json: serde_json::Value = serde_json::to_value(&report).unwrap();
    assert_eq!(json["regions"][0]["status"], "checked");
    assert_eq!(json["regions"][1]["status"], "failed");
    assert!(json["generated_at"].is_string());
}
