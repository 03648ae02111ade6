//! End-to-end tests: raw form input through validation to generated traces.

use rfprofile_core::prelude::*;
use rfprofile_core::{Field, FieldError, SignalParameters as Params};

fn mexico_form() -> SignalForm {
    SignalForm::new(Profile::Mexico)
        .frequency(98.5, FrequencyUnit::MHz)
        .frequency_deviation(75.0, FrequencyUnit::KHz)
        .audio_frequency(15.0, FrequencyUnit::KHz)
        .power(2.0, PowerUnit::Watt)
}

fn singapore_form(n: u32) -> SignalForm {
    SignalForm::new(Profile::Singapore)
        .frequency(3.5, FrequencyUnit::GHz)
        .subcarrier_spacing(30.0, FrequencyUnit::KHz)
        .subcarrier_count(n)
        .power(10.0, PowerUnit::Watt)
}

#[test]
fn test_mexico_pipeline() {
    let params = validate(&mexico_form()).expect("form should validate");
    assert_eq!(params.profile(), Profile::Mexico);

    let set = generate(&params, &GeneratorConfig::default(), &GenerateOptions::default());
    assert_eq!(set.profile, Profile::Mexico);
    assert_eq!(set.transmitted.len(), 1000);
    assert_eq!(set.transmitted.samples[0].amplitude, 2.0f64.sqrt());

    let rx = set.received.as_ref().expect("received trace requested");
    assert_eq!(rx.len(), 1000);
    // Path loss leaves the end of the window visibly weaker than the start
    let head: f64 = rx.samples[..100].iter().map(|s| s.amplitude.abs()).fold(0.0, f64::max);
    let tail: f64 = rx.samples[900..].iter().map(|s| s.amplitude.abs()).fold(0.0, f64::max);
    assert!(tail < head);
}

#[test]
fn test_singapore_pipeline() {
    let params = validate(&singapore_form(4)).expect("form should validate");
    match params {
        Params::Ofdm(p) => {
            assert_eq!(p.subcarrier_spacing(), 30e3);
            assert_eq!(p.subcarrier_count(), 4);
        }
        other => panic!("expected OFDM parameters, got {:?}", other),
    }

    let mut config = GeneratorConfig::default();
    config.ofdm.sampling = config.ofdm.sampling.with_window(5e-8);
    let set = generate(&params, &config, &GenerateOptions::default());
    assert_eq!(set.transmitted.len(), 1000);
    assert!(set.transmitted.samples[0].amplitude.abs() < 1e-12);
}

#[test]
fn test_invalid_form_produces_no_parameters() {
    let form = mexico_form().frequency(87.9, FrequencyUnit::MHz);
    let errors = validate(&form).unwrap_err();
    assert!(matches!(
        errors.get(Field::Frequency),
        Some(FieldError::OutOfRange { .. })
    ));
    assert!(!errors.is_empty());
}

#[test]
fn test_subcarrier_limit() {
    let form = singapore_form(4096).subcarrier_spacing(120.0, FrequencyUnit::KHz);
    assert!(validate(&form).is_ok());

    let errors = validate(&singapore_form(4097)).unwrap_err();
    assert_eq!(
        errors.iter().map(|(f, _)| f).collect::<Vec<_>>(),
        vec![Field::SubcarrierCount]
    );
}

#[test]
fn test_switching_profile_ignores_other_fields() {
    // A form filled for Mexico then switched to Singapore only reports the
    // Singapore fields
    let mut form = mexico_form();
    form.profile = Some(Profile::Singapore);
    let errors = validate(&form).unwrap_err();
    let fields: Vec<Field> = errors.iter().map(|(f, _)| f).collect();
    assert_eq!(
        fields,
        vec![Field::Frequency, Field::SubcarrierSpacing, Field::SubcarrierCount]
    );
}

#[test]
fn test_regeneration_is_bitwise_identical() {
    let params = validate(&mexico_form()).unwrap();
    let config = GeneratorConfig::default();
    let first = generate(&params, &config, &GenerateOptions::default());
    let second = generate(&params, &config, &GenerateOptions::default());
    assert_eq!(first, second);
}

#[test]
fn test_json_output_names_traces() {
    let params = validate(&mexico_form()).unwrap();
    let set = generate(&params, &GeneratorConfig::default(), &GenerateOptions::default());
    let json = serde_json::to_value(&set).unwrap();
    assert_eq!(json["profile"], "mx");
    assert_eq!(json["transmitted"]["kind"], "transmitted");
    assert_eq!(json["received"]["kind"], "received");
    assert_eq!(json["transmitted"]["samples"].as_array().map(|a| a.len()), Some(1000));

    let tx_only = generate(
        &params,
        &GeneratorConfig::default(),
        &GenerateOptions::transmitted_only(),
    );
    let json = serde_json::to_value(&tx_only).unwrap();
    assert!(json.get("received").is_none());
}

#[test]
fn test_config_override_from_json() {
    let config = GeneratorConfig::from_json(
        r#"{ "fm": { "sampling": { "sample_rate": 1e5, "window": 0.002 },
                     "channel": { "attenuation": 0.0, "fading_frequency": 0.0,
                                  "fading_floor": 1.0, "fading_depth": 0.0 } } }"#,
    )
    .unwrap();
    let params = validate(&mexico_form()).unwrap();
    let set = generate(&params, &config, &GenerateOptions::default());
    assert_eq!(set.transmitted.len(), 200);
    // Ideal channel: received equals transmitted
    assert_eq!(Some(&set.transmitted.samples), set.received.as_ref().map(|t| &t.samples));
}
