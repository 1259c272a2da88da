//! End-to-end properties of the interlock engine.

use std::sync::Arc;

use cpi_engine::{
    evaluate, CommandAction, EvaluationResult, InterlockEngine, OperatorCommand, SafetyConfig,
    SensorReading, TripReason,
};

fn reading(temperature_c: f64, pressure_bar: f64) -> SensorReading {
    SensorReading {
        temperature_c,
        pressure_bar,
    }
}

#[test]
fn reference_scenarios() {
    let engine = InterlockEngine::default();
    let shutdown = OperatorCommand::signed("operatorA", CommandAction::Shutdown);
    let rejected = OperatorCommand {
        user_id: "intruder".to_string(),
        action: CommandAction::Shutdown,
        integrity_code: "00".to_string(),
    };

    let cases: [(SensorReading, Option<&OperatorCommand>, EvaluationResult); 6] = [
        (reading(250.0, 90.0), None, EvaluationResult::normal()),
        (
            reading(250.0, 60.0),
            None,
            EvaluationResult::trip(TripReason::LowPressure),
        ),
        (
            reading(340.0, 90.0),
            None,
            EvaluationResult::trip(TripReason::HighTempClamp),
        ),
        (
            reading(265.0, 70.0),
            None,
            EvaluationResult::trip(TripReason::LowSubcooling),
        ),
        (
            reading(250.0, 90.0),
            Some(&shutdown),
            EvaluationResult::trip(TripReason::OperatorShutdown),
        ),
        (reading(250.0, 90.0), Some(&rejected), EvaluationResult::normal()),
    ];

    for (sample, command, expected) in cases {
        assert_eq!(engine.evaluate(sample, command), expected, "for {sample:?}");
    }
}

#[test]
fn low_pressure_dominates_unless_shutdown_is_authenticated() {
    let config = SafetyConfig::default();
    let shutdown = OperatorCommand::signed("operatorA", CommandAction::Shutdown);
    for temp in [-100.0, 0.0, 250.0, 340.0, 1000.0] {
        for pressure in [0.0, 30.0, 69.9] {
            let without = evaluate(temp, pressure, None, &config);
            assert_eq!(without.reason(), TripReason::LowPressure);
            let with = evaluate(temp, pressure, Some(&shutdown), &config);
            assert_eq!(with.reason(), TripReason::OperatorShutdown);
        }
    }
}

#[test]
fn invalid_command_is_indistinguishable_from_no_command() {
    let config = SafetyConfig::default();
    let bad_code = OperatorCommand {
        user_id: "operatorA".to_string(),
        action: CommandAction::Shutdown,
        integrity_code: "FF".to_string(),
    };
    let bad_user = OperatorCommand::signed("intruder", CommandAction::Shutdown);

    for temp in [-10.0, 100.0, 250.0, 262.0, 340.0, f64::NAN] {
        for pressure in [0.0, 60.0, 70.0, 90.0, 120.0, f64::NAN] {
            let baseline = evaluate(temp, pressure, None, &config);
            assert_eq!(evaluate(temp, pressure, Some(&bad_code), &config), baseline);
            assert_eq!(evaluate(temp, pressure, Some(&bad_user), &config), baseline);
        }
    }
}

#[test]
fn shared_config_evaluates_consistently_across_threads() {
    let engine = Arc::new(InterlockEngine::new(SafetyConfig::new(
        25.0,
        70.0,
        335.0,
        ["operatorA".to_string()],
    )));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || {
            let mut results = Vec::new();
            for _ in 0..100 {
                results.push(engine.evaluate(reading(250.0, 90.0), None));
                results.push(engine.evaluate(reading(250.0, 60.0), None));
            }
            results
        }));
    }

    for handle in handles {
        let results = handle.join().expect("worker thread panicked");
        for pair in results.chunks(2) {
            assert_eq!(pair[0], EvaluationResult::normal());
            assert_eq!(pair[1], EvaluationResult::trip(TripReason::LowPressure));
        }
    }
}

#[test]
fn custom_thresholds_are_honored() {
    let config = SafetyConfig::new(10.0, 50.0, 400.0, []);
    // 60 bar is fine under the lowered minimum.
    assert_eq!(
        evaluate(250.0, 60.0, None, &config),
        EvaluationResult::normal()
    );
    // Tsat(60) = 274; margin 10 trips at 264 and above.
    assert_eq!(
        evaluate(264.0, 60.0, None, &config).reason(),
        TripReason::LowSubcooling
    );
    // With an empty authorized set, even a well-signed command is inert.
    let cmd = OperatorCommand::signed("operatorA", CommandAction::Shutdown);
    assert_eq!(
        evaluate(250.0, 60.0, Some(&cmd), &config),
        EvaluationResult::normal()
    );
}
