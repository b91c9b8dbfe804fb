//! End-to-end single-value calculations against the in-memory conversion service.

use std::sync::Arc;

use conversion_client::fakes::{LinearConversionService, LinearCurve};
use conversion_client::ConversionService;
use rankpoints_core::{
    CalculationMode, CalculationOutcome, CalculationRequest, Calculator, Gender, ScoringError,
    Season, WindReading,
};

/// Default fake curve: performance = points / 100, so "10.00" is worth 1000 points.
fn calculator() -> (Arc<LinearConversionService>, Calculator) {
    let service = Arc::new(LinearConversionService::new());
    let dyn_service: Arc<dyn ConversionService> = service.clone();
    (service, Calculator::new(dyn_service))
}

fn points_of(outcome: CalculationOutcome) -> i32 {
    match outcome {
        CalculationOutcome::Points(p) => p.points(),
        other => panic!("expected points outcome, got {other:?}"),
    }
}

fn sprint(season: Season, wind: WindReading) -> CalculationRequest {
    CalculationRequest::new(
        "200m",
        Gender::Mens,
        season,
        CalculationMode::PerformanceToPoints,
        "10.00",
    )
    .unwrap()
    .with_wind(wind)
}

#[tokio::test]
async fn test_headwind_adds_points() {
    let (_, calc) = calculator();
    let outcome = calc
        .calculate(&sprint(Season::Outdoor, WindReading::Measured(-1.0)))
        .await
        .unwrap();
    assert_eq!(points_of(outcome), 1006);
}

#[tokio::test]
async fn test_strong_tailwind_costs_points() {
    let (_, calc) = calculator();
    let outcome = calc
        .calculate(&sprint(Season::Outdoor, WindReading::Measured(3.0)))
        .await
        .unwrap();
    assert_eq!(points_of(outcome), 994);
}

#[tokio::test]
async fn test_wind_ignored_indoors() {
    let (_, calc) = calculator();
    let outcome = calc
        .calculate(&sprint(Season::Indoor, WindReading::Measured(-1.0)))
        .await
        .unwrap();
    assert_eq!(points_of(outcome), 1000);
}

#[tokio::test]
async fn test_adjustment_keeps_base_points() {
    let (_, calc) = calculator();
    let outcome = calc
        .calculate(&sprint(Season::Outdoor, WindReading::NoInformation))
        .await
        .unwrap();
    let CalculationOutcome::Points(points) = outcome else {
        panic!("expected points outcome");
    };
    assert_eq!(points.adjustment.base_points, 1000);
    assert_eq!(points.points(), 970);
    assert_eq!(points.adjustment.summary().as_deref(), Some("-30 points"));
}

#[tokio::test]
async fn test_points_to_performance_renders_clock_time() {
    let service = Arc::new(
        LinearConversionService::new().with_curve("1500m", LinearCurve::new(300.0, -0.07433)),
    );
    let calc = Calculator::new(service.clone());
    let request = CalculationRequest::new(
        "1500m",
        Gender::Womens,
        Season::Outdoor,
        CalculationMode::PointsToPerformance,
        "1000",
    )
    .unwrap();

    let CalculationOutcome::Performance(outcome) = calc.calculate(&request).await.unwrap() else {
        panic!("expected performance outcome");
    };
    assert_eq!(outcome.points, 1000);
    assert!((outcome.performance - 225.67).abs() < 1e-9);
    assert_eq!(outcome.display, "3:45.67");
    assert_eq!(service.performance_requests(), vec![("1500m".to_string(), 1000)]);
}

#[tokio::test]
async fn test_field_events_send_short_codes() {
    let (service, calc) = calculator();
    let request = CalculationRequest::new(
        "Long Jump",
        Gender::Mens,
        Season::Outdoor,
        CalculationMode::PointsToPerformance,
        "820",
    )
    .unwrap();
    calc.calculate(&request).await.unwrap();
    assert_eq!(service.performance_requests(), vec![("LJ".to_string(), 820)]);
}

#[tokio::test]
async fn test_invalid_format_never_reaches_service() {
    let (service, calc) = calculator();
    let request = CalculationRequest::new(
        "800m",
        Gender::Mens,
        Season::Outdoor,
        CalculationMode::PerformanceToPoints,
        "1.45.3",
    )
    .unwrap();

    let err = calc.calculate(&request).await.unwrap_err();
    assert!(matches!(err, ScoringError::InvalidFormat { .. }));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_points_out_of_range_never_reaches_service() {
    let (service, calc) = calculator();
    let request = CalculationRequest::new(
        "100m",
        Gender::Mens,
        Season::Outdoor,
        CalculationMode::PointsToPerformance,
        "1500",
    )
    .unwrap();

    assert!(matches!(
        calc.calculate(&request).await,
        Err(ScoringError::InvalidFormat { .. })
    ));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_service_failure_fails_whole_calculation() {
    let (service, calc) = calculator();
    service.fail_event("100m");
    let request = CalculationRequest::new(
        "100m",
        Gender::Womens,
        Season::Outdoor,
        CalculationMode::PerformanceToPoints,
        "10.80",
    )
    .unwrap();

    let err = calc.calculate(&request).await.unwrap_err();
    assert!(err.is_service_failure());
    assert!(matches!(err, ScoringError::ServiceError(_)));
}

#[test]
fn test_request_rejects_unknown_or_uncontested_events() {
    let mode = CalculationMode::PerformanceToPoints;
    assert!(matches!(
        CalculationRequest::new("Marathon", Gender::Mens, Season::Outdoor, mode, "1"),
        Err(ScoringError::UnknownEvent(_))
    ));
    assert!(matches!(
        CalculationRequest::new("Decathlon", Gender::Womens, Season::Outdoor, mode, "7000"),
        Err(ScoringError::EventNotAvailable { .. })
    ));
    assert!(matches!(
        CalculationRequest::new("60m", Gender::Mens, Season::Outdoor, mode, "6.50"),
        Err(ScoringError::EventNotAvailable { .. })
    ));
}
