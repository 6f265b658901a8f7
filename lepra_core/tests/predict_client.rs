//! End-to-end submission against a local stub of the prediction service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use lepra_core::controller::{FormController, SubmissionOutcome};
use lepra_core::form::FieldKind;
use lepra_core::{Notice, PredictionClient, ScreenError};

/// Serve `app` on an ephemeral port and return its base URL
async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Controller with every field answered, positioned on the last section
fn filled_controller() -> FormController {
    let mut controller = FormController::leprosy_screening();
    let fields: Vec<(String, FieldKind)> = controller
        .schema()
        .fields()
        .map(|f| (f.name.clone(), f.kind.clone()))
        .collect();

    for (name, kind) in fields {
        let value = match kind {
            FieldKind::Text => "Asha Devi".to_string(),
            FieldKind::Number => "34".to_string(),
            FieldKind::Date => "2026-03-14".to_string(),
            FieldKind::Select { options } => options
                .iter()
                .find(|o| o.as_str() == "Yes")
                .or_else(|| options.first())
                .cloned()
                .unwrap_or_default(),
        };
        controller.set_value(name, value);
    }

    while !controller.is_last_section() {
        controller.advance();
    }
    controller
}

fn good_body() -> Value {
    json!({
        "Output_Classification": "Multibacillary",
        "Output_Treatment": "MB-MDT for 12 months",
        "Output_ReactionType": "Type 1 Reaction",
        "Output_ReactionTreatment": "Prednisolone",
        "Eye_Disability_Grade": "Grade-0",
        "Hand_Disability_Grade": "Grade-II",
        "Foot_Disability_Grade": "Grade-I",
        "Max_Disability_Grade": "II"
    })
}

#[tokio::test]
async fn test_successful_prediction_renders_and_enables_export() {
    let app = Router::new().route(
        "/predict",
        post(|Json(payload): Json<Value>| async move {
            // Every value goes over the wire as a string
            let all_strings = payload
                .as_object()
                .map(|o| o.values().all(Value::is_string))
                .unwrap_or(false);
            if !all_strings || payload["name"] != "Asha Devi" {
                return StatusCode::BAD_REQUEST.into_response();
            }
            Json(good_body()).into_response()
        }),
    );
    let base = spawn_stub(app).await;
    let client = PredictionClient::new(&base).unwrap();

    let mut controller = filled_controller();
    assert!(!controller.export_available());

    let outcome = controller.submit(&client).await;
    let SubmissionOutcome::Rendered(rendered) = outcome else {
        panic!("expected a rendered result, got {:?}", outcome);
    };

    assert_eq!(rendered.lines.len(), 5);
    assert_eq!(rendered.lines[0].value, "Multibacillary");
    assert_eq!(rendered.lines[2].label, "Max (WHO) Disability Grade");
    assert_eq!(rendered.lines[2].value, "II");
    assert!(controller.export_available());
    assert_eq!(controller.render_generation(), 1);

    let report = controller.build_report(chrono::Local::now()).unwrap();
    assert_eq!(report.filename(), "Leprosy_Report_Asha Devi.pdf");
}

#[tokio::test]
async fn test_server_error_keeps_previous_result() {
    let app = Router::new().route(
        "/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model offline") }),
    );
    let base = spawn_stub(app).await;
    let client = PredictionClient::new(&base).unwrap();

    let mut controller = filled_controller();
    let before = controller.rendered_result();

    let outcome = controller.submit(&client).await;
    match outcome {
        SubmissionOutcome::Failed { notice, error } => {
            assert_eq!(notice, Notice::PredictionFailed);
            assert!(matches!(error, ScreenError::BadStatus { status: 500 }));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    assert_eq!(controller.rendered_result(), before);
    assert!(!controller.export_available());
    assert_eq!(controller.render_generation(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_prediction_failure() {
    let app = Router::new().route("/predict", post(|| async { "this is not json" }));
    let base = spawn_stub(app).await;
    let client = PredictionClient::new(&base).unwrap();

    let mut controller = filled_controller();
    match controller.submit(&client).await {
        SubmissionOutcome::Failed { notice, error } => {
            assert_eq!(notice, Notice::PredictionFailed);
            assert_eq!(error.error_code(), "MALFORMED_RESPONSE");
            assert!(error.is_prediction_failure());
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_a_prediction_failure() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = PredictionClient::new(&format!("http://{}", addr)).unwrap();
    let mut controller = filled_controller();

    match controller.submit(&client).await {
        SubmissionOutcome::Failed { notice, error } => {
            assert_eq!(notice, Notice::PredictionFailed);
            assert_eq!(error.error_code(), "REQUEST_FAILED");
        }
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_incomplete_last_section_sends_nothing() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/predict",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(good_body())
            }
        }),
    );
    let base = spawn_stub(app).await;
    let client = PredictionClient::new(&base).unwrap();

    let mut controller = filled_controller();
    let last_field = controller.current_section().fields[0].name.clone();
    controller.set_value(last_field.clone(), "");

    let outcome = controller.submit(&client).await;
    assert_eq!(outcome, SubmissionOutcome::Blocked(Notice::IncompleteSubmission));
    assert!(controller.is_marked(&last_field));
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // Completing the field lets exactly one request through
    controller.set_value(last_field, "No");
    assert!(matches!(
        controller.submit(&client).await,
        SubmissionOutcome::Rendered(_)
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
