//! 解析サービスとの通信テスト
//!
//! ローカルに axum のスタブサーバーを立て、multipart の中身と
//! 応答ごとの振り分けを検証する。

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use meditrend::submission::{FailureKind, UNREACHABLE_MESSAGE};
use meditrend::{
    CandidateFile, HttpAnalysisClient, LocalAnalysisBackend, Message, OperatingMode,
    Orchestrator, ViewState,
};
use meditrend_common::{SubmissionResult, TrendDirection};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Received {
    path: String,
    field: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

type Log = Arc<Mutex<Vec<Received>>>;

async fn record(log: &Log, path: &str, mut multipart: Multipart) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        log.lock().unwrap().push(Received {
            path: path.to_string(),
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }
}

/// 両エンドポイントで同じ応答を返すスタブ
fn stub(log: Log, status: StatusCode, body: Value) -> Router {
    let upload_log = log.clone();
    let upload_body = body.clone();
    Router::new()
        .route(
            "/api/upload",
            post(move |multipart: Multipart| {
                let log = upload_log.clone();
                let body = upload_body.clone();
                async move {
                    record(&log, "/api/upload", multipart).await;
                    (status, Json(body))
                }
            }),
        )
        .route(
            "/api/analyze-trends",
            post(move |multipart: Multipart| {
                let log = log.clone();
                let body = body.clone();
                async move {
                    record(&log, "/api/analyze-trends", multipart).await;
                    (status, Json(body))
                }
            }),
        )
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpAnalysisClient {
    HttpAnalysisClient::new(base_url, Duration::from_secs(10)).unwrap()
}

fn single_ok() -> Value {
    json!({
        "success": true,
        "filename": "checkup.pdf",
        "health_score": 85,
        "summary": {"total_tests": 2, "normal": 2, "abnormal": 0},
        "parameters": [
            {
                "parameter": "Hemoglobin",
                "value": 14.2,
                "unit": "g/dL",
                "status": "normal",
                "reference_range_display": "13.5 - 17.5 g/dL",
                "explanation": "Within range.",
                "category": "Blood Count"
            },
            {
                "parameter": "Glucose",
                "value": 92,
                "unit": "mg/dL",
                "status": "normal",
                "reference_range_display": "70 - 100 mg/dL",
                "explanation": "Within range."
            }
        ],
        "recommendations": "Keep up the good work."
    })
}

#[tokio::test]
async fn test_single_report_success() {
    let log: Log = Arc::default();
    let base = serve(stub(log.clone(), StatusCode::OK, single_ok())).await;

    let file = CandidateFile::from_bytes("checkup.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let result = client(&base)
        .submit(OperatingMode::Single, &[file])
        .await
        .unwrap();

    match result {
        SubmissionResult::SingleReport(report) => {
            assert_eq!(report.health_score, 85);
            assert_eq!(report.parameters.len(), 2);
            assert_eq!(report.parameters[1].category_label(), "General");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let received = log.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "/api/upload");
    assert_eq!(received[0].field, "file");
    assert_eq!(received[0].file_name, "checkup.pdf");
    assert_eq!(received[0].content_type, "application/pdf");
    assert_eq!(received[0].bytes, b"%PDF-1.4");
}

#[tokio::test]
async fn test_trend_sends_files_in_order() {
    let log: Log = Arc::default();
    let body = json!({
        "success": true,
        "report_count": 3,
        "analysis": {
            "trends": {
                "Glucose": {
                    "latest_value": 104,
                    "unit": "mg/dL",
                    "direction": "increasing",
                    "series": [
                        {"date": "2024-01-10", "value": 92},
                        {"date": "2024-06-02", "value": 104, "status": "high"}
                    ]
                }
            }
        }
    });
    let base = serve(stub(log.clone(), StatusCode::OK, body)).await;

    let files = vec![
        CandidateFile::from_bytes("c.png", "image/png", b"png".to_vec()),
        CandidateFile::from_bytes("a.pdf", "application/pdf", b"pdf".to_vec()),
        CandidateFile::from_bytes("b.jpg", "image/jpg", b"jpg".to_vec()),
    ];
    let result = client(&base)
        .submit(OperatingMode::Trend, &files)
        .await
        .unwrap();

    match result {
        SubmissionResult::Trend(trend) => {
            let glucose = &trend.trends["Glucose"];
            assert_eq!(glucose.direction, TrendDirection::Increasing);
            assert_eq!(glucose.series.len(), 2);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let received = log.lock().unwrap().clone();
    let names: Vec<&str> = received.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["c.png", "a.pdf", "b.jpg"]);
    assert!(received.iter().all(|r| r.path == "/api/analyze-trends"));
    assert!(received.iter().all(|r| r.field == "files"));
    // image/jpg は正規名で送る
    assert_eq!(received[2].content_type, "image/jpeg");
}

#[tokio::test]
async fn test_http_error_detail_is_surfaced() {
    let log: Log = Arc::default();
    let base = serve(stub(
        log,
        StatusCode::BAD_REQUEST,
        json!({"detail": "Could not extract text from file."}),
    ))
    .await;

    let file = CandidateFile::from_bytes("scan.png", "image/png", b"png".to_vec());
    let failure = client(&base)
        .submit(OperatingMode::Single, &[file])
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Rejected);
    assert_eq!(failure.message, "Could not extract text from file.");
}

#[tokio::test]
async fn test_unreachable_service() {
    // 空きポートを確保してから閉じる
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let file = CandidateFile::from_bytes("a.pdf", "application/pdf", b"pdf".to_vec());
    let failure = client(&format!("http://{}", addr))
        .submit(OperatingMode::Single, &[file])
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Unreachable);
    assert_eq!(failure.message, UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let router = Router::new().route(
        "/api/upload",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"success": true}))
        }),
    );
    let base = serve(router).await;

    let client = HttpAnalysisClient::new(base, Duration::from_millis(200)).unwrap();
    let file = CandidateFile::from_bytes("a.pdf", "application/pdf", b"pdf".to_vec());
    let failure = client
        .submit(OperatingMode::Single, &[file])
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Timeout);
    assert!(failure.message.contains("did not respond"));
}

#[tokio::test]
async fn test_orchestrator_end_to_end() {
    let log: Log = Arc::default();
    let base = serve(stub(
        log.clone(),
        StatusCode::OK,
        json!({"success": true, "analysis": {"trends": {}}}),
    ))
    .await;

    let mut orchestrator = Orchestrator::new(client(&base));
    orchestrator.dispatch(Message::SetMode(OperatingMode::Trend));
    orchestrator.dispatch(Message::AddFiles(vec![
        CandidateFile::from_bytes("a.pdf", "application/pdf", b"a".to_vec()),
        CandidateFile::from_bytes("notes.txt", "text/plain", b"n".to_vec()),
        CandidateFile::from_bytes("b.pdf", "application/pdf", b"b".to_vec()),
    ]));

    // 1件却下、2件受理
    assert_eq!(orchestrator.session().pending().len(), 2);
    assert!(orchestrator
        .view()
        .error()
        .is_some_and(|e| e.contains("notes.txt")));

    let view = orchestrator.submit().await.clone();
    match view {
        ViewState::Committed {
            result: SubmissionResult::Trend(trend),
        } => assert!(trend.is_empty()),
        other => panic!("unexpected view: {:?}", other),
    }
    assert!(orchestrator.session().pending().is_empty());
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_health_probe() {
    let router = Router::new().route(
        "/api/health",
        axum::routing::get(|| async { Json(json!({"status": "healthy"})) }),
    );
    let base = serve(router).await;
    assert!(client(&base).health().await);
}

#[tokio::test]
async fn test_health_gives_up_before_submission_timeout() {
    let router = Router::new().route(
        "/api/health",
        axum::routing::get(|| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Json(json!({"status": "healthy"}))
        }),
    );
    let base = serve(router).await;

    // 送信用は120秒でも、到達確認は数秒で諦める
    let client = HttpAnalysisClient::new(base, Duration::from_secs(120)).unwrap();
    let started = std::time::Instant::now();
    assert!(!client.health().await);
    assert!(started.elapsed() < Duration::from_secs(30));
}
