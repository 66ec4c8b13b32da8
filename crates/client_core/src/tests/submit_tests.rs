use std::{sync::Arc, time::Instant};

use super::*;
use crate::{controller::GridSelectionController, grid::LetterGrid, GridSurface};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Html,
    routing::post,
    Router,
};
use shared::domain::{CellCoord, PuzzleName, VisitorId};
use storage::MemorySessionStore;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

type Fields = Vec<(String, String)>;

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<Fields>>>>,
    status: StatusCode,
}

async fn handle_submission(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.expect("field text");
        fields.push((name, value));
    }
    let answer = fields
        .iter()
        .find(|(name, _)| name == "answer")
        .map(|(_, value)| value.clone())
        .unwrap_or_default();
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send(fields);
    }
    (
        state.status,
        Html(format!("<html><body>answer was {answer}</body></html>")),
    )
}

async fn spawn_submission_server(
    status: StatusCode,
) -> std::io::Result<(String, oneshot::Receiver<Fields>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        tx: Arc::new(Mutex::new(Some(tx))),
        status,
    };
    let app = Router::new()
        .route(SUBMISSION_PATH, post(handle_submission))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

/// Accepts connections and holds them open without ever answering.
async fn spawn_silent_server() -> std::io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    Ok(format!("http://{addr}"))
}

fn form() -> SubmissionForm {
    SubmissionForm::new(
        PuzzleName::new("treasure_as"),
        VisitorId::new("visitor-7"),
        ["Light", "BEAM"],
    )
}

#[test]
fn endpoint_is_joined_onto_server_root() {
    let submitter =
        HttpAnswerSubmitter::new("http://localhost:8000/puzzles/treasure_as/", Duration::from_secs(5))
            .expect("submitter");
    assert_eq!(
        submitter.endpoint().as_str(),
        "http://localhost:8000/submission"
    );
}

#[test]
fn rejects_invalid_server_url() {
    let err = HttpAnswerSubmitter::new("not a url", Duration::from_secs(5))
        .err()
        .expect("invalid url");
    assert!(matches!(err, FinderError::Submission(_)));
}

#[tokio::test]
async fn posts_multipart_fields_and_returns_page() {
    let (server_url, fields_rx) = spawn_submission_server(StatusCode::OK)
        .await
        .expect("spawn server");
    let submitter = HttpAnswerSubmitter::new(&server_url, Duration::from_secs(5)).expect("client");

    let html = submitter.submit(&form()).await.expect("submit");
    assert_eq!(html, "<html><body>answer was beam,light</body></html>");

    let fields = fields_rx.await.expect("fields");
    assert_eq!(
        fields,
        vec![
            ("name".to_string(), "treasure_as".to_string()),
            ("visitor".to_string(), "visitor-7".to_string()),
            ("answer".to_string(), "beam,light".to_string()),
        ]
    );
}

#[tokio::test]
async fn error_pages_are_still_returned() {
    let (server_url, _fields_rx) = spawn_submission_server(StatusCode::FORBIDDEN)
        .await
        .expect("spawn server");
    let submitter = HttpAnswerSubmitter::new(&server_url, Duration::from_secs(5)).expect("client");

    let html = submitter.submit(&form()).await.expect("submit");
    assert!(html.contains("answer was beam,light"));
}

#[tokio::test]
async fn unreachable_server_is_a_submission_error() {
    let submitter = HttpAnswerSubmitter::new(&unreachable_url().await, Duration::from_secs(5))
        .expect("client");
    let err = submitter.submit(&form()).await.expect_err("connection refused");
    assert!(matches!(err, FinderError::Submission(_)));
}

#[tokio::test]
async fn controller_replaces_document_after_submitting() {
    let (server_url, fields_rx) = spawn_submission_server(StatusCode::OK)
        .await
        .expect("spawn server");
    let submitter = HttpAnswerSubmitter::new(&server_url, Duration::from_secs(5)).expect("client");

    let mut grid = LetterGrid::from_rows(&[["C", "A", "T"], ["D", "O", "G"]]).expect("grid");
    let mut controller =
        GridSelectionController::new(PuzzleName::new("treasure_as"), MemorySessionStore::new());
    for (row, col) in [(0, 0), (0, 1), (0, 2)] {
        controller.click(&mut grid, CellCoord::new(row, col));
    }
    controller.commit(&mut grid).expect("CAT");
    for (row, col) in [(1, 0), (1, 1), (1, 2)] {
        controller.click(&mut grid, CellCoord::new(row, col));
    }
    controller.commit(&mut grid).expect("DOG");

    assert!(
        controller
            .submit(&mut grid, &submitter, VisitorId::new("visitor-7"))
            .await
    );
    assert_eq!(
        grid.document(),
        Some("<html><body>answer was cat,dog</body></html>")
    );

    let fields = fields_rx.await.expect("fields");
    assert!(fields.contains(&("answer".to_string(), "cat,dog".to_string())));
}

#[tokio::test]
async fn failed_submission_is_swallowed_and_leaves_page_alone() {
    let submitter = HttpAnswerSubmitter::new(&unreachable_url().await, Duration::from_secs(5))
        .expect("client");
    let mut grid = LetterGrid::from_rows(&[["C", "A", "T"]]).expect("grid");
    let controller =
        GridSelectionController::new(PuzzleName::new("treasure_as"), MemorySessionStore::new());

    assert!(
        !controller
            .submit(&mut grid, &submitter, VisitorId::new("visitor-7"))
            .await
    );
    assert_eq!(grid.document(), None);
    assert_eq!(grid.cell(CellCoord::new(0, 0)).map(|cell| cell.ch), Some('C'));
}

#[tokio::test]
async fn hung_server_times_out_and_leaves_page_alone() {
    let server_url = spawn_silent_server().await.expect("spawn server");
    let submitter =
        HttpAnswerSubmitter::new(&server_url, Duration::from_millis(300)).expect("client");

    let mut grid = LetterGrid::from_rows(&[["C", "A", "T"]]).expect("grid");
    let mut controller =
        GridSelectionController::new(PuzzleName::new("treasure_as"), MemorySessionStore::new());
    for col in 0..3 {
        controller.click(&mut grid, CellCoord::new(0, col));
    }
    controller.commit(&mut grid).expect("CAT");

    let started = Instant::now();
    let submitted = controller
        .submit(&mut grid, &submitter, VisitorId::new("visitor-7"))
        .await;
    let elapsed = started.elapsed();

    assert!(!submitted);
    assert_eq!(grid.document(), None);
    assert!(
        elapsed < Duration::from_secs(1),
        "submission should time out quickly, took {elapsed:?}"
    );
    assert_eq!(grid.chips(), ["CAT".to_string()]);
}
