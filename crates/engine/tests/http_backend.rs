use engine::{
    Answer, BackendError, Command, Engine, ErrorKind, Event, HttpQaBackend, Phase, QaBackend,
    VideoId,
};
use qa_http::QaClientConfig;
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn start_server(runtime: &Runtime) -> MockServer {
    runtime.block_on(MockServer::start())
}

fn mount(runtime: &Runtime, server: &MockServer, mock: Mock) {
    runtime.block_on(mock.mount(server));
}

fn backend_for(server: &MockServer) -> HttpQaBackend {
    HttpQaBackend::new(QaClientConfig::default().with_base_url(server.uri()))
        .expect("backend should build")
}

#[test]
fn engine_processes_video_and_answers_over_http() {
    let runtime = Runtime::new().expect("test runtime");
    let server = start_server(&runtime);
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/process"))
            .and(body_json(json!({ "url": "https://youtu.be/abc123" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "video_id": "abc123", "status": "processed" })),
            ),
    );
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/ask"))
            .and(body_json(
                json!({ "question": "What happens?", "video_id": "abc123" }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "answer": "X happens",
                "timestamps": [
                    { "start_time": 125, "url": "https://youtu.be/abc123?t=125" }
                ]
            }))),
    );

    let mut engine = Engine::new(backend_for(&server));
    engine
        .handle_command(Command::Submit {
            url: "https://youtu.be/abc123".to_owned(),
        })
        .expect("submit should succeed");
    assert_eq!(engine.session().phase(), Phase::Ready);
    assert_eq!(engine.session().video_id(), Some(&VideoId::new("abc123")));

    let events = engine
        .handle_command(Command::Ask {
            question: "What happens?".to_owned(),
        })
        .expect("ask should succeed");

    let Some(Event::AnswerReady(rendered)) = events.last() else {
        panic!("last event must be AnswerReady");
    };
    assert_eq!(rendered.text, "X happens");
    assert_eq!(rendered.sources.len(), 1);
    assert_eq!(rendered.sources[0].label, "2:05");
}

#[test]
fn subtitles_detail_surfaces_captions_error() {
    let runtime = Runtime::new().expect("test runtime");
    let server = start_server(&runtime);
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/process"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "detail": "This video doesn't have available subtitles."
            }))),
    );

    let mut engine = Engine::new(backend_for(&server));
    let events = engine
        .handle_command(Command::Submit {
            url: "https://youtu.be/nosubs".to_owned(),
        })
        .expect("service failure is not an engine error");

    let Some(Event::Error(error)) = events.last() else {
        panic!("last event must be Error");
    };
    assert_eq!(error.kind, ErrorKind::CaptionsUnavailable);
    assert_eq!(engine.session().phase(), Phase::Idle);
}

#[test]
fn non_json_error_body_is_rejection_without_detail() {
    let runtime = Runtime::new().expect("test runtime");
    let server = start_server(&runtime);
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/ask"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>")),
    );

    let backend = backend_for(&server);
    let result: Result<Answer, BackendError> = backend.ask("What?", &VideoId::new("abc123"));

    assert_eq!(
        result,
        Err(BackendError::Rejected {
            status: Some(502),
            detail: None,
            code: None,
        })
    );
}

#[test]
fn unreachable_service_is_transport_failure() {
    let backend = HttpQaBackend::new(
        QaClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout_secs(Some(2)),
    )
    .expect("backend should build");

    let result = backend.ingest("https://youtu.be/abc123");

    assert!(matches!(result, Err(BackendError::Transport { .. })));
}
