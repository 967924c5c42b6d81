//! Per-request structured logging with a correlation id.
//!
//! Responsibility:
//! - Give every request a fresh correlation id and a request-scoped span.
//! - Emit exactly one completion record (method, url, user agent, status,
//!   elapsed) — `info` for 200, `error` otherwise.
//! - Last-resort recovery boundary: a panic below this layer is logged as
//!   a 500 and then re-raised, so process-level policy still observes it.
//!
//! Applied outside the auth middleware so rejections are logged too.

use std::time::Instant;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use tracing::Instrument;
use uuid::Uuid;

pub async fn request_log(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4();

    let method = req.method().clone();
    let url = req.uri().clone();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let span = tracing::info_span!("request", request_id = %request_id);

    // AssertUnwindSafe: the request future is consumed either way; nothing
    // is observed after an unwind except the log record below.
    let outcome = std::panic::AssertUnwindSafe(next.run(req))
        .catch_unwind()
        .instrument(span.clone())
        .await;

    let status_code = match &outcome {
        Ok(response) => response.status(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let total_elapsed_ms = started.elapsed().as_millis() as u64;

    {
        let _entered = span.enter();
        if status_code == StatusCode::OK {
            tracing::info!(
                method = %method,
                url = %url,
                user_agent = %user_agent,
                status_code = status_code.as_u16(),
                total_elapsed_ms,
            );
        } else {
            tracing::error!(
                method = %method,
                url = %url,
                user_agent = %user_agent,
                status_code = status_code.as_u16(),
                total_elapsed_ms,
            );
        }
    }

    match outcome {
        Ok(response) => response,
        // Logged with status 500 above; keep panicking so the hosting
        // runtime's recovery policy still sees it.
        Err(panic_value) => std::panic::resume_unwind(panic_value),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    fn logged(router: Router) -> Router {
        router.layer(middleware::from_fn(request_log))
    }

    /// Captures formatted log lines so tests can assert on the records.
    #[derive(Clone)]
    struct RecordBuffer(Arc<Mutex<Vec<u8>>>);

    impl RecordBuffer {
        fn new() -> Self {
            Self(Arc::new(Mutex::new(Vec::new())))
        }

        /// Lines that carry the completion record's status field; the
        /// panic hook may add its own unrelated line.
        fn completion_records(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .filter(|line| line.contains("status_code="))
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for RecordBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for RecordBuffer {
        type Writer = RecordBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(records: &RecordBuffer) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(records.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[tokio::test]
    async fn passes_the_response_through_unchanged() {
        let router = logged(Router::new().route("/ok", get(|| async { "ok" })));
        let response = router
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn preserves_error_status_codes() {
        let router = logged(
            Router::new().route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT })),
        );
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/teapot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn emits_exactly_one_completion_record_per_request() {
        let records = RecordBuffer::new();
        let _guard = capture(&records);

        let router = logged(Router::new().route("/ok", get(|| async { "ok" })));
        router
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let completions = records.completion_records();
        assert_eq!(completions.len(), 1, "records: {completions:?}");
        assert!(completions[0].contains("status_code=200"));
        assert!(completions[0].contains("method=GET"));
        assert!(completions[0].contains("url=/ok"));
        // The record is emitted inside the correlation span.
        assert!(completions[0].contains("request_id="));
    }

    #[tokio::test]
    async fn a_panicking_handler_is_recorded_as_500() {
        let records = RecordBuffer::new();
        let _guard = capture(&records);

        async fn boom() -> &'static str {
            panic!("handler exploded")
        }
        let router = logged(Router::new().route("/boom", get(boom)));

        let result = std::panic::AssertUnwindSafe(
            router.oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap()),
        )
        .catch_unwind()
        .await;
        assert!(result.is_err());

        let completions = records.completion_records();
        assert_eq!(completions.len(), 1, "records: {completions:?}");
        assert!(completions[0].contains("status_code=500"));
        assert!(completions[0].contains("request_id="));
    }

    #[tokio::test]
    async fn a_handler_panic_is_re_raised() {
        async fn boom() -> &'static str {
            panic!("handler exploded")
        }
        let router = logged(Router::new().route("/boom", get(boom)));

        let result = std::panic::AssertUnwindSafe(
            router.oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap()),
        )
        .catch_unwind()
        .await;

        assert!(result.is_err(), "panic must propagate past the middleware");
    }
}
