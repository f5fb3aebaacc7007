use crate::fixtures::html;
use showcase_harvest::crawler::{
    Coordinator, FailureReason, FetchCause, Fetcher, Progress, RetryPolicy, TaskOutcome,
};
use showcase_harvest::dom::Document;
use showcase_harvest::extract::{ExtractionError, PageExtractor};
use showcase_harvest::Stage;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Counts invocations and returns the page's `h1` text
#[derive(Default)]
struct CountingExtractor {
    calls: AtomicUsize,
}

impl PageExtractor for CountingExtractor {
    type Record = String;

    fn stage(&self) -> Stage {
        Stage::ProjectDetails
    }

    fn extract(&self, url: &str, doc: &Document) -> Result<Vec<String>, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("boom") {
            panic!("extractor blew up on {}", url);
        }
        match doc.find_tag("h1") {
            Some(h1) => Ok(vec![h1.text()]),
            None => Err(ExtractionError::Structure("no heading".to_string())),
        }
    }
}

/// Records when each request arrives and answers after a fixed delay
#[derive(Clone)]
struct DelayedArrivals {
    delay: Duration,
    arrivals: Arc<Mutex<Vec<Instant>>>,
}

impl DelayedArrivals {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            arrivals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Largest number of requests open at once
    ///
    /// A request stays open for at least `delay` after it arrives, so every
    /// arrival inside the window ending at another arrival overlaps it.
    fn peak_in_flight(&self) -> usize {
        let arrivals = self.arrivals.lock().unwrap();
        arrivals
            .iter()
            .map(|&at| {
                arrivals
                    .iter()
                    .filter(|&&other| other <= at && at.duration_since(other) < self.delay)
                    .count()
            })
            .max()
            .unwrap_or(0)
    }
}

impl Respond for DelayedArrivals {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().unwrap().push(Instant::now());
        html("<h1>page</h1>").set_delay(self.delay)
    }
}

fn fetcher() -> Arc<Fetcher> {
    let client = reqwest::Client::builder()
        .user_agent("TestBot/1.0.0")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    Arc::new(Fetcher::new(client))
}

#[tokio::test]
async fn test_fetch_success_and_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("<h1>hi</h1>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = fetcher();

    let page = fetcher.fetch(&format!("{}/ok", server.uri())).await.unwrap();
    assert_eq!(page.status_code, 200);
    assert_eq!(page.final_url, format!("{}/ok", server.uri()));
    assert!(String::from_utf8_lossy(&page.body).contains("<h1>hi</h1>"));

    let err = fetcher
        .fetch(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.cause, FetchCause::Status(404));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_bounded_concurrency_processes_every_url_once() {
    let server = MockServer::start().await;
    let responder = DelayedArrivals::new(Duration::from_millis(100));
    Mock::given(method("GET"))
        .and(path_regex(r"^/p/\d+$"))
        .respond_with(responder.clone())
        .mount(&server)
        .await;

    let total = 12;
    let max_concurrency = 3;
    let urls: Vec<String> = (0..total).map(|i| format!("{}/p/{}", server.uri(), i)).collect();

    let observed = Arc::new(Mutex::new(Vec::<Progress>::new()));
    let sink = Arc::clone(&observed);
    let coordinator = Coordinator::new(fetcher(), max_concurrency, RetryPolicy::none())
        .with_progress(Arc::new(move |p: Progress| sink.lock().unwrap().push(p)));

    let extractor = Arc::new(CountingExtractor::default());
    let start = Instant::now();
    let run = coordinator.run(urls.clone(), Arc::clone(&extractor)).await;
    let elapsed = start.elapsed();

    assert_eq!(run.outcomes.len(), total);
    assert_eq!(run.failed_count(), 0);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), total);

    let indices: HashSet<usize> = run.outcomes.iter().map(|o| o.index()).collect();
    assert_eq!(indices.len(), total);
    for outcome in &run.outcomes {
        assert_eq!(outcome.url(), urls[outcome.index()]);
    }

    // 12 responses of 100ms each, at most 3 at a time: at least 4 waves
    assert!(
        elapsed >= Duration::from_millis(400),
        "finished too fast for the concurrency bound: {:?}",
        elapsed
    );

    let peak = responder.peak_in_flight();
    assert!(peak >= 1);
    assert!(
        peak <= max_concurrency,
        "{} requests in flight with a limit of {}",
        peak,
        max_concurrency
    );

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), total);
    for (i, progress) in observed.iter().enumerate() {
        assert_eq!(progress.completed, i + 1);
        assert!(progress.completed <= progress.total);
        assert_eq!(progress.total, total);
    }
}

#[tokio::test]
async fn test_panicking_extractor_is_isolated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<h1>fine</h1>"))
        .mount(&server)
        .await;

    let urls = vec![
        format!("{}/a", server.uri()),
        format!("{}/boom", server.uri()),
        format!("{}/b", server.uri()),
    ];

    let coordinator = Coordinator::new(fetcher(), 2, RetryPolicy::none());
    let extractor = Arc::new(CountingExtractor::default());
    let run = coordinator.run(urls, Arc::clone(&extractor)).await;

    assert_eq!(run.outcomes.len(), 3);
    assert_eq!(run.record_count(), 2);
    assert_eq!(extractor.calls.load(Ordering::SeqCst), 3);

    let failures: Vec<_> = run.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].stage, Stage::ProjectDetails);
    match &failures[0].reason {
        FailureReason::Panicked(msg) => assert!(msg.contains("extractor blew up")),
        other => panic!("expected a panic failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_extraction_error_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<p>no heading here</p>"))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(fetcher(), 1, RetryPolicy::none());
    let run = coordinator
        .run(
            vec![format!("{}/x", server.uri())],
            Arc::new(CountingExtractor::default()),
        )
        .await;

    match &run.outcomes[0] {
        TaskOutcome::Failed(failure) => assert_eq!(
            failure.reason,
            FailureReason::Extraction(ExtractionError::Structure("no heading".to_string()))
        ),
        TaskOutcome::Completed { .. } => panic!("expected a failure"),
    }
}

#[tokio::test]
async fn test_transient_failure_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html("<h1>recovered</h1>"))
        .mount(&server)
        .await;

    let retry = RetryPolicy {
        max_retries: 2,
        delay: Duration::from_millis(10),
    };
    let coordinator = Coordinator::new(fetcher(), 1, retry);
    let run = coordinator
        .run(
            vec![format!("{}/flaky", server.uri())],
            Arc::new(CountingExtractor::default()),
        )
        .await;

    assert_eq!(run.failed_count(), 0);
    match &run.outcomes[0] {
        TaskOutcome::Completed { records, .. } => assert_eq!(records, &vec!["recovered".to_string()]),
        TaskOutcome::Failed(f) => panic!("unexpected failure: {}", f),
    }
}

#[tokio::test]
async fn test_no_retry_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(fetcher(), 1, RetryPolicy::default());
    let run = coordinator
        .run(
            vec![format!("{}/down", server.uri())],
            Arc::new(CountingExtractor::default()),
        )
        .await;

    let failure = run.failures().next().unwrap();
    match &failure.reason {
        FailureReason::Transport(e) => assert_eq!(e.cause, FetchCause::Status(503)),
        other => panic!("expected a transport failure, got {:?}", other),
    }
}
