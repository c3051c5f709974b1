//! Integration tests for the crawler
//!
//! Most tests drive the crawl through a scripted in-memory transport so that
//! hosts like example.com can be served and every request counted. The last
//! tests run the real HTTP transport against a wiremock server.

use async_trait::async_trait;
use hostcrawl::config::{Config, CrawlerConfig, UserAgentConfig};
use hostcrawl::crawler::{CrawlSettings, Crawler, Transport};
use hostcrawl::FetchError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEED: &str = "https://example.com/";

/// In-memory transport serving fixed pages and recording every request
#[derive(Default)]
struct ScriptedTransport {
    pages: HashMap<String, String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    fn robots(self, origin: &str, body: &str) -> Self {
        self.page(&format!("{}/robots.txt", origin), body)
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls_for(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }

    /// Every non-robots request, sorted
    fn page_fetches(&self) -> Vec<String> {
        let mut fetched: Vec<String> = self
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| !called.ends_with("/robots.txt"))
            .cloned()
            .collect();
        fetched.sort();
        fetched
    }

    fn all_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(url.as_str()) {
            Some(html) => Ok(html.clone().into_bytes()),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

fn anchors(hrefs: &[&str]) -> String {
    let body: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><body>{}</body></html>", body)
}

/// The site from the link-discovery scenario: one page linking to a mix of
/// same-host, off-host and non-crawlable hrefs
fn scenario_site() -> ScriptedTransport {
    ScriptedTransport::new()
        .robots("https://example.com", "")
        .page(
            SEED,
            &anchors(&[
                "/a",
                "https://example.com/b",
                "https://other.com/c",
                "#frag",
                "mailto:x@y.com",
            ]),
        )
        .page("https://example.com/a", &anchors(&["/", "/b#section"]))
        .page("https://example.com/b", &anchors(&[]))
        .page("https://other.com/c", &anchors(&["https://other.com/d"]))
}

fn settings(max_pages: usize) -> CrawlSettings {
    CrawlSettings::new(SEED, max_pages)
        .expect("valid seed")
        .with_user_agent("TestBot")
}

async fn run(transport: &Arc<ScriptedTransport>, settings: CrawlSettings) -> hostcrawl::CrawlReport {
    let transport: Arc<dyn Transport> = transport.clone();
    Crawler::new(settings, transport).run().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_visits_same_host_links_only() {
    let transport = Arc::new(scenario_site());

    let report = run(&transport, settings(10)).await;

    let expected = vec![
        "https://example.com/".to_string(),
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
    ];
    assert_eq!(report.visited, expected);
    assert_eq!(transport.page_fetches(), expected);
    assert_eq!(report.pages_crawled, 3);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.fetch_failures, 0);

    assert!(transport
        .all_calls()
        .iter()
        .all(|called| !called.contains("other.com")));

    assert_eq!(report.rejected.invalid_links, 2);
    assert_eq!(report.rejected.off_host, 1);
    assert_eq!(report.rejected.already_claimed, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_budget_of_one_visits_only_seed() {
    let transport = Arc::new(scenario_site());

    let report = run(&transport, settings(1)).await;

    assert_eq!(report.visited, vec![SEED.to_string()]);
    assert_eq!(transport.page_fetches(), vec![SEED.to_string()]);
    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.rejected.over_budget, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_robots_disallow_is_respected() {
    let transport = Arc::new(
        scenario_site().robots("https://example.com", "User-agent: TestBot\nDisallow: /a\n"),
    );

    let report = run(&transport, settings(10)).await;

    assert_eq!(
        report.visited,
        vec![
            "https://example.com/".to_string(),
            "https://example.com/b".to_string()
        ]
    );
    assert_eq!(transport.calls_for("https://example.com/a"), 0);
    assert_eq!(report.rejected.robots_denied, 1);
    assert_eq!(report.pages_crawled, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_robots_rules_for_other_agents_do_not_apply() {
    let transport = Arc::new(
        scenario_site().robots("https://example.com", "User-agent: OtherBot\nDisallow: /\n"),
    );

    let report = run(&transport, settings(10)).await;

    assert_eq!(report.pages_crawled, 3);
    assert_eq!(report.rejected.robots_denied, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_robots_fetched_once_per_crawl() {
    let mut site = ScriptedTransport::new()
        .robots("https://example.com", "User-agent: *\nDisallow: /private\n")
        .with_delay(Duration::from_millis(2));

    let hrefs: Vec<String> = (0..30).map(|i| format!("/p{}", i)).collect();
    let mut seed_links: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    seed_links.push("/private/secret");
    site = site.page(SEED, &anchors(&seed_links));
    for (i, href) in hrefs.iter().enumerate() {
        let next = format!("/p{}", (i + 1) % hrefs.len());
        site = site.page(
            &format!("https://example.com{}", href),
            &anchors(&[next.as_str(), "/", "/private/other"]),
        );
    }
    let transport = Arc::new(site);

    let report = run(&transport, settings(100)).await;

    assert_eq!(transport.calls_for("https://example.com/robots.txt"), 1);
    assert_eq!(report.pages_crawled, 31);
    assert!(report
        .visited
        .iter()
        .all(|visited| !visited.contains("/private")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_ceiling_is_respected() {
    let limit = 4;
    let mut site = ScriptedTransport::new()
        .robots("https://example.com", "")
        .with_delay(Duration::from_millis(10));

    let hrefs: Vec<String> = (0..40).map(|i| format!("/wide/{}", i)).collect();
    let seed_links: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    site = site.page(SEED, &anchors(&seed_links));
    for href in &hrefs {
        site = site.page(&format!("https://example.com{}", href), &anchors(&["/"]));
    }
    let transport = Arc::new(site);

    let settings = settings(100).with_concurrency_limit(limit).unwrap();
    let report = run(&transport, settings).await;

    assert_eq!(report.pages_crawled, 41);
    assert_eq!(report.fetched, 41);
    let peak = transport.peak.load(Ordering::SeqCst);
    assert!(peak <= limit, "peak in-flight fetches {} > {}", peak, limit);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_each_url_fetched_at_most_once() {
    // Every page links to every other page, so each URL is discovered many
    // times by concurrently running units
    let count = 25;
    let hrefs: Vec<String> = (0..count).map(|i| format!("/mesh/{}", i)).collect();
    let all: Vec<&str> = hrefs.iter().map(String::as_str).collect();

    let mut site = ScriptedTransport::new()
        .robots("https://example.com", "")
        .with_delay(Duration::from_millis(1))
        .page(SEED, &anchors(&all));
    for href in &hrefs {
        site = site.page(&format!("https://example.com{}", href), &anchors(&all));
    }
    let transport = Arc::new(site);

    let report = run(&transport, settings(1000)).await;

    let fetched = transport.page_fetches();
    let mut unique = fetched.clone();
    unique.dedup();
    assert_eq!(fetched, unique);
    assert_eq!(fetched.len(), count + 1);
    assert_eq!(report.pages_crawled, count + 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_budget_caps_total_visits() {
    let count = 50;
    let hrefs: Vec<String> = (0..count).map(|i| format!("/n/{}", i)).collect();
    let all: Vec<&str> = hrefs.iter().map(String::as_str).collect();

    let mut site = ScriptedTransport::new()
        .robots("https://example.com", "")
        .page(SEED, &anchors(&all));
    for href in &hrefs {
        site = site.page(&format!("https://example.com{}", href), &anchors(&all));
    }
    let transport = Arc::new(site);

    let report = run(&transport, settings(7)).await;

    assert_eq!(report.pages_crawled, 7);
    assert_eq!(report.visited.len(), 7);
    assert_eq!(transport.page_fetches().len(), 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_fetch_failures_do_not_stop_crawl() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .robots("https://example.com", "")
            .page(SEED, &anchors(&["/missing", "/present"]))
            .page("https://example.com/present", &anchors(&["/deeper"]))
            .page("https://example.com/deeper", &anchors(&[])),
    );

    let report = run(&transport, settings(10)).await;

    assert_eq!(report.pages_crawled, 4);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.fetched, 3);
    assert!(report
        .visited
        .contains(&"https://example.com/deeper".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_missing_robots_allows_everything() {
    let transport = Arc::new(
        ScriptedTransport::new()
            .page(SEED, &anchors(&["/a", "/b"]))
            .page("https://example.com/a", &anchors(&[]))
            .page("https://example.com/b", &anchors(&[])),
    );

    let report = run(&transport, settings(10)).await;

    assert_eq!(report.pages_crawled, 3);
    assert_eq!(transport.calls_for("https://example.com/robots.txt"), 1);
}

#[tokio::test]
async fn test_seed_fetch_failure_ends_crawl() {
    let transport = Arc::new(ScriptedTransport::new().robots("https://example.com", ""));

    let report = run(&transport, settings(10)).await;

    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.visited, vec![SEED.to_string()]);
    assert_eq!(report.fetch_failures, 1);
}

#[tokio::test]
async fn test_seed_denied_by_robots_is_never_fetched() {
    let transport = Arc::new(
        scenario_site().robots("https://example.com", "User-agent: *\nDisallow: /\n"),
    );

    let report = run(&transport, settings(10)).await;

    assert!(report.visited.is_empty());
    assert!(transport.page_fetches().is_empty());
    assert_eq!(report.rejected.robots_denied, 1);
    // The seed is claimed before the robots check but never visited
    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.pages_visited(), 0);
}

#[tokio::test]
async fn test_zero_concurrency_limit_is_refused() {
    let settings = settings(5);
    assert!(matches!(
        settings.with_concurrency_limit(0),
        Err(hostcrawl::CrawlError::Config(_))
    ));

    let mut config = http_config(SEED.to_string(), 5);
    config.crawler.concurrency_limit = 0;
    assert!(matches!(
        hostcrawl::crawler::crawl(&config).await,
        Err(hostcrawl::CrawlError::Config(_))
    ));
}

#[tokio::test]
async fn test_zero_concurrency_field_still_completes() {
    let transport = Arc::new(scenario_site());
    let mut settings = settings(10);
    settings.concurrency_limit = 0;

    let report = tokio::time::timeout(Duration::from_secs(5), run(&transport, settings))
        .await
        .expect("crawl should finish");

    assert_eq!(report.pages_visited(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_crawlers_do_not_share_state() {
    let transport = Arc::new(scenario_site());

    let first = run(&transport, settings(10)).await;
    let second = run(&transport, settings(10)).await;

    assert_eq!(first.visited, second.visited);
    assert_eq!(second.pages_crawled, 3);
    // Each crawl fetched its own robots.txt
    assert_eq!(transport.calls_for("https://example.com/robots.txt"), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_visit_callback_sees_every_page() {
    let transport: Arc<dyn Transport> = Arc::new(scenario_site());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let report = Crawler::new(settings(10), transport)
        .on_visit(move |url| sink.lock().unwrap().push(url.to_string()))
        .run()
        .await;

    let mut seen = seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, report.visited);
}

fn http_config(seed: String, max_pages: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: Some(seed),
            max_pages: Some(max_pages),
            concurrency_limit: 5,
            fetch_timeout_ms: 2_000,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0.0".to_string(),
        },
    }
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(
                    r#"<html><head><title>Home</title></head><body>
                    <a href="/page1">Page 1</a>
                    <a href="{}/page2#top">Page 2</a>
                    <a href="/admin">Admin</a>
                    <a href="https://other.invalid/">Elsewhere</a>
                    </body></html>"#,
                    base_url
                ))
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/page2">again</a><a href="/gone">gone</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/">home</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Admin content"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = http_config(format!("{}/", base_url), 10);
    let report = hostcrawl::crawler::crawl(&config)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_crawled, 4);
    assert_eq!(report.fetched, 3);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.rejected.robots_denied, 1);
    assert_eq!(report.rejected.off_host, 1);

    // Wiremock verifies the expect() counts when mock_server drops
}

#[tokio::test]
async fn test_http_budget_of_one() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/a">a</a><a href="/b">b</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = http_config(format!("{}/", base_url), 1);
    let report = hostcrawl::crawler::crawl(&config)
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_crawled, 1);
    assert_eq!(report.visited, vec![format!("{}/", base_url)]);
}
