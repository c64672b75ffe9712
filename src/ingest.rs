//! Incremental ingestion run.
//!
//! Init -> FetchIndex -> FilterKnown -> (FetchPage -> ParseEvent) per event
//! -> Merge -> Persist. Only the index fetch can fail the run; event-level
//! failures are logged and retried on the next run because nothing from
//! the event reaches the dataset.

use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::IngestError;
use crate::scraper::parsers::{DateParser, EventPageParser, IndexPageParser, LenientDateParser, ParsedEvent};
use crate::scraper::Transport;
use crate::storage::DatasetStore;
use crate::types::{FightRecord, IndexEntry, OutcomeLabel};

/// Run-level stop signal. In-flight fetches finish; no new ones start.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Knobs for one run
#[derive(Debug, Clone)]
pub struct IngestSettings {
    /// Base for resolving index links
    pub base_url: String,
    pub index_url: String,
    /// Event pages in flight at once
    pub concurrency: usize,
    /// Cap on new events fetched this run
    pub limit: Option<usize>,
    /// Upper bound on one event fetch, retries included
    pub event_timeout: Duration,
}

/// What one run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub new_records: usize,
    pub new_events: usize,
    pub failed_events: Vec<String>,
    /// Fetched but yielded no decided bouts
    pub empty_events: Vec<String>,
    pub cancelled_events: usize,
    /// Last card appended this run, in index order: (name, location)
    pub last_card: Option<(String, Option<String>)>,
    pub labels: BTreeMap<OutcomeLabel, usize>,
    pub persisted: bool,
}

impl RunSummary {
    /// Share of each outcome label among new records
    pub fn label_proportions(&self) -> Vec<(OutcomeLabel, f64)> {
        if self.new_records == 0 {
            return Vec::new();
        }
        self.labels
            .iter()
            .map(|(label, count)| (*label, *count as f64 / self.new_records as f64))
            .collect()
    }
}

enum EventOutcome {
    Parsed(ParsedEvent),
    Failed(String),
    Cancelled,
}

/// Drives a full ingestion run against a transport
pub struct Ingestor<T: Transport> {
    transport: T,
    date_parser: Box<dyn DateParser>,
    settings: IngestSettings,
}

impl<T: Transport> Ingestor<T> {
    pub fn new(transport: T, settings: IngestSettings) -> Self {
        Self {
            transport,
            date_parser: Box::new(LenientDateParser),
            settings,
        }
    }

    #[cfg(test)]
    pub fn with_date_parser(mut self, date_parser: impl DateParser + 'static) -> Self {
        self.date_parser = Box::new(date_parser);
        self
    }

    pub async fn run(&self, store: &DatasetStore, cancel: &CancelFlag) -> Result<RunSummary, IngestError> {
        let mut dataset = store.load();
        let mut known = dataset.known_events();
        if dataset.is_empty() {
            info!("No prior records in {}, starting fresh", store.path().display());
        } else {
            info!("Loaded {} records across {} events", dataset.len(), known.len());
        }

        info!("Fetching index {}", self.settings.index_url);
        let index_html = self
            .transport
            .fetch(&self.settings.index_url)
            .await
            .map_err(IngestError::IndexFetch)?;
        let entries = IndexPageParser::parse(&index_html, &self.settings.base_url);

        let total = entries.len();
        let pending = filter_known(entries, &known, self.settings.limit);
        info!(
            "Index lists {} events, {} already ingested, {} to fetch",
            total,
            total.saturating_sub(pending.len()),
            pending.len()
        );

        let mut outcomes: Vec<(usize, IndexEntry, EventOutcome)> = stream::iter(pending.into_iter().enumerate())
            .map(|(position, entry)| async move {
                let outcome = self.ingest_event(&entry, cancel).await;
                (position, entry, outcome)
            })
            .buffer_unordered(self.settings.concurrency.max(1))
            .collect()
            .await;
        outcomes.sort_by_key(|(position, _, _)| *position);

        let mut summary = RunSummary::default();
        let mut new_records: Vec<FightRecord> = Vec::new();
        for (_, entry, outcome) in outcomes {
            match outcome {
                EventOutcome::Parsed(parsed) if parsed.records.is_empty() => {
                    warn!("{}: no decided bouts on page", entry.name);
                    summary.empty_events.push(entry.name);
                }
                EventOutcome::Parsed(parsed) => {
                    // The page title can differ from the index text
                    if !known.insert(parsed.meta.name.clone()) {
                        warn!(
                            "{}: page title '{}' is already in the dataset, not appending",
                            entry.name, parsed.meta.name
                        );
                        continue;
                    }
                    summary.new_events += 1;
                    for record in &parsed.records {
                        *summary.labels.entry(record.outcome_label).or_insert(0) += 1;
                    }
                    summary.last_card = Some((parsed.meta.name.clone(), parsed.meta.location.clone()));
                    new_records.extend(parsed.records);
                }
                EventOutcome::Failed(reason) => {
                    warn!("{}: skipped, will retry next run: {}", entry.name, reason);
                    summary.failed_events.push(entry.name);
                }
                EventOutcome::Cancelled => summary.cancelled_events += 1,
            }
        }

        summary.new_records = new_records.len();
        if new_records.is_empty() {
            info!("No new fights; dataset left untouched");
            return Ok(summary);
        }

        dataset.append(new_records);
        store.save(&dataset).map_err(IngestError::Persist)?;
        summary.persisted = true;

        Ok(summary)
    }

    async fn ingest_event(&self, entry: &IndexEntry, cancel: &CancelFlag) -> EventOutcome {
        if cancel.is_cancelled() {
            return EventOutcome::Cancelled;
        }

        info!("Now scraping: {}", entry.url);
        let fetched = tokio::time::timeout(self.settings.event_timeout, self.transport.fetch(&entry.url)).await;
        let html = match fetched {
            Ok(Ok(html)) => html,
            Ok(Err(e)) => return EventOutcome::Failed(e.to_string()),
            Err(_) => {
                return EventOutcome::Failed(format!(
                    "no response within {:?}",
                    self.settings.event_timeout
                ))
            }
        };

        let parsed = EventPageParser::parse(&html, &entry.name, self.date_parser.as_ref());
        info!(
            "{}: {} fights, {} rows skipped",
            parsed.meta.name,
            parsed.records.len(),
            parsed.skipped_rows
        );
        EventOutcome::Parsed(parsed)
    }
}

/// Drop already-ingested and repeated events, keeping index order
fn filter_known(entries: Vec<IndexEntry>, known: &HashSet<String>, limit: Option<usize>) -> Vec<IndexEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| !known.contains(&e.name) && seen.insert(e.name.clone()))
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::error::TransportError;
    use crate::scraper::RateLimiter;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::tempdir;

    const BASE: &str = "https://www.betmma.tips/";
    const INDEX: &str = "https://www.betmma.tips/mma_betting_favorites_vs_underdogs.php?Org=1";

    #[derive(Clone)]
    enum Page {
        Html(String),
        Status(u16),
        Hang,
    }

    #[derive(Default)]
    struct FakeTransport {
        pages: Mutex<HashMap<String, Page>>,
        requests: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        fn page(self, url: &str, page: Page) -> Self {
            self.pages.lock().unwrap().insert(url.to_string(), page);
            self
        }

        fn set(&self, url: &str, page: Page) {
            self.pages.lock().unwrap().insert(url.to_string(), page);
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn clear_requests(&self) {
            self.requests.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn fetch(&self, url: &str) -> Result<String, TransportError> {
            self.requests.lock().unwrap().push(url.to_string());
            let page = self.pages.lock().unwrap().get(url).cloned();
            match page.unwrap_or(Page::Status(404)) {
                Page::Html(html) => Ok(html),
                Page::Status(status) => Err(TransportError::Status {
                    url: url.to_string(),
                    status,
                }),
                Page::Hang => std::future::pending().await,
            }
        }
    }

    /// Queues every fetch through a shared limiter, like `HttpTransport`
    struct PacedTransport {
        limiter: RateLimiter,
        inner: FakeTransport,
    }

    #[async_trait]
    impl Transport for PacedTransport {
        async fn fetch(&self, url: &str) -> Result<String, TransportError> {
            self.limiter.acquire().await;
            self.inner.fetch(url).await
        }
    }

    fn event_url(id: u32) -> String {
        format!("{}mma_event_betting_history.php?Event={}", BASE, id)
    }

    fn index_page(events: &[(&str, u32)]) -> String {
        let rows: String = events
            .iter()
            .map(|(name, id)| {
                format!(
                    r#"<tr><td><a href="mma_event_betting_history.php?Event={}">{}</a></td></tr>"#,
                    id, name
                )
            })
            .collect();
        format!(r#"<html><body><table width="98%">{}</table></body></html>"#, rows)
    }

    fn bout(won_red: bool, odds: (&str, &str), red: &str, blue: &str) -> String {
        let (o1, o2, winner) = if won_red { ("WON", "LOST", red) } else { ("LOST", "WON", blue) };
        format!(
            r#"<table cellspacing="5"><tr>
<td align="center" valign="middle">{o1}</td><td align="center" valign="middle">{o2}</td>
<td align="center" valign="middle">@{}</td><td align="center" valign="middle">@{}</td>
<td><a href="fighter_profile.php?FID=1">{red}</a><a href="fighter_profile.php?FID=2">{blue}</a>
<a href="fighter_profile.php?FID=3">{winner}</a></td></tr></table>"#,
            odds.0, odds.1
        )
    }

    fn event_page(title: &str, meta: &str, bouts: &[String]) -> String {
        format!("<html><body><h1>{}</h1><h2>{}</h2>{}</body></html>", title, meta, bouts.join(""))
    }

    fn settings() -> IngestSettings {
        IngestSettings {
            base_url: BASE.to_string(),
            index_url: INDEX.to_string(),
            concurrency: 1,
            limit: None,
            event_timeout: Duration::from_secs(5),
        }
    }

    fn prior_record(event: &str) -> FightRecord {
        FightRecord {
            event_name: event.to_string(),
            location: Some("Las Vegas, Nevada, USA".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 1, 20),
            red_fighter: "Old Red".to_string(),
            blue_fighter: "Old Blue".to_string(),
            winner: "Old Blue".to_string(),
            red_odds: -150,
            blue_odds: 130,
            favorite: "Old Red".to_string(),
            outcome_label: OutcomeLabel::Underdog,
        }
    }

    fn seeded_store(dir: &std::path::Path, events: &[&str]) -> DatasetStore {
        let store = DatasetStore::new(dir.join("odds.csv"));
        let records = events.iter().map(|e| prior_record(e)).collect();
        store.save(&crate::storage::Dataset::new(records)).unwrap();
        store
    }

    fn card_b() -> String {
        event_page(
            "UFC 298: Volkanovski vs. Topuria",
            "Anaheim, California, USA; 17 February 2024",
            &[
                bout(false, ("1.80", "2.10"), "Alexander Volkanovski", "Ilia Topuria"),
                bout(true, ("1.20", "5.00"), "Robert Whittaker", "Paulo Costa"),
                bout(true, ("inf", "1.50"), "Broken", "Row"),
            ],
        )
    }

    #[test]
    fn test_filter_known_keeps_order_and_dedups() {
        let entries = vec![
            IndexEntry { name: "C".into(), url: "c".into() },
            IndexEntry { name: "A".into(), url: "a".into() },
            IndexEntry { name: "B".into(), url: "b".into() },
            IndexEntry { name: "C".into(), url: "c2".into() },
        ];
        let known: HashSet<String> = ["A".to_string()].into_iter().collect();

        let names: Vec<_> = filter_known(entries.clone(), &known, None).into_iter().map(|e| e.url).collect();
        assert_eq!(names, vec!["c", "b"]);

        let limited = filter_known(entries, &known, Some(1));
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_fetches_only_unknown_event_and_appends() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), &["UFC 297: Strickland vs. Du Plessis"]);

        let transport = FakeTransport::default()
            .page(
                INDEX,
                Page::Html(index_page(&[
                    ("UFC 298: Volkanovski vs. Topuria", 2),
                    ("UFC 297: Strickland vs. Du Plessis", 1),
                ])),
            )
            .page(&event_url(2), Page::Html(card_b()));
        let ingestor = Ingestor::new(transport, settings());

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();

        assert_eq!(ingestor.transport.requests(), vec![INDEX.to_string(), event_url(2)]);
        assert_eq!(summary.new_records, 2);
        assert_eq!(summary.new_events, 1);
        assert!(summary.persisted);

        let dataset = store.load();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.records()[0], prior_record("UFC 297: Strickland vs. Du Plessis"));

        let topuria = &dataset.records()[1];
        assert_eq!(topuria.event_name, "UFC 298: Volkanovski vs. Topuria");
        assert_eq!(topuria.location.as_deref(), Some("Anaheim, California, USA"));
        assert_eq!(topuria.date, NaiveDate::from_ymd_opt(2024, 2, 17));
        assert_eq!(topuria.winner, "Ilia Topuria");
        assert_eq!(topuria.outcome_label, OutcomeLabel::Underdog);

        let whittaker = &dataset.records()[2];
        assert_eq!(whittaker.favorite, "Robert Whittaker");
        assert_eq!(whittaker.outcome_label, OutcomeLabel::Favorite);
    }

    #[tokio::test]
    async fn test_second_run_is_a_no_op() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("UFC 298: Volkanovski vs. Topuria", 2)])))
            .page(&event_url(2), Page::Html(card_b()));
        let ingestor = Ingestor::new(transport, settings());

        ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        let before = std::fs::read(store.path()).unwrap();
        ingestor.transport.clear_requests();

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();

        assert_eq!(summary.new_records, 0);
        assert!(!summary.persisted);
        assert_eq!(ingestor.transport.requests(), vec![INDEX.to_string()]);
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_index_failure_is_fatal_and_store_untouched() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), &["UFC 297"]);
        let before = std::fs::read(store.path()).unwrap();

        let transport = FakeTransport::default().page(INDEX, Page::Status(503));
        let ingestor = Ingestor::new(transport, settings());

        let result = ingestor.run(&store, &CancelFlag::new()).await;
        assert!(matches!(result, Err(IngestError::IndexFetch(_))));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
    }

    #[tokio::test]
    async fn test_event_failure_is_skipped_and_retried_next_run() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(
                INDEX,
                Page::Html(index_page(&[("Broken Card", 3), ("UFC 298: Volkanovski vs. Topuria", 2)])),
            )
            .page(&event_url(3), Page::Status(500))
            .page(&event_url(2), Page::Html(card_b()));
        let ingestor = Ingestor::new(transport, settings());

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(summary.failed_events, vec!["Broken Card".to_string()]);
        assert_eq!(summary.new_records, 2);
        assert!(!store.load().known_events().contains("Broken Card"));

        ingestor.transport.set(
            &event_url(3),
            Page::Html(event_page(
                "Broken Card",
                "Paris, France",
                &[bout(true, ("2.50", "1.55"), "Ciryl Gane", "Serghei Spivac")],
            )),
        );
        ingestor.transport.clear_requests();

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(ingestor.transport.requests(), vec![INDEX.to_string(), event_url(3)]);
        assert_eq!(summary.new_records, 1);
        assert_eq!(store.load().len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_run_fetches_no_events() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("UFC 298: Volkanovski vs. Topuria", 2)])))
            .page(&event_url(2), Page::Html(card_b()));
        let ingestor = Ingestor::new(transport, settings());

        let cancel = CancelFlag::new();
        cancel.cancel();
        let summary = ingestor.run(&store, &cancel).await.unwrap();

        assert_eq!(summary.cancelled_events, 1);
        assert_eq!(summary.new_records, 0);
        assert_eq!(ingestor.transport.requests(), vec![INDEX.to_string()]);
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_concurrent_results_merge_in_index_order() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let names = ["Card 1", "Card 2", "Card 3", "Card 4"];
        let mut transport = FakeTransport::default().page(
            INDEX,
            Page::Html(index_page(&names.iter().enumerate().map(|(i, n)| (*n, i as u32)).collect::<Vec<_>>())),
        );
        for (i, name) in names.iter().enumerate() {
            transport = transport.page(
                &event_url(i as u32),
                Page::Html(event_page(name, "Somewhere", &[bout(true, ("1.50", "2.60"), "R", "B")])),
            );
        }
        let ingestor = Ingestor::new(transport, IngestSettings { concurrency: 3, ..settings() });

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();

        assert_eq!(summary.new_events, 4);
        assert_eq!(summary.last_card, Some(("Card 4".to_string(), Some("Somewhere".to_string()))));
        let order: Vec<_> = store.load().records().iter().map(|r| r.event_name.clone()).collect();
        assert_eq!(order, names);
    }

    #[tokio::test]
    async fn test_limit_caps_new_events() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("Card 1", 1), ("Card 2", 2)])))
            .page(&event_url(1), Page::Html(event_page("Card 1", "X", &[bout(true, ("1.50", "2.60"), "R", "B")])));
        let ingestor = Ingestor::new(transport, IngestSettings { limit: Some(1), ..settings() });

        ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(ingestor.transport.requests(), vec![INDEX.to_string(), event_url(1)]);
    }

    #[tokio::test]
    async fn test_retitled_page_is_not_duplicated() {
        let dir = tempdir().unwrap();
        let store = seeded_store(dir.path(), &["UFC 297"]);
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("UFC 297: Strickland vs. Du Plessis", 1)])))
            .page(&event_url(1), Page::Html(event_page("UFC 297", "Toronto", &[bout(true, ("1.50", "2.60"), "R", "B")])));
        let ingestor = Ingestor::new(transport, settings());

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(summary.new_records, 0);
        assert_eq!(store.load().len(), 1);
    }

    #[tokio::test]
    async fn test_page_without_bouts_is_not_recorded() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("Upcoming", 9)])))
            .page(&event_url(9), Page::Html(event_page("Upcoming", "Nowhere", &[])));
        let ingestor = Ingestor::new(transport, settings());

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(summary.empty_events, vec!["Upcoming".to_string()]);
        assert!(!store.path().exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_fetch_times_out_as_event_failure() {
        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("Slow", 1), ("Fast", 2)])))
            .page(&event_url(1), Page::Hang)
            .page(&event_url(2), Page::Html(event_page("Fast", "X", &[bout(true, ("1.50", "2.60"), "R", "B")])));
        let ingestor = Ingestor::new(transport, IngestSettings { concurrency: 2, ..settings() });

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(summary.failed_events, vec!["Slow".to_string()]);
        assert_eq!(summary.new_records, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limiter_queueing_does_not_fail_events() {
        let config = ScraperConfig {
            request_delay_ms: 200,
            requests_per_minute: 600,
            timeout_secs: 1,
            max_retries: 0,
            concurrency: 10,
            ..Default::default()
        };

        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let names: Vec<String> = (0..10).map(|i| format!("Card {}", i)).collect();
        let listing: Vec<(&str, u32)> = names.iter().enumerate().map(|(i, n)| (n.as_str(), i as u32)).collect();
        let mut inner = FakeTransport::default().page(INDEX, Page::Html(index_page(&listing)));
        for (i, name) in names.iter().enumerate() {
            inner = inner.page(
                &event_url(i as u32),
                Page::Html(event_page(name, "Somewhere", &[bout(true, ("1.50", "2.60"), "R", "B")])),
            );
        }
        let transport = PacedTransport {
            limiter: RateLimiter::new(
                config.requests_per_minute,
                Duration::from_millis(config.request_delay_ms),
            ),
            inner,
        };
        let settings = IngestSettings {
            concurrency: config.concurrency,
            event_timeout: config.event_timeout(),
            ..settings()
        };
        let ingestor = Ingestor::new(transport, settings);

        // The last of ten queued grants lands 2s in, past one request timeout
        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();

        assert!(summary.failed_events.is_empty(), "failed: {:?}", summary.failed_events);
        assert_eq!(summary.new_events, 10);
        assert_eq!(ingestor.transport.inner.requests().len(), 11);
    }

    #[tokio::test]
    async fn test_label_proportions_and_custom_date_parser() {
        struct NoDates;
        impl DateParser for NoDates {
            fn parse(&self, _text: &str) -> Option<NaiveDate> {
                None
            }
        }

        let dir = tempdir().unwrap();
        let store = DatasetStore::new(dir.path().join("odds.csv"));
        let transport = FakeTransport::default()
            .page(INDEX, Page::Html(index_page(&[("UFC 298: Volkanovski vs. Topuria", 2)])))
            .page(&event_url(2), Page::Html(card_b()));
        let ingestor = Ingestor::new(transport, settings()).with_date_parser(NoDates);

        let summary = ingestor.run(&store, &CancelFlag::new()).await.unwrap();
        assert_eq!(
            summary.label_proportions(),
            vec![(OutcomeLabel::Favorite, 0.5), (OutcomeLabel::Underdog, 0.5)]
        );
        assert!(store.load().records().iter().all(|r| r.date.is_none()));
    }
}
