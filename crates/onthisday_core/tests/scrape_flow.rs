use onthisday_core::db::open_db_in_memory;
use onthisday_core::{
    Category, DateOutcome, EventCriteria, EventRepository, FetchedPage, Month, MonthDay,
    PageSource, ScrapeError, ScrapeService, ScrapeSummary, SectionExtractor, SourceError,
    SqliteEventRepository, StalePolicy,
};
use std::cell::RefCell;
use std::collections::HashMap;

const FEBRUARY_14: &str = "\
==Events==
* 1876 – Alexander Graham Bell applies for a patent.
==Births==
* 1766 – Thomas Robert Malthus, English economist (d. 1834)
==Deaths==
* 269 – Saint Valentine, Roman martyr
==Holidays and observances==
*Christian feast day:
**Valentine of Rome
*Valentine's Day
==References==
";

/// In-memory page source keyed by page id, recording every fetch.
#[derive(Default)]
struct FakeSource {
    pages: HashMap<String, Result<FetchedPage, SourceError>>,
    fetched: RefCell<Vec<String>>,
}

impl FakeSource {
    fn with_page(mut self, page_id: &str, revision_id: i64, text: &str) -> Self {
        self.pages.insert(
            page_id.to_string(),
            Ok(FetchedPage {
                revision_id,
                plain_text: text.to_string(),
            }),
        );
        self
    }

    fn with_error(mut self, page_id: &str, error: SourceError) -> Self {
        self.pages.insert(page_id.to_string(), Err(error));
        self
    }
}

impl PageSource for FakeSource {
    fn fetch(&self, page_id: &str) -> Result<FetchedPage, SourceError> {
        self.fetched.borrow_mut().push(page_id.to_string());
        self.pages
            .get(page_id)
            .cloned()
            .unwrap_or_else(|| Err(SourceError::MissingPage(page_id.to_string())))
    }
}

fn feb_14() -> MonthDay {
    MonthDay::new(Month::February, 14).unwrap()
}

#[test]
fn scrape_date_stores_events_and_revision() {
    let conn = open_db_in_memory().unwrap();
    let source = FakeSource::default().with_page("February_14", 100, FEBRUARY_14);
    let service = ScrapeService::new(SqliteEventRepository::new(&conn), &source);

    assert_eq!(service.scrape_date(feb_14()).unwrap(), 5);
    assert_eq!(source.fetched.borrow().as_slice(), ["February_14"]);

    let repo = SqliteEventRepository::new(&conn);
    assert_eq!(repo.get_revision(feb_14()).unwrap(), Some(100));
    let holidays = repo
        .all_events(&EventCriteria::new(None, None, Some(Category::Holidays)).unwrap())
        .unwrap();
    let descriptions: Vec<&str> = holidays.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(
        descriptions,
        ["Christian feast day - Valentine of Rome", "Valentine's Day"]
    );
}

#[test]
fn same_revision_is_skipped_without_writes() {
    let conn = open_db_in_memory().unwrap();
    let source = FakeSource::default().with_page("February_14", 100, FEBRUARY_14);
    let service = ScrapeService::new(SqliteEventRepository::new(&conn), &source);
    service.scrape_date(feb_14()).unwrap();

    let err = service.scrape_date(feb_14()).unwrap_err();
    assert!(matches!(
        err,
        ScrapeError::AlreadyScraped {
            revision_id: 100,
            ..
        }
    ));
    let repo = SqliteEventRepository::new(&conn);
    assert_eq!(repo.count_events(&EventCriteria::any()).unwrap(), 5);
}

#[test]
fn newer_revision_replaces_rows_of_that_date() {
    let conn = open_db_in_memory().unwrap();
    let first = FakeSource::default().with_page("February_14", 100, FEBRUARY_14);
    ScrapeService::new(SqliteEventRepository::new(&conn), &first)
        .scrape_date(feb_14())
        .unwrap();

    let second = FakeSource::default().with_page(
        "February_14",
        101,
        "==Births==\n* 1990 – Only one left\n",
    );
    ScrapeService::new(SqliteEventRepository::new(&conn), &second)
        .scrape_date(feb_14())
        .unwrap();

    let repo = SqliteEventRepository::new(&conn);
    assert_eq!(repo.get_revision(feb_14()).unwrap(), Some(101));
    assert_eq!(repo.count_events(&EventCriteria::any()).unwrap(), 1);
}

#[test]
fn append_policy_keeps_rows_of_older_revision() {
    let conn = open_db_in_memory().unwrap();
    let first = FakeSource::default().with_page("February_14", 100, FEBRUARY_14);
    ScrapeService::new(SqliteEventRepository::new(&conn), &first)
        .with_stale_policy(StalePolicy::Append)
        .scrape_date(feb_14())
        .unwrap();

    let second = FakeSource::default().with_page("February_14", 101, FEBRUARY_14);
    ScrapeService::new(SqliteEventRepository::new(&conn), &second)
        .with_stale_policy(StalePolicy::Append)
        .scrape_date(feb_14())
        .unwrap();

    let repo = SqliteEventRepository::new(&conn);
    assert_eq!(repo.count_events(&EventCriteria::any()).unwrap(), 10);
}

#[test]
fn parse_failure_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let source = FakeSource::default().with_page(
        "February_14",
        7,
        "February 14 may refer to:\n==See also==\n",
    );
    let service = ScrapeService::new(SqliteEventRepository::new(&conn), &source);

    let err = service.scrape_date(feb_14()).unwrap_err();
    assert!(matches!(err, ScrapeError::Parse { .. }));
    assert!(err.to_string().contains("February_14"));

    let repo = SqliteEventRepository::new(&conn);
    assert_eq!(repo.get_revision(feb_14()).unwrap(), None);
    assert_eq!(repo.count_events(&EventCriteria::any()).unwrap(), 0);
}

#[test]
fn source_failure_leaves_revision_untouched() {
    let conn = open_db_in_memory().unwrap();
    let source = FakeSource::default().with_error(
        "February_14",
        SourceError::Transport("connection reset".to_string()),
    );
    let service = ScrapeService::new(SqliteEventRepository::new(&conn), &source);

    let err = service.scrape_date(feb_14()).unwrap_err();
    assert!(matches!(err, ScrapeError::Source(SourceError::Transport(_))));
    assert_eq!(
        SqliteEventRepository::new(&conn)
            .get_revision(feb_14())
            .unwrap(),
        None
    );
}

#[test]
fn custom_extractor_separator_reaches_stored_holidays() {
    let conn = open_db_in_memory().unwrap();
    let source = FakeSource::default().with_page("February_14", 1, FEBRUARY_14);
    ScrapeService::new(SqliteEventRepository::new(&conn), &source)
        .with_extractor(SectionExtractor::with_separator(" / "))
        .scrape_date(feb_14())
        .unwrap();

    let holidays = SqliteEventRepository::new(&conn)
        .all_events(&EventCriteria::new(None, None, Some(Category::Holidays)).unwrap())
        .unwrap();
    assert_eq!(
        holidays[0].description,
        "Christian feast day / Valentine of Rome"
    );
}

#[test]
fn scrape_all_continues_past_failing_dates() {
    let conn = open_db_in_memory().unwrap();
    let source = FakeSource::default()
        .with_page("January_1", 1, "==Events==\n* 1801 – Union\n")
        .with_page("January_2", 2, "no headings here\n")
        .with_page("January_4", 4, "==Deaths==\n* 1961 – Someone\n");
    let repo = SqliteEventRepository::new(&conn);
    repo.set_revision(MonthDay::new(Month::January, 4).unwrap(), 4)
        .unwrap();
    let service = ScrapeService::new(repo, &source);

    let dates: Vec<MonthDay> = (1..=4)
        .map(|day| MonthDay::new(Month::January, day).unwrap())
        .collect();
    let reports = service.scrape_all(dates.clone());

    assert_eq!(reports.len(), 4);
    assert_eq!(
        reports.iter().map(|r| r.date).collect::<Vec<_>>(),
        dates
    );
    assert_eq!(reports[0].outcome, DateOutcome::Inserted(1));
    assert!(matches!(reports[1].outcome, DateOutcome::ParseFailed(_)));
    assert!(matches!(reports[2].outcome, DateOutcome::Failed(_)));
    assert_eq!(reports[3].outcome, DateOutcome::AlreadyScraped);

    let summary = ScrapeSummary::from_reports(&reports);
    assert_eq!(summary.dates_inserted, 1);
    assert_eq!(summary.events_inserted, 1);
    assert_eq!(summary.parse_failures, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.already_scraped, 1);
}
