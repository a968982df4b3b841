pub(crate) mod support;

use std::time::Duration;

use crate::filter::filter_by_street;
use crate::model::Address;
use crate::pager::{Event, Navigation, PagerState};
use crate::session::{RetryPolicy, Session, SessionOptions};
use crate::window::PageWindow;
use support::StubSource;

fn fast_retry() -> SessionOptions {
    SessionOptions {
        retry: RetryPolicy {
            attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        },
        ..SessionOptions::default()
    }
}

#[test]
fn window_table_for_twenty_five_records() {
    let windows: Vec<_> = (1..=4).map(|p| PageWindow::for_page(p, 10, 25)).collect();
    assert_eq!(windows[0].ids(), 1..=10);
    assert_eq!(windows[1].ids(), 11..=20);
    assert_eq!(windows[2].ids(), 21..=25);
    assert!(windows[3].is_empty());
}

#[test]
fn street_filter_over_loaded_page() {
    let rows: Vec<Address> = ["1 Main St", "2 Oak Rd", "3 Main Ave"]
        .iter()
        .enumerate()
        .map(|(i, street)| Address {
            id: i as u64 + 1,
            street: street.to_string(),
            ..Default::default()
        })
        .collect();
    for query in ["Main", "main", "MAIN"] {
        let found: Vec<u64> = filter_by_street(&rows, query).iter().map(|a| a.id).collect();
        assert_eq!(found, vec![1, 3]);
    }
    assert_eq!(filter_by_street(&rows, "").len(), 3);
}

#[test]
fn controls_follow_page_bounds() {
    let mut state = PagerState::new(10, 1);
    state.apply(Event::Started);
    state.apply(Event::TotalCountLoaded(20));
    assert!(!state.can_previous());
    assert!(state.can_next());
    state.apply(Event::Navigate(Navigation::Next));
    assert!(state.can_previous());
    assert!(!state.can_next());
}

#[tokio::test]
async fn browse_all_pages_with_gaps() {
    let source = StubSource::with_total(23).failing([4, 15, 23]);
    let mut session = Session::new(source, fast_retry());
    session.start().await;

    let mut seen: Vec<u64> = Vec::new();
    loop {
        seen.extend(session.current_page().iter().map(|a| a.id));
        if !session.state().can_next() {
            break;
        }
        session.next_page().await;
    }

    let expected: Vec<u64> = (1..=23).filter(|id| ![4, 15, 23].contains(id)).collect();
    assert_eq!(seen, expected);
    assert_eq!(session.state().current_page(), 3);
}

#[tokio::test]
async fn filter_survives_page_change() {
    let mut session = Session::new(StubSource::with_total(25), fast_retry());
    session.start().await;
    session.set_filter_query("1");

    let first: Vec<u64> = session.filtered_page().iter().map(|a| a.id).collect();
    assert_eq!(first, vec![1, 10]);

    session.next_page().await;
    let second: Vec<u64> = session.filtered_page().iter().map(|a| a.id).collect();
    assert_eq!(second, (11..=19).collect::<Vec<_>>());
    assert_eq!(session.state().query(), "1");
}
