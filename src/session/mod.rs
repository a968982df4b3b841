pub mod retry;

use std::sync::Arc;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use tokio::task::JoinSet;

use crate::model::Address;
use crate::orchestrator::{self, PageFetch};
use crate::pager::{Command, Event, Navigation, PagerState};
use crate::source::RecordSource;
use crate::window::DEFAULT_PAGE_SIZE;

pub use retry::RetryPolicy;

#[derive(Clone, Copy, Debug)]
pub struct SessionOptions {
    pub page_size: u64,
    pub initial_page: u64,
    pub retry: RetryPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            initial_page: 1,
            retry: RetryPolicy::default(),
        }
    }
}

/// Drives a [`PagerState`] against a [`RecordSource`].
///
/// Commands emitted by the controller run as tasks in a [`JoinSet`], so
/// several orchestrations may overlap; the generation check in the
/// controller decides which one gets committed. A command task that dies
/// reports the failure event of its command instead.
pub struct Session<S> {
    source: Arc<S>,
    state: PagerState,
    retry: RetryPolicy,
    progress: Option<(MultiProgress, ProgressStyle)>,
    tasks: JoinSet<Event>,
}

impl<S> Session<S>
where
    S: RecordSource + 'static,
{
    pub fn new(source: S, options: SessionOptions) -> Self {
        Self {
            source: Arc::new(source),
            state: PagerState::new(options.page_size, options.initial_page),
            retry: options.retry,
            progress: None,
            tasks: JoinSet::new(),
        }
    }

    /// Draws one bar per page orchestration under `multi`.
    pub fn with_progress(mut self, multi: MultiProgress, style: ProgressStyle) -> Self {
        self.progress = Some((multi, style));
        self
    }

    pub fn dispatch(&mut self, event: Event) {
        if let Event::PageLoaded { generation, fetch } = &event {
            if !self.state.is_current(*generation) {
                debug!(
                    "discarding page from generation {generation}, current is {}",
                    self.state.generation()
                );
            } else if !fetch.failed.is_empty() {
                info!(
                    "page {} loaded with {} of {} records missing",
                    self.state.current_page(),
                    fetch.failed.len(),
                    self.state.window().len()
                );
            }
        }
        for command in self.state.apply(event) {
            self.spawn(command);
        }
    }

    // overlapping orchestrations never share a bar
    fn page_progress(&self, len: u64) -> ProgressBar {
        match &self.progress {
            Some((multi, style)) => multi.add(ProgressBar::new(len).with_style(style.clone())),
            None => ProgressBar::hidden(),
        }
    }

    fn spawn(&mut self, command: Command) {
        let fallback = failure_event(&command);
        let pb = match &command {
            Command::FetchPage { window, .. } => self.page_progress(window.len()),
            _ => ProgressBar::hidden(),
        };
        let source = Arc::clone(&self.source);
        let retry = self.retry;
        let worker_pb = pb.clone();
        let worker = tokio::spawn(async move {
            execute(source.as_ref(), command, &retry, &worker_pb).await
        });
        self.tasks.spawn(async move {
            match worker.await {
                Ok(event) => event,
                Err(e) => {
                    warn!("command task failed: {e}");
                    pb.finish_and_clear();
                    fallback
                }
            }
        });
    }

    /// Waits for the next command result, or returns `None` when nothing is
    /// in flight.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.tasks.join_next().await? {
                Ok(event) => return Some(event),
                Err(e) => warn!("command task aborted: {e}"),
            }
        }
    }

    /// Applies command results until no command is left in flight.
    pub async fn settle(&mut self) {
        while let Some(event) = self.next_event().await {
            self.dispatch(event);
        }
    }

    pub async fn start(&mut self) {
        self.dispatch(Event::Started);
        self.settle().await;
    }

    pub async fn go_to_page(&mut self, page: u64) {
        self.dispatch(Event::Navigate(Navigation::GoTo(page)));
        self.settle().await;
    }

    pub async fn next_page(&mut self) {
        self.dispatch(Event::Navigate(Navigation::Next));
        self.settle().await;
    }

    pub async fn previous_page(&mut self) {
        self.dispatch(Event::Navigate(Navigation::Previous));
        self.settle().await;
    }

    pub fn set_filter_query(&mut self, query: impl Into<String>) {
        self.dispatch(Event::QueryChanged(query.into()));
    }

    pub fn current_page(&self) -> &[Address] {
        self.state.addresses()
    }

    pub fn filtered_page(&self) -> Vec<&Address> {
        self.state.filtered()
    }

    pub fn filtered_page_for(&self, query: &str) -> Vec<&Address> {
        self.state.filtered_with(query)
    }

    pub fn state(&self) -> &PagerState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }
}

// what a command reports when its task never produced a result
fn failure_event(command: &Command) -> Event {
    match command {
        Command::FetchMenu => Event::MenuFailed,
        Command::FetchTotalCount => Event::TotalCountFailed,
        Command::FetchPage { generation, window } => Event::PageLoaded {
            generation: *generation,
            fetch: PageFetch {
                addresses: Vec::new(),
                failed: window.ids().collect(),
            },
        },
    }
}

async fn execute<S>(source: &S, command: Command, retry: &RetryPolicy, pb: &ProgressBar) -> Event
where
    S: RecordSource + ?Sized,
{
    match command {
        Command::FetchMenu => {
            match retry::with_backoff(retry, "menu", || source.menu_items()).await {
                Ok(items) => Event::MenuLoaded(items),
                Err(e) => {
                    warn!("menu unavailable: {e}");
                    Event::MenuFailed
                }
            }
        }
        Command::FetchTotalCount => {
            match retry::with_backoff(retry, "total count", || source.total_count()).await {
                Ok(total) => Event::TotalCountLoaded(total),
                Err(e) => {
                    warn!("total count unavailable, no pages can be shown: {e}");
                    Event::TotalCountFailed
                }
            }
        }
        Command::FetchPage { generation, window } => Event::PageLoaded {
            generation,
            fetch: orchestrator::fetch_window(source, window, pb).await,
        },
    }
}
