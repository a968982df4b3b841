//! Pagination controller.
//!
//! [`PagerState`] owns everything the table shows: the page counter, the
//! total count snapshot, the loaded page, the filter query and the menu. It
//! never performs I/O. Feeding it an [`Event`] mutates the state and returns
//! the [`Command`]s that the caller has to execute; their results come back
//! as further events.
//!
//! Every page fetch is tagged with a generation. Only the result carrying
//! the latest generation is committed, so a slow fetch for a page the user
//! already left cannot overwrite the page they navigated to.

use crate::filter;
use crate::model::{Address, MenuItem};
use crate::orchestrator::PageFetch;
use crate::window::{self, PageWindow, DEFAULT_PAGE_SIZE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountStatus {
    Pending,
    Loaded,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Previous,
    Next,
    GoTo(u64),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Started,
    TotalCountLoaded(u64),
    TotalCountFailed,
    MenuLoaded(Vec<MenuItem>),
    MenuFailed,
    PageLoaded { generation: u64, fetch: PageFetch },
    Navigate(Navigation),
    QueryChanged(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    FetchMenu,
    FetchTotalCount,
    FetchPage { generation: u64, window: PageWindow },
}

#[derive(Clone, Debug)]
pub struct PagerState {
    current_page: u64,
    page_size: u64,
    total_count: u64,
    count_status: CountStatus,
    generation: u64,
    loading: bool,
    addresses: Vec<Address>,
    failed: Vec<u64>,
    query: String,
    menu: Vec<MenuItem>,
}

impl Default for PagerState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, 1)
    }
}

impl PagerState {
    pub fn new(page_size: u64, initial_page: u64) -> Self {
        Self {
            current_page: initial_page.max(1),
            page_size: page_size.max(1),
            total_count: 0,
            count_status: CountStatus::Pending,
            generation: 0,
            loading: false,
            addresses: Vec::new(),
            failed: Vec::new(),
            query: String::new(),
            menu: Vec::new(),
        }
    }

    pub fn apply(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Started => {
                self.count_status = CountStatus::Pending;
                vec![Command::FetchMenu, Command::FetchTotalCount]
            }
            Event::TotalCountLoaded(total) => {
                self.total_count = total;
                self.count_status = CountStatus::Loaded;
                self.request_current_page()
            }
            Event::TotalCountFailed => {
                self.total_count = 0;
                self.count_status = CountStatus::Failed;
                self.request_current_page()
            }
            Event::MenuLoaded(items) => {
                self.menu = items;
                Vec::new()
            }
            Event::MenuFailed => {
                self.menu.clear();
                Vec::new()
            }
            Event::PageLoaded { generation, fetch } => {
                if generation == self.generation {
                    self.addresses = fetch.addresses;
                    self.failed = fetch.failed;
                    self.loading = false;
                }
                Vec::new()
            }
            Event::Navigate(nav) => self.navigate(nav),
            Event::QueryChanged(query) => {
                self.query = query;
                Vec::new()
            }
        }
    }

    fn navigate(&mut self, nav: Navigation) -> Vec<Command> {
        match nav {
            Navigation::Previous => {
                if !self.can_previous() {
                    return Vec::new();
                }
                self.current_page -= 1;
            }
            Navigation::Next => {
                if !self.can_next() {
                    return Vec::new();
                }
                self.current_page += 1;
            }
            Navigation::GoTo(page) => {
                self.current_page = page.max(1);
            }
        }
        self.request_current_page()
    }

    // starts a new generation for the page the counter now points at
    fn request_current_page(&mut self) -> Vec<Command> {
        if self.count_status == CountStatus::Pending {
            return Vec::new();
        }
        self.generation += 1;
        let window = self.window();
        if window.is_empty() {
            self.addresses.clear();
            self.failed.clear();
            self.loading = false;
            return Vec::new();
        }
        self.loading = true;
        vec![Command::FetchPage {
            generation: self.generation,
            window,
        }]
    }

    pub fn can_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page.saturating_mul(self.page_size) < self.total_count
    }

    pub fn window(&self) -> PageWindow {
        PageWindow::for_page(self.current_page, self.page_size, self.total_count)
    }

    pub fn page_count(&self) -> u64 {
        window::page_count(self.page_size, self.total_count)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn count_status(&self) -> CountStatus {
        self.count_status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn failed_ids(&self) -> &[u64] {
        &self.failed
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn menu(&self) -> &[MenuItem] {
        &self.menu
    }

    pub fn filtered(&self) -> Vec<&Address> {
        filter::filter_by_street(&self.addresses, &self.query)
    }

    pub fn filtered_with(&self, query: &str) -> Vec<&Address> {
        filter::filter_by_street(&self.addresses, query)
    }
}
