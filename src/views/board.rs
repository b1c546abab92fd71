//! Client-side view over a fetched ticket collection: status filter, free
//! text search and pagination, all without going back to the store.

use serde::{Deserialize, Serialize};

use crate::models::{Ticket, TicketStatus};

/// Page size of the home view.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TicketStatus),
}

impl StatusFilter {
    /// `"all"` (or empty) means no filter; anything else must name a status.
    pub fn parse(s: &str) -> Option<StatusFilter> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Some(StatusFilter::All);
        }
        TicketStatus::parse(s).map(StatusFilter::Only)
    }

    pub fn admits(self, ticket: &Ticket) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => ticket.status == status,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }
}

/// Counts over the whole scoped collection, independent of filter and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    /// 1-based, always within `[1, max(total_pages, 1)]`.
    pub number: usize,
    /// `ceil(matching / page_size)`; zero when nothing matches.
    pub total_pages: usize,
    pub matching: usize,
    pub items: Vec<&'a Ticket>,
}

#[derive(Debug, Clone)]
pub struct TicketBoard {
    tickets: Vec<Ticket>,
    filter: StatusFilter,
    search: String,
    current_page: usize,
    page_size: usize,
}

impl TicketBoard {
    /// Takes a snapshot, newest tickets first. A `page_size` of zero is
    /// treated as one.
    pub fn new(mut tickets: Vec<Ticket>, page_size: usize) -> Self {
        tickets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        TicketBoard {
            tickets,
            filter: StatusFilter::All,
            search: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace the snapshot after a refetch, keeping filter and search.
    pub fn reload(&mut self, tickets: Vec<Ticket>) {
        let fresh = TicketBoard::new(tickets, self.page_size);
        self.tickets = fresh.tickets;
        self.current_page = 1;
    }

    pub fn apply_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.current_page = 1;
    }

    /// Search runs on top of the status filter; neither clears the other.
    pub fn apply_search(&mut self, query: &str) {
        self.search = query.trim().to_lowercase();
        self.current_page = 1;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn filtered(&self) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| self.filter.admits(t))
            .filter(|t| self.matches_search(t))
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size)
    }

    /// Move to `page`, clamped into range, and return it.
    pub fn paginate(&mut self, page: i64) -> Page<'_> {
        let last = self.total_pages().max(1) as i64;
        self.current_page = page.clamp(1, last) as usize;
        self.page()
    }

    /// The current page. Clamping happens in [`TicketBoard::paginate`];
    /// filter and search changes reset to page 1.
    pub fn page(&self) -> Page<'_> {
        let filtered = self.filtered();
        let total_pages = filtered.len().div_ceil(self.page_size);
        let number = self.current_page.clamp(1, total_pages.max(1));
        let items = filtered
            .iter()
            .skip((number - 1) * self.page_size)
            .take(self.page_size)
            .copied()
            .collect();

        Page {
            number,
            total_pages,
            matching: filtered.len(),
            items,
        }
    }

    pub fn stats(&self) -> TicketStats {
        let mut stats = TicketStats {
            total: self.tickets.len(),
            ..TicketStats::default()
        };
        for ticket in &self.tickets {
            match ticket.status {
                TicketStatus::Open => stats.open += 1,
                TicketStatus::InProgress => stats.in_progress += 1,
                TicketStatus::Closed => stats.closed += 1,
            }
        }
        stats
    }

    fn matches_search(&self, ticket: &Ticket) -> bool {
        if self.search.is_empty() {
            return true;
        }
        [
            ticket.title.as_str(),
            ticket.description.as_str(),
            ticket.status.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&self.search))
    }
}
