use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use ticketdesk::dispatch::Envelope;
use ticketdesk::models::{Role, Ticket, TicketStatus, UserWithRole};
use ticketdesk::views::authors::{AuthorCache, UserDirectory, UNKNOWN_AUTHOR};
use ticketdesk::views::board::{StatusFilter, TicketBoard, TicketStats};
use ticketdesk::views::forms::{assignable_users, Capabilities, TicketForm, ValidationError};

fn ticket(id: i64, title: &str, status: TicketStatus) -> Ticket {
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    Ticket {
        id,
        title: title.to_string(),
        description: format!("details for {title}"),
        category_id: 1,
        created_by: 100 + id % 3,
        assigned_to: None,
        created_at: base + Duration::minutes(id),
        status,
    }
}

/// Ids 1..=n, cycling Open, InProgress, Closed.
fn tickets(n: i64) -> Vec<Ticket> {
    (1..=n)
        .map(|id| {
            let status = TicketStatus::ALL[(id as usize - 1) % 3];
            ticket(id, &format!("Ticket {id}"), status)
        })
        .collect()
}

fn page_ids(board: &mut TicketBoard, page: i64) -> Vec<i64> {
    board.paginate(page).items.iter().map(|t| t.id).collect()
}

// ── Pagination ──────────────────────────────────────────────────

#[test]
fn pages_cover_every_item_exactly_once() {
    for n in [0, 1, 4, 5, 6, 23] {
        for page_size in [1, 3, 5, 10] {
            let mut board = TicketBoard::new(tickets(n), page_size);
            let total_pages = board.total_pages();
            assert_eq!(total_pages, (n as usize).div_ceil(page_size));

            let mut seen = Vec::new();
            for page in 1..=total_pages as i64 {
                let items = page_ids(&mut board, page);
                assert!(items.len() <= page_size);
                seen.extend(items);
            }
            seen.sort();
            assert_eq!(seen, (1..=n).collect::<Vec<_>>(), "n={n} page_size={page_size}");
        }
    }
}

#[test]
fn out_of_range_pages_are_clamped() {
    let mut board = TicketBoard::new(tickets(12), 5);

    let page = board.paginate(0);
    assert_eq!(page.number, 1);
    let page = board.paginate(-3);
    assert_eq!(page.number, 1);
    let page = board.paginate(99);
    assert_eq!(page.number, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(board.current_page(), 3);
}

#[test]
fn empty_collection_yields_single_empty_page() {
    let mut board = TicketBoard::new(Vec::new(), 5);
    let page = board.paginate(4);
    assert_eq!(page.number, 1);
    assert_eq!(page.total_pages, 0);
    assert!(page.items.is_empty());
}

#[test]
fn newest_tickets_come_first() {
    let mut board = TicketBoard::new(tickets(3), 10);
    assert_eq!(page_ids(&mut board, 1), vec![3, 2, 1]);
}

#[test]
fn zero_page_size_is_treated_as_one() {
    let board = TicketBoard::new(tickets(3), 0);
    assert_eq!(board.page_size(), 1);
    assert_eq!(board.total_pages(), 3);
}

// ── Filter and search ───────────────────────────────────────────

#[test]
fn filter_keeps_only_matching_status_and_resets_page() {
    let mut board = TicketBoard::new(tickets(9), 2);
    board.paginate(3);

    board.apply_filter(StatusFilter::Only(TicketStatus::Closed));
    assert_eq!(board.current_page(), 1);
    let filtered = board.filtered();
    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|t| t.status == TicketStatus::Closed));

    board.apply_filter(StatusFilter::All);
    assert_eq!(board.filtered().len(), 9);
}

#[test]
fn search_is_case_insensitive_over_title_description_and_status() {
    let mut all = tickets(3);
    all.push(ticket(4, "Printer JAM", TicketStatus::Open));
    let mut board = TicketBoard::new(all, 10);

    board.apply_search("printer jam");
    assert_eq!(board.filtered().len(), 1);

    board.apply_search("DETAILS FOR TICKET 2");
    assert_eq!(board.filtered().iter().map(|t| t.id).collect::<Vec<_>>(), vec![2]);

    board.apply_search("inprogress");
    assert!(board
        .filtered()
        .iter()
        .all(|t| t.status == TicketStatus::InProgress));

    board.apply_search("   ");
    assert_eq!(board.filtered().len(), 4);
}

#[test]
fn search_within_filter_never_escapes_the_filter() {
    let mut board = TicketBoard::new(tickets(12), 5);
    board.apply_filter(StatusFilter::Only(TicketStatus::Open));
    board.apply_search("ticket");

    let filtered = board.filtered();
    assert_eq!(filtered.len(), 4);
    assert!(filtered.iter().all(|t| t.status == TicketStatus::Open));

    // Changing the filter keeps the search and vice versa.
    board.apply_filter(StatusFilter::Only(TicketStatus::Closed));
    assert_eq!(board.search(), "ticket");
    board.apply_search("ticket 1");
    assert_eq!(board.filter(), StatusFilter::Only(TicketStatus::Closed));
    assert!(board
        .filtered()
        .iter()
        .all(|t| t.status == TicketStatus::Closed));
}

#[test]
fn status_filter_parsing() {
    assert_eq!(StatusFilter::parse("all"), Some(StatusFilter::All));
    assert_eq!(StatusFilter::parse(""), Some(StatusFilter::All));
    assert_eq!(
        StatusFilter::parse("inprogress"),
        Some(StatusFilter::Only(TicketStatus::InProgress))
    );
    assert_eq!(StatusFilter::parse("Offen"), None);
}

// ── Stats ───────────────────────────────────────────────────────

#[test]
fn stats_ignore_filter_and_search() {
    let mut board = TicketBoard::new(tickets(10), 3);
    let expected = TicketStats {
        total: 10,
        open: 4,
        in_progress: 3,
        closed: 3,
    };
    assert_eq!(board.stats(), expected);

    board.apply_filter(StatusFilter::Only(TicketStatus::Closed));
    assert_eq!(board.stats(), expected);
    board.apply_search("no such ticket");
    assert!(board.filtered().is_empty());
    assert_eq!(board.stats(), expected);
}

#[test]
fn reload_replaces_snapshot_but_keeps_filter() {
    let mut board = TicketBoard::new(tickets(3), 5);
    board.apply_filter(StatusFilter::Only(TicketStatus::Open));

    board.reload(tickets(6));
    assert_eq!(board.stats().total, 6);
    assert_eq!(board.filter(), StatusFilter::Only(TicketStatus::Open));
    assert_eq!(board.filtered().len(), 2);
}

// ── Author cache ────────────────────────────────────────────────

struct FakeDirectory {
    names: HashMap<i64, String>,
    lookups: AtomicUsize,
    fail: bool,
}

impl FakeDirectory {
    fn new(names: &[(i64, &str)]) -> Self {
        FakeDirectory {
            names: names.iter().map(|(id, n)| (*id, n.to_string())).collect(),
            lookups: AtomicUsize::new(0),
            fail: false,
        }
    }
}

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn display_name(&self, user_id: i64) -> Result<Option<String>, String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err("store unreachable".to_string());
        }
        Ok(self.names.get(&user_id).cloned())
    }
}

#[tokio::test]
async fn each_author_is_looked_up_once() {
    let directory = FakeDirectory::new(&[(100, "Ann Able"), (101, "Bob Baker")]);
    let mut cache = AuthorCache::new();
    let mut board = TicketBoard::new(tickets(9), 3);

    for page in 1..=3 {
        let authors: Vec<i64> = board.paginate(page).items.iter().map(|t| t.created_by).collect();
        for author in authors {
            cache.name_of(&directory, author).await;
        }
    }

    assert_eq!(directory.lookups.load(Ordering::SeqCst), 3);
    assert_eq!(cache.len(), 3);
    assert_eq!(cache.name_of(&directory, 100).await, "Ann Able");
    assert_eq!(cache.name_of(&directory, 102).await, UNKNOWN_AUTHOR);
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 3);

    cache.clear();
    assert!(cache.is_empty());
    cache.name_of(&directory, 100).await;
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn failed_lookups_are_retried() {
    let mut directory = FakeDirectory::new(&[(100, "Ann Able")]);
    directory.fail = true;
    let mut cache = AuthorCache::new();

    assert_eq!(cache.name_of(&directory, 100).await, UNKNOWN_AUTHOR);
    assert!(cache.is_empty());

    directory.fail = false;
    assert_eq!(cache.name_of(&directory, 100).await, "Ann Able");
    assert_eq!(directory.lookups.load(Ordering::SeqCst), 2);
}

// ── Forms and capabilities ──────────────────────────────────────

#[test]
fn ticket_form_requires_title_description_and_category() {
    let mut form = TicketForm {
        title: "  ".to_string(),
        description: "desc".to_string(),
        category_id: Some(2),
        assigned_to: None,
    };
    assert_eq!(form.validate(1).unwrap_err(), ValidationError::EmptyTitle);

    form.title = "Title".to_string();
    form.description = String::new();
    assert_eq!(form.validate(1).unwrap_err(), ValidationError::EmptyDescription);

    form.description = "desc".to_string();
    form.category_id = None;
    assert_eq!(form.validate(1).unwrap_err(), ValidationError::MissingCategory);

    form.category_id = Some(2);
    let args = form.validate(7).unwrap();
    assert_eq!(args.title, "Title");
    assert_eq!(args.created_by, 7);
    assert_eq!(args.status, TicketStatus::Open);
}

#[test]
fn capabilities_by_role() {
    let admin = Capabilities::for_role(Some(Role::Admin));
    assert!(admin.edit_tickets && admin.delete_tickets && admin.manage_users);

    let support = Capabilities::for_role(Some(Role::Support));
    assert!(support.edit_tickets && support.assign_tickets);
    assert!(!support.manage_users);

    let user = Capabilities::for_role(Some(Role::User));
    assert!(!user.edit_tickets && !user.delete_tickets && !user.manage_users);

    assert_eq!(Capabilities::for_role(None), user);
}

#[test]
fn only_active_staff_are_assignable() {
    let user = |id: i64, role: Role, active: bool| UserWithRole {
        id,
        first_name: "F".to_string(),
        last_name: "L".to_string(),
        email: format!("{id}@test.com"),
        role_id: role.id(),
        role_name: role.name().to_string(),
        active,
    };
    let users = vec![
        user(1, Role::Admin, true),
        user(2, Role::Support, true),
        user(3, Role::User, true),
        user(4, Role::Support, false),
    ];

    let ids: Vec<i64> = assignable_users(&users).iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

// ── Envelope shape ──────────────────────────────────────────────

#[test]
fn envelope_serializes_only_relevant_fields() {
    let ok = serde_json::to_value(Envelope::id(5)).unwrap();
    assert_eq!(ok, serde_json::json!({ "success": true, "id": 5 }));

    let failed = serde_json::to_value(Envelope::failure("boom")).unwrap();
    assert_eq!(failed, serde_json::json!({ "success": false, "error": "boom" }));

    let nobody = serde_json::to_value(Envelope::user(serde_json::Value::Null)).unwrap();
    assert_eq!(nobody, serde_json::json!({ "success": true, "user": null }));
}
