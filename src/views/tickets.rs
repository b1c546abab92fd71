use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::dispatch::{Dispatcher, HomeArgs, Request};
use crate::error::AppError;
use crate::models::{Role, Ticket};
use crate::state::SharedState;

use super::authors::AuthorCache;
use super::board::{StatusFilter, TicketBoard, TicketStats};
use super::forms::Capabilities;

struct TicketRow {
    id: i64,
    title: String,
    description: String,
    status: String,
    author: String,
    created_at: String,
}

#[derive(Template)]
#[template(path = "tickets/table.html")]
struct TicketTableTemplate {
    rows: Vec<TicketRow>,
    error: Option<String>,
    stats: TicketStats,
    filter: String,
    search: String,
    page: usize,
    total_pages: usize,
    can_edit: bool,
    can_delete: bool,
}

#[derive(Deserialize)]
pub struct TableParams {
    pub user_id: i64,
    pub role_id: i64,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
}

/// The home view's ticket table: role-scoped tickets, filtered, searched and
/// paginated, with whole-collection counts.
///
/// Over HTTP there is no session, so each call refetches the snapshot and
/// builds a fresh [`TicketBoard`] and [`AuthorCache`]; the cache only dedupes
/// authors within the rendered page. A long-lived client keeps one board and
/// one cache across page turns to get one lookup per author per session.
pub async fn table_partial(
    State(state): State<SharedState>,
    Query(params): Query<TableParams>,
) -> Result<Html<String>, AppError> {
    let filter_text = params.status.clone().unwrap_or_default();
    let filter = StatusFilter::parse(&filter_text)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown status filter '{filter_text}'")))?;
    let search = params.search.clone().unwrap_or_default();
    let capabilities = Capabilities::for_role(Role::from_id(params.role_id));

    let dispatcher = Dispatcher::new(state.pool.clone());
    let envelope = dispatcher
        .dispatch(Request::HomeTickets(HomeArgs {
            user_id: params.user_id,
            role_id: params.role_id,
        }))
        .await;

    let mut template = TicketTableTemplate {
        rows: Vec::new(),
        error: None,
        stats: TicketStats::default(),
        filter: filter.as_str().to_string(),
        search: search.clone(),
        page: 1,
        total_pages: 0,
        can_edit: capabilities.edit_tickets,
        can_delete: capabilities.delete_tickets,
    };

    if !envelope.success {
        template.error = Some(envelope.error.unwrap_or_default());
        return render(template);
    }
    let Some(tickets) = envelope.data_as::<Vec<Ticket>>() else {
        template.error = Some("Unexpected response from the ticket service".to_string());
        return render(template);
    };

    let mut board = TicketBoard::new(tickets, state.config.page_size);
    board.apply_filter(filter);
    board.apply_search(&search);
    let page = board.paginate(params.page.unwrap_or(1));

    let mut authors = AuthorCache::new();
    let mut rows = Vec::with_capacity(page.items.len());
    for ticket in &page.items {
        rows.push(TicketRow {
            id: ticket.id,
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            status: ticket.status.to_string(),
            author: authors.name_of(&dispatcher, ticket.created_by).await,
            created_at: ticket.created_at.format("%Y-%m-%d %H:%M").to_string(),
        });
    }

    template.rows = rows;
    template.page = page.number;
    template.total_pages = page.total_pages;
    template.stats = board.stats();
    render(template)
}

fn render(template: TicketTableTemplate) -> Result<Html<String>, AppError> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Failed to render ticket table: {e}")))
}
