//! Rendering: a pure projection of [`App`] state onto the terminal frame.

use primitive_types::U256;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use serde_json::Value;

use crate::app::{App, InputContext, PopupState, Screen};
use crate::constants::{
    HEADER_HEIGHT, INPUT_HEIGHT, PANEL_HEIGHT, SHORTEN_PREFIX_LEN, SHORTEN_SUFFIX_LEN,
};
use crate::ethereum::{Network, TransactionReceipt};
use crate::theme::{
    ACTIVE_TAB_STYLE, BORDER_STYLE, ERROR_COLOR, FOCUSED_BORDER_STYLE, LABEL_COLOR, MUTED_COLOR,
    PRIMARY_COLOR, SECONDARY_COLOR, SELECTED_ROW_STYLE, SUCCESS_COLOR,
};

/// Render the entire application UI.
pub fn render(app: &App, frame: &mut Frame) {
    let size = frame.area();

    let chunks = Layout::default()
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(size);

    render_header(app, frame, chunks[0]);
    match app.screen {
        Screen::Explorer => render_explorer(app, frame, chunks[1]),
        Screen::Accounts => render_accounts(app, frame, chunks[1]),
    }
    render_footer(app, frame, chunks[2]);

    match &app.popup {
        PopupState::NetworkSelect {
            available_networks,
            selected_index,
        } => render_network_selector(frame, size, available_networks, *selected_index),
        PopupState::Message(message) => render_message_popup(frame, size, message),
        PopupState::None => {}
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(PRIMARY_COLOR));

    frame.render_widget(header_block, area);

    if area.height <= 2 {
        return;
    }

    let tab_style = |screen| {
        if app.screen == screen {
            ACTIVE_TAB_STYLE
        } else {
            Style::default().fg(MUTED_COLOR)
        }
    };

    let title = Line::from(vec![
        "[".into(),
        "lazy".green().bold(),
        "eth".blue().bold(),
        "]  ".into(),
        Span::styled("1 Explorer", tab_style(Screen::Explorer)),
        "  ".into(),
        Span::styled("2 Accounts", tab_style(Screen::Accounts)),
    ]);

    let title_width = 34.min(area.width.saturating_sub(3));
    if title_width == 0 {
        return;
    }
    let title_area = Rect::new(area.x + 2, area.y + 1, title_width, 1);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Left), title_area);

    if area.width > 40 {
        let network_text = format!("Network: {}", app.settings.selected_network.as_str());
        let network_label = Paragraph::new(network_text)
            .style(Style::default().fg(PRIMARY_COLOR))
            .alignment(Alignment::Right);
        let network_area = Rect::new(area.right() - 22, area.y + 1, 20, 1);
        frame.render_widget(network_label, network_area);
    }
}

// --- Explorer screen ---

fn render_explorer(app: &App, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(PANEL_HEIGHT), Constraint::Min(5)])
        .split(area);

    render_block_panel(app, frame, chunks[0]);

    if let Some(receipt) = &app.explorer.receipt {
        render_receipt_details(receipt, frame, chunks[1]);
    } else if app.explorer.block.is_some() {
        render_transaction_table(app, frame, chunks[1]);
    } else {
        let hint = Paragraph::new("No block details fetched. Press 'g' to fetch the latest block.")
            .style(Style::default().fg(MUTED_COLOR))
            .alignment(Alignment::Center)
            .block(bordered_block(" Transactions ", false));
        frame.render_widget(hint, chunks[1]);
    }
}

fn render_block_panel(app: &App, frame: &mut Frame, area: Rect) {
    let panel = bordered_block(" Block ", !app.explorer.in_detail_mode());
    let inner = panel.inner(area);
    frame.render_widget(panel, area);

    let mut lines = Vec::new();
    match app.explorer.height {
        Some(height) => lines.push(Line::from(vec![
            Span::styled("Current height: ", Style::default().fg(MUTED_COLOR)),
            Span::styled(
                height.to_string(),
                Style::default().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   g: fetch block details", Style::default().fg(MUTED_COLOR)),
        ])),
        None => lines.push(Line::from(Span::styled(
            "Fetching current block height...",
            Style::default().fg(MUTED_COLOR),
        ))),
    }

    if let Some(block) = &app.explorer.block {
        lines.push(Line::from(vec![
            Span::styled(
                format!("Block {}", block.number),
                Style::default().fg(SECONDARY_COLOR).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("   {} transactions   ", block.transactions.len())),
            Span::styled(block.timestamp.clone(), Style::default().fg(MUTED_COLOR)),
        ]));
    }

    if let Some(error) = &app.explorer.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(ERROR_COLOR),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_transaction_table(app: &App, frame: &mut Frame, area: Rect) {
    let Some(block) = &app.explorer.block else {
        return;
    };

    let table_block = bordered_block(" Transactions ", true);
    let inner = table_block.inner(area);
    frame.render_widget(table_block, area);

    if block.transactions.is_empty() {
        let empty = Paragraph::new("Block contains no transactions")
            .style(Style::default().fg(MUTED_COLOR))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let header = Row::new(vec!["#", "Hash", "From", "To"])
        .style(Style::default().fg(LABEL_COLOR).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = block
        .transactions
        .iter()
        .enumerate()
        .map(|(i, txn)| {
            Row::new(vec![
                Cell::from((i + 1).to_string()),
                Cell::from(shorten_address(Some(txn.hash.as_str())))
                    .style(Style::default().fg(SECONDARY_COLOR)),
                Cell::from(shorten_address(Some(txn.from.as_str()))),
                Cell::from(shorten_address(txn.to.as_deref())),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(15),
            Constraint::Min(15),
            Constraint::Min(15),
        ],
    )
    .header(header)
    .column_spacing(2)
    .row_highlight_style(SELECTED_ROW_STYLE)
    .highlight_symbol("▶ ");

    let mut table_state = TableState::default().with_selected(app.explorer.selected);
    frame.render_stateful_widget(table, inner, &mut table_state);
}

/// Receipt detail view: every receipt field as a labeled row.
fn render_receipt_details(receipt: &TransactionReceipt, frame: &mut Frame, area: Rect) {
    let detail_block = bordered_block(" Transaction Details ", true);
    let inner = detail_block.inner(area);
    frame.render_widget(detail_block, area);

    let details = vec![
        ("To:", shorten_or_na(receipt.to.as_deref())),
        ("From:", receipt.from.clone()),
        (
            "Contract Address:",
            shorten_or_na(receipt.contract_address.as_deref()),
        ),
        ("Transaction Index:", receipt.transaction_index.to_string()),
        ("Gas Used:", receipt.gas_used.to_string()),
        ("Logs Bloom:", receipt.logs_bloom.clone()),
        ("Transaction Hash:", receipt.transaction_hash.clone()),
        ("Logs:", format_logs(&receipt.logs)),
        ("Block Number:", receipt.block_number.to_string()),
        ("Type:", receipt.txn_type.to_string()),
        ("Status:", status_label(receipt.status).to_string()),
        (
            "Cumulative Gas Used:",
            receipt.cumulative_gas_used.to_string(),
        ),
        (
            "Effective Gas Price:",
            receipt.effective_gas_price.to_string(),
        ),
    ];

    let rows: Vec<Row> = details
        .into_iter()
        .map(|(label, value)| {
            let value_style = match label {
                "Status:" if value == "Success" => Style::default().fg(SUCCESS_COLOR),
                "Status:" => Style::default().fg(ERROR_COLOR),
                _ => Style::default(),
            };
            Row::new(vec![
                Cell::from(label).style(Style::default().fg(LABEL_COLOR)),
                Cell::from(value).style(value_style),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(40)])
        .column_spacing(1);
    frame.render_widget(table, inner);
}

// --- Accounts screen ---

fn render_accounts(app: &App, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(INPUT_HEIGHT), Constraint::Min(3)])
        .split(area);

    let focused = app.input_context() == InputContext::Accounts;
    let input_block = bordered_block(" Ethereum Address ", focused);
    let input_inner = input_block.inner(chunks[0]);
    frame.render_widget(input_block, chunks[0]);

    let input_line = Line::from(vec![
        Span::raw(app.accounts.address.clone()),
        Span::styled("_", Style::default().fg(PRIMARY_COLOR)),
    ]);
    frame.render_widget(Paragraph::new(input_line), input_inner);

    let result_block = bordered_block(" Balance ", false);
    let result_inner = result_block.inner(chunks[1]);
    frame.render_widget(result_block, chunks[1]);

    let mut lines = Vec::new();
    match &app.accounts.balance {
        Some(balance) => lines.push(Line::from(vec![
            Span::styled("Balance: ", Style::default().fg(MUTED_COLOR)),
            Span::styled(
                format_wei(balance),
                Style::default().fg(SUCCESS_COLOR).add_modifier(Modifier::BOLD),
            ),
        ])),
        None => lines.push(Line::from(Span::styled(
            "Enter an address and press Enter to look up its balance.",
            Style::default().fg(MUTED_COLOR),
        ))),
    }
    if let Some(error) = &app.accounts.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(ERROR_COLOR),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), result_inner);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let footer_text = match app.input_context() {
        InputContext::Explorer => {
            "q:Quit  g:Block details  ↑↓:Select  Enter:Receipt  c:Copy  r:Refresh  n:Network  Tab:Accounts"
        }
        InputContext::ExplorerDetail => "Esc:Back  c:Copy hash  Tab:Accounts  q:Quit",
        InputContext::Accounts => "Type address  Enter:Look up  Tab:Explorer  Ctrl+C:Quit",
        InputContext::NetworkSelect => "↑↓:Move  Enter:Select  Esc:Cancel",
        InputContext::MessagePopup => "Esc:Close",
    };
    let footer = Paragraph::new(footer_text)
        .style(Style::default().fg(MUTED_COLOR))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

// --- Popups ---

fn render_network_selector(
    frame: &mut Frame,
    area: Rect,
    networks: &[Network],
    selected_index: usize,
) {
    let popup_area = centered_popup_area(area, 34, (networks.len() as u16) + 4);

    let popup_block = Block::default()
        .title(" Select Network ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(PRIMARY_COLOR));

    frame.render_widget(Clear, popup_area);
    let inner = popup_block.inner(popup_area);
    frame.render_widget(popup_block, popup_area);

    let rows: Vec<Row> = networks
        .iter()
        .enumerate()
        .map(|(i, network)| {
            let style = if i == selected_index {
                Style::default().fg(PRIMARY_COLOR).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                if i == selected_index { "> " } else { "  " },
                network.as_str(),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(2), Constraint::Min(10)]).column_spacing(1);
    frame.render_widget(table, inner);
}

fn render_message_popup(frame: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_popup_area(area, 48, 6);

    let popup_block = Block::default()
        .title(" Message ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(PRIMARY_COLOR));

    frame.render_widget(Clear, popup_area);
    let inner = popup_block.inner(popup_area);
    frame.render_widget(popup_block, popup_area);

    let prompt = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(prompt, inner);
}

// --- Layout helpers ---

fn bordered_block(title: &str, focused: bool) -> Block<'_> {
    let border_style = if focused {
        FOCUSED_BORDER_STYLE
    } else {
        BORDER_STYLE
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_set(border::ROUNDED)
        .border_style(border_style)
}

fn centered_popup_area(parent: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(parent.width.saturating_sub(4));
    let popup_height = height.min(parent.height.saturating_sub(4));
    let popup_x = parent.x + (parent.width.saturating_sub(popup_width)) / 2;
    let popup_y = parent.y + (parent.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}

// --- Formatting helpers ---

/// Shortens a hash or address for table display: the first six characters,
/// an ellipsis, and the last four. Absent values render as "N/A".
pub fn shorten_address(value: Option<&str>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(text) if text.len() >= SHORTEN_PREFIX_LEN + SHORTEN_SUFFIX_LEN => {
            let prefix: String = text.chars().take(SHORTEN_PREFIX_LEN).collect();
            let suffix: String = text
                .chars()
                .skip(text.chars().count() - SHORTEN_SUFFIX_LEN)
                .collect();
            format!("{prefix}...{suffix}")
        }
        Some(text) => text.to_string(),
    }
}

fn shorten_or_na(value: Option<&str>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(text) => text.to_string(),
    }
}

/// Formats a wei balance as an exact decimal string with its unit.
pub fn format_wei(balance: &U256) -> String {
    format!("{balance} wei")
}

/// Maps a receipt status code to its display label.
pub fn status_label(status: u64) -> &'static str {
    if status == 1 { "Success" } else { "Failure" }
}

/// Serializes the full log sequence to compact JSON.
pub fn format_logs(logs: &[Value]) -> String {
    serde_json::to_string(logs).unwrap_or_else(|_| "[]".to_string())
}
