use crate::app::{App, CurrentView};
use crate::pages::{login, popups, registers, summary, vehicles};
use crate::state::list::{ListDisplay, Pagination};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs},
};

pub fn render(app: &mut App, frame: &mut Frame) {
    if app.current_view == CurrentView::Login {
        login::render_login(app, frame);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let selected = match app.current_view {
        CurrentView::Registers | CurrentView::Login => 0,
        CurrentView::Vehicles => 1,
        CurrentView::Summary => 2,
    };
    let tabs = Tabs::new(vec!["1 Registros", "2 Vehículos", "3 Resumen"])
        .select(selected)
        .block(Block::default().borders(Borders::ALL).title("Telemetry"))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, layout[0]);

    let hints = match app.current_view {
        CurrentView::Summary => "s/f: dates | g: group | r: reload | L: logout | q: quit",
        CurrentView::Registers => {
            "j/k: move | n/p: page | /: search | g: group | c: clear | Enter: edit | r: reload | q: quit"
        }
        _ => "j/k: move | n/p: page | /: search | g: group | c: clear | r: reload | L: logout | q: quit",
    };

    match app.current_view {
        CurrentView::Registers => registers::render_registers(app, frame, layout[1]),
        CurrentView::Vehicles => vehicles::render_vehicles(app, frame, layout[1]),
        CurrentView::Summary => summary::render_summary(app, frame, layout[1]),
        CurrentView::Login => {}
    }

    frame.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        layout[2],
    );

    if app.editor.is_some() {
        popups::render_edit_modal(app, frame);
    }
    if app.input.mode.is_some() {
        popups::render_input_modal(app, frame);
    }
    if app.alert.is_some() {
        popups::render_alert(app, frame);
    }
}

/// Draws the non-table states of a list and returns `true` if it did, so the
/// caller only builds the table when there are rows.
pub fn render_list_status<T>(
    display: &ListDisplay<'_, T>,
    noun: &str,
    frame: &mut Frame,
    area: Rect,
    block: Block,
) -> bool {
    let paragraph = match display {
        ListDisplay::Loading => Paragraph::new(format!("Loading {noun}..."))
            .style(Style::default().fg(Color::Yellow)),
        ListDisplay::Error(err) => {
            Paragraph::new(format!("Error: {err}")).style(Style::default().fg(Color::Red))
        }
        ListDisplay::Empty => Paragraph::new(format!("No {noun} match the current filters")),
        ListDisplay::Rows(_) => return false,
    };
    frame.render_widget(paragraph.block(block), area);
    true
}

pub fn pagination_title(noun: &str, pagination: Pagination, filters: usize) -> String {
    let mut title = format!(
        "{noun} | Page {}/{} | Total {}",
        pagination.current_page, pagination.total_pages, pagination.total_count
    );
    if filters > 0 {
        title.push_str(&format!(" | {filters} filter(s)"));
    }
    title
}
