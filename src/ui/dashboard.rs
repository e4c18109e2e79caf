// ============================================================================
// Dashboard - Rendu de l'écran principal
// ============================================================================
// Header, ligne de recherche, tableau des actifs et footer
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : Block, Paragraph, Table
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::{App, Screen};
use crate::models::Coin;
use crate::ui::detail;

/// Texte d'aide de la recherche
const SEARCH_PLACEHOLDER: &str = "Type a coin id... e.g. bitcoin";

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit l'exhaustivité (tous les écrans gérés)
pub fn render(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Home | Screen::Search => render_home(frame, app),
        Screen::Detail => detail::render_detail(frame, app, frame.size()),
    }
}

/// Style de la colonne "24h" : vert si strictement positif, rouge sinon
pub fn change_style(coin: &Coin) -> Style {
    if coin.is_positive() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
}

/// Dessine l'écran principal
fn render_home(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_search(frame, app, chunks[1]);
    render_table(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Crée le layout principal (header, recherche, tableau, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Recherche
            Constraint::Min(0),    // Tableau : tout le reste
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" coinboard ")
        .title_alignment(Alignment::Center);

    let mut spans = vec![Span::styled(
        format!("{} assets", app.coins.len()),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];

    if let Some(updated) = app.last_updated {
        spans.push(Span::raw(format!(
            "  |  updated {}",
            updated.format("%Y-%m-%d %H:%M:%S UTC")
        )));
    }

    if app.is_loading {
        let message = app.loading_message.as_deref().unwrap_or("Loading...");
        spans.push(Span::styled(
            format!("  |  {}", message),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Recherche
// ============================================================================

/// Ligne de recherche : placeholder grisé, ou buffer + curseur en mode saisie
fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.is_in_search();
    let border_color = if active { Color::Green } else { Color::Cyan };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Search ");

    let line = if active {
        Line::from(vec![
            Span::styled(&app.input_buffer, Style::default().fg(Color::White)),
            Span::styled(
                "█",
                Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
            ),
        ])
    } else {
        Line::from(Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

// ============================================================================
// Tableau des actifs
// ============================================================================

fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Assets ");

    if app.coins.is_empty() {
        let message = if app.is_loading { "Loading..." } else { "No assets loaded" };
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(["Coin", "Market cap", "Price", "Volume", "24h %"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    // CONCEPT RUST : Iterator chaining
    // - .iter() : itère sur les Coin
    // - .map() : transforme chaque Coin en Row
    let rows: Vec<Row> = app
        .coins
        .iter()
        .map(|coin| {
            Row::new(vec![
                Cell::from(format!("{} | {}", coin.name, coin.symbol)),
                Cell::from(coin.formatted_market.as_str()),
                Cell::from(coin.formatted_price.as_str()),
                Cell::from(coin.formatted_volume.as_str()),
                Cell::from(coin.formatted_change()).style(change_style(coin)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(32),
        Constraint::Percentage(17),
        Constraint::Percentage(17),
        Constraint::Percentage(17),
        Constraint::Percentage(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

    // CONCEPT RATATUI : Stateful widget
    // - TableState porte la sélection et le scroll
    // - Le tableau défile pour garder la ligne sélectionnée visible
    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}

// ============================================================================
// Footer
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Yellow)),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK),
            ),
            Span::styled(" again to quit, any other key to cancel", Style::default().fg(Color::Yellow)),
        ])
    } else if app.is_in_search() {
        Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Open  "),
            Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ])
    } else if let Some(status) = &app.status_message {
        Line::from(Span::styled(status.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quit  "),
            Span::styled("[↑↓ / j k]", key_style),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Detail  "),
            Span::styled("[/]", key_style),
            Span::raw(" Search  "),
            Span::styled("[m]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Load more"),
        ])
    };

    let paragraph = Paragraph::new(line).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CoinPage;
    use ratatui::{backend::TestBackend, Terminal};

    fn coin(id: &str, change: &str) -> Coin {
        let mut coin = Coin::new(id, id, &id.to_uppercase());
        coin.price_usd = Some("100".to_string());
        coin.market_cap_usd = Some("1500000000".to_string());
        coin.change_percent_24hr = Some(change.to_string());
        coin.formatted()
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_change_style() {
        assert_eq!(change_style(&coin("up", "1.2")).fg, Some(Color::Green));
        assert_eq!(change_style(&coin("flat", "0")).fg, Some(Color::Red));
        assert_eq!(change_style(&coin("down", "-4")).fg, Some(Color::Red));
    }

    #[test]
    fn test_renders_formatted_rows_in_order() {
        let mut app = App::new();
        app.append_page(CoinPage {
            offset: 0,
            coins: vec![coin("alpha", "1.5")],
            fetched_at: None,
        });
        app.append_page(CoinPage {
            offset: 10,
            coins: vec![coin("omega", "-2")],
            fetched_at: None,
        });

        let screen = draw(&app);

        assert!(screen.contains("$100.00"));
        assert!(screen.contains("$1.5B"));
        assert!(screen.contains("1.500"));
        assert!(screen.contains("-2.000"));

        let alpha = screen.find("alpha | ALPHA").unwrap();
        let omega = screen.find("omega | OMEGA").unwrap();
        assert!(alpha < omega);
    }

    #[test]
    fn test_renders_placeholder_and_search_buffer() {
        let mut app = App::new();
        assert!(draw(&app).contains(SEARCH_PLACEHOLDER));

        app.start_search();
        app.append_char('e');
        app.append_char('t');
        app.append_char('h');
        let screen = draw(&app);
        assert!(screen.contains("eth"));
        assert!(!screen.contains(SEARCH_PLACEHOLDER));
    }

    #[test]
    fn test_renders_status_message() {
        let mut app = App::new();
        app.record_fetch_error("HTTP 500".to_string());
        assert!(draw(&app).contains("HTTP 500"));
    }
}
