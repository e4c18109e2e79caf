// ============================================================================
// Vue détail d'un actif
// ============================================================================
// Affiche toutes les informations d'un actif, ou un message si la clé
// demandée est inconnue de CoinCap
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, DetailState, Route};
use crate::models::format::{format_amount, format_usd_text, NOT_AVAILABLE};
use crate::models::Coin;
use crate::ui::dashboard::change_style;

/// Dessine la vue détail dans la zone donnée
pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let key = match &app.route {
        Route::Detail(key) => key.as_str(),
        Route::Home => "",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", app.route.path()));

    let lines = match &app.detail {
        DetailState::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Loading {}...", key),
                Style::default().fg(Color::Yellow),
            )),
        ],
        DetailState::Loaded(coin) => coin_lines(coin),
        DetailState::NotFound => not_found_lines(key),
        // Même message que pour une clé inconnue, l'erreur en dessous
        DetailState::Failed(error) => {
            let mut lines = not_found_lines(key);
            lines.push(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Gray),
            )));
            lines
        }
    };

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "[ESC / Space]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Back  "),
        Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Quit"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(footer, chunks[1]);
}

fn not_found_lines(key: &str) -> Vec<Line<'_>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Asset \"{}\" not found", key),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ]
}

/// Lignes "label : valeur" pour un actif chargé
fn coin_lines(coin: &Coin) -> Vec<Line<'static>> {
    let title = Line::from(Span::styled(
        format!("{} ({})", coin.name, coin.symbol),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ));

    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        title,
        Line::from(""),
        field("Rank", text(&coin.rank)),
        field("Price", coin.formatted_price.clone()),
        field("Market cap", coin.formatted_market.clone()),
        field("Volume (24h)", coin.formatted_volume.clone()),
        field("VWAP (24h)", format_usd_text(coin.vwap_24hr.as_deref().unwrap_or(""))),
        Line::from(vec![
            label("Change (24h)"),
            Span::styled(format!("{}%", coin.formatted_change()), change_style(coin)),
        ]),
        field("Supply", format_amount(coin.supply.as_deref().unwrap_or(""))),
        field("Max supply", format_amount(coin.max_supply.as_deref().unwrap_or(""))),
        field(
            "Market cap (USD)",
            format_usd_text(coin.market_cap_usd.as_deref().unwrap_or("0")),
        ),
        field("Explorer", text(&coin.explorer)),
        field("Icon", coin.icon_url()),
    ]
}

fn label(name: &str) -> Span<'static> {
    Span::styled(
        format!("{:<18}", name),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )
}

fn field(name: &str, value: String) -> Line<'static> {
    Line::from(vec![label(name), Span::raw(value)])
}
