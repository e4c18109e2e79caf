// ============================================================================
// Actions : événements clavier -> état + commandes pour le worker
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des AppCommand au worker thread
// - Le worker exécute les appels HTTP et renvoie des AppResult
// - L'event loop applique les AppResult à l'état (ordre d'arrivée)
// ============================================================================

use std::sync::mpsc;

use tracing::{debug, error, info, warn};

use crate::app::{App, DetailState, Route};
use crate::models::{Coin, CoinPage};
use crate::ui::events::{
    get_char_from_event, is_backspace_event, is_down_event, is_enter_event, is_escape_event,
    is_interrupt_event, is_load_more_event, is_quit_event, is_search_event, is_space_event,
    is_up_event, Event,
};

/// Commandes envoyées au worker thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Charger une page d'actifs à partir de cet offset
    FetchPage { offset: usize },

    /// Charger le détail d'un actif (clé brute : id ou saisie)
    FetchDetail { key: String },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
pub enum AppResult {
    /// Page chargée avec succès
    PageLoaded(CoinPage),

    /// Échec du chargement d'une page
    PageError { offset: usize, error: String },

    /// Réponse pour la vue détail (None : clé inconnue)
    DetailLoaded { key: String, coin: Option<Coin> },

    /// Échec du chargement du détail
    DetailError { key: String, error: String },
}

/// Traite un événement et met à jour l'état de l'application
///
/// En mode recherche, toutes les touches imprimables vont dans le buffer
/// (on doit pouvoir taper "q" ou "m" dans un nom de crypto).
pub fn handle_event(app: &mut App, event: Event, command_tx: &mpsc::Sender<AppCommand>) {
    if is_interrupt_event(&event) {
        info!("User interrupted with Ctrl+C");
        app.quit();
        return;
    }

    if app.is_in_search() {
        handle_search_event(app, &event, command_tx);
        return;
    }

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_up_event(&event) && app.is_on_home() => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_home() => {
            app.cancel_quit();
            app.navigate_down();
        }

        // 'm' : charger la page suivante
        Event::Key(_) if is_load_more_event(&event) && app.is_on_home() => {
            app.cancel_quit();
            let offset = app.load_more();
            info!(offset, "User requested more assets");
            send(command_tx, AppCommand::FetchPage { offset });
        }

        // '/' : ouvrir la recherche
        Event::Key(_) if is_search_event(&event) && app.is_on_home() => {
            app.cancel_quit();
            debug!("User opened search");
            app.start_search();
        }

        // Enter : détail de la ligne sélectionnée
        Event::Key(_) if is_enter_event(&event) && app.is_on_home() => {
            app.cancel_quit();
            if let Some(Route::Detail(key)) = app.open_selected() {
                info!(key = %key, "User opened detail view");
                send(command_tx, AppCommand::FetchDetail { key });
            }
        }

        // ESC ou SPACE : retour au tableau
        Event::Key(_) if (is_escape_event(&event) || is_space_event(&event)) && app.is_on_detail() => {
            app.cancel_quit();
            debug!("User returned to home");
            app.back_home();
        }

        Event::Tick => {}

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }
    }
}

fn handle_search_event(app: &mut App, event: &Event, command_tx: &mpsc::Sender<AppCommand>) {
    if is_escape_event(event) {
        debug!("User cancelled search");
        app.cancel_search();
    } else if is_enter_event(event) {
        match app.submit_search() {
            Some(Route::Detail(key)) => {
                info!(key = %key, "User submitted search");
                send(command_tx, AppCommand::FetchDetail { key });
            }
            _ => debug!("Empty search, ignoring"),
        }
    } else if is_backspace_event(event) {
        app.backspace();
    } else if let Some(c) = get_char_from_event(event) {
        app.append_char(c);
    }
}

/// Applique un résultat du worker à l'état
pub fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::PageLoaded(page) => {
            info!(offset = page.offset, count = page.len(), "Appending assets page");
            app.append_page(page);
        }
        AppResult::PageError { offset, error } => {
            error!(offset, error = %error, "Failed to load assets page");
            app.record_fetch_error(format!("Échec du chargement (offset {}) : {}", offset, error));
        }
        AppResult::DetailLoaded { key, coin: Some(coin) } => {
            info!(key = %key, "Detail loaded");
            app.apply_detail(&key, DetailState::Loaded(Box::new(coin)));
        }
        AppResult::DetailLoaded { key, coin: None } => {
            warn!(key = %key, "Asset not found");
            app.apply_detail(&key, DetailState::NotFound);
        }
        AppResult::DetailError { key, error } => {
            error!(key = %key, error = %error, "Failed to load detail");
            app.apply_detail(&key, DetailState::Failed(error));
        }
    }
}

fn send(command_tx: &mpsc::Sender<AppCommand>, command: AppCommand) {
    if command_tx.send(command).is_err() {
        error!("Worker channel closed, command dropped");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn type_text(app: &mut App, tx: &mpsc::Sender<AppCommand>, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c)), tx);
        }
    }

    fn page(offset: usize, count: usize) -> CoinPage {
        CoinPage {
            offset,
            coins: (0..count)
                .map(|i| Coin::new(&format!("coin-{}", offset + i), "Coin", "CN"))
                .collect(),
            fetched_at: None,
        }
    }

    #[test]
    fn test_load_more_sends_offsets() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new();

        handle_event(&mut app, key(KeyCode::Char('m')), &tx);
        handle_event(&mut app, key(KeyCode::Char('m')), &tx);

        assert_eq!(rx.try_recv().unwrap(), AppCommand::FetchPage { offset: 10 });
        assert_eq!(rx.try_recv().unwrap(), AppCommand::FetchPage { offset: 20 });
    }

    #[test]
    fn test_search_submit_navigates() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new();

        handle_event(&mut app, key(KeyCode::Char('/')), &tx);
        // 'q' et 'm' vont dans le buffer en mode recherche
        type_text(&mut app, &tx, "qmcoin");
        handle_event(&mut app, key(KeyCode::Backspace), &tx);
        handle_event(&mut app, key(KeyCode::Enter), &tx);

        assert_eq!(app.route.path(), "/detail/qmcoi");
        assert!(!app.is_awaiting_quit_confirmation());
        assert_eq!(
            rx.try_recv().unwrap(),
            AppCommand::FetchDetail { key: "qmcoi".to_string() }
        );
    }

    #[test]
    fn test_empty_search_sends_nothing() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new();

        handle_event(&mut app, key(KeyCode::Char('/')), &tx);
        handle_event(&mut app, key(KeyCode::Enter), &tx);

        assert!(rx.try_recv().is_err());
        assert_eq!(app.route, Route::Home);

        handle_event(&mut app, key(KeyCode::Esc), &tx);
        assert!(app.is_on_home());
    }

    #[test]
    fn test_enter_opens_selected_coin() {
        let (tx, rx) = mpsc::channel();
        let mut app = App::new();
        apply_result(&mut app, AppResult::PageLoaded(page(0, 3)));

        handle_event(&mut app, key(KeyCode::Down), &tx);
        handle_event(&mut app, key(KeyCode::Enter), &tx);

        assert_eq!(
            rx.try_recv().unwrap(),
            AppCommand::FetchDetail { key: "coin-1".to_string() }
        );

        apply_result(
            &mut app,
            AppResult::DetailLoaded { key: "coin-1".to_string(), coin: None },
        );
        assert_eq!(app.detail, DetailState::NotFound);

        handle_event(&mut app, key(KeyCode::Esc), &tx);
        assert!(app.is_on_home());
    }

    #[test]
    fn test_results_append_in_arrival_order() {
        let mut app = App::new();

        apply_result(&mut app, AppResult::PageLoaded(page(0, 10)));
        apply_result(&mut app, AppResult::PageLoaded(page(20, 10)));
        apply_result(&mut app, AppResult::PageLoaded(page(10, 10)));

        assert_eq!(app.coins.len(), 30);
        assert_eq!(app.coins[10].id, "coin-20");
        assert_eq!(app.coins[20].id, "coin-10");
    }

    #[test]
    fn test_page_error_leaves_list_unchanged() {
        let mut app = App::new();
        apply_result(&mut app, AppResult::PageLoaded(page(0, 10)));

        apply_result(
            &mut app,
            AppResult::PageError { offset: 10, error: "HTTP 503".to_string() },
        );

        assert_eq!(app.coins.len(), 10);
        assert!(app.status_message.unwrap().contains("HTTP 503"));
    }

    #[test]
    fn test_quit_needs_two_presses() {
        let (tx, _rx) = mpsc::channel();
        let mut app = App::new();

        handle_event(&mut app, key(KeyCode::Char('q')), &tx);
        assert!(app.is_running());

        // Une autre touche annule
        handle_event(&mut app, key(KeyCode::Char('x')), &tx);
        assert!(!app.is_awaiting_quit_confirmation());

        handle_event(&mut app, key(KeyCode::Char('q')), &tx);
        handle_event(&mut app, key(KeyCode::Char('q')), &tx);
        assert!(!app.is_running());
    }
}
