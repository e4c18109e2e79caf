// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Enums : écrans, routes et état de la vue détail
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// ============================================================================

use chrono::{DateTime, Utc};

use crate::config::PAGE_SIZE;
use crate::models::{detail_path, Coin, CoinPage};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : tableau des actifs
    Home,

    /// Saisie de recherche (tableau en arrière-plan)
    Search,

    /// Vue détail d'un actif
    Detail,
}

/// Route courante, équivalent des chemins "/" et "/detail/<clé>"
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    /// Clé brute : identifiant d'une ligne ou saisie de l'utilisateur
    Detail(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Detail(key) => detail_path(key),
        }
    }
}

/// État de chargement de la vue détail
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(Box<Coin>),
    /// CoinCap ne connaît pas cette clé
    NotFound,
    Failed(String),
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Actifs chargés, dans l'ordre d'arrivée des pages
    /// CONCEPT : Append-only
    /// - Chaque page est ajoutée à la fin, jamais remplacée
    pub coins: Vec<Coin>,

    /// Curseur de pagination (0, 10, 20, ...)
    pub offset: usize,

    /// Index de la ligne sélectionnée dans le tableau
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Route courante
    pub route: Route,

    /// État de la vue détail (pour Route::Detail)
    pub detail: DetailState,

    /// Two-step quit : première pression de 'q' = confirmation
    pub confirm_quit: bool,

    /// Indique si des données sont en cours de chargement
    pub is_loading: bool,

    /// Message de chargement optionnel
    pub loading_message: Option<String>,

    /// Buffer de la recherche
    pub input_buffer: String,

    /// Dernière erreur de chargement, affichée dans le footer
    pub status_message: Option<String>,

    /// Horodatage serveur de la dernière page reçue
    pub last_updated: Option<DateTime<Utc>>,
}

impl App {
    /// Crée une nouvelle instance de App avec une liste vide
    pub fn new() -> Self {
        Self {
            running: true,
            coins: Vec::new(),
            offset: 0,
            selected_index: 0,
            current_screen: Screen::Home,
            route: Route::Home,
            detail: DetailState::Loading,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            input_buffer: String::new(),
            status_message: None,
            last_updated: None,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Navigation dans le tableau
    // ========================================================================

    /// Remonte d'une ligne
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Descend d'une ligne (limité à la dernière)
    pub fn navigate_down(&mut self) {
        let max_index = self.coins.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Retourne l'actif sélectionné
    pub fn selected_coin(&self) -> Option<&Coin> {
        self.coins.get(self.selected_index)
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Avance l'offset d'une page et retourne le nouvel offset
    ///
    /// La page 0 est chargée au démarrage : le premier "load more" passe
    /// directement à 10, ensuite on ajoute PAGE_SIZE.
    pub fn load_more(&mut self) -> usize {
        if self.offset == 0 {
            self.offset = PAGE_SIZE;
        } else {
            self.offset += PAGE_SIZE;
        }
        self.offset
    }

    /// Ajoute une page à la fin de la liste
    ///
    /// Pas de déduplication : une même page reçue deux fois donne deux fois
    /// les mêmes lignes.
    pub fn append_page(&mut self, page: CoinPage) {
        if page.fetched_at.is_some() {
            self.last_updated = page.fetched_at;
        }
        self.coins.extend(page.coins);
        self.status_message = None;
    }

    /// Enregistre un échec de chargement (la liste reste inchangée)
    pub fn record_fetch_error(&mut self, message: String) {
        self.status_message = Some(message);
    }

    // ========================================================================
    // Recherche et routes
    // ========================================================================

    /// Ouvre la ligne de recherche
    pub fn start_search(&mut self) {
        self.current_screen = Screen::Search;
    }

    /// Ferme la ligne de recherche sans naviguer
    pub fn cancel_search(&mut self) {
        self.current_screen = Screen::Home;
        self.input_buffer.clear();
    }

    /// Ajoute un caractère au buffer de recherche
    pub fn append_char(&mut self, c: char) {
        self.input_buffer.push(c);
    }

    /// Supprime le dernier caractère du buffer
    pub fn backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Valide la recherche
    ///
    /// Buffer vide : rien ne se passe (None). Sinon on navigue vers
    /// /detail/<saisie brute> et le buffer est vidé.
    pub fn submit_search(&mut self) -> Option<Route> {
        if self.input_buffer.is_empty() {
            return None;
        }

        let key = std::mem::take(&mut self.input_buffer);
        let route = Route::Detail(key);
        self.navigate(route.clone());
        Some(route)
    }

    /// Ouvre la vue détail de la ligne sélectionnée
    pub fn open_selected(&mut self) -> Option<Route> {
        let route = Route::Detail(self.selected_coin()?.id.clone());
        self.navigate(route.clone());
        Some(route)
    }

    /// Change de route
    pub fn navigate(&mut self, route: Route) {
        match &route {
            Route::Home => {
                self.current_screen = Screen::Home;
            }
            Route::Detail(_) => {
                self.current_screen = Screen::Detail;
                self.detail = DetailState::Loading;
            }
        }
        self.route = route;
    }

    /// Retour au tableau (la liste est conservée)
    pub fn back_home(&mut self) {
        self.navigate(Route::Home);
    }

    /// Applique le résultat d'un chargement de détail
    ///
    /// Ignoré si l'utilisateur a changé de route entre-temps.
    pub fn apply_detail(&mut self, key: &str, state: DetailState) {
        if self.route == Route::Detail(key.to_string()) {
            self.detail = state;
        }
    }

    pub fn is_on_home(&self) -> bool {
        self.current_screen == Screen::Home
    }

    pub fn is_in_search(&self) -> bool {
        self.current_screen == Screen::Search
    }

    pub fn is_on_detail(&self) -> bool {
        self.current_screen == Screen::Detail
    }

    // ========================================================================
    // Confirmation de quit
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Chargement
    // ========================================================================

    /// Démarre le chargement avec un message optionnel
    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    /// Termine le chargement
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
