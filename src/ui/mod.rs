// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Gestion des événements clavier
pub mod dashboard; // Écran principal : recherche + tableau des actifs
pub mod detail;    // Vue détail d'un actif

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
