// ============================================================================
// coinboard - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod actions;   // Événements -> commandes, résultats -> état
pub mod api;       // API CoinCap
pub mod app;       // État de l'application
pub mod config;    // Configuration (clap)
pub mod models;    // Structures de données et formatage
pub mod ui;        // Interface utilisateur
