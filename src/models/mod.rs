// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : l'actif crypto (Coin), les
// enveloppes JSON de l'API et le formatage monétaire
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod coin;   // Déclaration du module coin (fichier coin.rs)
pub mod format; // Formatage "$1,234.56" et "$1.5B"

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use coinboard::models::coin::Coin;
// On peut faire : use coinboard::models::Coin;
pub use coin::{detail_path, AssetResponse, AssetsResponse, Coin, CoinPage};
