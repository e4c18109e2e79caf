// ============================================================================
// Module : api
// ============================================================================
// Clients API pour récupérer les données de marché (CoinCap)
// ============================================================================

pub mod coincap;  // Client API CoinCap

// Re-export du client principal
pub use coincap::CoinCapClient;
