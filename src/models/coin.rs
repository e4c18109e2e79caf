// ============================================================================
// Structure : Coin
// ============================================================================
// Représente un actif crypto tel que retourné par l'API CoinCap
//
// CONCEPTS RUST :
// 1. Serde : désérialisation JSON directe vers la structure
// 2. Option<String> : champs pouvant être null dans le JSON
// 3. #[serde(skip)] : champs calculés côté client, absents du JSON
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::format::{
    format_fixed, format_usd_compact_text, format_usd_text, parse_numeric,
};

/// Hôte des icônes d'actifs CoinCap
pub const ICON_BASE_URL: &str = "https://assets.coincap.io/assets/icons";

/// Un actif crypto (une ligne du tableau)
///
/// Les valeurs numériques arrivent en texte ("29123.45...") : on les garde
/// telles quelles et on calcule les chaînes d'affichage une seule fois.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    /// Identifiant CoinCap (ex: "bitcoin")
    pub id: String,

    #[serde(default)]
    pub rank: Option<String>,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// Symbole (ex: "BTC")
    pub symbol: String,

    #[serde(default)]
    pub price_usd: Option<String>,

    #[serde(default, rename = "vwap24Hr")]
    pub vwap_24hr: Option<String>,

    #[serde(default, rename = "changePercent24Hr")]
    pub change_percent_24hr: Option<String>,

    #[serde(default)]
    pub supply: Option<String>,

    #[serde(default)]
    pub max_supply: Option<String>,

    #[serde(default)]
    pub market_cap_usd: Option<String>,

    #[serde(default, rename = "volumeUsd24Hr")]
    pub volume_usd_24hr: Option<String>,

    /// URL de l'explorateur de blocs
    #[serde(default)]
    pub explorer: Option<String>,

    // Valeurs formatées après réception (voir Coin::formatted)
    #[serde(skip)]
    pub formatted_price: String,

    #[serde(skip)]
    pub formatted_market: String,

    #[serde(skip)]
    pub formatted_volume: String,
}

impl Coin {
    /// Crée un Coin minimal (utile pour les tests et la recherche)
    pub fn new(id: &str, name: &str, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            rank: None,
            name: name.to_string(),
            symbol: symbol.to_string(),
            price_usd: None,
            vwap_24hr: None,
            change_percent_24hr: None,
            supply: None,
            max_supply: None,
            market_cap_usd: None,
            volume_usd_24hr: None,
            explorer: None,
            formatted_price: String::new(),
            formatted_market: String::new(),
            formatted_volume: String::new(),
        }
    }

    /// Calcule les trois chaînes d'affichage et retourne le Coin
    ///
    /// CONCEPT RUST : self par valeur
    /// - Consomme le Coin et le rend modifié
    /// - Permet d'écrire coins.into_iter().map(Coin::formatted)
    pub fn formatted(mut self) -> Self {
        self.formatted_price = format_usd_text(field(&self.price_usd));
        self.formatted_market = format_usd_compact_text(field(&self.market_cap_usd));
        self.formatted_volume = format_usd_compact_text(field(&self.volume_usd_24hr));
        self
    }

    /// URL de l'icône (symbole en minuscules)
    pub fn icon_url(&self) -> String {
        format!("{}/{}@2x.png", ICON_BASE_URL, self.symbol.to_lowercase())
    }

    /// Route vers la vue détail de cet actif
    pub fn detail_path(&self) -> String {
        detail_path(&self.id)
    }

    /// Variation sur 24h en pourcentage, si numérique
    pub fn change_percent(&self) -> Option<f64> {
        self.change_percent_24hr.as_deref().and_then(parse_numeric)
    }

    /// Variation sur 24h avec 3 décimales (ex: "2.346")
    pub fn formatted_change(&self) -> String {
        format_fixed(field(&self.change_percent_24hr), 3)
    }

    /// true uniquement si la variation est strictement positive
    pub fn is_positive(&self) -> bool {
        self.change_percent().map(|c| c > 0.0).unwrap_or(false)
    }
}

/// Route de la vue détail pour une clé quelconque (id ou saisie brute)
pub fn detail_path(key: &str) -> String {
    format!("/detail/{}", key)
}

/// Champ numérique du tableau : null ou absent vaut zéro
fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("0")
}

// ============================================================================
// Enveloppes JSON de l'API
// ============================================================================

/// Réponse de /v2/assets : { "data": [...], "timestamp": 1700000000000 }
#[derive(Debug, Deserialize)]
pub struct AssetsResponse {
    pub data: Vec<Coin>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Réponse de /v2/assets/{id} : { "data": {...}, "timestamp": ... }
#[derive(Debug, Deserialize)]
pub struct AssetResponse {
    pub data: Coin,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Une page d'actifs formatés, prête à être ajoutée à la liste
#[derive(Debug, Clone)]
pub struct CoinPage {
    /// Offset demandé pour cette page
    pub offset: usize,
    pub coins: Vec<Coin>,
    /// Horodatage serveur de la réponse
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CoinPage {
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }
}

/// Convertit un timestamp en millisecondes en DateTime<Utc>
pub fn timestamp_to_datetime(millis: Option<i64>) -> Option<DateTime<Utc>> {
    millis.and_then(DateTime::from_timestamp_millis)
}

// ============================================================================
// Tests
// ============================================================================
