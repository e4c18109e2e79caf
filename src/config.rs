// ============================================================================
// Configuration
// ============================================================================
// Arguments de ligne de commande, chacun pouvant aussi venir de l'environnement
//
// CONCEPT RUST : clap derive
// - #[derive(Parser)] génère le parsing des arguments à partir de la struct
// - #[arg(env = "...")] : lit la variable d'environnement si le flag est absent
// ============================================================================

use std::path::PathBuf;

use clap::Parser;

/// URL par défaut de l'API CoinCap
pub const DEFAULT_API_URL: &str = "https://api.coincap.io";

/// Nombre d'actifs demandés par page
pub const PAGE_SIZE: usize = 10;

/// Configuration de coinboard
#[derive(Debug, Clone, Parser)]
#[command(name = "coinboard", version, about = "Browse CoinCap crypto prices in the terminal")]
pub struct Config {
    /// Base URL of the CoinCap API
    #[arg(long, env = "COINBOARD_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Optional API key, sent as a bearer token
    #[arg(long, env = "COINBOARD_API_KEY")]
    pub api_key: Option<String>,

    /// Directory for the rolling log files
    #[arg(long, env = "COINBOARD_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// URL de base sans "/" final
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Répertoire des logs
    ///
    /// Par défaut :
    /// - Linux/WSL : ~/.local/share/coinboard/logs
    /// - macOS : ~/Library/Application Support/coinboard/logs
    /// - Windows : C:\Users\<user>\AppData\Local\coinboard\logs
    /// - sinon : ./logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("coinboard").join("logs"))
                .unwrap_or_else(|| PathBuf::from("./logs"))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            log_dir: None,
        }
    }
}
