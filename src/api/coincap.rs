// ============================================================================
// API Client : CoinCap
// ============================================================================
// Récupère la liste paginée des actifs et le détail d'un actif
//
// CONCEPTS RUST :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : gestion d'erreurs avec contexte (anyhow)
// 3. Serde : désérialisation JSON automatique
// ============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::{StatusCode, Url};
use tracing::{debug, error, info, instrument};

use crate::config::{Config, PAGE_SIZE};
use crate::models::coin::timestamp_to_datetime;
use crate::models::{AssetResponse, AssetsResponse, Coin, CoinPage};

/// Client HTTP pour l'API CoinCap
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client contient un Arc interne
/// - Cloner le client partage le même pool de connexions
#[derive(Debug, Clone)]
pub struct CoinCapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinCapClient {
    /// Crée un client à partir de la configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut client = Self::with_base_url(config.api_base())?;
        client.api_key = config.api_key.clone();
        Ok(client)
    }

    /// Crée un client pointant vers une URL de base (ex: serveur de test)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("coinboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Récupère une page d'actifs (PAGE_SIZE éléments à partir de `offset`)
    ///
    /// Les chaînes d'affichage (prix, capitalisation, volume) sont calculées
    /// ici, une fois pour toutes.
    ///
    /// # Exemple
    /// let page = client.fetch_assets(0).await?;
    /// println!("{} actifs", page.len());
    #[instrument(skip(self))]
    pub async fn fetch_assets(&self, offset: usize) -> Result<CoinPage> {
        let url = build_assets_url(&self.base_url, PAGE_SIZE, offset);
        debug!(url = %url, "Built CoinCap assets URL");

        let response = self
            .request(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinCap")?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "CoinCap returned error status");
            anyhow::bail!("CoinCap a retourné une erreur : HTTP {}", status);
        }

        let body: AssetsResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse CoinCap")?;

        let coins: Vec<Coin> = body.data.into_iter().map(Coin::formatted).collect();
        info!(count = coins.len(), "Successfully fetched assets page");

        Ok(CoinPage {
            offset,
            coins,
            fetched_at: timestamp_to_datetime(body.timestamp),
        })
    }

    /// Récupère un actif par son identifiant
    ///
    /// Retourne Ok(None) si CoinCap ne connaît pas cet identifiant (HTTP 404).
    #[instrument(skip(self))]
    pub async fn fetch_asset(&self, id: &str) -> Result<Option<Coin>> {
        // "." et ".." sont normalisés par l'URL : la requête partirait vers
        // /v2/assets. Aucun actif n'a cet id.
        if is_dot_segment(id) {
            info!("Asset not found (dot segment)");
            return Ok(None);
        }

        let url = build_asset_url(&self.base_url, id)?;
        debug!(url = %url, "Built CoinCap asset URL");

        let response = self
            .request(url.as_str())
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinCap")?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            info!("Asset not found");
            return Ok(None);
        }
        if !status.is_success() {
            error!(status = %status, "CoinCap returned error status");
            anyhow::bail!("CoinCap a retourné une erreur : HTTP {}", status);
        }

        let body: AssetResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse CoinCap")?;

        Ok(Some(body.data.formatted()))
    }

    /// Prépare une requête GET avec l'éventuelle clé d'API
    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.get(url);
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

/// Construit l'URL de la liste paginée
fn build_assets_url(base_url: &str, limit: usize, offset: usize) -> String {
    format!("{}/v2/assets?limit={}&offset={}", base_url, limit, offset)
}

fn is_dot_segment(id: &str) -> bool {
    matches!(id, "." | "..")
}

/// Construit l'URL d'un actif
///
/// La clé vient de la saisie utilisateur : elle est ajoutée comme segment
/// de chemin encodé ("a/b c" ne doit pas changer de route).
fn build_asset_url(base_url: &str, id: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{}/v2/assets", base_url))
        .with_context(|| format!("URL de base invalide : {}", base_url))?;

    url.path_segments_mut()
        .map_err(|_| anyhow!("URL de base invalide : {}", base_url))?
        .push(id);

    Ok(url)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn coin_json(id: &str, symbol: &str) -> serde_json::Value {
        json!({
            "id": id,
            "rank": "1",
            "symbol": symbol,
            "name": id,
            "supply": "1000",
            "maxSupply": null,
            "marketCapUsd": "1500000000",
            "volumeUsd24Hr": "2500000",
            "priceUsd": "100",
            "changePercent24Hr": "1.25",
            "vwap24Hr": null,
            "explorer": null
        })
    }

    #[test]
    fn test_build_assets_url() {
        let url = build_assets_url("https://api.coincap.io", 10, 20);
        assert_eq!(url, "https://api.coincap.io/v2/assets?limit=10&offset=20");
    }

    #[test]
    fn test_build_asset_url_encodes_input() {
        let url = build_asset_url("https://api.coincap.io", "bit coin/x").unwrap();
        assert_eq!(url.as_str(), "https://api.coincap.io/v2/assets/bit%20coin%2Fx");
    }

    #[tokio::test]
    async fn test_fetch_assets_sends_limit_and_offset() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/assets")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("offset".into(), "20".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "data": [coin_json("bitcoin", "BTC"), coin_json("ethereum", "ETH")],
                    "timestamp": 1700000000000i64
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        let page = client.fetch_assets(20).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.offset, 20);
        assert_eq!(page.len(), 2);
        assert_eq!(page.coins[0].id, "bitcoin");
        assert_eq!(page.coins[0].formatted_price, "$100.00");
        assert_eq!(page.coins[0].formatted_market, "$1.5B");
        assert_eq!(page.coins[1].formatted_volume, "$2.5M");
        assert!(page.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_fetch_assets_sends_api_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/assets")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer secret")
            .with_status(200)
            .with_body(json!({ "data": [] }).to_string())
            .create_async()
            .await;

        let config = Config {
            api_url: server.url(),
            api_key: Some("secret".to_string()),
            log_dir: None,
        };
        let client = CoinCapClient::new(&config).unwrap();
        let page = client.fetch_assets(0).await.unwrap();

        mock.assert_async().await;
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_assets_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/assets")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        let result = client.fetch_assets(0).await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_assets_malformed_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/assets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "coins": "nope" }"#)
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        assert!(client.fetch_assets(0).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_asset_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/assets/bitcoin")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "data": coin_json("bitcoin", "BTC") }).to_string())
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        let coin = client.fetch_asset("bitcoin").await.unwrap().unwrap();

        assert_eq!(coin.symbol, "BTC");
        assert_eq!(coin.formatted_price, "$100.00");
    }

    #[tokio::test]
    async fn test_fetch_asset_dot_keys_are_not_found() {
        // Aucun mock : une requête vers le serveur retournerait une erreur
        let server = Server::new_async().await;
        let client = CoinCapClient::with_base_url(&server.url()).unwrap();

        assert!(client.fetch_asset(".").await.unwrap().is_none());
        assert!(client.fetch_asset("..").await.unwrap().is_none());
    }

    #[test]
    fn test_is_dot_segment() {
        assert!(is_dot_segment("."));
        assert!(is_dot_segment(".."));
        assert!(!is_dot_segment("..."));
        assert!(!is_dot_segment("bitcoin"));

        // "%2E" est encodé en "%252E", ce n'est plus un point
        let url = build_asset_url("https://api.coincap.io", "%2E").unwrap();
        assert_eq!(url.as_str(), "https://api.coincap.io/v2/assets/%252E");
    }

    #[tokio::test]
    async fn test_fetch_asset_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/assets/bitcoin")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        let result = client.fetch_asset("bitcoin").await;

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_fetch_asset_malformed_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/assets/bitcoin")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "data": [] }"#)
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        assert!(client.fetch_asset("bitcoin").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_asset_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v2/assets/dogecoinx")
            .with_status(404)
            .with_body(json!({ "error": "dogecoinx not found" }).to_string())
            .create_async()
            .await;

        let client = CoinCapClient::with_base_url(&server.url()).unwrap();
        assert!(client.fetch_asset("dogecoinx").await.unwrap().is_none());
    }
}
