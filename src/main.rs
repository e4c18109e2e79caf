// ============================================================================
// coinboard - point d'entrée
// ============================================================================
// Programme TUI qui liste les actifs CoinCap page par page
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Worker thread : appels HTTP async sans bloquer l'UI
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use coinboard::actions::{apply_result, handle_event, AppCommand, AppResult};
use coinboard::api::CoinCapClient;
use coinboard::app::App;
use coinboard::config::Config;
use coinboard::ui::{render, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=coinboard=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "coinboard.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Utile pour distinguer UI et worker
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour coinboard, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinboard=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du logging")?;

    info!(log_dir = %log_dir.display(), "Logging initialisé");
    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();

    // Logging en premier : si ça échoue, on continue sans
    if let Err(e) = init_logging(&config.log_dir()) {
        eprintln!("Warning: failed to initialize logging: {:#}", e);
    }

    info!(api = %config.api_base(), "coinboard starting up");

    let client = CoinCapClient::new(&config)?;

    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Le worker active/désactive l'indicateur de chargement
    // - L'UI lit l'état à chaque frame
    let app = Arc::new(Mutex::new(App::new()));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    spawn_background_worker(runtime, client, command_rx, result_tx, app.clone());

    // Première page (offset 0), comme au premier affichage
    command_tx
        .send(AppCommand::FetchPage { offset: 0 })
        .context("Worker thread indisponible")?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================

/// Worker thread qui exécute les appels HTTP en arrière-plan
///
/// Les commandes sont traitées une par une, dans l'ordre d'envoi ; chaque
/// résultat repart sur `result_tx`. Pas d'annulation ni de déduplication.
fn spawn_background_worker(
    runtime: tokio::runtime::Runtime,
    client: CoinCapClient,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        // recv() échoue quand l'UI a fermé le channel : le worker s'arrête
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            let message = match &command {
                AppCommand::FetchPage { offset } => format!("Loading assets from {}...", offset),
                AppCommand::FetchDetail { key } => format!("Loading {}...", key),
            };
            if let Ok(mut app_lock) = app.lock() {
                app_lock.start_loading(Some(message));
            }

            let result = match command {
                AppCommand::FetchPage { offset } => {
                    match runtime.block_on(client.fetch_assets(offset)) {
                        Ok(page) => AppResult::PageLoaded(page),
                        Err(e) => AppResult::PageError {
                            offset,
                            error: format!("{:#}", e),
                        },
                    }
                }
                AppCommand::FetchDetail { key } => {
                    match runtime.block_on(client.fetch_asset(&key)) {
                        Ok(coin) => AppResult::DetailLoaded { key, coin },
                        Err(e) => AppResult::DetailError {
                            key,
                            error: format!("{:#}", e),
                        },
                    }
                }
            };

            if result_tx.send(result).is_err() {
                break;
            }

            if let Ok(mut app_lock) = app.lock() {
                app_lock.stop_loading();
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. appliquer les résultats du worker
//   1. dessiner l'interface
//   2. traiter un événement clavier
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        let mut app_lock = app
            .lock()
            .map_err(|_| anyhow::anyhow!("État de l'application corrompu (mutex empoisonné)"))?;

        if !app_lock.is_running() {
            break;
        }

        // CONCEPT : Non-blocking receive avec try_iter
        // - Applique tous les résultats arrivés depuis la dernière frame
        for result in result_rx.try_iter() {
            apply_result(&mut app_lock, result);
        }

        terminal.draw(|frame| render(frame, &app_lock))?;

        // Libère le lock pendant l'attente clavier (le worker en a besoin)
        drop(app_lock);

        let event = events.next()?;

        let mut app_lock = app
            .lock()
            .map_err(|_| anyhow::anyhow!("État de l'application corrompu (mutex empoisonné)"))?;
        handle_event(&mut app_lock, event, &command_tx);
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
