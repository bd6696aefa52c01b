use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chem_core::{run_substructure_search, SearchWorker};
use chem_infra::{logging, LogConfig};
use chem_persistence::migrations::run_pending_migrations;
use chem_persistence::{build_pool, DbConfig, PgJobQueue, PgMoleculeStore, PoolProvider};
use chemengine::ChemEngine;
use clap::{Parser, Subcommand};
use diesel::pg::PgConnection;
use diesel::Connection;
use log::{error, info};

/// Herramientas de operación del API de moléculas.
#[derive(Parser)]
#[command(name = "chem", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Consume búsquedas de la cola en Postgres hasta recibir Ctrl-C
    Worker {
        /// Hilos de trabajo; cada uno con su propio pool de conexiones.
        #[arg(short, long, env = "WORKER_CONCURRENCY", default_value_t = 1)]
        concurrency: usize,
        /// Espera entre consultas cuando la cola está vacía.
        #[arg(long, env = "WORKER_POLL_MS", default_value_t = 500)]
        poll_ms: u64,
    },
    /// Aplica las migraciones pendientes
    Migrate,
    /// Ejecuta una búsqueda por subestructura en línea e imprime las coincidencias
    Search {
        #[arg(short, long)]
        query: String,
    },
}

const EXIT_CONFIG: i32 = 2;
const EXIT_SEARCH_FAILED: i32 = 4;
const EXIT_BACKEND: i32 = 5;

fn main() {
    chem_persistence::init_dotenv();
    let cli = Cli::parse();
    if let Err(e) = logging::init(&LogConfig::from_env()) {
        eprintln!("[chem] no se pudo iniciar el logging: {e}");
        std::process::exit(EXIT_CONFIG);
    }
    let cfg = match DbConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[chem] {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };
    let code = match cli.command {
        Commands::Worker { concurrency, poll_ms } => worker(&cfg, concurrency, Duration::from_millis(poll_ms)),
        Commands::Migrate => migrate(&cfg),
        Commands::Search { query } => search(&cfg, &query),
    };
    std::process::exit(code);
}

fn worker(cfg: &DbConfig, concurrency: usize, poll_interval: Duration) -> i32 {
    let shutdown = Arc::new(AtomicBool::new(false));
    let mut handles = Vec::new();
    let mut code = 0;
    for n in 0..concurrency.max(1) {
        // Pool propio por hilo: los workers no comparten conexiones con nadie.
        let pool = match build_pool(&cfg.url, 1, 2) {
            Ok(pool) => pool,
            Err(e) => {
                error!("[chem worker] pool error: {e}");
                code = EXIT_BACKEND;
                break;
            }
        };
        let provider = PoolProvider { pool };
        let store = Arc::new(PgMoleculeStore::new(provider.clone()));
        let queue = Arc::new(PgJobQueue::new(provider));
        let worker = SearchWorker::new(store, queue).with_poll_interval(poll_interval);
        info!("[chem worker] hilo {n} listo");
        handles.push(worker.spawn(shutdown.clone()));
    }
    if code == 0 {
        wait_for_ctrl_c();
        info!("[chem worker] Ctrl-C recibido, terminando trabajos en curso");
    }
    shutdown.store(true, Ordering::Relaxed);
    for handle in handles {
        if handle.join().is_err() {
            error!("[chem worker] un hilo terminó con pánico");
            code = EXIT_BACKEND;
        }
    }
    code
}

fn wait_for_ctrl_c() {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!("[chem worker] no se pudo crear el runtime de señales: {e}");
            return;
        }
    };
    if let Err(e) = runtime.block_on(tokio::signal::ctrl_c()) {
        error!("[chem worker] error esperando Ctrl-C: {e}");
    }
}

fn migrate(cfg: &DbConfig) -> i32 {
    let mut conn = match PgConnection::establish(&cfg.url) {
        Ok(conn) => conn,
        Err(e) => {
            eprintln!("[chem migrate] conexión: {e}");
            return EXIT_BACKEND;
        }
    };
    match run_pending_migrations(&mut conn) {
        Ok(applied) => {
            println!("migraciones aplicadas: {applied}");
            0
        }
        Err(e) => {
            eprintln!("[chem migrate] {e}");
            EXIT_BACKEND
        }
    }
}

fn search(cfg: &DbConfig, query: &str) -> i32 {
    let pool = match build_pool(&cfg.url, 1, 2) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("[chem search] pool error: {e}");
            return EXIT_BACKEND;
        }
    };
    let store = PgMoleculeStore::new(PoolProvider { pool });
    match run_substructure_search(&store, &ChemEngine::new(), query) {
        Ok(matches) => {
            for smiles in matches {
                println!("{smiles}");
            }
            0
        }
        Err(e) => {
            eprintln!("[chem search] {e}");
            EXIT_SEARCH_FAILED
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn worker_flags_parse() {
        let cli = Cli::try_parse_from(["chem", "worker", "--concurrency", "3", "--poll-ms", "50"]).unwrap();
        match cli.command {
            Commands::Worker { concurrency, poll_ms } => assert_eq!((concurrency, poll_ms), (3, 50)),
            _ => panic!("subcomando inesperado"),
        }
    }

    #[test]
    fn search_requires_query() {
        assert!(Cli::try_parse_from(["chem", "search"]).is_err());
        let cli = Cli::try_parse_from(["chem", "search", "-q", "c1ccccc1"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { query } if query == "c1ccccc1"));
    }
}
