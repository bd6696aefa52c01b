// main.rs
use std::process::ExitCode;

use chem_infra::{logging, LogConfig};
use log::{error, info, warn};
use molecules_api::{api, App, AppConfig, AppError};

fn main() -> ExitCode {
    chem_persistence::init_dotenv();
    if let Err(e) = logging::init(&LogConfig::from_env()) {
        eprintln!("[molecules-api] no se pudo iniciar el logging: {e}");
        return ExitCode::from(2);
    }
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Arranque fallido: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let cfg = AppConfig::from_env()?;
    info!("Iniciando molecules-api (server_id={}, backend={:?})", cfg.server_id, cfg.backend);
    // El pool de Postgres y las migraciones son bloqueantes: se montan antes
    // de levantar el runtime.
    let app = App::build(&cfg)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(format!("no se pudo crear el runtime tokio: {e}")))?;
    let served = runtime.block_on(async {
                            let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
                            info!("Escuchando en {}", listener.local_addr()?);
                            api::serve(listener, app.state.clone(), shutdown_signal()).await
                        });
    app.shutdown();
    served.map_err(AppError::from)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C recibido, cerrando conexiones"),
        Err(e) => warn!("No se pudo escuchar Ctrl-C ({e}); el servidor se detiene"),
    }
}
