//! Inicialización de logging con `fern` sobre la fachada `log`.
//!
//! Formato: `<rfc3339> - <target> - <LEVEL> - <mensaje>`, a stdout y, si se
//! indica, también a un archivo en modo append.

use std::env;
use std::str::FromStr;

use log::LevelFilter;

use crate::redis_cache::InfraError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: LevelFilter::Info, file: None }
    }
}

impl LogConfig {
    /// `LOG_LEVEL` (por defecto `info`) y `LOG_FILE` opcional.
    pub fn from_env() -> Self {
        chem_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let level = lookup("LOG_LEVEL").and_then(|v| LevelFilter::from_str(v.trim()).ok())
                                       .unwrap_or(LevelFilter::Info);
        let file = lookup("LOG_FILE").filter(|f| !f.trim().is_empty());
        Self { level, file }
    }
}

pub fn base(level: LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new().level(level)
                         .level_for("r2d2", LevelFilter::Warn)
                         .format(|out, message, record| {
                             out.finish(format_args!("{} - {} - {} - {}",
                                                     chrono::Local::now().to_rfc3339(),
                                                     record.target(),
                                                     record.level(),
                                                     message))
                         })
}

/// Instala el logger global. Falla si ya había uno o si no se puede abrir
/// el archivo.
pub fn init(cfg: &LogConfig) -> Result<(), InfraError> {
    let mut dispatch = base(cfg.level).chain(std::io::stdout());
    if let Some(path) = &cfg.file {
        let file = fern::log_file(path).map_err(|e| InfraError::Config(format!("LOG_FILE {path}: {e}")))?;
        dispatch = dispatch.chain(file);
    }
    dispatch.apply().map_err(|e| InfraError::Config(format!("logger: {e}")))
}
