//! # Configuration
//!
//! Préférences de l'application, lues depuis un fichier TOML.
//!
//! ## Emplacement
//! - Linux : `~/.config/smartcalc/config.toml`
//! - macOS : `~/Library/Application Support/smartcalc/config.toml`
//! - Windows : `%APPDATA%\smartcalc\config.toml`
//! - Web (wasm32) : aucun fichier, valeurs par défaut
//!
//! ## Format
//! ```toml
//! angle_mode = "degrees"      # degrees | radians | gradians
//! format = "normal"           # normal | scientific | engineering
//! precision = 10
//!
//! [evaluator]
//! allow_complex_promotion = false
//! history_cap = 100             # 1 à 10000
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::noyau::format::PRECISION_MAX;
use crate::noyau::historique::CAPACITE_MAX;
use crate::noyau::{AngleMode, EvaluatorConfig, NumberFormat};

const NOM_APP: &str = "smartcalc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("lecture/écriture de la configuration impossible: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration TOML invalide: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("sérialisation TOML impossible: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("configuration invalide: {0}")]
    Invalid(String),

    #[error("aucun emplacement de configuration disponible")]
    NoPath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub angle_mode: AngleMode,
    pub format: NumberFormat,
    /// Décimales affichées (bornée à 15 au chargement).
    pub precision: usize,
    pub evaluator: EvaluatorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            angle_mode: AngleMode::Degrees,
            format: NumberFormat::Normal,
            precision: 10,
            evaluator: EvaluatorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Charge depuis `config_path` (ou l'emplacement par défaut).
    /// Un fichier absent n'est pas une erreur : valeurs par défaut.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(?path, "pas de fichier de configuration, valeurs par défaut");
            return Ok(Self::default());
        }

        info!(?path, "chargement de la configuration");
        let contents = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    /// Comme `load`, mais se replie sur les valeurs par défaut en cas d'échec.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("configuration ignorée: {e}. Valeurs par défaut.");
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> Result<(), ConfigError> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;
        creer_parent(&path)?;
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        info!(?path, "configuration enregistrée");
        Ok(())
    }

    /// Borne `precision` ; refuse une capacité d'historique hors de [1, CAPACITE_MAX].
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.evaluator.history_cap == 0 {
            return Err(ConfigError::Invalid(
                "evaluator.history_cap doit être au moins 1".into(),
            ));
        }
        if self.evaluator.history_cap > CAPACITE_MAX {
            return Err(ConfigError::Invalid(format!(
                "evaluator.history_cap doit être au plus {CAPACITE_MAX}"
            )));
        }
        if self.precision > PRECISION_MAX {
            warn!(precision = self.precision, "precision ramenée à {PRECISION_MAX}");
            self.precision = PRECISION_MAX;
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(NOM_APP).join("config.toml"))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_config_path() -> Option<PathBuf> {
        None
    }

    /// Journal d'historique (JSON) conservé entre deux sessions.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join(NOM_APP).join("history.json"))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_history_path() -> Option<PathBuf> {
        None
    }
}

/// Crée le dossier parent de `path` s'il manque.
pub fn creer_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
