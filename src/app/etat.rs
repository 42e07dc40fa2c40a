//! src/app/etat.rs
//!
//! État UI (sans vue).
//!
//! Rôle : contenir l'état de la calculatrice (pavé, formule, résultat, erreur,
//! réglages d'affichage, conversion) et offrir des opérations simples (C/CLR/AC).
//!
//! Contrats :
//! - Les évaluations passent toutes par le noyau ; l'état range les résultats.
//! - Le résultat est gardé en `Number` : changer de format ou de précision
//!   le réaffiche sans réévaluer.
//! - L'historique est persisté au mieux : un échec est journalisé, jamais bloquant.
//! - Les réglages ne sont écrits que sur demande (bouton « Enregistrer »).

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use smartcalc::config::creer_parent;
use smartcalc::noyau::format::PRECISION_MAX;
use smartcalc::{
    convertir, evaluate_pure, format_facteurs, format_number, AngleMode, AppConfig,
    EvaluationContext, ExpressionEvaluator, Grandeur, HistoryLog, InputStateMachine, Number,
    NumberFormat,
};

/// Plus grand entier représenté exactement par un f64.
const ENTIER_EXACT_MAX: f64 = 9_007_199_254_740_992.0;

/// Panneau de conversion d'unités.
#[derive(Clone, Debug)]
pub struct Conversion {
    pub grandeur: Grandeur,
    pub de: &'static str,
    pub vers: &'static str,
    /// Valeur source : une formule, évaluée par le noyau.
    pub entree: String,
    pub resultat: String,
}

impl Default for Conversion {
    fn default() -> Self {
        let mut c = Self {
            grandeur: Grandeur::default(),
            de: "",
            vers: "",
            entree: String::new(),
            resultat: String::new(),
        };
        c.set_grandeur(Grandeur::default());
        c
    }
}

impl Conversion {
    /// Change de grandeur : unités remises aux deux premières de la table.
    pub fn set_grandeur(&mut self, g: Grandeur) {
        let mut unites = g.unites();
        self.grandeur = g;
        self.de = unites.next().unwrap_or("");
        self.vers = unites.next().unwrap_or(self.de);
        self.resultat.clear();
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    // --- pavé (machine de saisie) ---
    pub saisie: InputStateMachine,

    // --- formule scientifique ---
    pub entree: String,

    // --- noyau avec état (ans, historique, mémoire) ---
    pub evaluateur: ExpressionEvaluator,

    // --- sorties ---
    pub dernier: Option<Number>, // dernier résultat de la formule
    pub resultat: String,        // `dernier` formaté
    pub facteurs: String,        // décomposition de `dernier`
    pub erreur: String,

    // --- conversion d'unités ---
    pub conversion: Conversion,

    // --- paramètres ---
    pub mode: AngleMode,
    pub format: NumberFormat,
    pub precision: usize,

    // --- persistance ---
    pub chemin_config: Option<PathBuf>,
    pub chemin_historique: Option<PathBuf>,
    pub statut: String,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l'entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(&AppConfig::default(), None, None)
    }
}

impl AppCalc {
    /// Construit l'état depuis la configuration ; relit l'historique s'il existe.
    pub fn new(
        config: &AppConfig,
        chemin_config: Option<PathBuf>,
        chemin_historique: Option<PathBuf>,
    ) -> Self {
        let evaluateur = match chemin_historique.as_ref().and_then(|p| lire_historique(p, config)) {
            Some(log) => ExpressionEvaluator::with_history(config.evaluator, log),
            None => ExpressionEvaluator::new(config.evaluator),
        };

        Self {
            saisie: InputStateMachine::new(),
            entree: String::new(),
            evaluateur,
            dernier: None,
            resultat: String::new(),
            facteurs: String::new(),
            erreur: String::new(),
            conversion: Conversion::default(),
            mode: config.angle_mode,
            format: config.format,
            precision: config.precision.min(PRECISION_MAX),
            chemin_config,
            chemin_historique,
            statut: String::new(),
            focus_entree: true, // au lancement, on veut pouvoir taper tout de suite
        }
    }

    /* ------------------------ Actions "boutons" (état seulement) ------------------------ */

    /// AC : remise à zéro totale (pavé + formule + résultats).
    pub fn reset_total(&mut self) {
        self.saisie.clear();
        self.entree.clear();
        self.clear_resultats();
        self.focus_entree = true;
    }

    /// C : effacer seulement l'entrée (sans toucher aux résultats).
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer résultat + erreur (sans toucher à l'entrée).
    pub fn clear_resultats(&mut self) {
        self.dernier = None;
        self.resultat.clear();
        self.facteurs.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    /// Choix UX : on CONSERVE le dernier résultat pour ne pas "effacer l'écran" sur une faute.
    pub fn set_erreur(&mut self, msg: impl Into<String>) {
        self.erreur = msg.into();
        self.focus_entree = true;
    }

    pub fn set_resultat(&mut self, v: Number) {
        self.erreur.clear();
        self.facteurs.clear();
        self.dernier = Some(v);
        self.reformater();
        self.focus_entree = true;
    }

    /// Réaffiche `dernier` avec le format et la précision courants.
    pub fn reformater(&mut self) {
        self.resultat = match self.dernier {
            Some(v) => format_number(v, self.format, self.precision),
            None => String::new(),
        };
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision.min(PRECISION_MAX);
        self.reformater();
    }

    pub fn set_format(&mut self, format: NumberFormat) {
        self.format = format;
        self.reformater();
    }

    /// Valeur réelle utilisable par M+ / M- (dernier résultat, sinon le pavé).
    pub fn valeur_courante(&self) -> Option<f64> {
        match self.dernier {
            Some(v) => v.as_real(),
            None => self.saisie.display_value().parse().ok(),
        }
    }

    /* ------------------------ Mémoire / outils ------------------------ */

    /// M+ (ou M- si `retrancher`) avec la valeur courante ; un dépassement est signalé.
    pub fn memoire(&mut self, retrancher: bool) {
        let Some(v) = self.valeur_courante() else {
            self.set_erreur("mémoire : aucune valeur réelle");
            return;
        };
        let r = if retrancher {
            self.evaluateur.memory_subtract(v)
        } else {
            self.evaluateur.memory_add(v)
        };
        if let Err(e) = r {
            self.set_erreur(format!("mémoire : {e}"));
        }
    }

    /// Décompose la valeur courante en facteurs premiers.
    pub fn decomposer(&mut self) {
        let n = match self.valeur_courante() {
            Some(v) if v.fract() == 0.0 && v.abs() <= ENTIER_EXACT_MAX => v as i64,
            _ => {
                self.set_erreur("décomposition : entier attendu");
                return;
            }
        };
        match format_facteurs(n) {
            Ok(f) => {
                self.erreur.clear();
                self.facteurs = format!("{n} = {f}");
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
    }

    /// Évalue la valeur source (formule, mode d'angle courant) puis la convertit.
    pub fn convertir(&mut self) {
        let ctx = EvaluationContext::new(self.mode);
        let c = &mut self.conversion;
        let valeur = match evaluate_pure(&c.entree, &ctx) {
            Ok(Number::Real(v)) => v,
            Ok(Number::Complex(_)) => {
                c.resultat = "valeur complexe".to_string();
                return;
            }
            Err(e) => {
                c.resultat = e.to_string();
                return;
            }
        };
        c.resultat = match convertir(valeur, c.de, c.vers, c.grandeur) {
            Ok(v) => format!(
                "{} {}",
                format_number(Number::Real(v), self.format, self.precision),
                c.vers
            ),
            Err(e) => e.to_string(),
        };
    }

    /* ------------------------ Réglages ------------------------ */

    /// Réglages courants, tels qu'ils seraient écrits dans config.toml.
    pub fn config_courante(&self) -> AppConfig {
        AppConfig {
            angle_mode: self.mode,
            format: self.format,
            precision: self.precision,
            evaluator: *self.evaluateur.config(),
        }
    }

    pub fn sauver_reglages(&mut self) {
        match self.config_courante().save(self.chemin_config.clone()) {
            Ok(()) => {
                info!("réglages enregistrés");
                self.statut = "réglages enregistrés".to_string();
            }
            Err(e) => {
                warn!(error = %e, "réglages non enregistrés");
                self.statut.clear();
                self.set_erreur(e.to_string());
            }
        }
    }

    /* ------------------------ Persistance ------------------------ */

    pub fn sauver_historique(&self) {
        let Some(chemin) = &self.chemin_historique else {
            return;
        };
        let json = match self.evaluateur.history().to_json() {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "historique non sérialisable");
                return;
            }
        };
        if let Err(e) = creer_parent(chemin).and_then(|()| std::fs::write(chemin, json)) {
            warn!(?chemin, error = %e, "historique non enregistré");
        } else {
            debug!(?chemin, "historique enregistré");
        }
    }
}

fn lire_historique(chemin: &Path, config: &AppConfig) -> Option<HistoryLog> {
    let texte = match std::fs::read_to_string(chemin) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(?chemin, error = %e, "historique illisible");
            return None;
        }
    };
    match HistoryLog::from_json(&texte, config.evaluator.history_cap) {
        Ok(log) => {
            debug!(?chemin, entrees = log.len(), "historique relu");
            Some(log)
        }
        Err(e) => {
            warn!(?chemin, error = %e, "historique corrompu, ignoré");
            None
        }
    }
}
