//! Évaluateur avec état de session : `ans`, historique, mémoire.
//!
//! Le mode d'angle n'est PAS un état : l'appelant le fournit à chaque appel.
//! En cas d'erreur, rien ne change (ni `ans`, ni l'historique).

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::erreur::EvalError;
use super::eval::evaluate_pure;
use super::historique::{HistoryEntry, HistoryLog, CAPACITE_DEFAUT};
use super::memoire::MemoryCell;
use super::nombre::Number;
use super::symboles::EvaluationContext;
use super::trig::AngleMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// sqrt/ln/log d'un négatif et puissances non entières donnent un complexe
    /// au lieu d'une DomainError.
    pub allow_complex_promotion: bool,
    pub history_cap: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            allow_complex_promotion: false,
            history_cap: CAPACITE_DEFAUT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExpressionEvaluator {
    config: EvaluatorConfig,
    history: HistoryLog,
    memory: MemoryCell,
    ans: Number,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new(EvaluatorConfig::default())
    }
}

impl ExpressionEvaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self {
            config,
            history: HistoryLog::new(config.history_cap),
            memory: MemoryCell::default(),
            ans: Number::default(),
        }
    }

    /// Reprend un historique existant (relu depuis le disque).
    pub fn with_history(config: EvaluatorConfig, history: HistoryLog) -> Self {
        let ans = history
            .iter()
            .next_back()
            .map_or(Number::default(), |e| e.result);
        Self {
            config,
            history,
            memory: MemoryCell::default(),
            ans,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn set_allow_complex_promotion(&mut self, on: bool) {
        self.config.allow_complex_promotion = on;
    }

    fn contexte(&self, mode: AngleMode) -> EvaluationContext {
        EvaluationContext {
            mode,
            ans: self.ans,
            allow_complex_promotion: self.config.allow_complex_promotion,
        }
    }

    pub fn evaluate(&mut self, text: &str, mode: AngleMode) -> Result<Number, EvalError> {
        debug!(expression = text, mode = mode.label(), "évaluation");

        let resultat = evaluate_pure(text, &self.contexte(mode));
        match &resultat {
            Ok(v) => {
                debug!(resultat = ?v, "évaluation réussie");
                self.ans = *v;
                self.history
                    .push(HistoryEntry::new(text.trim(), *v, mode));
            }
            Err(e) => debug!(erreur = %e, genre = e.kind(), "évaluation refusée"),
        }
        resultat
    }

    pub fn ans(&self) -> Number {
        self.ans
    }

    /* ------------------------ Mémoire ------------------------ */

    /// M+ ; une somme hors de la plage des f64 est refusée (OverflowError).
    pub fn memory_add(&mut self, v: f64) -> Result<(), EvalError> {
        self.memory.add(v)
    }

    pub fn memory_subtract(&mut self, v: f64) -> Result<(), EvalError> {
        self.memory.subtract(v)
    }

    pub fn memory_recall(&self) -> f64 {
        self.memory.recall()
    }

    pub fn memory_clear(&mut self) {
        self.memory.clear();
    }

    /* ------------------------ Historique ------------------------ */

    pub fn add_to_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
    }

    /// Plus ancienne d'abord ; `Some(n)` garde les n plus récentes.
    pub fn get_history(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        self.history.entries(limit)
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }
}
