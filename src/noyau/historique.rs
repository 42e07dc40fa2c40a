// src/noyau/historique.rs
//
// Historique borné des calculs réussis
// ------------------------------------
// - Au plus `cap` entrées ; au-delà, la plus ancienne sort (FIFO)
// - Lecture toujours en ordre chronologique (plus ancienne d'abord)
// - Sérialisation JSON : suite ordonnée d'entrées, ordre de calcul

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::nombre::Number;
use super::trig::AngleMode;

/// Capacité par défaut.
pub const CAPACITE_DEFAUT: usize = 100;

/// Capacité maximale acceptée (configuration comprise).
pub const CAPACITE_MAX: usize = 10_000;

/// Entrée immuable de l'historique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub expression: String,
    pub result: Number,
    pub angle_mode: AngleMode,
}

impl HistoryEntry {
    pub fn new(expression: impl Into<String>, result: Number, angle_mode: AngleMode) -> Self {
        Self {
            timestamp: Utc::now(),
            expression: expression.into(),
            result,
            angle_mode,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    cap: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(CAPACITE_DEFAUT)
    }
}

impl HistoryLog {
    /// `cap` est ramenée dans [1, CAPACITE_MAX] ; la mémoire est réservée au fil des ajouts.
    pub fn new(cap: usize) -> Self {
        let cap = cap.clamp(1, CAPACITE_MAX);
        Self {
            entries: VecDeque::with_capacity(cap.min(CAPACITE_DEFAUT)),
            cap,
        }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        while self.entries.len() >= self.cap {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Les `limit` entrées les plus récentes (toutes si None), plus ancienne d'abord.
    pub fn entries(&self, limit: Option<usize>) -> Vec<HistoryEntry> {
        let n = limit.map_or(self.entries.len(), |l| l.min(self.entries.len()));
        let debut = self.entries.len() - n;
        self.entries.iter().skip(debut).cloned().collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Relit un journal ; si le fichier dépasse `cap`, seules les plus récentes restent.
    pub fn from_json(texte: &str, cap: usize) -> Result<Self, serde_json::Error> {
        let lues: Vec<HistoryEntry> = serde_json::from_str(texte)?;
        let mut log = Self::new(cap);
        for e in lues {
            log.push(e);
        }
        Ok(log)
    }
}
