// src/noyau/memoire.rs
//
// Mémoire M+ / M- / MR / MC : un accumulateur réel, indépendant de `ans`
// et de l'historique.
// Une somme non finie est refusée : la mémoire garde sa valeur précédente.

use serde::{Deserialize, Serialize};

use super::erreur::EvalError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryCell {
    value: f64,
}

impl MemoryCell {
    pub fn add(&mut self, v: f64) -> Result<(), EvalError> {
        self.remplacer(self.value + v)
    }

    pub fn subtract(&mut self, v: f64) -> Result<(), EvalError> {
        self.remplacer(self.value - v)
    }

    fn remplacer(&mut self, v: f64) -> Result<(), EvalError> {
        if v.is_nan() {
            return Err(EvalError::domaine("mémoire : valeur indéfinie"));
        }
        if v.is_infinite() {
            return Err(EvalError::OverflowError);
        }
        self.value = v;
        Ok(())
    }

    pub fn recall(&self) -> f64 {
        self.value
    }

    pub fn clear(&mut self) {
        self.value = 0.0;
    }
}
