// src/noyau/nombre.rs
//
// Valeur numérique du noyau : réel (f64) ou complexe (Complex64).
// Un complexe n'apparaît que sur demande explicite (littéral `3j`, `complex(..)`)
// ou par promotion autorisée (sqrt/ln d'un réel négatif).

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::erreur::EvalError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Number {
    Real(f64),
    Complex(Complex64),
}

impl Default for Number {
    fn default() -> Self {
        Number::Real(0.0)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Real(x)
    }
}

impl From<Complex64> for Number {
    fn from(z: Complex64) -> Self {
        Number::Complex(z)
    }
}

impl Number {
    /// Partie réelle si la valeur est réelle, None sinon.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Number::Real(x) => Some(*x),
            Number::Complex(_) => None,
        }
    }

    /// Vue complexe (un réel x devient x+0j).
    pub fn to_complex(&self) -> Complex64 {
        match self {
            Number::Real(x) => Complex64::new(*x, 0.0),
            Number::Complex(z) => *z,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Number::Complex(_))
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Number::Real(x) => x.is_finite(),
            Number::Complex(z) => z.re.is_finite() && z.im.is_finite(),
        }
    }

    fn is_nan(&self) -> bool {
        match self {
            Number::Real(x) => x.is_nan(),
            Number::Complex(z) => z.re.is_nan() || z.im.is_nan(),
        }
    }

    /// Contrôle de sortie d'une opération sur entrées finies :
    /// NaN => domaine, ±inf => dépassement.
    pub(crate) fn verifie(self, contexte: &str) -> Result<Number, EvalError> {
        if self.is_finite() {
            Ok(self)
        } else if self.is_nan() {
            Err(EvalError::domaine(format!("{contexte} : résultat indéfini")))
        } else {
            Err(EvalError::OverflowError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifie_classe_les_non_finis() {
        assert_eq!(Number::Real(2.0).verifie("x"), Ok(Number::Real(2.0)));
        assert_eq!(
            Number::Real(f64::INFINITY).verifie("exp"),
            Err(EvalError::OverflowError)
        );
        assert!(matches!(
            Number::Real(f64::NAN).verifie("x"),
            Err(EvalError::DomainError(_))
        ));
    }

    #[test]
    fn serde_etiquette_le_type() {
        let json = serde_json::to_string(&Number::Real(1.5)).unwrap();
        assert_eq!(json, r#"{"type":"real","value":1.5}"#);
        let back: Number = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Number::Real(1.5));
    }
}
