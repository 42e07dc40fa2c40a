// src/noyau/trig.rs
//
// Trigonométrie selon le mode d'angle
// -----------------------------------
// - Enveloppe directe : angle (mode) -> radians, puis fonction native
// - Enveloppe inverse : fonction native (radians) -> angle (mode)
// - Angles spéciaux exacts : en DEG/GRAD, un angle entier multiple de 30° ou 45°
//   donne la valeur de table (sin(180) = 0, tan(45) = 1, tan(90) indéfini)

use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::erreur::EvalError;
use super::nombre::Number;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
    Gradians,
}

impl AngleMode {
    pub const TOUS: [AngleMode; 3] = [AngleMode::Degrees, AngleMode::Radians, AngleMode::Gradians];

    /// Libellé court (affichage, historique).
    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
            AngleMode::Gradians => "GRAD",
        }
    }

    /// Enveloppe directe : angle exprimé dans ce mode -> radians.
    pub fn to_radians(self, x: f64) -> f64 {
        match self {
            AngleMode::Degrees => x.to_radians(),
            AngleMode::Radians => x,
            AngleMode::Gradians => x * PI / 200.0,
        }
    }

    /// Enveloppe inverse : radians -> angle exprimé dans ce mode.
    pub fn from_radians(self, r: f64) -> f64 {
        match self {
            AngleMode::Degrees => r.to_degrees(),
            AngleMode::Radians => r,
            AngleMode::Gradians => r * 200.0 / PI,
        }
    }

    fn to_radians_c(self, z: Complex64) -> Complex64 {
        Complex64::new(self.to_radians(z.re), self.to_radians(z.im))
    }

    fn from_radians_c(self, z: Complex64) -> Complex64 {
        Complex64::new(self.from_radians(z.re), self.from_radians(z.im))
    }

    /// Nombre d'unités pour un demi-tour (180°, π rad, 200 grad).
    fn demi_tour(self) -> Option<i64> {
        match self {
            AngleMode::Degrees => Some(180),
            AngleMode::Gradians => Some(200),
            AngleMode::Radians => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigInv {
    Asin,
    Acos,
    Atan,
}

/// Fonction trigonométrique directe dans le mode donné.
pub fn trig_direct(f: TrigFn, x: Number, mode: AngleMode) -> Result<Number, EvalError> {
    match x {
        Number::Real(x) => {
            if let Some(v) = trig_special(f, x, mode)? {
                return Ok(Number::Real(v));
            }
            let r = mode.to_radians(x);
            let v = match f {
                TrigFn::Sin => r.sin(),
                TrigFn::Cos => r.cos(),
                TrigFn::Tan => r.tan(),
            };
            Number::Real(v).verifie(nom_direct(f))
        }
        Number::Complex(z) => {
            let r = mode.to_radians_c(z);
            let v = match f {
                TrigFn::Sin => r.sin(),
                TrigFn::Cos => r.cos(),
                TrigFn::Tan => r.tan(),
            };
            Number::Complex(v).verifie(nom_direct(f))
        }
    }
}

/// Fonction trigonométrique inverse ; le résultat (radians) est ramené au mode.
pub fn trig_inverse(f: TrigInv, x: Number, mode: AngleMode) -> Result<Number, EvalError> {
    match x {
        Number::Real(x) => {
            if matches!(f, TrigInv::Asin | TrigInv::Acos) && !(-1.0..=1.0).contains(&x) {
                return Err(EvalError::domaine(format!(
                    "{}: argument hors de [-1, 1]",
                    nom_inverse(f)
                )));
            }
            let r = match f {
                TrigInv::Asin => x.asin(),
                TrigInv::Acos => x.acos(),
                TrigInv::Atan => x.atan(),
            };
            Number::Real(mode.from_radians(r)).verifie(nom_inverse(f))
        }
        Number::Complex(z) => {
            let r = match f {
                TrigInv::Asin => z.asin(),
                TrigInv::Acos => z.acos(),
                TrigInv::Atan => z.atan(),
            };
            Number::Complex(mode.from_radians_c(r)).verifie(nom_inverse(f))
        }
    }
}

fn nom_direct(f: TrigFn) -> &'static str {
    match f {
        TrigFn::Sin => "sin",
        TrigFn::Cos => "cos",
        TrigFn::Tan => "tan",
    }
}

fn nom_inverse(f: TrigInv) -> &'static str {
    match f {
        TrigInv::Asin => "asin",
        TrigInv::Acos => "acos",
        TrigInv::Atan => "atan",
    }
}

/* ------------------------ Angles spéciaux ------------------------ */

/// Reconnaît les angles spéciaux lorsque l'entrée est un entier de DEG/GRAD
/// valant k·π/n avec n ∈ {1,2,3,4,6}.
///
/// Retour:
/// - Ok(Some(v)) si reconnu
/// - Err(DomainError) si indéfini (tan(90°), tan(270°))
/// - Ok(None) si non reconnu (calcul flottant ordinaire)
fn trig_special(f: TrigFn, x: f64, mode: AngleMode) -> Result<Option<f64>, EvalError> {
    let Some(demi) = mode.demi_tour() else {
        return Ok(None);
    };
    if x.fract() != 0.0 || x.abs() > 1e15 {
        return Ok(None);
    }

    // angle = x/demi · π, réduit modulo 2π
    let tour = 2 * demi;
    let a = (x as i64).rem_euclid(tour);
    let g = gcd_i64(a, demi);
    let (k, n) = (a / g, demi / g);
    if ![1, 2, 3, 4, 6].contains(&n) {
        return Ok(None);
    }

    let r2 = std::f64::consts::SQRT_2 / 2.0;
    let r3 = 3f64.sqrt();

    let v = match f {
        TrigFn::Sin => match (k, n) {
            (0, _) | (1, 1) => 0.0,
            (1, 6) | (5, 6) => 0.5,
            (7, 6) | (11, 6) => -0.5,
            (1, 4) | (3, 4) => r2,
            (5, 4) | (7, 4) => -r2,
            (1, 3) | (2, 3) => r3 / 2.0,
            (4, 3) | (5, 3) => -r3 / 2.0,
            (1, 2) => 1.0,
            (3, 2) => -1.0,
            _ => return Ok(None),
        },

        TrigFn::Cos => match (k, n) {
            (0, _) => 1.0,
            (1, 1) => -1.0,
            (1, 6) | (11, 6) => r3 / 2.0,
            (5, 6) | (7, 6) => -r3 / 2.0,
            (1, 4) | (7, 4) => r2,
            (3, 4) | (5, 4) => -r2,
            (1, 3) | (5, 3) => 0.5,
            (2, 3) | (4, 3) => -0.5,
            (1, 2) | (3, 2) => 0.0,
            _ => return Ok(None),
        },

        TrigFn::Tan => match (k, n) {
            (0, _) | (1, 1) => 0.0,
            (1, 6) | (7, 6) => r3 / 3.0,
            (5, 6) | (11, 6) => -r3 / 3.0,
            (1, 4) | (5, 4) => 1.0,
            (3, 4) | (7, 4) => -1.0,
            (1, 3) | (4, 3) => r3,
            (2, 3) | (5, 3) => -r3,
            (1, 2) | (3, 2) => {
                return Err(EvalError::domaine(format!(
                    "tan({x} {}) indéfini",
                    mode.label()
                )))
            }
            _ => return Ok(None),
        },
    };

    Ok(Some(v))
}

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}
