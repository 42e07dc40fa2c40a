// src/noyau/saisie.rs
//
// Machine d'état de saisie (pavé numérique)
// -----------------------------------------
// Transforme des touches (chiffre, point, opérateur, ±, %, =, C) en une
// expression bien formée + une valeur affichée.
//
// Invariants :
// - `courant` : opérande en cours `-?chiffres(.chiffres?)?`, vide juste après
//   un opérateur, ou la sentinelle "Error"
// - `expression` : vide, ou se termine par un opérateur d'affichage (+ - × ÷)
// - en erreur, seule `clear` est prise en compte

use tracing::trace;

use super::erreur::EvalError;
use super::eval::evaluate_pure;
use super::evaluateur::ExpressionEvaluator;
use super::format::{format_number, NumberFormat, PRECISION_MAX};
use super::lecture::{
    decimales, rationnel_depuis_decimal, rationnel_depuis_f64, rationnel_en_decimal,
};
use super::nombre::Number;
use super::symboles::EvaluationContext;
use super::trig::AngleMode;

use num_bigint::BigInt;
use num_rational::BigRational;

/// Sentinelle affichée après un échec d'évaluation.
pub const ERREUR: &str = "Error";

const OPERATEURS: [char; 4] = ['+', '-', '×', '÷'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputStateMachine {
    courant: String,
    expression: String,
    attente: bool,
}

impl Default for InputStateMachine {
    fn default() -> Self {
        Self {
            courant: "0".to_string(),
            expression: String::new(),
            attente: true,
        }
    }
}

impl InputStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /* ------------------------ Accès ------------------------ */

    /// Valeur affichée ("0" si l'opérande est vide).
    pub fn display_value(&self) -> &str {
        if self.courant.is_empty() {
            "0"
        } else {
            &self.courant
        }
    }

    pub fn display_expression(&self) -> &str {
        &self.expression
    }

    pub fn is_error(&self) -> bool {
        self.courant == ERREUR
    }

    pub fn is_waiting_for_operand(&self) -> bool {
        self.attente
    }

    /* ------------------------ Touches ------------------------ */

    pub fn clear(&mut self) {
        *self = Self::default();
        trace!("saisie: clear");
    }

    pub fn append_digit(&mut self, d: char) {
        if self.is_error() {
            return;
        }
        if d == '.' {
            return self.append_decimal();
        }
        if !d.is_ascii_digit() {
            return;
        }

        if self.attente {
            self.courant = d.to_string();
            self.attente = false;
        } else if self.courant == "0" {
            self.courant = d.to_string();
        } else if self.courant == "-0" {
            self.courant = format!("-{d}");
        } else {
            self.courant.push(d);
        }
        trace!(courant = %self.courant, "saisie: chiffre");
    }

    pub fn append_decimal(&mut self) {
        if self.is_error() {
            return;
        }
        if self.attente {
            self.courant = "0.".to_string();
            self.attente = false;
        } else if !self.courant.contains('.') {
            self.courant.push('.');
        }
        trace!(courant = %self.courant, "saisie: point");
    }

    /// `+ - × ÷` (et `*` `/` stockés en `×` `÷`) ; tout autre caractère est ignoré.
    pub fn set_operator(&mut self, op: char) {
        if self.is_error() {
            return;
        }
        let op = match op {
            '*' => '×',
            '/' => '÷',
            o if OPERATEURS.contains(&o) => o,
            _ => return,
        };

        if self.attente && self.expression.ends_with(OPERATEURS) {
            self.expression.pop();
        } else {
            self.expression.push_str(&self.courant);
        }
        self.expression.push(op);
        self.courant.clear();
        self.attente = true;
        trace!(expression = %self.expression, "saisie: opérateur");
    }

    /// ± : sans effet sur un opérande vide ou nul.
    pub fn toggle_sign(&mut self) {
        if self.is_error() || est_nul(&self.courant) {
            return;
        }
        match self.courant.strip_prefix('-') {
            Some(abs) => self.courant = abs.to_string(),
            None => self.courant.insert(0, '-'),
        }
        trace!(courant = %self.courant, "saisie: signe");
    }

    /// % : divise l'opérande par 100, exactement (jamais d'exposant).
    pub fn percent(&mut self) {
        if self.is_error() || self.courant.is_empty() {
            return;
        }
        let Some(r) = rationnel_depuis_decimal(&self.courant) else {
            return;
        };
        let cent = BigRational::from_integer(BigInt::from(100));
        self.courant = rationnel_en_decimal(&(r / cent), decimales(&self.courant) + 2);
        trace!(courant = %self.courant, "saisie: pourcent");
    }

    /// = : évaluation pure en degrés.
    pub fn equals(&mut self) {
        self.conclure(|texte| {
            evaluate_pure(texte, &EvaluationContext::new(AngleMode::Degrees))
        });
    }

    /// = : passe par l'évaluateur (met à jour son `ans` et son historique).
    pub fn equals_with(&mut self, evaluateur: &mut ExpressionEvaluator) {
        self.conclure(|texte| evaluateur.evaluate(texte, AngleMode::Degrees));
    }

    fn conclure(&mut self, evaluer: impl FnOnce(&str) -> Result<Number, EvalError>) {
        if self.is_error() {
            return;
        }
        let mut texte = format!("{}{}", self.expression, self.courant);
        if texte.ends_with(OPERATEURS) {
            texte.pop();
        }
        if texte.is_empty() {
            return;
        }

        // littéral seul : rendu tel quel
        if rationnel_depuis_decimal(&texte).is_some() {
            let lit = texte.strip_suffix('.').unwrap_or(&texte);
            self.courant = lit.to_string();
            self.expression.clear();
            self.attente = true;
            trace!(courant = %self.courant, "saisie: égal (littéral)");
            return;
        }

        match evaluer(&texte) {
            Ok(Number::Real(v)) => {
                self.courant = rendu_operande(v);
                self.attente = true;
                trace!(expression = %texte, courant = %self.courant, "saisie: égal");
            }
            Ok(Number::Complex(_)) => {
                self.courant = ERREUR.to_string();
                trace!(expression = %texte, "saisie: résultat complexe");
            }
            Err(e) => {
                self.courant = ERREUR.to_string();
                trace!(expression = %texte, erreur = %e, "saisie: erreur");
            }
        }
        self.expression.clear();
    }
}

/// Résultat rangé dans `courant` : virgule fixe avec au moins PRECISION_MAX chiffres
/// significatifs. 1e-17 donne 0.00000000000000001, jamais 0.
fn rendu_operande(v: f64) -> String {
    let Some(r) = rationnel_depuis_f64(v) else {
        return format_number(Number::Real(v), NumberFormat::Normal, PRECISION_MAX);
    };
    let exposant = format!("{:e}", v.abs())
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i64>().ok())
        .unwrap_or(0);
    let decimales = PRECISION_MAX + (-exposant - 1).max(0) as usize;
    rationnel_en_decimal(&r, decimales)
}

/// Vide, ou uniquement des zéros (et un point, un signe).
fn est_nul(courant: &str) -> bool {
    !courant.chars().any(|c| c.is_ascii_digit() && c != '0')
}
