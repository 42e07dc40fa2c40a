// src/noyau/format.rs
//
// Affichage des nombres : Normal / Scientifique / Ingénieur.
// - Normal : virgule fixe exacte (via lecture.rs), jamais d'exposant
// - Scientifique : exactement `precision` chiffres après la virgule de la mantisse
// - Ingénieur : mêmes chiffres significatifs, exposant multiple de 3

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::lecture::{rationnel_depuis_f64, rationnel_en_decimal};
use super::nombre::Number;

/// Précision maximale acceptée (bornage de `precision`).
pub const PRECISION_MAX: usize = 15;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    #[default]
    Normal,
    Scientific,
    Engineering,
}

impl NumberFormat {
    pub fn label(self) -> &'static str {
        match self {
            NumberFormat::Normal => "NORM",
            NumberFormat::Scientific => "SCI",
            NumberFormat::Engineering => "ENG",
        }
    }
}

/// Formate une valeur. `precision` est bornée à [0, 15].
pub fn format_number(value: Number, format: NumberFormat, precision: usize) -> String {
    let p = precision.min(PRECISION_MAX);
    match value {
        Number::Real(x) => format_reel(x, format, p),
        Number::Complex(z) => format_complexe(z, format, p),
    }
}

fn format_reel(x: f64, format: NumberFormat, p: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    // pas de "-0"
    let x = if x == 0.0 { 0.0 } else { x };

    match format {
        NumberFormat::Normal => match rationnel_depuis_f64(x) {
            Some(r) => rationnel_en_decimal(&r, p),
            None => format!("{x}"),
        },
        NumberFormat::Scientific => format!("{x:.p$e}"),
        NumberFormat::Engineering => ingenieur(x, p),
    }
}

/// Réécrit l'écriture scientifique avec un exposant multiple de 3,
/// en déplaçant la virgule dans les chiffres déjà arrondis.
fn ingenieur(x: f64, p: usize) -> String {
    let sci = format!("{:.p$e}", x.abs());
    let Some((mantisse, exp)) = sci.split_once('e') else {
        return sci;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return sci;
    };

    let mut chiffres: String = mantisse.chars().filter(|c| c.is_ascii_digit()).collect();
    let decalage = exp.rem_euclid(3) as usize;
    while chiffres.len() < decalage + 1 {
        chiffres.push('0');
    }
    let (ent, frac) = chiffres.split_at(decalage + 1);

    let signe = if x < 0.0 { "-" } else { "" };
    let exp3 = exp - decalage as i32;
    if frac.is_empty() {
        format!("{signe}{ent}e{exp3}")
    } else {
        format!("{signe}{ent}.{frac}e{exp3}")
    }
}

fn format_complexe(z: Complex64, format: NumberFormat, p: usize) -> String {
    let im = format_reel(z.im.abs(), format, p);
    if z.re == 0.0 {
        let signe = if z.im < 0.0 { "-" } else { "" };
        return format!("{signe}{im}j");
    }
    let re = format_reel(z.re, format, p);
    let signe = if z.im < 0.0 { '-' } else { '+' };
    format!("{re}{signe}{im}j")
}
