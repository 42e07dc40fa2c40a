// src/noyau/lecture.rs
//
// Lecture décimale EXACTE (rationnels) :
// - texte décimal ("-12.5", "3e-4") -> BigRational, sans passer par f64
// - f64 -> BigRational via sa plus courte écriture décimale aller-retour
// - BigRational -> texte décimal à virgule fixe, arrondi, sans exposant

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

/* ------------------------ Décimal (texte -> rationnel) ------------------------ */

pub fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Parse un littéral décimal exact : `-?chiffres(.chiffres?)?([eE][+-]?chiffres)?`.
/// Retourne None si le texte n'est pas de cette forme.
pub fn rationnel_depuis_decimal(texte: &str) -> Option<BigRational> {
    let s = texte.trim();
    let (neg, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (mantisse, exposant) = match s.find(['e', 'E']) {
        Some(p) => (&s[..p], s[p + 1..].parse::<i32>().ok()?),
        None => (s, 0),
    };

    let (ent, frac) = match mantisse.split_once('.') {
        Some((a, b)) => (a, b),
        None => (mantisse, ""),
    };
    if ent.is_empty() && frac.is_empty() {
        return None;
    }
    if !ent.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }

    let chiffres = format!("{ent}{frac}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    // valeur = n · 10^(exposant - |frac|)
    let e = exposant as i64 - frac.len() as i64;
    let mut r = if e >= 0 {
        BigRational::from_integer(n * pow10(e as usize))
    } else {
        BigRational::new(n, pow10((-e) as usize))
    };
    if neg {
        r = -r;
    }
    Some(r)
}

/// f64 fini -> rationnel égal à sa plus courte écriture décimale (0.1 -> 1/10).
pub fn rationnel_depuis_f64(v: f64) -> Option<BigRational> {
    if !v.is_finite() {
        return None;
    }
    rationnel_depuis_decimal(&format!("{v:e}"))
}

/// Nombre de chiffres après la virgule dans un littéral décimal simple.
pub fn decimales(texte: &str) -> usize {
    texte.split_once('.').map_or(0, |(_, f)| f.len())
}

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

/// Convertit un entier "scalé" (×10^digits) en texte décimal.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// r -> entier "scalé" = arrondi(r · 10^digits), moitié loin de zéro.
pub fn rational_scaled_round(r: &BigRational, digits: usize) -> BigInt {
    let scaled = r * BigRational::from_integer(pow10(digits));
    scaled.round().to_integer()
}

/// Supprime les zéros finaux de la partie décimale (et le point s'il ne reste rien).
pub fn trim_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Rationnel -> virgule fixe avec au plus `digits` décimales, zéros finaux retirés,
/// jamais "-0".
pub fn rationnel_en_decimal(r: &BigRational, digits: usize) -> String {
    let scaled = rational_scaled_round(r, digits);
    if scaled.is_zero() {
        return "0".to_string();
    }
    trim_zeros(&scaled_to_decimal(scaled, digits))
}
