// src/noyau/discret.rs
//
// Arithmétique discrète exacte :
// - primalité (divisions par 6k±1)
// - décomposition en facteurs premiers
// - exponentiation modulaire (BigInt, reste dans [0, m[)
// - Fibonacci, borné en bits comme la combinatoire
//
// Les arguments sont des entiers déjà validés (|n| <= 2^53) par fonctions.rs.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::erreur::EvalError;
use super::fonctions::borne_bits;

pub fn est_premier(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i: i64 = 5;
    let mut pas = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += pas;
        pas = 6 - pas;
    }
    true
}

/// Facteurs premiers de |n|, croissants, avec leur exposant. `1` n'en a aucun.
pub fn facteurs_premiers(n: i64) -> Result<Vec<(u64, u32)>, EvalError> {
    if n == 0 {
        return Err(EvalError::domaine("0 n'a pas de facteurs premiers"));
    }
    let mut reste = n.unsigned_abs();
    let mut facteurs = Vec::new();

    let mut p: u64 = 2;
    while p * p <= reste {
        let mut k = 0;
        while reste % p == 0 {
            reste /= p;
            k += 1;
        }
        if k > 0 {
            facteurs.push((p, k));
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if reste > 1 {
        facteurs.push((reste, 1));
    }
    Ok(facteurs)
}

/// `360` -> `"2^3 × 3^2 × 5"` ; signe conservé, `1` et `-1` rendus tels quels.
pub fn format_facteurs(n: i64) -> Result<String, EvalError> {
    let facteurs = facteurs_premiers(n)?;
    if facteurs.is_empty() {
        return Ok(n.to_string());
    }
    let corps = facteurs
        .iter()
        .map(|&(p, k)| if k == 1 { p.to_string() } else { format!("{p}^{k}") })
        .collect::<Vec<_>>()
        .join(" × ");
    Ok(if n < 0 { format!("-{corps}") } else { corps })
}

/// (base^exposant) mod module, module > 0, exposant >= 0.
pub fn puissance_modulaire(base: i64, exposant: i64, module: i64) -> Result<BigInt, EvalError> {
    if module <= 0 {
        return Err(EvalError::domaine("powmod: module strictement positif attendu"));
    }
    if exposant < 0 {
        return Err(EvalError::domaine("powmod: exposant négatif"));
    }
    Ok(BigInt::from(base).modpow(&BigInt::from(exposant), &BigInt::from(module)))
}

/// F(0) = 0, F(1) = 1. S'arrête dès que la borne en bits est franchie.
pub fn fibonacci(n: i64) -> Result<BigInt, EvalError> {
    if n < 0 {
        return Err(EvalError::domaine("fib: indice négatif"));
    }
    let (mut a, mut b) = (BigInt::zero(), BigInt::one());
    for _ in 0..n {
        let suivant = &a + &b;
        a = b;
        b = suivant;
        borne_bits(&a)?;
    }
    Ok(a)
}
