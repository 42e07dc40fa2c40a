// src/noyau/fonctions.rs
//
// Fonctions de la liste blanche.
// - Trigonométrie : déléguée à trig.rs (mode d'angle)
// - Combinatoire (factorial, comb, perm, gcd, lcm) : entiers exacts (BigInt), puis f64
// - Discret (isprime, powmod, fib) : discret.rs, mêmes bornes
// - gamma / erf : libm
// - Complexes : num-complex, seulement si l'argument est déjà complexe
//   ou si la promotion est autorisée (sqrt / ln / log d'un réel négatif)

use num_bigint::BigInt;
use num_complex::Complex64;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::discret::{est_premier, fibonacci, puissance_modulaire};
use super::erreur::EvalError;
use super::nombre::Number;
use super::symboles::{EvaluationContext, Fonction};
use super::trig::{trig_direct, trig_inverse, TrigFn, TrigInv};

/// Garde-fou : taille maximale (en bits) des entiers intermédiaires.
/// f64::MAX ≈ 2^1024 : au-delà, le résultat ne peut que déborder.
const MAX_BITS: u64 = 1100;

/// Plus grand entier représenté exactement par un f64.
const ENTIER_EXACT_MAX: f64 = 9_007_199_254_740_992.0;

/// Applique une fonction de la liste blanche (l'arité a déjà été vérifiée au parse).
pub fn appliquer(
    f: Fonction,
    args: &[Number],
    ctx: &EvaluationContext,
) -> Result<Number, EvalError> {
    use Fonction::*;

    let nom = f.nom();
    if !f.arite().accepte(args.len()) {
        return Err(EvalError::syntaxe(format!(
            "{nom}: nombre d'arguments invalide ({})",
            args.len()
        )));
    }
    let x = args[0];

    match f {
        Sin => trig_direct(TrigFn::Sin, x, ctx.mode),
        Cos => trig_direct(TrigFn::Cos, x, ctx.mode),
        Tan => trig_direct(TrigFn::Tan, x, ctx.mode),
        Asin => trig_inverse(TrigInv::Asin, x, ctx.mode),
        Acos => trig_inverse(TrigInv::Acos, x, ctx.mode),
        Atan => trig_inverse(TrigInv::Atan, x, ctx.mode),

        Sinh => unaire(nom, x, f64::sinh, Complex64::sinh),
        Cosh => unaire(nom, x, f64::cosh, Complex64::cosh),
        Tanh => unaire(nom, x, f64::tanh, Complex64::tanh),
        Asinh => unaire(nom, x, f64::asinh, Complex64::asinh),
        Acosh => {
            if let Number::Real(v) = x {
                if v < 1.0 {
                    return Err(EvalError::domaine("acosh: argument < 1"));
                }
            }
            unaire(nom, x, f64::acosh, Complex64::acosh)
        }
        Atanh => {
            if let Number::Real(v) = x {
                if v.abs() >= 1.0 {
                    return Err(EvalError::domaine("atanh: argument hors de ]-1, 1["));
                }
            }
            unaire(nom, x, f64::atanh, Complex64::atanh)
        }

        Sqrt => racine(x, ctx),
        Ln => logarithme_naturel(x, ctx),
        Log10 => match args.get(1) {
            None => {
                if let Number::Real(v) = x {
                    if v > 0.0 {
                        return Number::Real(v.log10()).verifie(nom);
                    }
                }
                let ln_x = logarithme_naturel(x, ctx)?;
                diviser(ln_x, Number::Real(std::f64::consts::LN_10))
            }
            Some(base) => {
                let ln_x = logarithme_naturel(x, ctx)?;
                let ln_b = logarithme_naturel(*base, ctx)?;
                diviser(ln_x, ln_b)
            }
        },
        Exp => unaire(nom, x, f64::exp, Complex64::exp),
        Abs => match x {
            Number::Real(v) => Ok(Number::Real(v.abs())),
            Number::Complex(z) => Number::Real(z.norm()).verifie(nom),
        },

        Factorial => factorielle(entier(nom, x)?),
        Gcd => {
            let mut acc = BigInt::zero();
            for a in args {
                acc = pgcd(acc, BigInt::from(entier(nom, *a)?));
            }
            vers_f64(&acc)
        }
        Lcm => {
            let mut acc = BigInt::one();
            for a in args {
                let b = BigInt::from(entier(nom, *a)?).abs();
                if b.is_zero() {
                    return Ok(Number::Real(0.0));
                }
                let g = pgcd(acc.clone(), b.clone());
                acc = &acc / g * b;
                borne_bits(&acc)?;
            }
            vers_f64(&acc)
        }
        Comb => {
            let (n, k) = (entier(nom, x)?, entier(nom, args[1])?);
            combinaisons(n, k)
        }
        Perm => {
            let (n, k) = (entier(nom, x)?, entier(nom, args[1])?);
            arrangements(n, k)
        }

        IsPrime => Ok(Number::Real(if est_premier(entier(nom, x)?) { 1.0 } else { 0.0 })),
        PowMod => {
            let (b, e, m) = (entier(nom, x)?, entier(nom, args[1])?, entier(nom, args[2])?);
            vers_f64(&puissance_modulaire(b, e, m)?)
        }
        Fib => vers_f64(&fibonacci(entier(nom, x)?)?),

        Gamma => {
            let v = reel(nom, x)?;
            if v <= 0.0 && v.fract() == 0.0 {
                return Err(EvalError::domaine("gamma: pôle en entier négatif ou nul"));
            }
            Number::Real(libm::tgamma(v)).verifie(nom)
        }
        Erf => Ok(Number::Real(libm::erf(reel(nom, x)?))),

        IsClose => {
            let a = reel(nom, x)?;
            let b = reel(nom, args[1])?;
            let rel_tol = match args.get(2) {
                Some(t) => reel(nom, *t)?,
                None => 1e-9,
            };
            let abs_tol = match args.get(3) {
                Some(t) => reel(nom, *t)?,
                None => 0.0,
            };
            if rel_tol < 0.0 || abs_tol < 0.0 {
                return Err(EvalError::domaine("isclose: tolérance négative"));
            }
            let proche = a == b || (a - b).abs() <= (rel_tol * a.abs().max(b.abs())).max(abs_tol);
            Ok(Number::Real(if proche { 1.0 } else { 0.0 }))
        }

        Complex => {
            let re = reel(nom, x)?;
            let im = match args.get(1) {
                Some(v) => reel(nom, *v)?,
                None => 0.0,
            };
            Ok(Number::Complex(Complex64::new(re, im)))
        }
        Real => Ok(Number::Real(x.to_complex().re)),
        Imag => Ok(Number::Real(x.to_complex().im)),
        Conj => match x {
            Number::Real(v) => Ok(Number::Real(v)),
            Number::Complex(z) => Ok(Number::Complex(z.conj())),
        },
        // argument d'un complexe, exprimé dans le mode d'angle courant
        Phase => Ok(Number::Real(ctx.mode.from_radians(x.to_complex().arg()))),

        Radians => Number::Real(reel(nom, x)?.to_radians()).verifie(nom),
        Degrees => Number::Real(reel(nom, x)?.to_degrees()).verifie(nom),
        Round => {
            let v = reel(nom, x)?;
            let chiffres = match args.get(1) {
                Some(n) => entier(nom, *n)?,
                None => 0,
            };
            arrondi_pair(v, chiffres)
        }
        Int => Ok(Number::Real(reel(nom, x)?.trunc())),
        Float => Ok(Number::Real(reel(nom, x)?)),
    }
}

/* ------------------------ Aides génériques ------------------------ */

fn unaire(
    nom: &str,
    x: Number,
    f_reel: fn(f64) -> f64,
    f_cplx: fn(Complex64) -> Complex64,
) -> Result<Number, EvalError> {
    let v = match x {
        Number::Real(v) => Number::Real(f_reel(v)),
        Number::Complex(z) => Number::Complex(f_cplx(z)),
    };
    v.verifie(nom)
}

/// Argument réel exigé (fonctions sans extension complexe).
fn reel(nom: &str, x: Number) -> Result<f64, EvalError> {
    x.as_real()
        .ok_or_else(|| EvalError::domaine(format!("{nom}: argument complexe non supporté")))
}

/// Argument entier exigé, exactement représentable.
fn entier(nom: &str, x: Number) -> Result<i64, EvalError> {
    let v = reel(nom, x)?;
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(EvalError::domaine(format!("{nom}: argument entier attendu")));
    }
    if v.abs() > ENTIER_EXACT_MAX {
        return Err(EvalError::OverflowError);
    }
    Ok(v as i64)
}

pub(crate) fn diviser(a: Number, b: Number) -> Result<Number, EvalError> {
    match (a, b) {
        (Number::Real(x), Number::Real(y)) => {
            if y == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Number::Real(x / y).verifie("/")
        }
        _ => {
            let (x, y) = (a.to_complex(), b.to_complex());
            if y.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            Number::Complex(x / y).verifie("/")
        }
    }
}

/* ------------------------ Racine / logarithmes ------------------------ */

fn racine(x: Number, ctx: &EvaluationContext) -> Result<Number, EvalError> {
    match x {
        Number::Real(v) if v >= 0.0 => Ok(Number::Real(v.sqrt())),
        Number::Real(v) => {
            if ctx.allow_complex_promotion {
                Ok(Number::Complex(Complex64::new(0.0, (-v).sqrt())))
            } else {
                Err(EvalError::domaine("sqrt: argument négatif"))
            }
        }
        Number::Complex(z) => Number::Complex(z.sqrt()).verifie("sqrt"),
    }
}

fn logarithme_naturel(x: Number, ctx: &EvaluationContext) -> Result<Number, EvalError> {
    match x {
        Number::Real(v) if v > 0.0 => Number::Real(v.ln()).verifie("ln"),
        Number::Real(v) if v == 0.0 => Err(EvalError::domaine("logarithme de zéro")),
        Number::Real(v) => {
            if ctx.allow_complex_promotion {
                Number::Complex(Complex64::new(v, 0.0).ln()).verifie("ln")
            } else {
                Err(EvalError::domaine("logarithme d'un nombre négatif"))
            }
        }
        Number::Complex(z) => {
            if z.is_zero() {
                return Err(EvalError::domaine("logarithme de zéro"));
            }
            Number::Complex(z.ln()).verifie("ln")
        }
    }
}

/* ------------------------ Combinatoire exacte ------------------------ */

pub(crate) fn borne_bits(n: &BigInt) -> Result<(), EvalError> {
    if n.bits() > MAX_BITS {
        Err(EvalError::OverflowError)
    } else {
        Ok(())
    }
}

fn vers_f64(n: &BigInt) -> Result<Number, EvalError> {
    match n.to_f64() {
        Some(v) if v.is_finite() => Ok(Number::Real(v)),
        _ => Err(EvalError::OverflowError),
    }
}

fn pgcd(mut a: BigInt, mut b: BigInt) -> BigInt {
    while !b.is_zero() {
        let t = &a % &b;
        a = b;
        b = t;
    }
    a.abs()
}

fn factorielle(n: i64) -> Result<Number, EvalError> {
    if n < 0 {
        return Err(EvalError::domaine(
            "factorial: défini seulement pour les entiers positifs",
        ));
    }
    // 171! > f64::MAX
    if n > 170 {
        return Err(EvalError::OverflowError);
    }
    let mut acc = BigInt::one();
    for i in 2..=n {
        acc *= i;
    }
    vers_f64(&acc)
}

fn combinaisons(n: i64, k: i64) -> Result<Number, EvalError> {
    if n < 0 || k < 0 {
        return Err(EvalError::domaine("comb: arguments négatifs"));
    }
    if k > n {
        return Ok(Number::Real(0.0));
    }
    let k = k.min(n - k);
    let mut acc = BigInt::one();
    for i in 0..k {
        // division exacte à chaque pas : C(n, i+1) = C(n, i)·(n-i)/(i+1)
        acc = acc * (n - i) / (i + 1);
        borne_bits(&acc)?;
    }
    vers_f64(&acc)
}

fn arrangements(n: i64, k: i64) -> Result<Number, EvalError> {
    if n < 0 || k < 0 {
        return Err(EvalError::domaine("perm: arguments négatifs"));
    }
    if k > n {
        return Ok(Number::Real(0.0));
    }
    let mut acc = BigInt::one();
    for i in 0..k {
        acc *= n - i;
        borne_bits(&acc)?;
    }
    vers_f64(&acc)
}

/* ------------------------ Arrondi ------------------------ */

/// Arrondi au pair le plus proche (round(2.5) = 2), à `chiffres` décimales.
fn arrondi_pair(v: f64, chiffres: i64) -> Result<Number, EvalError> {
    fn pair(x: f64) -> f64 {
        let r = x.round();
        if (x - x.trunc()).abs() == 0.5 {
            2.0 * (x / 2.0).round()
        } else {
            r
        }
    }

    if chiffres == 0 {
        return Ok(Number::Real(pair(v)));
    }
    let echelle = 10f64.powi(chiffres.clamp(-308, 308) as i32);
    let y = v * echelle;
    if !y.is_finite() {
        // trop de décimales demandées : la valeur est déjà exacte
        return Ok(Number::Real(v));
    }
    Ok(Number::Real(pair(y) / echelle))
}
