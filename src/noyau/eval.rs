//! Noyau — évaluation (pipeline réel)
//!
//! assainissement -> jetons -> RPN -> Expr (liste blanche) -> interprétation
//!
//! Aucune étape n'exécute de code arbitraire : l'interprète ne connaît que
//! les variantes de `Expr`, et `Expr` ne contient que des symboles déjà résolus.

use tracing::trace;

use super::erreur::EvalError;
use super::expr::{BinOp, Expr, UnOp};
use super::fonctions::{appliquer, diviser};
use super::jetons::{format_tokens, sanitize, tokenize};
use super::nombre::Number;
use super::rpn::{from_rpn, to_rpn};
use super::symboles::EvaluationContext;

use num_complex::Complex64;
use num_traits::Zero;

/// Garde-fou : longueur maximale d'une entrée (en caractères).
pub const MAX_LONGUEUR: usize = 4096;

/// Analyse un texte en AST. Les identifiants sont résolus ici.
pub fn parse(texte: &str) -> Result<Expr, EvalError> {
    let s = texte.trim();
    if s.is_empty() {
        return Err(EvalError::syntaxe("entrée vide"));
    }
    if s.chars().count() > MAX_LONGUEUR {
        return Err(EvalError::LimitExceeded(format!(
            "entrée de plus de {MAX_LONGUEUR} caractères"
        )));
    }

    // 1) Assainissement + jetons
    let jetons = tokenize(&sanitize(s))?;
    trace!(jetons = %format_tokens(&jetons), "tokenisation");

    // 2) RPN puis AST
    let rpn = to_rpn(&jetons)?;
    from_rpn(&rpn)
}

/// Évaluation pure (sans historique ni `ans` mis à jour).
pub fn evaluate_pure(texte: &str, ctx: &EvaluationContext) -> Result<Number, EvalError> {
    let expr = parse(texte)?;
    let v = evaluer(&expr, ctx)?;
    v.verifie("résultat")
}

/// Interprète un AST dans un contexte.
/// Récursif sauf sur la branche gauche des opérateurs binaires ; l'imbrication est bornée par le parse.
pub fn evaluer(expr: &Expr, ctx: &EvaluationContext) -> Result<Number, EvalError> {
    match expr {
        Expr::Literal(n) => Ok(*n),
        Expr::Identifier(c) => Ok(ctx.constante(*c)),

        Expr::Unary(op, x) => {
            let v = evaluer(x, ctx)?;
            Ok(match (op, v) {
                (UnOp::Pos, v) => v,
                (UnOp::Neg, Number::Real(x)) => Number::Real(-x),
                (UnOp::Neg, Number::Complex(z)) => Number::Complex(-z),
            })
        }

        Expr::Binary(..) => {
            // 1+2+3+... penche à gauche : on descend la branche gauche sans récursion
            let mut droites: Vec<(BinOp, &Expr)> = Vec::new();
            let mut courant = expr;
            while let Expr::Binary(op, a, b) = courant {
                droites.push((*op, b.as_ref()));
                courant = a.as_ref();
            }

            let mut acc = evaluer(courant, ctx)?;
            while let Some((op, b)) = droites.pop() {
                let v = evaluer(b, ctx)?;
                acc = binaire(op, acc, v, ctx)?;
            }
            Ok(acc)
        }

        Expr::Call(f, args) => {
            let valeurs = args
                .iter()
                .map(|a| evaluer(a, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            appliquer(*f, &valeurs, ctx)
        }
    }
}

fn binaire(op: BinOp, a: Number, b: Number, ctx: &EvaluationContext) -> Result<Number, EvalError> {
    let sym = op.symbole();
    match op {
        BinOp::Div => diviser(a, b),
        BinOp::Mod => modulo(a, b),
        BinOp::Pow => puissance(a, b, ctx),
        BinOp::Add | BinOp::Sub | BinOp::Mul => match (a, b) {
            (Number::Real(x), Number::Real(y)) => {
                let v = match op {
                    BinOp::Add => x + y,
                    BinOp::Sub => x - y,
                    _ => x * y,
                };
                Number::Real(v).verifie(sym)
            }
            _ => {
                let (x, y) = (a.to_complex(), b.to_complex());
                let v = match op {
                    BinOp::Add => x + y,
                    BinOp::Sub => x - y,
                    _ => x * y,
                };
                Number::Complex(v).verifie(sym)
            }
        },
    }
}

/// Modulo au sens mathématique : le signe du résultat suit celui du diviseur.
fn modulo(a: Number, b: Number) -> Result<Number, EvalError> {
    let (Number::Real(x), Number::Real(y)) = (a, b) else {
        return Err(EvalError::domaine("%: opérandes complexes non supportés"));
    };
    if y == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let mut r = x % y;
    if r != 0.0 && (r < 0.0) != (y < 0.0) {
        r += y;
    }
    Number::Real(r).verifie("%")
}

fn puissance(a: Number, b: Number, ctx: &EvaluationContext) -> Result<Number, EvalError> {
    match (a, b) {
        (Number::Real(x), Number::Real(y)) => {
            if x == 0.0 && y < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            if x < 0.0 && y.fract() != 0.0 {
                if !ctx.allow_complex_promotion {
                    return Err(EvalError::domaine(
                        "puissance non entière d'un nombre négatif",
                    ));
                }
                let z = Complex64::new(x, 0.0).powc(Complex64::new(y, 0.0));
                return Number::Complex(z).verifie("**");
            }
            Number::Real(x.powf(y)).verifie("**")
        }
        _ => {
            let (x, y) = (a.to_complex(), b.to_complex());
            if x.is_zero() {
                if y.is_zero() {
                    return Ok(Number::Complex(Complex64::new(1.0, 0.0)));
                }
                if y.re > 0.0 {
                    return Ok(Number::Complex(Complex64::zero()));
                }
                return Err(EvalError::DivisionByZero);
            }
            Number::Complex(x.powc(y)).verifie("**")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::trig::AngleMode;

    fn ctx() -> EvaluationContext {
        EvaluationContext::new(AngleMode::Degrees)
    }

    fn ok(s: &str) -> f64 {
        match evaluate_pure(s, &ctx()) {
            Ok(Number::Real(v)) => v,
            other => panic!("evaluate_pure({s:?}) -> {other:?}"),
        }
    }

    #[test]
    fn arithmetique_de_base() {
        assert_eq!(ok("5+3"), 8.0);
        assert_eq!(ok("10-3"), 7.0);
        assert_eq!(ok("5*3"), 15.0);
        assert_eq!(ok("15/3"), 5.0);
        assert_eq!(ok("5×3"), 15.0);
        assert_eq!(ok("15÷3"), 5.0);
        assert_eq!(ok("2^10"), 1024.0);
        assert_eq!(ok("-2**2"), -4.0);
        assert_eq!(ok("2*-3"), -6.0);
        assert_eq!(ok("(1+2)*(3+4)"), 21.0);
    }

    #[test]
    fn modulo_signe_du_diviseur() {
        assert_eq!(ok("7%3"), 1.0);
        assert_eq!(ok("-7%3"), 2.0);
        assert_eq!(ok("7%-3"), -2.0);
    }

    #[test]
    fn divisions_par_zero() {
        for s in ["15/0", "1%0", "0**-1", "1/(2-2)", "1/(0j)"] {
            assert_eq!(evaluate_pure(s, &ctx()), Err(EvalError::DivisionByZero), "{s}");
        }
    }

    #[test]
    fn depassements() {
        assert_eq!(evaluate_pure("10**400", &ctx()), Err(EvalError::OverflowError));
        assert_eq!(evaluate_pure("exp(1000)", &ctx()), Err(EvalError::OverflowError));
        assert_eq!(evaluate_pure("1e308*10", &ctx()), Err(EvalError::OverflowError));
        assert_eq!(evaluate_pure("1/degrees(1e308)", &ctx()), Err(EvalError::OverflowError));
    }

    #[test]
    fn puissance_negative_non_entiere() {
        assert!(matches!(
            evaluate_pure("(-8)**(1/3)", &ctx()),
            Err(EvalError::DomainError(_))
        ));
        let mut c = ctx();
        c.allow_complex_promotion = true;
        assert!(matches!(evaluate_pure("(-8)**(1/3)", &c), Ok(Number::Complex(_))));
        assert_eq!(ok("(-2)**3"), -8.0);
    }

    #[test]
    fn complexes_explicites() {
        let c = ctx();
        assert_eq!(
            evaluate_pure("(1+2j)*(1-2j)", &c),
            Ok(Number::Complex(Complex64::new(5.0, 0.0)))
        );
        assert_eq!(
            evaluate_pure("complex(1, 2) + 1", &c),
            Ok(Number::Complex(Complex64::new(2.0, 2.0)))
        );
        assert_eq!(evaluate_pure("abs(3+4j)", &c), Ok(Number::Real(5.0)));
        assert_eq!(evaluate_pure("imag(conj(1+2j))", &c), Ok(Number::Real(-2.0)));
    }

    #[test]
    fn constantes_et_ans() {
        let mut c = ctx();
        c.ans = Number::Real(42.0);
        assert_eq!(evaluate_pure("ans/2", &c), Ok(Number::Real(21.0)));
        assert!((ok("pi") - std::f64::consts::PI).abs() < 1e-15);
        assert!((ok("e") - std::f64::consts::E).abs() < 1e-15);
    }

    #[test]
    fn arithmetique_discrete() {
        assert_eq!(ok("powmod(2, 10, 1000) + fib(10)"), 79.0);
        assert_eq!(ok("isprime(2**31-1)"), 1.0);
        assert_eq!(ok("isprime(2**32+1)"), 0.0);
        assert!(matches!(
            evaluate_pure("powmod(2, -1, 7)", &ctx()),
            Err(EvalError::DomainError(_))
        ));
    }

    #[test]
    fn longue_somme_plate() {
        let somme = vec!["1"; 300].join("+");
        assert_eq!(ok(&somme), 300.0);

        let melange = vec!["2*3-1"; 500].join("+");
        assert!(melange.chars().count() < MAX_LONGUEUR);
        assert_eq!(ok(&melange), 2500.0);

        // 1-1-1-... reste associatif à gauche
        let difference = vec!["1"; 1000].join("-");
        assert_eq!(ok(&difference), -998.0);
    }

    #[test]
    fn limites() {
        let long = "1+".repeat(MAX_LONGUEUR) + "1";
        assert!(matches!(
            evaluate_pure(&long, &ctx()),
            Err(EvalError::LimitExceeded(_))
        ));
    }
}
