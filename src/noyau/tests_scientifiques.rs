//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : vérifier les propriétés du noyau de bout en bout, sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//!
//! Notes :
//! - Les angles spéciaux ne sont reconnus qu'en DEG/GRAD, sur des entiers.
//!   En RAD, sin(pi) vaut ~1.2e-16 : on compare avec une tolérance.
//! - L'imbrication (parenthèses, appels, unaires, opérande droit) est bornée à 256 :
//!   au-delà, LimitExceeded (jamais de débordement de pile). Une somme plate ne l'est pas.

use std::time::{Duration, Instant};

use super::rpn::MAX_PROFONDEUR;
use super::*;

fn eval_ok(expr: &str, mode: AngleMode) -> f64 {
    match evaluate_pure(expr, &EvaluationContext::new(mode)) {
        Ok(Number::Real(v)) => v,
        other => panic!("expr={expr:?} mode={mode:?} -> {other:?}"),
    }
}

fn eval_err(expr: &str) -> EvalError {
    match evaluate_pure(expr, &EvaluationContext::new(AngleMode::Degrees)) {
        Err(e) => e,
        Ok(v) => panic!("expr={expr:?} aurait dû échouer, obtenu {v:?}"),
    }
}

fn proche(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Invariants trig ------------------------ */

#[test]
fn sci_indefinis_tan() {
    for s in ["tan(90)", "tan(270)", "tan(-90)", "tan(450)"] {
        assert!(matches!(eval_err(s), EvalError::DomainError(_)), "{s}");
    }
    let g = EvaluationContext::new(AngleMode::Gradians);
    assert!(matches!(
        evaluate_pure("tan(100)", &g),
        Err(EvalError::DomainError(_))
    ));
}

#[test]
fn sci_identites_symetrie() {
    let d = AngleMode::Degrees;
    // sin(-x) = -sin(x)
    assert_eq!(eval_ok("sin(-45)", d), -eval_ok("sin(45)", d));
    // cos(-x) = cos(x)
    assert_eq!(eval_ok("cos(-60)", d), eval_ok("cos(60)", d));
    // tan(-x) = -tan(x) (hors indéfini)
    assert_eq!(eval_ok("tan(-30)", d), -eval_ok("tan(30)", d));
}

#[test]
fn sci_periodicite_angles() {
    let d = AngleMode::Degrees;
    assert_eq!(eval_ok("sin(45+360)", d), eval_ok("sin(45)", d));
    assert_eq!(eval_ok("cos(60+720)", d), 0.5);
    assert_eq!(eval_ok("sin(180)", d), 0.0);
    assert_eq!(eval_ok("cos(90)", d), 0.0);

    let g = AngleMode::Gradians;
    assert_eq!(eval_ok("sin(200)", g), 0.0);
    assert_eq!(eval_ok("cos(400)", g), 1.0);
}

#[test]
fn sci_aller_retour_tous_modes() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    for mode in AngleMode::TOUS {
        // angle de test exprimé dans le mode : 0.3 rad ramené dans le mode
        let a = mode.from_radians(0.3);
        for (direct, inverse) in [("sin", "asin"), ("cos", "acos"), ("tan", "atan")] {
            budget(t0, max);
            let expr = format!("{inverse}({direct}({a}))");
            let v = eval_ok(&expr, mode);
            assert!(proche(v, a, 1e-12), "{expr} en {mode:?} : {v} != {a}");
        }
    }
}

#[test]
fn sci_radians_tolerance() {
    let r = AngleMode::Radians;
    assert!(eval_ok("sin(pi)", r).abs() < 1e-15);
    assert!(proche(eval_ok("cos(pi/3)", r), 0.5, 1e-15));
    // en radians, tan(pi/2) n'est pas exactement représentable : grand, pas une erreur
    assert!(eval_ok("tan(pi/2)", r).abs() > 1e15);
}

#[test]
fn sci_conversions_explicites() {
    let d = AngleMode::Degrees;
    assert!(proche(eval_ok("radians(180)", d), std::f64::consts::PI, 1e-15));
    assert!(proche(eval_ok("degrees(pi)", d), 180.0, 1e-15));
    assert!(proche(eval_ok("phase(1j)", d), 90.0, 1e-12));
    assert!(proche(eval_ok("phase(1j)", AngleMode::Radians), std::f64::consts::FRAC_PI_2, 1e-15));
}

/* ------------------------ Arithmétique et précédences ------------------------ */

#[test]
fn sci_precedences() {
    let d = AngleMode::Degrees;
    assert_eq!(eval_ok("-2**2", d), -4.0);
    assert_eq!(eval_ok("2**-1", d), 0.5);
    assert_eq!(eval_ok("2**3**2", d), 512.0);
    assert_eq!(eval_ok("2+3*4", d), 14.0);
    assert_eq!(eval_ok("(2+3)*4", d), 20.0);
    assert_eq!(eval_ok("10-4-3", d), 3.0);
    assert_eq!(eval_ok("2*3%4", d), 2.0);
    assert_eq!(eval_ok("--3", d), 3.0);
    assert_eq!(eval_ok("+3", d), 3.0);
}

#[test]
fn sci_fonctions_usuelles() {
    let d = AngleMode::Degrees;
    assert_eq!(eval_ok("sqrt(16)", d), 4.0);
    assert_eq!(eval_ok("√16", d), 4.0);
    assert_eq!(eval_ok("log(1000)", d), 3.0);
    assert_eq!(eval_ok("log10(0.01)", d), -2.0);
    assert!(proche(eval_ok("ln(e)", d), 1.0, 1e-15));
    assert!(proche(eval_ok("exp(1)", d), std::f64::consts::E, 1e-15));
    assert_eq!(eval_ok("factorial(5)", d), 120.0);
    assert_eq!(eval_ok("fact(5)", d), 120.0);
    assert_eq!(eval_ok("comb(5, 2) + perm(5, 2)", d), 30.0);
    assert_eq!(eval_ok("gcd(12, 18) * lcm(4, 6)", d), 72.0);
    assert!(proche(eval_ok("tau", d), 2.0 * std::f64::consts::PI, 1e-15));
    assert_eq!(eval_ok("isclose(0.1+0.2, 0.3)", d), 1.0);
    assert_eq!(eval_ok("abs(-3) + int(2.9) + float(1)", d), 6.0);
    assert!(proche(eval_ok("π", d), std::f64::consts::PI, 1e-15));
}

#[test]
fn sci_domaines() {
    for s in [
        "sqrt(-1)",
        "ln(-1)",
        "log(0)",
        "ln(0)",
        "asin(2)",
        "acos(-1.5)",
        "acosh(0.5)",
        "atanh(1)",
        "factorial(-1)",
        "factorial(2.5)",
        "comb(-1, 2)",
        "gcd(1.5, 2)",
        "factorial(1j)",
        "(-8)**0.5",
        "1j % 2",
    ] {
        assert!(
            matches!(eval_err(s), EvalError::DomainError(_)),
            "{s} devrait être une DomainError"
        );
    }
}

#[test]
fn sci_divisions_et_depassements() {
    assert_eq!(eval_err("15/0"), EvalError::DivisionByZero);
    assert_eq!(eval_err("5%0"), EvalError::DivisionByZero);
    assert_eq!(eval_err("0**-2"), EvalError::DivisionByZero);
    assert_eq!(eval_err("factorial(171)"), EvalError::OverflowError);
    assert_eq!(eval_err("1e999"), EvalError::OverflowError);
    assert_eq!(eval_err("2**2000"), EvalError::OverflowError);
    assert_eq!(eval_err("perm(100000, 50000)"), EvalError::OverflowError);
}

/* ------------------------ Liste blanche ------------------------ */

#[test]
fn sci_hors_liste_blanche() {
    for s in [
        "__import__('os')",
        "math.pi",
        "x[0]",
        "\"a\"",
        "open(1)",
        "eval(1)",
        "sin.x",
        "pi = 3",
        "lambda",
        "2pi",
        "sin 2",
        "()",
        "1,2",
        "",
        "   ",
    ] {
        assert!(
            matches!(eval_err(s), EvalError::SyntaxError(_)),
            "{s:?} devrait être une SyntaxError"
        );
    }
}

#[test]
fn sci_parse_ast_ferme() {
    let e = parse("1 + 2*3").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(e.to_string(), "(1 + (2 * 3))");
    let e = parse("-2**2").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(e.to_string(), "(-(2 ** 2))");
}

/* ------------------------ Limites ------------------------ */

#[test]
fn sci_profondeur_bornee() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let ok = format!("{}1{}", "(".repeat(MAX_PROFONDEUR / 2), ")".repeat(MAX_PROFONDEUR / 2));
    assert_eq!(eval_ok(&ok, AngleMode::Degrees), 1.0);

    let trop = format!("{}1", "-".repeat(MAX_PROFONDEUR + 10));
    assert!(matches!(eval_err(&trop), EvalError::LimitExceeded(_)));

    let trop = format!("{}1{}", "sin(".repeat(MAX_PROFONDEUR + 1), ")".repeat(MAX_PROFONDEUR + 1));
    assert!(matches!(eval_err(&trop), EvalError::LimitExceeded(_)));
    budget(t0, max);
}

#[test]
fn sci_somme_longue_iterative() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    // 1+1+...+1 : branche gauche parcourue en boucle, seule la longueur borne
    let courte = vec!["1"; 200].join("+");
    assert_eq!(eval_ok(&courte, AngleMode::Degrees), 200.0);
    let longue = vec!["1"; 2000].join("+");
    assert_eq!(eval_ok(&longue, AngleMode::Degrees), 2000.0);
    let trop_longue = vec!["1"; 2100].join("+");
    assert!(matches!(eval_err(&trop_longue), EvalError::LimitExceeded(_)));
    budget(t0, max);
}

/* ------------------------ Format ------------------------ */

#[test]
fn sci_format_proprietes() {
    for k in [0i64, 1, -7, 42, 1_000_000, -123_456_789] {
        let s = format_number(Number::Real(k as f64), NumberFormat::Normal, 10);
        assert!(!s.contains('.'), "{s}");
        assert!(!s.contains('e'), "{s}");
        assert_eq!(s, k.to_string());
    }
    for p in 0..=15 {
        let s = format_number(Number::Real(std::f64::consts::PI), NumberFormat::Scientific, p);
        let mantisse = s.split('e').next().unwrap_or_default();
        let decimales = mantisse.split_once('.').map_or(0, |(_, f)| f.len());
        assert_eq!(decimales, p, "{s}");

        let s = format_number(Number::Real(123456.0), NumberFormat::Engineering, p);
        let exp: i32 = s.split('e').nth(1).and_then(|e| e.parse().ok()).unwrap_or(-1);
        assert_eq!(exp % 3, 0, "{s}");
    }
}

/* ------------------------ Historique / évaluateur ------------------------ */

#[test]
fn sci_historique_cap() {
    let n = 100;
    let k = 17;
    let mut ev = ExpressionEvaluator::default();
    for i in 0..(n + k) {
        ev.evaluate(&format!("{i}+0"), AngleMode::Degrees)
            .unwrap_or_else(|e| panic!("{e}"));
    }
    let h = ev.get_history(None);
    assert_eq!(h.len(), n);
    assert_eq!(h[0].expression, format!("{k}+0"));
    assert_eq!(h[n - 1].expression, format!("{}+0", n + k - 1));
}

/* ------------------------ Saisie ------------------------ */

#[test]
fn sci_saisie_identite_litteraux() {
    for lit in ["0", "9", "12", "3.25", "1000000", "0.000001"] {
        let mut m = InputStateMachine::new();
        m.clear();
        for c in lit.chars() {
            m.append_digit(c);
        }
        m.equals();
        assert_eq!(m.display_value(), lit);
    }
}
