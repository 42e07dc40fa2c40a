//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - invariant clé : un succès est toujours fini, un échec toujours typé
//! - machine de saisie : l'expression est vide ou finit par un opérateur

use std::time::{Duration, Instant};

use super::*;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

const UNAIRES: [&str; 14] = [
    "sin", "cos", "tan", "asin", "acos", "atan", "sqrt", "ln", "log", "exp", "abs", "factorial",
    "gamma", "sinh",
];

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(8) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}", rng.pick(400)),
        3 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        4 => format!("{}e{}", rng.pick(9) + 1, rng.pick(7)),
        5 => format!("{}j", rng.pick(5)),
        6 => rng.choose(&["pi", "e", "tau", "ans"]).to_string(),
        _ => format!("{}", [30, 45, 60, 90, 180, 270][rng.pick(6) as usize]),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_nombre(rng);
    }

    match rng.pick(10) {
        0 => gen_nombre(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("{}*{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("{}**{}", gen_nombre(rng), gen_nombre(rng)),
        6 => format!("({}%{})", gen_expr(rng, depth - 1), gen_nombre(rng)),
        7 => format!("-{}", gen_expr(rng, depth - 1)),
        8 => format!(
            "{}({},{})",
            rng.choose(&["comb", "perm", "gcd", "lcm", "isclose", "round", "log"]),
            gen_nombre(rng),
            gen_nombre(rng)
        ),
        _ => format!("{}({})", rng.choose(&UNAIRES), gen_expr(rng, depth - 1)),
    }
}

/// Mutation grossière : insère un caractère quelconque (souvent hors grammaire).
fn muter(rng: &mut Rng, s: &str) -> String {
    const BRUIT: [char; 12] = ['(', ')', ',', '.', '[', '\'', '=', '*', 'x', ' ', '^', '√'];
    let mut chars: Vec<char> = s.chars().collect();
    let pos = rng.pick(chars.len() as u32 + 1) as usize;
    chars.insert(pos, BRUIT[rng.pick(BRUIT.len() as u32) as usize]);
    chars.into_iter().collect()
}

fn check_resultat(expr: &str, r: &Result<Number, EvalError>) {
    match r {
        Ok(v) => assert!(v.is_finite(), "résultat non fini: expr={expr:?} v={v:?}"),
        Err(e) => assert!(!e.to_string().is_empty(), "erreur sans message: expr={expr:?}"),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_invariants() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xC0FFEE_u64);
    let mut ev1 = ExpressionEvaluator::default();
    let mut ev2 = ExpressionEvaluator::default();

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let mode = AngleMode::TOUS[rng.pick(3) as usize];

        // Même entrée, même état => même sortie (déterminisme)
        let r1 = ev1.evaluate(&expr, mode);
        let r2 = ev2.evaluate(&expr, mode);
        assert_eq!(r1, r2, "non déterministe: expr={expr:?}");
        check_resultat(&expr, &r1);

        if r1.is_ok() {
            seen_ok += 1;
        } else {
            seen_err += 1;
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne "balaye" rien.
    assert!(seen_ok > 10, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop \"sage\"");
    assert_eq!(ev1.get_history(None).len(), seen_ok.min(100));
}

#[test]
fn fuzz_safe_mutations_jamais_de_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let ctx = EvaluationContext::new(AngleMode::Degrees);

    for _ in 0..200 {
        budget(t0, max);

        let base = gen_expr(&mut rng, 3);
        let expr = muter(&mut rng, &base);
        let r = evaluate_pure(&expr, &ctx);
        check_resultat(&expr, &r);

        // aucun caractère interdit ne passe jamais la grammaire
        if expr.contains(['[', '\'', '=']) {
            assert!(
                matches!(r, Err(EvalError::SyntaxError(_))),
                "accepté à tort: {expr:?} -> {r:?}"
            );
        }
    }
}

#[test]
fn fuzz_safe_machine_de_saisie() {
    let t0 = Instant::now();
    let max = Duration::from_millis(300);

    let mut rng = Rng::new(0x5A15_1E_u64);
    let mut m = InputStateMachine::new();

    for _ in 0..2000 {
        budget(t0, max);

        match rng.pick(12) {
            0..=4 => m.append_digit(char::from(b'0' + rng.pick(10) as u8)),
            5 => m.append_decimal(),
            6 => m.set_operator(['+', '-', '*', '/'][rng.pick(4) as usize]),
            7 => m.toggle_sign(),
            8 => m.percent(),
            9 => m.equals(),
            10 if rng.coin() => m.clear(),
            _ => m.append_digit('7'),
        }

        let expr = m.display_expression();
        assert!(
            expr.is_empty() || expr.ends_with(['+', '-', '×', '÷']),
            "expression mal formée: {expr:?}"
        );
        let v = m.display_value();
        assert!(
            m.is_error() || v.parse::<f64>().is_ok(),
            "valeur affichée illisible: {v:?}"
        );
        assert!(!v.contains('e'), "exposant affiché: {v:?}");
    }
}
