//! Propriétés de la machine de saisie, vue de l'extérieur.

use proptest::prelude::*;
use smartcalc::InputStateMachine;

fn taper(m: &mut InputStateMachine, texte: &str) {
    for c in texte.chars() {
        m.append_digit(c);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// clear ; chiffres… ; equals  =>  le littéral tapé est affiché tel quel.
    #[test]
    fn litteral_identite(lit in "[1-9][0-9]{0,8}(\\.[0-9]{1,6})?") {
        let mut m = InputStateMachine::new();
        m.clear();
        taper(&mut m, &lit);
        m.equals();
        prop_assert_eq!(m.display_value(), lit.as_str());
    }

    /// % divise exactement par 100, sans jamais d'exposant.
    #[test]
    fn pourcentage_exact(lit in "[1-9][0-9]{0,6}(\\.[0-9]{1,4})?") {
        let mut m = InputStateMachine::new();
        taper(&mut m, &lit);
        m.percent();
        let v = m.display_value();
        prop_assert!(!v.contains('e'), "{}", v);
        let attendu: f64 = lit.parse::<f64>().unwrap() / 100.0;
        let obtenu: f64 = v.parse().unwrap();
        prop_assert!((obtenu - attendu).abs() <= 1e-12 * attendu.abs().max(1.0));
    }

    /// Deux opérateurs consécutifs : le second remplace le premier.
    #[test]
    fn remplacement_operateur(
        lit in "[1-9][0-9]{0,4}",
        a in prop_oneof![Just('+'), Just('-'), Just('*'), Just('/')],
        b in prop_oneof![Just('+'), Just('-'), Just('×'), Just('÷')],
    ) {
        let mut m = InputStateMachine::new();
        taper(&mut m, &lit);
        m.set_operator(a);
        m.set_operator(b);
        prop_assert_eq!(m.display_expression(), format!("{lit}{b}"));
    }
}

#[test]
fn cinq_plus_moins() {
    let mut m = InputStateMachine::new();
    m.append_digit('5');
    m.set_operator('+');
    m.set_operator('-');
    assert_eq!(m.display_expression(), "5-");
}
