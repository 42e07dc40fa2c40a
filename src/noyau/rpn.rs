// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> AST
// Objectif:
// - Convertir une suite de Tok en RPN (postfix), en validant la grammaire au passage
// - Puis reconstruire Expr (itératif, profondeur bornée)
//
// Règles:
// - Ident(name): résolu dans la liste blanche (symboles.rs), sinon erreur
//    - fonction => doit être suivie de '(' ; sort en RPN avec son arité
//    - constante => atome
// - Moins/plus unaire: opérateur préfixe (précédence entre * et **)
//    -2**2 = -(2**2) ; 2*-3 = 2*(-3) ; 2**-1 = 2**(-1)
// - Pas de multiplication implicite : "2pi", "2(3)" => erreur

use super::erreur::EvalError;
use super::expr::{BinOp, Expr, UnOp};
use super::jetons::Tok;
use super::nombre::Number;
use super::symboles::{resoudre, Constante, Fonction, Symbole};

use num_complex::Complex64;

/// Garde-fou : imbrication maximale (parenthèses, appels, unaires, opérande droit).
/// L'opérande gauche d'un binaire ne compte pas : `1+1+...+1` reste à plat.
pub const MAX_PROFONDEUR: usize = 256;

/// Élément de sortie RPN.
#[derive(Clone, Debug, PartialEq)]
pub enum Rpn {
    Val(Number),
    Const(Constante),
    Un(UnOp),
    Bin(BinOp),
    Call(Fonction, usize),
}

/// Élément de la pile d'opérateurs.
#[derive(Clone, Copy, Debug)]
enum Pile {
    Un(UnOp),
    Bin(BinOp),
    Paren,
    /// '(' d'un appel ; compte les virgules vues
    Appel(Fonction, usize),
}

const PREC_UNAIRE: u8 = 3;

fn precedence(op: BinOp) -> u8 {
    match op {
        BinOp::Add | BinOp::Sub => 1,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 2,
        BinOp::Pow => 4,
    }
}

fn is_right_associative(op: BinOp) -> bool {
    matches!(op, BinOp::Pow)
}

fn bin_op(t: &Tok) -> Option<BinOp> {
    match t {
        Tok::Plus => Some(BinOp::Add),
        Tok::Minus => Some(BinOp::Sub),
        Tok::Star => Some(BinOp::Mul),
        Tok::Slash => Some(BinOp::Div),
        Tok::StarStar => Some(BinOp::Pow),
        Tok::Percent => Some(BinOp::Mod),
        _ => None,
    }
}

/// Convertit une suite de jetons en RPN (notation polonaise inversée).
///
/// Exemple:
///   tokens: [Ident("sin"), LPar, Ident("pi"), Slash, Num(2), RPar]
///   rpn:    [Const(Pi), Val(2), Bin(Div), Call(Sin, 1)]
pub fn to_rpn(tokens: &[Tok]) -> Result<Vec<Rpn>, EvalError> {
    if tokens.is_empty() {
        return Err(EvalError::syntaxe("expression vide"));
    }

    let mut out: Vec<Rpn> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Pile> = Vec::new();

    // true : le prochain jeton doit être une valeur (atome, '(', fonction, unaire)
    let mut attend_valeur = true;

    let mut i = 0;
    while i < tokens.len() {
        let tok = &tokens[i];
        i += 1;

        match tok {
            Tok::Num(_) | Tok::Imag(_) | Tok::Ident(_) if !attend_valeur => {
                return Err(EvalError::syntaxe("opérateur manquant entre deux valeurs"));
            }

            Tok::Num(x) => {
                out.push(Rpn::Val(Number::Real(*x)));
                attend_valeur = false;
            }
            Tok::Imag(x) => {
                out.push(Rpn::Val(Number::Complex(Complex64::new(0.0, *x))));
                attend_valeur = false;
            }

            Tok::Ident(name) => match resoudre(name) {
                Some(Symbole::Constante(c)) => {
                    out.push(Rpn::Const(c));
                    attend_valeur = false;
                }
                Some(Symbole::Fonction(f)) => {
                    if tokens.get(i) != Some(&Tok::LPar) {
                        return Err(EvalError::syntaxe(format!(
                            "'{}' doit être suivi de '('",
                            f.nom()
                        )));
                    }
                    i += 1;
                    ops.push(Pile::Appel(f, 0));
                    attend_valeur = true;
                }
                None => {
                    return Err(EvalError::syntaxe(format!("identifiant inconnu: {name}")));
                }
            },

            Tok::LPar => {
                if !attend_valeur {
                    return Err(EvalError::syntaxe("opérateur manquant avant '('"));
                }
                ops.push(Pile::Paren);
            }

            Tok::Comma => {
                if attend_valeur {
                    return Err(EvalError::syntaxe("argument manquant avant ','"));
                }
                loop {
                    match ops.last_mut() {
                        Some(Pile::Appel(_, virgules)) => {
                            *virgules += 1;
                            break;
                        }
                        Some(Pile::Paren) | None => {
                            return Err(EvalError::syntaxe("',' hors d'un appel de fonction"));
                        }
                        Some(_) => {
                            if let Some(op) = ops.pop() {
                                depile_vers(&mut out, op);
                            }
                        }
                    }
                }
                attend_valeur = true;
            }

            Tok::RPar => {
                // f() : appel sans argument
                if attend_valeur {
                    match ops.pop() {
                        Some(Pile::Appel(f, 0)) => {
                            pousse_appel(&mut out, f, 0)?;
                            attend_valeur = false;
                            continue;
                        }
                        _ => return Err(EvalError::syntaxe("opérande manquant avant ')'")),
                    }
                }

                // dépile jusqu'à '(' (simple ou d'appel)
                loop {
                    match ops.pop() {
                        Some(Pile::Paren) => break,
                        Some(Pile::Appel(f, virgules)) => {
                            pousse_appel(&mut out, f, virgules + 1)?;
                            break;
                        }
                        Some(op) => depile_vers(&mut out, op),
                        None => {
                            return Err(EvalError::syntaxe("')' sans '(' correspondante"));
                        }
                    }
                }
                attend_valeur = false;
            }

            Tok::Plus | Tok::Minus if attend_valeur => {
                // unaire : préfixe, ne dépile rien
                let u = if matches!(tok, Tok::Minus) {
                    UnOp::Neg
                } else {
                    UnOp::Pos
                };
                ops.push(Pile::Un(u));
            }

            Tok::Plus | Tok::Minus | Tok::Star | Tok::Slash | Tok::StarStar | Tok::Percent => {
                let Some(op) = bin_op(tok) else {
                    return Err(EvalError::syntaxe("opérateur inconnu"));
                };
                if attend_valeur {
                    return Err(EvalError::syntaxe(format!(
                        "opérande manquant avant '{}'",
                        op.symbole()
                    )));
                }

                // dépile tant que la précédence/associativité exige de sortir l'opérateur du haut
                while let Some(top) = ops.last().copied() {
                    let p_top = match top {
                        Pile::Bin(b) => precedence(b),
                        Pile::Un(_) => PREC_UNAIRE,
                        Pile::Paren | Pile::Appel(..) => break,
                    };
                    let p_tok = precedence(op);

                    let doit_pop = if is_right_associative(op) {
                        p_top > p_tok
                    } else {
                        p_top >= p_tok
                    };
                    if !doit_pop {
                        break;
                    }
                    ops.pop();
                    depile_vers(&mut out, top);
                }

                ops.push(Pile::Bin(op));
                attend_valeur = true;
            }
        }
    }

    if attend_valeur {
        return Err(EvalError::syntaxe("expression incomplète"));
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if matches!(op, Pile::Paren | Pile::Appel(..)) {
            return Err(EvalError::syntaxe("parenthèses non fermées"));
        }
        depile_vers(&mut out, op);
    }

    Ok(out)
}

fn depile_vers(out: &mut Vec<Rpn>, op: Pile) {
    match op {
        Pile::Un(u) => out.push(Rpn::Un(u)),
        Pile::Bin(b) => out.push(Rpn::Bin(b)),
        Pile::Paren | Pile::Appel(..) => {}
    }
}

fn pousse_appel(out: &mut Vec<Rpn>, f: Fonction, n: usize) -> Result<(), EvalError> {
    if !f.arite().accepte(n) {
        return Err(EvalError::syntaxe(format!(
            "{}: nombre d'arguments invalide ({n})",
            f.nom()
        )));
    }
    out.push(Rpn::Call(f, n));
    Ok(())
}

/// Construit une Expr à partir d'une RPN.
/// Chaque noeud porte son imbrication : au-delà de MAX_PROFONDEUR, on refuse.
/// L'évaluation parcourt la branche gauche des binaires en boucle, d'où `pa` sans +1.
pub fn from_rpn(rpn: &[Rpn]) -> Result<Expr, EvalError> {
    let mut st: Vec<(Expr, usize)> = Vec::new();

    fn invalide() -> EvalError {
        EvalError::syntaxe("expression invalide")
    }

    for item in rpn {
        let (e, prof) = match item {
            Rpn::Val(n) => (Expr::Literal(*n), 1),
            Rpn::Const(c) => (Expr::Identifier(*c), 1),

            Rpn::Un(u) => {
                let (x, p) = st.pop().ok_or_else(invalide)?;
                (Expr::Unary(*u, Box::new(x)), p + 1)
            }

            Rpn::Bin(op) => {
                let (b, pb) = st.pop().ok_or_else(invalide)?;
                let (a, pa) = st.pop().ok_or_else(invalide)?;
                (Expr::Binary(*op, Box::new(a), Box::new(b)), pa.max(pb + 1))
            }

            Rpn::Call(f, n) => {
                if st.len() < *n {
                    return Err(invalide());
                }
                let args_p = st.split_off(st.len() - n);
                let prof = args_p.iter().map(|(_, p)| *p).max().unwrap_or(0) + 1;
                let args = args_p.into_iter().map(|(e, _)| e).collect();
                (Expr::Call(*f, args), prof)
            }
        };

        if prof > MAX_PROFONDEUR {
            return Err(EvalError::LimitExceeded(format!(
                "imbrication supérieure à {MAX_PROFONDEUR}"
            )));
        }
        st.push((e, prof));
    }

    match (st.pop(), st.is_empty()) {
        (Some((e, _)), true) => Ok(e),
        _ => Err(invalide()),
    }
}
