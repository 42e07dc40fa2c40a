// src/noyau/expr.rs
//
// AST étiqueté, sans capacité réflexive :
// - Literal    : nombre (réel ou imaginaire pur)
// - Identifier : constante déjà résolue dans la liste blanche
// - Unary      : moins / plus unaire
// - Binary     : + - * / ** %
// - Call       : fonction de la liste blanche + arguments
//
// Les noms sont résolus au parse (rpn.rs) : l'évaluateur ne voit jamais de chaîne.

use std::fmt;

use super::nombre::Number;
use super::symboles::{Constante, Fonction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
}

impl BinOp {
    pub fn symbole(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Pow => "**",
            BinOp::Mod => "%",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Literal(Number),
    Identifier(Constante),
    Unary(UnOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Fonction, Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(Number::Real(x)) => write!(f, "{x}"),
            Expr::Literal(Number::Complex(z)) => write!(f, "{}j", z.im),
            Expr::Identifier(c) => {
                let nom = match c {
                    Constante::Pi => "pi",
                    Constante::E => "e",
                    Constante::Tau => "tau",
                    Constante::Ans => "ans",
                };
                f.write_str(nom)
            }
            Expr::Unary(UnOp::Neg, x) => write!(f, "(-{x})"),
            Expr::Unary(UnOp::Pos, x) => write!(f, "(+{x})"),
            Expr::Binary(op, a, b) => write!(f, "({a} {} {b})", op.symbole()),
            Expr::Call(fonction, args) => {
                write!(f, "{}(", fonction.nom())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}
