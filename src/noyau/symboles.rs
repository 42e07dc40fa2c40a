// src/noyau/symboles.rs
//
// Table des symboles FERMÉE (liste blanche) + contexte d'évaluation.
//
// Tout identifiant est résolu ici, au moment du parse : un nom absent de la table
// est une erreur de syntaxe, jamais une recherche dynamique.

use super::nombre::Number;
use super::trig::AngleMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constante {
    Pi,
    E,
    Tau,
    /// Dernier résultat réussi.
    Ans,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fonction {
    // trigonométrie (enveloppées par le mode d'angle)
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,

    // hyperboliques (pas d'angle)
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,

    Sqrt,
    Log10, // log(x) et log10(x) ; log(x, base)
    Ln,
    Exp,
    Abs,

    Factorial,
    Gcd,
    Lcm,
    Comb,
    Perm,

    // arithmétique discrète (discret.rs)
    IsPrime,
    PowMod,
    Fib,

    Gamma,
    Erf,
    IsClose,

    // complexes
    Complex,
    Real,
    Imag,
    Conj,
    Phase,

    Radians,
    Degrees,
    Round,
    Int,
    Float,
}

/// Arité acceptée : (min, max). `None` = variadique.
#[derive(Clone, Copy, Debug)]
pub struct Arite {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arite {
    const fn fixe(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }
    const fn entre(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }
    const fn au_moins(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn accepte(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |m| n <= m)
    }
}

impl Fonction {
    pub fn arite(self) -> Arite {
        use Fonction::*;
        match self {
            Log10 => Arite::entre(1, 2),
            Round => Arite::entre(1, 2),
            Complex => Arite::entre(1, 2),
            IsClose => Arite::entre(2, 4),
            Comb | Perm => Arite::fixe(2),
            PowMod => Arite::fixe(3),
            Gcd | Lcm => Arite::au_moins(1),
            _ => Arite::fixe(1),
        }
    }

    /// Nom canonique (affichage, journalisation).
    pub fn nom(self) -> &'static str {
        use Fonction::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Asinh => "asinh",
            Acosh => "acosh",
            Atanh => "atanh",
            Sqrt => "sqrt",
            Log10 => "log",
            Ln => "ln",
            Exp => "exp",
            Abs => "abs",
            Factorial => "factorial",
            Gcd => "gcd",
            Lcm => "lcm",
            Comb => "comb",
            Perm => "perm",
            IsPrime => "isprime",
            PowMod => "powmod",
            Fib => "fib",
            Gamma => "gamma",
            Erf => "erf",
            IsClose => "isclose",
            Complex => "complex",
            Real => "real",
            Imag => "imag",
            Conj => "conj",
            Phase => "phase",
            Radians => "radians",
            Degrees => "degrees",
            Round => "round",
            Int => "int",
            Float => "float",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbole {
    Fonction(Fonction),
    Constante(Constante),
}

/// Résolution d'un identifiant (déjà en minuscules) dans la liste blanche.
pub fn resoudre(nom: &str) -> Option<Symbole> {
    use Fonction::*;

    let f = match nom {
        "pi" => return Some(Symbole::Constante(Constante::Pi)),
        "e" => return Some(Symbole::Constante(Constante::E)),
        "tau" => return Some(Symbole::Constante(Constante::Tau)),
        "ans" => return Some(Symbole::Constante(Constante::Ans)),

        "sin" => Sin,
        "cos" => Cos,
        "tan" => Tan,
        "asin" | "arcsin" => Asin,
        "acos" | "arccos" => Acos,
        "atan" | "arctan" => Atan,
        "sinh" => Sinh,
        "cosh" => Cosh,
        "tanh" => Tanh,
        "asinh" => Asinh,
        "acosh" => Acosh,
        "atanh" => Atanh,
        "sqrt" => Sqrt,
        "log" | "log10" => Log10,
        "ln" => Ln,
        "exp" => Exp,
        "abs" => Abs,
        "factorial" | "fact" => Factorial,
        "gcd" => Gcd,
        "lcm" => Lcm,
        "comb" => Comb,
        "perm" => Perm,
        "isprime" => IsPrime,
        "powmod" => PowMod,
        "fib" | "fibonacci" => Fib,
        "gamma" => Gamma,
        "erf" => Erf,
        "isclose" => IsClose,
        "complex" => Complex,
        "real" => Real,
        "imag" => Imag,
        "conj" => Conj,
        "phase" => Phase,
        "radians" => Radians,
        "degrees" => Degrees,
        "round" => Round,
        "int" => Int,
        "float" => Float,
        _ => return None,
    };
    Some(Symbole::Fonction(f))
}

/// Vue immuable, reconstruite à chaque évaluation.
/// Le mode d'angle et `ans` sont passés explicitement, jamais lus dans un état global.
#[derive(Clone, Copy, Debug)]
pub struct EvaluationContext {
    pub mode: AngleMode,
    pub ans: Number,
    pub allow_complex_promotion: bool,
}

impl EvaluationContext {
    pub fn new(mode: AngleMode) -> Self {
        Self {
            mode,
            ans: Number::default(),
            allow_complex_promotion: false,
        }
    }

    pub fn constante(&self, c: Constante) -> Number {
        match c {
            Constante::Pi => Number::Real(std::f64::consts::PI),
            Constante::E => Number::Real(std::f64::consts::E),
            Constante::Tau => Number::Real(std::f64::consts::TAU),
            Constante::Ans => self.ans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liste_blanche_fermee() {
        assert_eq!(resoudre("sin"), Some(Symbole::Fonction(Fonction::Sin)));
        assert_eq!(resoudre("log10"), Some(Symbole::Fonction(Fonction::Log10)));
        assert_eq!(resoudre("ans"), Some(Symbole::Constante(Constante::Ans)));
        assert_eq!(resoudre("fibonacci"), Some(Symbole::Fonction(Fonction::Fib)));
        for nom in ["__import__", "eval", "math", "os", "__builtins__", "x", "open"] {
            assert_eq!(resoudre(nom), None, "{nom} ne doit pas être résolu");
        }
    }

    #[test]
    fn arites() {
        assert!(Fonction::Gcd.arite().accepte(5));
        assert!(!Fonction::Gcd.arite().accepte(0));
        assert!(Fonction::Log10.arite().accepte(2));
        assert!(!Fonction::Sin.arite().accepte(2));
        assert!(Fonction::PowMod.arite().accepte(3));
        assert!(!Fonction::PowMod.arite().accepte(2));
    }
}
