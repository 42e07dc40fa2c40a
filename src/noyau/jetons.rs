// src/noyau/jetons.rs
//
// Assainissement (glyphes d'affichage -> opérateurs canoniques) + tokenisation.
// Aucun jeton ne permet d'atteindre autre chose que la grammaire fermée :
// pas de '.', '[', guillemets, '=' ... hors d'un nombre => erreur.

use super::erreur::EvalError;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(f64),
    /// Littéral imaginaire : `3j`, `0.5j`
    Imag(f64),

    // Fonctions, constantes (le parse décide, via la liste blanche)
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    StarStar, // ** (et ^ après assainissement)
    Percent,  // modulo

    LPar,
    RPar,
    Comma,
}

/// Traduit les glyphes d'affichage vers la syntaxe canonique.
///
/// `× -> *`, `÷ -> /`, `^ -> **`, `π -> pi`, `√ -> sqrt`, `− -> -`.
pub fn sanitize(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '×' | '·' => out.push('*'),
            '÷' => out.push('/'),
            '^' => out.push_str("**"),
            'π' => out.push_str("pi"),
            '√' => out.push_str("sqrt"),
            '−' => out.push('-'),
            _ => out.push(c),
        }
    }
    out
}

/// Tokenize une chaîne (déjà assainie) en jetons.
/// Supporte:
/// - nombres décimaux (12, 1.5, .5, 5., 2e-3)
/// - imaginaires (3j)
/// - opérateurs + - * / ** %
/// - parenthèses ( ) et virgule
/// - identifiants [a-zA-Z_][a-zA-Z0-9_]* (normalisés en minuscules)
pub fn tokenize(s: &str) -> Result<Vec<Tok>, EvalError> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            ',' => Some(Tok::Comma),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            _ => None,
        };
        if let Some(t) = simple {
            out.push(t);
            i += 1;
            continue;
        }

        if c == '*' {
            if i + 1 < chars.len() && chars[i + 1] == '*' {
                out.push(Tok::StarStar);
                i += 2;
            } else {
                out.push(Tok::Star);
                i += 1;
            }
            continue;
        }

        // Identifiants ASCII : [a-zA-Z_][a-zA-Z0-9_]*
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            out.push(Tok::Ident(word.to_lowercase()));
            continue;
        }

        // Nombre : chiffres, '.' suivi ou précédé d'un chiffre
        let debut_nombre = c.is_ascii_digit()
            || (c == '.' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit());
        if debut_nombre {
            let (tok, fin) = lire_nombre(&chars, i)?;
            out.push(tok);
            i = fin;
            continue;
        }

        return Err(EvalError::syntaxe(format!("caractère inattendu: '{c}'")));
    }

    Ok(out)
}

/// Lit un littéral numérique à partir de `start`. Retourne le jeton et l'index de fin.
fn lire_nombre(chars: &[char], start: usize) -> Result<(Tok, usize), EvalError> {
    let mut i = start;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }

    // Exposant seulement s'il est suivi de chiffres : "2e" reste 2 puis ident "e".
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].is_ascii_digit() {
            while j < chars.len() && chars[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let texte: String = chars[start..i].iter().collect();
    let x: f64 = texte
        .parse()
        .map_err(|_| EvalError::syntaxe(format!("nombre invalide: {texte}")))?;
    if !x.is_finite() {
        return Err(EvalError::OverflowError);
    }

    // Suffixe imaginaire, s'il n'entame pas un identifiant ("3jx" n'est pas 3j).
    if i < chars.len() && (chars[i] == 'j' || chars[i] == 'J') {
        let colle = i + 1 < chars.len() && (chars[i + 1].is_ascii_alphanumeric() || chars[i + 1] == '_');
        if !colle {
            return Ok((Tok::Imag(x), i + 1));
        }
    }

    Ok((Tok::Num(x), i))
}

/// Format utilitaire (journalisation) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Tok::Num(x) => format!("{x}"),
            Tok::Imag(x) => format!("{x}j"),
            Tok::Ident(name) => name.clone(),

            Tok::Plus => "+".to_string(),
            Tok::Minus => "-".to_string(),
            Tok::Star => "*".to_string(),
            Tok::Slash => "/".to_string(),
            Tok::StarStar => "**".to_string(),
            Tok::Percent => "%".to_string(),

            Tok::LPar => "(".to_string(),
            Tok::RPar => ")".to_string(),
            Tok::Comma => ",".to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
