// src/noyau/erreur.rs
//
// Taxonomie des erreurs d'évaluation.
// - Une variante par *nature* d'erreur (pas par message) : l'UI choisit son texte.
// - Aucune erreur n'est convertie en valeur par défaut (jamais de 0 silencieux).

use thiserror::Error;

/// Erreur typée renvoyée par `ExpressionEvaluator::evaluate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// La suite de jetons ne respecte pas la grammaire (parenthèses,
    /// opérande manquant, identifiant hors liste blanche, arité...).
    #[error("erreur de syntaxe : {0}")]
    SyntaxError(String),

    /// Entrée syntaxiquement valide mais mathématiquement indéfinie.
    #[error("erreur de domaine : {0}")]
    DomainError(String),

    #[error("division par zéro")]
    DivisionByZero,

    /// Résultat hors de la plage représentable.
    #[error("dépassement de capacité")]
    OverflowError,

    /// Garde-fou (taille d'entrée, profondeur d'imbrication).
    #[error("limite dépassée : {0}")]
    LimitExceeded(String),
}

impl EvalError {
    pub(crate) fn syntaxe(msg: impl Into<String>) -> Self {
        Self::SyntaxError(msg.into())
    }

    pub(crate) fn domaine(msg: impl Into<String>) -> Self {
        Self::DomainError(msg.into())
    }

    /// Nom stable de la catégorie (journalisation, tests).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SyntaxError(_) => "syntax",
            Self::DomainError(_) => "domain",
            Self::DivisionByZero => "division_by_zero",
            Self::OverflowError => "overflow",
            Self::LimitExceeded(_) => "limit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EvalError;

    #[test]
    fn messages_stables() {
        assert_eq!(EvalError::DivisionByZero.to_string(), "division par zéro");
        assert_eq!(
            EvalError::syntaxe("parenthèses non fermées").to_string(),
            "erreur de syntaxe : parenthèses non fermées"
        );
        assert_eq!(EvalError::OverflowError.kind(), "overflow");
    }
}
