//! Noyau de calcul
//!
//! Organisation interne :
//! - erreur.rs     : EvalError (erreurs typées)
//! - nombre.rs     : Number (réel / complexe)
//! - jetons.rs     : assainissement + tokenisation
//! - symboles.rs   : liste blanche (fonctions, constantes) + EvaluationContext
//! - expr.rs       : AST (Literal | Identifier | Unary | Binary | Call)
//! - rpn.rs        : shunting-yard + construction Expr
//! - trig.rs       : AngleMode + angles spéciaux + indéfini
//! - fonctions.rs  : application des fonctions de la liste blanche
//! - discret.rs    : primalité, facteurs premiers, powmod, Fibonacci
//! - conversion.rs : conversions d'unités (longueur, masse, température...)
//! - lecture.rs    : décimal exact (rationnels)
//! - format.rs     : Normal / Scientifique / Ingénieur
//! - eval.rs       : pipeline complet (pur)
//! - historique.rs : HistoryLog borné
//! - memoire.rs    : MemoryCell
//! - evaluateur.rs : ExpressionEvaluator (ans + historique + mémoire)
//! - saisie.rs     : InputStateMachine (pavé numérique)

pub mod conversion;
pub mod discret;
pub mod erreur;
pub mod eval;
pub mod evaluateur;
pub mod expr;
pub mod fonctions;
pub mod format;
pub mod historique;
pub mod jetons;
pub mod lecture;
pub mod memoire;
pub mod nombre;
pub mod rpn;
pub mod saisie;
pub mod symboles;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique
pub use conversion::{convertir, Grandeur};
pub use discret::format_facteurs;
pub use erreur::EvalError;
pub use eval::{evaluate_pure, parse};
pub use evaluateur::{EvaluatorConfig, ExpressionEvaluator};
pub use expr::Expr;
pub use format::{format_number, NumberFormat};
pub use historique::{HistoryEntry, HistoryLog};
pub use memoire::MemoryCell;
pub use nombre::Number;
pub use saisie::InputStateMachine;
pub use symboles::EvaluationContext;
pub use trig::AngleMode;
