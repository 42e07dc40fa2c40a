// src/lib.rs
//
// Calculatrice scientifique : noyau de calcul + configuration.
// L'interface (eframe) vit dans le binaire et ne fait qu'appeler ce qui suit.

pub mod config;
pub mod noyau;

pub use config::{AppConfig, ConfigError};
pub use noyau::{
    convertir, evaluate_pure, format_facteurs, format_number, AngleMode, EvalError, EvaluationContext, EvaluatorConfig,
    ExpressionEvaluator, Grandeur, HistoryEntry, HistoryLog, InputStateMachine, MemoryCell, Number,
    NumberFormat,
};
