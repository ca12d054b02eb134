//! # Árvore de Expressões de Regra
//!
//! Antecedentes de regra são árvores [`RuleExpr`] compostas por referências
//! a termos e pelos operadores de Zadeh:
//!
//! | Nó | Avaliação |
//! |----|-----------|
//! | `Term(v, t)` | `F[v][t]` — grau fuzzificado |
//! | `And(l, r)` | `min(l, r)` |
//! | `Or(l, r)` | `max(l, r)` |
//! | `Not(e)` | `1 − e` |
//!
//! Sem variantes probabilísticas (produto, soma limitada): apenas
//! min / max / complemento.
//!
//! ## Exemplo
//!
//! ```rust
//! // stock['medio'] & ~umbral['alto']
//! let expr = RuleExpr::and(
//!     RuleExpr::term("stock", "medio"),
//!     RuleExpr::not(RuleExpr::term("umbral", "alto")),
//! );
//! println!("{}", expr); // (stock[medio] AND NOT umbral[alto])
//! ```
//!
//! ## Formato JSON
//!
//! ```json
//! { "and": [
//!     { "term": { "variable": "stock", "term": "medio" } },
//!     { "not": { "term": { "variable": "umbral", "term": "alto" } } }
//! ] }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::FuzzyError;

/// Resultado da fuzzificação: variável → (termo → grau).
pub type Fuzzified = BTreeMap<String, BTreeMap<String, f64>>;

/// Nó da árvore de expressão de um antecedente. Imutável depois de montado.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleExpr {
    /// Referência a um termo de uma variável antecedente.
    Term { variable: String, term: String },
    And(Box<RuleExpr>, Box<RuleExpr>),
    Or(Box<RuleExpr>, Box<RuleExpr>),
    Not(Box<RuleExpr>),
}

impl RuleExpr {
    pub fn term(variable: impl Into<String>, term: impl Into<String>) -> Self {
        RuleExpr::Term {
            variable: variable.into(),
            term: term.into(),
        }
    }

    pub fn and(left: RuleExpr, right: RuleExpr) -> Self {
        RuleExpr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: RuleExpr, right: RuleExpr) -> Self {
        RuleExpr::Or(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: RuleExpr) -> Self {
        RuleExpr::Not(Box::new(inner))
    }

    /// Avalia o grau de verdade da expressão contra um snapshot fuzzificado.
    ///
    /// # Erros
    ///
    /// - `MissingInput` se a variável referenciada não foi fuzzificada
    /// - `InvalidParameters` se o termo não existe na variável
    pub fn evaluate(&self, snapshot: &Fuzzified) -> Result<f64, FuzzyError> {
        match self {
            RuleExpr::Term { variable, term } => {
                let degrees = snapshot.get(variable).ok_or_else(|| FuzzyError::MissingInput {
                    variable: variable.clone(),
                })?;
                degrees.get(term).copied().ok_or_else(|| {
                    FuzzyError::invalid(format!(
                        "termo '{}' não existe em '{}'",
                        term, variable
                    ))
                })
            }
            RuleExpr::And(l, r) => Ok(l.evaluate(snapshot)?.min(r.evaluate(snapshot)?)),
            RuleExpr::Or(l, r) => Ok(l.evaluate(snapshot)?.max(r.evaluate(snapshot)?)),
            RuleExpr::Not(inner) => Ok(1.0 - inner.evaluate(snapshot)?),
        }
    }

    /// Todas as referências `(variável, termo)` da árvore, na ordem em que aparecem.
    pub fn references(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            RuleExpr::Term { variable, term } => out.push((variable.as_str(), term.as_str())),
            RuleExpr::And(l, r) | RuleExpr::Or(l, r) => {
                l.collect_references(out);
                r.collect_references(out);
            }
            RuleExpr::Not(inner) => inner.collect_references(out),
        }
    }
}

impl fmt::Display for RuleExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleExpr::Term { variable, term } => write!(f, "{}[{}]", variable, term),
            RuleExpr::And(l, r) => write!(f, "({} AND {})", l, r),
            RuleExpr::Or(l, r) => write!(f, "({} OR {})", l, r),
            RuleExpr::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}
