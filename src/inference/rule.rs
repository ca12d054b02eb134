//! # Regras Fuzzy
//!
//! Uma [`Rule`] liga um antecedente ([`RuleExpr`]) a um ou mais
//! consequentes `(variável, termo)`:
//!
//! ```text
//! SE stock[bajo] AND umbral[alto] ENTÃO riesgo[alto]
//!    └────────── antecedent ─────┘      └ consequent ┘
//! ```
//!
//! Duas regras podem concluir o mesmo termo — a agregação por máximo
//! faz com que se reforcem sem contar em dobro.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::RuleExpr;

/// Alvo de uma regra: termo de uma variável consequente.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

/// Regra Mamdani: antecedente + consequentes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub antecedent: RuleExpr,
    pub consequents: Vec<Consequent>,
}

impl Rule {
    /// Regra com um único consequente — o caso comum.
    pub fn new(antecedent: RuleExpr, variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            antecedent,
            consequents: vec![Consequent {
                variable: variable.into(),
                term: term.into(),
            }],
        }
    }

    /// Adiciona outro consequente (builder).
    pub fn also(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.consequents.push(Consequent {
            variable: variable.into(),
            term: term.into(),
        });
        self
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SE {} ENTÃO ", self.antecedent)?;
        for (i, c) in self.consequents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}[{}]", c.variable, c.term)?;
        }
        Ok(())
    }
}
