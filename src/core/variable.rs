//! # Variável Fuzzy — Termos Linguísticos sobre um Universo
//!
//! Uma [`FuzzyVariable`] associa um **nome** (ex: `stock`) a um [`Universe`]
//! e a um conjunto de **termos linguísticos** (ex: `bajo`, `medio`, `alto`),
//! cada um descrito por uma [`MembershipFunction`].
//!
//! ## Papéis
//!
//! | Papel | Uso no ciclo de inferência |
//! |-------|----------------------------|
//! | [`VariableRole::Antecedent`] | Lida na fuzzificação das entradas |
//! | [`VariableRole::Consequent`] | Escrita na agregação, lida na defuzzificação |
//!
//! ## Exemplo
//!
//! ```rust
//! let mut stock = FuzzyVariable::antecedent("stock", Universe::new(0.0, 100.0, 1.0)?);
//! stock.add_term("bajo", MembershipFunction::trapezoidal(0.0, 0.0, 10.0, 30.0)?)?;
//! stock.add_term("medio", MembershipFunction::triangular(20.0, 50.0, 80.0)?)?;
//!
//! let snapshot = stock.fuzzify(20.0);
//! assert_eq!(snapshot["bajo"], 0.5);
//! ```
//!
//! A variável é montada uma vez na construção do motor e é imutável depois.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{FuzzyError, MembershipFunction, Universe};
use crate::inference::DefuzzMethod;

/// Papel da variável no sistema de inferência.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRole {
    /// Entrada — fuzzificada a partir de um valor crisp.
    Antecedent,
    /// Saída — agregada e defuzzificada.
    Consequent,
}

/// Variável linguística: nome, universo e termos.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FuzzyVariable {
    pub name: String,
    pub role: VariableRole,
    pub universe: Universe,
    /// Termo → função de pertinência. Nomes são únicos por construção.
    #[serde(default)]
    pub terms: BTreeMap<String, MembershipFunction>,
    /// Método de defuzzificação (relevante apenas para consequentes).
    #[serde(default)]
    pub defuzzify: DefuzzMethod,
}

impl FuzzyVariable {
    /// Cria uma variável antecedente sem termos.
    pub fn antecedent(name: impl Into<String>, universe: Universe) -> Self {
        Self::with_role(name, VariableRole::Antecedent, universe)
    }

    /// Cria uma variável consequente sem termos, defuzzificada pelo centroide.
    pub fn consequent(name: impl Into<String>, universe: Universe) -> Self {
        Self::with_role(name, VariableRole::Consequent, universe)
    }

    fn with_role(name: impl Into<String>, role: VariableRole, universe: Universe) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: BTreeMap::new(),
            defuzzify: DefuzzMethod::default(),
        }
    }

    /// Troca o método de defuzzificação (builder).
    pub fn with_defuzzify(mut self, method: DefuzzMethod) -> Self {
        self.defuzzify = method;
        self
    }

    /// Adiciona um termo linguístico.
    ///
    /// # Erros
    ///
    /// `InvalidParameters` se o termo já existir ou se a forma for inválida.
    pub fn add_term(
        &mut self,
        term: impl Into<String>,
        mf: MembershipFunction,
    ) -> Result<&mut Self, FuzzyError> {
        let term = term.into();
        mf.validate()?;
        if self.terms.contains_key(&term) {
            return Err(FuzzyError::invalid(format!(
                "termo '{}' duplicado na variável '{}'",
                term, self.name
            )));
        }
        self.terms.insert(term, mf);
        Ok(self)
    }

    pub fn term(&self, term: &str) -> Option<&MembershipFunction> {
        self.terms.get(term)
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Fuzzifica um valor crisp: grau de pertinência de `x` em cada termo.
    ///
    /// O valor **não** é limitado aos bounds do universo — as funções de
    /// pertinência são avaliadas diretamente. O universo só limita a grade
    /// usada na agregação e defuzzificação.
    pub fn fuzzify(&self, x: f64) -> BTreeMap<String, f64> {
        self.terms
            .iter()
            .map(|(name, mf)| (name.clone(), mf.evaluate(x)))
            .collect()
    }

    /// Valida universo e termos (formas desserializadas não passam por `add_term`).
    pub fn validate(&self) -> Result<(), FuzzyError> {
        if self.name.trim().is_empty() {
            return Err(FuzzyError::invalid("variável sem nome"));
        }
        if self.terms.is_empty() {
            return Err(FuzzyError::invalid(format!(
                "variável '{}' não tem termos",
                self.name
            )));
        }
        for (term, mf) in &self.terms {
            mf.validate().map_err(|e| {
                FuzzyError::invalid(format!("{}['{}']: {}", self.name, term, e))
            })?;
        }
        Ok(())
    }
}
