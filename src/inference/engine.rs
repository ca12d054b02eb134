//! # Motor de Inferência Mamdani
//!
//! O [`Engine`] orquestra o ciclo completo de inferência fuzzy para um
//! conjunto de entradas crisp:
//!
//! ```text
//! entradas crisp {stock: 80, umbral: 20}
//!   │
//!   ├── 1. FUZZIFICAR  → stock{bajo:0, medio:0, alto:1}, umbral{bajo:0.5, …}
//!   ├── 2. DISPARAR    → força de cada regra (min/max/complemento)
//!   ├── 3. AGREGAR     → riesgo(x) = max_regras min(força, termo(x))
//!   └── 4. DEFUZZIFICAR → centroide do conjunto agregado → 0.2
//! ```
//!
//! ## Construção
//!
//! [`Engine::build`] valida tudo de uma vez: formas das funções de
//! pertinência, nomes únicos de variáveis e toda referência das regras
//! a variáveis/termos. Qualquer falha é `InvalidParameters` e o motor não
//! é construído. As curvas dos termos consequentes são pré-amostradas
//! sobre o universo, já que não mudam entre chamadas.
//!
//! ## Concorrência
//!
//! Depois de construído o motor é imutável. [`Engine::evaluate`] usa apenas
//! buffers locais da chamada, então `&Engine` pode ser compartilhado entre
//! threads (ex: via `Arc<Engine>` no estado do axum) sem nenhum lock.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::core::{FuzzyError, FuzzyVariable, VariableRole};

use super::expr::Fuzzified;
use super::Rule;

/// Contribuição de uma regra em uma avaliação.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleActivation {
    /// Posição da regra na base de regras.
    pub index: usize,
    /// Força de disparo em `[0, 1]`.
    pub strength: f64,
    /// A regra em forma legível (ex: `SE (stock[bajo] AND …) ENTÃO riesgo[alto]`).
    pub rule: String,
}

/// Resultado de [`Engine::evaluate_traced`]: saídas + rastro das regras.
#[derive(Clone, Debug)]
pub struct Evaluation {
    pub outputs: BTreeMap<String, f64>,
    pub activations: Vec<RuleActivation>,
}

/// Motor de inferência fuzzy imutável.
#[derive(Debug)]
pub struct Engine {
    antecedents: BTreeMap<String, FuzzyVariable>,
    consequents: BTreeMap<String, FuzzyVariable>,
    rules: Vec<Rule>,
    /// Antecedentes referenciados por pelo menos uma regra.
    required: BTreeSet<String>,
    /// variável consequente → termo → grau em cada amostra do universo.
    sampled_terms: HashMap<String, HashMap<String, Vec<f64>>>,
}

impl Engine {
    /// Constrói e valida o motor.
    ///
    /// # Erros
    ///
    /// `InvalidParameters` quando:
    /// - uma variável tem universo/termos inválidos ou nome repetido
    /// - uma regra não tem consequentes
    /// - uma regra referencia variável ou termo inexistente, ou usa uma
    ///   variável no papel errado (consequente no antecedente e vice-versa)
    pub fn build(variables: Vec<FuzzyVariable>, rules: Vec<Rule>) -> Result<Self, FuzzyError> {
        let mut antecedents = BTreeMap::new();
        let mut consequents = BTreeMap::new();

        for var in variables {
            var.validate()?;
            if antecedents.contains_key(&var.name) || consequents.contains_key(&var.name) {
                return Err(FuzzyError::invalid(format!(
                    "variável '{}' declarada mais de uma vez",
                    var.name
                )));
            }
            match var.role {
                VariableRole::Antecedent => antecedents.insert(var.name.clone(), var),
                VariableRole::Consequent => consequents.insert(var.name.clone(), var),
            };
        }

        let mut required = BTreeSet::new();
        for (index, rule) in rules.iter().enumerate() {
            for (variable, term) in rule.antecedent.references() {
                let var = antecedents.get(variable).ok_or_else(|| {
                    FuzzyError::invalid(format!(
                        "regra {}: '{}' não é uma variável antecedente",
                        index, variable
                    ))
                })?;
                if !var.has_term(term) {
                    return Err(FuzzyError::invalid(format!(
                        "regra {}: termo '{}' não existe em '{}'",
                        index, term, variable
                    )));
                }
                required.insert(variable.to_string());
            }

            if rule.consequents.is_empty() {
                return Err(FuzzyError::invalid(format!("regra {} sem consequentes", index)));
            }
            for target in &rule.consequents {
                let var = consequents.get(&target.variable).ok_or_else(|| {
                    FuzzyError::invalid(format!(
                        "regra {}: '{}' não é uma variável consequente",
                        index, target.variable
                    ))
                })?;
                if !var.has_term(&target.term) {
                    return Err(FuzzyError::invalid(format!(
                        "regra {}: termo '{}' não existe em '{}'",
                        index, target.term, target.variable
                    )));
                }
            }
        }

        let sampled_terms = consequents
            .values()
            .map(|var| {
                let curves: HashMap<String, Vec<f64>> = var
                    .terms
                    .iter()
                    .map(|(term, mf)| {
                        let curve: Vec<f64> =
                            var.universe.samples().iter().map(|x| mf.evaluate(*x)).collect();
                        (term.clone(), curve)
                    })
                    .collect();
                (var.name.clone(), curves)
            })
            .collect();

        if rules.is_empty() {
            tracing::warn!("Motor construído sem regras; toda avaliação será degenerada");
        }
        tracing::info!(
            antecedents = antecedents.len(),
            consequents = consequents.len(),
            rules = rules.len(),
            "Motor fuzzy construído"
        );

        Ok(Self {
            antecedents,
            consequents,
            rules,
            required,
            sampled_terms,
        })
    }

    /// Avalia as entradas crisp e retorna uma saída crisp por variável consequente.
    ///
    /// Função pura: mesmas entradas, mesma saída, bit a bit.
    ///
    /// # Erros
    ///
    /// - `MissingInput` se um antecedente usado pelas regras não tem valor
    /// - `DegenerateOutput` se nenhuma regra disparou para alguma consequente
    pub fn evaluate(&self, inputs: &HashMap<String, f64>) -> Result<BTreeMap<String, f64>, FuzzyError> {
        let strengths = self.fire(inputs)?;
        self.aggregate_and_defuzzify(&strengths)
    }

    /// Avalia as entradas e defuzzifica apenas a consequente `variable`.
    ///
    /// As demais consequentes não são agregadas, então uma saída degenerada
    /// em outra variável não afeta o resultado.
    ///
    /// # Erros
    ///
    /// - `InvalidParameters` se `variable` não é uma consequente do motor
    /// - `MissingInput` como em [`evaluate`](Engine::evaluate)
    /// - `DegenerateOutput` se nenhuma regra disparou para `variable`
    pub fn evaluate_variable(&self, inputs: &HashMap<String, f64>, variable: &str) -> Result<f64, FuzzyError> {
        let var = self.consequents.get(variable).ok_or_else(|| {
            FuzzyError::invalid(format!("'{}' não é uma variável consequente", variable))
        })?;
        let strengths = self.fire(inputs)?;
        self.log_activations(&strengths);
        let membership = self.aggregate(var, &strengths);
        var.defuzzify.defuzzify(&var.universe, &membership, &var.name)
    }

    /// Como [`evaluate`](Engine::evaluate), mas também devolve a força de cada regra.
    pub fn evaluate_traced(&self, inputs: &HashMap<String, f64>) -> Result<Evaluation, FuzzyError> {
        let strengths = self.fire(inputs)?;
        self.log_activations(&strengths);
        let activations: Vec<RuleActivation> = strengths
            .iter()
            .enumerate()
            .map(|(index, strength)| RuleActivation {
                index,
                strength: *strength,
                rule: self.rules[index].to_string(),
            })
            .collect();

        let outputs = self.aggregate_and_defuzzify(&strengths)?;
        Ok(Evaluation {
            outputs,
            activations,
        })
    }

    fn log_activations(&self, strengths: &[f64]) {
        if !tracing::enabled!(tracing::Level::DEBUG) {
            return;
        }
        for (index, (rule, strength)) in self.rules.iter().zip(strengths).enumerate() {
            if *strength > 0.0 {
                tracing::debug!(rule = index, strength = *strength, "{}", rule);
            }
        }
    }

    /// Passos 1 e 2: fuzzificação e força de disparo de cada regra.
    fn fire(&self, inputs: &HashMap<String, f64>) -> Result<Vec<f64>, FuzzyError> {
        if let Some(missing) = self.required.iter().find(|name| !inputs.contains_key(*name)) {
            return Err(FuzzyError::MissingInput {
                variable: missing.clone(),
            });
        }

        let snapshot: Fuzzified = self
            .antecedents
            .iter()
            .filter_map(|(name, var)| inputs.get(name).map(|x| (name.clone(), var.fuzzify(*x))))
            .collect();

        self.rules
            .iter()
            .map(|rule| rule.antecedent.evaluate(&snapshot))
            .collect()
    }

    /// Passo 3: `max` sobre as regras de `min(força, termo(x))` para uma consequente.
    fn aggregate(&self, var: &FuzzyVariable, strengths: &[f64]) -> Vec<f64> {
        let mut membership = vec![0.0; var.universe.len()];
        let Some(curves) = self.sampled_terms.get(&var.name) else {
            return membership;
        };

        for (rule, strength) in self.rules.iter().zip(strengths) {
            if *strength <= 0.0 {
                continue;
            }
            // referências validadas em build()
            let targets = rule.consequents.iter().filter(|t| t.variable == var.name);
            for curve in targets.filter_map(|t| curves.get(&t.term)) {
                for (slot, degree) in membership.iter_mut().zip(curve) {
                    *slot = slot.max(strength.min(*degree));
                }
            }
        }
        membership
    }

    /// Passos 3 e 4 para todas as consequentes, em ordem de nome.
    fn aggregate_and_defuzzify(&self, strengths: &[f64]) -> Result<BTreeMap<String, f64>, FuzzyError> {
        let mut outputs = BTreeMap::new();
        for (name, var) in &self.consequents {
            let membership = self.aggregate(var, strengths);
            let value = var.defuzzify.defuzzify(&var.universe, &membership, name)?;
            outputs.insert(name.clone(), value);
        }
        Ok(outputs)
    }

    pub fn antecedents(&self) -> impl Iterator<Item = &FuzzyVariable> {
        self.antecedents.values()
    }

    pub fn consequents(&self) -> impl Iterator<Item = &FuzzyVariable> {
        self.consequents.values()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MembershipFunction, Universe};
    use crate::inference::{DefuzzMethod, RuleExpr};

    fn three_terms(var: &mut FuzzyVariable) {
        var.add_term("bajo", MembershipFunction::trapezoidal(0.0, 0.0, 10.0, 30.0).unwrap())
            .unwrap()
            .add_term("medio", MembershipFunction::triangular(20.0, 50.0, 80.0).unwrap())
            .unwrap()
            .add_term("alto", MembershipFunction::trapezoidal(60.0, 80.0, 100.0, 100.0).unwrap())
            .unwrap();
    }

    fn variables() -> Vec<FuzzyVariable> {
        let mut stock = FuzzyVariable::antecedent("stock", Universe::new(0.0, 100.0, 1.0).unwrap());
        three_terms(&mut stock);
        let mut umbral = FuzzyVariable::antecedent("umbral", Universe::new(0.0, 100.0, 1.0).unwrap());
        three_terms(&mut umbral);
        let mut riesgo = FuzzyVariable::consequent("riesgo", Universe::new(0.0, 1.0, 0.01).unwrap());
        riesgo
            .add_term("bajo", MembershipFunction::triangular(0.0, 0.2, 0.4).unwrap())
            .unwrap()
            .add_term("medio", MembershipFunction::triangular(0.3, 0.5, 0.7).unwrap())
            .unwrap()
            .add_term("alto", MembershipFunction::triangular(0.6, 0.8, 1.0).unwrap())
            .unwrap();
        vec![stock, umbral, riesgo]
    }

    fn when(stock: &str, umbral: &str, riesgo: &str) -> Rule {
        Rule::new(
            RuleExpr::and(RuleExpr::term("stock", stock), RuleExpr::term("umbral", umbral)),
            "riesgo",
            riesgo,
        )
    }

    fn rules() -> Vec<Rule> {
        vec![
            when("bajo", "alto", "alto"),
            when("medio", "medio", "medio"),
            when("alto", "bajo", "bajo"),
            when("medio", "alto", "alto"),
            when("bajo", "medio", "alto"),
        ]
    }

    fn inputs(stock: f64, umbral: f64) -> HashMap<String, f64> {
        HashMap::from([("stock".to_string(), stock), ("umbral".to_string(), umbral)])
    }

    #[test]
    fn single_rule_centroid() {
        let engine = Engine::build(variables(), rules()).unwrap();
        let out = engine.evaluate(&inputs(50.0, 50.0)).unwrap();
        assert!((out["riesgo"] - 0.5).abs() < 1e-9, "got {}", out["riesgo"]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let engine = Engine::build(variables(), rules()).unwrap();
        let first = engine.evaluate(&inputs(37.0, 64.0)).unwrap();
        for _ in 0..20 {
            let again = engine.evaluate(&inputs(37.0, 64.0)).unwrap();
            assert_eq!(first["riesgo"].to_bits(), again["riesgo"].to_bits());
        }
    }

    #[test]
    fn duplicate_rules_do_not_change_output() {
        let base = Engine::build(variables(), rules()).unwrap();
        let mut doubled_rules = rules();
        doubled_rules.push(when("medio", "alto", "alto"));
        doubled_rules.push(when("medio", "medio", "medio"));
        let doubled = Engine::build(variables(), doubled_rules).unwrap();

        for (s, u) in [(37.0, 64.0), (50.0, 50.0), (25.0, 75.0), (10.0, 90.0), (45.5, 33.3)] {
            let a = base.evaluate(&inputs(s, u)).unwrap();
            let b = doubled.evaluate(&inputs(s, u)).unwrap();
            assert_eq!(a["riesgo"].to_bits(), b["riesgo"].to_bits(), "stock={} umbral={}", s, u);
        }
    }

    #[test]
    fn empty_inputs_are_missing_input() {
        let engine = Engine::build(variables(), rules()).unwrap();
        let err = engine.evaluate(&HashMap::new()).unwrap_err();
        assert!(matches!(err, FuzzyError::MissingInput { .. }));

        let only_stock = HashMap::from([("stock".to_string(), 10.0)]);
        assert_eq!(
            engine.evaluate(&only_stock),
            Err(FuzzyError::MissingInput {
                variable: "umbral".into()
            })
        );
    }

    #[test]
    fn no_rule_fired_is_degenerate() {
        // stock medio + umbral bajo não tem regra nesta base
        let engine = Engine::build(variables(), rules()).unwrap();
        assert_eq!(
            engine.evaluate(&inputs(50.0, 5.0)),
            Err(FuzzyError::DegenerateOutput {
                variable: "riesgo".into()
            })
        );
    }

    #[test]
    fn input_outside_universe_is_still_fuzzified() {
        // -5 fica fora do suporte de todos os termos de stock
        let engine = Engine::build(variables(), rules()).unwrap();
        assert!(engine.evaluate(&inputs(-5.0, 90.0)).is_err());

        let mut vars = variables();
        vars[1]
            .add_term("extremo", MembershipFunction::sigmoid(100.0, 0.5).unwrap())
            .unwrap();
        let mut r = rules();
        r.push(when("bajo", "extremo", "alto"));
        let engine = Engine::build(vars, r).unwrap();
        let out = engine.evaluate(&inputs(5.0, 130.0)).unwrap();
        assert!((out["riesgo"] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn rejects_unknown_references() {
        let bad_term = vec![when("bajo", "altísimo", "alto")];
        assert!(matches!(
            Engine::build(variables(), bad_term),
            Err(FuzzyError::InvalidParameters(_))
        ));

        let bad_var = vec![Rule::new(RuleExpr::term("nivel", "bajo"), "riesgo", "alto")];
        assert!(Engine::build(variables(), bad_var).is_err());

        let bad_target = vec![Rule::new(RuleExpr::term("stock", "bajo"), "riesgo", "enorme")];
        assert!(Engine::build(variables(), bad_target).is_err());

        // consequente usado como antecedente
        let wrong_role = vec![Rule::new(RuleExpr::term("riesgo", "bajo"), "riesgo", "alto")];
        assert!(Engine::build(variables(), wrong_role).is_err());
    }

    #[test]
    fn rejects_duplicate_variable_names() {
        let mut vars = variables();
        vars.push(vars[0].clone());
        assert!(Engine::build(vars, rules()).is_err());
    }

    #[test]
    fn multiple_consequents_per_rule() {
        let mut vars = variables();
        let mut alerta = FuzzyVariable::consequent("alerta", Universe::new(0.0, 10.0, 0.5).unwrap())
            .with_defuzzify(DefuzzMethod::MeanOfMaximum);
        alerta
            .add_term("no", MembershipFunction::triangular(0.0, 0.0, 5.0).unwrap())
            .unwrap()
            .add_term("si", MembershipFunction::triangular(5.0, 10.0, 10.0).unwrap())
            .unwrap();
        vars.push(alerta);

        let mut r = rules();
        r[0] = when("bajo", "alto", "alto").also("alerta", "si");
        r.push(Rule::new(RuleExpr::not(RuleExpr::term("stock", "bajo")), "alerta", "no"));
        let engine = Engine::build(vars, r).unwrap();

        let out = engine.evaluate(&inputs(0.0, 100.0)).unwrap();
        assert!((out["riesgo"] - 0.8).abs() < 1e-6);
        assert_eq!(out["alerta"], 10.0);
    }

    #[test]
    fn single_variable_ignores_other_degenerate_consequents() {
        let mut vars = variables();
        let mut alerta = FuzzyVariable::consequent("alerta", Universe::new(0.0, 10.0, 0.5).unwrap());
        alerta
            .add_term("si", MembershipFunction::triangular(5.0, 10.0, 10.0).unwrap())
            .unwrap();
        vars.push(alerta);
        let mut r = rules();
        r[0] = when("bajo", "alto", "alto").also("alerta", "si");
        let engine = Engine::build(vars, r).unwrap();

        // stock alto + umbral bajo só dispara riesgo[bajo]
        assert_eq!(
            engine.evaluate(&inputs(80.0, 20.0)),
            Err(FuzzyError::DegenerateOutput {
                variable: "alerta".into()
            })
        );
        let riesgo = engine.evaluate_variable(&inputs(80.0, 20.0), "riesgo").unwrap();
        assert!((riesgo - 0.2).abs() < 1e-6, "got {}", riesgo);
        assert_eq!(
            engine.evaluate_variable(&inputs(80.0, 20.0), "alerta"),
            Err(FuzzyError::DegenerateOutput {
                variable: "alerta".into()
            })
        );
        assert!(matches!(
            engine.evaluate_variable(&inputs(80.0, 20.0), "stock"),
            Err(FuzzyError::InvalidParameters(_))
        ));
    }

    #[test]
    fn traced_evaluation_reports_every_rule() {
        let engine = Engine::build(variables(), rules()).unwrap();
        let eval = engine.evaluate_traced(&inputs(50.0, 50.0)).unwrap();
        assert_eq!(eval.activations.len(), 5);
        assert_eq!(eval.activations[1].strength, 1.0);
        assert!(eval.activations[1].rule.contains("stock[medio]"));
        assert_eq!(eval.outputs, engine.evaluate(&inputs(50.0, 50.0)).unwrap());
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        let engine = Engine::build(variables(), rules()).unwrap();
        let expected = engine.evaluate(&inputs(30.0, 70.0)).unwrap();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| engine.evaluate(&inputs(30.0, 70.0)).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
