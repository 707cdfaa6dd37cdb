use std::collections::{BTreeMap, HashMap};

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore, SeedableRng};
use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

// What a symbol rewrites to on each iteration
// In TOML either `F = "FF"` or `X = [{ weight = 1.0, value = "F[X]" }, ...]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Production {
    Fixed(String),
    Weighted(Vec<Alternative>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Alternative {
    pub weight: f64,
    pub value: String,
}

impl Production {
    pub fn fixed(value: impl Into<String>) -> Self {
        Production::Fixed(value.into())
    }

    // Build a weighted rule from (weight, replacement) pairs
    pub fn weighted<S: Into<String>>(alternatives: impl IntoIterator<Item = (f64, S)>) -> Self {
        Production::Weighted(
            alternatives
                .into_iter()
                .map(|(weight, value)| Alternative {
                    weight,
                    value: value.into(),
                })
                .collect(),
        )
    }
}

// Raw shape of a grammar table before the rule keys are checked
#[derive(Debug, Deserialize)]
struct GrammarDef {
    axiom: String,
    #[serde(default)]
    rules: BTreeMap<String, Production>,
    #[serde(default)]
    iterations: u32,
    #[serde(default)]
    max_symbols: Option<usize>,
}

// Axiom plus per-symbol production rules, expanded a fixed number of times
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "GrammarDef")]
pub struct Grammar {
    axiom: String,
    rules: BTreeMap<char, Production>,
    iterations: u32,
    max_symbols: Option<usize>,
}

impl TryFrom<GrammarDef> for Grammar {
    type Error = ConfigError;

    fn try_from(def: GrammarDef) -> Result<Self, Self::Error> {
        let mut rules = BTreeMap::new();
        for (key, production) in def.rules {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => {
                    rules.insert(symbol, production);
                }
                _ => return Err(ConfigError::InvalidRuleKey(key)),
            }
        }
        let grammar = Grammar {
            axiom: def.axiom,
            rules,
            iterations: def.iterations,
            max_symbols: def.max_symbols,
        };
        grammar.validate()?;
        Ok(grammar)
    }
}

// Rule table resolved once per expansion so weighted rules keep their
// cumulative-weight sampler across every occurrence
enum CompiledRule<'a> {
    Fixed(&'a str),
    Weighted {
        sampler: WeightedIndex<f64>,
        values: Vec<&'a str>,
    },
}

impl Grammar {
    pub fn new(axiom: impl Into<String>, iterations: u32) -> Self {
        Self {
            axiom: axiom.into(),
            rules: BTreeMap::new(),
            iterations,
            max_symbols: None,
        }
    }

    pub fn with_rule(mut self, symbol: char, production: Production) -> Self {
        self.rules.insert(symbol, production);
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    // Abort expansion once an iteration produces more than `limit` symbols
    pub fn with_symbol_limit(mut self, limit: usize) -> Self {
        self.max_symbols = Some(limit);
        self
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn rule(&self, symbol: char) -> Option<&Production> {
        self.rules.get(&symbol)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compile().map(|_| ())
    }

    fn compile(&self) -> Result<HashMap<char, CompiledRule<'_>>, ConfigError> {
        if self.axiom.is_empty() {
            return Err(ConfigError::EmptyAxiom);
        }

        let mut table = HashMap::with_capacity(self.rules.len());
        for (&symbol, production) in &self.rules {
            let compiled = match production {
                Production::Fixed(value) => CompiledRule::Fixed(value.as_str()),
                Production::Weighted(alternatives) => {
                    if alternatives.is_empty() {
                        return Err(ConfigError::EmptyAlternatives(symbol));
                    }
                    // WeightedIndex accepts +inf and then panics on sampling
                    if let Some(bad) = alternatives.iter().find(|a| !a.weight.is_finite()) {
                        return Err(ConfigError::InvalidWeights {
                            symbol,
                            reason: format!("weight {} is not finite", bad.weight),
                        });
                    }
                    let sampler = WeightedIndex::new(alternatives.iter().map(|a| a.weight))
                        .map_err(|e| ConfigError::InvalidWeights {
                            symbol,
                            reason: e.to_string(),
                        })?;
                    CompiledRule::Weighted {
                        sampler,
                        values: alternatives.iter().map(|a| a.value.as_str()).collect(),
                    }
                }
            };
            table.insert(symbol, compiled);
        }
        Ok(table)
    }

    // Rewrite the axiom `iterations` times
    // Weighted rules draw one alternative per occurrence from `rng`
    pub fn expand<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, ConfigError> {
        let table = self.compile()?;
        let mut current = self.axiom.clone();

        let limit = self.max_symbols.unwrap_or(usize::MAX);

        for iteration in 0..self.iterations {
            let mut next = String::with_capacity(current.len() * 2);
            let mut count = 0usize;
            for symbol in current.chars() {
                let added = match table.get(&symbol) {
                    Some(CompiledRule::Fixed(replacement)) => {
                        next.push_str(replacement);
                        replacement.chars().count()
                    }
                    Some(CompiledRule::Weighted { sampler, values }) => {
                        let value = values[sampler.sample(rng)];
                        next.push_str(value);
                        value.chars().count()
                    }
                    None => {
                        next.push(symbol);
                        1
                    }
                };
                count += added;
                if count > limit {
                    return Err(ConfigError::SymbolLimit { limit, iteration });
                }
            }

            debug!(iteration, symbols = next.len(), "grammar iteration");
            current = next;
        }

        Ok(current)
    }

    // `Some(seed)` gives a reproducible expansion, `None` draws from the thread RNG
    pub fn expand_seeded(&self, seed: Option<u64>) -> Result<String, ConfigError> {
        let mut rng: Box<dyn RngCore> = match seed {
            Some(s) => Box::new(rand::rngs::StdRng::seed_from_u64(s)),
            None => Box::new(rand::thread_rng()),
        };
        self.expand(&mut rng)
    }
}
