use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::grammar::{Grammar, Production};
use crate::turtle::TurtleConfig;

// Grammar plus turtle settings for one kind of plant
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Preset {
    pub grammar: Grammar,
    pub turtle: TurtleConfig,
}

// Bracket and turn symbols that rewrite to themselves
fn with_identity_rules(mut grammar: Grammar, symbols: &str) -> Grammar {
    for symbol in symbols.chars() {
        grammar = grammar.with_rule(symbol, Production::fixed(symbol.to_string()));
    }
    grammar
}

impl Preset {
    pub fn new(grammar: Grammar, turtle: TurtleConfig) -> Self {
        Self { grammar, turtle }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grammar.validate()?;
        self.turtle.validate()
    }

    pub fn savanna() -> Self {
        let grammar = Grammar::new("X", 10)
            .with_rule(
                'X',
                Production::weighted([(1.0, "F+[[X]-X]-F[-FX]+X"), (1.0, "F[-X][X]+F[+FX]-X")]),
            )
            .with_rule('F', Production::fixed("FF"));
        Self::new(
            with_identity_rules(grammar, "+-[]"),
            TurtleConfig::fixed(25.0, 0.1),
        )
    }

    pub fn dummy() -> Self {
        let grammar = Grammar::new("X", 5)
            .with_rule('X', Production::fixed("F[+X]FX"))
            .with_rule('F', Production::fixed("FF"));
        Self::new(grammar, TurtleConfig::fixed(12.0, 5.0))
    }

    pub fn shrub() -> Self {
        let grammar = Grammar::new("F", 5).with_rule('F', Production::fixed("FF+[+F-F-F]-[-F+F+F]"));
        Self::new(grammar, TurtleConfig::fixed(22.5, 0.75))
    }

    pub fn windytree() -> Self {
        let grammar = Grammar::new("X", 5)
            .with_rule('X', Production::fixed("FFF+[+X-X-X]-[-X+X+X]F"))
            .with_rule('F', Production::fixed("FF"));
        Self::new(grammar, TurtleConfig::fixed(22.5, 1.0))
    }

    pub fn tree() -> Self {
        let grammar = Grammar::new("X", 8)
            .with_rule(
                'X',
                Production::weighted([
                    (0.25, "F[+XX][-XX][FX]X"),
                    (0.25, "F[-XX][FX]X"),
                    (0.25, "F[*XX][FX]X"),
                    (0.25, "F[^XX][*XX][FX]X"),
                    (0.25, "F[/XX][\\XX][FX]X"),
                    (0.25, "F[\\XX][FX]X"),
                ]),
            )
            .with_rule('F', Production::fixed("FF"));
        let turtle = TurtleConfig {
            angle: Some(45.0),
            min_angle: 15.0,
            max_angle: 50.0,
            distance: 0.1,
        };
        Self::new(with_identity_rules(grammar, "+-[]*^\\/"), turtle)
    }

    pub fn snowflake() -> Self {
        let grammar = Grammar::new("X", 12)
            .with_rule('X', Production::weighted([(1.0, "[-FX][+FX]FX")]))
            .with_rule('F', Production::fixed("FF"));
        Self::new(grammar, TurtleConfig::fixed(45.0, 0.01))
    }
}

// Named presets, looked up case-insensitively
#[derive(Debug, Clone, Default)]
pub struct PresetRegistry {
    presets: BTreeMap<String, Preset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert("savanna", Preset::savanna());
        registry.insert("dummy", Preset::dummy());
        registry.insert("shrub", Preset::shrub());
        registry.insert("windytree", Preset::windytree());
        registry.insert("tree", Preset::tree());
        registry.insert("snowflake", Preset::snowflake());
        registry
    }

    // Top-level tables are preset names:
    //
    //   [fern.grammar]
    //   axiom = "X"
    //   iterations = 4
    //   [fern.grammar.rules]
    //   X = "F[+X]F[-X]+X"
    //   [fern.turtle]
    //   angle = 20.0
    //   distance = 1.0
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let table: BTreeMap<String, Preset> = toml::from_str(src)?;
        let mut registry = Self::new();
        for (name, preset) in table {
            preset.validate()?;
            registry.insert(&name, preset);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, name: &str, preset: Preset) -> Option<Preset> {
        self.presets.insert(name.to_lowercase(), preset)
    }

    // Entries in `other` replace same-named ones
    pub fn extend(&mut self, other: PresetRegistry) {
        self.presets.extend(other.presets);
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(&name.to_lowercase())
    }

    pub fn require(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_all_presets() {
        let registry = PresetRegistry::builtin();
        assert_eq!(registry.len(), 6);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["dummy", "savanna", "shrub", "snowflake", "tree", "windytree"]
        );
    }

    #[test]
    fn lookup_ignores_case() {
        let registry = PresetRegistry::builtin();
        assert!(registry.get("tree").is_some());
        assert!(registry.get("Tree").is_some());
        assert!(registry.get("SHRUB").is_some());
        assert!(registry.get("cactus").is_none());
        assert_eq!(
            registry.require("cactus").unwrap_err(),
            ConfigError::UnknownPreset("cactus".into())
        );
    }

    #[test]
    fn builtin_presets_are_valid() {
        let registry = PresetRegistry::builtin();
        for name in registry.names() {
            let preset = registry.get(name).unwrap();
            assert!(preset.validate().is_ok(), "{} is invalid", name);
        }
    }

    #[test]
    fn preset_characteristics() {
        let tree = Preset::tree();
        assert_eq!(tree.grammar.iterations(), 8);
        assert_eq!(tree.turtle.angle, Some(45.0));
        assert_eq!((tree.turtle.min_angle, tree.turtle.max_angle), (15.0, 50.0));
        assert_eq!(tree.grammar.rule('\\'), Some(&Production::fixed("\\")));
        match tree.grammar.rule('X') {
            Some(Production::Weighted(alternatives)) => {
                assert_eq!(alternatives.len(), 6);
                assert_eq!(alternatives[2].value, "F[*XX][FX]X");
                assert!(alternatives.iter().all(|a| a.weight == 0.25));
            }
            other => panic!("unexpected tree rule {:?}", other),
        }

        let shrub = Preset::shrub();
        assert_eq!(shrub.grammar.axiom(), "F");
        assert_eq!(shrub.turtle.distance, 0.75);
    }

    #[test]
    fn parses_custom_presets() {
        let src = r#"
            [Fern.grammar]
            axiom = "X"
            iterations = 3
            [Fern.grammar.rules]
            X = "F[+X]F[-X]+X"
            F = "FF"
            [Fern.turtle]
            angle = 20.0
            distance = 1.0

            [bush.grammar]
            axiom = "F"
            iterations = 2
            [bush.grammar.rules]
            F = [{ weight = 2.0, value = "F[+F]F" }, { weight = 1.0, value = "F[-F]F" }]
            [bush.turtle]
            min_angle = 10.0
            max_angle = 30.0
            distance = 0.5
        "#;
        let registry = PresetRegistry::from_toml_str(src).unwrap();
        assert_eq!(registry.len(), 2);
        let fern = registry.get("fern").unwrap();
        assert_eq!(fern.grammar.iterations(), 3);
        let bush = registry.get("bush").unwrap();
        assert_eq!(bush.turtle.angle, None);
    }

    #[test]
    fn custom_presets_are_validated() {
        let src = r#"
            [broken.grammar]
            axiom = "F"
            [broken.turtle]
            angle = 20.0
            distance = -1.0
        "#;
        assert_eq!(
            PresetRegistry::from_toml_str(src).unwrap_err(),
            ConfigError::InvalidDistance(-1.0)
        );
    }

    #[test]
    fn extend_overrides_builtin() {
        let mut registry = PresetRegistry::builtin();
        let mut custom = PresetRegistry::new();
        custom.insert("TREE", Preset::dummy());
        registry.extend(custom);
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.get("tree"), Some(&Preset::dummy()));
    }
}
