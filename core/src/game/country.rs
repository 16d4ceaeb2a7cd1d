use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

const EMBEDDED_WORLD: &str = include_str!("../../../config/world.yaml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDefinition {
    pub name: String,
    pub gdp: f64,
    pub unemployment: f64,
    pub inflation: f64,
    /// Tariff this country levies on each of its partners at setup.
    #[serde(default)]
    pub tariff: Option<f64>,
}

impl CountryDefinition {
    pub fn new(name: impl Into<String>, gdp: f64, unemployment: f64, inflation: f64) -> Self {
        Self {
            name: name.into(),
            gdp,
            unemployment,
            inflation,
            tariff: None,
        }
    }

    pub fn with_tariff(mut self, tariff: f64) -> Self {
        self.tariff = Some(tariff);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "国名が空です");
        ensure!(
            self.gdp.is_finite() && self.gdp > 0.0,
            "{} の GDP は正の有限値で指定してください: {}",
            self.name,
            self.gdp
        );
        ensure!(
            self.unemployment.is_finite(),
            "{} の失業率が不正です",
            self.name
        );
        ensure!(
            self.inflation.is_finite(),
            "{} のインフレ率が不正です",
            self.name
        );
        if let Some(tariff) = self.tariff {
            ensure!(tariff.is_finite(), "{} の初期関税率が不正です", self.name);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldDefinition {
    pub player: CountryDefinition,
    pub partners: Vec<CountryDefinition>,
}

impl WorldDefinition {
    pub fn from_embedded() -> Result<Self> {
        Self::from_yaml_str(EMBEDDED_WORLD).context("組み込みの世界定義の解析に失敗しました")
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let definition: Self =
            serde_yaml::from_str(content).context("世界定義 YAML の解析に失敗しました")?;
        Ok(definition)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let definition: Self =
            serde_json::from_str(content).context("世界定義 JSON の解析に失敗しました")?;
        Ok(definition)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("世界定義ファイルを開けません: {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        parsed.with_context(|| format!("世界定義ファイルの読み込みに失敗しました: {}", path.display()))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            !self.partners.is_empty(),
            "貿易相手国が1つも定義されていません。最低1件の相手国を用意してください。"
        );
        self.player.validate()?;
        let mut seen = HashSet::new();
        seen.insert(self.player.name.as_str());
        for partner in &self.partners {
            partner.validate()?;
            ensure!(
                seen.insert(partner.name.as_str()),
                "国名が重複しています: {}",
                partner.name
            );
        }
        Ok(())
    }
}

impl Default for WorldDefinition {
    fn default() -> Self {
        Self {
            player: CountryDefinition::new("華夏共和国", 1000.0, 5.0, 2.0),
            partners: vec![
                CountryDefinition::new("西方連合", 1500.0, 4.5, 1.8),
                CountryDefinition::new("南方共同体", 800.0, 7.2, 3.5),
                CountryDefinition::new("北方連邦", 600.0, 5.8, 2.2),
                CountryDefinition::new("東方諸島", 400.0, 3.9, 1.5),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_world_matches_default() {
        let embedded = WorldDefinition::from_embedded().unwrap();
        assert_eq!(embedded, WorldDefinition::default());
        embedded.validate().unwrap();
    }

    #[test]
    fn json_definition_accepts_optional_tariff() {
        let definition = WorldDefinition::from_json_str(
            r#"{
                "player": { "name": "Asteria", "gdp": 900.0, "unemployment": 6.0, "inflation": 2.5, "tariff": 0.2 },
                "partners": [
                    { "name": "Borealis", "gdp": 700.0, "unemployment": 5.0, "inflation": 1.0 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(definition.player.tariff, Some(0.2));
        assert_eq!(definition.partners[0].tariff, None);
        definition.validate().unwrap();
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let definition = WorldDefinition {
            player: CountryDefinition::new("Asteria", 1000.0, 5.0, 2.0),
            partners: vec![CountryDefinition::new("Asteria", 500.0, 5.0, 2.0)],
        };
        assert!(definition.validate().is_err());
    }

    #[test]
    fn empty_partner_list_is_rejected() {
        let definition = WorldDefinition {
            player: CountryDefinition::new("Asteria", 1000.0, 5.0, 2.0),
            partners: Vec::new(),
        };
        assert!(definition.validate().is_err());
    }

    #[test]
    fn non_positive_gdp_is_rejected() {
        let definition = CountryDefinition::new("Asteria", 0.0, 5.0, 2.0);
        assert!(definition.validate().is_err());
        let definition = CountryDefinition::new("Asteria", f64::NAN, 5.0, 2.0);
        assert!(definition.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let error = WorldDefinition::load_from_path("/nonexistent/world.yaml").unwrap_err();
        assert!(format!("{error:#}").contains("/nonexistent/world.yaml"));
    }
}
