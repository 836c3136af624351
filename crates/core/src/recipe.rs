//! The recipe as handed over by the recipe service. Read-only here.
//!
//! Deserialization is lenient about the shapes different clients send:
//! ingredients may embed a populated `ingredient` reference instead of a flat
//! name, quantities may be strings, and multi-line text may be an array.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "title")]
    pub name: String,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(deserialize_with = "text_block")]
    pub steps: String,
    #[serde(deserialize_with = "text_block")]
    pub plating_guide: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(deserialize_with = "names")]
    pub allergens: Vec<String>,
    #[serde(deserialize_with = "names")]
    pub service_types: Vec<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = steps.into();
        self
    }

    pub fn with_plating_guide(mut self, guide: impl Into<String>) -> Self {
        self.plating_guide = guide.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Steps as individual lines. Blank lines between steps are kept as
    /// paragraph breaks; leading and trailing blank lines are not.
    pub fn step_lines(&self) -> impl Iterator<Item = &str> {
        text_lines(&self.steps)
    }

    pub fn plating_lines(&self) -> impl Iterator<Item = &str> {
        text_lines(&self.plating_guide)
    }
}

fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|line| line.is_empty()).count();
    lines.into_iter().skip(leading)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    pub measure: String,
}

impl RecipeIngredient {
    pub fn new(quantity: f64, measure: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            measure: measure.into(),
        }
    }

    /// `"<quantity> <measure> <name>"`, skipping empty parts.
    pub fn line(&self) -> String {
        let quantity = self.quantity.map(format_quantity);
        [quantity.as_deref(), Some(self.measure.trim()), Some(self.name.trim())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Integral quantities print without decimals, others with at most two.
pub fn format_quantity(quantity: f64) -> String {
    if !quantity.is_finite() {
        return String::new();
    }
    if quantity.fract() == 0.0 {
        return format!("{:.0}", quantity);
    }
    let formatted = format!("{:.2}", quantity);
    formatted.trim_end_matches('0').trim_end_matches('.').to_string()
}

impl<'de> Deserialize<'de> for RecipeIngredient {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct IngredientRef {
            #[serde(default)]
            name: String,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Quantity {
            Number(f64),
            Text(String),
        }

        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            name: Option<String>,
            #[serde(default)]
            ingredient: Option<IngredientRef>,
            #[serde(default, alias = "amount")]
            quantity: Option<Quantity>,
            #[serde(default, alias = "unit")]
            measure: Option<String>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .or(raw.ingredient.map(|i| i.name))
            .unwrap_or_default();
        let quantity = match raw.quantity {
            Some(Quantity::Number(n)) => Some(n),
            Some(Quantity::Text(s)) => s.trim().parse().ok(),
            None => None,
        };
        Ok(Self {
            name,
            quantity,
            measure: raw.measure.unwrap_or_default(),
        })
    }
}

/// Accepts a string, an array of lines, or null.
fn text_block<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Block {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match Option::<Block>::deserialize(deserializer)? {
        Some(Block::Text(text)) => text,
        Some(Block::Lines(lines)) => lines.join("\n"),
        None => String::new(),
    })
}

/// Accepts strings or `{ "name": ... }` objects, or null.
fn names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Name {
        Plain(String),
        Named { name: String },
    }

    let names = Option::<Vec<Name>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(names
        .into_iter()
        .map(|n| match n {
            Name::Plain(s) | Name::Named { name: s } => s,
        })
        .filter(|s| !s.trim().is_empty())
        .collect())
}
