use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};

use crate::foundation::error::{OverlayError, OverlayResult};

/// How a filter's constructor takes its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgStyle {
    /// Positional arguments, in control-field order.
    Args,
    /// A single options object.
    Options,
    /// No arguments.
    #[default]
    None,
}

/// Arguments handed to a [`FilterFactory`](crate::effects::FilterFactory).
#[derive(Debug, Clone, PartialEq)]
pub enum FilterArgs {
    /// Positional values; a control missing from the options is `null`.
    Positional(Vec<JsonValue>),
    /// Merged options object.
    Options(Map<String, JsonValue>),
    /// No-argument construction.
    None,
}

/// Declared shape of a constructible filter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterDescriptor {
    /// Constructor argument style.
    pub arg_style: ArgStyle,
    /// Default option values, overlaid by the overlay's `filterOptions`.
    #[serde(alias = "defaultValues")]
    pub defaults: Map<String, JsonValue>,
    /// Control field names, in positional-argument order.
    #[serde(deserialize_with = "de_controls")]
    pub controls: Vec<String>,
}

impl FilterDescriptor {
    /// Descriptor with the given style and defaults, and no controls.
    pub fn new(arg_style: ArgStyle, defaults: JsonValue) -> Self {
        Self {
            arg_style,
            defaults: match defaults {
                JsonValue::Object(m) => m,
                _ => Map::new(),
            },
            controls: Vec::new(),
        }
    }

    /// Set the positional control order.
    pub fn with_controls<I, S>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controls = controls.into_iter().map(Into::into).collect();
        self
    }

    /// `options` merged over the declared defaults (top-level keys replace).
    pub fn merged_options(&self, options: &Map<String, JsonValue>) -> Map<String, JsonValue> {
        let mut out = self.defaults.clone();
        for (k, v) in options {
            out.insert(k.clone(), v.clone());
        }
        out
    }

    /// Build constructor arguments from already merged options.
    pub fn build_args(&self, options: &Map<String, JsonValue>) -> FilterArgs {
        match self.arg_style {
            ArgStyle::Args => FilterArgs::Positional(
                self.controls
                    .iter()
                    .map(|c| options.get(c).cloned().unwrap_or(JsonValue::Null))
                    .collect(),
            ),
            ArgStyle::Options => FilterArgs::Options(options.clone()),
            ArgStyle::None => FilterArgs::None,
        }
    }
}

/// Control fields are either bare names or `{ "name": ... }` objects.
fn de_controls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Name(String),
        Obj { name: String },
    }

    let raw = Vec::<Repr>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|r| match r {
            Repr::Name(n) | Repr::Obj { name: n } => n,
        })
        .collect())
}

/// Filter identifier to descriptor lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterRegistry {
    descriptors: BTreeMap<String, FilterDescriptor>,
}

impl FilterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the stock filters.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        reg.register(
            "OutlineOverlayFilter",
            FilterDescriptor::new(
                ArgStyle::Options,
                json!({
                    "outlineColor": [0.0, 0.0, 0.0, 1.0],
                    "trueThickness": 1.0,
                    "animate": false,
                }),
            ),
        );
        reg.register(
            "BlurFilter",
            FilterDescriptor::new(ArgStyle::Args, json!({ "strength": 8.0, "quality": 4.0 }))
                .with_controls(["strength", "quality"]),
        );
        reg.register(
            "AlphaFilter",
            FilterDescriptor::new(ArgStyle::Args, json!({ "alpha": 1.0 })).with_controls(["alpha"]),
        );
        reg.register(
            "NoiseFilter",
            FilterDescriptor::new(ArgStyle::Args, json!({ "noise": 0.5, "seed": 4.0 }))
                .with_controls(["noise", "seed"]),
        );
        reg.register(
            "GlowFilter",
            FilterDescriptor::new(
                ArgStyle::Options,
                json!({
                    "distance": 10.0,
                    "outerStrength": 4.0,
                    "innerStrength": 0.0,
                    "color": 0xffffff,
                    "quality": 0.1,
                    "knockout": false,
                }),
            ),
        );
        reg.register("ColorMatrixFilter", FilterDescriptor::default());
        reg
    }

    /// Parse a registry from a JSON object of `{ id: descriptor }`.
    pub fn from_json_str(s: &str) -> OverlayResult<Self> {
        serde_json::from_str(s).map_err(|e| OverlayError::serde(format!("parse filter registry JSON: {e}")))
    }

    /// Add or replace a descriptor.
    pub fn register(&mut self, id: impl Into<String>, descriptor: FilterDescriptor) {
        self.descriptors.insert(id.into(), descriptor);
    }

    /// Descriptor for `id`.
    pub fn get(&self, id: &str) -> Option<&FilterDescriptor> {
        self.descriptors.get(id)
    }

    /// Registered identifiers in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/registry.rs"]
mod tests;
