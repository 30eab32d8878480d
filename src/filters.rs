//! The filter registry: a read-only table of the booth's built-in filters,
//! loaded once and looked up by id.

use std::collections::BTreeMap;

use crate::{
    effect::{self, EffectOp},
    error::{BoothError, BoothResult},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TextureSpec {
    /// Asset-store path of the texture image.
    pub path: String,
    /// Blend opacity in [0,1].
    pub opacity: f32,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FilterDescriptor {
    pub id: String,
    pub name: String,
    /// CSS-filter style expression; empty means pass-through.
    pub effect: String,
    pub texture: Option<TextureSpec>,
}

impl FilterDescriptor {
    pub fn ops(&self) -> BoothResult<Vec<EffectOp>> {
        effect::parse_expression(&self.effect)
    }

    pub fn validate(&self) -> BoothResult<()> {
        if self.id.trim().is_empty() {
            return Err(BoothError::validation("filter id must be non-empty"));
        }
        self.ops()?;
        if let Some(tex) = &self.texture {
            if tex.path.trim().is_empty() {
                return Err(BoothError::validation(format!(
                    "filter '{}' has a texture with an empty path",
                    self.id
                )));
            }
            if !(0.0..=1.0).contains(&tex.opacity) {
                return Err(BoothError::validation(format!(
                    "filter '{}' texture opacity must be in [0,1]",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

pub struct FilterRegistry {
    by_id: BTreeMap<String, FilterDescriptor>,
    order: Vec<String>,
}

impl FilterRegistry {
    pub fn builtin() -> Self {
        Self::from_descriptors(builtin_filters()).expect("builtin filter table is valid")
    }

    pub fn from_descriptors(descriptors: Vec<FilterDescriptor>) -> BoothResult<Self> {
        let mut by_id = BTreeMap::new();
        let mut order = Vec::with_capacity(descriptors.len());
        for d in descriptors {
            d.validate()?;
            if by_id.contains_key(&d.id) {
                return Err(BoothError::validation(format!(
                    "duplicate filter id '{}'",
                    d.id
                )));
            }
            order.push(d.id.clone());
            by_id.insert(d.id.clone(), d);
        }
        Ok(Self { by_id, order })
    }

    pub fn get(&self, id: &str) -> BoothResult<&FilterDescriptor> {
        self.by_id
            .get(id)
            .ok_or_else(|| BoothError::validation(format!("unknown filter id '{id}'")))
    }

    /// Filters in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn filter(id: &str, name: &str, effect: &str) -> FilterDescriptor {
    FilterDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        effect: effect.to_string(),
        texture: None,
    }
}

fn builtin_filters() -> Vec<FilterDescriptor> {
    vec![
        filter("normal", "Default", ""),
        filter("bw", "B&W", "grayscale(100%)"),
        filter("vintage", "Vintage", "sepia(80%)"),
        filter("oldPhoto", "Old Photo", "sepia(50%) contrast(120%)"),
        filter("amber", "Amber", "sepia(80%) hue-rotate(-20deg)"),
        filter(
            "nocturne",
            "Night",
            "brightness(0.8) contrast(120%) saturate(1.2) hue-rotate(180deg)",
        ),
        filter("test", "Test", "brightness(0.8)"),
        FilterDescriptor {
            id: "paperTexture".to_string(),
            name: "Paper Texture".to_string(),
            effect: "sepia(80%) contrast(110%) brightness(125%) grayscale(25%)".to_string(),
            texture: Some(TextureSpec {
                path: "textures/paper_texture.jpg".to_string(),
                opacity: 0.7,
            }),
        },
        filter(
            "vintageFilm",
            "Vintage Film",
            "sepia(80%) contrast(110%) brightness(115%) grayscale(30%)",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_parses_and_contains_known_ids() {
        let reg = FilterRegistry::builtin();
        assert!(reg.len() >= 8);
        assert_eq!(reg.get("bw").unwrap().effect, "grayscale(100%)");
        assert!(reg.get("paperTexture").unwrap().texture.is_some());
        assert!(reg.get("nope").is_err());
    }

    #[test]
    fn iter_preserves_presentation_order() {
        let reg = FilterRegistry::builtin();
        let first = reg.iter().next().unwrap();
        assert_eq!(first.id, "normal");
    }

    #[test]
    fn rejects_duplicate_ids_and_bad_opacity() {
        let dup = vec![filter("a", "A", ""), filter("a", "A2", "")];
        assert!(FilterRegistry::from_descriptors(dup).is_err());

        let bad = vec![FilterDescriptor {
            id: "t".to_string(),
            name: "T".to_string(),
            effect: String::new(),
            texture: Some(TextureSpec {
                path: "x.jpg".to_string(),
                opacity: 1.5,
            }),
        }];
        assert!(FilterRegistry::from_descriptors(bad).is_err());
    }
}
