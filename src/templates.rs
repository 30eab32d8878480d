//! The template registry: layout descriptors for the strip compositor.
//!
//! A template describes where the four photos land (normalized percentage
//! rects), which background / overlay artwork to draw, and how borders are
//! styled. The special `"default"` template has no fixed slots; the
//! compositor stacks one implicit square slot per photo vertically.

use std::collections::BTreeMap;

use crate::error::{BoothError, BoothResult};

/// Photo slot rect in percent of the template box, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotRect {
    pub x_percent: f32,
    pub y_percent: f32,
    pub width_percent: f32,
    pub height_percent: f32,
}

impl SlotRect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x_percent: x,
            y_percent: y,
            width_percent: w,
            height_percent: h,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BorderSpec {
    pub width_px: u32,
    /// `#RRGGBB` hex.
    pub color: [u8; 3],
    pub radius_px: u32,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Background artwork behind the photos.
    pub background_image: Option<String>,
    /// Artwork drawn over photos but under stickers.
    pub template_overlay_image: Option<String>,
    /// Extra topmost artwork (still under stickers).
    pub overlay_image: Option<String>,
    /// Empty for the default vertical-stack template.
    pub photo_slots: Vec<SlotRect>,
    /// Height divided by width of the template box.
    pub aspect_ratio: Option<f32>,
    pub background_color: Option<[u8; 3]>,
    pub photo_border: Option<BorderSpec>,
    pub outer_border: Option<BorderSpec>,
}

pub const DEFAULT_TEMPLATE_ID: &str = "default";

impl TemplateDescriptor {
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_TEMPLATE_ID
    }

    /// Number of photos the template can show. The default strip always
    /// stacks four.
    pub fn slot_count(&self) -> usize {
        if self.is_default() {
            crate::capture::PHOTO_COUNT
        } else {
            self.photo_slots.len()
        }
    }

    pub fn validate(&self) -> BoothResult<()> {
        if self.id.trim().is_empty() {
            return Err(BoothError::validation("template id must be non-empty"));
        }
        if !self.is_default() && self.photo_slots.is_empty() {
            return Err(BoothError::validation(format!(
                "template '{}' must define photo slots",
                self.id
            )));
        }
        for (i, s) in self.photo_slots.iter().enumerate() {
            let ok = s.width_percent > 0.0
                && s.height_percent > 0.0
                && s.x_percent >= 0.0
                && s.y_percent >= 0.0
                && s.x_percent + s.width_percent <= 100.0
                && s.y_percent + s.height_percent <= 100.0;
            if !ok {
                return Err(BoothError::validation(format!(
                    "template '{}' slot {i} is out of bounds",
                    self.id
                )));
            }
        }
        if let Some(ar) = self.aspect_ratio {
            if !(ar.is_finite() && ar > 0.0) {
                return Err(BoothError::validation(format!(
                    "template '{}' aspect ratio must be finite and > 0",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

pub struct TemplateRegistry {
    by_id: BTreeMap<String, TemplateDescriptor>,
    order: Vec<String>,
}

impl TemplateRegistry {
    pub fn builtin() -> Self {
        Self::from_descriptors(builtin_templates()).expect("builtin template table is valid")
    }

    pub fn from_descriptors(descriptors: Vec<TemplateDescriptor>) -> BoothResult<Self> {
        let mut by_id = BTreeMap::new();
        let mut order = Vec::with_capacity(descriptors.len());
        for d in descriptors {
            d.validate()?;
            if by_id.contains_key(&d.id) {
                return Err(BoothError::validation(format!(
                    "duplicate template id '{}'",
                    d.id
                )));
            }
            order.push(d.id.clone());
            by_id.insert(d.id.clone(), d);
        }
        Ok(Self { by_id, order })
    }

    pub fn get(&self, id: &str) -> BoothResult<&TemplateDescriptor> {
        self.by_id
            .get(id)
            .ok_or_else(|| BoothError::validation(format!("unknown template id '{id}'")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateDescriptor> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn builtin_templates() -> Vec<TemplateDescriptor> {
    vec![
        TemplateDescriptor {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            name: "Classic Strip".to_string(),
            description: "Classic 4-photo strip with customizable border".to_string(),
            background_image: None,
            template_overlay_image: None,
            overlay_image: None,
            photo_slots: Vec::new(),
            // 1:4 strip.
            aspect_ratio: Some(4.0),
            background_color: Some([0xFF, 0xFF, 0xFF]),
            photo_border: None,
            outer_border: None,
        },
        TemplateDescriptor {
            id: "grid4".to_string(),
            name: "Grid Layout".to_string(),
            description: "Four-photo grid layout in 2x2 arrangement".to_string(),
            background_image: Some("templates/grid4_bg.png".to_string()),
            template_overlay_image: None,
            overlay_image: None,
            // 5% margins, 42.5% square cells in the top two thirds.
            photo_slots: vec![
                SlotRect::new(5.0, 5.0, 42.5, 42.5),
                SlotRect::new(52.5, 5.0, 42.5, 42.5),
                SlotRect::new(5.0, 52.5, 42.5, 42.5),
                SlotRect::new(52.5, 52.5, 42.5, 42.5),
            ],
            aspect_ratio: Some(1.5),
            // Fallback if the background image fails to load.
            background_color: Some([0xFF, 0xF5, 0xF7]),
            photo_border: None,
            outer_border: None,
        },
        TemplateDescriptor {
            id: "grid4_star".to_string(),
            name: "Starry Sky Layout".to_string(),
            description: "Four-photo starry sky layout with vertical arrangement".to_string(),
            background_image: Some("templates/grid4_star.jpg".to_string()),
            template_overlay_image: None,
            overlay_image: None,
            photo_slots: vec![
                SlotRect::new(10.0, 5.0, 80.0, 15.0),
                SlotRect::new(10.0, 25.0, 80.0, 15.0),
                SlotRect::new(10.0, 45.0, 80.0, 15.0),
                SlotRect::new(10.0, 65.0, 80.0, 15.0),
            ],
            aspect_ratio: Some(3.0),
            background_color: Some([0x00, 0x00, 0x33]),
            photo_border: Some(BorderSpec {
                width_px: 3,
                color: [0xFF, 0xFF, 0xFF],
                radius_px: 8,
            }),
            outer_border: None,
        },
    ]
}
