//! Paint catalog and closest-match search
//!
//! A [`PaintBrand`] is a read-only, ordered list of paints used as the search
//! space for matching. Matching uses the weighted redmean distance and breaks
//! ties by catalog order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::color::{Color, Rgb};
use crate::distance::{self, DistanceMetric};
use crate::error::ColorError;

/// How much a paint covers what is underneath
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Opacity {
    Transparent,
    SemiOpaque,
    Opaque,
}

/// Lightfastness rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permanence {
    Fugitive,
    ModeratelyPermanent,
    Permanent,
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintColor {
    pub id: String,
    pub name: String,
    #[serde(rename = "hex")]
    pub color: Color,
    /// Price per tube, never negative
    pub price: f64,
    pub opacity: Opacity,
    pub permanence: Permanence,
    /// Price tier, starting at 1
    pub series: u8,
}

impl PaintColor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: Color,
        price: f64,
        opacity: Opacity,
        permanence: Permanence,
        series: u8,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
            price,
            opacity,
            permanence,
            series,
        }
    }

    pub fn rgb(&self) -> Rgb {
        self.color.rgb()
    }

    pub fn hex(&self) -> String {
        self.color.hex()
    }

    fn validate(&self) -> Result<(), ColorError> {
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(ColorError::InvalidPaint(format!(
                "{}: price must be >= 0, got {}",
                self.id, self.price
            )));
        }
        if self.series == 0 {
            return Err(ColorError::InvalidPaint(format!(
                "{}: series must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

/// A named paint brand (catalog)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaintBrand {
    pub id: String,
    pub name: String,
    colors: Vec<PaintColor>,
}

impl PaintBrand {
    /// Build a brand, validating every entry.
    ///
    /// An empty list is accepted here; matching against it is what fails.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        colors: Vec<PaintColor>,
    ) -> Result<Self, ColorError> {
        let brand = Self {
            id: id.into(),
            name: name.into(),
            colors,
        };
        brand.validate()?;
        Ok(brand)
    }

    /// Load a brand from JSON
    pub fn from_json(json: &str) -> Result<Self, ColorError> {
        let brand: PaintBrand = serde_json::from_str(json)?;
        brand.validate()?;
        tracing::info!("Loaded paint brand '{}' with {} colors", brand.name, brand.len());
        Ok(brand)
    }

    fn validate(&self) -> Result<(), ColorError> {
        let mut seen = HashSet::new();
        for paint in &self.colors {
            paint.validate()?;
            if !seen.insert(paint.id.as_str()) {
                return Err(ColorError::InvalidPaint(format!(
                    "duplicate paint id '{}' in brand '{}'",
                    paint.id, self.id
                )));
            }
        }
        Ok(())
    }

    pub fn colors(&self) -> &[PaintColor] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PaintColor> {
        self.colors.iter().find(|p| p.id == id)
    }

    /// First paint (in catalog order) whose name contains `needle`, ignoring case
    pub fn find_by_name(&self, needle: &str) -> Option<&PaintColor> {
        let needle = needle.to_lowercase();
        self.colors
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }
}

/// A catalog entry together with its distance to the query
#[derive(Debug, Clone, Copy)]
pub struct PaintMatch<'a> {
    pub paint: &'a PaintColor,
    pub distance: f64,
}

/// Find the nearest paint using the weighted redmean distance.
///
/// Exhaustive scan; the first entry wins ties.
pub fn nearest<'a>(target: &Color, brand: &'a PaintBrand) -> Result<PaintMatch<'a>, ColorError> {
    let mut best: Option<PaintMatch<'a>> = None;

    for paint in brand.colors() {
        let dist = distance::redmean(target.rgb(), paint.rgb());
        if best.map_or(true, |b| dist < b.distance) {
            best = Some(PaintMatch {
                paint,
                distance: dist,
            });
        }
    }

    best.ok_or_else(|| ColorError::EmptyCatalog(brand.name.clone()))
}

/// The paint closest to `target`
pub fn closest_match<'a>(
    target: &Color,
    brand: &'a PaintBrand,
) -> Result<&'a PaintColor, ColorError> {
    nearest(target, brand).map(|m| m.paint)
}

/// One palette color with its catalog match
#[derive(Debug, Clone, Serialize)]
pub struct PaletteMatchEntry {
    pub target: Color,
    pub paint: PaintColor,
    pub delta_e: f64,
}

/// Catalog matches for a whole palette
#[derive(Debug, Clone, Serialize)]
pub struct PaletteMatch {
    pub matches: Vec<PaletteMatchEntry>,
    /// `100 - mean Delta-E`, clamped to [0, 100]
    pub accuracy: f64,
}

/// Match every palette color against the brand and score the palette by Delta-E
pub fn match_palette(colors: &[Color], brand: &PaintBrand) -> Result<PaletteMatch, ColorError> {
    if brand.is_empty() {
        return Err(ColorError::EmptyCatalog(brand.name.clone()));
    }

    let matches = colors
        .iter()
        .map(|target| {
            let paint = closest_match(target, brand)?;
            Ok(PaletteMatchEntry {
                target: *target,
                paint: paint.clone(),
                delta_e: distance::distance(target, &paint.color, DistanceMetric::DeltaE76),
            })
        })
        .collect::<Result<Vec<_>, ColorError>>()?;

    let accuracy = if matches.is_empty() {
        100.0
    } else {
        let mean = matches.iter().map(|m| m.delta_e).sum::<f64>() / matches.len() as f64;
        ((100.0 - mean).clamp(0.0, 100.0) * 10.0).round() / 10.0
    };

    Ok(PaletteMatch { matches, accuracy })
}

use Opacity::{Opaque, SemiOpaque, Transparent};
use Permanence::{Fugitive, ModeratelyPermanent, Permanent};

/// Built-in artist acrylic range: (id, name, color, price, opacity, permanence, series)
#[rustfmt::skip]
const REFERENCE_PAINTS: &[(&str, &str, Color, f64, Opacity, Permanence, u8)] = &[
    ("titanium-white", "Titanium White", Color::new(0xf4, 0xf4, 0xef), 8.50, Opaque, Permanent, 1),
    ("mars-black", "Mars Black", Color::new(0x1c, 0x1c, 0x1c), 8.50, Opaque, Permanent, 1),
    ("ivory-black", "Ivory Black", Color::new(0x23, 0x1f, 0x20), 8.50, SemiOpaque, Permanent, 1),
    ("paynes-gray", "Payne's Gray", Color::new(0x40, 0x48, 0x4f), 9.25, SemiOpaque, Permanent, 1),
    ("cadmium-yellow-light", "Cadmium Yellow Light", Color::new(0xff, 0xf2, 0x00), 14.75, Opaque, Permanent, 4),
    ("cadmium-yellow-medium", "Cadmium Yellow Medium", Color::new(0xff, 0xc2, 0x0e), 14.75, Opaque, Permanent, 4),
    ("hansa-yellow", "Hansa Yellow", Color::new(0xf9, 0xd7, 0x1c), 10.25, SemiOpaque, Permanent, 2),
    ("yellow-ochre", "Yellow Ochre", Color::new(0xc8, 0x96, 0x2e), 8.50, Opaque, Permanent, 1),
    ("cadmium-orange", "Cadmium Orange", Color::new(0xf3, 0x70, 0x21), 14.75, Opaque, Permanent, 4),
    ("cadmium-red-medium", "Cadmium Red Medium", Color::new(0xe3, 0x06, 0x13), 14.75, Opaque, Permanent, 4),
    ("naphthol-crimson", "Naphthol Crimson", Color::new(0xc4, 0x1e, 0x3a), 10.25, SemiOpaque, Permanent, 2),
    ("alizarin-crimson-hue", "Alizarin Crimson Hue", Color::new(0x8b, 0x1a, 0x2b), 9.25, Transparent, ModeratelyPermanent, 2),
    ("quinacridone-magenta", "Quinacridone Magenta", Color::new(0x9e, 0x1f, 0x63), 12.50, Transparent, Permanent, 3),
    ("opera-pink", "Opera Pink", Color::new(0xff, 0x3c, 0x9e), 12.50, Transparent, Fugitive, 3),
    ("dioxazine-purple", "Dioxazine Purple", Color::new(0x4b, 0x23, 0x67), 12.50, Transparent, Permanent, 3),
    ("ultramarine-blue", "Ultramarine Blue", Color::new(0x21, 0x40, 0x9a), 8.50, Transparent, Permanent, 1),
    ("phthalo-blue", "Phthalo Blue", Color::new(0x0f, 0x4c, 0x81), 10.25, Transparent, Permanent, 2),
    ("cerulean-blue-hue", "Cerulean Blue Hue", Color::new(0x2a, 0x7a, 0xb0), 10.25, SemiOpaque, Permanent, 2),
    ("cobalt-blue", "Cobalt Blue", Color::new(0x00, 0x47, 0xab), 18.95, SemiOpaque, Permanent, 5),
    ("phthalo-green", "Phthalo Green", Color::new(0x12, 0x35, 0x24), 10.25, Transparent, Permanent, 2),
    ("sap-green", "Sap Green", Color::new(0x50, 0x7d, 0x2a), 9.25, Transparent, ModeratelyPermanent, 1),
    ("permanent-green-light", "Permanent Green Light", Color::new(0x3c, 0xb0, 0x43), 10.25, Opaque, Permanent, 2),
    ("burnt-sienna", "Burnt Sienna", Color::new(0x8a, 0x33, 0x24), 8.50, SemiOpaque, Permanent, 1),
    ("burnt-umber", "Burnt Umber", Color::new(0x5c, 0x3a, 0x21), 8.50, Opaque, Permanent, 1),
    ("raw-umber", "Raw Umber", Color::new(0x82, 0x66, 0x44), 8.50, Opaque, Permanent, 1),
];

/// The built-in "Studio Acrylics" brand
pub fn reference_brand() -> PaintBrand {
    let colors = REFERENCE_PAINTS
        .iter()
        .map(|&(id, name, color, price, opacity, permanence, series)| {
            PaintColor::new(id, name, color, price, opacity, permanence, series)
        })
        .collect();

    PaintBrand {
        id: "studio-acrylics".to_string(),
        name: "Studio Acrylics".to_string(),
        colors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn paint(id: &str, name: &str, hex: &str) -> PaintColor {
        PaintColor::new(
            id,
            name,
            Color::from_hex(hex).unwrap(),
            10.0,
            Opacity::Opaque,
            Permanence::Permanent,
            1,
        )
    }

    #[test]
    fn test_reference_brand_is_valid() {
        let brand = reference_brand();
        assert!(brand.validate().is_ok());
        assert_eq!(brand.len(), REFERENCE_PAINTS.len());
    }

    #[test]
    fn test_closest_match_exact() {
        let brand = reference_brand();
        let target = Color::from_hex("#E30613").unwrap();
        let m = nearest(&target, &brand).unwrap();
        assert_eq!(m.paint.id, "cadmium-red-medium");
        assert_eq!(m.distance, 0.0);
    }

    #[test]
    fn test_empty_catalog_errors() {
        let brand = PaintBrand::new("empty", "Empty", Vec::new()).unwrap();
        assert!(matches!(
            closest_match(&Color::WHITE, &brand),
            Err(ColorError::EmptyCatalog(_))
        ));
        assert!(matches!(
            match_palette(&[Color::WHITE], &brand),
            Err(ColorError::EmptyCatalog(_))
        ));
    }

    #[test]
    fn test_ties_break_by_catalog_order() {
        let brand = PaintBrand::new(
            "dup",
            "Dup",
            vec![
                paint("first", "Grey A", "#808080"),
                paint("second", "Grey B", "#808080"),
            ],
        )
        .unwrap();
        let m = closest_match(&Color::new(0x70, 0x70, 0x70), &brand).unwrap();
        assert_eq!(m.id, "first");
    }

    #[test]
    fn test_matches_brute_force() {
        let brand = reference_brand();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..300 {
            let target = Color::new(rng.gen(), rng.gen(), rng.gen());

            // Independent reference: index of the minimum, first on ties
            let mut best_index = 0;
            let mut best_dist = f64::MAX;
            for (i, p) in brand.colors().iter().enumerate() {
                let dist = distance::distance(&target, &p.color, DistanceMetric::Redmean);
                if dist < best_dist {
                    best_dist = dist;
                    best_index = i;
                }
            }

            let found = closest_match(&target, &brand).unwrap();
            assert_eq!(found.id, brand.colors()[best_index].id);
        }
    }

    #[test]
    fn test_find_by_name() {
        let brand = reference_brand();
        assert_eq!(brand.find_by_name("white").unwrap().id, "titanium-white");
        assert_eq!(brand.find_by_name("Blue").unwrap().id, "ultramarine-blue");
        assert!(brand.find_by_name("vermilion").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r##"{
            "id": "mini",
            "name": "Mini",
            "colors": [
                {"id": "w", "name": "White", "hex": "#FFFFFF", "price": 5.0,
                 "opacity": "opaque", "permanence": "permanent", "series": 1},
                {"id": "r", "name": "Red", "hex": "#ff0000", "price": 7.5,
                 "opacity": "semi-opaque", "permanence": "moderately-permanent", "series": 2}
            ]
        }"##;
        let brand = PaintBrand::from_json(json).unwrap();
        assert_eq!(brand.len(), 2);
        assert_eq!(brand.get("r").unwrap().opacity, Opacity::SemiOpaque);
        assert_eq!(brand.get("w").unwrap().hex(), "#ffffff");
    }

    #[test]
    fn test_from_json_rejects_invalid_entries() {
        let entry = |price: &str, series: &str, hex: &str| {
            format!(
                r#"{{"id": "b", "name": "B", "colors": [{{"id": "x", "name": "X", "hex": "{}",
                "price": {}, "opacity": "opaque", "permanence": "permanent", "series": {}}}]}}"#,
                hex, price, series
            )
        };

        assert!(matches!(
            PaintBrand::from_json(&entry("-1.0", "1", "#000000")),
            Err(ColorError::InvalidPaint(_))
        ));
        assert!(matches!(
            PaintBrand::from_json(&entry("1.0", "0", "#000000")),
            Err(ColorError::InvalidPaint(_))
        ));
        assert!(matches!(
            PaintBrand::from_json(&entry("1.0", "1", "#00000")),
            Err(ColorError::Format(_))
        ));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = PaintBrand::new(
            "dup",
            "Dup",
            vec![paint("x", "A", "#000000"), paint("x", "B", "#ffffff")],
        );
        assert!(matches!(result, Err(ColorError::InvalidPaint(_))));
    }

    #[test]
    fn test_match_palette() {
        let brand = reference_brand();
        let palette = [
            Color::from_hex("#E30613").unwrap(),
            Color::from_hex("#21409a").unwrap(),
        ];
        let result = match_palette(&palette, &brand).unwrap();
        assert_eq!(result.matches.len(), 2);
        assert_eq!(result.matches[0].paint.id, "cadmium-red-medium");
        assert_eq!(result.matches[1].paint.id, "ultramarine-blue");
        assert_eq!(result.accuracy, 100.0);
    }
}
