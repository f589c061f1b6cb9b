//! The three fixed style catalogs, keyed by [`Category`].

use once_cell::sync::Lazy;

use super::model::{Category, StylePreset};

static ADULT_STYLES: Lazy<Vec<StylePreset>> = Lazy::new(|| {
    vec![
        StylePreset::new(
            "adult-bollywood",
            "Bollywood Awards",
            "Red Carpet Paparazzi Event",
            "https://media.istockphoto.com/id/2161772958/photo/red-carpet-entrance-with-golden-stanchions-velvet-ropes-and-white-flashlights.jpg",
        ),
        StylePreset::new(
            "adult-royal",
            "Royal Majesty",
            "Indian Palace & Heritage",
            "https://i.pinimg.com/236x/30/a2/90/30a2900a3868f45124bb56f295211dce.jpg",
        ),
        StylePreset::new(
            "adult-vintage",
            "Vintage Gala",
            "1920s Great Gatsby Party",
            "https://static.wixstatic.com/media/db977a_d458dfc7f0b14fa3ab034e4d3bc1ef3f~mv2.jpg",
        ),
    ]
});

static CHILD_STYLES: Lazy<Vec<StylePreset>> = Lazy::new(|| {
    vec![
        StylePreset::new(
            "kid-1",
            "School of Magic",
            "Wizard Robes & Spells",
            "https://thumbs.dreamstime.com/b/beautiful-woman-blue-wizard-robes-casts-spells-atop-mountain-under-starlit-sky-standing-peak-her-wand-long-blonde-338107478.jpg",
        ),
        StylePreset::new(
            "kid-2",
            "Royal Dynasty",
            "Palace, Elephants & Horses",
            "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTSLUyimalHJiSzxWMQN4Eu686BxkFQJEOViw&s",
        ),
        StylePreset::new(
            "kid-3",
            "Toon Adventure",
            "3D Pixar-Style Explorer",
            "https://img.freepik.com/premium-photo/cute-boy-pixar-style-cartoon-3d-illustration-generative-ai_776674-582329.jpg",
        ),
    ]
});

static COUPLE_STYLES: Lazy<Vec<StylePreset>> = Lazy::new(|| {
    vec![
        StylePreset::new(
            "couple-1",
            "Grand Palace Union",
            "Royal Wedding Ceremony",
            "https://images.unsplash.com/photo-1583934555026-373ad43728cc?q=80&w=800&auto=format&fit=crop",
        ),
        StylePreset::new(
            "couple-2",
            "Floral Symphony",
            "Romantic Rose Garden",
            "https://images.unsplash.com/photo-1515934751635-c81c6bc9a2d8?q=80&w=800&auto=format&fit=crop",
        ),
        StylePreset::new(
            "couple-3",
            "Midnight Reception",
            "City Chic Night Party",
            "https://images.unsplash.com/photo-1492684223066-81342ee5ff30?q=80&w=800&auto=format&fit=crop",
        ),
    ]
});

/// Returns the catalog for a category, in display order.
pub fn styles_for(category: Category) -> &'static [StylePreset] {
    match category {
        Category::Adult => &ADULT_STYLES,
        Category::Child => &CHILD_STYLES,
        Category::Couple => &COUPLE_STYLES,
    }
}

/// Looks up a preset by id within one category's catalog.
pub fn find(category: Category, style_id: &str) -> Option<&'static StylePreset> {
    styles_for(category).iter().find(|style| style.id == style_id)
}

/// Preview images for the attract loop on the idle screen.
///
/// Couple previews are left out; the attract loop cycles single-subject looks.
pub fn attract_previews() -> impl Iterator<Item = &'static str> {
    styles_for(Category::Adult)
        .iter()
        .chain(styles_for(Category::Child))
        .map(|style| style.preview_url.as_str())
}
