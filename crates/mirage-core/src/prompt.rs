//! Prompt builder: maps a style selection to the instruction sent to the
//! generation provider.
//!
//! Lookup order:
//! 1. a specialized fragment for `(style_id, attribute)`,
//! 2. the preset's literal template when it is non-empty,
//! 3. a generic fallback.
//!
//! Every instruction starts with [`IDENTITY_PREAMBLE`]. The preamble is policy
//! and is not configurable.

use crate::style::SubjectAttribute;

/// Identity-preservation instruction placed at the top of every prompt.
pub const IDENTITY_PREAMBLE: &str = "\
CRITICAL INSTRUCTION:
1. Use the face from the input image. This is the exact person to portray.
2. Preserve identity completely: eyes, nose, mouth, glasses and facial structure stay as they are.
3. Integrate the face into the scene. Re-light it to match the scene's light temperature, color and shadows so it never looks pasted.
4. No filters. Keep visible skin pores and texture.";

const PHOTOGRAPHIC_SPECS: &str = "\
STYLE: Raw high-end editorial photography.
CAMERA: 85mm portrait lens, f/1.8.
QUALITY: 8k, highly detailed, volumetric lighting.
AVOID: cartoon, illustration, painting, pasted face, floating head, mismatched lighting, airbrushed skin, low resolution.";

const FALLBACK_SCENE: &str = "Generate a high-fidelity photo of this person.";

/// Builds the final generation instruction.
///
/// Deterministic and infallible: an unknown `style_id` with an empty template
/// yields the fallback instruction.
pub fn build_prompt(style_id: &str, attribute: SubjectAttribute, template: &str) -> String {
    if let Some(fragment) = specialized_fragment(style_id, attribute) {
        return join(&[IDENTITY_PREAMBLE, &fragment, PHOTOGRAPHIC_SPECS]);
    }

    let template = template.trim();
    if !template.is_empty() {
        return join(&[IDENTITY_PREAMBLE, template]);
    }

    fallback_prompt()
}

/// The instruction used when nothing more specific is known.
pub fn fallback_prompt() -> String {
    join(&[IDENTITY_PREAMBLE, FALLBACK_SCENE, PHOTOGRAPHIC_SPECS])
}

fn join(sections: &[&str]) -> String {
    sections.join("\n\n")
}

fn pick(attribute: SubjectAttribute, female: &str, male: &str) -> String {
    match attribute {
        SubjectAttribute::Female => female.to_string(),
        SubjectAttribute::Male => male.to_string(),
    }
}

fn specialized_fragment(style_id: &str, attribute: SubjectAttribute) -> Option<String> {
    let fragment = match style_id {
        "adult-bollywood" => {
            let outfit = pick(
                attribute,
                "a glamorous high-fashion red carpet gown with heavy diamond jewelry",
                "a sharp black velvet designer tuxedo with sequins",
            );
            format!(
                "THE SCENE:\n\
                 The subject is a famous film star on the red carpet at a paparazzi event.\n\
                 They are wearing {outfit}.\n\
                 Framing: medium shot, waist up, the face is the clear focus.\n\
                 Background: a dark night event full of camera flashes (bokeh).\n\n\
                 LIGHTING MATCH (CRITICAL):\n\
                 Direct flash photography with high contrast. Sharp specular highlights on forehead and cheeks.\n\
                 Skin matches the cool white temperature of the flashes. No beauty filter."
            )
        }
        "adult-royal" => {
            let outfit = pick(
                attribute,
                "a red Banarasi silk lehenga with heavy gold Kundan jewelry",
                "an ivory and gold sherwani with a royal turban and pearl necklace",
            );
            format!(
                "THE SCENE:\n\
                 The subject is royalty standing in the archway of a sandstone palace in Jaipur.\n\
                 They are wearing {outfit}.\n\
                 Framing: medium shot, waist up.\n\
                 Background: intricate stone carvings, slightly blurred.\n\n\
                 LIGHTING MATCH (CRITICAL):\n\
                 Golden hour. The light on the face is warm gold and orange.\n\
                 The skin absorbs the warm ambient light; soft directional sunlight from the side."
            )
        }
        "adult-vintage" => {
            let outfit = pick(
                attribute,
                "a vintage flapper dress with a feather headband",
                "a sharp three-piece suit with a pocket watch",
            );
            format!(
                "THE SCENE:\n\
                 A 1920s silver screen portrait.\n\
                 The subject is wearing {outfit}.\n\
                 Framing: classic Hollywood close-up.\n\n\
                 LIGHTING MATCH (CRITICAL):\n\
                 Black and white, high contrast film noir lighting.\n\
                 Authentic film grain on the skin, as if shot on silver nitrate film in 1924."
            )
        }
        "kid-1" => "THE SCENE:\n\
             The child is a student at a school of magic, in black wizard robes and a striped house scarf,\n\
             holding a wand that emits golden sparks.\n\
             Background: a great hall with floating candles under a starry ceiling.\n\n\
             LIGHTING MATCH (CRITICAL):\n\
             Warm flickering candlelight. The face glows from the wand and candles,\n\
             with spark reflections visible in the eyes or glasses."
            .to_string(),
        "kid-2" => {
            let title = pick(attribute, "a little princess", "a little prince");
            format!(
                "THE SCENE:\n\
                 The child is {title} in a grand palace courtyard, wearing miniature royal attire.\n\
                 Background: decorated elephants and white horses.\n\
                 Framing: medium shot, knees up.\n\n\
                 LIGHTING MATCH (CRITICAL):\n\
                 Bright natural daylight with vibrant colors and natural sun shadows on the face."
            )
        }
        "kid-3" => "THE SCENE:\n\
             The child is a 3D animated character in an adventure film, wearing an explorer outfit.\n\
             Background: a colorful jungle or open sky.\n\n\
             STYLE OVERRIDE:\n\
             A 3D render. Keep the child's exact glasses and features, stylized as 3D geometry,\n\
             with subsurface-scattered skin and big expressive eyes."
            .to_string(),
        "couple-1" => "THE SCENE:\n\
             A royal wedding portrait of a couple. One wears a gold sherwani, the other a red lehenga.\n\
             They stand close together looking at the camera.\n\
             Framing: medium shot, waist up.\n\n\
             LIGHTING MATCH (CRITICAL):\n\
             Golden hour backlighting. Both faces share the same warm glow,\n\
             and shadows from one person fall naturally on the other."
            .to_string(),
        "couple-2" => "THE SCENE:\n\
             A romantic couple portrait in a rose garden, in formal evening wear.\n\
             Background: a wall of pink and white roses.\n\
             Framing: close-up, chest up.\n\n\
             LIGHTING MATCH (CRITICAL):\n\
             Soft diffuse overcast daylight. Soft rosy skin tones and no harsh shadows."
            .to_string(),
        "couple-3" => "THE SCENE:\n\
             A couple at a rooftop night party in black tie attire.\n\
             Background: blurred city lights at night.\n\n\
             LIGHTING MATCH (CRITICAL):\n\
             Direct flash. Bright faces in the center, dark vignette at the edges, glossy high-contrast skin."
            .to_string(),
        _ => return None,
    };
    Some(fragment)
}
