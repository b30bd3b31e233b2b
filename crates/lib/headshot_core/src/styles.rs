//! Headshot style catalogue and fallback supplier.
//!
//! Every style carries a prompt template sent to the image model and a fixed
//! set of placeholder images served when the model is unavailable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prepended to every style template.
const IDENTITY_PREAMBLE: &str = "CRITICAL REQUIREMENT: never alter facial features, structure, \
identity, or expression; preserve the exact face of the original photo. Only adjust the pose if \
the subject is not looking at the camera. The final image must look completely realistic.";

/// Placeholder set returned alongside error responses.
const GENERIC_FALLBACK: [&str; 4] = [
    "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=800&q=80",
    "https://images.unsplash.com/photo-1573497019940-1c28c88b4f3e?w=800&q=80",
    "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=800&q=80",
    "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=800&q=80",
];

/// Style identifier accepted by the generate endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleId {
    Professional,
    Creative,
    Casual,
    Modern,
    Executive,
    Vintage,
    Dynamic,
    Monochrome,
    Fashion,
    Outdoor,
    Minimalist,
    Environmental,
    Bold,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid style: {0}")]
pub struct UnknownStyle(pub String);

/// Static description of a style.
#[derive(Debug, Clone, Copy)]
pub struct StyleSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
    pub mock_images: &'static [&'static str],
}

impl StyleId {
    pub const ALL: [StyleId; 13] = [
        StyleId::Professional,
        StyleId::Creative,
        StyleId::Casual,
        StyleId::Modern,
        StyleId::Executive,
        StyleId::Vintage,
        StyleId::Dynamic,
        StyleId::Monochrome,
        StyleId::Fashion,
        StyleId::Outdoor,
        StyleId::Minimalist,
        StyleId::Environmental,
        StyleId::Bold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleId::Professional => "professional",
            StyleId::Creative => "creative",
            StyleId::Casual => "casual",
            StyleId::Modern => "modern",
            StyleId::Executive => "executive",
            StyleId::Vintage => "vintage",
            StyleId::Dynamic => "dynamic",
            StyleId::Monochrome => "monochrome",
            StyleId::Fashion => "fashion",
            StyleId::Outdoor => "outdoor",
            StyleId::Minimalist => "minimalist",
            StyleId::Environmental => "environmental",
            StyleId::Bold => "bold",
        }
    }

    pub fn spec(&self) -> &'static StyleSpec {
        match self {
            StyleId::Professional => &PROFESSIONAL,
            StyleId::Creative => &CREATIVE,
            StyleId::Casual => &CASUAL,
            StyleId::Modern => &MODERN,
            StyleId::Executive => &EXECUTIVE,
            StyleId::Vintage => &VINTAGE,
            StyleId::Dynamic => &DYNAMIC,
            StyleId::Monochrome => &MONOCHROME,
            StyleId::Fashion => &FASHION,
            StyleId::Outdoor => &OUTDOOR,
            StyleId::Minimalist => &MINIMALIST,
            StyleId::Environmental => &ENVIRONMENTAL,
            StyleId::Bold => &BOLD,
        }
    }

    /// Full model prompt: preamble, style template, then the caller's text.
    pub fn build_prompt(&self, user_prompt: Option<&str>) -> String {
        let mut prompt = format!("{IDENTITY_PREAMBLE} {}", self.spec().template);
        if let Some(extra) = user_prompt.map(str::trim).filter(|p| !p.is_empty()) {
            prompt.push(' ');
            prompt.push_str(extra);
        }
        prompt
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleId {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StyleId::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Placeholder images for a style; unknown styles get the professional set.
pub fn fallback_for(style: &str) -> Vec<String> {
    let style = style.parse().unwrap_or(StyleId::Professional);
    style
        .spec()
        .mock_images
        .iter()
        .map(|url| url.to_string())
        .collect()
}

/// The fixed four-image set attached to error responses.
pub fn generic_fallback() -> Vec<String> {
    GENERIC_FALLBACK.iter().map(|url| url.to_string()).collect()
}

const PROFESSIONAL: StyleSpec = StyleSpec {
    name: "Professional",
    description: "Corporate, LinkedIn-ready",
    template: "Generate a high-quality professional headshot suitable for LinkedIn, corporate \
profiles, and business applications. Create soft, even lighting that eliminates harsh shadows. \
Use a neutral background (subtle gradient or solid color). Frame head and shoulders following \
the rule of thirds. Maintain natural skin tones. Render professional attire clearly and \
wrinkle-free. Create a confident, approachable expression with direct eye contact. Apply subtle \
professional color grading.",
    mock_images: &[
        "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1573497019940-1c28c88b4f3e?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=800&q=90&fit=crop",
    ],
};

const CREATIVE: StyleSpec = StyleSpec {
    name: "Creative Artistic",
    description: "Artistic, expressive",
    template: "Generate a high-quality creative headshot with artistic elements while maintaining \
professional quality. Create dramatic, directional lighting with intentional highlights and \
shadows. Use a visually interesting background with depth or subtle textures. Apply a \
distinctive color palette that creates mood without appearing heavily filtered. Ensure the final \
image is polished and intentionally artistic.",
    mock_images: &[
        "https://images.unsplash.com/photo-1573496359142-b8d87734a5a2?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1573497019236-61e7a0081f95?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1508214751196-bcfd4ca60f91?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=800&q=90&fit=crop",
    ],
};

const CASUAL: StyleSpec = StyleSpec {
    name: "Casual",
    description: "Relaxed, approachable",
    template: "Generate a high-quality casual headshot that appears natural and approachable. \
Create natural, outdoor-style lighting that mimics golden hour or soft daylight. Use a \
lifestyle-appropriate background without distraction. Frame head and upper shoulders in a \
relaxed pose. Render casual but neat attire. Apply color grading that enhances warmth.",
    mock_images: &[
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?w=800&q=90&fit=crop",
    ],
};

const MODERN: StyleSpec = StyleSpec {
    name: "Modern Executive",
    description: "Contemporary, trendy",
    template: "Generate a high-quality modern executive headshot ideal for technology and \
contemporary corporate profiles. Use crisp, balanced lighting with a subtle backlight. Choose a \
sleek, modern background such as a minimalist office. Enhance skin clarity with subtle digital \
sharpening and a slight vignette. Evoke a confident, innovative expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1568602471122-7832951cc4c5?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1629425733761-caae3b5f2e50?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1618077360395-f3068be8e001?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1600486913747-55e5470d6f40?w=800&q=90&fit=crop",
    ],
};

const EXECUTIVE: StyleSpec = StyleSpec {
    name: "Executive",
    description: "Powerful, authoritative",
    template: "Generate a high-quality executive headshot that conveys authority. Use crisp, \
balanced lighting with a subtle backlight to create depth. Choose a refined office or dark \
gradient background. Frame head and shoulders with strong, centered composition. Render formal \
business attire with sharp detail. Evoke a composed, authoritative expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=800&q=90&fit=crop",
    ],
};

const VINTAGE: StyleSpec = StyleSpec {
    name: "Vintage-Inspired",
    description: "Timeless, classic",
    template: "Generate a high-quality vintage-inspired headshot with a timeless, classic feel. \
Employ soft, warm lighting that mimics window light. Use a background with vintage textures or \
subtle sepia gradients. Apply film grain and a slight vignette. Create a poised, elegant \
expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1522075469751-3a6694fb2f61?w=800&q=90&fit=crop",
    ],
};

const DYNAMIC: StyleSpec = StyleSpec {
    name: "Dynamic Business",
    description: "Energetic, movement",
    template: "Generate a high-quality dynamic business headshot that captures energy while \
remaining professional. Utilize angular, high-contrast lighting. Choose a background with \
gradients or abstract elements that imply motion. Use slightly off-center framing. Evoke an \
energetic, engaged expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1573497019940-1c28c88b4f3e?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=800&q=90&fit=crop",
    ],
};

const MONOCHROME: StyleSpec = StyleSpec {
    name: "Monochrome",
    description: "Black & white, contrast",
    template: "Generate a high-quality monochrome headshot that emphasizes form, contrast, and \
texture. Use high-contrast black and white lighting. Choose a simple monochrome background. \
Enhance textures of hair, fabric and skin. Create a compelling, timeless expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1573497019940-1c28c88b4f3e?w=800&q=90&fit=crop",
    ],
};

const FASHION: StyleSpec = StyleSpec {
    name: "High-Fashion Editorial",
    description: "Glamour, professional",
    template: "Generate a high-quality high-fashion editorial headshot that blends glamour with \
professionalism. Employ dramatic, stylized lighting. Use an edgy, modern background. Apply \
avant-garde color grading. Render trend-forward attire. Create a striking, confident expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=800&q=90&fit=crop",
    ],
};

const OUTDOOR: StyleSpec = StyleSpec {
    name: "Outdoor Professional",
    description: "Natural, fresh",
    template: "Generate a high-quality outdoor professional headshot. Use natural early morning \
or late afternoon light. Choose an outdoor background with blurred trees or urban greenery. \
Render attire suitable for both outdoor and corporate settings. Create a relaxed yet determined \
expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1529626455594-4ff0802cfb7e?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1524504388940-b1c1722653e1?w=800&q=90&fit=crop",
    ],
};

const MINIMALIST: StyleSpec = StyleSpec {
    name: "Minimalist Studio",
    description: "Simple, clean",
    template: "Generate a high-quality minimalist studio headshot. Employ controlled, even studio \
lighting. Use a plain, unobtrusive background. Frame the subject with precise, centered \
composition. Render minimal professional attire. Create a neutral, confident expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1522075469751-3a6694fb2f61?w=800&q=90&fit=crop",
    ],
};

const ENVIRONMENTAL: StyleSpec = StyleSpec {
    name: "Environmental Portrait",
    description: "Contextual, authentic",
    template: "Generate a high-quality environmental portrait headshot that subtly incorporates \
the subject's workspace. Use ambient lighting that harmonizes with the setting. Choose a \
background with soft, contextually relevant elements. Create a thoughtful, engaging expression.",
    mock_images: &[
        "https://images.unsplash.com/photo-1573497019940-1c28c88b4f3e?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1560250097-0b93528c311a?w=800&q=90&fit=crop",
    ],
};

const BOLD: StyleSpec = StyleSpec {
    name: "Bold Color Impact",
    description: "Vibrant, energetic",
    template: "Generate a high-quality bold color impact headshot using vibrant hues. Use \
dynamic, high-saturation lighting. Choose a bold, colorful background that complements the \
subject. Use a modern, slightly asymmetrical composition. Create an expressive, confident look.",
    mock_images: &[
        "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=800&q=90&fit=crop",
        "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=800&q=90&fit=crop",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" Professional ".parse::<StyleId>(), Ok(StyleId::Professional));
        assert_eq!("BOLD".parse::<StyleId>(), Ok(StyleId::Bold));
        assert_eq!(
            "watercolor".parse::<StyleId>(),
            Err(UnknownStyle("watercolor".into()))
        );
    }

    #[test]
    fn every_style_round_trips_through_its_name() {
        for style in StyleId::ALL {
            assert_eq!(style.as_str().parse::<StyleId>(), Ok(style));
            assert!(!style.spec().mock_images.is_empty());
        }
    }

    #[test]
    fn fallback_is_a_pure_lookup() {
        assert_eq!(fallback_for("creative"), fallback_for("creative"));
        assert_eq!(fallback_for("creative").len(), 4);
    }

    #[test]
    fn unknown_style_falls_back_to_professional_set() {
        assert_eq!(fallback_for("no-such-style"), fallback_for("professional"));
    }

    #[test]
    fn prompt_appends_trimmed_user_text() {
        let prompt = StyleId::Casual.build_prompt(Some("  wearing a blue shirt "));
        assert!(prompt.starts_with("CRITICAL REQUIREMENT"));
        assert!(prompt.contains(CASUAL.template));
        assert!(prompt.ends_with(" wearing a blue shirt"));
    }

    #[test]
    fn blank_user_prompt_is_ignored() {
        assert_eq!(
            StyleId::Bold.build_prompt(Some("   ")),
            StyleId::Bold.build_prompt(None)
        );
    }

    #[test]
    fn generic_fallback_has_four_images() {
        assert_eq!(generic_fallback().len(), 4);
    }
}
