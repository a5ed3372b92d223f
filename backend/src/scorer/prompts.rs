//! Text prompts that describe each occasion/style pair.
//!
//! Keys are matched in lowercase. The model-backed scorer embeds every prompt
//! of the requested pair and keeps the best matching probability.

/// Prompts for `occasion`/`style`, or `None` for an unknown pair.
pub fn prompts_for(occasion: &str, style: &str) -> Option<&'static [&'static str]> {
    let prompts: &'static [&'static str] = match (occasion, style) {
        ("office", "genz") => &[
            "Gen Z office outfit, trendy yet professional with a modern twist",
            "stylish Gen Z smart casual office look",
        ],
        ("office", "genx") => &[
            "Gen X professional office outfit, elegant and balanced",
            "mature and classic business formal outfit",
        ],
        ("office", "classic") => &[
            "classic office attire, timeless blazer and white shirt",
            "traditional business professional outfit",
        ],
        ("wedding", "genz") => &[
            "vibrant Gen Z wedding guest outfit, playful yet elegant",
            "trendy wedding outfit with bold patterns",
        ],
        ("wedding", "genx") => &[
            "Gen X elegant wedding outfit, refined and graceful",
            "mature formal wedding look with subtle colors",
        ],
        ("wedding", "classic") => &[
            "classic wedding outfit, timeless gown or formal suit",
            "traditional wedding attire with minimal accessories",
        ],
        ("casual", "genz") => &[
            "Gen Z casual outfit, relaxed streetwear with bold colors",
            "trendy everyday outfit with crop tops, baggy jeans, and sneakers",
        ],
        ("casual", "genx") => &[
            "Gen X casual outfit, neat polo shirts, jeans, and loafers",
            "comfortable yet polished casual wear for outings",
        ],
        ("casual", "classic") => &[
            "classic casual outfit, simple jeans and shirt combo",
            "timeless weekend look with neutral tones",
        ],
        ("beach", "genz") => &[
            "Gen Z beach outfit, bright colors and lightweight fabrics",
            "summer vibe with trendy swimwear and accessories",
        ],
        ("beach", "genx") => &[
            "Gen X relaxed beachwear, comfortable and mature",
            "light cotton clothes for seaside relaxation",
        ],
        ("beach", "classic") => &[
            "classic beach outfit, timeless swimwear with cover-up",
            "simple, airy, and elegant coastal style",
        ],
        _ => return None,
    };
    Some(prompts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_pair_has_prompts() {
        for occasion in ["office", "wedding", "casual", "beach"] {
            for style in ["genz", "genx", "classic"] {
                let prompts = prompts_for(occasion, style).unwrap();
                assert_eq!(prompts.len(), 2, "{}/{}", occasion, style);
            }
        }
    }

    #[test]
    fn lookup_is_case_sensitive_lowercase() {
        assert!(prompts_for("Wedding", "classic").is_none());
        assert!(prompts_for("party", "genz").is_none());
    }
}
