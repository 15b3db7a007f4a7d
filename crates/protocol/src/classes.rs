use serde::{Deserialize, Serialize};

/// Class names the coordinator adds to or removes from elements.
///
/// These are the only classes scroll-fx writes; every other class on the
/// page belongs to the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassToken {
    // Reveal terminals
    InView,
    Visible,
    AnimateIn,
    FadeIn,

    // Navigation and menu
    Active,
    Scrolled,

    Loaded,
    RippleEffect,
}

impl ClassToken {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassToken::InView => "in-view",
            ClassToken::Visible => "visible",
            ClassToken::AnimateIn => "animate-in",
            ClassToken::FadeIn => "fade-in",
            ClassToken::Active => "active",
            ClassToken::Scrolled => "scrolled",
            ClassToken::Loaded => "loaded",
            ClassToken::RippleEffect => "ripple-effect",
        }
    }
}

impl std::fmt::Display for ClassToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_name_matches_css_class() {
        for token in [
            ClassToken::InView,
            ClassToken::AnimateIn,
            ClassToken::RippleEffect,
            ClassToken::Scrolled,
        ] {
            let json = serde_json::to_string(&token).unwrap();
            assert_eq!(json, format!("\"{}\"", token.as_str()));
        }
    }
}
