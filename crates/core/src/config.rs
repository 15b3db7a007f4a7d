use scroll_fx_protocol::ClassToken;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("threshold {0} for `{1}` is outside 0..=1")]
    Threshold(f64, String),
    #[error("invalid root margin {0:?}: {1}")]
    RootMargin(String, &'static str),
}

/// Pixel bias applied to each edge of the viewport before testing
/// intersection, like `IntersectionObserver`'s `rootMargin`. Negative
/// values shrink the trigger area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Parse CSS margin shorthand with one to four `px` (or unitless zero)
    /// values: `"0px 0px -100px 0px"`, `"10px"`, `"0 20px"`.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let err = |why| ConfigError::RootMargin(s.to_string(), why);
        let mut values = Vec::with_capacity(4);
        for part in s.split_whitespace() {
            let number = match part.strip_suffix("px") {
                Some(n) => n,
                None if part == "0" => part,
                None => return Err(err("only px values are supported")),
            };
            let value: f64 = number.parse().map_err(|_| err("not a number"))?;
            if !value.is_finite() {
                return Err(err("not a finite number"));
            }
            values.push(value);
        }
        let [top, right, bottom, left] = match values[..] {
            [all] => [all, all, all, all],
            [v, h] => [v, h, v, h],
            [t, h, b] => [t, h, b, h],
            [t, r, b, l] => [t, r, b, l],
            _ => return Err(err("expected one to four values")),
        };
        Ok(RootMargin {
            top,
            right,
            bottom,
            left,
        })
    }

    /// CSS form accepted by `IntersectionObserverInit.rootMargin`.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

impl TryFrom<String> for RootMargin {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        RootMargin::parse(&s)
    }
}

impl From<RootMargin> for String {
    fn from(m: RootMargin) -> Self {
        m.to_css()
    }
}

/// Elements matched by `selectors` are revealed with `class` once at least
/// `threshold` of them is inside the margin-adjusted viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealGroup {
    pub selectors: Vec<String>,
    pub threshold: f64,
    #[serde(default)]
    pub root_margin: RootMargin,
    pub class: ClassToken,
    /// Delay each element revealed in one observer batch by its position in
    /// that batch times this step.
    #[serde(default)]
    pub batch_stagger_ms: Option<u32>,
}

impl RevealGroup {
    fn new(selectors: &[&str], threshold: f64, root_margin: RootMargin, class: ClassToken) -> Self {
        Self {
            selectors: selectors.iter().map(|s| (*s).to_string()).collect(),
            threshold,
            root_margin,
            class,
            batch_stagger_ms: None,
        }
    }

    /// Comma-joined selector list for `querySelectorAll`.
    pub fn selector_list(&self) -> String {
        self.selectors.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Checked in order; an element matched by several groups keeps the
    /// first one.
    pub groups: Vec<RevealGroup>,
    /// Containers carrying this class stagger their direct children.
    pub stagger_class: String,
    /// Delay added per child index.
    pub stagger_step_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        let bottom_bias = RootMargin {
            bottom: -100.0,
            ..RootMargin::ZERO
        };
        Self {
            groups: vec![
                RevealGroup::new(
                    &[".partner-badge-section"],
                    0.5,
                    RootMargin::ZERO,
                    ClassToken::Visible,
                ),
                RevealGroup::new(
                    &[".what-we-do-section"],
                    0.2,
                    bottom_bias,
                    ClassToken::AnimateIn,
                ),
                RevealGroup {
                    batch_stagger_ms: Some(150),
                    ..RevealGroup::new(
                        &[".service-card"],
                        0.1,
                        RootMargin::ZERO,
                        ClassToken::InView,
                    )
                },
                RevealGroup::new(
                    &[
                        ".animate-fade-in",
                        ".animate-slide-up",
                        ".animate-slide-up-delayed",
                        ".animate-slide-in-right",
                        ".animate-slide-in-left",
                        ".animate-fade-in-up",
                        ".animate-stagger",
                        ".animate-scale",
                    ],
                    0.1,
                    bottom_bias,
                    ClassToken::InView,
                ),
                RevealGroup::new(
                    &[".animate-float", ".animate-float-delayed"],
                    0.5,
                    RootMargin::ZERO,
                    ClassToken::InView,
                ),
                RevealGroup::new(&["section"], 0.1, bottom_bias, ClassToken::FadeIn),
            ],
            stagger_class: "animate-stagger".into(),
            stagger_step_ms: 100,
        }
    }
}

/// A set of parallax targets.
///
/// Plain rules move every match by `scrollY × rate`. Layered rules (with
/// `within`) move each match inside the container by
/// `(scrollY − containerTop) × rate × (index + 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxRule {
    pub selector: String,
    pub rate: f64,
    #[serde(default)]
    pub within: Option<String>,
    /// Stop updating once the page is scrolled past this offset.
    #[serde(default)]
    pub max_scroll: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub bar_selector: String,
    pub link_selector: String,
    pub section_selector: String,
    /// Scroll offset at which the bar gains `scrolled`.
    pub scrolled_threshold: f64,
    /// Distance from the viewport top that decides the current section.
    pub scan_line: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            bar_selector: ".navigation".into(),
            link_selector: ".nav-link[href^=\"#\"]".into(),
            section_selector: "section[id]".into(),
            scrolled_threshold: 100.0,
            scan_line: 200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub menu_selector: String,
    pub open_selector: String,
    pub close_selector: String,
    /// Class of the overlay element the host creates.
    pub overlay_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            menu_selector: ".mobile-menu".into(),
            open_selector: ".mobile-menu-btn".into(),
            close_selector: ".mobile-menu-close".into(),
            overlay_class: "mobile-menu-overlay".into(),
        }
    }
}

/// An HTML fragment fetched from `path` and injected into the element
/// with id `placeholder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSlot {
    pub placeholder: String,
    pub path: String,
}

/// Everything the coordinator and its host need to know about the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub reveal: RevealConfig,
    pub parallax: Vec<ParallaxRule>,
    pub nav: NavConfig,
    pub menu: MenuConfig,
    /// Offset kept above anchor targets when scrolling to them.
    pub anchor_offset: f64,
    pub progress_bar: bool,
    pub ripple_selector: String,
    pub ripple_lifetime_ms: u32,
    pub resize_debounce_ms: u32,
    pub sections: Vec<SectionSlot>,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        let plain = |selector: &str| ParallaxRule {
            selector: selector.into(),
            rate: -0.5,
            within: None,
            max_scroll: None,
        };
        Self {
            reveal: RevealConfig::default(),
            parallax: vec![
                ParallaxRule {
                    max_scroll: Some(900.0),
                    ..plain(".hero-background img")
                },
                plain(".outcomes-section img"),
                plain(".core-services-section img"),
                ParallaxRule {
                    selector: ".absolute".into(),
                    rate: -0.05,
                    within: Some(".what-we-do-section".into()),
                    max_scroll: None,
                },
            ],
            nav: NavConfig::default(),
            menu: MenuConfig::default(),
            anchor_offset: 100.0,
            progress_bar: true,
            ripple_selector: ".service-card".into(),
            ripple_lifetime_ms: 600,
            resize_debounce_ms: 250,
            sections: vec![
                SectionSlot {
                    placeholder: "navigation".into(),
                    path: "./sections/navigation.html".into(),
                },
                SectionSlot {
                    placeholder: "hero".into(),
                    path: "./sections/hero.html".into(),
                },
            ],
        }
    }
}

impl EffectsConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EffectsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for group in &self.reveal.groups {
            if !(0.0..=1.0).contains(&group.threshold) {
                return Err(ConfigError::Threshold(
                    group.threshold,
                    group.selector_list(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bottom_bias_margin() {
        let m = RootMargin::parse("0px 0px -100px 0px").expect("valid margin");
        assert_eq!(m.bottom, -100.0);
        assert_eq!(m.top, 0.0);
        assert_eq!(m.to_css(), "0px 0px -100px 0px");
    }

    #[test]
    fn margin_shorthand_expands_like_css() {
        let m = RootMargin::parse("10px").expect("valid margin");
        assert_eq!(m, RootMargin { top: 10.0, right: 10.0, bottom: 10.0, left: 10.0 });
        let m = RootMargin::parse("0 20px").expect("valid margin");
        assert_eq!(m.left, 20.0);
        assert_eq!(m.bottom, 0.0);
        let m = RootMargin::parse("1px 2px 3px").expect("valid margin");
        assert_eq!(m.left, 2.0);
        assert_eq!(m.bottom, 3.0);
    }

    #[test]
    fn rejects_bad_margins() {
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("10%").is_err());
        assert!(RootMargin::parse("1px 2px 3px 4px 5px").is_err());
        assert!(RootMargin::parse("apx").is_err());
    }

    #[test]
    fn rejects_non_finite_margins() {
        assert!(RootMargin::parse("NaNpx").is_err());
        assert!(RootMargin::parse("0px 0px infpx 0px").is_err());
        assert!(RootMargin::parse("-infpx").is_err());
        let json = r#"{ "reveal": { "groups": [
            { "selectors": [".card"], "threshold": 0.1,
              "root_margin": "NaNpx", "class": "in-view" }
        ] } }"#;
        assert!(EffectsConfig::from_json(json).is_err());
    }

    #[test]
    fn hero_parallax_stops_at_900() {
        let config = EffectsConfig::default();
        let hero = config
            .parallax
            .iter()
            .find(|r| r.selector == ".hero-background img")
            .expect("hero rule");
        assert_eq!(hero.max_scroll, Some(900.0));
        assert_eq!(hero.rate, -0.5);
    }

    #[test]
    fn service_cards_reveal_in_batches() {
        let config = EffectsConfig::default();
        let cards = config
            .reveal
            .groups
            .iter()
            .find(|g| g.selectors.iter().any(|s| s == ".service-card"))
            .expect("service card group");
        assert_eq!(cards.threshold, 0.1);
        assert_eq!(cards.root_margin, RootMargin::ZERO);
        assert_eq!(cards.class, ClassToken::InView);
        assert_eq!(cards.batch_stagger_ms, Some(150));
    }

    #[test]
    fn default_config_validates() {
        assert!(EffectsConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "anchor_offset": 120, "nav": { "scan_line": 150 } }"#;
        let config = EffectsConfig::from_json(json).expect("valid config");
        assert_eq!(config.anchor_offset, 120.0);
        assert_eq!(config.nav.scan_line, 150.0);
        assert_eq!(config.nav.scrolled_threshold, 100.0);
        assert_eq!(config.resize_debounce_ms, 250);
        assert_eq!(config.reveal.stagger_step_ms, 100);
    }

    #[test]
    fn reveal_group_from_json() {
        let json = r#"{ "reveal": { "groups": [
            { "selectors": [".card"], "threshold": 0.3,
              "root_margin": "0px 0px -50px 0px", "class": "visible" }
        ] } }"#;
        let config = EffectsConfig::from_json(json).expect("valid config");
        assert_eq!(config.reveal.groups.len(), 1);
        let group = &config.reveal.groups[0];
        assert_eq!(group.class, ClassToken::Visible);
        assert_eq!(group.root_margin.bottom, -50.0);
        assert_eq!(config.reveal.stagger_class, "animate-stagger");
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let json = r#"{ "reveal": { "groups": [
            { "selectors": [".card"], "threshold": 1.5, "class": "in-view" }
        ] } }"#;
        assert!(matches!(
            EffectsConfig::from_json(json),
            Err(ConfigError::Threshold(..))
        ));
    }
}
