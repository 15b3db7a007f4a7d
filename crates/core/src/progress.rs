use scroll_fx_protocol::{DomCommand, Viewport};

/// How far down the page the reader is, in percent (0–100).
pub fn scroll_percent(viewport: &Viewport) -> f64 {
    let scrollable = viewport.scrollable_height();
    if scrollable <= 0.0 {
        return 0.0;
    }
    (viewport.scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

/// The thin bar pinned to the top of the page.
#[derive(Debug, Clone, Default)]
pub struct ProgressBar {
    last: Option<f64>,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a width change when the percentage moved.
    pub fn update(&mut self, viewport: &Viewport) -> Option<DomCommand> {
        let percent = scroll_percent(viewport);
        if self.last == Some(percent) {
            return None;
        }
        self.last = Some(percent);
        Some(DomCommand::SetProgress { percent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vp(scroll_y: f64) -> Viewport {
        Viewport {
            scroll_y,
            width: 1200.0,
            height: 800.0,
            document_height: 2800.0,
        }
    }

    #[test]
    fn percent_of_scrollable_range() {
        assert_eq!(scroll_percent(&vp(0.0)), 0.0);
        assert_eq!(scroll_percent(&vp(1000.0)), 50.0);
        assert_eq!(scroll_percent(&vp(2000.0)), 100.0);
    }

    #[test]
    fn overscroll_clamps() {
        assert_eq!(scroll_percent(&vp(2500.0)), 100.0);
        assert_eq!(scroll_percent(&vp(-40.0)), 0.0);
    }

    #[test]
    fn unscrollable_page_is_zero() {
        let mut v = vp(0.0);
        v.document_height = 500.0;
        assert_eq!(scroll_percent(&v), 0.0);
    }

    #[test]
    fn bar_skips_unchanged_width() {
        let mut bar = ProgressBar::new();
        assert_eq!(
            bar.update(&vp(1000.0)),
            Some(DomCommand::SetProgress { percent: 50.0 })
        );
        assert_eq!(bar.update(&vp(1000.0)), None);
        assert!(bar.update(&vp(1200.0)).is_some());
    }
}
