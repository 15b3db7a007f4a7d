use scroll_fx_protocol::{ClassToken, DomCommand, ElementId};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent {
    /// The hamburger button.
    ButtonClick,
    CloseClick,
    OverlayClick,
    /// Any link inside the mobile menu.
    LinkClick,
}

/// Mobile menu: open only via the menu button, closed by everything else.
///
/// Opening locks page scroll with `overflow: hidden` on the body; closing
/// puts back whatever value the body had before.
#[derive(Debug, Clone, Default)]
pub struct MobileMenu {
    state: MenuState,
    menu: Option<ElementId>,
    overlay: Option<ElementId>,
    saved_overflow: Option<String>,
}

impl MobileMenu {
    pub fn new(menu: Option<ElementId>, overlay: Option<ElementId>) -> Self {
        Self {
            menu,
            overlay,
            ..Self::default()
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Handle a click. `body_overflow` is the body's current inline
    /// overflow value, captured when the menu opens.
    pub fn handle(&mut self, event: MenuEvent, body_overflow: &str) -> Vec<DomCommand> {
        match (self.state, event) {
            (MenuState::Closed, MenuEvent::ButtonClick) => self.open(body_overflow),
            (
                MenuState::Open,
                MenuEvent::CloseClick | MenuEvent::OverlayClick | MenuEvent::LinkClick,
            ) => self.close(),
            _ => Vec::new(),
        }
    }

    fn open(&mut self, body_overflow: &str) -> Vec<DomCommand> {
        debug!("mobile menu opened");
        self.state = MenuState::Open;
        self.saved_overflow = Some(body_overflow.to_string());
        let mut commands: Vec<DomCommand> = [self.menu, self.overlay]
            .into_iter()
            .flatten()
            .map(|target| DomCommand::AddClass {
                target,
                class: ClassToken::Active,
            })
            .collect();
        commands.push(DomCommand::SetBodyOverflow {
            value: "hidden".into(),
        });
        commands
    }

    fn close(&mut self) -> Vec<DomCommand> {
        debug!("mobile menu closed");
        self.state = MenuState::Closed;
        let mut commands: Vec<DomCommand> = [self.menu, self.overlay]
            .into_iter()
            .flatten()
            .map(|target| DomCommand::RemoveClass {
                target,
                class: ClassToken::Active,
            })
            .collect();
        commands.push(DomCommand::SetBodyOverflow {
            value: self.saved_overflow.take().unwrap_or_default(),
        });
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: ElementId = ElementId(1);
    const OVERLAY: ElementId = ElementId(2);

    fn overflow(cmds: &[DomCommand]) -> Option<&str> {
        cmds.iter().find_map(|c| match c {
            DomCommand::SetBodyOverflow { value } => Some(value.as_str()),
            _ => None,
        })
    }

    #[test]
    fn starts_closed() {
        assert_eq!(MobileMenu::new(Some(MENU), Some(OVERLAY)).state(), MenuState::Closed);
    }

    #[test]
    fn open_then_close_restores_overflow() {
        let mut menu = MobileMenu::new(Some(MENU), Some(OVERLAY));
        let cmds = menu.handle(MenuEvent::ButtonClick, "");
        assert_eq!(menu.state(), MenuState::Open);
        assert_eq!(overflow(&cmds), Some("hidden"));
        assert!(cmds.contains(&DomCommand::AddClass {
            target: MENU,
            class: ClassToken::Active
        }));
        assert!(cmds.contains(&DomCommand::AddClass {
            target: OVERLAY,
            class: ClassToken::Active
        }));

        let cmds = menu.handle(MenuEvent::OverlayClick, "hidden");
        assert_eq!(menu.state(), MenuState::Closed);
        assert_eq!(overflow(&cmds), Some(""));
        assert!(cmds.contains(&DomCommand::RemoveClass {
            target: MENU,
            class: ClassToken::Active
        }));
    }

    #[test]
    fn every_close_path_closes() {
        for event in [
            MenuEvent::CloseClick,
            MenuEvent::OverlayClick,
            MenuEvent::LinkClick,
        ] {
            let mut menu = MobileMenu::new(Some(MENU), Some(OVERLAY));
            menu.handle(MenuEvent::ButtonClick, "auto");
            let cmds = menu.handle(event, "hidden");
            assert_eq!(menu.state(), MenuState::Closed, "{event:?}");
            assert_eq!(overflow(&cmds), Some("auto"));
        }
    }

    #[test]
    fn only_the_button_opens() {
        let mut menu = MobileMenu::new(Some(MENU), Some(OVERLAY));
        for event in [
            MenuEvent::CloseClick,
            MenuEvent::OverlayClick,
            MenuEvent::LinkClick,
        ] {
            assert!(menu.handle(event, "").is_empty());
            assert_eq!(menu.state(), MenuState::Closed);
        }
        menu.handle(MenuEvent::ButtonClick, "");
        assert!(menu.handle(MenuEvent::ButtonClick, "hidden").is_empty());
        assert_eq!(menu.state(), MenuState::Open);
    }

    #[test]
    fn missing_menu_still_locks_scroll() {
        let mut menu = MobileMenu::new(None, Some(OVERLAY));
        let cmds = menu.handle(MenuEvent::ButtonClick, "");
        assert_eq!(cmds.len(), 2);
        assert_eq!(overflow(&cmds), Some("hidden"));
    }
}
