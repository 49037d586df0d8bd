/// Loop transition requested by a visibility change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCommand {
    Start,
    Stop,
    None,
}

/// A scene runs iff it intersects the viewport and the page is visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    in_view: bool,
    page_visible: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self::new()
    }
}

impl Visibility {
    /// Out of view until the host reports otherwise; page assumed visible
    pub fn new() -> Self {
        Self { in_view: false, page_visible: true }
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    pub fn page_visible(&self) -> bool {
        self.page_visible
    }

    pub fn running(&self) -> bool {
        self.in_view && self.page_visible
    }

    pub fn set_in_view(&mut self, in_view: bool) -> LoopCommand {
        let was = self.running();
        self.in_view = in_view;
        self.transition(was)
    }

    pub fn set_page_visible(&mut self, visible: bool) -> LoopCommand {
        let was = self.running();
        self.page_visible = visible;
        self.transition(was)
    }

    fn transition(&self, was: bool) -> LoopCommand {
        match (was, self.running()) {
            (false, true) => LoopCommand::Start,
            (true, false) => LoopCommand::Stop,
            _ => LoopCommand::None,
        }
    }
}
