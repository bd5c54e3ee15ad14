use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::sysinfo::SystemInfo;
use crate::tui::component::Component;
use crate::tui::theme::Palette;

pub struct SystemInfoView<'a> {
    info: &'a SystemInfo,
    palette: Palette,
}

impl<'a> SystemInfoView<'a> {
    pub fn new(info: &'a SystemInfo, palette: Palette) -> Self {
        Self { info, palette }
    }
}

impl Component for SystemInfoView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self.info.lines().into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(self.palette.border(true))
                    .title(" System Info "),
            )
            .style(self.palette.base());
        frame.render_widget(paragraph, area);
    }
}
