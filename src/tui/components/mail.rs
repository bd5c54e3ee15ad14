//! # Mail Screen
//!
//! Compose form on the left, sent items and inbox on the right. Tab moves
//! focus through the three fields and both lists. Enter on the body sends;
//! the owner clears the form once the reducer accepts the message.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, List, ListItem, Paragraph};

use crate::core::action::Action;
use crate::services::MailService;
use crate::services::mail::MailMessage;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::InputBox;
use crate::tui::event::TuiEvent;
use crate::tui::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailFocus {
    To,
    Subject,
    Body,
    Sent,
    Inbox,
}

impl MailFocus {
    const ORDER: [MailFocus; 5] = [
        MailFocus::To,
        MailFocus::Subject,
        MailFocus::Body,
        MailFocus::Sent,
        MailFocus::Inbox,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

pub struct MailPanel {
    pub to: InputBox,
    pub subject: InputBox,
    pub body: InputBox,
    pub focus: MailFocus,
}

impl Default for MailPanel {
    fn default() -> Self {
        let mut panel = Self {
            to: InputBox::new(" To "),
            subject: InputBox::new(" Subject "),
            body: InputBox::new(" Body "),
            focus: MailFocus::To,
        };
        panel.sync_focus();
        panel
    }
}

impl MailPanel {
    fn sync_focus(&mut self) {
        self.to.focused = self.focus == MailFocus::To;
        self.subject.focused = self.focus == MailFocus::Subject;
        self.body.focused = self.focus == MailFocus::Body;
    }

    fn focus(&mut self, focus: MailFocus) {
        self.focus = focus;
        self.sync_focus();
    }

    /// Empty the form after a message was handed to the transport.
    pub fn clear(&mut self) {
        self.to.clear();
        self.subject.clear();
        self.body.clear();
        self.focus(MailFocus::To);
    }

    fn send(&self, body: String) -> Action {
        Action::SendMail {
            to: self.to.buffer.trim().to_string(),
            subject: self.subject.buffer.trim().to_string(),
            body,
        }
    }
}

impl EventHandler for MailPanel {
    type Event = Action;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Action> {
        match event {
            TuiEvent::FocusNext => {
                self.focus(self.focus.next());
                return None;
            }
            TuiEvent::FocusPrev => {
                self.focus(self.focus.prev());
                return None;
            }
            _ => {}
        }

        match self.focus {
            MailFocus::To | MailFocus::Subject => {
                if matches!(event, TuiEvent::Submit) {
                    self.focus(self.focus.next());
                    return None;
                }
                let field = if self.focus == MailFocus::To {
                    &mut self.to
                } else {
                    &mut self.subject
                };
                field.handle_event(event);
                None
            }
            MailFocus::Body => {
                if matches!(event, TuiEvent::Submit) {
                    // Keep the text until the send is accepted
                    let body = self.body.buffer.clone();
                    return Some(self.send(body));
                }
                self.body.handle_event(event);
                None
            }
            MailFocus::Sent => match event {
                TuiEvent::InputChar('c') | TuiEvent::Delete => Some(Action::ClearSent),
                _ => None,
            },
            MailFocus::Inbox => match event {
                TuiEvent::InputChar('c') | TuiEvent::Delete => Some(Action::ClearInbox),
                _ => None,
            },
        }
    }
}

pub struct MailView<'a> {
    panel: &'a mut MailPanel,
    mail: &'a MailService,
    sending: bool,
    palette: Palette,
}

impl<'a> MailView<'a> {
    pub fn new(panel: &'a mut MailPanel, mail: &'a MailService, sending: bool, palette: Palette) -> Self {
        Self {
            panel,
            mail,
            sending,
            palette,
        }
    }

    fn message_list(&self, title: &str, messages: &[MailMessage], empty: &str, focused: bool) -> List<'static> {
        let items: Vec<ListItem> = if messages.is_empty() {
            vec![ListItem::new(Line::styled(empty.to_string(), self.palette.hint()))]
        } else {
            messages
                .iter()
                .rev()
                .map(|m| {
                    ListItem::new(vec![
                        Line::from(format!("{}  {} → {}", m.timestamp, m.from, m.to)),
                        Line::styled(format!("  {}", m.subject), self.palette.highlight()),
                    ])
                })
                .collect()
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.border(focused))
            .title(format!(" {title} ({}) ", messages.len()));
        if focused {
            block = block.title_bottom(Line::from(" c Clear ").centered());
        }
        List::new(items).block(block).style(self.palette.base())
    }
}

impl Component for MailView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [compose_area, lists_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
        let [to_area, subject_area, body_area, hint_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .areas(compose_area);

        self.panel.to.render_with(frame, to_area, &self.palette);
        self.panel.subject.render_with(frame, subject_area, &self.palette);
        self.panel.body.render_with(frame, body_area, &self.palette);

        let hint = if self.sending {
            "Sending..."
        } else {
            "Tab Next field  Enter on Body Send"
        };
        frame.render_widget(
            Paragraph::new(Line::styled(hint, self.palette.hint())).style(self.palette.base()),
            hint_area,
        );

        let [sent_area, inbox_area] =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lists_area);
        let sent = self.message_list(
            "Sent",
            self.mail.get_sent_items(),
            "No sent items.",
            self.panel.focus == MailFocus::Sent,
        );
        frame.render_widget(sent, sent_area);
        let inbox = self.message_list(
            "Inbox",
            self.mail.get_inbox(),
            "Inbox is empty.",
            self.panel.focus == MailFocus::Inbox,
        );
        frame.render_widget(inbox, inbox_area);
    }
}
