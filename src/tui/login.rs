// Login form
//
// Identifier + secret, Tab to move between fields, Enter to submit. The
// form owns its local error; the controller's flash message renders above
// it and wins when both exist. Failure text never leaks backend payloads:
// a rejected attempt and an unparsable response read identically.

use crate::api::ApiError;
use crate::grouping::StatusClass;
use crate::tui::theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Shown for `InvalidCredentials` and `MalformedResponse` alike.
pub const BAD_CREDENTIALS: &str = "Your login details are incorrect.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Identifier,
    Secret,
}

/// What the form asks the controller to do with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
    Quit,
}

#[derive(Debug)]
pub struct LoginForm {
    pub identifier: String,
    pub secret: String,
    pub focus: Field,
    pub error: Option<String>,
    pub in_flight: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            identifier: String::new(),
            secret: String::new(),
            focus: Field::Identifier,
            error: None,
            in_flight: false,
        }
    }

    /// Map an authentication failure to form text. Credential rejections and
    /// unparsable envelopes present identically; anything else passes its
    /// message through verbatim.
    pub fn set_failure(&mut self, err: &ApiError) {
        self.error = Some(match err {
            ApiError::InvalidCredentials | ApiError::MalformedResponse => {
                BAD_CREDENTIALS.to_string()
            }
            other => other.to_string(),
        });
    }

    /// Handle a key press, returning the action for the controller.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Enter => {
                if !self.in_flight {
                    return LoginAction::Submit;
                }
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Field::Identifier => Field::Secret,
                    Field::Secret => Field::Identifier,
                };
            }
            KeyCode::Backspace => {
                self.active_field_mut().pop();
            }
            KeyCode::Char(c) => {
                self.active_field_mut().push(c);
            }
            _ => {}
        }
        LoginAction::None
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Identifier => &mut self.identifier,
            Field::Secret => &mut self.secret,
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the login screen: a centered card with the flash (or local error)
/// above the fields.
pub fn render(f: &mut Frame, area: Rect, form: &LoginForm, flash: Option<&str>) {
    let card_width = 54.min(area.width);
    let card_height = 12.min(area.height);
    let card = Rect {
        x: area.x + (area.width.saturating_sub(card_width)) / 2,
        y: area.y + (area.height.saturating_sub(card_height)) / 2,
        width: card_width,
        height: card_height,
    };

    f.render_widget(Clear, card);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Fluxboard Project Admin ");
    let inner = block.inner(card);
    f.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // flash / error
            Constraint::Length(3), // identifier
            Constraint::Length(3), // secret
            Constraint::Length(1), // hint
        ])
        .split(inner);

    // The flash wins; the local error is suppressed while one is shown
    let notice: Option<(String, Style)> = if let Some(flash) = flash {
        Some((
            flash.to_string(),
            Style::default().fg(theme::status_color(StatusClass::Warning)),
        ))
    } else {
        form.error.as_ref().map(|e| {
            (
                e.clone(),
                Style::default().fg(theme::status_color(StatusClass::Failure)),
            )
        })
    };
    if let Some((text, style)) = notice {
        f.render_widget(
            Paragraph::new(text)
                .style(style)
                .alignment(Alignment::Center),
            rows[0],
        );
    }

    render_field(
        f,
        rows[1],
        "Identifier",
        &form.identifier,
        form.focus == Field::Identifier,
    );
    let masked: String = "*".repeat(form.secret.chars().count());
    render_field(f, rows[2], "Secret", &masked, form.focus == Field::Secret);

    let hint = if form.in_flight {
        "Signing in..."
    } else {
        "Enter: sign in · Tab: switch field · Esc: quit"
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hint,
            Style::default().add_modifier(Modifier::DIM),
        )))
        .alignment(Alignment::Center),
        rows[3],
    );
}

fn render_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border_style = if focused {
        Style::default().fg(theme::ACCENT)
    } else {
        Style::default()
    };
    let cursor = if focused { "▏" } else { "" };
    let field = Paragraph::new(format!("{}{}", value, cursor)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", label)),
    );
    f.render_widget(field, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_fills_the_focused_field() {
        let mut form = LoginForm::new();
        form.handle_key(key(KeyCode::Char('a')));
        form.handle_key(key(KeyCode::Char('b')));
        assert_eq!(form.identifier, "ab");

        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char('s')));
        assert_eq!(form.secret, "s");

        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.secret, "");
    }

    #[test]
    fn test_enter_submits_unless_in_flight() {
        let mut form = LoginForm::new();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), LoginAction::Submit);

        form.in_flight = true;
        assert_eq!(form.handle_key(key(KeyCode::Enter)), LoginAction::None);
    }

    #[test]
    fn test_failure_mapping_scrubs_backend_shapes() {
        let mut form = LoginForm::new();

        form.set_failure(&ApiError::InvalidCredentials);
        assert_eq!(form.error.as_deref(), Some(BAD_CREDENTIALS));

        // An unparsable envelope must read identically to a rejection
        form.set_failure(&ApiError::MalformedResponse);
        assert_eq!(form.error.as_deref(), Some(BAD_CREDENTIALS));

        // Everything else passes through verbatim
        form.set_failure(&ApiError::FetchFailed("service unavailable".to_string()));
        assert_eq!(form.error.as_deref(), Some("service unavailable"));
    }
}
