use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::{App, ChatMessage, MessageRole};

pub const SYSTEM_PREFIX: &str = "사쥬> ";
pub const USER_PREFIX: &str = "나> ";

const BOTTLE_TEXTS: [&str; 7] = [
    "",
    "        _____",
    "       |_____|",
    "        )   (",
    "      .'     '.",
    "     |  향수  |",
    "      '._____.'",
];

const BOTTLE_COLUMN_WIDTH: usize = 22;
const RIGHT_COLUMN_START: usize = 2;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let width = area.width as usize;

    let separator_style = Style::default().fg(Color::DarkGray);
    let user_prefix_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let user_text_style = Style::default().fg(Color::Green);

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.extend(build_banner_lines(area.width));

    for message in &app.messages {
        lines.extend(format_message(message, width));
    }

    if app.is_waiting_for_input() {
        let cursor = if app.cursor_visible { "█" } else { " " };
        let (before, after) = app.input_split_at_cursor();
        lines.push(Line::from(vec![
            Span::styled(USER_PREFIX, user_prefix_style),
            Span::styled(before.to_string(), user_text_style),
            Span::styled(cursor, user_text_style),
            Span::styled(after.to_string(), user_text_style),
        ]));
    } else if app.is_narrating() {
        lines.push(Line::from(Span::styled(
            app.thinking_indicator(),
            Style::default().fg(Color::Magenta),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("─".repeat(width), separator_style)));
    lines.push(Line::from(Span::styled(app.help_text(), separator_style)));

    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(area.height);
    let scroll = max_scroll.saturating_sub(app.scroll_offset);

    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);

    app.scroll_offset = app.scroll_offset.min(max_scroll);
}

fn build_banner_lines(width: u16) -> Vec<Line<'static>> {
    let bottle_style = Style::default().fg(Color::Magenta);
    let separator_style = Style::default().fg(Color::DarkGray);

    let right_column_width = (width as usize).saturating_sub(BOTTLE_COLUMN_WIDTH);
    let right_column = build_right_column(right_column_width);

    let mut lines: Vec<Line> = Vec::new();

    for (i, bottle_text) in BOTTLE_TEXTS.iter().enumerate() {
        let padding = BOTTLE_COLUMN_WIDTH.saturating_sub(bottle_text.width());
        let padded = format!("{}{}", bottle_text, " ".repeat(padding));
        let mut spans = vec![Span::styled(padded, bottle_style)];

        let right_offset = i.wrapping_sub(RIGHT_COLUMN_START);
        if let Some((text, color, bold)) = right_column.get(right_offset) {
            let mut style = Style::default().fg(*color);
            if *bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(text.clone(), style));
        }

        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled("─".repeat(width as usize), separator_style)));

    lines
}

fn format_message(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let system_prefix_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let user_prefix_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let user_text_style = Style::default().fg(Color::Green);

    let (prefix, prefix_style, text_style) = match message.role {
        MessageRole::System => (SYSTEM_PREFIX, system_prefix_style, Style::default()),
        MessageRole::User => (USER_PREFIX, user_prefix_style, user_text_style),
    };
    let indent = " ".repeat(prefix.width());
    let text_width = width.saturating_sub(prefix.width());

    let mut lines: Vec<Line<'static>> = Vec::new();
    let visual_lines = message
        .content
        .lines()
        .flat_map(|line| wrap_text_by_char_width(line, text_width));

    for (i, text_line) in visual_lines.enumerate() {
        let lead = if i == 0 {
            Span::styled(prefix, prefix_style)
        } else {
            Span::raw(indent.clone())
        };
        lines.push(Line::from(vec![lead, Span::styled(text_line, text_style)]));
    }
    lines.push(Line::from(""));

    lines
}

fn build_right_column(max_width: usize) -> Vec<(String, Color, bool)> {
    let slogan_lines = wrap_words("향수 사쥬: 사주로 찾는 나의 운명 향수", max_width);
    let description_lines = wrap_words(
        "태어난 날의 오행을 읽고, 가장 부족한 기운을 채워줄 향수를 골라 드려요.",
        max_width,
    );

    let mut lines: Vec<(String, Color, bool)> = Vec::new();
    for line in &slogan_lines {
        lines.push((line.clone(), Color::Cyan, true));
    }
    if !slogan_lines.is_empty() && !description_lines.is_empty() {
        lines.push((String::new(), Color::Reset, false));
    }
    for line in &description_lines {
        lines.push((line.clone(), Color::DarkGray, false));
    }
    lines
}

/// 단어 단위 줄바꿈. 폭은 터미널 칸 수로 잰다.
fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line.push_str(word);
        } else if current_line.width() + 1 + word.width() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            lines.push(current_line);
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// 글자 단위 줄바꿈. 한글처럼 두 칸을 차지하는 글자도 폭을 넘지 않게 자른다.
/// 빈 문자열도 한 줄로 취급한다.
pub fn wrap_text_by_char_width(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for c in text.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += char_width;
    }

    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        assert_eq!(wrap_text_by_char_width("hello", 10), vec!["hello"]);
    }

    #[test]
    fn wrap_counts_hangul_as_two_columns() {
        let lines = wrap_text_by_char_width("갑을병정무", 4);
        assert_eq!(lines, vec!["갑을", "병정", "무"]);
    }

    #[test]
    fn wrap_does_not_split_wide_char_across_lines() {
        let lines = wrap_text_by_char_width("a갑을", 4);
        assert_eq!(lines, vec!["a갑", "을"]);
        for line in &lines {
            assert!(line.width() <= 4);
        }
    }

    #[test]
    fn wrap_empty_text_is_single_empty_line() {
        assert_eq!(wrap_text_by_char_width("", 10), vec![""]);
    }

    #[test]
    fn zero_width_returns_text_unchanged() {
        assert_eq!(wrap_text_by_char_width("abc", 0), vec!["abc"]);
    }

    #[test]
    fn wrap_words_respects_display_width() {
        let lines = wrap_words("향수 사쥬 마스터", 9);
        assert_eq!(lines, vec!["향수 사쥬", "마스터"]);
    }

    #[test]
    fn wrap_words_zero_width_is_empty() {
        assert!(wrap_words("anything", 0).is_empty());
    }

    #[test]
    fn system_message_continuation_lines_are_indented() {
        let message = ChatMessage {
            role: MessageRole::System,
            content: "첫 줄\n둘째 줄".to_string(),
        };

        let lines = format_message(&message, 80);

        // 두 줄 + 빈 줄
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans[0].content, SYSTEM_PREFIX);
        assert_eq!(lines[1].spans[0].content, " ".repeat(SYSTEM_PREFIX.width()));
        assert_eq!(lines[1].spans[1].content, "둘째 줄");
    }
}
