use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::claude_code_client::ClaudeCodeClient;
use crate::config::Config;
use crate::narrative::{ClaudeNarrator, Narrative, NarrativeGenerator, NarrativeSource, narrate};
use crate::perfume::{
    Catalog, ScentTag, ScoredPerfume, ScoringError, ScoringOptions, score_perfumes,
    shopping_search_url,
};
use crate::recommendation_log::RecommendationLog;
use crate::saju::{BirthMoment, BirthTime, Element, ElementProfile, SolarTermCalendar, derive_elements};
use crate::session::SessionContext;
use super::form::{
    self, describe_tags, parse_birth_date, parse_birth_time, parse_tag_selection, parse_yes_no,
};

const CURSOR_BLINK_INTERVAL: Duration = Duration::from_millis(500);

const NAME_PROMPT: &str = "이름(닉네임)을 입력해 주세요.";
const DATE_PROMPT: &str = "생년월일을 양력 YYYY-MM-DD 형식으로 입력해 주세요. (예: 1995-01-01)";
const TIME_PROMPT: &str = "태어난 시각을 HH:MM 형식으로 입력해 주세요. 모르면 Enter를 누르세요.";
const FAMOUS_PROMPT: &str = "유명 브랜드 향수만 볼까요? (y/N)";
const NO_RESULTS_MESSAGE: &str = "조건에 맞는 향수를 찾지 못했습니다. 취향 필터를 줄여보세요!";

pub enum MessageRole {
    System,
    User,
}

pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Name,
    BirthDate,
    BirthTime,
    PreferredTags,
    DislikedTags,
    FamousOnly,
    Narrating,
    Done,
}

/// 한 번의 추천 요청 동안 모은 입력.
#[derive(Default)]
struct FormState {
    user_name: String,
    birth_date: Option<NaiveDate>,
    birth_time: Option<BirthTime>,
    preferred: Vec<ScentTag>,
    disliked: Vec<ScentTag>,
}

pub struct App {
    pub messages: Vec<ChatMessage>,
    input_mode: InputMode,
    pub input_buffer: String,
    cursor_position: usize,
    pub terminal_width: u16,
    pub terminal_height: u16,
    pub should_quit: bool,
    pub cursor_visible: bool,
    cursor_blink_at: Instant,
    pub scroll_offset: u16,
    catalog: Catalog,
    scoring: ScoringOptions,
    narrator: Option<Arc<dyn NarrativeGenerator>>,
    recommendation_log: Option<RecommendationLog>,
    form: FormState,
    last_result: Option<(ElementProfile, Vec<ScoredPerfume>)>,
    narrative_receiver: Option<mpsc::Receiver<Narrative>>,
    thinking_started_at: Instant,
}

impl App {
    pub fn new(config: &Config, catalog: Catalog) -> Self {
        let mut notices = Vec::new();

        let narrator: Option<Arc<dyn NarrativeGenerator>> = match config.api_key() {
            Some(api_key) => match ClaudeCodeClient::new(
                api_key.to_string(),
                config.model().to_string(),
                config.narrative_timeout(),
            ) {
                Ok(client) => Some(Arc::new(ClaudeNarrator::new(client))),
                Err(err) => {
                    crate::app_log!("[풀이 비활성] {}", err);
                    notices.push(format!("{} 사주 풀이는 기본 문안으로 제공됩니다.", err));
                    None
                }
            },
            None => {
                notices.push(
                    "ANTHROPIC_API_KEY가 설정되지 않아 사주 풀이는 기본 문안으로 제공됩니다."
                        .to_string(),
                );
                None
            }
        };

        let recommendation_log = match RecommendationLog::new(config.log_path()) {
            Ok(log) => Some(log),
            Err(err) => {
                notices.push(format!("추천 기록을 남길 수 없습니다: {}", err));
                None
            }
        };

        let mut app = Self::with_parts(
            catalog,
            config.scoring().clone(),
            narrator,
            recommendation_log,
        );
        for notice in notices {
            app.messages.insert(
                0,
                ChatMessage {
                    role: MessageRole::System,
                    content: notice,
                },
            );
        }
        app
    }

    pub fn with_parts(
        catalog: Catalog,
        scoring: ScoringOptions,
        narrator: Option<Arc<dyn NarrativeGenerator>>,
        recommendation_log: Option<RecommendationLog>,
    ) -> Self {
        let mut app = Self {
            messages: Vec::new(),
            input_mode: InputMode::Name,
            input_buffer: String::new(),
            cursor_position: 0,
            terminal_width: 80,
            terminal_height: 24,
            should_quit: false,
            cursor_visible: true,
            cursor_blink_at: Instant::now(),
            scroll_offset: 0,
            catalog,
            scoring,
            narrator,
            recommendation_log,
            form: FormState::default(),
            last_result: None,
            narrative_receiver: None,
            thinking_started_at: Instant::now(),
        };
        app.add_system_message(&format!(
            "카탈로그에서 향수 {}종을 불러왔습니다.\n{}",
            app.catalog.len(),
            NAME_PROMPT
        ));
        app
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        self.reset_cursor_blink();

        match key_event.code {
            KeyCode::PageUp => {
                self.scroll_up();
                return;
            }
            KeyCode::PageDown => {
                self.scroll_down();
                return;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        match self.input_mode {
            InputMode::Narrating => {}
            InputMode::Done => {
                if key_event.code == KeyCode::Enter {
                    self.restart();
                }
            }
            _ => self.handle_line_input(key_event),
        }
    }

    pub fn handle_paste(&mut self, text: String) {
        self.reset_cursor_blink();

        if self.is_waiting_for_input() {
            let cleaned = text.replace("\r\n", " ").replace(['\r', '\n'], " ");
            self.insert_text_at_cursor(&cleaned);
        }
    }

    pub fn tick(&mut self) {
        self.tick_cursor_blink();
        self.tick_narrative();
    }

    fn tick_cursor_blink(&mut self) {
        if self.cursor_blink_at.elapsed() >= CURSOR_BLINK_INTERVAL {
            self.cursor_visible = !self.cursor_visible;
            self.cursor_blink_at = Instant::now();
        }
    }

    fn tick_narrative(&mut self) {
        let receiver = match self.narrative_receiver.take() {
            Some(r) => r,
            None => return,
        };

        match receiver.try_recv() {
            Ok(narrative) => self.finish_with_narrative(narrative),
            Err(mpsc::TryRecvError::Empty) => {
                self.narrative_receiver = Some(receiver);
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                // 풀이 스레드가 응답 없이 끝났으면 고정 문안으로 마무리한다.
                let narrative = match &self.last_result {
                    Some((profile, top)) => narrate(None, profile, top),
                    None => Narrative {
                        text: "사주 풀이를 만들지 못했습니다.".to_string(),
                        source: NarrativeSource::Fallback,
                    },
                };
                self.finish_with_narrative(narrative);
            }
        }
    }

    fn reset_cursor_blink(&mut self) {
        self.cursor_visible = true;
        self.cursor_blink_at = Instant::now();
    }

    pub fn scroll_up(&mut self) {
        let page_size = self.terminal_height.saturating_sub(2);
        self.scroll_offset = self.scroll_offset.saturating_add(page_size);
    }

    pub fn scroll_down(&mut self) {
        let page_size = self.terminal_height.saturating_sub(2);
        self.scroll_offset = self.scroll_offset.saturating_sub(page_size);
    }

    pub fn is_waiting_for_input(&self) -> bool {
        !matches!(self.input_mode, InputMode::Narrating | InputMode::Done)
    }

    pub fn is_narrating(&self) -> bool {
        matches!(self.input_mode, InputMode::Narrating)
    }

    pub fn thinking_indicator(&self) -> &'static str {
        let dots = (self.thinking_started_at.elapsed().as_millis() / 500) % 4;
        match dots {
            0 => "사주 풀이 중",
            1 => "사주 풀이 중.",
            2 => "사주 풀이 중..",
            _ => "사주 풀이 중...",
        }
    }

    pub fn help_text(&self) -> &'static str {
        match self.input_mode {
            InputMode::Narrating => "[PgUp/PgDn] Scroll  [Esc] Quit",
            InputMode::Done => "[Enter] Restart  [PgUp/PgDn] Scroll  [Esc] Quit",
            _ => "[Enter] Submit  [PgUp/PgDn] Scroll  [Esc] Quit",
        }
    }

    /// 입력 줄을 커서 앞뒤로 나눈다.
    pub fn input_split_at_cursor(&self) -> (&str, &str) {
        self.input_buffer
            .split_at(char_to_byte_index(&self.input_buffer, self.cursor_position))
    }

    fn handle_line_input(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Enter => {
                let line = self.input_buffer.trim().to_string();
                self.clear_input();
                self.submit_line(&line);
            }
            KeyCode::Char(c) => self.insert_char_at_cursor(c),
            KeyCode::Backspace => self.delete_char_before_cursor(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.input_buffer.chars().count(),
            _ => {}
        }
    }

    fn submit_line(&mut self, line: &str) {
        let shown = if line.is_empty() { "(입력 없음)" } else { line };
        self.add_user_message(shown);

        match self.input_mode {
            InputMode::Name => self.submit_name(line),
            InputMode::BirthDate => self.submit_birth_date(line),
            InputMode::BirthTime => self.submit_birth_time(line),
            InputMode::PreferredTags => self.submit_preferred_tags(line),
            InputMode::DislikedTags => self.submit_disliked_tags(line),
            InputMode::FamousOnly => self.submit_famous_only(line),
            InputMode::Narrating | InputMode::Done => {}
        }
    }

    fn submit_name(&mut self, line: &str) {
        if line.is_empty() {
            self.add_system_message(NAME_PROMPT);
            return;
        }
        self.form.user_name = line.to_string();
        self.ask_birth_date();
    }

    fn ask_birth_date(&mut self) {
        self.add_system_message(DATE_PROMPT);
        self.input_mode = InputMode::BirthDate;
    }

    fn submit_birth_date(&mut self, line: &str) {
        match parse_birth_date(line) {
            Ok(date) => {
                self.form.birth_date = Some(date);
                self.add_system_message(TIME_PROMPT);
                self.input_mode = InputMode::BirthTime;
            }
            Err(err) => {
                self.add_system_message(&err.to_string());
                self.ask_birth_date();
            }
        }
    }

    fn submit_birth_time(&mut self, line: &str) {
        match parse_birth_time(line) {
            Ok(time) => {
                self.form.birth_time = time;
                if time.is_none() {
                    self.add_system_message("시각을 모르는 경우 년/월/일 여섯 글자로만 풀이합니다.");
                }
                self.ask_preferred_tags();
            }
            Err(err) => {
                self.add_system_message(&format!("{}\n{}", err, TIME_PROMPT));
            }
        }
    }

    fn ask_preferred_tags(&mut self) {
        self.add_system_message(&format!(
            "좋아하는 향의 번호를 쉼표로 구분해 입력해 주세요. (없으면 Enter)\n{}",
            form::tag_menu()
        ));
        self.input_mode = InputMode::PreferredTags;
    }

    fn submit_preferred_tags(&mut self, line: &str) {
        match parse_tag_selection(line) {
            Ok(tags) => {
                self.form.preferred = tags;
                self.add_system_message(&format!(
                    "싫어하는 향의 번호를 쉼표로 구분해 입력해 주세요. (없으면 Enter)\n{}",
                    form::tag_menu()
                ));
                self.input_mode = InputMode::DislikedTags;
            }
            Err(err) => self.add_system_message(&err.to_string()),
        }
    }

    fn submit_disliked_tags(&mut self, line: &str) {
        match parse_tag_selection(line) {
            Ok(tags) => {
                self.form.disliked = tags;
                self.add_system_message(FAMOUS_PROMPT);
                self.input_mode = InputMode::FamousOnly;
            }
            Err(err) => self.add_system_message(&err.to_string()),
        }
    }

    fn submit_famous_only(&mut self, line: &str) {
        match parse_yes_no(line) {
            Ok(famous_only) => self.run_recommendation(famous_only),
            Err(err) => self.add_system_message(&format!("{}\n{}", err, FAMOUS_PROMPT)),
        }
    }

    fn run_recommendation(&mut self, famous_only: bool) {
        let Some(date) = self.form.birth_date else {
            self.ask_birth_date();
            return;
        };

        let derived = BirthMoment::from_date(date, self.form.birth_time).and_then(|moment| {
            let profile = derive_elements(&SolarTermCalendar, &moment)?;
            Ok((moment, profile))
        });
        let (moment, profile) = match derived {
            Ok(derived) => derived,
            Err(err) => {
                self.add_system_message(&err.to_string());
                self.ask_birth_date();
                return;
            }
        };

        let mut options = self.scoring.clone();
        options.famous_brands_only = famous_only;

        crate::app_log!(
            "[추천 요청] 사주: {}, 선호: {}, 비선호: {}, 유명 브랜드만: {}",
            profile.label.to_display_string(),
            describe_tags(&self.form.preferred),
            describe_tags(&self.form.disliked),
            famous_only,
        );

        let top = match score_perfumes(
            &self.catalog,
            profile.strongest,
            profile.weakest,
            &self.form.preferred,
            &self.form.disliked,
            &options,
        ) {
            Ok(top) => top,
            Err(ScoringError::NoResults) => {
                self.add_system_message(NO_RESULTS_MESSAGE);
                self.ask_preferred_tags();
                return;
            }
            Err(err @ ScoringError::EmptyCatalog) => {
                self.add_system_message(&format!("{}\nEsc를 눌러 종료하세요.", err));
                self.input_mode = InputMode::Done;
                return;
            }
        };

        let session = SessionContext::new(&self.form.user_name, &moment);
        let logged = self
            .recommendation_log
            .as_ref()
            .map(|log| log.append_results(&session, &profile, &top));
        if let Some(Err(err)) = logged {
            crate::app_log!("[추천 로그 실패] {}", err);
            self.add_system_message(&format!("추천 기록 저장에 실패했습니다: {}", err));
        }

        self.add_system_message(&format_results(&self.form.user_name, &profile, &top));
        self.start_narrative(profile, top);
    }

    fn start_narrative(&mut self, profile: ElementProfile, top: Vec<ScoredPerfume>) {
        let (sender, receiver) = mpsc::channel();
        let narrator = self.narrator.clone();
        let thread_profile = profile.clone();
        let thread_top = top.clone();

        std::thread::spawn(move || {
            let narrative = narrate(narrator.as_deref(), &thread_profile, &thread_top);
            let _ = sender.send(narrative);
        });

        self.last_result = Some((profile, top));
        self.narrative_receiver = Some(receiver);
        self.thinking_started_at = Instant::now();
        self.input_mode = InputMode::Narrating;
    }

    fn finish_with_narrative(&mut self, narrative: Narrative) {
        let header = match narrative.source {
            NarrativeSource::Model => "🔮 사주 풀이",
            NarrativeSource::Fallback => "🔮 사주 풀이 (기본 문안)",
        };
        self.add_system_message(&format!("{}\n\n{}", header, narrative.text));
        self.add_system_message("Enter를 누르면 처음부터 다시 시작합니다.");
        self.input_mode = InputMode::Done;
    }

    fn restart(&mut self) {
        self.form = FormState::default();
        self.last_result = None;
        self.narrative_receiver = None;
        self.clear_input();
        self.add_system_message(NAME_PROMPT);
        self.input_mode = InputMode::Name;
    }

    fn insert_char_at_cursor(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input_buffer, self.cursor_position);
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    fn insert_text_at_cursor(&mut self, text: &str) {
        let byte_pos = char_to_byte_index(&self.input_buffer, self.cursor_position);
        self.input_buffer.insert_str(byte_pos, text);
        self.cursor_position += text.chars().count();
    }

    fn delete_char_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        self.cursor_position -= 1;
        let byte_pos = char_to_byte_index(&self.input_buffer, self.cursor_position);
        self.input_buffer.remove(byte_pos);
    }

    fn clear_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input_buffer.chars().count() {
            self.cursor_position += 1;
        }
    }

    fn add_system_message(&mut self, content: &str) {
        self.messages.push(ChatMessage {
            role: MessageRole::System,
            content: content.to_string(),
        });
        self.scroll_offset = 0;
    }

    fn add_user_message(&mut self, content: &str) {
        self.messages.push(ChatMessage {
            role: MessageRole::User,
            content: content.to_string(),
        });
        self.scroll_offset = 0;
    }
}

fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn format_element_counts(profile: &ElementProfile) -> String {
    Element::ALL
        .iter()
        .map(|e| format!("{} {}", e.korean_name(), profile.counts.get(*e)))
        .collect::<Vec<_>>()
        .join(" · ")
}

pub fn format_results(user_name: &str, profile: &ElementProfile, top: &[ScoredPerfume]) -> String {
    let mut text = format!(
        "{}님의 사주: {}\n오행 분포: {}\n가장 강한 기운: {} / 가장 부족한 기운: {}\n\n🏆 {}님을 위한 운세 발복 향수 Top {}",
        user_name,
        profile.label.to_display_string(),
        format_element_counts(profile),
        profile.strongest.korean_name(),
        profile.weakest.korean_name(),
        user_name,
        top.len(),
    );

    for (i, scored) in top.iter().enumerate() {
        let record = &scored.record;
        text.push_str(&format!("\n\n{}위. {} - {}", i + 1, record.brand, record.name));
        if !record.notes.trim().is_empty() {
            text.push_str(&format!("\n  노트: {}", record.notes.trim()));
        }
        text.push_str(&format!("\n  점수: {:.3}", scored.score));
        text.push_str(&format!(
            "\n  구매: {}",
            shopping_search_url(&record.brand, &record.name)
        ));
    }

    text
}
