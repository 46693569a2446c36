use charts::{sentiment_color, ConfidenceBars, DonutChart, RadarChart, ACCENT};
use iced::{
    event, time,
    widget::{
        button,
        canvas::Canvas,
        column, progress_bar, row, scrollable, text, text_editor, text_input, Column, Container,
        Row,
    },
    window, Alignment, Color, Element, Event, Length, Subscription, Task, Theme,
};
use log::{info, warn};
use std::path::PathBuf;
use std::time::Duration;
use vibecore::analysis::{Sentiment, EXAMPLE_TEXT};
use vibecore::export::ExportFormat;
use vibecore::session::{SessionSnapshot, SessionStatus, View};

mod charts;
mod client;

const ERROR_COLOR: Color = Color::from_rgb(0.97, 0.44, 0.44);

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "VibeAnalytics".into()
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    Subscription::batch([
        time::every(Duration::from_secs(1)).map(|_| Message::Tick),
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        }),
    ])
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

struct Dashboard {
    editor: text_editor::Content,
    file_path: String,
    snapshot: Option<SessionSnapshot>,
    submitting: bool,
    notice: Option<String>,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    SessionFetched(Result<SessionSnapshot, String>),
    EditorAction(text_editor::Action),
    LoadExample,
    ClearInput,
    FilePathChanged(String),
    LoadFile,
    FileDropped(PathBuf),
    FileLoaded(Result<(String, String), String>),
    Analyze,
    Analyzed(Result<SessionSnapshot, String>),
    ShowView(View),
    ToggleFilter(Sentiment),
    ClearFilter,
    SessionUpdated(Result<SessionSnapshot, String>),
    Export(ExportFormat),
    Exported(Result<PathBuf, String>),
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        (
            Dashboard {
                editor: text_editor::Content::new(),
                file_path: String::new(),
                snapshot: None,
                submitting: false,
                notice: None,
                status: "Connecting to analyzer...".into(),
            },
            Task::perform(client::fetch_session(), Message::SessionFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(client::fetch_session(), Message::SessionFetched),
            Message::SessionFetched(Ok(snapshot)) => {
                state.status = format!("Analyzer: {}", snapshot.status.label());
                state.snapshot = Some(snapshot);
                Task::none()
            }
            Message::SessionFetched(Err(err)) => {
                log::debug!("session poll failed: {err}");
                state.status = format!("Analyzer unreachable: {err}");
                Task::none()
            }
            Message::EditorAction(action) => {
                state.editor.perform(action);
                Task::none()
            }
            Message::LoadExample => {
                state.editor = text_editor::Content::with_text(EXAMPLE_TEXT);
                state.notice = None;
                Task::none()
            }
            Message::ClearInput => {
                state.editor = text_editor::Content::new();
                state.notice = None;
                Task::none()
            }
            Message::FilePathChanged(value) => {
                state.file_path = value;
                Task::none()
            }
            Message::LoadFile => {
                let path = PathBuf::from(state.file_path.trim());
                Task::perform(client::load_text_file(path), Message::FileLoaded)
            }
            Message::FileDropped(path) => {
                state.file_path = path.display().to_string();
                Task::perform(client::load_text_file(path), Message::FileLoaded)
            }
            Message::FileLoaded(Ok((name, content))) => {
                state.editor = text_editor::Content::with_text(&content);
                state.notice = None;
                state.status = format!("Loaded {name}");
                Task::none()
            }
            Message::FileLoaded(Err(err)) => {
                state.notice = Some(err);
                Task::none()
            }
            Message::Analyze => {
                if !state.can_analyze() {
                    return Task::none();
                }
                state.submitting = true;
                state.notice = None;
                let text = state.editor.text();
                Task::perform(client::post_analyze(text), Message::Analyzed)
            }
            Message::Analyzed(result) => {
                state.submitting = false;
                state.apply_update(result);
                Task::none()
            }
            Message::ShowView(view) => {
                Task::perform(client::post_view(view), Message::SessionUpdated)
            }
            Message::ToggleFilter(sentiment) => {
                Task::perform(client::post_filter(Some(sentiment)), Message::SessionUpdated)
            }
            Message::ClearFilter => {
                Task::perform(client::post_filter(None), Message::SessionUpdated)
            }
            Message::SessionUpdated(result) => {
                state.apply_update(result);
                Task::none()
            }
            Message::Export(format) => {
                Task::perform(client::download_export(format), Message::Exported)
            }
            Message::Exported(Ok(path)) => {
                info!("saved export to {}", path.display());
                state.status = format!("Exported {}", path.display());
                Task::none()
            }
            Message::Exported(Err(err)) => {
                warn!("export failed: {err}");
                state.status = format!("Export failed: {err}");
                Task::none()
            }
        }
    }

    fn apply_update(&mut self, result: Result<SessionSnapshot, String>) {
        match result {
            Ok(snapshot) => {
                self.notice = None;
                self.snapshot = Some(snapshot);
            }
            Err(err) => {
                warn!("analyzer request failed: {err}");
                self.notice = Some(err);
            }
        }
    }

    fn loading(&self) -> bool {
        self.submitting || self.snapshot.as_ref().is_some_and(|snapshot| snapshot.loading)
    }

    fn can_analyze(&self) -> bool {
        !self.loading() && !self.editor.text().trim().is_empty()
    }

    fn view(state: &Self) -> Element<'_, Message> {
        if let Some(SessionStatus::ConfigurationRequired(message)) =
            state.snapshot.as_ref().map(|snapshot| &snapshot.status)
        {
            return configuration_screen(message);
        }

        let dashboard_visible = state
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.dashboard_visible);
        let has_results = state
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.total_results > 0);

        let header = row![
            text("VibeAnalytics").size(28),
            button("Analyzer")
                .on_press(Message::ShowView(View::Analyzer))
                .padding(8),
            button("Dashboard")
                .on_press_maybe(has_results.then_some(Message::ShowView(View::Dashboard)))
                .padding(8),
            text(&state.status).size(14),
        ]
        .spacing(16)
        .align_y(Alignment::Center);

        let body = match state.snapshot.as_ref() {
            Some(snapshot) if dashboard_visible => dashboard_view(snapshot),
            _ => state.analyzer_view(),
        };

        let layout = column![header, body].spacing(20).padding(20);

        Container::new(scrollable(layout))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn analyzer_view(&self) -> Element<'_, Message> {
        let analyze_label = if self.loading() { "Analyzing..." } else { "Analyze" };

        let controls = row![
            button("Load Example").on_press(Message::LoadExample).padding(8),
            button("Clear").on_press(Message::ClearInput).padding(8),
            button(analyze_label)
                .on_press_maybe(self.can_analyze().then_some(Message::Analyze))
                .padding(8),
        ]
        .spacing(10);

        let file_row = row![
            text_input("Path to a .txt or .md file (or drop one on the window)", &self.file_path)
                .on_input(Message::FilePathChanged)
                .on_submit(Message::LoadFile)
                .padding(6),
            button("Load").on_press(Message::LoadFile).padding(8),
        ]
        .spacing(10);

        let error_line = self
            .notice
            .as_deref()
            .or_else(|| {
                self.snapshot
                    .as_ref()
                    .and_then(|snapshot| match &snapshot.status {
                        SessionStatus::Error(message) => Some(message.as_str()),
                        _ => None,
                    })
            })
            .map(|message| text(message).size(14).color(ERROR_COLOR));

        let mut content = column![
            text("Analyze text").size(22),
            text_editor(&self.editor)
                .placeholder("Paste reviews, feedback or notes here...")
                .on_action(Message::EditorAction)
                .height(Length::Fixed(240.0)),
            controls,
            file_row,
        ]
        .spacing(12)
        .width(Length::Fill);

        if let Some(line) = error_line {
            content = content.push(line);
        }
        content.into()
    }
}

fn configuration_screen(message: &str) -> Element<'_, Message> {
    let panel = column![
        text("Configuration Required").size(28),
        text(message).size(16),
        text("Set the credential in the analyzer's environment and restart it.").size(14),
    ]
    .spacing(12)
    .padding(24)
    .max_width(560.0);

    Container::new(panel)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn dashboard_view(snapshot: &SessionSnapshot) -> Element<'_, Message> {
    let summary = &snapshot.summary;
    let selected = snapshot.filter.selected();

    let cards = row![
        stat_card("Positive", summary.positive_percentage, sentiment_color(Sentiment::Positive)),
        stat_card("Negative", summary.negative_percentage, sentiment_color(Sentiment::Negative)),
        stat_card("Neutral", summary.neutral_percentage, sentiment_color(Sentiment::Neutral)),
        stat_card("Avg Confidence", summary.avg_confidence, ACCENT),
    ]
    .spacing(16);

    let legend = summary.sentiment_distribution.iter().fold(
        Column::new().spacing(6),
        |col, slice| {
            let sentiment = slice.sentiment().unwrap_or(Sentiment::Neutral);
            let marker = if selected == Some(sentiment) { "● " } else { "" };
            col.push(
                button(
                    text(format!(
                        "{}{} {} ({:.1}%)",
                        marker,
                        slice.label,
                        slice.value,
                        slice.share(summary.total_analyzed)
                    ))
                    .color(sentiment_color(sentiment)),
                )
                .on_press(Message::ToggleFilter(sentiment))
                .padding(6),
            )
        },
    );

    let charts = row![
        column![
            text("Sentiment distribution").size(16),
            Canvas::new(DonutChart::new(&summary.sentiment_distribution, selected))
                .width(Length::Fixed(220.0))
                .height(Length::Fixed(220.0)),
            legend,
        ]
        .spacing(8),
        column![
            text("Confidence by sentence").size(16),
            Canvas::new(ConfidenceBars::new(&summary.recent_scores))
                .width(Length::Fill)
                .height(Length::Fixed(220.0)),
        ]
        .spacing(8)
        .width(Length::Fill),
        column![
            text("Sentiment radar").size(16),
            Canvas::new(RadarChart::new(summary))
                .width(Length::Fixed(220.0))
                .height(Length::Fixed(220.0)),
            text("Positive / Negative / Neutral / Avg Confidence").size(12),
        ]
        .spacing(8),
    ]
    .spacing(20)
    .align_y(Alignment::Start);

    let filter_label = match selected {
        Some(sentiment) => format!(
            "Showing {} of {} ({})",
            snapshot.visible_results.len(),
            snapshot.total_results,
            sentiment.display_label()
        ),
        None => format!("Showing all {} results", snapshot.total_results),
    };

    let table_header = row![
        text(filter_label).size(16),
        button("Clear Filter")
            .on_press_maybe(snapshot.filter.is_active().then_some(Message::ClearFilter))
            .padding(6),
        button("Export CSV")
            .on_press(Message::Export(ExportFormat::Csv))
            .padding(6),
        button("Export JSON")
            .on_press(Message::Export(ExportFormat::Json))
            .padding(6),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let table = snapshot.visible_results.iter().fold(
        Column::new().spacing(6),
        |col, result| {
            let percent = result.confidence_percent();
            col.push(
                Row::new()
                    .spacing(12)
                    .align_y(Alignment::Center)
                    .push(
                        Container::new(
                            text(result.sentiment.wire_label())
                                .size(12)
                                .color(sentiment_color(result.sentiment)),
                        )
                        .width(Length::Fixed(90.0)),
                    )
                    .push(Container::new(text(result.text.as_str()).size(14)).width(Length::Fill))
                    .push(
                        Container::new(progress_bar(0.0..=100.0, percent as f32))
                            .width(Length::Fixed(120.0)),
                    )
                    .push(text(format!("{:.0}%", percent)).size(12)),
            )
        },
    );

    column![
        cards,
        charts,
        table_header,
        table,
        text(format!(
            "Session: {} submitted / {} completed / {} failed / {} rejected",
            snapshot.metrics.submitted,
            snapshot.metrics.completed,
            snapshot.metrics.failed,
            snapshot.metrics.rejected
        ))
        .size(12),
    ]
    .spacing(20)
    .into()
}

fn stat_card<'a>(title: &'a str, value: f64, color: Color) -> Element<'a, Message> {
    Container::new(
        column![
            text(title).size(14),
            text(format!("{:.1}%", value)).size(28).color(color),
        ]
        .spacing(4),
    )
    .padding(12)
    .width(Length::FillPortion(1))
    .into()
}

