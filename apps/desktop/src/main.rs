use iced::widget::{
    Column, Row, button, column, container, pick_list, progress_bar, row, scrollable, text,
    text_input,
};
use iced::{Color, Element, Length, Task};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use commentpulse_core::{
    AnalysisBackend, AnalysisClient, AnalysisError, AnalysisResult, ClientConfig, CloudScale,
    DEFAULT_LOG_FILTER, OutputFormat, Sentiment, Session, SubmissionTicket, cloud_font_size,
};

const ERROR_COLOR: Color = Color {
    r: 0.8,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};
const SUCCESS_COLOR: Color = Color {
    r: 0.2,
    g: 0.6,
    b: 0.3,
    a: 1.0,
};
const WORDS_PER_ROW: usize = 5;

fn main() -> iced::Result {
    dotenvy::dotenv().ok();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    iced::application(App::new, App::update, App::view)
        .title("Commentpulse")
        .run()
}

struct App {
    client: Result<AnalysisClient, String>,
    session: Session,
    pending: Option<SubmissionTicket>,
    notice: Option<String>,
}

#[derive(Debug, Clone)]
enum Message {
    InputChanged(String),
    FormatSelected(OutputFormat),
    SentimentSelected(Sentiment),
    Submit,
    Settled(Result<AnalysisResult, String>),
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let client = ClientConfig::from_env()
            .and_then(AnalysisClient::new)
            .map_err(|e| {
                warn!(error = %e, "backend is not configured");
                e.to_string()
            });
        let app = Self {
            client,
            session: Session::new(),
            pending: None,
            notice: None,
        };
        (app, Task::none())
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::InputChanged(input) => self.session.input = input,
            Message::FormatSelected(format) => self.session.format = format,
            Message::SentimentSelected(sentiment) => self.session.select_sentiment(sentiment),
            Message::Submit => return self.submit(),
            Message::Settled(outcome) => {
                if let Some(ticket) = self.pending.take() {
                    match outcome {
                        Ok(result) => self.session.complete(ticket, Ok(result)),
                        Err(message) => self.session.fail(ticket, message),
                    }
                }
            }
        }
        Task::none()
    }

    fn submit(&mut self) -> Task<Message> {
        let Ok(client) = &self.client else {
            return Task::none();
        };

        let input = self.session.input.clone();
        match self.session.begin(&input) {
            Ok(ticket) => {
                self.notice = None;
                let client = client.clone();
                let request = ticket.request().clone();
                self.pending = Some(ticket);
                Task::perform(
                    async move {
                        client
                            .run_etl(&request)
                            .await
                            .map_err(|e| e.user_message())
                    },
                    Message::Settled,
                )
            }
            Err(AnalysisError::AlreadySubmitting) => Task::none(),
            Err(e) => {
                self.notice = Some(e.to_string());
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let loading = self.session.is_loading();
        let can_submit = !loading && self.client.is_ok();

        let mut input = text_input("Enter YouTube video ID or link...", &self.session.input)
            .on_input(Message::InputChanged);
        if can_submit {
            input = input.on_submit(Message::Submit);
        }

        let controls = row![
            pick_list(OutputFormat::ALL, Some(self.session.format), Message::FormatSelected),
            button(text(if loading {
                "Analyzing..."
            } else {
                "Run ETL Pipeline"
            }))
            .on_press_maybe(can_submit.then_some(Message::Submit)),
        ]
        .spacing(10);

        let mut content = column![text("YouTube Sentiment Analysis").size(24), input, controls]
            .padding(20)
            .spacing(10);

        if let Err(e) = &self.client {
            content = content.push(text(e.clone()).color(ERROR_COLOR));
        }
        if let Some(notice) = &self.notice {
            content = content.push(text(notice.clone()).color(ERROR_COLOR));
        }
        if loading {
            content = content.push(text("Running ETL pipeline..."));
        }
        if let Some(message) = self.session.result_message() {
            let color = if self.session.last_result().is_some() {
                SUCCESS_COLOR
            } else {
                ERROR_COLOR
            };
            content = content.push(text(message).color(color));
        }
        if self.session.analytics().is_some() {
            content = content.push(self.analytics_view());
        }

        scrollable(content).into()
    }

    fn analytics_view(&self) -> Element<'_, Message> {
        let mut chart = Column::new().spacing(6);
        let segments = self.session.chart();
        if segments.iter().all(|s| s.count == 0) {
            chart = chart.push(text("No sentiment data available."));
        } else {
            for segment in segments {
                chart = chart.push(
                    row![
                        text(segment.sentiment.label()).width(Length::Fixed(90.0)),
                        progress_bar(0.0..=1.0, segment.fraction as f32),
                        text(format!("{} ({:.1}%)", segment.count, segment.fraction * 100.0))
                            .width(Length::Fixed(110.0)),
                    ]
                    .spacing(10),
                );
            }
        }

        let sentiment = self.session.selected_sentiment();
        let words = self.session.cloud_words();
        let mut cloud = Column::new().spacing(4);
        if words.is_empty() {
            cloud = cloud.push(text(format!("No {} keywords found.", sentiment.as_str())));
        } else {
            let scale = CloudScale::default();
            for chunk in words.chunks(WORDS_PER_ROW) {
                let mut line = Row::new().spacing(12);
                for word in chunk {
                    let size = cloud_font_size(word.value, scale) as f32;
                    line = line.push(text(word.text.clone()).size(size));
                }
                cloud = cloud.push(line);
            }
        }

        let content = column![
            text("Sentiment Breakdown").size(20),
            chart,
            row![
                text("Keywords").size(20),
                pick_list(Sentiment::ALL, Some(sentiment), Message::SentimentSelected),
            ]
            .spacing(10),
            cloud,
            text("Content Suggestions").size(20),
            bullet_list(self.session.suggestions(), "No suggestions available."),
            text("Executive Summary").size(20),
            bullet_list(&self.session.summary_bullets(), "No summary available."),
        ]
        .spacing(12);

        container(content).padding(10).into()
    }
}

fn bullet_list<'a>(items: &[String], placeholder: &'a str) -> Element<'a, Message> {
    if items.is_empty() {
        return text(placeholder).into();
    }
    items
        .iter()
        .fold(Column::new().spacing(4), |list, item| {
            list.push(text(format!("• {}", item)))
        })
        .into()
}
