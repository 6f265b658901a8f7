//! # Lepra Screen GUI Application
//!
//! Graphical front end for the leprosy screening form.
//! Built with Iced framework for cross-platform support (Windows, macOS, Linux, WASM).
//!
//! All form state lives in one [`FormController`]; this file only maps UI
//! events onto it and runs the prediction request and report export as
//! background tasks.

mod download;
mod reveal;
mod ui;
mod welcome;

use std::time::Duration;

use iced::time::{self, Instant};
use iced::widget::{column, container, stack};
use iced::{Element, Length, Subscription, Task, Theme};

use lepra_core::config::{self, AppConfig};
use lepra_core::{
    FormController, NavOutcome, Notice, PredictionClient, PredictionResult, RenderedResult,
    ScreenResult, SubmissionOutcome,
};

use reveal::Reveal;
use welcome::Welcome;

pub fn main() -> iced::Result {
    init_logging();

    iced::application(App::boot, App::update, App::view)
        .title(App::title)
        .theme(App::theme)
        .subscription(App::subscription)
        .window_size((980.0, 820.0))
        .run()
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    console_error_panic_hook::set_once();
}

#[derive(Debug, Clone)]
pub enum Message {
    // Form
    FieldChanged(String, String),
    PreviousSection,
    NextSection,
    Submit,
    PredictionFinished(ScreenResult<PredictionResult>),

    // Report
    DownloadReport,
    ReportFinished(Result<Option<String>, String>),

    // Chrome
    DismissNotice,
    ToggleDarkMode,
    Tick(Instant),
}

impl Message {
    /// Messages that act on the form; ignored while a notice is open
    fn is_form_action(&self) -> bool {
        matches!(
            self,
            Message::FieldChanged(..)
                | Message::PreviousSection
                | Message::NextSection
                | Message::Submit
                | Message::DownloadReport
        )
    }
}

pub struct App {
    controller: FormController,
    /// `None` when the configured endpoint is unusable; submissions then fail
    client: Option<PredictionClient>,
    config: AppConfig,
    rendered: Option<RenderedResult>,
    notice: Option<Notice>,
    welcome: Option<Welcome>,
    reveal: Reveal,
    requests_in_flight: usize,
    status: String,
}

impl App {
    fn boot() -> (Self, Task<Message>) {
        let config = config::load_config().unwrap_or_else(|e| {
            tracing::warn!(%e, "could not load config, using defaults");
            AppConfig::default()
        });

        (App::new(config), Task::none())
    }

    fn new(config: AppConfig) -> Self {
        let client = match PredictionClient::new(&config.endpoint) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!(%e, endpoint = %config.endpoint, "invalid prediction endpoint");
                None
            }
        };

        App {
            controller: FormController::leprosy_screening(),
            welcome: Some(Welcome::new(Instant::now(), config.welcome_seconds)),
            reveal: Reveal::default(),
            client,
            config,
            rendered: None,
            notice: None,
            requests_in_flight: 0,
            status: "Ready".to_string(),
        }
    }

    fn title(&self) -> String {
        "Lepra Screen".to_string()
    }

    fn theme(&self) -> Theme {
        if self.config.dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        if self.welcome.is_some() || self.reveal.is_animating() {
            time::every(Duration::from_millis(33)).map(Message::Tick)
        } else {
            Subscription::none()
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        if self.notice.is_some() && message.is_form_action() {
            return Task::none();
        }

        match message {
            Message::FieldChanged(name, value) => {
                self.controller.set_value(name, value);
            }
            Message::PreviousSection => {
                if self.controller.retreat() == NavOutcome::Moved {
                    self.status = self.step_status();
                }
            }
            Message::NextSection => match self.controller.advance() {
                NavOutcome::Moved => self.status = self.step_status(),
                NavOutcome::Unchanged => {}
                NavOutcome::Blocked(notice) => self.notice = Some(notice),
            },
            Message::Submit => return self.submit(),
            Message::PredictionFinished(response) => {
                self.requests_in_flight = self.requests_in_flight.saturating_sub(1);
                match self.controller.complete_submission(response) {
                    SubmissionOutcome::Rendered(rendered) => {
                        self.rendered = Some(rendered);
                        self.reveal
                            .replay_if_new(self.controller.render_generation(), Instant::now());
                        self.status = "Prediction received".to_string();
                    }
                    SubmissionOutcome::Failed { notice, error } => {
                        self.status = format!("Prediction failed ({})", error.error_code());
                        self.notice = Some(notice);
                    }
                    SubmissionOutcome::Blocked(notice) => self.notice = Some(notice),
                }
            }
            Message::DownloadReport => {
                let Some(report) = self.controller.build_report(chrono::Local::now()) else {
                    return Task::none();
                };
                self.status = format!("Generating {}...", report.filename());
                return Task::perform(
                    download::export_report(report, self.config.report_dir.clone()),
                    Message::ReportFinished,
                );
            }
            Message::ReportFinished(outcome) => {
                self.status = match outcome {
                    Ok(Some(location)) => format!("Report saved: {}", location),
                    Ok(None) => "Export cancelled".to_string(),
                    Err(message) => format!("Export failed: {}", message),
                };
            }
            Message::DismissNotice => {
                self.notice = None;
            }
            Message::ToggleDarkMode => {
                self.config.dark_mode = !self.config.dark_mode;
                self.persist_config();
            }
            Message::Tick(now) => {
                if let Some(welcome) = self.welcome.as_mut() {
                    if !welcome.tick(now) {
                        self.welcome = None;
                    }
                }
                self.reveal.tick(now);
            }
        }
        Task::none()
    }

    /// Validate the active section and fire the request in the background.
    ///
    /// Further submits are not blocked while one is in flight.
    fn submit(&mut self) -> Task<Message> {
        let payload = match self.controller.begin_submission() {
            Ok(payload) => payload,
            Err(notice) => {
                self.notice = Some(notice);
                return Task::none();
            }
        };

        let Some(client) = self.client.clone() else {
            self.notice = Some(Notice::PredictionFailed);
            return Task::none();
        };

        self.requests_in_flight += 1;
        self.status = "Submitting...".to_string();
        Task::perform(
            async move { client.predict(&payload).await },
            Message::PredictionFinished,
        )
    }

    fn step_status(&self) -> String {
        format!(
            "{} ({} of {})",
            self.controller.current_section().title,
            self.controller.current_index() + 1,
            self.controller.section_count()
        )
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist_config(&mut self) {
        if let Err(e) = config::save_config(&self.config) {
            tracing::warn!(%e, "could not save config");
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn persist_config(&mut self) {}

    fn view(&self) -> Element<'_, Message> {
        let endpoint = self
            .client
            .as_ref()
            .map(PredictionClient::endpoint)
            .unwrap_or("no endpoint configured");

        let content = column![
            ui::header::view_header(self.config.dark_mode),
            ui::header::view_progress(
                self.controller.progress_percent(),
                self.controller.current_index(),
                self.controller.section_count(),
            ),
            ui::section_panel::view_section_panel(&self.controller),
            ui::results_panel::view_results_panel(
                self.rendered.as_ref(),
                self.controller.export_available(),
                self.requests_in_flight > 0,
                self.reveal.opacity(),
            ),
            ui::status_bar::view_status_bar(endpoint, &self.status),
        ]
        .spacing(10)
        .padding(12);

        let mut layers = stack![container(content).width(Length::Fill).height(Length::Fill)];

        if let Some(notice) = self.notice {
            layers = layers
                .push(ui::modal::view_backdrop())
                .push(ui::modal::view_notice(notice));
        }

        if let Some(welcome) = &self.welcome {
            layers = layers.push(ui::welcome_overlay::view_welcome(welcome.opacity()));
        }

        layers.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lepra_core::form::FieldKind;
    use lepra_core::DisabilityGrade;

    fn app() -> App {
        App::new(AppConfig::default())
    }

    fn prediction() -> PredictionResult {
        PredictionResult {
            classification: "Paucibacillary".to_string(),
            treatment: "PB-MDT".to_string(),
            reaction_type: "None".to_string(),
            reaction_treatment: "None".to_string(),
            eye_grade: DisabilityGrade::Grade0,
            hand_grade: DisabilityGrade::GradeI,
            foot_grade: DisabilityGrade::Grade0,
            server_max_grade: None,
        }
    }

    fn fill_current_section(app: &mut App) {
        let fields = app.controller.current_section().fields.clone();
        for field in fields {
            let value = match field.kind {
                FieldKind::Text => "Asha",
                FieldKind::Number => "40",
                FieldKind::Select { ref options } => options[options.len() - 1].as_str(),
                FieldKind::Date => "",
            }
            .to_string();
            let _ = app.update(Message::FieldChanged(field.name.clone(), value));
        }
    }

    #[test]
    fn test_incomplete_next_opens_notice() {
        let mut app = app();
        let _ = app.update(Message::NextSection);
        assert_eq!(app.notice, Some(Notice::IncompleteStep));
        assert_eq!(app.controller.current_index(), 0);
    }

    #[test]
    fn test_open_notice_blocks_form_actions() {
        let mut app = app();
        fill_current_section(&mut app);
        app.notice = Some(Notice::PredictionFailed);

        let _ = app.update(Message::NextSection);
        let _ = app.update(Message::FieldChanged("name".to_string(), "Changed".to_string()));
        assert_eq!(app.controller.current_index(), 0);
        assert_eq!(app.controller.value("name"), "Asha");

        // OK dismisses, then the form responds again
        let _ = app.update(Message::DismissNotice);
        let _ = app.update(Message::NextSection);
        assert_eq!(app.notice, None);
        assert_eq!(app.controller.current_index(), 1);
    }

    #[test]
    fn test_each_result_replays_reveal() {
        let mut app = app();
        assert!(!app.reveal.is_animating());

        let _ = app.update(Message::PredictionFinished(Ok(prediction())));
        assert!(app.rendered.is_some());
        assert!(app.reveal.is_animating());
        assert_eq!(app.reveal.opacity(), 0.0);

        let _ = app.update(Message::Tick(Instant::now() + Duration::from_secs(1)));
        assert!(!app.reveal.is_animating());

        // Same content again is still a new render
        let _ = app.update(Message::PredictionFinished(Ok(prediction())));
        assert!(app.reveal.is_animating());
        assert_eq!(app.controller.render_generation(), 2);
    }

    #[test]
    fn test_failed_prediction_keeps_result_and_shows_notice() {
        let mut app = app();
        let _ = app.update(Message::PredictionFinished(Ok(prediction())));
        let shown = app.rendered.clone();

        let _ = app.update(Message::PredictionFinished(Err(lepra_core::ScreenError::BadStatus { status: 500 })));
        assert_eq!(app.notice, Some(Notice::PredictionFailed));
        assert_eq!(app.rendered, shown);
        assert!(app.controller.export_available());
    }
}
