//! Interactive mode: prompt for routes until the user quits.

use dialoguer::{Input, Select};
use route_safety_client::SUMMARY_FAILED_MESSAGE;

use crate::display::{AnalysisReport, DashboardReport};
use crate::session::Session;

enum Action {
    Analyze,
    Dashboard,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[Self::Analyze, Self::Dashboard, Self::Quit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Analyze => "Analyze a route",
            Self::Dashboard => "Show city dashboard",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the prompt loop.
///
/// Analysis and summary failures are reported and the menu is shown
/// again; only terminal I/O errors end the loop early.
///
/// # Errors
///
/// Returns an error if the terminal prompts fail.
pub async fn run(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Analyze => {
                let from: String = Input::new()
                    .with_prompt("Starting location")
                    .allow_empty(true)
                    .interact_text()?;
                let to: String = Input::new()
                    .with_prompt("Destination")
                    .allow_empty(true)
                    .interact_text()?;

                match session.analyze(&from, &to).await {
                    Ok(view) => print!("\n{}\n", AnalysisReport(view)),
                    Err(e) => eprintln!("{}\n", e.user_message()),
                }
            }
            Action::Dashboard => match session.load_summary().await {
                Ok(view) => print!("\n{}\n", DashboardReport(view)),
                Err(_) => eprintln!("{SUMMARY_FAILED_MESSAGE}\n"),
            },
            Action::Quit => return Ok(()),
        }
    }
}
