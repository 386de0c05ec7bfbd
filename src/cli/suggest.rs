//! Category suggestion command

use crate::app::App;
use crate::error::TallyResult;
use crate::services::{matches_vocabulary, Suggestion};

/// Print a suggested category for a description
pub fn handle_suggest_command(app: &App, description: &str) -> TallyResult<()> {
    match app.suggester()?.suggest(description) {
        Suggestion::Label(label) if matches_vocabulary(&label) => println!("{}", label),
        Suggestion::Label(label) => println!("{} (not in the usual list)", label),
        Suggestion::Unavailable => {
            println!("No suggestion available.");
            println!(
                "Classification service not reachable at {}",
                app.settings().classifier.base_url
            );
        }
        Suggestion::Blank | Suggestion::Failed => println!("No suggestion available."),
    }

    Ok(())
}
