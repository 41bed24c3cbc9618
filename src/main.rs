mod config;
mod diary_entry;
mod diary_state;
mod emotion;
mod error;
mod haptics;
mod logging;
mod mindfulness;
mod photo;
mod speech;
mod text_input;
mod time_capsule;
mod ui;
mod week;

use chrono::Local;
use color_eyre::eyre::Result;
use config::Config;
use diary_state::DiaryState;
use haptics::Haptics;
use mindfulness::{MessageTrigger, Mindfulness};
use speech::Speech;
use tracing::{info, warn};
use ui::{Action, UI};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, config_error) = Config::load();
    let _log_guard = logging::init(&config.log_dir)?;
    if let Some(e) = config_error {
        warn!(error = %e, "ignoring config file, using defaults");
    }
    info!(week_start = ?config.week_start, haptics = config.haptics, "starting");

    let mut diary_state = DiaryState::new(Local::now().date_naive(), config.week_start)?;
    let haptics = if config.haptics {
        Haptics::terminal_bell()
    } else {
        Haptics::disabled()
    };
    let mut mindfulness = Mindfulness::new(
        MessageTrigger::new(),
        haptics,
        Speech::new(config.speech_command.clone()),
        config.speak_messages,
    );
    let mut ui = UI::new()?;

    loop {
        ui.display(&diary_state, &mindfulness, &config.date_format, Local::now())?;

        if let Some(action) = ui.handle_input(&diary_state)? {
            match action {
                Action::SwitchTab => ui.switch_tab(),
                Action::PreviousDay => diary_state.select_previous_day(),
                Action::NextDay => diary_state.select_next_day(),
                Action::PreviousWeek => diary_state.select_previous_week(),
                Action::NextWeek => diary_state.select_next_week(),
                Action::Today => diary_state.select_today(Local::now().date_naive()),
                Action::SelectDay(date) => diary_state.select_day(date),
                Action::AddEntry => {
                    let day = diary_state.selected_day();
                    if let Some(draft) = ui.get_new_entry(day, &config.date_format)? {
                        draft.submit(|entry| diary_state.add_entry(entry));
                    }
                }
                Action::ViewEntries => {
                    let entries = diary_state.entries_on(diary_state.selected_day());
                    ui.view_entries(entries, &config.date_format)?;
                }
                Action::DeleteEntry => {
                    let day = diary_state.selected_day();
                    let entries = diary_state.entries_on(day);
                    if let Some(index) = ui.select_entry_to_delete(entries, &config.date_format)? {
                        if let Err(e) = diary_state.delete_entry(day, index) {
                            warn!(error = %e, "delete failed");
                        }
                    }
                }
                Action::Tap => {
                    mindfulness.tap();
                }
                Action::Speak => mindfulness.speak_message(),
                Action::NewCapsule => {
                    if let Some(draft) = ui.get_new_capsule()? {
                        mindfulness.seal_capsule(draft, Local::now());
                    }
                }
                Action::Quit => break,
            }
        }
    }

    info!(entries = diary_state.entry_count(), "exiting");
    Ok(())
}
