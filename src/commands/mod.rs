mod config_cmd;
mod content;
mod sync_cmd;

pub use config_cmd::ConfigCommand;
pub use content::{ExportCommand, ImportCommand, LoadCommand, ResetCommand, SaveCommand};
pub use sync_cmd::SyncCommand;

use sitekeep_core::SaveEvent;

/// Prints the outcome of a save attempt.
pub(crate) fn print_save_event(event: &SaveEvent) {
    match (event.success, event.saved_to_local, &event.error) {
        (true, _, _) => println!("✓ saved to remote store"),
        (false, Some(true), None) => {
            println!("✗ remote store unavailable, changes kept in local cache")
        }
        (false, Some(true), Some(e)) => {
            println!("✗ save failed ({}), changes kept in local cache", e)
        }
        (false, _, Some(e)) => println!("✗ save failed: {}", e),
        (false, _, None) => println!("✗ save failed"),
    }
}
