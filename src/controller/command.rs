use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SnapshotController;
use crate::error::RingError;
use crate::host::{Host, Prompt, Selection};

/// User-facing layout commands, as bound to keys or menu entries.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RingCommand {
    NewConfiguration,
    DuplicateConfiguration,
    NextConfiguration,
    PrevConfiguration,
    JumpToConfiguration,
    DeleteConfiguration,
    RenameConfiguration,
}

impl<H: Host> SnapshotController<H> {
    /// Runs `command`, asking `prompt` for any name it needs first.
    pub fn handle_command(
        &mut self,
        command: RingCommand,
        prompt: &mut impl Prompt,
    ) -> Result<(), RingError> {
        debug!(?command, "handling command");
        match command {
            RingCommand::NewConfiguration => {
                let taken = self.taken_names(true);
                let name = prompt.prompt_for_name("Name for new layout: ", &taken);
                self.create(Some(&name))
            }
            RingCommand::DuplicateConfiguration => {
                let taken = self.taken_names(true);
                let name = prompt.prompt_for_name("Name for duplicated layout: ", &taken);
                self.duplicate(Some(&name))
            }
            RingCommand::NextConfiguration => self.next(),
            RingCommand::PrevConfiguration => self.previous(),
            RingCommand::JumpToConfiguration => {
                let choices = self.saved_names();
                match prompt.prompt_for_existing_name("Jump to layout: ", &choices, true) {
                    Selection::Current => Ok(()),
                    Selection::Name(name) => self.jump_to(&name),
                }
            }
            RingCommand::DeleteConfiguration => {
                let choices = self.saved_names();
                match prompt.prompt_for_existing_name("Delete layout: ", &choices, true) {
                    Selection::Current => self.delete_current(),
                    Selection::Name(name) => self.delete(&name),
                }
            }
            RingCommand::RenameConfiguration => {
                let taken = self.taken_names(false);
                let name = prompt.prompt_for_name("Rename current layout to: ", &taken);
                self.rename(&name)
            }
        }
    }
}
