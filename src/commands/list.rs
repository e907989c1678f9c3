use crate::commands::{Command, CommandClass, CommandHandle};
use crate::environment::Environment;
use crate::error::Error;

/// Internal `_commands`: prints the public top-level command names, one per
/// line, for shell completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListCommands;

impl ListCommands {
    #[must_use]
    pub fn handle() -> CommandHandle {
        CommandHandle::new(ListCommands)
    }
}

impl CommandClass for ListCommands {
    fn name(&self) -> &str {
        "_commands"
    }

    fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Box<dyn Command + 'e> {
        Box::new(ListRun { env })
    }
}

struct ListRun<'e> {
    env: &'e Environment<'e>,
}

impl Command for ListRun<'_> {
    fn run_internal(&mut self) -> Result<(), Error> {
        for name in self.env.tree.available_children::<&str>(&[]) {
            println!("{name}");
        }
        Ok(())
    }
}
