use std::collections::BTreeSet;

use crate::commands::{Command, CommandClass, CommandHandle};
use crate::environment::Environment;
use crate::error::Error;

/// A command whose body runs an ordered list of other commands.
///
/// Members are constructed against the same environment as the sequence
/// itself and run strictly in order; the first failure stops the sequence
/// and is returned unchanged. A sequence never loads configuration on its
/// own: it reports the union requirement of its members so the dispatcher
/// can load it up front.
#[derive(Debug, Clone)]
pub struct Sequence {
    name: String,
    members: Vec<CommandHandle>,
}

impl Sequence {
    pub fn new(name: impl Into<String>, members: Vec<CommandHandle>) -> Self {
        Sequence {
            name: name.into(),
            members,
        }
    }

    /// Members, in run order.
    #[must_use]
    pub fn internal_commands(&self) -> &[CommandHandle] {
        &self.members
    }
}

impl CommandClass for Sequence {
    fn name(&self) -> &str {
        &self.name
    }

    fn needs_config(&self) -> bool {
        self.internal_commands().iter().any(CommandHandle::needs_config)
    }

    fn supported_options(&self) -> BTreeSet<&'static str> {
        let mut options = BTreeSet::from(super::BASE_OPTIONS);
        for member in self.internal_commands() {
            options.extend(member.supported_options());
        }
        options
    }

    fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Box<dyn Command + 'e> {
        Box::new(SequenceRun {
            env,
            members: self.internal_commands().to_vec(),
        })
    }
}

struct SequenceRun<'e> {
    env: &'e Environment<'e>,
    members: Vec<CommandHandle>,
}

impl Command for SequenceRun<'_> {
    fn run_internal(&mut self) -> Result<(), Error> {
        for member in &self.members {
            member.instantiate(self.env).run()?;
        }
        Ok(())
    }
}
