use std::path::PathBuf;

use log::info;

use crate::commands::{Command, CommandClass, CommandHandle};
use crate::environment::Environment;
use crate::error::Error;
use crate::fsutil::{conflicts, copy_tree};

/// Scaffolds a new project by copying the template into the working directory.
#[derive(Debug, Clone, Default)]
pub struct Init {
    template: Option<PathBuf>,
}

impl Init {
    #[must_use]
    pub fn handle(template: Option<PathBuf>) -> CommandHandle {
        CommandHandle::new(Init { template })
    }
}

impl CommandClass for Init {
    fn name(&self) -> &str {
        "init"
    }

    fn instantiate<'e>(&self, env: &'e Environment<'e>) -> Box<dyn Command + 'e> {
        Box::new(InitRun {
            env,
            template: self.template.clone(),
        })
    }
}

struct InitRun<'e> {
    env: &'e Environment<'e>,
    template: Option<PathBuf>,
}

impl Command for InitRun<'_> {
    fn run_internal(&mut self) -> Result<(), Error> {
        let template = match &self.template {
            Some(dir) if dir.is_dir() => dir,
            Some(dir) => return Err(Error::TemplateNotFound(dir.clone())),
            None => return Err(Error::TemplateNotFound(PathBuf::from("$GOOGKIT_HOME/template"))),
        };
        let dst = self.env.cwd();

        let conflicted = conflicts(template, dst)?;
        if !conflicted.is_empty() {
            return Err(Error::Conflict(conflicted));
        }

        copy_tree(template, dst, &[])?;
        info!("Initialized project in {}", dst.display());
        Ok(())
    }
}
