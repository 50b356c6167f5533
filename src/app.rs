use log::{debug, info};
use std::io::Write;

use crate::bus::Bus;
use crate::dispatcher::{self, Command, Outcome};
use crate::error::Result;
use crate::locator::{self, Selector};

/// Lists the discovered services instead of talking to a player
pub const SERVICES_KEYWORD: &str = "services";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// One fully parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub selector: Selector,
    pub command: String,
    pub args: Vec<String>,
    pub verbose: bool,
    pub format: OutputFormat,
}

impl Default for Invocation {
    fn default() -> Self {
        Invocation {
            selector: Selector::default(),
            command: "status".to_string(),
            args: Vec::new(),
            verbose: false,
            format: OutputFormat::Human,
        }
    }
}

/// Discovers services, resolves the selector and runs the command, writing
/// everything meant for the user to `out`.
pub fn run<W: Write>(invocation: &Invocation, bus: &dyn Bus, out: &mut W) -> Result<()> {
    if invocation.command == SERVICES_KEYWORD {
        return list_services(bus, invocation.format, out);
    }

    let command = Command::parse(&invocation.command, &invocation.args)?;
    let services = locator::list_services(bus)?;
    debug!("Resolving selector {}", invocation.selector);
    let service = locator::resolve(&invocation.selector, &services)?;
    debug!("Running {} on {}", command.keyword(), service);

    if invocation.verbose {
        let capabilities = dispatcher::probe_capabilities(bus, service);
        let mut lines = vec![
            format!("selected service {}", service),
            format!("  playlists support:\t{}", capabilities.playlists),
            format!("  tracklist support:\t{}", capabilities.tracklist),
        ];
        lines.extend(command.progress_message());

        // In JSON mode stdout carries the document only
        for line in lines {
            match invocation.format {
                OutputFormat::Human => writeln!(out, "{}", line)?,
                OutputFormat::Json => info!("{}", line.trim_start()),
            }
        }
    }

    match dispatcher::execute(bus, service, &command)? {
        Outcome::Status(report) => match invocation.format {
            OutputFormat::Human => report.write_human(out, invocation.verbose)?,
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?,
        },
        Outcome::Done => {}
    }
    Ok(())
}

fn list_services<W: Write>(bus: &dyn Bus, format: OutputFormat, out: &mut W) -> Result<()> {
    let services = locator::list_services(bus)?;
    match format {
        OutputFormat::Human => {
            for (i, service) in services.iter().enumerate() {
                writeln!(out, "  {}: {}", i, service)?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&services)?)?,
    }
    Ok(())
}
