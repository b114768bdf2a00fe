use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, instrument};

use super::{config::Config, output::bars::print_totals};
use crate::{
    budget::{aggregate, entities::Period, focus::focus},
    fs::operations::read_logs,
    log::Log,
};

#[derive(Debug, Default, Parser)]
pub struct TotalsCommand {
    #[arg(
        short,
        long,
        help = "Zoom into a single top level value. Its sub values become the bars"
    )]
    focus: Option<String>,
    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Labels to group by, outermost first. Example: -g cat,sub"
    )]
    group: Vec<String>,
    #[arg(short, long, help = "Aggregation period of the bars")]
    period: Option<Period>,
    #[arg(long, help = "Print totals as json instead of bars")]
    json: bool,
}

impl TotalsCommand {
    /// Command line flags take precedence over the config file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(focus) = &self.focus {
            config.view.focus_group = Some(focus.clone());
        }
        if !self.group.is_empty() {
            config.budget.label_grouping = Some(self.group.clone());
        }
        if let Some(period) = self.period {
            config.budget.aggregation_period = Some(period);
        }
        config
    }
}

/// Command to process `tots`. Prints how the weekly budget was spent for every period of the log.
#[instrument(skip(config))]
pub async fn process_totals_command(
    command: TotalsCommand,
    config: Config,
    log_paths: &[PathBuf],
) -> Result<()> {
    let log = read_logs(log_paths).await?;
    print!("{}", render_totals(&command, config, &log)?);
    Ok(())
}

fn render_totals(command: &TotalsCommand, config: Config, log: &Log) -> Result<String> {
    let config = command.apply(config);

    let mut totals = aggregate(&config.budget, log)?;
    totals.sort_by_key(|v| v.date);
    debug!("Aggregated {} totals", totals.len());

    if command.json {
        let totals = match config.view.focus_group() {
            Some(value) => focus(&totals, value),
            None => totals,
        };
        let mut json =
            serde_json::to_string_pretty(&totals).context("Failed to serialize totals")?;
        json.push('\n');
        return Ok(json);
    }

    let hours_per_day = config.budget.resolve().hours_per_day;
    Ok(print_totals(&config.view, &totals, hours_per_day))
}
