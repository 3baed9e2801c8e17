//! `cgrid options` - fetch one dropdown list.
//!
//! Sends the same list lookup the grid sends when a dropdown opens, scoped by
//! `--driving` the way a row's driving value would scope it.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use super::{CliConfig, CommandContext};
use crate::grid::{DependentOptionResolver, OptionQuery};
use crate::models::{DgField, DropdownOption, split_selection};

#[derive(Args)]
pub struct OptionsCommand {
    /// Field whose options to fetch: product, uncode or dgclass
    field: DgField,

    /// Driving value: a product code for uncode, a UN code for dgclass
    #[arg(long)]
    driving: Option<String>,

    /// Free-text search term
    #[arg(long)]
    search: Option<String>,

    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Page size (default from config)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    limit: Option<u32>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl OptionsCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let ctx = CommandContext::load(cli).await?;
        let lookup = Arc::new(ctx.lookup()?);
        let mut resolver = DependentOptionResolver::new(lookup, ctx.config.options.page_limit);

        if self.driving.is_some() && self.field.driving_field().is_none() {
            info!("{} has no driving field; ignoring --driving", self.field);
        }

        let mut query = OptionQuery::new();
        query.search_term = self.search.clone();
        query.offset = self.offset;
        query.limit = self.limit;

        let options = resolver.resolve(self.field, self.driving.as_deref(), &query).await;
        info!("{} {} option(s)", options.len(), self.field);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&options)?);
        } else {
            print_table(self.field, &options);
        }
        Ok(())
    }
}

fn print_table(field: DgField, options: &[DropdownOption]) {
    if options.is_empty() {
        println!("No {} options found.", field.column_name());
        return;
    }

    println!("{}", format!("{} options", field.column_name()).bold());
    for option in options {
        match split_selection(Some(&option.value)) {
            Some((code, name)) => println!("  {:<16} {}", code.cyan(), name),
            None => println!("  {}", option.label),
        }
    }
}
