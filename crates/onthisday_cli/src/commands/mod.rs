pub mod calendar;
pub mod random;
pub mod update;

use anyhow::Result;
use clap::{Args, ValueEnum};
use onthisday_core::{validate_criteria, Category, EventCriteria, RawCriteria};

/// Category names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    #[value(alias = "births")]
    Birth,
    #[value(alias = "deaths")]
    Death,
    #[value(alias = "events")]
    Event,
    #[value(alias = "holidays")]
    Holiday,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Birth => Category::Births,
            CategoryArg::Death => Category::Deaths,
            CategoryArg::Event => Category::Events,
            CategoryArg::Holiday => Category::Holidays,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Category of event
    #[arg(short, long, value_enum)]
    pub category: Option<CategoryArg>,

    /// Month to query
    #[arg(short, long)]
    pub month: Option<String>,

    /// Day of the month to query
    #[arg(short, long)]
    pub date: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> Result<EventCriteria> {
        let raw = RawCriteria {
            month: self.month.clone(),
            date: self.date.clone(),
            category: self
                .category
                .map(|category| Category::from(category).heading().to_string()),
        };
        Ok(validate_criteria(&raw)?)
    }
}
