use clap::Subcommand;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List,
}

pub fn run(ctx: &Context, action: CategoryAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CategoryAction::List => {
            let tracker = ctx.tracker()?;
            print_json(&tracker.categories()?)?;
        }
    }
    Ok(())
}
