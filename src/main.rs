//! offer-pack: curate offer items and assemble them into packages

use anyhow::Result;

fn main() -> Result<()> {
    offer_pack::cli::run()
}
