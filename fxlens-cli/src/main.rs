use anyhow::Result;
use fxlens_cli::app;

fn main() -> Result<()> {
    app::run()
}
