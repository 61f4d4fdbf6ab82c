use color_eyre::Result;
use pokesocial::cli::{parse_args, run_cli_command};
use pokesocial::logging;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let command = parse_args(std::env::args());
    let output = run_cli_command(command).await?;
    print!("{}", output);
    Ok(())
}
