use anyhow::Result;
use clap::Parser;
use scholar_bib::cli::Cli;
use scholar_bib::utils::logging;
use scholar_bib::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    logging::init(cli.verbose);

    // 加载配置
    let config = Config::try_from(cli)?;

    App::new(config).run().await?;

    Ok(())
}
