use anyhow::Result;
use clap::Parser;
use exam_gen::cli::{Cli, Commands};
use exam_gen::utils::logging;
use exam_gen::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    let app = App::new(config);

    match cli.command {
        Commands::Scrape { course_url, output } => {
            app.run_scrape(&course_url, output).await?;
        }
        Commands::Quiz {
            topic,
            count,
            output,
        } => {
            let result = app.run_quiz(&topic, count, output).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Consistency { topic, variations } => {
            let probe = app.run_consistency_probe(&topic, variations).await?;
            println!("{}", serde_json::to_string_pretty(&probe)?);
        }
    }

    Ok(())
}
