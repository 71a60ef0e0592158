use anyhow::Result;
use clap::Parser;

use autopr::{
    Args, Config, GitClient, PullRequestPublisher,
    logging::{LogConfig, init_logging},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --create-config flag
    if args.create_config {
        Config::create_sample_config()?;
        return Ok(());
    }

    let _log_guard = init_logging(LogConfig::from_sources(
        args.log_level.as_deref(),
        args.log_file.as_deref(),
        args.log_format.as_deref(),
    ));

    let repo_path = args.repo.clone().unwrap_or_else(|| ".".to_string());

    // Resolve configuration from CLI args, environment variables, config
    // file, and the git remote
    let settings = Config::defaults()
        .merge(Config::detect_from_git_remote(&repo_path))
        .merge(Config::load_from_file()?)
        .merge(Config::load_from_env())
        .merge(Config::from_args(&args))
        .into_settings()?;

    // clap enforces this unless --create-config was given, which returns above.
    let Some(branch) = args.branch.as_deref() else {
        anyhow::bail!("a branch name is required");
    };

    let publisher = PullRequestPublisher::new(settings, GitClient::new(&repo_path));
    let url = publisher.publish(branch).await?;

    println!("Pull request created at {}", url);
    Ok(())
}
