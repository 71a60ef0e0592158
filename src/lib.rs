//! # autopr
//!
//! Push an autofix branch and open an Azure DevOps pull request whose title
//! and description come from the latest commit. This library provides:
//!
//! - Azure DevOps REST integration for pull-request creation and fork lookup
//! - Git subprocess operations (remote inspection, commit message reading,
//!   pushing)
//! - Configuration assembly from CLI, environment, config file, and git
//!   remote detection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autopr::{Config, GitClient, PullRequestPublisher};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Config::defaults()
//!     .merge(Config::load_from_file()?)
//!     .merge(Config::load_from_env())
//!     .into_settings()?;
//!
//! let publisher = PullRequestPublisher::new(settings, GitClient::new("."));
//! let url = publisher.publish("autofix-1").await?;
//! println!("Pull request created at {}", url);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod fork;
pub mod git;
pub mod git_config;
pub mod logging;
pub mod models;
pub mod publisher;

// Re-export commonly used types for convenience
pub use api::AzureReposClient;
pub use config::{Config, Settings};
pub use error::AutoprError;
pub use git::GitClient;
pub use models::Args;
pub use publisher::PullRequestPublisher;

/// Core result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
